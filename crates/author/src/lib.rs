//! Layout authoring: edit the scene registry with reversible commands.
//!
//! # Invariants
//! - All authoring ops are reversible.
//! - Edits go through the registry, so size minimums and name uniqueness hold after every op.

mod editor;

pub use editor::{EditError, LayoutCommand, LayoutEditor};
