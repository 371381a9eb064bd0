//! Object kernel: the host's dynamic objects, their bounding volumes, and capability tags.
//!
//! # Invariants
//! - Objects are created and destroyed by the host only; streaming never despawns.
//! - The `Transferable` capability is fixed at spawn time.

pub mod world;

pub use world::{Capability, ObjectData, World};
