//! Scene registry: the ordered list of scene descriptors a world is divided into.
//!
//! # Invariants
//! - Every stored rectangle is at least `MIN_SCENE_EXTENT` wide and tall.
//! - Assigned scene names are unique; an empty name means "unassigned".
//! - Index order is stable and is the order the streaming controller scans.
//!
//! # Layout
//! A registry persists as a JSON array of `{name, x, y, width, height}` records.

mod descriptor;
mod registry;

pub use descriptor::SceneDescriptor;
pub use registry::{RegistryError, SceneRegistry};

pub fn crate_info() -> &'static str {
    "scenestream-registry v0.1.0"
}
