//! Shared types for scenestream: object identity, bounding volumes, scene rectangles.
//!
//! # Invariants
//! - Scene rectangles are anchored at their top edge: the vertical extent is `[y - height, y]`.
//! - Geometry helpers are pure functions with no state.

mod geometry;
mod types;

pub use geometry::{Bounds2, MIN_SCENE_EXTENT, SceneRect, closest_point, contains};
pub use types::ObjectId;
