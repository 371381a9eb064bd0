//! Streaming: keep the scenes near a tracked position loaded, hand off
//! transferable objects as their scenes go away.
//!
//! # Invariants
//! - Each scene index is in exactly one of `Unloaded`, `Visible`, `Dormant`.
//! - At most one transition per scene per evaluation.
//! - A tick evaluates at most `max_evaluations_per_tick` scenes.
//! - A transferable object is owned by at most one scene binding (or limbo),
//!   and transfer-out always runs before a scene deactivates or unloads.

mod binding;
mod config;
mod controller;
mod error;
mod loader;
mod transfer;

pub use binding::{BindingTable, Owner, SceneBinding};
pub use config::{StreamConfig, StreamStats};
pub use controller::{SceneState, StreamEvent, StreamingController};
pub use error::StreamError;
pub use loader::{ContentHandle, LoadError, LoadedContent, LoaderCall, MemoryLoader, SceneLoader};

pub fn crate_info() -> &'static str {
    "scenestream-stream v0.1.0"
}
