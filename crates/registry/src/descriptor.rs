use glam::Vec2;
use scenestream_common::SceneRect;
use serde::{Deserialize, Serialize};

/// A named rectangular world region with loadable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// Key used to load the scene's content. `None` or empty means unassigned.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub rect: SceneRect,
}

impl SceneDescriptor {
    pub fn new(name: impl Into<String>, rect: SceneRect) -> Self {
        Self {
            name: Some(name.into()),
            rect,
        }
    }

    /// A descriptor with no name yet.
    pub fn unassigned(rect: SceneRect) -> Self {
        Self { name: None, rect }
    }

    /// The assigned name, if any. Empty strings count as unassigned.
    pub fn assigned_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_name().is_some()
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn altered_center(&self) -> Vec2 {
        self.rect.altered_center()
    }
}
