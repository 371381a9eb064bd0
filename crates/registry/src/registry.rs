use std::path::Path;

use glam::Vec2;
use scenestream_common::{Bounds2, SceneRect};
use serde::Serialize;

use crate::descriptor::SceneDescriptor;

/// Width and height of a freshly added scene, centered on the origin.
const DEFAULT_SCENE_SIZE: (i32, i32) = (100, 50);

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene '{0}' not found")]
    NotFound(String),
    #[error("scene index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("scene name '{name}' already used by index {existing}")]
    DuplicateName { name: String, existing: usize },
}

/// Ordered collection of scene descriptors.
///
/// Mutable while authoring; the streaming controller takes ownership and only
/// reads it at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SceneRegistry {
    scenes: Vec<SceneDescriptor>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, applying the size minimum and the unique-name check.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = SceneDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.push(descriptor)?;
        }
        Ok(registry)
    }

    /// Number of scenes.
    pub fn count(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SceneDescriptor> {
        self.scenes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneDescriptor> {
        self.scenes.iter()
    }

    /// Replace the descriptor at `index`. Returns the previous descriptor.
    pub fn set(
        &mut self,
        index: usize,
        descriptor: SceneDescriptor,
    ) -> Result<SceneDescriptor, RegistryError> {
        self.check_index(index)?;
        let descriptor = normalize(descriptor);
        self.check_unique(&descriptor, Some(index))?;
        Ok(std::mem::replace(&mut self.scenes[index], descriptor))
    }

    /// Replace only the rectangle at `index`, flooring its size to the minimum.
    pub fn set_rect(&mut self, index: usize, rect: SceneRect) -> Result<(), RegistryError> {
        self.check_index(index)?;
        self.scenes[index].rect = rect.with_min_extent();
        Ok(())
    }

    /// Rename the scene at `index`.
    pub fn rename(&mut self, index: usize, name: Option<String>) -> Result<(), RegistryError> {
        let mut descriptor = self
            .scenes
            .get(index)
            .cloned()
            .ok_or(RegistryError::IndexOutOfRange {
                index,
                count: self.count(),
            })?;
        descriptor.name = name;
        self.set(index, descriptor)?;
        Ok(())
    }

    /// Append an unassigned scene with the default size centered on the origin.
    pub fn add_scene(&mut self) -> usize {
        let (width, height) = DEFAULT_SCENE_SIZE;
        let rect = SceneRect::new(-width / 2, height / 2, width, height);
        self.scenes.push(SceneDescriptor::unassigned(rect));
        self.scenes.len() - 1
    }

    /// Append a descriptor. Returns its index.
    pub fn push(&mut self, descriptor: SceneDescriptor) -> Result<usize, RegistryError> {
        let descriptor = normalize(descriptor);
        self.check_unique(&descriptor, None)?;
        self.scenes.push(descriptor);
        Ok(self.scenes.len() - 1)
    }

    /// Insert a descriptor at `index`, shifting later scenes up by one.
    pub fn insert(
        &mut self,
        index: usize,
        descriptor: SceneDescriptor,
    ) -> Result<(), RegistryError> {
        if index > self.count() {
            return Err(RegistryError::IndexOutOfRange {
                index,
                count: self.count(),
            });
        }
        let descriptor = normalize(descriptor);
        self.check_unique(&descriptor, None)?;
        self.scenes.insert(index, descriptor);
        Ok(())
    }

    /// Remove and return the descriptor at `index`.
    pub fn remove(&mut self, index: usize) -> Result<SceneDescriptor, RegistryError> {
        self.check_index(index)?;
        Ok(self.scenes.remove(index))
    }

    /// Linear scan for a scene by name. Empty or missing names never match.
    pub fn find_index_by_name<'a>(&self, name: impl Into<Option<&'a str>>) -> Option<usize> {
        let name = name.into().filter(|n| !n.is_empty())?;
        self.scenes
            .iter()
            .position(|s| s.assigned_name() == Some(name))
    }

    /// Like [`SceneRegistry::find_index_by_name`] but surfaces a miss as an error.
    pub fn require_index(&self, name: &str) -> Result<usize, RegistryError> {
        self.find_index_by_name(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn find_by_name<'a>(&self, name: impl Into<Option<&'a str>>) -> Option<&SceneDescriptor> {
        self.find_index_by_name(name).map(|i| &self.scenes[i])
    }

    /// Bounding box of every scene rectangle, or `None` when empty.
    pub fn extent(&self) -> Option<Bounds2> {
        self.scenes
            .iter()
            .map(|s| {
                Bounds2::new(
                    Vec2::new(s.rect.left(), s.rect.bottom()),
                    Vec2::new(s.rect.right(), s.rect.top()),
                )
            })
            .reduce(|acc, b| acc.union(&b))
    }

    /// Serialize the layout as a pretty JSON array.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON layout, validating every record.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let descriptors: Vec<SceneDescriptor> = serde_json::from_str(json)?;
        Self::from_descriptors(descriptors)
    }

    /// Save the layout to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, self)?;
        tracing::debug!(path = %path.as_ref().display(), scenes = self.count(), "saved layout");
        Ok(())
    }

    /// Load a layout from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let file = std::fs::File::open(path.as_ref())?;
        let descriptors: Vec<SceneDescriptor> = serde_json::from_reader(file)?;
        let registry = Self::from_descriptors(descriptors)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            scenes = registry.count(),
            "loaded layout"
        );
        Ok(registry)
    }

    fn check_index(&self, index: usize) -> Result<(), RegistryError> {
        if index < self.count() {
            Ok(())
        } else {
            Err(RegistryError::IndexOutOfRange {
                index,
                count: self.count(),
            })
        }
    }

    fn check_unique(
        &self,
        descriptor: &SceneDescriptor,
        skip: Option<usize>,
    ) -> Result<(), RegistryError> {
        let Some(name) = descriptor.assigned_name() else {
            return Ok(());
        };
        match self.find_index_by_name(name) {
            Some(existing) if Some(existing) != skip => Err(RegistryError::DuplicateName {
                name: name.to_string(),
                existing,
            }),
            _ => Ok(()),
        }
    }
}

impl std::ops::Index<usize> for SceneRegistry {
    type Output = SceneDescriptor;

    fn index(&self, index: usize) -> &Self::Output {
        &self.scenes[index]
    }
}

fn normalize(mut descriptor: SceneDescriptor) -> SceneDescriptor {
    descriptor.rect = descriptor.rect.with_min_extent();
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_scenes() -> SceneRegistry {
        SceneRegistry::from_descriptors([
            SceneDescriptor::new("west", SceneRect::new(-100, 50, 100, 100)),
            SceneDescriptor::new("east", SceneRect::new(0, 50, 100, 100)),
        ])
        .unwrap()
    }

    #[test]
    fn find_by_name() {
        let reg = two_scenes();
        assert_eq!(reg.count(), 2);
        assert_eq!(reg.find_index_by_name("east"), Some(1));
        assert_eq!(reg.find_index_by_name("north"), None);
        assert_eq!(reg.find_by_name("west").unwrap().rect.x, -100);
    }

    #[test]
    fn empty_and_missing_names_never_match() {
        let mut reg = two_scenes();
        // An unassigned scene must not be found by the empty name either.
        reg.add_scene();
        assert_eq!(reg.find_index_by_name(""), None);
        assert_eq!(reg.find_index_by_name(None::<&str>), None);
    }

    #[test]
    fn require_index_surfaces_not_found() {
        let reg = two_scenes();
        assert_eq!(reg.require_index("west").unwrap(), 0);
        assert!(matches!(
            reg.require_index("south"),
            Err(RegistryError::NotFound(name)) if name == "south"
        ));
    }

    #[test]
    fn add_scene_uses_default_rect_centered_on_origin() {
        let mut reg = SceneRegistry::new();
        let index = reg.add_scene();
        let scene = reg.get(index).unwrap();
        assert!(!scene.is_assigned());
        assert_eq!(scene.rect, SceneRect::new(-50, 25, 100, 50));
        assert_eq!(scene.altered_center(), Vec2::ZERO);
    }

    #[test]
    fn set_rect_round_trip_floors_to_minimum() {
        let mut reg = SceneRegistry::new();
        let index = reg.add_scene();
        reg.set_rect(index, SceneRect::new(7, -3, 40, 30)).unwrap();
        assert_eq!(reg[index].rect, SceneRect::new(7, -3, 40, 30));

        reg.set_rect(index, SceneRect::new(7, -3, 4, 0)).unwrap();
        assert_eq!(reg[index].rect, SceneRect::new(7, -3, 10, 10));
    }

    #[test]
    fn set_rejects_duplicate_name() {
        let mut reg = two_scenes();
        let result = reg.set(1, SceneDescriptor::new("west", SceneRect::new(0, 0, 20, 20)));
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateName { existing: 0, .. })
        ));
        // Renaming a scene to its own name is fine.
        reg.rename(1, Some("east".into())).unwrap();
    }

    #[test]
    fn unassigned_names_may_repeat() {
        let mut reg = SceneRegistry::new();
        reg.add_scene();
        reg.add_scene();
        reg.push(SceneDescriptor::new("", SceneRect::new(0, 0, 10, 10)))
            .unwrap();
        assert_eq!(reg.count(), 3);
    }

    #[test]
    fn out_of_range_index_is_error() {
        let mut reg = two_scenes();
        assert!(reg.get(5).is_none());
        assert!(matches!(
            reg.remove(5),
            Err(RegistryError::IndexOutOfRange { index: 5, count: 2 })
        ));
        assert!(reg.set_rect(2, SceneRect::new(0, 0, 10, 10)).is_err());
    }

    #[test]
    fn insert_and_remove_keep_order() {
        let mut reg = two_scenes();
        reg.insert(1, SceneDescriptor::new("mid", SceneRect::new(0, 0, 10, 10)))
            .unwrap();
        let names: Vec<_> = reg.iter().filter_map(|s| s.assigned_name()).collect();
        assert_eq!(names, vec!["west", "mid", "east"]);

        let removed = reg.remove(0).unwrap();
        assert_eq!(removed.assigned_name(), Some("west"));
        assert_eq!(reg.find_index_by_name("east"), Some(1));
    }

    #[test]
    fn extent_covers_all_scenes() {
        let reg = two_scenes();
        let extent = reg.extent().unwrap();
        assert_eq!(extent.min, Vec2::new(-100.0, -50.0));
        assert_eq!(extent.max, Vec2::new(100.0, 50.0));
        assert!(SceneRegistry::new().extent().is_none());
    }

    #[test]
    fn json_layout_is_array_of_records() {
        let reg = two_scenes();
        let json = reg.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["name"], "east");
        assert_eq!(value[1]["width"], 100);

        let back = SceneRegistry::from_json(&json).unwrap();
        assert_eq!(back, reg);
    }

    #[test]
    fn loading_applies_minimum_and_uniqueness() {
        let small = r#"[{"name": "a", "x": 0, "y": 0, "width": 1, "height": 2}]"#;
        let reg = SceneRegistry::from_json(small).unwrap();
        assert_eq!(reg[0].rect.width, 10);
        assert_eq!(reg[0].rect.height, 10);

        let dup = r#"[
            {"name": "a", "x": 0, "y": 0, "width": 10, "height": 10},
            {"name": "a", "x": 10, "y": 0, "width": 10, "height": 10}
        ]"#;
        assert!(matches!(
            SceneRegistry::from_json(dup),
            Err(RegistryError::DuplicateName { .. })
        ));
    }

    #[test]
    fn extent_of_layout_at_coordinate_limits() {
        let json = r#"[
            {"name": "deep", "x": 0, "y": -2147483600, "width": 100, "height": 100},
            {"name": "wide", "x": 2147483600, "y": 0, "width": 100, "height": 100}
        ]"#;
        let reg = SceneRegistry::from_json(json).unwrap();
        let extent = reg.extent().unwrap();
        assert!(extent.min.y < i32::MIN as f32);
        assert!(extent.max.x > i32::MAX as f32);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let reg = two_scenes();
        reg.save(tmp.path()).unwrap();

        let loaded = SceneRegistry::load(tmp.path()).unwrap();
        assert_eq!(loaded, reg);
    }
}
