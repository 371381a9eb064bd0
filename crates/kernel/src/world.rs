use std::collections::BTreeMap;

use glam::Vec2;
use scenestream_common::{Bounds2, ObjectId};
use serde::{Deserialize, Serialize};

/// Capability tag attached to an object when it is spawned.
///
/// Only `Transferable` objects may be owned by a scene binding and migrated
/// between scenes; `Static` objects live and die with their scene content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Static,
    Transferable,
}

/// Per-object data stored in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectData {
    pub bounds: Bounds2,
    pub capability: Capability,
}

impl ObjectData {
    pub fn is_transferable(&self) -> bool {
        self.capability == Capability::Transferable
    }
}

/// The host's dynamic objects.
///
/// Uses BTreeMap for deterministic iteration order, so transfer scans and
/// limbo placement visit objects in the same order on every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    objects: BTreeMap<ObjectId, ObjectData>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects in the world.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Read-only access to all objects.
    pub fn objects(&self) -> &BTreeMap<ObjectId, ObjectData> {
        &self.objects
    }

    /// Spawn an object with the given capability. Returns its id.
    pub fn spawn(&mut self, bounds: Bounds2, capability: Capability) -> ObjectId {
        let id = ObjectId::new();
        self.spawn_with_id(id, bounds, capability);
        id
    }

    /// Spawn an object that may migrate between scenes.
    pub fn spawn_transferable(&mut self, bounds: Bounds2) -> ObjectId {
        self.spawn(bounds, Capability::Transferable)
    }

    /// Spawn an object with a specific id.
    pub fn spawn_with_id(&mut self, id: ObjectId, bounds: Bounds2, capability: Capability) {
        tracing::trace!(%id, ?capability, "spawn object");
        self.objects.insert(id, ObjectData { bounds, capability });
    }

    /// Remove an object. Returns the data if it existed.
    pub fn despawn(&mut self, id: ObjectId) -> Option<ObjectData> {
        self.objects.remove(&id)
    }

    /// Get a reference to object data.
    pub fn get(&self, id: ObjectId) -> Option<&ObjectData> {
        self.objects.get(&id)
    }

    /// Bounding volume of an object, if it exists.
    pub fn bounds(&self, id: ObjectId) -> Option<Bounds2> {
        self.objects.get(&id).map(|o| o.bounds)
    }

    /// Whether `id` exists and carries the `Transferable` capability.
    pub fn is_transferable(&self, id: ObjectId) -> bool {
        self.objects.get(&id).is_some_and(ObjectData::is_transferable)
    }

    /// Iterate transferable objects in id order.
    pub fn transferables(&self) -> impl Iterator<Item = (ObjectId, &ObjectData)> {
        self.objects
            .iter()
            .filter(|(_, data)| data.is_transferable())
            .map(|(id, data)| (*id, data))
    }

    /// Replace an object's bounding volume. Returns false if it does not exist.
    pub fn set_bounds(&mut self, id: ObjectId, bounds: Bounds2) -> bool {
        if let Some(data) = self.objects.get_mut(&id) {
            data.bounds = bounds;
            true
        } else {
            false
        }
    }

    /// Move an object by `delta`. Returns false if it does not exist.
    pub fn translate(&mut self, id: ObjectId, delta: Vec2) -> bool {
        if let Some(data) = self.objects.get_mut(&id) {
            data.bounds = data.bounds.translated(delta);
            true
        } else {
            false
        }
    }
}
