use std::collections::{BTreeMap, BTreeSet};

use scenestream_common::ObjectId;

use crate::error::StreamError;
use crate::loader::ContentHandle;

/// Who currently owns a transferable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The live binding of the scene at this registry index.
    Scene(usize),
    /// No loaded scene contains the object; it waits for one to bind.
    Limbo,
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Scene(index) => write!(f, "scene {index}"),
            Owner::Limbo => write!(f, "limbo"),
        }
    }
}

/// Live representation of a loaded scene: its content root and the
/// transferable objects parented under it.
#[derive(Debug, Clone)]
pub struct SceneBinding {
    handle: ContentHandle,
    objects: BTreeSet<ObjectId>,
}

impl SceneBinding {
    fn new(handle: ContentHandle) -> Self {
        Self {
            handle,
            objects: BTreeSet::new(),
        }
    }

    pub fn handle(&self) -> ContentHandle {
        self.handle
    }

    pub fn objects(&self) -> &BTreeSet<ObjectId> {
        &self.objects
    }

    pub fn owns(&self, id: ObjectId) -> bool {
        self.objects.contains(&id)
    }
}

/// Every live binding plus the object → owner table.
///
/// All ownership changes go through this table, which keeps each binding's
/// object set, the limbo set and the owner map in agreement: an object appears
/// in exactly one of them or in none.
#[derive(Debug, Default)]
pub struct BindingTable {
    bindings: BTreeMap<usize, SceneBinding>,
    owners: BTreeMap<ObjectId, Owner>,
    limbo: BTreeSet<ObjectId>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&SceneBinding> {
        self.bindings.get(&index)
    }

    pub fn is_bound(&self, index: usize) -> bool {
        self.bindings.contains_key(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn owner_of(&self, id: ObjectId) -> Option<Owner> {
        self.owners.get(&id).copied()
    }

    pub fn limbo(&self) -> &BTreeSet<ObjectId> {
        &self.limbo
    }

    /// Create the binding for `index`.
    pub fn bind(&mut self, index: usize, handle: ContentHandle) -> Result<(), StreamError> {
        if self.bindings.contains_key(&index) {
            return Err(StreamError::AlreadyLoaded(index));
        }
        self.bindings.insert(index, SceneBinding::new(handle));
        Ok(())
    }

    /// Destroy the binding for `index`. Its objects must already have been
    /// moved elsewhere; any left over are parked in limbo.
    pub fn unbind(&mut self, index: usize) -> Option<SceneBinding> {
        let binding = self.bindings.remove(&index)?;
        for id in &binding.objects {
            self.owners.insert(*id, Owner::Limbo);
            self.limbo.insert(*id);
        }
        Some(binding)
    }

    /// Give an unowned object to the scene at `index`.
    pub fn attach(&mut self, id: ObjectId, index: usize) -> Result<(), StreamError> {
        if let Some(owner) = self.owner_of(id) {
            return Err(StreamError::DuplicateTransfer { object: id, owner });
        }
        let binding = self
            .bindings
            .get_mut(&index)
            .ok_or(StreamError::BindingNotFound(index))?;
        binding.objects.insert(id);
        self.owners.insert(id, Owner::Scene(index));
        Ok(())
    }

    /// Forget an object entirely. Returns its previous owner.
    pub fn detach(&mut self, id: ObjectId) -> Option<Owner> {
        let owner = self.owners.remove(&id)?;
        match owner {
            Owner::Scene(index) => {
                if let Some(binding) = self.bindings.get_mut(&index) {
                    binding.objects.remove(&id);
                }
            }
            Owner::Limbo => {
                self.limbo.remove(&id);
            }
        }
        Some(owner)
    }

    /// Move an object from its current owner to the scene at `to`.
    ///
    /// Fails without changing anything if the destination already tracks the
    /// object or has no binding.
    pub fn transfer(&mut self, id: ObjectId, to: usize) -> Result<Owner, StreamError> {
        let from = self.owner_of(id).ok_or(StreamError::ObjectNotFound(id))?;
        let destination = self
            .bindings
            .get(&to)
            .ok_or(StreamError::BindingNotFound(to))?;
        if destination.owns(id) || from == Owner::Scene(to) {
            return Err(StreamError::DuplicateTransfer {
                object: id,
                owner: Owner::Scene(to),
            });
        }
        self.release(id, from);
        if let Some(destination) = self.bindings.get_mut(&to) {
            destination.objects.insert(id);
        }
        self.owners.insert(id, Owner::Scene(to));
        Ok(from)
    }

    /// Move an object from its scene into limbo.
    pub fn park(&mut self, id: ObjectId) -> Option<Owner> {
        let from = self.owner_of(id)?;
        if from == Owner::Limbo {
            return Some(from);
        }
        self.release(id, from);
        self.limbo.insert(id);
        self.owners.insert(id, Owner::Limbo);
        Some(from)
    }

    fn release(&mut self, id: ObjectId, from: Owner) {
        match from {
            Owner::Scene(index) => {
                if let Some(binding) = self.bindings.get_mut(&index) {
                    binding.objects.remove(&id);
                }
            }
            Owner::Limbo => {
                self.limbo.remove(&id);
            }
        }
    }
}
