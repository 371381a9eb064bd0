use std::collections::{BTreeMap, BTreeSet};

/// Opaque handle to a loaded scene's content root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHandle(pub u64);

impl std::fmt::Display for ContentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A scene's content could not be loaded.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to load scene '{scene}': {reason}")]
pub struct LoadError {
    pub scene: String,
    pub reason: String,
}

/// The mechanism that actually brings scene content in and out of memory.
///
/// The controller guards against double loads; implementations only need to
/// do the work they are asked for.
pub trait SceneLoader {
    /// Load the named scene.
    ///
    /// Return `Some(handle)` when the content is ready immediately. Return
    /// `None` when the content will announce itself later through
    /// `StreamingController::register_binding`.
    fn load(&mut self, scene: &str) -> Result<Option<ContentHandle>, LoadError>;

    /// Show or hide loaded content without destroying it.
    fn set_active(&mut self, handle: ContentHandle, active: bool);

    /// Release the content root.
    fn unload(&mut self, handle: ContentHandle);
}

/// One call received by a [`MemoryLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderCall {
    Load(String),
    SetActive(ContentHandle, bool),
    Unload(ContentHandle),
}

/// Content held by a [`MemoryLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedContent {
    pub scene: String,
    pub active: bool,
}

/// In-memory loader that hands out sequential handles and records every call.
///
/// With `deferred` set, loads return `None` and the new content waits in a
/// pending queue until the host drains it with [`MemoryLoader::take_pending`]
/// and registers each binding.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    next_handle: u64,
    live: BTreeMap<ContentHandle, LoadedContent>,
    pending: Vec<(ContentHandle, String)>,
    failing: BTreeSet<String>,
    deferred: bool,
    calls: Vec<LoaderCall>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader whose content registers itself after the load call returns.
    pub fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }

    /// Make every future load of `scene` fail.
    pub fn fail_scene(&mut self, scene: impl Into<String>) {
        self.failing.insert(scene.into());
    }

    /// Drain content loaded in deferred mode that has not registered yet.
    pub fn take_pending(&mut self) -> Vec<(ContentHandle, String)> {
        std::mem::take(&mut self.pending)
    }

    pub fn calls(&self) -> &[LoaderCall] {
        &self.calls
    }

    pub fn live(&self) -> &BTreeMap<ContentHandle, LoadedContent> {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Content currently loaded for `scene`, if any.
    pub fn content_for(&self, scene: &str) -> Option<(ContentHandle, &LoadedContent)> {
        self.live
            .iter()
            .find(|(_, content)| content.scene == scene)
            .map(|(handle, content)| (*handle, content))
    }
}

impl SceneLoader for MemoryLoader {
    fn load(&mut self, scene: &str) -> Result<Option<ContentHandle>, LoadError> {
        self.calls.push(LoaderCall::Load(scene.to_string()));
        if self.failing.contains(scene) {
            return Err(LoadError {
                scene: scene.to_string(),
                reason: "scene content unavailable".into(),
            });
        }
        self.next_handle += 1;
        let handle = ContentHandle(self.next_handle);
        self.live.insert(
            handle,
            LoadedContent {
                scene: scene.to_string(),
                active: true,
            },
        );
        if self.deferred {
            self.pending.push((handle, scene.to_string()));
            Ok(None)
        } else {
            Ok(Some(handle))
        }
    }

    fn set_active(&mut self, handle: ContentHandle, active: bool) {
        self.calls.push(LoaderCall::SetActive(handle, active));
        if let Some(content) = self.live.get_mut(&handle) {
            content.active = active;
        }
    }

    fn unload(&mut self, handle: ContentHandle) {
        self.calls.push(LoaderCall::Unload(handle));
        self.live.remove(&handle);
    }
}
