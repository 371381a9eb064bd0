use std::collections::BTreeSet;
use std::time::Instant;

use glam::Vec2;
use scenestream_common::ObjectId;
use scenestream_kernel::World;
use scenestream_registry::{SceneDescriptor, SceneRegistry};

use crate::binding::{BindingTable, Owner, SceneBinding};
use crate::config::{StreamConfig, StreamStats};
use crate::error::StreamError;
use crate::loader::{ContentHandle, SceneLoader};
use crate::transfer::{self, Departure};

/// Streaming state of one scene index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneState {
    /// Content is not in memory.
    Unloaded,
    /// Loaded and shown.
    Visible,
    /// Loaded but hidden; the hysteresis band between visible and unloaded.
    Dormant,
}

impl SceneState {
    pub fn is_active(self) -> bool {
        !matches!(self, SceneState::Unloaded)
    }
}

/// A change applied during a tick, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    Loaded { index: usize },
    Activated { index: usize },
    Deactivated { index: usize },
    Unloaded { index: usize },
    Transferred {
        object: ObjectId,
        from: Owner,
        to: usize,
    },
    Parked { object: ObjectId, from: usize },
}

/// Streams scenes in and out around a tracked position.
///
/// Owns the registry, the scene loader and every live binding. The host calls
/// [`StreamingController::start`] once, then [`StreamingController::tick`]
/// each frame with the current tracked position. Each tick evaluates at most
/// `max_evaluations_per_tick` scenes, walking the registry round-robin, so a
/// full pass over `N` scenes takes `ceil(N / budget)` ticks.
pub struct StreamingController<L: SceneLoader> {
    config: StreamConfig,
    sqr_buffer: f32,
    sqr_active: f32,
    registry: SceneRegistry,
    loader: L,
    states: Vec<SceneState>,
    bindings: BindingTable,
    cursor: usize,
    started: bool,
    stats: StreamStats,
}

impl<L: SceneLoader> StreamingController<L> {
    pub fn new(
        registry: SceneRegistry,
        config: StreamConfig,
        loader: L,
    ) -> Result<Self, StreamError> {
        config.validate()?;
        let states = vec![SceneState::Unloaded; registry.count()];
        Ok(Self {
            sqr_buffer: config.sqr_buffer_distance(),
            sqr_active: config.sqr_active_distance(),
            config,
            registry,
            loader,
            states,
            bindings: BindingTable::new(),
            cursor: 0,
            started: false,
            stats: StreamStats::default(),
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    /// State of the scene at `index`, or `None` if out of range.
    pub fn state(&self, index: usize) -> Option<SceneState> {
        self.states.get(index).copied()
    }

    pub fn states(&self) -> &[SceneState] {
        &self.states
    }

    /// Number of scenes currently loaded (visible or dormant).
    pub fn active_scene_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_active()).count()
    }

    /// Next index the scheduler will evaluate.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Live binding of a scene. `None` also covers a scene that is loading and
    /// has not registered yet; callers treat that as a no-op, not an error.
    pub fn binding(&self, index: usize) -> Option<&SceneBinding> {
        self.bindings.get(index)
    }

    pub fn owner_of(&self, id: ObjectId) -> Option<Owner> {
        self.bindings.owner_of(id)
    }

    /// Objects owned by the scene at `index`, if it is bound.
    pub fn objects_in(&self, index: usize) -> Option<&BTreeSet<ObjectId>> {
        self.bindings.get(index).map(SceneBinding::objects)
    }

    /// Objects waiting for a scene to contain them.
    pub fn limbo(&self) -> &BTreeSet<ObjectId> {
        self.bindings.limbo()
    }

    /// Statistics from the last tick.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Evaluate every scene once, without yielding, to establish the initial state.
    pub fn start(&mut self, tracked: Vec2, world: &World) -> Result<Vec<StreamEvent>, StreamError> {
        let _span = tracing::info_span!("stream_start").entered();
        let tick_start = Instant::now();
        let mut events = Vec::new();
        for index in 0..self.registry.count() {
            self.evaluate(index, tracked, world, &mut events)?;
        }
        self.cursor = 0;
        self.started = true;
        self.record_stats(self.registry.count(), &events, tick_start);
        tracing::info!(
            scenes = self.registry.count(),
            active = self.active_scene_count(),
            "streaming started"
        );
        Ok(events)
    }

    /// Advance the round-robin scheduler by one tick.
    ///
    /// Limbo objects are re-offered first. Then scenes are evaluated from the
    /// cursor until the cursor reaches the next multiple of the budget (or
    /// wraps to zero). Runs [`StreamingController::start`] instead if the
    /// controller has not been started.
    pub fn tick(&mut self, tracked: Vec2, world: &World) -> Result<Vec<StreamEvent>, StreamError> {
        if !self.started {
            return self.start(tracked, world);
        }
        let _span = tracing::info_span!("stream_tick").entered();
        let tick_start = Instant::now();
        let mut events = Vec::new();

        transfer::resolve_limbo(&self.registry, &mut self.bindings, world, &mut events)?;

        let count = self.registry.count();
        let budget = self.config.max_evaluations_per_tick;
        let mut evaluated = 0;
        if count > 0 {
            loop {
                self.evaluate(self.cursor, tracked, world, &mut events)?;
                evaluated += 1;
                self.cursor = (self.cursor + 1) % count;
                if self.cursor % budget == 0 {
                    break;
                }
            }
        }

        self.record_stats(evaluated, &events, tick_start);
        tracing::trace!(
            evaluated,
            events = events.len(),
            cursor = self.cursor,
            active = self.stats.active_scenes,
            "stream tick complete"
        );
        Ok(events)
    }

    /// Bind a scene's loaded content, resolving the scene by name.
    ///
    /// Called by the scene content once it is ready (directly by the
    /// controller for loaders that return a handle). Returns the descriptor so
    /// the caller can cache its rectangle.
    pub fn register_binding(
        &mut self,
        handle: ContentHandle,
        scene_name: &str,
    ) -> Result<SceneDescriptor, StreamError> {
        let Some(index) = self.registry.find_index_by_name(scene_name) else {
            tracing::error!(scene = scene_name, %handle, "binding for unknown scene");
            return Err(StreamError::SceneNotFound(scene_name.to_string()));
        };
        self.bind(index, handle)?;
        Ok(self.registry[index].clone())
    }

    /// Give a transferable object to the bound scene at `index`.
    pub fn attach_object(
        &mut self,
        index: usize,
        id: ObjectId,
        world: &World,
    ) -> Result<(), StreamError> {
        let object = world.get(id).ok_or(StreamError::ObjectNotFound(id))?;
        if !object.is_transferable() {
            return Err(StreamError::NotTransferable(id));
        }
        self.bindings.attach(id, index).inspect_err(|e| {
            tracing::error!(%id, scene = index, error = %e, "attach failed");
        })?;
        tracing::debug!(%id, scene = index, "attached object");
        Ok(())
    }

    /// Stop tracking an object, e.g. because the host despawned it.
    pub fn detach_object(&mut self, id: ObjectId) -> Option<Owner> {
        self.bindings.detach(id)
    }

    fn evaluate(
        &mut self,
        index: usize,
        tracked: Vec2,
        world: &World,
        events: &mut Vec<StreamEvent>,
    ) -> Result<(), StreamError> {
        let rect = self.registry[index].rect;
        let closest = rect.closest_point(tracked);
        let sqr_distance = closest.distance_squared(tracked);

        match self.states[index] {
            SceneState::Unloaded if sqr_distance < self.sqr_buffer => self.load(index, events),
            SceneState::Visible if sqr_distance > self.sqr_active => {
                self.deactivate(index, world, events)
            }
            SceneState::Dormant if sqr_distance < self.sqr_active => {
                self.activate(index, events);
                Ok(())
            }
            SceneState::Dormant if sqr_distance > self.sqr_buffer => {
                self.unload(index, world, events)
            }
            _ => Ok(()),
        }
    }

    fn load(&mut self, index: usize, events: &mut Vec<StreamEvent>) -> Result<(), StreamError> {
        if self.states[index].is_active() {
            tracing::error!(scene = index, "load requested for active scene");
            return Err(StreamError::AlreadyActive(index));
        }
        let Some(name) = self.registry[index].assigned_name() else {
            tracing::trace!(scene = index, "skipping scene with no name");
            return Ok(());
        };
        let handle = match self.loader.load(name) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(scene = index, error = %e, "scene load failed");
                return Ok(());
            }
        };
        tracing::info!(scene = index, name, deferred = handle.is_none(), "loading scene");
        self.states[index] = SceneState::Visible;
        events.push(StreamEvent::Loaded { index });
        if let Some(handle) = handle {
            self.bind(index, handle)?;
        }
        Ok(())
    }

    fn activate(&mut self, index: usize, events: &mut Vec<StreamEvent>) {
        if let Some(binding) = self.bindings.get(index) {
            self.loader.set_active(binding.handle(), true);
        }
        tracing::debug!(scene = index, "activating scene");
        self.states[index] = SceneState::Visible;
        events.push(StreamEvent::Activated { index });
    }

    fn deactivate(
        &mut self,
        index: usize,
        world: &World,
        events: &mut Vec<StreamEvent>,
    ) -> Result<(), StreamError> {
        transfer::transfer_out(
            index,
            Departure::Deactivate,
            &self.registry,
            &mut self.bindings,
            world,
            events,
        )?;
        if let Some(binding) = self.bindings.get(index) {
            self.loader.set_active(binding.handle(), false);
        }
        tracing::debug!(scene = index, "deactivating scene");
        self.states[index] = SceneState::Dormant;
        events.push(StreamEvent::Deactivated { index });
        Ok(())
    }

    fn unload(
        &mut self,
        index: usize,
        world: &World,
        events: &mut Vec<StreamEvent>,
    ) -> Result<(), StreamError> {
        if !self.bindings.is_bound(index) {
            tracing::debug!(scene = index, "unload skipped; binding not registered yet");
            return Ok(());
        }
        transfer::transfer_out(
            index,
            Departure::Unload,
            &self.registry,
            &mut self.bindings,
            world,
            events,
        )?;
        if let Some(binding) = self.bindings.unbind(index) {
            self.loader.unload(binding.handle());
        }
        tracing::info!(scene = index, "unloaded scene");
        self.states[index] = SceneState::Unloaded;
        events.push(StreamEvent::Unloaded { index });
        Ok(())
    }

    fn bind(&mut self, index: usize, handle: ContentHandle) -> Result<(), StreamError> {
        self.bindings.bind(index, handle).inspect_err(|e| {
            tracing::error!(scene = index, %handle, error = %e, "binding rejected");
        })?;
        match self.states[index] {
            SceneState::Unloaded => {
                tracing::debug!(scene = index, "binding scene loaded outside the controller");
                self.states[index] = SceneState::Visible;
            }
            SceneState::Dormant => self.loader.set_active(handle, false),
            SceneState::Visible => {}
        }
        tracing::debug!(scene = index, %handle, "bound scene content");
        Ok(())
    }

    fn record_stats(&mut self, evaluated: usize, events: &[StreamEvent], tick_start: Instant) {
        let mut stats = StreamStats {
            evaluated,
            ..StreamStats::default()
        };
        for event in events {
            match event {
                StreamEvent::Loaded { .. } => stats.loaded += 1,
                StreamEvent::Activated { .. } => stats.activated += 1,
                StreamEvent::Deactivated { .. } => stats.deactivated += 1,
                StreamEvent::Unloaded { .. } => stats.unloaded += 1,
                StreamEvent::Transferred { .. } => stats.transferred += 1,
                StreamEvent::Parked { .. } => stats.parked += 1,
            }
        }
        stats.active_scenes = self.active_scene_count();
        stats.limbo_objects = self.bindings.limbo().len();
        stats.tick_time = tick_start.elapsed();
        self.stats = stats;
    }
}
