use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// Streaming configuration: distance bands and the per-tick evaluation budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Outer radius. A scene whose rectangle is farther than this from the
    /// tracked position is unloaded; closer than this, it is loaded.
    pub buffer_distance: f32,
    /// Inner radius. Within it a loaded scene's content is visible; beyond it
    /// the content goes dormant.
    pub active_distance: f32,
    /// Evaluations per tick before the scheduler yields back to the host.
    pub max_evaluations_per_tick: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_distance: 80.0,
            active_distance: 40.0,
            max_evaluations_per_tick: 15,
        }
    }
}

impl StreamConfig {
    /// Reject configurations the state machine cannot honour.
    pub fn validate(&self) -> Result<(), StreamError> {
        if !self.active_distance.is_finite() || self.active_distance <= 0.0 {
            return Err(StreamError::InvalidConfig(format!(
                "active_distance must be positive and finite, got {}",
                self.active_distance
            )));
        }
        if !self.buffer_distance.is_finite() || self.buffer_distance <= self.active_distance {
            return Err(StreamError::InvalidConfig(format!(
                "buffer_distance ({}) must be finite and greater than active_distance ({})",
                self.buffer_distance, self.active_distance
            )));
        }
        if self.max_evaluations_per_tick == 0 {
            return Err(StreamError::InvalidConfig(
                "max_evaluations_per_tick must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn sqr_buffer_distance(&self) -> f32 {
        self.buffer_distance * self.buffer_distance
    }

    pub fn sqr_active_distance(&self) -> f32 {
        self.active_distance * self.active_distance
    }

    /// Ticks needed to evaluate every scene once: `ceil(scene_count / budget)`.
    pub fn ticks_per_cycle(&self, scene_count: usize) -> usize {
        scene_count.div_ceil(self.max_evaluations_per_tick.max(1))
    }
}

/// Per-tick streaming statistics for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    pub evaluated: usize,
    pub loaded: usize,
    pub unloaded: usize,
    pub activated: usize,
    pub deactivated: usize,
    pub transferred: usize,
    pub parked: usize,
    pub active_scenes: usize,
    pub limbo_objects: usize,
    pub tick_time: Duration,
}
