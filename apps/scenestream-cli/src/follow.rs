use glam::Vec2;

/// Move `current` toward `target` by at most `max_step`.
pub fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_step
    }
}

/// Camera that chases a target point at a fixed maximum speed per tick.
///
/// Its position is what the streaming controller tracks.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    pub position: Vec2,
    pub max_step: f32,
}

impl FollowCamera {
    pub fn new(position: Vec2, max_step: f32) -> Self {
        Self { position, max_step }
    }

    pub fn follow(&mut self, target: Vec2) -> Vec2 {
        self.position = move_towards(self.position, target, self.max_step);
        self.position
    }
}

/// Step an object toward `target`, stopping `stopping_distance` short of it.
pub fn chase_step(current: Vec2, target: Vec2, max_step: f32, stopping_distance: f32) -> Vec2 {
    if current.distance(target) <= stopping_distance {
        return Vec2::ZERO;
    }
    move_towards(current, target, max_step) - current
}
