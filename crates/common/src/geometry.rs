use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Smallest width or height a scene rectangle may be given.
pub const MIN_SCENE_EXTENT: i32 = 10;

/// Axis-aligned rectangle covering one scene in world space.
///
/// The rectangle is anchored at its top-left corner `(x, y)` and grows
/// downward, so the vertical extent is `[y - height, y]` and the horizontal
/// extent is `[x, x + width]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SceneRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Copy of this rectangle with width and height raised to [`MIN_SCENE_EXTENT`].
    pub fn with_min_extent(self) -> Self {
        Self {
            width: self.width.max(MIN_SCENE_EXTENT),
            height: self.height.max(MIN_SCENE_EXTENT),
            ..self
        }
    }

    pub fn left(&self) -> f32 {
        self.x as f32
    }

    pub fn right(&self) -> f32 {
        self.x as f32 + self.width as f32
    }

    pub fn top(&self) -> f32 {
        self.y as f32
    }

    pub fn bottom(&self) -> f32 {
        self.y as f32 - self.height as f32
    }

    /// Center as stored: `(x + width/2, y + height/2)`.
    ///
    /// This ignores the downward-growing convention; use
    /// [`SceneRect::altered_center`] for the geometric center.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }

    /// Geometric center of the covered area: `(center.x, y - height/2)`.
    pub fn altered_center(&self) -> Vec2 {
        Vec2::new(
            self.center().x,
            self.y as f32 - self.height as f32 * 0.5,
        )
    }

    /// Overlap test against a bounding volume. See [`contains`].
    pub fn contains(&self, bounds: &Bounds2) -> bool {
        contains(self, bounds)
    }

    /// Closest point on (or inside) the rectangle. See [`closest_point`].
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        closest_point(self, point)
    }
}

/// World-space bounding volume of a dynamic object (bottom-left `min`, top-right `max`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Same volume shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Smallest volume covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// True iff `bounds` overlaps `rect` on both axes.
///
/// Despite the name this is an intersection test, not strict containment:
/// a volume straddling an edge counts as contained by both neighbours.
/// Touching edges do not overlap.
pub fn contains(rect: &SceneRect, bounds: &Bounds2) -> bool {
    bounds.min.x < rect.right()
        && bounds.max.x > rect.left()
        && bounds.max.y > rect.bottom()
        && bounds.min.y < rect.top()
}

/// Clamp `point` into the rectangle's extent.
pub fn closest_point(rect: &SceneRect, point: Vec2) -> Vec2 {
    Vec2::new(
        point.x.clamp(rect.left(), rect.right()),
        point.y.clamp(rect.bottom(), rect.top()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_scene() -> SceneRect {
        // spans x in [-50, 50], y in [-25, 25]
        SceneRect::new(-50, 25, 100, 50)
    }

    #[test]
    fn edges_follow_downward_height() {
        let r = unit_scene();
        assert_eq!(r.left(), -50.0);
        assert_eq!(r.right(), 50.0);
        assert_eq!(r.top(), 25.0);
        assert_eq!(r.bottom(), -25.0);
    }

    #[test]
    fn altered_center_is_geometric_center() {
        let r = unit_scene();
        assert_eq!(r.center(), Vec2::new(0.0, 50.0));
        assert_eq!(r.altered_center(), Vec2::ZERO);
    }

    #[test]
    fn min_extent_floors_small_sizes() {
        let r = SceneRect::new(3, 4, 2, 500).with_min_extent();
        assert_eq!(r, SceneRect::new(3, 4, MIN_SCENE_EXTENT, 500));
    }

    #[test]
    fn contains_is_overlap() {
        let r = unit_scene();
        let inside = Bounds2::from_center_size(Vec2::ZERO, Vec2::splat(2.0));
        let straddling = Bounds2::from_center_size(Vec2::new(50.0, 0.0), Vec2::splat(2.0));
        let outside = Bounds2::from_center_size(Vec2::new(60.0, 0.0), Vec2::splat(2.0));
        assert!(r.contains(&inside));
        assert!(r.contains(&straddling));
        assert!(!r.contains(&outside));
    }

    #[test]
    fn contains_checks_vertical_axis_against_inverted_height() {
        let r = unit_scene();
        let above = Bounds2::from_center_size(Vec2::new(0.0, 30.0), Vec2::splat(2.0));
        let below = Bounds2::from_center_size(Vec2::new(0.0, -30.0), Vec2::splat(2.0));
        let low_inside = Bounds2::from_center_size(Vec2::new(0.0, -20.0), Vec2::splat(2.0));
        assert!(!r.contains(&above));
        assert!(!r.contains(&below));
        assert!(r.contains(&low_inside));
    }

    #[test]
    fn touching_edge_does_not_overlap() {
        let r = unit_scene();
        let touching = Bounds2::new(Vec2::new(50.0, -1.0), Vec2::new(52.0, 1.0));
        assert!(!r.contains(&touching));
    }

    #[test]
    fn closest_point_clamps_outside_point() {
        let r = unit_scene();
        assert_eq!(r.closest_point(Vec2::new(200.0, 0.0)), Vec2::new(50.0, 0.0));
        assert_eq!(
            r.closest_point(Vec2::new(-80.0, -90.0)),
            Vec2::new(-50.0, -25.0)
        );
    }

    #[test]
    fn edges_past_i32_range_do_not_overflow() {
        let deep = SceneRect::new(0, i32::MIN + 50, 100, 100);
        assert!(deep.bottom() < i32::MIN as f32);
        let wide = SceneRect::new(i32::MAX - 10, 0, 100, 10);
        assert!(wide.right() > i32::MAX as f32);
        let p = deep.closest_point(Vec2::ZERO);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, deep.top());
    }

    #[test]
    fn closest_point_inside_is_identity() {
        let r = unit_scene();
        let p = Vec2::new(10.0, -5.0);
        assert_eq!(r.closest_point(p), p);
    }

    #[test]
    fn bounds_union_and_translate() {
        let a = Bounds2::new(Vec2::ZERO, Vec2::ONE);
        let b = a.translated(Vec2::new(2.0, 3.0));
        assert_eq!(b.min, Vec2::new(2.0, 3.0));
        let u = a.union(&b);
        assert_eq!(u.min, Vec2::ZERO);
        assert_eq!(u.max, Vec2::new(3.0, 4.0));
        assert_eq!(u.size(), Vec2::new(3.0, 4.0));
    }
}
