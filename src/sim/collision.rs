//! Axis-aligned rectangle geometry
//!
//! Every collision in the game is between axis-aligned boxes. Two flavours of
//! overlap test exist because resolution snaps boxes exactly onto edges:
//! - `overlaps` requires a positive-area intersection, so a box resting on a
//!   surface is not considered embedded in it
//! - `intersects` also accepts edge contact, used for actor-vs-actor touches

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Box of the given size whose bottom edge is centred on `point`
    pub fn from_midbottom(point: Vec2, size: Vec2) -> Self {
        Self {
            pos: Vec2::new(point.x - size.x / 2.0, point.y - size.y),
            size,
        }
    }

    /// Box of the given size centred on `point`
    pub fn from_center(point: Vec2, size: Vec2) -> Self {
        Self {
            pos: point - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.bottom())
    }

    pub fn set_left(&mut self, x: f32) {
        self.pos.x = x;
    }

    pub fn set_right(&mut self, x: f32) {
        self.pos.x = x - self.size.x;
    }

    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// Closed overlap test: boxes sharing only an edge count as touching
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Strict overlap test: the intersection must have positive area
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.spans_x(other) && self.top() < other.bottom() && self.bottom() > other.top()
    }

    /// Strict horizontal overlap, ignoring the vertical axis
    #[inline]
    pub fn spans_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Closed point containment
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// Free-function form of [`Aabb::intersects`]
#[inline]
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_edge_contact_intersects_but_does_not_overlap() {
        let floor = Aabb::new(0.0, 100.0, 200.0, 20.0);
        let standing = Aabb::new(50.0, 40.0, 20.0, 60.0);

        assert_eq!(standing.bottom(), floor.top());
        assert!(intersects(&standing, &floor));
        assert!(!standing.overlaps(&floor));
    }

    #[test]
    fn test_disjoint_boxes() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.5, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_setters_snap_edges() {
        let mut r = Aabb::new(0.0, 0.0, 60.0, 80.0);
        r.set_bottom(650.0);
        assert_eq!(r.bottom(), 650.0);
        assert_eq!(r.top(), 570.0);
        r.set_right(1300.0);
        assert_eq!(r.right(), 1300.0);
        assert_eq!(r.left(), 1240.0);
    }

    #[test]
    fn test_midbottom_round_trip() {
        let r = Aabb::from_midbottom(Vec2::new(1200.0, 650.0), Vec2::new(60.0, 80.0));
        assert_eq!(r.left(), 1170.0);
        assert_eq!(r.top(), 570.0);
        assert_eq!(r.midbottom(), Vec2::new(1200.0, 650.0));
    }

    #[test]
    fn test_contains_point_on_edge() {
        let r = Aabb::new(10.0, 10.0, 10.0, 10.0);
        assert!(r.contains_point(Vec2::new(10.0, 20.0)));
        assert!(!r.contains_point(Vec2::new(9.9, 15.0)));
    }

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..200.0, 1.0f32..200.0)
            .prop_map(|(x, y, w, h)| Aabb::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_intersects_is_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_overlap_implies_intersect(a in arb_box(), b in arb_box()) {
            if a.overlaps(&b) {
                prop_assert!(a.intersects(&b));
            }
        }

        #[test]
        fn prop_box_overlaps_itself(a in arb_box()) {
            prop_assert!(a.overlaps(&a));
        }
    }
}
