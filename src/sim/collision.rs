//! Collision detection for cars
//!
//! Every car is an axis-aligned rectangle, so a crash is a strict
//! rectangle overlap. Touching edges do not count.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
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

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        rects_overlap(self, other)
    }
}

/// Check whether two rectangles overlap
///
/// Overlap iff `a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y`.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_partial() {
        let player = Rect::new(100.0, 500.0, 52.0, 96.0);
        let enemy = Rect::new(120.0, 430.0, 52.0, 96.0);
        assert!(rects_overlap(&player, &enemy));
        assert!(enemy.overlaps(&player));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let player = Rect::new(100.0, 500.0, 52.0, 96.0);
        // Directly above, bumper to bumper
        let above = Rect::new(100.0, 404.0, 52.0, 96.0);
        assert!(!rects_overlap(&player, &above));
        // Directly beside
        let beside = Rect::new(152.0, 500.0, 52.0, 96.0);
        assert!(!rects_overlap(&player, &beside));
    }

    #[test]
    fn test_separate_lanes_miss() {
        let player = Rect::new(154.0, 528.0, 52.0, 96.0);
        let enemy = Rect::new(54.0, 528.0, 52.0, 96.0);
        assert!(!rects_overlap(&player, &enemy));
    }

    #[test]
    fn test_containment_collides() {
        let big = Rect::new(0.0, 0.0, 100.0, 100.0);
        let small = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(rects_overlap(&big, &small));
        assert!(rects_overlap(&small, &big));
    }
}
