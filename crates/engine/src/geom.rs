use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::Deserialize;

/// World-space vector. One unit is one tile; `y` grows upward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Size2 {
    pub width: f32,
    pub height: f32,
}

impl Size2 {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }
}

/// Axis-aligned box anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Size2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Size2) -> Self {
        Self { pos, size }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.width
    }

    pub fn top(&self) -> f32 {
        self.pos.y + self.size.height
    }

    pub fn translated(&self, delta: Vec2) -> Rect {
        Rect::new(self.pos + delta, self.size)
    }

    pub fn inflated(&self, margin: f32) -> Rect {
        Rect::new(
            Vec2::new(self.pos.x - margin, self.pos.y - margin),
            Size2::new(
                self.size.width + margin * 2.0,
                self.size.height + margin * 2.0,
            ),
        )
    }

    /// Strict intersection: boxes sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && other.pos.x < self.right()
            && self.pos.y < other.top()
            && other.pos.y < self.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Size2::new(w, h))
    }

    #[test]
    fn shared_edge_is_not_overlap() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 1.0, 1.0);
        assert!(!a.overlaps(&b));
        assert!(a.inflated(0.01).overlaps(&b));
    }

    #[test]
    fn contained_box_overlaps() {
        let outer = rect(-2.0, -2.0, 4.0, 4.0);
        let inner = rect(-0.5, 0.5, 0.1, 0.1);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn translated_keeps_size() {
        let moved = rect(1.0, 2.0, 3.0, 4.0).translated(Vec2::new(-1.0, 0.5));
        assert_eq!(moved, rect(0.0, 2.5, 3.0, 4.0));
    }
}
