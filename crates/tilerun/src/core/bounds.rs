//! Axis-aligned bounding box used by all collision math.
//!
//! A `BoundingBox` does not own anything. It borrows an entity's position,
//! size and offset and recomputes every edge on access, so it always reflects
//! the latest mutation. Boxes built over `&mut Vec2` can also move the entity
//! by assigning an edge: "put my bottom at y" without knowing the box's size
//! or offset.

use std::ops::{Deref, DerefMut};

use glam::Vec2;

/// Live view of a rectangle derived from `position + offset` and `size`.
///
/// `P` is the position borrow: `&Vec2` for a read-only view, `&mut Vec2`
/// for a box whose edge setters reposition the owner.
#[derive(Debug)]
pub struct BoundingBox<'a, P> {
    position: P,
    size: &'a Vec2,
    offset: &'a Vec2,
}

impl<'a, P> BoundingBox<'a, P>
where
    P: Deref<Target = Vec2>,
{
    pub fn new(position: P, size: &'a Vec2, offset: &'a Vec2) -> Self {
        Self { position, size, offset }
    }

    pub fn top(&self) -> f32 {
        self.position.y + self.offset.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y + self.offset.y
    }

    pub fn left(&self) -> f32 {
        self.position.x + self.offset.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x + self.offset.x
    }

    pub fn center_x(&self) -> f32 {
        self.position.x + self.offset.x + (self.size.x / 2.0).floor()
    }

    pub fn center_y(&self) -> f32 {
        self.position.y + self.offset.y + (self.size.y / 2.0).floor()
    }

    /// Closed-interval overlap test on both axes.
    /// Boxes that only touch along an edge count as overlapping, which is
    /// how resting contact gets detected.
    pub fn overlaps<Q>(&self, other: &BoundingBox<'_, Q>) -> bool
    where
        Q: Deref<Target = Vec2>,
    {
        self.top() <= other.bottom()
            && self.bottom() >= other.top()
            && self.left() <= other.right()
            && self.right() >= other.left()
    }
}

impl<P> BoundingBox<'_, P>
where
    P: DerefMut<Target = Vec2>,
{
    pub fn set_top(&mut self, y: f32) {
        self.position.y = y - self.offset.y;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.position.y = y - self.size.y - self.offset.y;
    }

    pub fn set_left(&mut self, x: f32) {
        self.position.x = x - self.offset.x;
    }

    pub fn set_right(&mut self, x: f32) {
        self.position.x = x - self.size.x - self.offset.x;
    }
}
