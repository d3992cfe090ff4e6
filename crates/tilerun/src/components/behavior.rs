//! Pluggable per-entity behaviors.
//!
//! An entity's behaviors are called in insertion order for each hook of the
//! frame pipeline. Every hook has a no-op default, so a behavior only
//! implements what it cares about.

use std::any::Any;

use crate::api::config::FrameContext;
use crate::api::types::Side;
use crate::collision::tiles::TileMatch;
use crate::components::entity::Entity;

pub trait Behavior {
    /// Short identifier used in logs and debug output.
    fn name(&self) -> &'static str;

    /// Update pass: free, unconstrained motion.
    fn update(&mut self, _entity: &mut Entity, _dt: f32, _ctx: &FrameContext) {}

    /// The tile collider pushed the entity out of `tile` through `side`.
    fn obstruct(&mut self, _entity: &mut Entity, _side: Side, _tile: &TileMatch<'_>) {}

    /// The entity's box overlaps `other`'s.
    fn collides(&mut self, _entity: &mut Entity, _other: &Entity) {}

    /// Finalize pass: commit whatever the collision pass decided.
    fn finalize(&mut self, _entity: &mut Entity, _dt: f32, _ctx: &FrameContext) {}

    fn as_any(&self) -> &dyn Any;
}

/// Accelerates the entity downwards by the level's gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Multiplier on the level gravity (1.0 = normal).
    pub scale: f32,
}

impl Default for Gravity {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Behavior for Gravity {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn update(&mut self, entity: &mut Entity, dt: f32, ctx: &FrameContext) {
        entity.vel.y += ctx.gravity * self.scale * dt;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Integrates position from velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity;

impl Behavior for Velocity {
    fn name(&self) -> &'static str {
        "velocity"
    }

    fn update(&mut self, entity: &mut Entity, dt: f32, _ctx: &FrameContext) {
        entity.pos += entity.vel * dt;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Walks at a constant horizontal speed and turns around at walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Walk {
    pub speed: f32,
    /// -1.0 walks left, 1.0 walks right.
    pub direction: f32,
}

impl Walk {
    pub fn new(speed: f32) -> Self {
        Self { speed, direction: -1.0 }
    }
}

impl Behavior for Walk {
    fn name(&self) -> &'static str {
        "walk"
    }

    fn update(&mut self, entity: &mut Entity, _dt: f32, _ctx: &FrameContext) {
        entity.vel.x = self.speed * self.direction;
    }

    fn obstruct(&mut self, _entity: &mut Entity, side: Side, _tile: &TileMatch<'_>) {
        match side {
            Side::Left => self.direction = 1.0,
            Side::Right => self.direction = -1.0,
            Side::Top | Side::Bottom => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Tracks whether the entity stands on solid ground.
///
/// Contacts seen during the collision pass only become visible through
/// `grounded` in the finalize pass, so every behavior sees the same value
/// for the whole update pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Footing {
    grounded: bool,
    contact: bool,
    /// Seconds spent on the ground since the last landing.
    pub ground_time: f32,
}

impl Footing {
    pub fn grounded(&self) -> bool {
        self.grounded
    }
}

impl Behavior for Footing {
    fn name(&self) -> &'static str {
        "footing"
    }

    fn obstruct(&mut self, _entity: &mut Entity, side: Side, _tile: &TileMatch<'_>) {
        if side == Side::Bottom {
            self.contact = true;
        }
    }

    fn finalize(&mut self, entity: &mut Entity, dt: f32, _ctx: &FrameContext) {
        if self.contact && !self.grounded {
            log::debug!("{} landed at {:?}", entity.tag, entity.pos);
        }
        self.ground_time = if self.contact { self.ground_time + dt } else { 0.0 };
        self.grounded = self.contact;
        self.contact = false;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
