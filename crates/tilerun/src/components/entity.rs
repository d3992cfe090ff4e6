use std::fmt;

use glam::Vec2;
use crate::api::config::FrameContext;
use crate::api::types::{EntityId, Side};
use crate::collision::tiles::TileMatch;
use crate::components::behavior::Behavior;
use crate::core::bounds::BoundingBox;

/// Fat Entity: a single struct with motion state plus a list of behaviors.
/// Behaviors run in insertion order for every hook.
pub struct Entity {
    /// Unique identifier, assigned when the entity is spawned into a level.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Position in world space (top-left of the sprite, Y down).
    pub pos: Vec2,
    /// Velocity in world units per second.
    pub vel: Vec2,
    /// Bounding box size.
    pub size: Vec2,
    /// Bounding box offset from `pos`. May be negative.
    pub offset: Vec2,
    /// Seconds this entity has been updated for.
    pub lifetime: f32,
    /// Sprite name drawn by the sprite layer (entities without one are invisible).
    pub sprite: Option<String>,
    behaviors: Vec<Box<dyn Behavior>>,
}

impl Entity {
    /// Create an unspawned entity at the origin with an empty box.
    pub fn new() -> Self {
        Self {
            id: EntityId::default(),
            tag: String::new(),
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::ZERO,
            offset: Vec2::ZERO,
            lifetime: 0.0,
            sprite: None,
            behaviors: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behaviors.push(Box::new(behavior));
        self
    }

    // -- Bounds --

    /// Read-only view of the bounding box.
    pub fn bounds(&self) -> BoundingBox<'_, &Vec2> {
        BoundingBox::new(&self.pos, &self.size, &self.offset)
    }

    /// Bounding box whose edge setters move this entity.
    pub fn bounds_mut(&mut self) -> BoundingBox<'_, &mut Vec2> {
        BoundingBox::new(&mut self.pos, &self.size, &self.offset)
    }

    // -- Behaviors --

    pub fn add_behavior(&mut self, behavior: impl Behavior + 'static) {
        self.behaviors.push(Box::new(behavior));
    }

    /// Find the first behavior of type `T`.
    pub fn behavior<T: Behavior + 'static>(&self) -> Option<&T> {
        self.behaviors
            .iter()
            .find_map(|b| b.as_any().downcast_ref::<T>())
    }

    pub fn behavior_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.behaviors.iter().map(|b| b.name())
    }

    /// Run `f` over each behavior with mutable access to the rest of the entity.
    /// Behaviors added from inside `f` are kept and run from the next hook on.
    fn each_behavior(&mut self, mut f: impl FnMut(&mut Box<dyn Behavior>, &mut Entity)) {
        let mut behaviors = std::mem::take(&mut self.behaviors);
        for behavior in behaviors.iter_mut() {
            f(behavior, self);
        }
        behaviors.append(&mut self.behaviors);
        self.behaviors = behaviors;
    }

    /// Free integration step. Runs during the update pass.
    pub fn update(&mut self, dt: f32, ctx: &FrameContext) {
        self.each_behavior(|b, entity| b.update(entity, dt, ctx));
        self.lifetime += dt;
    }

    /// Called by a tile collider after it pushed this entity out of a tile.
    pub fn obstruct(&mut self, side: Side, tile: &TileMatch<'_>) {
        self.each_behavior(|b, entity| b.obstruct(entity, side, tile));
    }

    /// Called by an entity collider when `other` overlaps this entity.
    pub fn collides(&mut self, other: &Entity) {
        self.each_behavior(|b, entity| b.collides(entity, other));
    }

    /// Post-collision reconciliation. Runs during the finalize pass.
    pub fn finalize(&mut self, dt: f32, ctx: &FrameContext) {
        self.each_behavior(|b, entity| b.finalize(entity, dt, ctx));
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("pos", &self.pos)
            .field("vel", &self.vel)
            .field("size", &self.size)
            .field("offset", &self.offset)
            .field("lifetime", &self.lifetime)
            .field("sprite", &self.sprite)
            .field("behaviors", &self.behavior_names().collect::<Vec<_>>())
            .finish()
    }
}
