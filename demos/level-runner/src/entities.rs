use glam::Vec2;
use tilerun::{Entity, EntityFactory, Footing, Gravity, Velocity, Walk};

/// Walking speed of enemies, in world units per second.
const GOOMBA_SPEED: f32 = 30.0;

pub fn mario() -> Entity {
    Entity::new()
        .with_tag("mario")
        .with_size(Vec2::new(14.0, 16.0))
        .with_offset(Vec2::new(1.0, 0.0))
        .with_sprite("mario-idle")
        .with_behavior(Gravity::default())
        .with_behavior(Velocity)
        .with_behavior(Footing::default())
}

pub fn goomba() -> Entity {
    Entity::new()
        .with_tag("goomba")
        .with_size(Vec2::new(16.0, 16.0))
        .with_sprite("goomba")
        .with_behavior(Gravity::default())
        .with_behavior(Walk::new(GOOMBA_SPEED))
        .with_behavior(Velocity)
        .with_behavior(Footing::default())
}

pub fn factory() -> EntityFactory {
    EntityFactory::new().with("mario", mario).with("goomba", goomba)
}
