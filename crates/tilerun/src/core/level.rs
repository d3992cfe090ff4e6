use crate::api::config::{FrameContext, LevelConfig};
use crate::api::types::EntityId;
use crate::collision::entities::{EntityCollider, OverlapCollider};
use crate::collision::tiles::{TileCollider, TileResolver};
use crate::components::entity::Entity;
use crate::components::layer::{Compositor, DrawContext};
use crate::components::tilemap::CollisionMatrix;
use crate::error::LevelError;
use crate::renderer::camera::Camera;
use crate::renderer::instance::RenderBuffer;

/// Live simulation state: entities, the collision grid and render layers.
///
/// Entities are kept in a flat Vec, designed for small-to-medium counts
/// (hundreds, not millions). Their order never affects the outcome of a
/// frame because `update` runs each pass over every entity before starting
/// the next one.
pub struct Level {
    /// Render layers in draw order.
    pub compositor: Compositor,
    /// Downward acceleration handed to entities each frame.
    pub gravity: f32,
    /// Simulated seconds since the level started.
    pub total_time: f32,
    entities: Vec<Entity>,
    collision_grid: Option<CollisionMatrix>,
    tile_collider: Box<dyn TileCollider>,
    entity_collider: Box<dyn EntityCollider>,
    next_id: u32,
}

impl Level {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            compositor: Compositor::new(),
            gravity: config.gravity,
            total_time: 0.0,
            entities: Vec::with_capacity(64),
            collision_grid: None,
            tile_collider: Box::new(TileResolver::from_config(config)),
            entity_collider: Box::new(OverlapCollider),
            next_id: 1,
        }
    }

    // -- Collision setup --

    /// Install the collision grid. Until this is called, `update` refuses to
    /// run collision checks.
    pub fn set_collision_grid(&mut self, grid: CollisionMatrix) {
        self.collision_grid = Some(grid);
    }

    pub fn collision_grid(&self) -> Option<&CollisionMatrix> {
        self.collision_grid.as_ref()
    }

    /// Replace the default `TileResolver`.
    pub fn set_tile_collider(&mut self, collider: Box<dyn TileCollider>) {
        self.tile_collider = collider;
    }

    /// Replace the default `OverlapCollider`.
    pub fn set_entity_collider(&mut self, collider: Box<dyn EntityCollider>) {
        self.entity_collider = collider;
    }

    // -- Entities --

    /// Add an entity, assigning it a fresh id.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // -- Frame --

    /// Advance the simulation by `dt` seconds.
    ///
    /// Three passes over all entities, each finished before the next starts:
    /// update (free motion), collision, finalize. The collision pass resolves
    /// every entity against the tiles first and only then compares entities
    /// with each other.
    /// Fails before touching anything if there are entities to check but no
    /// collision grid has been set.
    pub fn update(&mut self, dt: f32) -> Result<(), LevelError> {
        let grid = match &self.collision_grid {
            Some(grid) => Some(grid),
            None if self.entities.is_empty() => None,
            None => return Err(LevelError::MissingCollisionGrid),
        };

        let (gravity, total_time) = (self.gravity, self.total_time);

        run_pass(&mut self.entities, gravity, total_time, |entity, ctx| {
            entity.update(dt, ctx)
        });

        if let Some(grid) = grid {
            // Every entity is settled against the tiles before any pair is compared.
            for entity in self.entities.iter_mut() {
                self.tile_collider.check(grid, entity);
            }
            for index in 0..self.entities.len() {
                self.entity_collider.check(index, &mut self.entities);
            }
        }

        run_pass(&mut self.entities, gravity, total_time, |entity, ctx| {
            entity.finalize(dt, ctx)
        });

        self.total_time += dt;
        Ok(())
    }

    /// Draw every compositor layer into `out`, replacing its contents.
    pub fn draw(&self, camera: &Camera, out: &mut RenderBuffer) {
        out.clear();
        let ctx = DrawContext {
            camera,
            entities: &self.entities,
        };
        self.compositor.draw(&ctx, out);
    }
}

/// Run `f` on every entity in order, lending it a view of all the others.
fn run_pass(
    entities: &mut [Entity],
    gravity: f32,
    total_time: f32,
    mut f: impl FnMut(&mut Entity, &FrameContext<'_>),
) {
    for index in 0..entities.len() {
        let (before, rest) = entities.split_at_mut(index);
        let Some((entity, after)) = rest.split_first_mut() else {
            break;
        };
        let ctx = FrameContext::new(gravity, total_time).with_others(before, after);
        f(entity, &ctx);
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new(&LevelConfig::default())
    }
}
