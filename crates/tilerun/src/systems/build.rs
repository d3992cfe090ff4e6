//! Turns a parsed `LevelSpec` into a live `Level`.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use crate::api::config::LevelConfig;
use crate::assets::manifest::{LayerSpec, LevelSpec, PatternSpec, TileSpec};
use crate::assets::registry::SpriteSheet;
use crate::components::entity::Entity;
use crate::components::tilemap::{CollisionMatrix, CollisionTile, TileCell, TileMatrix};
use crate::core::level::Level;
use crate::error::LevelError;
use crate::systems::expand::expand_tiles;
use crate::systems::render::{SpriteLayer, TileLayer};

type Constructor = Box<dyn Fn() -> Entity>;

/// Maps entity names used in level files to constructors.
#[derive(Default)]
pub struct EntityFactory {
    constructors: HashMap<String, Constructor>,
}

impl EntityFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor. Re-registering a name replaces it.
    pub fn register(&mut self, name: impl Into<String>, constructor: impl Fn() -> Entity + 'static) {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    pub fn with(mut self, name: impl Into<String>, constructor: impl Fn() -> Entity + 'static) -> Self {
        self.register(name, constructor);
        self
    }

    /// Build a fresh entity. The tag defaults to `name` when the constructor leaves it empty.
    pub fn create(&self, name: &str) -> Result<Entity, LevelError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| LevelError::UnknownEntity { name: name.to_string() })?;
        let mut entity = constructor();
        if entity.tag.is_empty() {
            entity.tag = name.to_string();
        }
        Ok(entity)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

impl fmt::Debug for EntityFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.constructors.keys().collect();
        names.sort();
        f.debug_struct("EntityFactory").field("names", &names).finish()
    }
}

/// Merge the collision types of every layer into one grid.
/// Layers are applied in order, so a later layer overrides an earlier one
/// cell by cell, typed or not.
pub fn create_collision_matrix(
    layers: &[LayerSpec],
    patterns: &HashMap<String, PatternSpec>,
) -> Result<CollisionMatrix, LevelError> {
    let mut grid = CollisionMatrix::new();
    for layer in layers {
        for placement in expand_tiles(&layer.tiles, patterns) {
            let placement = placement?;
            grid.set(
                placement.x,
                placement.y,
                CollisionTile {
                    tile_type: placement.tile.tile_type.clone(),
                },
            );
        }
    }
    Ok(grid)
}

/// Sprite names of one layer.
pub fn create_tile_matrix(
    tiles: &[TileSpec],
    patterns: &HashMap<String, PatternSpec>,
) -> Result<TileMatrix, LevelError> {
    let mut matrix = TileMatrix::new();
    for placement in expand_tiles(tiles, patterns) {
        let placement = placement?;
        matrix.set(
            placement.x,
            placement.y,
            TileCell {
                name: placement.tile.name.clone(),
            },
        );
    }
    Ok(matrix)
}

/// Builds levels from specs, spawning entities through an `EntityFactory`.
///
/// The resulting compositor holds one `background-N` tile layer per spec
/// layer (1-based, in order) followed by a `sprites` layer.
pub struct LevelBuilder<'f> {
    config: LevelConfig,
    factory: &'f EntityFactory,
    sheet: Rc<SpriteSheet>,
}

impl<'f> LevelBuilder<'f> {
    pub fn new(factory: &'f EntityFactory, sheet: Rc<SpriteSheet>) -> Self {
        Self {
            config: LevelConfig::default(),
            factory,
            sheet,
        }
    }

    pub fn with_config(mut self, config: LevelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(&self, spec: &LevelSpec) -> Result<Level, LevelError> {
        let mut level = Level::new(&self.config);

        let grid = create_collision_matrix(&spec.layers, &spec.patterns)?;

        for (index, layer) in spec.layers.iter().enumerate() {
            let tiles = create_tile_matrix(&layer.tiles, &spec.patterns)?;
            let name = format!("background-{}", index + 1);
            self.warn_missing_sprites(&name, &tiles);
            level.compositor.set(
                name,
                Box::new(TileLayer::new(tiles, self.sheet.clone(), self.config.tile_size)),
            );
        }
        level
            .compositor
            .set("sprites", Box::new(SpriteLayer::new(self.sheet.clone())));

        for placed in &spec.entities {
            let mut entity = self.factory.create(&placed.name)?;
            entity.pos = Vec2::from(placed.position);
            level.spawn(entity);
        }

        log::debug!(
            "built level: {} layers, {} collision cells, {} entities",
            spec.layers.len(),
            grid.len(),
            level.len()
        );
        level.set_collision_grid(grid);
        Ok(level)
    }

    fn warn_missing_sprites(&self, layer: &str, tiles: &TileMatrix) {
        let missing: BTreeSet<&str> = tiles
            .iter()
            .filter_map(|(_, _, cell)| cell.name.as_deref())
            .filter(|name| self.sheet.get(name).is_none())
            .collect();
        for name in missing {
            log::warn!("{layer}: tile `{name}` is not in sprite sheet {}", self.sheet.image_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::manifest::EntitySpec;
    use crate::components::behavior::{Gravity, Velocity};

    fn tile(name: Option<&str>, tile_type: Option<&str>, ranges: Vec<Vec<i32>>) -> TileSpec {
        TileSpec {
            name: name.map(str::to_string),
            tile_type: tile_type.map(str::to_string),
            ranges,
            ..Default::default()
        }
    }

    fn pattern_ref(pattern: &str, ranges: Vec<Vec<i32>>) -> TileSpec {
        TileSpec {
            pattern: Some(pattern.to_string()),
            ranges,
            ..Default::default()
        }
    }

    fn sheet() -> Rc<SpriteSheet> {
        let mut sheet = SpriteSheet::new("tiles.png", 16, 16);
        sheet.define("ground", 0, 0);
        sheet.define("sky", 3, 23);
        Rc::new(sheet)
    }

    fn factory() -> EntityFactory {
        EntityFactory::new()
            .with("mario", || {
                Entity::new()
                    .with_size(Vec2::new(14.0, 16.0))
                    .with_behavior(Gravity::default())
                    .with_behavior(Velocity)
            })
            .with("goomba", || Entity::new().with_tag("enemy").with_size(Vec2::new(16.0, 16.0)))
    }

    fn two_layer_spec() -> LevelSpec {
        LevelSpec {
            layers: vec![
                LayerSpec {
                    tiles: vec![
                        tile(Some("sky"), None, vec![vec![0, 4, 0, 2]]),
                        tile(Some("ground"), Some("ground"), vec![vec![0, 4, 2]]),
                    ],
                },
                LayerSpec {
                    tiles: vec![tile(Some("sky"), None, vec![vec![1, 2]])],
                },
            ],
            entities: vec![EntitySpec {
                name: "mario".to_string(),
                position: [8.0, 4.0],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn later_layer_wins_collision() {
        let spec = two_layer_spec();
        let grid = create_collision_matrix(&spec.layers, &spec.patterns).unwrap();

        assert_eq!(grid.len(), 12);
        assert_eq!(grid.get(0, 2).unwrap().tile_type.as_deref(), Some("ground"));
        assert_eq!(grid.get(1, 2).unwrap().tile_type, None);
        assert_eq!(grid.get(0, 0).unwrap().tile_type, None);
        assert!(grid.get(4, 2).is_none());
    }

    #[test]
    fn later_entry_wins_within_layer() {
        let tiles = vec![
            tile(Some("ground"), Some("ground"), vec![vec![0, 3, 0]]),
            tile(Some("brick"), Some("brick"), vec![vec![1, 0]]),
        ];
        let patterns = HashMap::new();
        let matrix = create_tile_matrix(&tiles, &patterns).unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(1, 0).unwrap().name.as_deref(), Some("brick"));
        assert_eq!(matrix.get(2, 0).unwrap().name.as_deref(), Some("ground"));
    }

    #[test]
    fn tile_matrices_stay_per_layer() {
        let spec = two_layer_spec();
        let first = create_tile_matrix(&spec.layers[0].tiles, &spec.patterns).unwrap();
        let second = create_tile_matrix(&spec.layers[1].tiles, &spec.patterns).unwrap();
        assert_eq!(first.len(), 12);
        assert_eq!(first.get(1, 2).unwrap().name.as_deref(), Some("ground"));
        assert_eq!(second.len(), 1);
        assert_eq!(second.get(1, 2).unwrap().name.as_deref(), Some("sky"));
    }

    #[test]
    fn patterns_feed_both_grids() {
        let mut patterns = HashMap::new();
        patterns.insert(
            "step".to_string(),
            PatternSpec {
                tiles: vec![tile(Some("ground"), Some("ground"), vec![vec![0, 2, 1], vec![1, 0]])],
            },
        );
        let layers = vec![LayerSpec {
            tiles: vec![pattern_ref("step", vec![vec![10, 5], vec![20, 5]])],
        }];

        let grid = create_collision_matrix(&layers, &patterns).unwrap();
        let tiles = create_tile_matrix(&layers[0].tiles, &patterns).unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(tiles.len(), 6);
        for (x, y) in [(10, 6), (11, 6), (11, 5), (20, 6), (21, 6), (21, 5)] {
            assert!(grid.get(x, y).unwrap().is_one_of(&["ground".to_string()]), "({x}, {y})");
        }
    }

    #[test]
    fn build_wires_layers_entities_and_grid() {
        let factory = factory();
        let level = LevelBuilder::new(&factory, sheet())
            .build(&two_layer_spec())
            .unwrap();

        assert_eq!(
            level.compositor.names().collect::<Vec<_>>(),
            vec!["background-1", "background-2", "sprites"]
        );
        assert_eq!(level.collision_grid().unwrap().len(), 12);

        assert_eq!(level.len(), 1);
        let mario = &level.entities()[0];
        assert_eq!(mario.tag, "mario");
        assert_eq!(mario.pos, Vec2::new(8.0, 4.0));
        assert_ne!(mario.id.0, 0);
    }

    #[test]
    fn build_uses_config() {
        let factory = factory();
        let config = LevelConfig { gravity: 900.0, ..Default::default() };
        let level = LevelBuilder::new(&factory, sheet())
            .with_config(config)
            .build(&LevelSpec::default())
            .unwrap();
        assert_eq!(level.gravity, 900.0);
        assert_eq!(level.compositor.names().collect::<Vec<_>>(), vec!["sprites"]);
        assert!(level.collision_grid().is_some());
    }

    #[test]
    fn unknown_entity_aborts_build() {
        let factory = factory();
        let mut spec = two_layer_spec();
        spec.entities.push(EntitySpec {
            name: "bowser".to_string(),
            position: [0.0, 0.0],
        });

        let err = LevelBuilder::new(&factory, sheet()).build(&spec).err().unwrap();
        assert!(matches!(err, LevelError::UnknownEntity { ref name } if name == "bowser"));
    }

    #[test]
    fn expansion_errors_abort_build() {
        let factory = factory();
        let spec = LevelSpec {
            layers: vec![LayerSpec {
                tiles: vec![pattern_ref("missing", vec![vec![0, 0]])],
            }],
            ..Default::default()
        };
        let err = LevelBuilder::new(&factory, sheet()).build(&spec).err().unwrap();
        assert!(matches!(err, LevelError::UnknownPattern { .. }));
    }

    #[test]
    fn factory_builds_fresh_entities() {
        let factory = factory();
        let mut a = factory.create("goomba").unwrap();
        let b = factory.create("goomba").unwrap();
        a.pos.x = 50.0;
        assert_eq!(b.pos.x, 0.0);
        assert_eq!(b.tag, "enemy");
        assert!(factory.contains("mario"));
        assert!(!factory.contains("koopa"));
        assert!(format!("{factory:?}").contains("goomba"));
    }

    #[test]
    fn built_level_steps() {
        let factory = factory();
        let mut level = LevelBuilder::new(&factory, sheet())
            .build(&two_layer_spec())
            .unwrap();
        for _ in 0..60 {
            level.update(1.0 / 60.0).unwrap();
        }
        // Column 0 has ground at row 2, so mario rests on y = 32.
        assert_eq!(level.entities()[0].bounds().bottom(), 32.0);
    }
}
