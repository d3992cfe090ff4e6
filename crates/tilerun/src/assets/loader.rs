//! Reading level and sprite sheet files.
//!
//! Paths handed to an `AssetSource` are relative, `/`-separated asset paths:
//! `levels/<name>.json` and `sprites/<sheet>.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::de::DeserializeOwned;

use crate::api::config::LevelConfig;
use crate::assets::manifest::{LevelSpec, SpriteSheetSpec};
use crate::assets::registry::SpriteSheet;
use crate::core::level::Level;
use crate::error::LevelError;
use crate::systems::build::{EntityFactory, LevelBuilder};

/// Sprite sheet used when a level does not name one.
pub const DEFAULT_SPRITE_SHEET: &str = "tiles";

/// Somewhere asset files can be read from.
pub trait AssetSource {
    fn read(&self, path: &str) -> Result<String, LevelError>;
}

/// Assets on the local filesystem, below a base directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    base_dir: PathBuf,
}

impl DirSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }
}

impl AssetSource for DirSource {
    fn read(&self, path: &str) -> Result<String, LevelError> {
        let full_path = self.resolve(path);
        std::fs::read_to_string(&full_path).map_err(|source| LevelError::Io { path: full_path, source })
    }
}

/// Assets held in memory, keyed by asset path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn with(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<String, LevelError> {
        self.files.get(path).cloned().ok_or_else(|| LevelError::Io {
            path: PathBuf::from(path),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such asset"),
        })
    }
}

fn read_json<T: DeserializeOwned>(source: &dyn AssetSource, path: &str) -> Result<T, LevelError> {
    let text = source.read(path)?;
    serde_json::from_str(&text).map_err(|source| LevelError::Json {
        path: PathBuf::from(path),
        source,
    })
}

/// Read `levels/<name>.json`.
pub fn load_level_spec(source: &dyn AssetSource, name: &str) -> Result<LevelSpec, LevelError> {
    read_json(source, &format!("levels/{name}.json"))
}

/// Read `sprites/<name>.json`.
pub fn load_sprite_sheet(source: &dyn AssetSource, name: &str) -> Result<SpriteSheetSpec, LevelError> {
    read_json(source, &format!("sprites/{name}.json"))
}

/// Loads levels by name from an asset source and builds them.
pub struct LevelLoader<S> {
    source: S,
    factory: EntityFactory,
    config: LevelConfig,
}

impl<S: AssetSource> LevelLoader<S> {
    pub fn new(source: S, factory: EntityFactory) -> Self {
        Self {
            source,
            factory,
            config: LevelConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LevelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn factory_mut(&mut self) -> &mut EntityFactory {
        &mut self.factory
    }

    /// Load the level spec, then its sprite sheet, then build.
    /// Any failure is returned as is; no partially built level escapes.
    pub fn load(&self, name: &str) -> Result<Level, LevelError> {
        let spec = load_level_spec(&self.source, name)?;
        let sheet_name = spec.sprite_sheet.as_deref().unwrap_or(DEFAULT_SPRITE_SHEET);
        let sheet = SpriteSheet::from_spec(&load_sprite_sheet(&self.source, sheet_name)?);

        let level = LevelBuilder::new(&self.factory, Rc::new(sheet))
            .with_config(self.config.clone())
            .build(&spec)?;

        log::info!(
            "loaded level `{}` (sheet `{}`, {} entities)",
            name,
            sheet_name,
            level.len()
        );
        Ok(level)
    }
}
