//! # Store Module
//!
//! Persistence adapter for pantry and recipe documents. The engine itself never
//! touches storage; the application loads a snapshot through a [`KeyValueStore`],
//! runs calculations and mutations in memory, then writes the result back.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::inventory::Pantry;
use crate::recipe::Recipe;

pub const PANTRY_KEY: &str = "pantry";
pub const RECIPES_KEY: &str = "recipes";

/// Opaque document storage addressed by string keys
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.documents.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.documents.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store writing one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory when needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        info!(dir = %dir.display(), "Opened JSON file store");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "No document stored yet");
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        fs::rename(&staging, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!(key, bytes = value.len(), "Document stored");
        Ok(())
    }
}

/// Load the pantry, or an empty one when nothing is stored yet
pub fn load_pantry(store: &impl KeyValueStore, history_limit: usize) -> Result<Pantry> {
    let pantry = match store.get(PANTRY_KEY)? {
        Some(json) => serde_json::from_str::<Pantry>(&json)
            .context("Failed to parse stored pantry")?
            .with_history_limit(history_limit),
        None => Pantry::new().with_history_limit(history_limit),
    };
    info!(ingredients = pantry.len(), "Pantry loaded");
    Ok(pantry)
}

pub fn save_pantry(store: &mut impl KeyValueStore, pantry: &Pantry) -> Result<()> {
    let json = serde_json::to_string_pretty(pantry).context("Failed to serialize pantry")?;
    store.put(PANTRY_KEY, &json)?;
    info!(ingredients = pantry.len(), "Pantry saved");
    Ok(())
}

/// Load the recipe catalog, or an empty one when nothing is stored yet
pub fn load_recipes(store: &impl KeyValueStore) -> Result<Vec<Recipe>> {
    let recipes = match store.get(RECIPES_KEY)? {
        Some(json) => serde_json::from_str(&json).context("Failed to parse stored recipes")?,
        None => Vec::new(),
    };
    info!(recipes = recipes.len(), "Recipe catalog loaded");
    Ok(recipes)
}

pub fn save_recipes(store: &mut impl KeyValueStore, recipes: &[Recipe]) -> Result<()> {
    let json = serde_json::to_string_pretty(recipes).context("Failed to serialize recipes")?;
    store.put(RECIPES_KEY, &json)?;
    info!(recipes = recipes.len(), "Recipe catalog saved");
    Ok(())
}
