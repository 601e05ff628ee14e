//! Scene registry
//!
//! Loads the scenes file (`{"scenes": {<name>: {...}}}`) into an ordered
//! registry shared by both drivers. Only the document shape is checked at
//! load time. A malformed entry is kept and reported when a driver selects
//! it, so shared files may carry entries one tool does not understand.

mod config;
mod selection;

pub use config::{SceneConfig, DEFAULT_HEIGHT, DEFAULT_LUA_ENTRY, DEFAULT_WIDTH};
pub use selection::Selection;

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::common::{Error, Result};

/// A coerced scene entry, or the reason it could not be coerced
type SceneEntry = std::result::Result<SceneConfig, String>;

/// All scenes of a scenes file, keyed and iterated by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneRegistry {
    scenes: BTreeMap<String, SceneEntry>,
}

impl SceneRegistry {
    /// Load a scenes file and check its shape
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let registry = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), scenes = registry.len(), "Loaded scenes");
        Ok(registry)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content)?;
        Self::from_value(&root)
    }

    /// Build the registry from a parsed document
    pub fn from_value(root: &Value) -> Result<Self> {
        let root = root
            .as_object()
            .ok_or_else(|| Error::Config("invalid scenes file: root is not an object".into()))?;
        let scenes = root
            .get("scenes")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::Config("invalid scenes file: missing 'scenes' object".into()))?;

        let scenes = scenes
            .iter()
            .map(|(name, value)| {
                let entry = SceneConfig::from_value(name, value).map_err(|e| match e {
                    Error::InvalidScene { reason, .. } => reason,
                    other => other.to_string(),
                });
                (name.clone(), entry)
            })
            .collect();

        Ok(Self { scenes })
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Look up a scene, failing if its entry is malformed
    pub fn get(&self, name: &str) -> Option<Result<&SceneConfig>> {
        self.scenes
            .get_key_value(name)
            .map(|(name, entry)| resolve_entry(name, entry))
    }

    /// Scene names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Result<&SceneConfig>)> {
        self.scenes
            .iter()
            .map(|(name, entry)| (name.as_str(), resolve_entry(name, entry)))
    }

    /// Selected scenes in lexicographic order
    ///
    /// Names requested with `--only` that the registry lacks are skipped
    /// with a warning. Malformed entries come back as `Err` so a driver
    /// fails when it reaches them, after the scenes before them ran.
    pub fn select(&self, selection: &Selection) -> Vec<(&str, Result<&SceneConfig>)> {
        if let Selection::Only(names) = selection {
            for missing in names.iter().filter(|n| !self.scenes.contains_key(n.as_str())) {
                tracing::warn!(scene = %missing, "Requested scene not found in scenes file");
            }
        }

        self.iter().filter(|(name, _)| selection.matches(name)).collect()
    }
}

fn resolve_entry<'a>(name: &str, entry: &'a SceneEntry) -> Result<&'a SceneConfig> {
    entry
        .as_ref()
        .map_err(|reason| Error::invalid_scene(name, reason.as_str()))
}
