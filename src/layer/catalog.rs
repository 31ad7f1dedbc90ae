use std::{collections::{BTreeMap, HashMap}, path::PathBuf};

use anyhow::Result;

use crate::error::{BalanceError, EngineResult};
use crate::io;
use super::FeatureCollection;

/// Name-based lookup of feature collections supplied by the host.
pub trait LayerCatalog {
    /// Look up the layer called `name`.
    fn get(&self, name: &str) -> EngineResult<&FeatureCollection>;
}

/// In-memory catalogue, owned by the caller for the duration of a run.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    layers: HashMap<String, FeatureCollection>,
}

impl MemoryCatalog {
    pub fn new() -> Self { Self::default() }

    /// Register `layer` under its own name, replacing any previous layer of that name.
    pub fn insert(&mut self, layer: FeatureCollection) {
        self.layers.insert(layer.name.clone(), layer);
    }

    /// Load every `name -> path` entry from disk.
    pub fn from_files(files: &BTreeMap<String, PathBuf>) -> Result<Self> {
        let mut catalog = Self::new();
        for (name, path) in files {
            let mut layer = io::read_layer(path)?;
            layer.name = name.clone();
            catalog.insert(layer);
        }
        Ok(catalog)
    }

    #[inline] pub fn len(&self) -> usize { self.layers.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.layers.is_empty() }
}

impl LayerCatalog for MemoryCatalog {
    fn get(&self, name: &str) -> EngineResult<&FeatureCollection> {
        self.layers.get(name)
            .ok_or_else(|| BalanceError::LayerNotFound { name: name.to_string() })
    }
}
