use std::{borrow::Cow, collections::BTreeMap, fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::balance::{AdjustmentRow, MissingAreaPolicy, SEALED_SURFACE};
use crate::io;
use crate::layer::{FeatureCollection, LayerCatalog};

/// Where a feature collection comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerSource {
    /// A GeoJSON or Shapefile on disk.
    File(PathBuf),
    /// A layer registered in the catalogue by name.
    Layer(String),
}

impl LayerSource {
    /// Resolve to a feature collection, borrowing from `catalog` for named layers.
    pub fn resolve<'a>(&self, catalog: &'a dyn LayerCatalog) -> Result<Cow<'a, FeatureCollection>> {
        match self {
            Self::File(path) => Ok(Cow::Owned(io::read_layer(path)?)),
            Self::Layer(name) => Ok(Cow::Borrowed(catalog.get(name)?)),
        }
    }
}

/// Settings for one balancing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Existing state.
    pub before: LayerSource,
    /// Attribute holding the before-category.
    pub before_field: String,
    /// Planned state.
    pub after: LayerSource,
    /// Attribute holding the after-category (also read from green points).
    pub after_field: String,
    /// `;`-delimited weight table.
    pub weights: PathBuf,
    /// Result table path.
    pub output: PathBuf,

    /// Named layers loaded into the catalogue before the run.
    #[serde(default)]
    pub layers: BTreeMap<String, PathBuf>,
    /// Caller-supplied adjustments, appended after point-derived ones.
    #[serde(default)]
    pub adjustments: Vec<AdjustmentRow>,
    /// Point layer of building greening measures.
    #[serde(default)]
    pub green_points: Option<LayerSource>,
    /// Before-category of point-derived adjustments.
    #[serde(default = "default_sealed_category")]
    pub sealed_category: String,
    #[serde(default)]
    pub missing_area: MissingAreaPolicy,
    #[serde(default = "default_true")]
    pub check_overlaps: bool,

    /// Waterfall chart (SVG) path.
    #[serde(default)]
    pub chart: Option<PathBuf>,
    /// Per-after-category totals table path.
    #[serde(default)]
    pub totals: Option<PathBuf>,
    /// Overwrite existing output files.
    #[serde(default)]
    pub force: bool,
}

fn default_sealed_category() -> String { SEALED_SURFACE.to_string() }

fn default_true() -> bool { true }

impl RunConfig {
    /// Read a JSON run configuration. Relative paths are resolved against the file's directory.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        let mut config: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("[config] Failed to parse {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Output paths this run will write.
    pub fn outputs(&self) -> Vec<&Path> {
        std::iter::once(self.output.as_path())
            .chain(self.chart.as_deref())
            .chain(self.totals.as_deref())
            .collect()
    }

    fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| if p.is_relative() { *p = base.join(&*p) };

        for source in [Some(&mut self.before), Some(&mut self.after), self.green_points.as_mut()].into_iter().flatten() {
            if let LayerSource::File(path) = source { join(path) }
        }
        for path in self.layers.values_mut() { join(path) }
        join(&mut self.weights);
        join(&mut self.output);
        if let Some(path) = self.chart.as_mut() { join(path) }
        if let Some(path) = self.totals.as_mut() { join(path) }
    }
}
