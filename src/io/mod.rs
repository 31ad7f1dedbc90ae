//! IO module for format-specific reading and writing operations.
//!
//! # Format Modules
//!
//! - `geojson` - GeoJSON FeatureCollections for before/after/point layers
//! - `shp` - Shapefile format for geographic data
//! - `csv` - `;`-delimited weight tables and the exported balance tables
//! - `svg` - SVG format for waterfall chart export
//! - `write` - write-then-rename wrapper so failed runs leave no partial files

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod shp;
pub(crate) mod svg;
pub(crate) mod write;

use std::{fs, path::Path};

use anyhow::Result;

use crate::error::BalanceError;
use crate::layer::FeatureCollection;

pub use self::csv::{DESCRIPTION_COLUMN, FACTOR_COLUMN, TOTAL_LABEL, WEIGHT_SEPARATOR};

/// Load a vector layer from a GeoJSON (`.geojson`, `.json`) or Shapefile (`.shp`) path.
pub fn read_layer(path: &Path) -> Result<FeatureCollection> {
    if !path.exists() {
        return Err(BalanceError::FileNotFound { path: path.to_path_buf() }.into());
    }
    let name = geojson::layer_name(path);
    let invalid = |reason: String| BalanceError::InvalidGeometryFile { path: path.to_path_buf(), reason };

    let extension = path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let layer = match extension.as_deref() {
        Some("geojson" | "json") => {
            let bytes = fs::read(path).map_err(|e| invalid(e.to_string()))?;
            geojson::read_geojson_bytes(&bytes, &name).map_err(|e| invalid(format!("{e:#}")))?
        }
        Some("shp") => shp::read_shapefile(path, &name).map_err(|e| invalid(format!("{e:#}")))?,
        _ => return Err(invalid("unsupported file type (expected .geojson, .json or .shp)".into()).into()),
    };

    tracing::info!("[io] loaded {} feature(s) from {}", layer.len(), path.display());
    Ok(layer)
}

/// Load a `;`-delimited weight table with `Description` and `BFF_2020` columns.
pub fn read_weight_table(path: &Path) -> Result<crate::balance::WeightTable> {
    csv::read_weight_table(path)
}

/// Render a result as the `,`-delimited balance table written by the CLI.
pub fn balance_table_string(result: &crate::balance::BalanceResult) -> Result<String> {
    csv::balance_table_string(result)
}
