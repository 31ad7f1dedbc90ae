//! CSV reading operations.

use std::{fs, io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};
use tracing::{debug, warn};

use crate::balance::WeightTable;
use crate::error::BalanceError;

/// Column holding the category label in the weight table.
pub const DESCRIPTION_COLUMN: &str = "Description";

/// Column holding the ecological factor in the weight table.
pub const FACTOR_COLUMN: &str = "BFF_2020";

/// Field separator of the weight table.
pub const WEIGHT_SEPARATOR: u8 = b';';

/// Reads a `;`-delimited weight table from `path`.
pub(crate) fn read_weight_table(path: &Path) -> Result<WeightTable> {
    if !path.exists() {
        return Err(BalanceError::FileNotFound { path: path.to_path_buf() }.into());
    }
    let bytes = fs::read(path)
        .with_context(|| format!("[io::csv::read] Failed to open weight table: {}", path.display()))?;
    read_weight_table_bytes(&bytes)
        .with_context(|| format!("[io::csv::read] Failed to read weight table from {}", path.display()))
}

/// Reads a `;`-delimited weight table from bytes.
pub(crate) fn read_weight_table_bytes(bytes: &[u8]) -> Result<WeightTable> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);

    // Every column is read as text; factors are parsed below.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|po| po.with_separator(WEIGHT_SEPARATOR))
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("[io::csv::read] Failed to parse weight table")?;

    weight_table_from_frame(&df)
}

/// Build a [`WeightTable`] from the `Description` and `BFF_2020` columns of `df`.
///
/// Column names are matched after trimming whitespace; other columns are ignored.
/// Rows with an empty factor are skipped so their category falls back to 0.
pub(crate) fn weight_table_from_frame(df: &DataFrame) -> Result<WeightTable> {
    let description = find_column(df, DESCRIPTION_COLUMN)?;
    let factor = find_column(df, FACTOR_COLUMN)?;

    let descriptions = df.column(&description)?.str()?;
    let factors = df.column(&factor)?.str()?;

    let mut table = WeightTable::new();
    for (category, value) in descriptions.into_iter().zip(factors.into_iter()) {
        let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else { continue };
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(text) => {
                let factor = text.parse::<f64>().ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| BalanceError::InvalidFactor { category: category.to_string(), value: text.to_string() })?;
                table.insert(category, factor);
            }
            None => warn!("[io::csv::read] weight-table entry '{category}' has no factor"),
        }
    }

    debug!("[io::csv::read] loaded {} factor(s)", table.len());
    Ok(table)
}

fn find_column(df: &DataFrame, wanted: &str) -> Result<String> {
    df.get_column_names().into_iter()
        .find(|name| name.trim() == wanted)
        .map(|name| name.to_string())
        .ok_or_else(|| BalanceError::MissingColumn { column: wanted.to_string() }.into())
}
