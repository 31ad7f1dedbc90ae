use std::path::PathBuf;

use thiserror::Error;

/// Coarse buckets used when reporting a failed run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A named layer or file could not be resolved or loaded.
    InputResolution,
    /// A required attribute or column is missing or malformed.
    Schema,
    /// The geometry kernel failed.
    GeometryOperation,
    /// Input data is present but unusable for balancing.
    DataQuality,
}

/// Errors raised by a balancing run.
#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("Layer '{name}' not found in catalogue")]
    LayerNotFound { name: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to load vector layer {}: {reason}", path.display())]
    InvalidGeometryFile { path: PathBuf, reason: String },

    #[error("Attribute '{attribute}' not found on any feature of layer '{layer}'")]
    AttributeNotFound { layer: String, attribute: String },

    #[error("Weight table must contain column '{column}'")]
    MissingColumn { column: String },

    #[error("Weight table entry '{category}' has non-numeric factor '{value}'")]
    InvalidFactor { category: String, value: String },

    #[error("Geometry operation '{operation}' failed: {message}")]
    GeometryOperation { operation: &'static str, message: String },

    #[error("Manual adjustment {before} -> {after} has no area")]
    MissingAdjustmentArea { before: String, after: String },
}

impl BalanceError {
    /// Taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LayerNotFound { .. }
            | Self::FileNotFound { .. }
            | Self::InvalidGeometryFile { .. } => ErrorKind::InputResolution,
            Self::AttributeNotFound { .. }
            | Self::MissingColumn { .. }
            | Self::InvalidFactor { .. } => ErrorKind::Schema,
            Self::GeometryOperation { .. } => ErrorKind::GeometryOperation,
            Self::MissingAdjustmentArea { .. } => ErrorKind::DataQuality,
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, BalanceError>;
