//! CSV format reading and writing operations.

mod read;
mod write;

pub use read::{DESCRIPTION_COLUMN, FACTOR_COLUMN, WEIGHT_SEPARATOR};
pub use write::TOTAL_LABEL;
pub(crate) use read::*;
pub(crate) use write::*;
