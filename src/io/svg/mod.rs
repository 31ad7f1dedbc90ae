//! SVG format writing operations for chart export.

mod color;
mod waterfall;
mod writer;

pub(crate) use waterfall::*;
