//! Land-cover transition balancing.
//!
//! A run groups before and after polygons by category, unions the before
//! groups, measures every before/after overlap plus the after area outside
//! all before geometry, appends manual adjustments, weights each row by the
//! change in ecological factor and sums the result.

mod adjust;
mod aggregate;
mod group;
mod matrix;
mod overlap;
mod pipeline;
mod residual;
mod rows;
mod union;
mod weights;

pub use adjust::{merge_adjustments, rows_from_points, MissingAreaPolicy, AREA_FIELD};
pub use aggregate::{BalanceResult, BalanceSummary};
pub use group::GroupedGeometry;
pub use matrix::transition_matrix;
pub use overlap::find_overlap;
pub use pipeline::{BalanceInputs, Balancer};
pub use residual::residual_rows;
pub use rows::{
    round_report, AdjustmentRow, BalancedRow, Category, TransitionRow,
    BUILDING_GREEN, NULL_CATEGORY, REPORT_DECIMALS, SEALED_SURFACE, UNCOVERED,
};
pub use union::UnionByCategory;
pub use weights::{apply_weights, WeightTable};
