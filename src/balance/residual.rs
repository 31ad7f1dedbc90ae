use tracing::debug;

use crate::error::EngineResult;
use crate::geom::GeometryKernel;
use super::{group::GroupedGeometry, rows::{TransitionRow, UNCOVERED}, union::UnionByCategory};

/// After-state area outside all before-state geometry, per after-category.
///
/// The union of every after-polygon minus the union of every before-category
/// region gives the uncovered region; each after-category receives its own
/// polygons' share of it under the [`UNCOVERED`] before-label. Together with
/// [`transition_matrix`](super::transition_matrix) this accounts for each
/// unit of after-area exactly once.
pub fn residual_rows(
    before: &UnionByCategory,
    after: &GroupedGeometry,
    kernel: &dyn GeometryKernel,
) -> EngineResult<Vec<TransitionRow>> {
    if after.is_empty() { return Ok(Vec::new()) }

    let after_shapes: Vec<_> = after.all_polygons().cloned().collect();
    let merged_after = kernel.union(&after_shapes)?;

    let merged_before = before.merged(kernel)?;
    let uncovered = if merged_before.0.is_empty() {
        merged_after
    } else {
        kernel.difference(&merged_after, &merged_before)?
    };

    if kernel.is_empty(&uncovered) {
        debug!("[balance::residual] after state fully covered by before state");
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for (group, after_category) in after.categories().iter().enumerate() {
        let area = after.intersection_area(group, &uncovered, kernel)?;
        if area > 0.0 {
            rows.push(TransitionRow::new(UNCOVERED, after_category.as_str(), area));
        }
    }

    debug!("[balance::residual] uncovered area {:.2} over {} categories", kernel.area(&uncovered), rows.len());
    Ok(rows)
}
