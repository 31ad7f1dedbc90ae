use tracing::debug;

use crate::error::EngineResult;
use crate::geom::GeometryKernel;
use super::{group::GroupedGeometry, rows::TransitionRow, union::UnionByCategory};

/// Area of every after-category lying inside every before-category.
///
/// Each after-polygon is intersected with the before-category's unioned
/// region and the areas are summed, so after-categories must not overlap one
/// another for the sums to be physical areas. Pairs without positive
/// overlap are omitted.
pub fn transition_matrix(
    before: &UnionByCategory,
    after: &GroupedGeometry,
    kernel: &dyn GeometryKernel,
) -> EngineResult<Vec<TransitionRow>> {
    let mut rows = Vec::new();

    for (before_category, region) in before.iter() {
        if region.0.is_empty() { continue }

        for (group, after_category) in after.categories().iter().enumerate() {
            let area = after.intersection_area(group, region, kernel)?;
            if area > 0.0 {
                rows.push(TransitionRow::new(before_category, after_category.as_str(), area));
            }
        }
    }

    debug!("[balance::matrix] {} before x {} after categories -> {} transition(s)", before.len(), after.len(), rows.len());
    Ok(rows)
}
