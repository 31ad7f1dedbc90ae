use tracing::{info, warn};

use crate::error::EngineResult;
use crate::geom::GeometryKernel;
use crate::layer::FeatureCollection;
use super::{
    adjust::{merge_adjustments, MissingAreaPolicy},
    aggregate::BalanceResult,
    group::GroupedGeometry,
    matrix::transition_matrix,
    overlap::find_overlap,
    residual::residual_rows,
    rows::AdjustmentRow,
    union::UnionByCategory,
    weights::{apply_weights, WeightTable},
};

/// Everything one balancing run reads. Borrowed for the duration of the run.
#[derive(Debug, Clone, Copy)]
pub struct BalanceInputs<'a> {
    pub before: &'a FeatureCollection,
    /// Attribute holding the before-category.
    pub before_field: &'a str,
    pub after: &'a FeatureCollection,
    /// Attribute holding the after-category.
    pub after_field: &'a str,
    pub weights: &'a WeightTable,
    /// Point-derived and caller-supplied adjustments, in merge order.
    pub adjustments: &'a [AdjustmentRow],
}

/// Runs grouping, union, matrix, residual, adjustment merge, weighting and
/// aggregation as one sequential pipeline.
pub struct Balancer<'k> {
    kernel: &'k dyn GeometryKernel,
    missing_area: MissingAreaPolicy,
    check_overlaps: bool,
}

impl<'k> Balancer<'k> {
    pub fn new(kernel: &'k dyn GeometryKernel) -> Self {
        Self { kernel, missing_area: MissingAreaPolicy::default(), check_overlaps: true }
    }

    /// Policy for adjustments without an area.
    pub fn missing_area(mut self, policy: MissingAreaPolicy) -> Self {
        self.missing_area = policy;
        self
    }

    /// Whether to warn about overlapping input categories (on by default).
    pub fn check_overlaps(mut self, enabled: bool) -> Self {
        self.check_overlaps = enabled;
        self
    }

    /// Compute the balance for `inputs`.
    pub fn run(&self, inputs: &BalanceInputs<'_>) -> EngineResult<BalanceResult> {
        let kernel = self.kernel;

        let before = GroupedGeometry::from_layer(inputs.before, inputs.before_field, kernel)?;
        let after = GroupedGeometry::from_layer(inputs.after, inputs.after_field, kernel)?;
        info!(
            "[balance] before: {} polygon(s) in {} categories, after: {} polygon(s) in {} categories",
            before.polygon_count(), before.len(), after.polygon_count(), after.len(),
        );

        if self.check_overlaps {
            self.warn_on_overlaps(&before, &after);
        }

        let unions = UnionByCategory::build(&before, kernel)?;

        let mut rows = transition_matrix(&unions, &after, kernel)?;
        rows.extend(residual_rows(&unions, &after, kernel)?);
        let geometric = rows.len();
        let skipped = merge_adjustments(&mut rows, inputs.adjustments, self.missing_area)?;
        info!(
            "[balance] {geometric} row(s) from geometry, {} adjustment(s) merged, {skipped} skipped",
            rows.len() - geometric,
        );

        let balanced = apply_weights(&rows, inputs.weights);
        let result = BalanceResult::new(balanced, after.total_area_by_category(kernel));
        info!("[balance] net balance {:.2}", result.net_balance());
        Ok(result)
    }

    /// Before-categories must not overlap each other; after-polygons must not overlap at all.
    ///
    /// Only ever warns. A kernel failure while checking is logged and the run goes on.
    fn warn_on_overlaps(&self, before: &GroupedGeometry, after: &GroupedGeometry) {
        match find_overlap(before, true, self.kernel) {
            Ok(Some((a, b))) => warn!("[balance] before categories '{a}' and '{b}' overlap; their shared area is counted twice"),
            Ok(None) => {}
            Err(err) => warn!("[balance] before overlap check failed: {err}; continuing"),
        }
        match find_overlap(after, false, self.kernel) {
            Ok(Some((a, b))) => warn!("[balance] after polygons of '{a}' and '{b}' overlap; their shared area is counted twice"),
            Ok(None) => {}
            Err(err) => warn!("[balance] after overlap check failed: {err}; continuing"),
        }
    }
}
