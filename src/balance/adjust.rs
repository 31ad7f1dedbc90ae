use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BalanceError, EngineResult};
use crate::layer::{FeatureCollection, Shape};
use super::rows::{AdjustmentRow, TransitionRow, BUILDING_GREEN};

/// Attribute of the auxiliary point layer holding the adjustment area.
pub const AREA_FIELD: &str = "Area";

/// How to handle manual adjustments whose area is unset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingAreaPolicy {
    /// Log a data-quality warning and leave the row out of the balance.
    #[default]
    Warn,
    /// Abort the run.
    Reject,
}

/// Derive one adjustment row per point feature of `layer`.
///
/// Before is `sealed_category`. After is the feature's `after_field` value when
/// the layer has that field, otherwise [`BUILDING_GREEN`]. Area is the numeric
/// [`AREA_FIELD`] attribute, or unset when absent. Non-point features are ignored.
pub fn rows_from_points(layer: &FeatureCollection, after_field: &str, sealed_category: &str) -> Vec<AdjustmentRow> {
    let has_after_field = layer.has_attribute(after_field);

    let rows: Vec<AdjustmentRow> = layer.features.iter()
        .filter(|feature| matches!(feature.shape, Some(Shape::Point(_))))
        .map(|feature| {
            let after = match feature.attribute(after_field) {
                Some(value) if has_after_field && !value.is_null() => value.to_string(),
                _ => BUILDING_GREEN.to_string(),
            };
            let area = feature.attribute(AREA_FIELD).and_then(|value| value.as_f64());
            AdjustmentRow::new(sealed_category, after, area)
        })
        .collect();

    info!("[balance::adjust] added {} point adjustment(s) from '{}'", rows.len(), layer.name);
    rows
}

/// Append `adjustments` to `rows` in order, applying `policy` to rows without an area.
/// A non-finite area counts as no area.
///
/// Returns the number of adjustments left out.
pub fn merge_adjustments(
    rows: &mut Vec<TransitionRow>,
    adjustments: &[AdjustmentRow],
    policy: MissingAreaPolicy,
) -> EngineResult<usize> {
    let mut skipped = 0;
    for adjustment in adjustments {
        match (adjustment.area.filter(|a| a.is_finite()), policy) {
            (Some(area), _) => rows.push(TransitionRow::new(adjustment.before.as_str(), adjustment.after.as_str(), area)),
            (None, MissingAreaPolicy::Warn) => {
                warn!("[balance::adjust] adjustment {} -> {} has no area; left out of the balance", adjustment.before, adjustment.after);
                skipped += 1;
            }
            (None, MissingAreaPolicy::Reject) => {
                return Err(BalanceError::MissingAdjustmentArea {
                    before: adjustment.before.clone(),
                    after: adjustment.after.clone(),
                });
            }
        }
    }
    Ok(skipped)
}
