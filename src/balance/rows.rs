use serde::{Deserialize, Serialize};

/// Categorical land-cover label. Compared by equality only.
pub type Category = String;

/// Before-label for after-state area outside all before-state geometry.
pub const UNCOVERED: &str = "Uncovered";

/// Category assigned to features whose grouping attribute is null or absent.
pub const NULL_CATEGORY: &str = "NULL";

/// Before-label for point-derived adjustments (building greening on sealed surfaces).
pub const SEALED_SURFACE: &str = "Belagsfläche (versiegelt)";

/// After-label for point-derived adjustments without an after-category attribute.
pub const BUILDING_GREEN: &str = "Building Green";

/// Decimal places used for reported areas and weighted areas.
pub const REPORT_DECIMALS: i32 = 2;

/// Area moved from one before-category to one after-category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRow {
    #[serde(rename = "Before")]
    pub before: Category,
    #[serde(rename = "After")]
    pub after: Category,
    #[serde(rename = "Area")]
    pub area: f64,
}

impl TransitionRow {
    pub fn new(before: impl Into<Category>, after: impl Into<Category>, area: f64) -> Self {
        Self { before: before.into(), after: after.into(), area }
    }

    /// True for rows attributed to [`UNCOVERED`].
    #[inline] pub fn is_residual(&self) -> bool { self.before == UNCOVERED }
}

/// Caller-authored row with no geometric origin.
///
/// `area` is `None` when the source did not provide one; this is a
/// data-quality problem and never the same as a zero-area adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRow {
    #[serde(rename = "Before")]
    pub before: Category,
    #[serde(rename = "After")]
    pub after: Category,
    #[serde(rename = "Area", default)]
    pub area: Option<f64>,
}

impl AdjustmentRow {
    pub fn new(before: impl Into<Category>, after: impl Into<Category>, area: Option<f64>) -> Self {
        Self { before: before.into(), after: after.into(), area }
    }

    /// Parse `Before;After;Area`. A blank area field yields an unset area.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split(';').map(str::trim);
        let before = parts.next().filter(|s| !s.is_empty())?;
        let after = parts.next().filter(|s| !s.is_empty())?;
        let area = match parts.next() {
            None | Some("") => None,
            Some(text) => Some(text.parse::<f64>().ok().filter(|a| a.is_finite())?),
        };
        if parts.next().is_some() { return None }
        Some(Self::new(before, after, area))
    }
}

/// A transition or adjustment row after the weighting join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancedRow {
    #[serde(rename = "Before")]
    pub before: Category,
    #[serde(rename = "After")]
    pub after: Category,
    #[serde(rename = "Area")]
    pub area: f64,
    #[serde(rename = "Factor_before")]
    pub factor_before: f64,
    #[serde(rename = "Factor_after")]
    pub factor_after: f64,
    /// `(factor_after - factor_before) * area`, rounded to [`REPORT_DECIMALS`].
    #[serde(rename = "BFF_Area")]
    pub weighted_area: f64,
}

/// Round to [`REPORT_DECIMALS`] places, ties to even.
pub fn round_report(value: f64) -> f64 {
    let scale = 10f64.powi(REPORT_DECIMALS);
    (value * scale).round_ties_even() / scale
}
