use std::path::{Path, PathBuf};

use serde::Serialize;

use super::rows::{BalancedRow, Category, REPORT_DECIMALS};

/// Outcome of one balancing run.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceResult {
    rows: Vec<BalancedRow>,
    net_balance: f64,
    after_totals: Vec<(Category, f64)>,
}

impl BalanceResult {
    /// Aggregate `rows`; `after_totals` is the raw area of every after-category.
    pub fn new(rows: Vec<BalancedRow>, after_totals: Vec<(Category, f64)>) -> Self {
        let net_balance = net_balance(&rows);
        Self { rows, net_balance, after_totals }
    }

    #[inline] pub fn rows(&self) -> &[BalancedRow] { &self.rows }

    /// Sum of the per-row rounded weighted areas.
    #[inline] pub fn net_balance(&self) -> f64 { self.net_balance }

    /// Raw (unweighted) area per after-category, for audit.
    #[inline] pub fn after_totals(&self) -> &[(Category, f64)] { &self.after_totals }

    /// Summary for presenting a finished run.
    pub fn summary(&self, results_path: &Path) -> BalanceSummary {
        BalanceSummary {
            total_balance: format!("{} m2", self.net_balance.trunc() as i64),
            results_path: results_path.to_path_buf(),
        }
    }
}

/// Printable outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    #[serde(rename = "Total balance")]
    pub total_balance: String,
    #[serde(rename = "Results path")]
    pub results_path: PathBuf,
}

/// Sum weighted areas in integer hundredths so the total does not depend on row order.
fn net_balance(rows: &[BalancedRow]) -> f64 {
    let scale = 10f64.powi(REPORT_DECIMALS);
    let hundredths: i64 = rows.iter()
        .map(|row| (row.weighted_area * scale).round() as i64)
        .sum();
    hundredths as f64 / scale
}
