use crate::balance::BalanceResult;

/// Label of the closing total bar.
pub const NET_BALANCE_LABEL: &str = "Net Balance";

/// One relative step of the waterfall.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallBar {
    /// `"Before → After"`.
    pub label: String,
    pub value: f64,
    /// Running total before this bar.
    pub start: f64,
}

impl WaterfallBar {
    #[inline] pub fn end(&self) -> f64 { self.start + self.value }
}

/// Waterfall chart of a balance: one bar per non-zero row, largest gain first,
/// followed by the net balance.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallChart {
    pub bars: Vec<WaterfallBar>,
    pub net_balance: f64,
}

impl WaterfallChart {
    /// Build the chart for `result`. Rows with zero weighted area are left out of the chart only.
    pub fn from_result(result: &BalanceResult) -> Self {
        let mut steps: Vec<(String, f64)> = result.rows().iter()
            .filter(|row| row.weighted_area != 0.0)
            .map(|row| (format!("{} → {}", row.before, row.after), row.weighted_area))
            .collect();
        // Stable sort keeps table order among equal values.
        steps.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut running = 0.0;
        let bars = steps.into_iter()
            .map(|(label, value)| {
                let bar = WaterfallBar { label, value, start: running };
                running += value;
                bar
            })
            .collect();

        Self { bars, net_balance: result.net_balance() }
    }

    #[inline] pub fn is_empty(&self) -> bool { self.bars.is_empty() }

    /// Smallest and largest running totals, always including zero.
    pub fn value_range(&self) -> (f64, f64) {
        self.bars.iter()
            .flat_map(|bar| [bar.start, bar.end()])
            .chain([0.0, self.net_balance])
            .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}
