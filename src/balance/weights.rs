use std::collections::BTreeSet;

use ahash::AHashMap;
use tracing::{debug, warn};

use super::rows::{round_report, BalancedRow, Category, TransitionRow, UNCOVERED};

/// Ecological factor per category.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    factors: AHashMap<Category, f64>,
}

impl WeightTable {
    pub fn new() -> Self { Self::default() }

    /// Build a table from `(category, factor)` pairs. The first entry for a category wins.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<Category>,
    {
        let mut table = Self::new();
        for (category, factor) in entries {
            table.insert(category, factor);
        }
        table
    }

    /// Insert `factor` for `category` unless the category is already present.
    /// Returns false for a duplicate or a non-finite factor.
    pub fn insert(&mut self, category: impl Into<Category>, factor: f64) -> bool {
        let category = category.into();
        if !factor.is_finite() {
            warn!("[balance::weights] non-finite factor {factor} for '{category}' ignored");
            return false;
        }
        if self.factors.contains_key(&category) {
            warn!("[balance::weights] duplicate weight-table entry '{category}' ignored");
            return false;
        }
        self.factors.insert(category, factor);
        true
    }

    /// Factor of `category`, if recorded.
    #[inline] pub fn get(&self, category: &str) -> Option<f64> { self.factors.get(category).copied() }

    /// Factor of `category`, or 0 for "no ecological value recorded".
    #[inline] pub fn factor(&self, category: &str) -> f64 { self.get(category).unwrap_or(0.0) }

    #[inline] pub fn len(&self) -> usize { self.factors.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.factors.is_empty() }
}

/// Join `rows` against `table` and compute each row's weighted area.
///
/// Categories missing from the table weigh 0 on whichever side they appear.
pub fn apply_weights(rows: &[TransitionRow], table: &WeightTable) -> Vec<BalancedRow> {
    let mut missing: BTreeSet<&str> = BTreeSet::new();

    let balanced = rows.iter()
        .map(|row| {
            for category in [row.before.as_str(), row.after.as_str()] {
                if category != UNCOVERED && table.get(category).is_none() {
                    missing.insert(category);
                }
            }
            let factor_before = table.factor(&row.before);
            let factor_after = table.factor(&row.after);
            BalancedRow {
                before: row.before.clone(),
                after: row.after.clone(),
                area: row.area,
                factor_before,
                factor_after,
                weighted_area: round_report((factor_after - factor_before) * round_report(row.area)),
            }
        })
        .collect();

    for category in missing {
        warn!("[balance::weights] no factor for '{category}', using 0");
    }
    debug!("[balance::weights] weighted {} row(s) against {} factor(s)", rows.len(), table.len());
    balanced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_area_uses_after_minus_before() {
        let table = WeightTable::from_entries([("Sealed", 0.0), ("Green roof", 0.5)]);
        let rows = apply_weights(&[TransitionRow::new("Sealed", "Green roof", 100.0)], &table);

        assert_eq!(rows[0].factor_before, 0.0);
        assert_eq!(rows[0].factor_after, 0.5);
        assert_eq!(rows[0].weighted_area, 50.0);
    }

    #[test]
    fn unknown_categories_weigh_zero() {
        let table = WeightTable::from_entries([("Lawn", 0.3)]);
        let rows = apply_weights(&[
            TransitionRow::new(UNCOVERED, "Lawn", 40.0),
            TransitionRow::new("Lawn", "Parking", 10.0),
        ], &table);

        assert_eq!(rows[0].factor_before, 0.0);
        assert_eq!(rows[0].weighted_area, 12.0);
        assert_eq!(rows[1].factor_after, 0.0);
        assert_eq!(rows[1].weighted_area, -3.0);
    }

    #[test]
    fn sign_follows_factor_change() {
        let table = WeightTable::from_entries([("A", 0.2), ("B", 0.7)]);
        let rows = apply_weights(&[
            TransitionRow::new("A", "B", 10.0),
            TransitionRow::new("B", "A", 10.0),
            TransitionRow::new("A", "A", 10.0),
        ], &table);

        assert!(rows[0].weighted_area > 0.0);
        assert!(rows[1].weighted_area < 0.0);
        assert_eq!(rows[2].weighted_area, 0.0);
    }

    #[test]
    fn weighted_area_is_rounded() {
        let table = WeightTable::from_entries([("A", 0.0), ("B", 0.3)]);
        let rows = apply_weights(&[TransitionRow::new("A", "B", 10.1234)], &table);
        assert_eq!(rows[0].weighted_area, 3.04);
    }

    #[test]
    fn weighting_uses_reported_area() {
        // 1.006 is reported as 1.01, so the exported row checks out as 1.01 * 5.
        let table = WeightTable::from_entries([("A", 0.0), ("B", 5.0)]);
        let rows = apply_weights(&[TransitionRow::new("A", "B", 1.006)], &table);
        assert_eq!(rows[0].area, 1.006);
        assert_eq!(rows[0].weighted_area, 5.05);
    }

    #[test]
    fn non_finite_factor_is_not_recorded() {
        let mut table = WeightTable::new();
        assert!(!table.insert("Rasen", f64::NAN));
        assert!(!table.insert("Dach", f64::INFINITY));
        assert!(table.is_empty());
        assert_eq!(table.factor("Rasen"), 0.0);
    }

    #[test]
    fn first_duplicate_wins() {
        let mut table = WeightTable::new();
        assert!(table.insert("Rasen", 0.3));
        assert!(!table.insert("Rasen", 0.9));
        assert_eq!(table.get("Rasen"), Some(0.3));
        assert_eq!(table.len(), 1);
    }
}
