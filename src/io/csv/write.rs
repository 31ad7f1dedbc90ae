//! CSV writing operations.

use std::io::Write;

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::balance::{round_report, BalanceResult};

/// Label in the Before column of audit total rows.
pub const TOTAL_LABEL: &str = "Total";

/// Write a DataFrame as CSV to any writer.
pub(crate) fn write_csv<W: Write>(df: &mut DataFrame, writer: W) -> Result<()> {
    CsvWriter::new(writer)
        .finish(df)
        .context("[io::csv::write] Failed to write CSV")
}

/// One row per balanced row: Before, After, Area, Factor_before, Factor_after, BFF_Area.
pub(crate) fn balance_frame(result: &BalanceResult) -> Result<DataFrame> {
    let rows = result.rows();
    let df = DataFrame::new(vec![
        Series::new("Before".into(), rows.iter().map(|r| r.before.as_str()).collect::<Vec<_>>()).into(),
        Series::new("After".into(), rows.iter().map(|r| r.after.as_str()).collect::<Vec<_>>()).into(),
        Series::new("Area".into(), rows.iter().map(|r| round_report(r.area)).collect::<Vec<_>>()).into(),
        Series::new("Factor_before".into(), rows.iter().map(|r| r.factor_before).collect::<Vec<_>>()).into(),
        Series::new("Factor_after".into(), rows.iter().map(|r| r.factor_after).collect::<Vec<_>>()).into(),
        Series::new("BFF_Area".into(), rows.iter().map(|r| r.weighted_area).collect::<Vec<_>>()).into(),
    ])?;
    Ok(df)
}

/// Raw area per after-category, labelled [`TOTAL_LABEL`].
pub(crate) fn totals_frame(result: &BalanceResult) -> Result<DataFrame> {
    let totals = result.after_totals();
    let df = DataFrame::new(vec![
        Series::new("Before".into(), vec![TOTAL_LABEL; totals.len()]).into(),
        Series::new("After".into(), totals.iter().map(|(c, _)| c.as_str()).collect::<Vec<_>>()).into(),
        Series::new("Area".into(), totals.iter().map(|(_, a)| round_report(*a)).collect::<Vec<_>>()).into(),
    ])?;
    Ok(df)
}

/// Write the balance table of `result` as CSV.
pub(crate) fn write_balance_table<W: Write>(result: &BalanceResult, writer: W) -> Result<()> {
    write_csv(&mut balance_frame(result)?, writer)
}

/// Write the per-after-category totals of `result` as CSV.
pub(crate) fn write_totals_table<W: Write>(result: &BalanceResult, writer: W) -> Result<()> {
    write_csv(&mut totals_frame(result)?, writer)
}

/// Balance table as a CSV string.
pub(crate) fn balance_table_string(result: &BalanceResult) -> Result<String> {
    let mut buffer = Vec::new();
    write_balance_table(result, &mut buffer)?;
    String::from_utf8(buffer)
        .context("[io::csv::write] CSV output is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalancedRow;

    fn sample() -> BalanceResult {
        BalanceResult::new(
            vec![BalancedRow {
                before: "Sealed".into(),
                after: "Green roof".into(),
                area: 100.004,
                factor_before: 0.0,
                factor_after: 0.5,
                weighted_area: 50.0,
            }],
            vec![("Green roof".into(), 100.004)],
        )
    }

    #[test]
    fn balance_table_has_fixed_header() {
        let csv = balance_table_string(&sample()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Before,After,Area,Factor_before,Factor_after,BFF_Area"));
        let row = lines.next().unwrap();
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(&fields[..2], &["Sealed", "Green roof"]);
        assert_eq!(fields[2].parse::<f64>().unwrap(), 100.0);
        assert_eq!(fields[5].parse::<f64>().unwrap(), 50.0);
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn totals_table_labels_rows() {
        let mut buffer = Vec::new();
        write_totals_table(&sample(), &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        assert_eq!(csv.lines().next(), Some("Before,After,Area"));
        assert!(csv.lines().nth(1).unwrap().starts_with("Total,Green roof,"));
    }
}
