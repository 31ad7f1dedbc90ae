// Integration tests for the balancing engine:
//   reference scenarios, area conservation, idempotence, factor fallback,
//   weighting sign, empty inputs and manual adjustments.

mod common;

use geo::polygon;
use common::{balance, close, layer, square, AFTER_FIELD, BEFORE_FIELD};
use nettonull::{
    balance::{BUILDING_GREEN, UNCOVERED},
    balance_table_string, AdjustmentRow, BalanceError, BalanceInputs, Balancer, ErrorKind,
    FeatureCollection, GeoKernel, MissingAreaPolicy, WeightTable,
};

fn weights(entries: &[(&str, f64)]) -> WeightTable {
    WeightTable::from_entries(entries.iter().copied())
}

#[test]
fn sealed_square_becomes_green_roof() {
    let before = layer("Bestand", BEFORE_FIELD, &[(square(0.0, 0.0, 10.0), "Sealed")]);
    let after = layer("Planung", AFTER_FIELD, &[(square(0.0, 0.0, 10.0), "Green roof")]);
    let table = weights(&[("Sealed", 0.0), ("Green roof", 0.5)]);

    let result = balance(&before, &after, &table, &[]);
    assert_eq!(result.rows().len(), 1);

    let row = &result.rows()[0];
    assert_eq!((row.before.as_str(), row.after.as_str()), ("Sealed", "Green roof"));
    assert!(close(row.area, 100.0));
    assert_eq!(row.weighted_area, 50.0);
    assert_eq!(result.net_balance(), 50.0);
}

#[test]
fn after_outside_before_is_uncovered() {
    let before = FeatureCollection::new("Bestand", Vec::new());
    let after = layer("Planung", AFTER_FIELD, &[(rect(0.0, 0.0, 8.0, 5.0), "Lawn")]);
    let table = weights(&[("Lawn", 0.3)]);

    let result = balance(&before, &after, &table, &[]);
    assert_eq!(result.rows().len(), 1);

    let row = &result.rows()[0];
    assert_eq!((row.before.as_str(), row.after.as_str()), (UNCOVERED, "Lawn"));
    assert!(close(row.area, 40.0));
    assert_eq!(row.factor_before, 0.0);
    assert_eq!(row.weighted_area, 12.0);
}

#[test]
fn manual_adjustment_adds_to_balance() {
    let before = layer("Bestand", BEFORE_FIELD, &[(square(0.0, 0.0, 10.0), "Sealed")]);
    let after = layer("Planung", AFTER_FIELD, &[(square(0.0, 0.0, 10.0), "Sealed")]);
    let table = weights(&[("Sealed", 0.0), ("Green roof (extensive)", 0.6)]);
    let adjustments = [AdjustmentRow::new("Sealed", "Green roof (extensive)", Some(3600.0))];

    let result = balance(&before, &after, &table, &adjustments);
    let last = result.rows().last().unwrap();
    assert_eq!(last.after, "Green roof (extensive)");
    assert_eq!(last.weighted_area, 2160.0);
    assert_eq!(result.net_balance(), 2160.0);
}

#[test]
fn area_is_conserved_per_after_category() {
    let before = layer("Bestand", BEFORE_FIELD, &[
        (square(0.0, 0.0, 10.0), "Sealed"),
        (square(10.0, 0.0, 10.0), "Lawn"),
    ]);
    // Straddles both before categories and sticks out past them.
    let after = layer("Planung", AFTER_FIELD, &[
        (rect(5.0, 2.0, 20.0, 6.0), "Green roof"),
        (rect(0.0, 12.0, 4.0, 4.0), "Tree"),
    ]);
    let table = weights(&[("Sealed", 0.0), ("Lawn", 0.3), ("Green roof", 0.5), ("Tree", 1.0)]);

    let result = balance(&before, &after, &table, &[]);
    for (category, expected) in [("Green roof", 120.0), ("Tree", 16.0)] {
        let sum: f64 = result.rows().iter()
            .filter(|r| r.after == category)
            .map(|r| r.area)
            .sum();
        assert!(close(sum, expected), "{category}: {sum} != {expected}");
    }

    let uncovered: f64 = result.rows().iter().filter(|r| r.before == UNCOVERED).map(|r| r.area).sum();
    assert!(close(uncovered, 30.0 + 16.0));
}

#[test]
fn reruns_produce_identical_tables() {
    let before = layer("Bestand", BEFORE_FIELD, &[
        (square(0.0, 0.0, 10.0), "Sealed"),
        (square(10.0, 0.0, 10.0), "Lawn"),
    ]);
    let after = layer("Planung", AFTER_FIELD, &[
        (rect(3.3, 1.7, 13.1, 5.9), "Green roof"),
        (rect(0.0, 10.0, 7.7, 2.2), "Lawn"),
    ]);
    let table = weights(&[("Sealed", 0.0), ("Lawn", 0.3), ("Green roof", 0.5)]);
    let adjustments = [AdjustmentRow::new("Sealed", "Green roof", Some(12.5))];

    let first = balance_table_string(&balance(&before, &after, &table, &adjustments)).unwrap();
    let second = balance_table_string(&balance(&before, &after, &table, &adjustments)).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("Before,After,Area,Factor_before,Factor_after,BFF_Area"));
}

#[test]
fn unknown_categories_weigh_zero() {
    let before = layer("Bestand", BEFORE_FIELD, &[(square(0.0, 0.0, 10.0), "Unlisted")]);
    let after = layer("Planung", AFTER_FIELD, &[(square(0.0, 0.0, 10.0), "Also unlisted")]);

    let result = balance(&before, &after, &WeightTable::new(), &[]);
    let row = &result.rows()[0];
    assert_eq!((row.factor_before, row.factor_after, row.weighted_area), (0.0, 0.0, 0.0));
    assert_eq!(result.net_balance(), 0.0);
}

#[test]
fn sign_follows_factor_change() {
    let before = layer("Bestand", BEFORE_FIELD, &[
        (square(0.0, 0.0, 10.0), "Lawn"),
        (square(10.0, 0.0, 10.0), "Sealed"),
        (square(20.0, 0.0, 10.0), "Lawn"),
    ]);
    let after = layer("Planung", AFTER_FIELD, &[
        (square(0.0, 0.0, 10.0), "Sealed"),
        (square(10.0, 0.0, 10.0), "Lawn"),
        (square(20.0, 0.0, 10.0), "Meadow"),
    ]);
    let table = weights(&[("Sealed", 0.0), ("Lawn", 0.3), ("Meadow", 0.3)]);

    let result = balance(&before, &after, &table, &[]);
    assert_eq!(result.rows().len(), 3);
    for row in result.rows() {
        assert!(row.area > 0.0);
        assert_eq!(row.weighted_area > 0.0, row.factor_after > row.factor_before, "{row:?}");
        assert_eq!(row.weighted_area < 0.0, row.factor_after < row.factor_before, "{row:?}");
    }
    assert_eq!(result.net_balance(), 0.0);
}

#[test]
fn empty_after_counts_only_adjustments() {
    let before = layer("Bestand", BEFORE_FIELD, &[(square(0.0, 0.0, 10.0), "Sealed")]);
    let after = FeatureCollection::new("Planung", Vec::new());
    let table = weights(&[("Sealed", 0.0), ("Green roof", 0.6), ("Facade", 0.5)]);
    let adjustments = [
        AdjustmentRow::new("Sealed", "Green roof", Some(100.0)),
        AdjustmentRow::new("Sealed", "Facade", Some(10.0)),
    ];

    let result = balance(&before, &after, &table, &adjustments);
    assert_eq!(result.rows().len(), 2);
    assert_eq!(result.net_balance(), 65.0);
}

#[test]
fn unset_adjustment_area_is_never_zero() {
    let before = layer("Bestand", BEFORE_FIELD, &[(square(0.0, 0.0, 10.0), "Sealed")]);
    let after = layer("Planung", AFTER_FIELD, &[(square(0.0, 0.0, 10.0), "Sealed")]);
    let table = weights(&[("Sealed", 0.0), (BUILDING_GREEN, 0.4)]);
    let adjustments = [
        AdjustmentRow::new("Sealed", BUILDING_GREEN, None),
        AdjustmentRow::new("Sealed", BUILDING_GREEN, Some(10.0)),
    ];
    let inputs = BalanceInputs {
        before: &before,
        before_field: BEFORE_FIELD,
        after: &after,
        after_field: AFTER_FIELD,
        weights: &table,
        adjustments: &adjustments,
    };

    let kernel = GeoKernel;
    let result = Balancer::new(&kernel).run(&inputs).unwrap();
    assert_eq!(result.rows().iter().filter(|r| r.after == BUILDING_GREEN).count(), 1);
    assert_eq!(result.net_balance(), 4.0);

    let err = Balancer::new(&kernel).missing_area(MissingAreaPolicy::Reject).run(&inputs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataQuality);
}

#[test]
fn missing_grouping_attribute_is_a_schema_error() {
    let before = layer("Bestand", "Other", &[(square(0.0, 0.0, 10.0), "Sealed")]);
    let after = layer("Planung", AFTER_FIELD, &[(square(0.0, 0.0, 10.0), "Lawn")]);
    let inputs = BalanceInputs {
        before: &before,
        before_field: BEFORE_FIELD,
        after: &after,
        after_field: AFTER_FIELD,
        weights: &WeightTable::new(),
        adjustments: &[],
    };

    let err = Balancer::new(&GeoKernel).run(&inputs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(matches!(err, BalanceError::AttributeNotFound { ref attribute, .. } if attribute == BEFORE_FIELD));
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> geo::MultiPolygon<f64> {
    geo::MultiPolygon(vec![geo::polygon![
        (x: x, y: y),
        (x: x + w, y: y),
        (x: x + w, y: y + h),
        (x: x, y: y + h),
        (x: x, y: y),
    ]])
}
