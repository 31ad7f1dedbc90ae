#![allow(dead_code)]

use geo::{polygon, MultiPolygon};
use nettonull::{
    AdjustmentRow, BalanceInputs, BalanceResult, Balancer, Feature, FeatureCollection, GeoKernel,
    WeightTable,
};

pub const BEFORE_FIELD: &str = "IMPV_Code";
pub const AFTER_FIELD: &str = "BBF_Beschreibung";

pub fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: x, y: y),
        (x: x + side, y: y),
        (x: x + side, y: y + side),
        (x: x, y: y + side),
        (x: x, y: y),
    ]])
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

pub fn layer(name: &str, field: &str, parts: &[(MultiPolygon<f64>, &str)]) -> FeatureCollection {
    let features = parts.iter()
        .map(|(shape, category)| Feature::polygon(shape.clone()).with(field, *category))
        .collect();
    FeatureCollection::new(name, features)
}

pub fn balance(
    before: &FeatureCollection,
    after: &FeatureCollection,
    weights: &WeightTable,
    adjustments: &[AdjustmentRow],
) -> BalanceResult {
    let inputs = BalanceInputs {
        before,
        before_field: BEFORE_FIELD,
        after,
        after_field: AFTER_FIELD,
        weights,
        adjustments,
    };
    Balancer::new(&GeoKernel).run(&inputs).unwrap()
}

/// `{"type": "FeatureCollection", ...}` with one polygon feature per square.
pub fn geojson(field: &str, parts: &[((f64, f64, f64), &str)]) -> String {
    let features = parts.iter()
        .map(|((x, y, s), category)| serde_json::json!({
            "type": "Feature",
            "properties": { field: category },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[x, y], [x + s, y], [x + s, y + s], [x, y + s], [x, y]]],
            },
        }))
        .collect::<Vec<_>>();
    serde_json::json!({ "type": "FeatureCollection", "features": features }).to_string()
}
