//! Shapefile feature reading.

use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use shapefile::{self as shp, dbase::{FieldValue, Record}, Reader, Shape as ShpShape};

use crate::layer::{AttributeValue, Feature, FeatureCollection, Shape};

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path, name: &str) -> Result<FeatureCollection> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("[io::shp] Error reading shape+record")?;
        features.push(Feature { shape: convert_shape(shape), attributes: convert_record(record) });
    }
    Ok(FeatureCollection::new(name, features))
}

fn convert_shape(shape: ShpShape) -> Option<Shape> {
    match shape {
        ShpShape::NullShape => None,
        ShpShape::Polygon(p) => Some(Shape::Areal(rings_to_geo(p.rings(), |pt| Coord { x: pt.x, y: pt.y }))),
        ShpShape::PolygonM(p) => Some(Shape::Areal(rings_to_geo(p.rings(), |pt| Coord { x: pt.x, y: pt.y }))),
        ShpShape::PolygonZ(p) => Some(Shape::Areal(rings_to_geo(p.rings(), |pt| Coord { x: pt.x, y: pt.y }))),
        ShpShape::Point(p) => Some(Shape::Point(Point::new(p.x, p.y))),
        ShpShape::PointM(p) => Some(Shape::Point(Point::new(p.x, p.y))),
        ShpShape::PointZ(p) => Some(Shape::Point(Point::new(p.x, p.y))),
        _ => Some(Shape::Other),
    }
}

/// Convert shapefile rings to a MultiPolygon: each outer ring starts a polygon,
/// following inner rings are its holes (Shapefile stores rings in this order).
fn rings_to_geo<P>(rings: &[shp::PolygonRing<P>], xy: impl Fn(&P) -> Coord<f64>) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0])
        }
    }

    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(&xy).collect();
        ensure_closed(&mut coords);
        let ls = LineString(coords);

        match ring {
            shp::PolygonRing::Outer(_) => {
                // flush previous polygon
                if let Some(ext) = current_exterior.take() {
                    polys.push(Polygon::new(ext, std::mem::take(&mut current_holes)));
                }
                current_exterior = Some(ls);
            }
            shp::PolygonRing::Inner(_) => current_holes.push(ls),
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    MultiPolygon(polys)
}

fn convert_record(record: Record) -> std::collections::BTreeMap<String, AttributeValue> {
    record.into_iter()
        .map(|(field, value)| (field, convert_value(value)))
        .collect()
}

fn convert_value(value: FieldValue) -> AttributeValue {
    match value {
        FieldValue::Character(Some(s)) => AttributeValue::Text(s.trim_end().to_string()),
        FieldValue::Memo(s) => AttributeValue::Text(s),
        FieldValue::Numeric(Some(n)) | FieldValue::Double(n) | FieldValue::Currency(n) => AttributeValue::Number(n),
        FieldValue::Float(Some(f)) => AttributeValue::Number(f64::from(f)),
        FieldValue::Integer(i) => AttributeValue::Integer(i64::from(i)),
        FieldValue::Logical(Some(b)) => AttributeValue::Bool(b),
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Float(None)
        | FieldValue::Logical(None)
        | FieldValue::Date(None) => AttributeValue::Null,
        other => AttributeValue::Text(format!("{other:?}")),
    }
}
