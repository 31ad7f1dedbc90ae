//! GeoJSON feature reading.

use std::{collections::BTreeMap, path::Path};

use anyhow::{anyhow, bail, Result};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde_json::Value;

use crate::layer::{AttributeValue, Feature, FeatureCollection, Shape};

/// Parse a GeoJSON FeatureCollection from bytes.
pub(crate) fn read_geojson_bytes(bytes: &[u8], name: &str) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| anyhow!("[io::geojson] Failed to parse GeoJSON: {e}"))?;

    if value["type"].as_str() != Some("FeatureCollection") {
        bail!("[io::geojson] Expected a FeatureCollection");
    }
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson] FeatureCollection has no 'features' array"))?;

    let features = features.iter()
        .enumerate()
        .map(|(i, feature)| parse_feature(feature).map_err(|e| anyhow!("[io::geojson] Feature {i}: {e}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection::new(name, features))
}

/// Layer name for a file: its stem.
pub(crate) fn layer_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("layer")
        .to_string()
}

fn parse_feature(feature: &Value) -> Result<Feature> {
    let shape = match &feature["geometry"] {
        Value::Null => None,
        geometry => Some(parse_geometry(geometry)?),
    };

    let attributes = match &feature["properties"] {
        Value::Object(map) => map.iter()
            .map(|(key, value)| (key.clone(), parse_property(value)))
            .collect(),
        _ => BTreeMap::new(),
    };

    Ok(Feature { shape, attributes })
}

fn parse_geometry(geometry: &Value) -> Result<Shape> {
    let coords = &geometry["coordinates"];
    match geometry["type"].as_str() {
        Some("Polygon") => Ok(Shape::Areal(MultiPolygon(vec![parse_polygon(coords)?]))),
        Some("MultiPolygon") => {
            let polygons = coords.as_array()
                .ok_or_else(|| anyhow!("MultiPolygon coordinates must be an array"))?
                .iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>>>()?;
            Ok(Shape::Areal(MultiPolygon(polygons)))
        }
        Some("Point") => Ok(Shape::Point(Point::from(parse_coord(coords)?))),
        Some(_) => Ok(Shape::Other),
        None => bail!("geometry has no 'type'"),
    }
}

/// Parse `[exterior, hole, hole, ...]`.
fn parse_polygon(rings: &Value) -> Result<Polygon<f64>> {
    let rings = rings.as_array()
        .ok_or_else(|| anyhow!("Polygon coordinates must be an array of rings"))?;
    let mut rings = rings.iter().map(parse_ring);

    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString(Vec::new()),
    };
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring `[[x, y], ...]`, closing it if needed.
fn parse_ring(ring: &Value) -> Result<LineString<f64>> {
    let mut points = ring.as_array()
        .ok_or_else(|| anyhow!("ring must be an array of positions"))?
        .iter()
        .map(parse_coord)
        .collect::<Result<Vec<_>>>()?;

    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    Ok(LineString(points))
}

fn parse_coord(position: &Value) -> Result<Coord<f64>> {
    let position = position.as_array()
        .filter(|p| p.len() >= 2)
        .ok_or_else(|| anyhow!("position must have at least two coordinates"))?;
    let x = position[0].as_f64().ok_or_else(|| anyhow!("x must be a number"))?;
    let y = position[1].as_f64().ok_or_else(|| anyhow!("y must be a number"))?;
    Ok(Coord { x, y })
}

fn parse_property(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Integer(i),
            None => AttributeValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => AttributeValue::Text(s.clone()),
        other => AttributeValue::Text(other.to_string()),
    }
}
