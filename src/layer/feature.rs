use std::{collections::BTreeMap, fmt};

use geo::{MultiPolygon, Point};

/// A single attribute value read from a vector source.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
}

impl AttributeValue {
    #[inline] pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

    /// Finite numeric view of the value; numeric text is parsed, everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null | Self::Bool(_) => None,
        };
        value.filter(|v: &f64| v.is_finite())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self { Self::Text(value.to_string()) }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self { Self::Number(value) }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self { Self::Integer(value) }
}

/// Geometry attached to a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Polygon or multipolygon geometry.
    Areal(MultiPolygon<f64>),
    Point(Point<f64>),
    /// Lines, multipoints and other geometry types the engine does not use.
    Other,
}

/// One input record: a geometry plus named attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub shape: Option<Shape>,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Feature {
    pub fn new(shape: Option<Shape>) -> Self {
        Self { shape, attributes: BTreeMap::new() }
    }

    /// Convenience constructor for an areal feature.
    pub fn polygon(shape: MultiPolygon<f64>) -> Self {
        Self::new(Some(Shape::Areal(shape)))
    }

    pub fn point(point: Point<f64>) -> Self {
        Self::new(Some(Shape::Point(point)))
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    #[inline] pub fn has_attribute(&self, name: &str) -> bool { self.attributes.contains_key(name) }

    #[inline] pub fn attribute(&self, name: &str) -> Option<&AttributeValue> { self.attributes.get(name) }

    /// The areal geometry, if any.
    pub fn polygons(&self) -> Option<&MultiPolygon<f64>> {
        match &self.shape {
            Some(Shape::Areal(mp)) => Some(mp),
            _ => None,
        }
    }
}

/// A named, unordered collection of features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub name: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self { name: name.into(), features }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// True if at least one feature carries the attribute `name`.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.features.iter().any(|feature| feature.has_attribute(name))
    }
}
