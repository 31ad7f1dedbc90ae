use ahash::AHashMap;
use geo::MultiPolygon;
use tracing::{debug, warn};

use crate::error::{BalanceError, EngineResult};
use crate::geom::{GeometryKernel, ShapeIndex};
use crate::layer::FeatureCollection;
use super::rows::{Category, NULL_CATEGORY};

/// Polygons of one collection partitioned by a categorical attribute.
///
/// Categories keep the order in which they first appear in the input, and
/// polygons keep input order within a category.
#[derive(Debug, Clone, Default)]
pub struct GroupedGeometry {
    categories: Vec<Category>,
    index: AHashMap<Category, usize>, // Map between categories and positions in `groups`.
    groups: Vec<Vec<MultiPolygon<f64>>>,
    rtrees: Vec<ShapeIndex>, // One bounding-box index per group.
}

impl GroupedGeometry {
    /// Group the areal features of `layer` by the value of `attribute`.
    ///
    /// Features with null, empty, or non-areal geometry are dropped. Features
    /// lacking the attribute are grouped under [`NULL_CATEGORY`]. Fails if the
    /// layer has features but none of them carries `attribute`.
    pub fn from_layer(layer: &FeatureCollection, attribute: &str, kernel: &dyn GeometryKernel) -> EngineResult<Self> {
        if !layer.is_empty() && !layer.has_attribute(attribute) {
            return Err(BalanceError::AttributeNotFound {
                layer: layer.name.clone(),
                attribute: attribute.to_string(),
            });
        }

        let mut grouped = Self::default();
        let (mut dropped, mut unlabelled) = (0usize, 0usize);

        for feature in &layer.features {
            let Some(shape) = feature.polygons().filter(|mp| !kernel.is_empty(mp)) else {
                dropped += 1;
                continue;
            };
            let category = match feature.attribute(attribute) {
                Some(value) if !value.is_null() => value.to_string(),
                _ => {
                    unlabelled += 1;
                    NULL_CATEGORY.to_string()
                }
            };
            grouped.push(category, shape.clone());
        }

        if dropped > 0 {
            debug!("[balance::group] {}: dropped {dropped} feature(s) without areal geometry", layer.name);
        }
        if unlabelled > 0 {
            warn!("[balance::group] {}: {unlabelled} feature(s) have no '{attribute}' value, grouped as {NULL_CATEGORY}", layer.name);
        }

        grouped.rtrees = grouped.groups.iter().map(|shapes| ShapeIndex::new(shapes)).collect();
        Ok(grouped)
    }

    fn push(&mut self, category: Category, shape: MultiPolygon<f64>) {
        let idx = *self.index.entry(category.clone()).or_insert_with(|| {
            self.categories.push(category);
            self.groups.push(Vec::new());
            self.groups.len() - 1
        });
        self.groups[idx].push(shape);
    }

    /// Number of categories.
    #[inline] pub fn len(&self) -> usize { self.categories.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.categories.is_empty() }

    /// Categories in order of first appearance.
    #[inline] pub fn categories(&self) -> &[Category] { &self.categories }

    /// Polygons of `category`, if it exists.
    pub fn get(&self, category: &str) -> Option<&[MultiPolygon<f64>]> {
        self.index.get(category).map(|&idx| self.groups[idx].as_slice())
    }

    /// Iterate `(category, polygons)` in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MultiPolygon<f64>])> {
        self.categories.iter().map(String::as_str).zip(self.groups.iter().map(Vec::as_slice))
    }

    /// Total number of polygons across all categories.
    pub fn polygon_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// All polygons, category by category.
    pub fn all_polygons(&self) -> impl Iterator<Item = &MultiPolygon<f64>> {
        self.groups.iter().flatten()
    }

    /// Sum of raw (non-unioned) polygon areas per category.
    pub fn total_area_by_category(&self, kernel: &dyn GeometryKernel) -> Vec<(Category, f64)> {
        self.iter()
            .map(|(category, shapes)| (category.to_string(), shapes.iter().map(|s| kernel.area(s)).sum()))
            .collect()
    }

    /// Sum over the polygons of group `group` of their intersection area with `region`.
    pub(crate) fn intersection_area(&self, group: usize, region: &MultiPolygon<f64>, kernel: &dyn GeometryKernel) -> EngineResult<f64> {
        let shapes = &self.groups[group];
        let mut area = 0.0;
        for idx in self.rtrees[group].candidates(region) {
            let shape = &shapes[idx];
            if kernel.intersects(region, shape) {
                area += kernel.area(&kernel.intersection(region, shape)?);
            }
        }
        Ok(area)
    }
}
