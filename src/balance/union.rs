use geo::MultiPolygon;
use tracing::debug;

use crate::error::EngineResult;
use crate::geom::GeometryKernel;
use super::{group::GroupedGeometry, rows::Category};

/// One overlap-free region per before-category.
#[derive(Debug, Clone, Default)]
pub struct UnionByCategory {
    entries: Vec<(Category, MultiPolygon<f64>)>,
}

impl UnionByCategory {
    /// Union the polygons of every category of `grouped`.
    ///
    /// A category whose union degenerates to nothing is kept with an empty region.
    pub fn build(grouped: &GroupedGeometry, kernel: &dyn GeometryKernel) -> EngineResult<Self> {
        let entries = grouped.iter()
            .map(|(category, shapes)| {
                let region = kernel.union(shapes)?;
                debug!("[balance::union] {category}: {} polygon(s) -> area {:.2}", shapes.len(), kernel.area(&region));
                Ok((category.to_string(), region))
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Region of `category`, if it exists.
    pub fn get(&self, category: &str) -> Option<&MultiPolygon<f64>> {
        self.entries.iter().find(|(c, _)| c == category).map(|(_, region)| region)
    }

    /// Iterate `(category, region)` in before-category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MultiPolygon<f64>)> {
        self.entries.iter().map(|(category, region)| (category.as_str(), region))
    }

    /// Union of every category's region.
    pub fn merged(&self, kernel: &dyn GeometryKernel) -> EngineResult<MultiPolygon<f64>> {
        let regions: Vec<MultiPolygon<f64>> = self.entries.iter()
            .filter(|(_, region)| !region.0.is_empty())
            .map(|(_, region)| region.clone())
            .collect();
        kernel.union(&regions)
    }
}
