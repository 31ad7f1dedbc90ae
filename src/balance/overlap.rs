use crate::error::EngineResult;
use crate::geom::{GeometryKernel, ShapeIndex};
use super::{group::GroupedGeometry, rows::Category};

/// Find a pair of polygons in `grouped` whose interiors overlap.
///
/// With `across_categories_only`, overlaps inside one category are allowed.
/// Boundary contact is not an overlap; neither is a sliver below the kernel tolerance.
pub fn find_overlap(
    grouped: &GroupedGeometry,
    across_categories_only: bool,
    kernel: &dyn GeometryKernel,
) -> EngineResult<Option<(Category, Category)>> {
    let (owners, shapes): (Vec<usize>, Vec<_>) = grouped.iter()
        .enumerate()
        .flat_map(|(c, (_, shapes))| shapes.iter().map(move |shape| (c, shape.clone())))
        .unzip();
    let index = ShapeIndex::new(&shapes);

    for (i, shape) in shapes.iter().enumerate() {
        for j in index.candidates(shape) {
            if j <= i { continue } // check each unordered pair once
            if across_categories_only && owners[i] == owners[j] { continue }
            if !kernel.intersects(shape, &shapes[j]) { continue }

            let overlap = kernel.area(&kernel.intersection(shape, &shapes[j])?);
            let smaller = kernel.area(shape).min(kernel.area(&shapes[j]));
            if overlap > kernel.tolerance() * smaller.max(1.0) {
                let categories = grouped.categories();
                return Ok(Some((categories[owners[i]].clone(), categories[owners[j]].clone())));
            }
        }
    }
    Ok(None)
}
