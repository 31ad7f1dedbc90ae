use geo::{BoundingRect, MultiPolygon};
use rstar::{RTree, AABB};

use super::bbox::BoundingBox;

/// Bounding-box index over a slice of shapes, used to skip pairs that cannot intersect.
#[derive(Debug, Clone)]
pub(crate) struct ShapeIndex {
    rtree: RTree<BoundingBox>,
}

impl ShapeIndex {
    /// Build an index over `shapes`. Shapes without a bounding box (empty) are not indexed.
    pub(crate) fn new(shapes: &[MultiPolygon<f64>]) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| shape.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
                    .collect()
            ),
        }
    }

    /// Indices of shapes whose bounding boxes touch the bounding box of `query`, in ascending order.
    pub(crate) fn candidates(&self, query: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(rect) = query.bounding_rect() else { return Vec::new() };
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());

        // R-tree traversal order is not input order; sort to keep summation reproducible.
        let mut hits: Vec<usize> = self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|bb| bb.idx())
            .collect();
        hits.sort_unstable();
        hits
    }

    #[cfg(test)]
    #[inline] pub(crate) fn len(&self) -> usize { self.rtree.size() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::square;

    #[test]
    fn candidates_are_sorted_and_filtered() {
        let shapes = vec![
            square(10.0, 10.0, 1.0),
            square(0.0, 0.0, 2.0),
            square(100.0, 100.0, 1.0),
            square(1.0, 1.0, 2.0),
        ];
        let index = ShapeIndex::new(&shapes);
        assert_eq!(index.len(), 4);

        let hits = index.candidates(&square(0.5, 0.5, 1.0));
        assert_eq!(hits, vec![1, 3]);
    }

    #[test]
    fn empty_shapes_are_skipped() {
        let shapes = vec![MultiPolygon::<f64>(vec![]), square(0.0, 0.0, 1.0)];
        let index = ShapeIndex::new(&shapes);
        assert_eq!(index.len(), 1);
        assert!(index.candidates(&MultiPolygon(vec![])).is_empty());
    }
}
