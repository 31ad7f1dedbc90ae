use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use geo::{Area, BooleanOps, Intersects, MultiPolygon};

use crate::error::{BalanceError, EngineResult};

/// Relative tolerance for area comparisons.
pub const AREA_TOLERANCE: f64 = 1e-6;

/// Planar polygon set algebra needed by the balancing engine.
///
/// Every operation is pure: inputs are borrowed and never modified.
/// Failures are reported as [`BalanceError::GeometryOperation`] and abort the run,
/// except inside the advisory overlap check.
pub trait GeometryKernel {
    /// Unsigned planar area in CRS units.
    fn area(&self, shape: &MultiPolygon<f64>) -> f64;

    /// Union of all `shapes`; an empty slice yields an empty shape.
    fn union(&self, shapes: &[MultiPolygon<f64>]) -> EngineResult<MultiPolygon<f64>>;

    fn intersection(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> EngineResult<MultiPolygon<f64>>;

    /// Region of `a` not covered by `b`.
    fn difference(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> EngineResult<MultiPolygon<f64>>;

    fn intersects(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool;

    /// True if `shape` has no polygons or no area.
    fn is_empty(&self, shape: &MultiPolygon<f64>) -> bool {
        shape.0.is_empty() || self.area(shape) == 0.0
    }

    /// Relative tolerance within which two areas are considered equal.
    fn tolerance(&self) -> f64 { AREA_TOLERANCE }
}

/// [`GeometryKernel`] backed by the `geo` crate's boolean operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoKernel;

impl GeoKernel {
    /// Run a boolean operation, turning a panic inside `geo` into an error.
    fn guarded<F>(operation: &'static str, f: F) -> EngineResult<MultiPolygon<f64>>
    where
        F: FnOnce() -> MultiPolygon<f64>,
    {
        panic::catch_unwind(AssertUnwindSafe(f))
            .map_err(|payload| BalanceError::GeometryOperation { operation, message: panic_message(payload) })
    }
}

impl GeometryKernel for GeoKernel {
    fn area(&self, shape: &MultiPolygon<f64>) -> f64 {
        shape.unsigned_area()
    }

    fn union(&self, shapes: &[MultiPolygon<f64>]) -> EngineResult<MultiPolygon<f64>> {
        match shapes {
            [] => Ok(MultiPolygon(Vec::new())),
            [single] => Self::guarded("union", || single.union(&MultiPolygon(Vec::new()))),
            _ => Self::guarded("union", || geo::unary_union(shapes.iter())),
        }
    }

    fn intersection(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> EngineResult<MultiPolygon<f64>> {
        Self::guarded("intersection", || a.intersection(b))
    }

    fn difference(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> EngineResult<MultiPolygon<f64>> {
        Self::guarded("difference", || a.difference(b))
    }

    fn intersects(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
        a.intersects(b)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "geometry kernel panicked".to_string()
    }
}

/// True if `a` and `b` agree within `tol` relative to the larger magnitude (absolute below 1.0).
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::square;

    #[test]
    fn panicking_operation_becomes_error() {
        let err = GeoKernel::guarded("union", || panic!("degenerate ring")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::GeometryOperation);
        match err {
            BalanceError::GeometryOperation { operation, message } => {
                assert_eq!(operation, "union");
                assert!(message.contains("degenerate ring"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn union_collapses_overlaps() {
        let kernel = GeoKernel;
        let merged = kernel.union(&[square(0.0, 0.0, 10.0), square(5.0, 0.0, 10.0)]).unwrap();
        assert!(approx_eq(kernel.area(&merged), 150.0, AREA_TOLERANCE));
    }

    #[test]
    fn union_of_nothing_is_empty() {
        let kernel = GeoKernel;
        let merged = kernel.union(&[]).unwrap();
        assert!(kernel.is_empty(&merged));
    }

    #[test]
    fn intersection_and_difference_partition_area() {
        let kernel = GeoKernel;
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);

        let inner = kernel.intersection(&a, &b).unwrap();
        let outer = kernel.difference(&a, &b).unwrap();
        assert!(approx_eq(kernel.area(&inner), 25.0, AREA_TOLERANCE));
        assert!(approx_eq(kernel.area(&inner) + kernel.area(&outer), 100.0, AREA_TOLERANCE));
    }

    #[test]
    fn disjoint_shapes_do_not_intersect() {
        let kernel = GeoKernel;
        assert!(!kernel.intersects(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0)));
        assert!(kernel.intersects(&square(0.0, 0.0, 2.0), &square(1.0, 1.0, 2.0)));
    }

    #[test]
    fn approx_eq_is_relative() {
        assert!(approx_eq(1_000_000.0, 1_000_000.5, AREA_TOLERANCE));
        assert!(!approx_eq(100.0, 100.5, AREA_TOLERANCE));
        assert!(approx_eq(0.0, 1e-9, AREA_TOLERANCE));
    }
}
