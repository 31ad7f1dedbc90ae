mod bbox;
mod index;
mod kernel;

pub(crate) use index::ShapeIndex;
pub use kernel::{approx_eq, GeoKernel, GeometryKernel, AREA_TOLERANCE};
