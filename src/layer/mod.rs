mod catalog;
mod feature;

pub use catalog::{LayerCatalog, MemoryCatalog};
pub use feature::{AttributeValue, Feature, FeatureCollection, Shape};
