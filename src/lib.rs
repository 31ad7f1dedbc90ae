#![doc = "Nettonull: net-balance calculator for land-cover transitions"]
pub mod balance;
pub mod chart;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod geom;
pub mod io;
pub mod layer;

#[doc(inline)]
pub use balance::{
    AdjustmentRow, BalanceInputs, BalanceResult, BalanceSummary, BalancedRow, Balancer,
    MissingAreaPolicy, TransitionRow, WeightTable,
};

#[doc(inline)]
pub use config::{LayerSource, RunConfig};

#[doc(inline)]
pub use error::{BalanceError, EngineResult, ErrorKind};

#[doc(inline)]
pub use geom::{GeoKernel, GeometryKernel};

#[doc(inline)]
pub use io::{balance_table_string, read_layer, read_weight_table};

#[doc(inline)]
pub use layer::{AttributeValue, Feature, FeatureCollection, LayerCatalog, MemoryCatalog, Shape};
