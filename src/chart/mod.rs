//! Waterfall presentation of a balance.

mod waterfall;

pub use waterfall::{WaterfallBar, WaterfallChart, NET_BALANCE_LABEL};
