//! Access to the carbon-stock series, either an indexed external
//! export or the parametric growth model.

mod growth_model;
mod series;

pub use growth_model::GrowthModel;
pub use series::{StockSeries, TableStockSeries};
