//! Liquidity Projection - waiting-list depletion and maturity-profile engine
//!
//! This library provides:
//! - Seasonal cancellation trend fitting from monthly history
//! - Month-by-month waiting-list simulation with valuation of outflows
//! - Maturity-profile bucketing of assets against projected liabilities
//! - CSV loaders for the input tables and the investment ledger
//! - Batch runs over many parameter sets

pub mod error;
pub mod params;
pub mod projection;
pub mod records;
pub mod scenario;

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use params::ProjectionParams;
pub use projection::{BucketRow, ProjectionConfig, ProjectionEngine, ProjectionInputs, ProjectionOutput, ProjectionRow};
pub use records::{Category, DepartureRecord, HistoricalRecord, MaturityRecord};
pub use scenario::ScenarioRunner;
