//! Projection engine: cancellation trend, waiting-list simulation and maturity buckets

mod buckets;
mod engine;
mod rows;
mod simulator;
mod state;
mod trend;

pub use buckets::{
    bucket_label, bucket_ranges, cumulative_gaps, overflow_label, validate_boundaries, BucketRange, BucketRow,
    MaturityBucketer, BUCKET_BOUNDARIES,
};
pub use engine::{default_horizon_end, ProjectionConfig, ProjectionEngine, ProjectionInputs, ProjectionOutput};
pub use rows::{CategorySummary, ProjectionRow, ProjectionSummary, ProjectionTrace};
pub use simulator::{determine_start, WaitingListSimulator, SETTLEMENT_WINDOW_MONTHS};
pub use state::{MonthStep, WaitingListState};
pub use trend::{LinearFit, TrendEstimator, TrendModel, MIN_TREND_ROWS, TREND_WINDOW};
