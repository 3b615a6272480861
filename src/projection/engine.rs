//! Projection pipeline: trend fit, waiting-list simulation, maturity bucketing

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::buckets::{validate_boundaries, BucketRow, MaturityBucketer, BUCKET_BOUNDARIES};
use super::rows::ProjectionTrace;
use super::simulator::{determine_start, WaitingListSimulator, SETTLEMENT_WINDOW_MONTHS};
use super::trend::{TrendEstimator, TrendModel, MIN_TREND_ROWS, TREND_WINDOW};
use crate::error::{ProjectionError, Result};
use crate::params::ProjectionParams;
use crate::records::dates::month;
use crate::records::{DepartureRecord, HistoricalRecord, MaturityRecord};

/// Last projected month when nothing else is configured
pub fn default_horizon_end() -> NaiveDate {
    month(2050, 12).unwrap_or(NaiveDate::MAX)
}

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Last projected month (inclusive)
    pub horizon_end: NaiveDate,

    /// Bucket upper bounds in months from the simulation start
    pub bucket_boundaries: Vec<u32>,

    /// Months from the start during which departures also pay the lump sum
    pub settlement_window_months: u32,

    /// Most recent valid historical months used for the trend
    pub history_window: usize,

    /// Floor negative predicted cancellation counts at zero
    pub clamp_negative_predictions: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_end: default_horizon_end(),
            bucket_boundaries: BUCKET_BOUNDARIES.to_vec(),
            settlement_window_months: SETTLEMENT_WINDOW_MONTHS,
            history_window: TREND_WINDOW,
            clamp_negative_predictions: true,
        }
    }
}

impl ProjectionConfig {
    /// Reject settings no run can honour
    pub fn validate(&self) -> Result<()> {
        validate_boundaries(&self.bucket_boundaries)?;
        if self.history_window < MIN_TREND_ROWS {
            return Err(ProjectionError::InvalidConfig(format!(
                "history window of {} months is below the {} needed for a trend",
                self.history_window, MIN_TREND_ROWS
            )));
        }
        Ok(())
    }
}

/// Input tables for one projection pass
#[derive(Debug, Clone, Default)]
pub struct ProjectionInputs {
    pub history: Vec<HistoricalRecord>,
    pub departures: Vec<DepartureRecord>,
    pub maturities: Vec<MaturityRecord>,
}

/// Everything one pass produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    /// Monthly waiting-list trace
    pub trace: ProjectionTrace,

    /// Maturity-profile table, fixed buckets then overflow
    pub buckets: Vec<BucketRow>,

    /// False when the trend fell back to zero cancellations
    pub trend_fitted: bool,
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    params: ProjectionParams,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given parameters and config
    pub fn new(params: ProjectionParams, config: ProjectionConfig) -> Self {
        Self { params, config }
    }

    /// Fit the cancellation trend, substituting a zero model when history is too thin
    pub fn fit_trend(&self, history: &[HistoricalRecord]) -> (TrendModel, bool) {
        let estimator = TrendEstimator::new(self.config.history_window, self.config.clamp_negative_predictions);
        match estimator.fit(history) {
            Ok(model) => (model, true),
            Err(ProjectionError::InsufficientData { valid, required }) => {
                warn!(
                    "only {} valid historical months ({} needed); projecting zero cancellations",
                    valid, required
                );
                (TrendModel::zero(), false)
            }
            Err(other) => {
                warn!("trend fit failed: {}; projecting zero cancellations", other);
                (TrendModel::zero(), false)
            }
        }
    }

    /// Run the full pipeline once.
    ///
    /// An empty historical table or an invalid config is fatal; thin history
    /// and missing departure or maturity months are absorbed as zeros.
    pub fn run(&self, inputs: &ProjectionInputs) -> Result<ProjectionOutput> {
        self.config.validate()?;
        let start = determine_start(&inputs.history)?;
        let (model, trend_fitted) = self.fit_trend(&inputs.history);

        let simulator = WaitingListSimulator::new(self.params.clone(), self.config.settlement_window_months);
        let trace = simulator.simulate(&model, &inputs.departures, start, self.config.horizon_end);

        let bucketer = MaturityBucketer::new(self.config.bucket_boundaries.clone())?;
        let buckets = bucketer.aggregate(&trace, &inputs.maturities, &self.params);

        info!(
            "projection from {} over {} months into {} buckets",
            start,
            trace.rows.len(),
            buckets.len()
        );

        Ok(ProjectionOutput {
            trace,
            buckets,
            trend_fitted,
        })
    }
}
