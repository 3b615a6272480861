//! Scenario runner for batch projections
//!
//! Holds the input tables once, then runs many parameter sets against them.
//! Each pass is independent, so batches fan out across threads.

use rayon::prelude::*;

use crate::error::Result;
use crate::params::ProjectionParams;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionInputs, ProjectionOutput};

/// Pre-loaded scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(inputs, ProjectionConfig::default());
///
/// let params: Vec<_> = [4_000_000, 5_000_000, 6_000_000]
///     .iter()
///     .map(|&wl| ProjectionParams { initial_wl_regular: wl, ..Default::default() })
///     .collect();
/// let results = runner.run_batch(&params);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    inputs: ProjectionInputs,
    config: ProjectionConfig,
}

impl ScenarioRunner {
    pub fn new(inputs: ProjectionInputs, config: ProjectionConfig) -> Self {
        Self { inputs, config }
    }

    /// Run a single projection with the given parameters
    pub fn run(&self, params: &ProjectionParams) -> Result<ProjectionOutput> {
        let engine = ProjectionEngine::new(params.clone(), self.config.clone());
        engine.run(&self.inputs)
    }

    /// Run every parameter set in parallel; results keep the input order
    pub fn run_batch(&self, params: &[ProjectionParams]) -> Vec<Result<ProjectionOutput>> {
        params.par_iter().map(|p| self.run(p)).collect()
    }

    /// Run the same parameters under several configurations
    pub fn run_configs(&self, params: &ProjectionParams, configs: &[ProjectionConfig]) -> Vec<Result<ProjectionOutput>> {
        configs
            .par_iter()
            .map(|config| ProjectionEngine::new(params.clone(), config.clone()).run(&self.inputs))
            .collect()
    }
}
