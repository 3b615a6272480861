//! User-editable scalar inputs of a projection pass

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::records::Category;

/// Scalar parameters supplied alongside the input tables
///
/// Defaults are the figures the liquidity dashboard ships with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    /// Registrants on the regular waiting list at the start of the projection
    pub initial_wl_regular: i64,
    /// Registrants on the special waiting list at the start of the projection
    pub initial_wl_special: i64,
    /// Average balance held per regular registrant
    pub balance_per_member_regular: f64,
    /// Average balance held per special registrant
    pub balance_per_member_special: f64,
    /// Lump-sum settlement paid in a regular departure month inside the settlement window
    pub lump_sum_regular: f64,
    /// Lump-sum settlement paid in a special departure month inside the settlement window
    pub lump_sum_special: f64,
    /// Funds currently placed for the regular category
    pub fund_placement_regular: f64,
    /// Funds currently placed for the special category
    pub fund_placement_special: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            initial_wl_regular: 5_299_092,
            initial_wl_special: 126_577,
            balance_per_member_regular: 26_837_630.65,
            balance_per_member_special: 4_447.77,
            lump_sum_regular: 348_246_879_200.0,
            lump_sum_special: 19_980_365.77,
            fund_placement_regular: 28_942_792_290_449.1,
            fund_placement_special: 378_282_969.67,
        }
    }
}

impl ProjectionParams {
    /// Load parameters from a JSON file; absent keys keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn initial_wl(&self, category: Category) -> i64 {
        match category {
            Category::Regular => self.initial_wl_regular,
            Category::Special => self.initial_wl_special,
        }
    }

    pub fn balance_per_member(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.balance_per_member_regular,
            Category::Special => self.balance_per_member_special,
        }
    }

    pub fn lump_sum(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.lump_sum_regular,
            Category::Special => self.lump_sum_special,
        }
    }

    pub fn fund_placement(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.fund_placement_regular,
            Category::Special => self.fund_placement_special,
        }
    }
}
