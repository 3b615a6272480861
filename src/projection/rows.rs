//! Monthly projection output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::Category;

/// A single row of projection output for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub month: NaiveDate,

    // Projected flows (counts)
    pub projected_cancellations_regular: i64,
    pub projected_cancellations_special: i64,
    pub departures_regular: i64,
    pub departures_special: i64,

    // End-of-month waiting lists
    pub waiting_list_regular: i64,
    pub waiting_list_special: i64,

    // Valuation
    pub cancellation_value_regular: f64,
    pub cancellation_value_special: f64,
    pub settlement_regular: f64,
    pub settlement_special: f64,

    // cancellation value + settlement
    pub liability_inflow_regular: f64,
    pub liability_inflow_special: f64,
}

impl ProjectionRow {
    /// Create a row with every flow at zero
    pub fn new(month: NaiveDate) -> Self {
        Self {
            month,
            projected_cancellations_regular: 0,
            projected_cancellations_special: 0,
            departures_regular: 0,
            departures_special: 0,
            waiting_list_regular: 0,
            waiting_list_special: 0,
            cancellation_value_regular: 0.0,
            cancellation_value_special: 0.0,
            settlement_regular: 0.0,
            settlement_special: 0.0,
            liability_inflow_regular: 0.0,
            liability_inflow_special: 0.0,
        }
    }

    pub fn projected_cancellations(&self, category: Category) -> i64 {
        match category {
            Category::Regular => self.projected_cancellations_regular,
            Category::Special => self.projected_cancellations_special,
        }
    }

    pub fn departures(&self, category: Category) -> i64 {
        match category {
            Category::Regular => self.departures_regular,
            Category::Special => self.departures_special,
        }
    }

    pub fn waiting_list(&self, category: Category) -> i64 {
        match category {
            Category::Regular => self.waiting_list_regular,
            Category::Special => self.waiting_list_special,
        }
    }

    pub fn cancellation_value(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.cancellation_value_regular,
            Category::Special => self.cancellation_value_special,
        }
    }

    pub fn settlement(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.settlement_regular,
            Category::Special => self.settlement_special,
        }
    }

    pub fn liability_inflow(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.liability_inflow_regular,
            Category::Special => self.liability_inflow_special,
        }
    }

    /// Record one category's flows for the month
    pub fn set_flows(
        &mut self,
        category: Category,
        cancellations: i64,
        departures: i64,
        waiting_list: i64,
        cancellation_value: f64,
        settlement: f64,
    ) {
        let liability = cancellation_value + settlement;
        match category {
            Category::Regular => {
                self.projected_cancellations_regular = cancellations;
                self.departures_regular = departures;
                self.waiting_list_regular = waiting_list;
                self.cancellation_value_regular = cancellation_value;
                self.settlement_regular = settlement;
                self.liability_inflow_regular = liability;
            }
            Category::Special => {
                self.projected_cancellations_special = cancellations;
                self.departures_special = departures;
                self.waiting_list_special = waiting_list;
                self.cancellation_value_special = cancellation_value;
                self.settlement_special = settlement;
                self.liability_inflow_special = liability;
            }
        }
    }
}

/// Monthly projection from the simulation start to the horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionTrace {
    /// First projected month
    pub start: NaiveDate,

    pub rows: Vec<ProjectionRow>,
}

impl ProjectionTrace {
    pub fn new(start: NaiveDate) -> Self {
        Self { start, rows: Vec::new() }
    }

    pub fn add_row(&mut self, row: ProjectionRow) {
        self.rows.push(row);
    }

    /// First month whose closing waiting list is zero
    pub fn exhaustion_month(&self, category: Category) -> Option<NaiveDate> {
        self.rows
            .iter()
            .find(|r| r.waiting_list(category) == 0)
            .map(|r| r.month)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let per_category = |category: Category| CategorySummary {
            total_cancellations: self.rows.iter().map(|r| r.projected_cancellations(category)).sum(),
            total_departures: self.rows.iter().map(|r| r.departures(category)).sum(),
            total_cancellation_value: self.rows.iter().map(|r| r.cancellation_value(category)).sum(),
            total_settlement: self.rows.iter().map(|r| r.settlement(category)).sum(),
            total_liability: self.rows.iter().map(|r| r.liability_inflow(category)).sum(),
            final_waiting_list: self.rows.last().map(|r| r.waiting_list(category)).unwrap_or(0),
            exhaustion_month: self.exhaustion_month(category),
        };

        ProjectionSummary {
            total_months: self.rows.len() as u32,
            regular: per_category(Category::Regular),
            special: per_category(Category::Special),
        }
    }
}

/// Totals for one category over a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub total_cancellations: i64,
    pub total_departures: i64,
    pub total_cancellation_value: f64,
    pub total_settlement: f64,
    pub total_liability: f64,
    pub final_waiting_list: i64,
    pub exhaustion_month: Option<NaiveDate>,
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub regular: CategorySummary,
    pub special: CategorySummary,
}

impl ProjectionSummary {
    pub fn category(&self, category: Category) -> &CategorySummary {
        match category {
            Category::Regular => &self.regular,
            Category::Special => &self.special,
        }
    }
}
