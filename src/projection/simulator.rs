//! Month-by-month waiting-list depletion
//!
//! Walks each category forward from the simulation start to the horizon,
//! applying predicted cancellations and scheduled departures, and values the
//! resulting flows.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::{debug, info};

use super::rows::{ProjectionRow, ProjectionTrace};
use super::state::WaitingListState;
use super::trend::TrendModel;
use crate::error::{ProjectionError, Result};
use crate::params::ProjectionParams;
use crate::records::dates::{add_months, months_between};
use crate::records::{Category, DepartureRecord, HistoricalRecord};

/// Months from the simulation start during which departures also pay the lump sum
pub const SETTLEMENT_WINDOW_MONTHS: u32 = 13;

/// First month to simulate: the month after the last fully recorded one.
///
/// Every row after the last valid month is a gap (one of the counts is zero or
/// missing), so the first gap and "one month later" coincide. With no valid
/// month at all the projection starts at the first row of the table.
pub fn determine_start(history: &[HistoricalRecord]) -> Result<NaiveDate> {
    let first = history
        .iter()
        .map(|r| r.month)
        .min()
        .ok_or(ProjectionError::EmptyHistory)?;

    let start = history
        .iter()
        .filter(|r| r.is_valid())
        .map(|r| r.month)
        .max()
        .map(|last_valid| add_months(last_valid, 1))
        .unwrap_or(first);

    Ok(start)
}

/// Departure counts keyed by month.
///
/// Each record is floored at zero before duplicate months are summed, so a
/// negative row never cancels out a real one.
fn index_departures(departures: &[DepartureRecord]) -> HashMap<NaiveDate, (i64, i64)> {
    let mut by_month: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
    for record in departures {
        let entry = by_month.entry(record.month).or_default();
        entry.0 = entry.0.saturating_add(record.departures(Category::Regular).max(0));
        entry.1 = entry.1.saturating_add(record.departures(Category::Special).max(0));
    }
    by_month
}

/// Waiting-list simulator for both categories
#[derive(Debug, Clone)]
pub struct WaitingListSimulator {
    params: ProjectionParams,
    settlement_window_months: u32,
}

impl WaitingListSimulator {
    pub fn new(params: ProjectionParams, settlement_window_months: u32) -> Self {
        Self {
            params,
            settlement_window_months,
        }
    }

    /// Settlement paid out for a month's departures.
    ///
    /// Inside the window every month with departures also pays the category's lump sum.
    pub fn settlement_flow(&self, category: Category, departures: i64, month_offset: u32) -> f64 {
        let base = departures as f64 * self.params.balance_per_member(category);
        if month_offset < self.settlement_window_months && departures > 0 {
            base + self.params.lump_sum(category)
        } else {
            base
        }
    }

    /// Run the simulation from `start` through `horizon_end` inclusive
    pub fn simulate(
        &self,
        model: &TrendModel,
        departures: &[DepartureRecord],
        start: NaiveDate,
        horizon_end: NaiveDate,
    ) -> ProjectionTrace {
        let mut trace = ProjectionTrace::new(start);
        let months = months_between(start, horizon_end) + 1;
        if months <= 0 {
            info!("simulation start {} is past the horizon {}", start, horizon_end);
            return trace;
        }

        let departures = index_departures(departures);
        let mut regular = WaitingListState::new(self.params.initial_wl(Category::Regular));
        let mut special = WaitingListState::new(self.params.initial_wl(Category::Special));

        for offset in 0..months as u32 {
            let month = add_months(start, offset);
            let (dep_regular, dep_special) = departures.get(&month).copied().unwrap_or((0, 0));
            let mut row = ProjectionRow::new(month);

            for (category, state, scheduled) in [
                (Category::Regular, &mut regular, dep_regular),
                (Category::Special, &mut special, dep_special),
            ] {
                let predicted = model.predicted_count(category, month);
                let step = state.step(predicted, scheduled);
                let cancellation_value = step.cancellations as f64 * self.params.balance_per_member(category);
                let settlement = self.settlement_flow(category, step.departures, offset);
                row.set_flows(
                    category,
                    step.cancellations,
                    step.departures,
                    step.waiting_list,
                    cancellation_value,
                    settlement,
                );
            }

            trace.add_row(row);
        }

        debug!(
            "simulated {} months from {}: regular exhausted {:?}, special exhausted {:?}",
            trace.rows.len(),
            start,
            trace.exhaustion_month(Category::Regular),
            trace.exhaustion_month(Category::Special)
        );

        trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::trend::LinearFit;
    use crate::records::dates::month;
    use approx::assert_relative_eq;

    fn flat_model(regular: f64, special: f64) -> TrendModel {
        TrendModel {
            regular: LinearFit { intercept: regular, slope: 0.0 },
            special: LinearFit { intercept: special, slope: 0.0 },
            clamp_negative: true,
            observations: 12,
        }
    }

    fn params(initial_regular: i64, initial_special: i64) -> ProjectionParams {
        ProjectionParams {
            initial_wl_regular: initial_regular,
            initial_wl_special: initial_special,
            balance_per_member_regular: 2.0,
            balance_per_member_special: 3.0,
            lump_sum_regular: 1000.0,
            lump_sum_special: 500.0,
            ..Default::default()
        }
    }

    fn departure(m: NaiveDate, regular: i64, special: i64) -> DepartureRecord {
        DepartureRecord {
            month: m,
            departures_regular: regular,
            departures_special: special,
        }
    }

    #[test]
    fn test_determine_start_after_last_valid_month() {
        let history = vec![
            HistoricalRecord::new(month(2024, 1).unwrap(), Some(5.0), Some(2.0)),
            HistoricalRecord::new(month(2024, 2).unwrap(), Some(6.0), Some(3.0)),
            HistoricalRecord::new(month(2024, 3).unwrap(), Some(6.0), Some(0.0)),
            HistoricalRecord::new(month(2024, 4).unwrap(), None, None),
        ];
        assert_eq!(determine_start(&history).unwrap(), month(2024, 3).unwrap());

        // No gap rows: the month after the last record
        assert_eq!(determine_start(&history[..2]).unwrap(), month(2024, 3).unwrap());

        // Nothing valid: start of the table
        assert_eq!(determine_start(&history[2..]).unwrap(), month(2024, 3).unwrap());

        assert!(matches!(determine_start(&[]), Err(ProjectionError::EmptyHistory)));
    }

    #[test]
    fn test_horizon_is_inclusive() {
        let simulator = WaitingListSimulator::new(params(100, 100), SETTLEMENT_WINDOW_MONTHS);
        let trace = simulator.simulate(
            &flat_model(0.0, 0.0),
            &[],
            month(2050, 1).unwrap(),
            month(2050, 12).unwrap(),
        );
        assert_eq!(trace.rows.len(), 12);
        assert_eq!(trace.rows.last().unwrap().month, month(2050, 12).unwrap());

        let empty = simulator.simulate(&flat_model(0.0, 0.0), &[], month(2051, 1).unwrap(), month(2050, 12).unwrap());
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn test_recurrence_and_valuation() {
        let start = month(2025, 1).unwrap();
        let simulator = WaitingListSimulator::new(params(100, 50), SETTLEMENT_WINDOW_MONTHS);
        let departures = vec![departure(start, 10, 0), departure(add_months(start, 1), 200, 5)];
        let trace = simulator.simulate(&flat_model(4.0, 1.0), &departures, start, add_months(start, 3));

        let first = &trace.rows[0];
        assert_eq!(first.waiting_list_regular, 86);
        assert_relative_eq!(first.cancellation_value_regular, 8.0);
        assert_relative_eq!(first.settlement_regular, 10.0 * 2.0 + 1000.0);
        assert_relative_eq!(first.liability_inflow_regular, 8.0 + 1020.0);
        // No special departures: no lump sum
        assert_relative_eq!(first.settlement_special, 0.0);

        // 86 - 4 = 82 remain, departures clamped from 200
        let second = &trace.rows[1];
        assert_eq!(second.departures_regular, 82);
        assert_eq!(second.waiting_list_regular, 0);
        assert_eq!(second.waiting_list_special, 49 - 1 - 5);

        // Absorbed from the third month on
        for row in &trace.rows[2..] {
            assert_eq!(row.projected_cancellations_regular, 0);
            assert_eq!(row.departures_regular, 0);
            assert_eq!(row.waiting_list_regular, 0);
            assert_relative_eq!(row.liability_inflow_regular, 0.0);
        }
    }

    #[test]
    fn test_settlement_window() {
        let simulator = WaitingListSimulator::new(params(1, 1), SETTLEMENT_WINDOW_MONTHS);
        assert_relative_eq!(simulator.settlement_flow(Category::Regular, 3, 0), 1006.0);
        assert_relative_eq!(simulator.settlement_flow(Category::Regular, 3, 12), 1006.0);
        assert_relative_eq!(simulator.settlement_flow(Category::Regular, 3, 13), 6.0);
        assert_relative_eq!(simulator.settlement_flow(Category::Regular, 3, 14), 6.0);
        assert_relative_eq!(simulator.settlement_flow(Category::Special, 0, 2), 0.0);
    }

    #[test]
    fn test_lump_sum_applies_at_offset_twelve_not_fourteen() {
        let start = month(2025, 1).unwrap();
        let simulator = WaitingListSimulator::new(params(1_000_000, 1_000_000), SETTLEMENT_WINDOW_MONTHS);
        let departures = vec![
            departure(add_months(start, 12), 7, 0),
            departure(add_months(start, 14), 7, 0),
        ];
        let trace = simulator.simulate(&flat_model(0.0, 0.0), &departures, start, add_months(start, 20));

        assert_relative_eq!(trace.rows[12].settlement_regular, 7.0 * 2.0 + 1000.0);
        assert_relative_eq!(trace.rows[14].settlement_regular, 7.0 * 2.0);
    }

    #[test]
    fn test_departure_rows_floored_before_summing() {
        let start = month(2025, 1).unwrap();
        let departures = vec![
            departure(start, -5, 4),
            departure(start, 10, 6),
            departure(add_months(start, 1), -3, 0),
        ];
        let indexed = index_departures(&departures);
        assert_eq!(indexed[&start], (10, 10));
        assert_eq!(indexed[&add_months(start, 1)], (0, 0));

        let simulator = WaitingListSimulator::new(params(100, 100), SETTLEMENT_WINDOW_MONTHS);
        let trace = simulator.simulate(&flat_model(0.0, 0.0), &departures, start, add_months(start, 1));
        assert_eq!(trace.rows[0].departures_regular, 10);
        assert_eq!(trace.rows[0].departures_special, 10);
        assert_eq!(trace.rows[0].waiting_list_regular, 90);
        assert_eq!(trace.rows[1].departures_regular, 0);
        assert_eq!(trace.rows[1].waiting_list_regular, 90);
    }

    #[test]
    fn test_departure_sums_saturate() {
        let start = month(2025, 1).unwrap();
        let indexed = index_departures(&[departure(start, i64::MAX, 1), departure(start, i64::MAX, 1)]);
        assert_eq!(indexed[&start], (i64::MAX, 2));
    }

    #[test]
    fn test_departures_missing_from_table_count_as_zero() {
        let start = month(2025, 1).unwrap();
        let simulator = WaitingListSimulator::new(params(10, 10), SETTLEMENT_WINDOW_MONTHS);
        let trace = simulator.simulate(&flat_model(1.0, 1.0), &[], start, add_months(start, 2));
        assert!(trace.rows.iter().all(|r| r.departures_regular == 0 && r.departures_special == 0));
        assert_eq!(trace.rows[2].waiting_list_regular, 7);
    }
}
