//! Seasonal cancellation trend
//!
//! Fits one ordinary-least-squares line per category with the calendar month
//! number (1-12) as the only predictor. Multi-year drift is ignored on purpose:
//! the model captures the within-year pattern only.

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::error::{ProjectionError, Result};
use crate::records::{Category, HistoricalRecord};

/// Number of most recent valid months used for the fit
pub const TREND_WINDOW: usize = 12;

/// Fewest valid months that determine a line
pub const MIN_TREND_ROWS: usize = 2;

/// A fitted line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    /// Ordinary least squares over paired observations.
    ///
    /// When every x is identical the slope is 0 and the intercept is the mean of y.
    pub fn ols(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len().min(ys.len());
        if n == 0 {
            return Self { intercept: 0.0, slope: 0.0 };
        }

        let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
        let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

        let (sxy, sxx) = xs[..n]
            .iter()
            .zip(&ys[..n])
            .fold((0.0, 0.0), |(sxy, sxx), (&x, &y)| {
                let dx = x - mean_x;
                (sxy + dx * (y - mean_y), sxx + dx * dx)
            });

        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        Self {
            intercept: mean_y - slope * mean_x,
            slope,
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fitted cancellation model for both categories
#[derive(Debug, Clone, PartialEq)]
pub struct TrendModel {
    pub regular: LinearFit,
    pub special: LinearFit,
    /// Floor negative predictions at zero before they are used as counts
    pub clamp_negative: bool,
    /// Number of valid historical months behind the fit (0 for the fallback model)
    pub observations: usize,
}

impl TrendModel {
    /// Model that predicts no cancellations at all
    pub fn zero() -> Self {
        let flat = LinearFit { intercept: 0.0, slope: 0.0 };
        Self {
            regular: flat,
            special: flat,
            clamp_negative: true,
            observations: 0,
        }
    }

    pub fn fit(&self, category: Category) -> &LinearFit {
        match category {
            Category::Regular => &self.regular,
            Category::Special => &self.special,
        }
    }

    /// Raw regression output for a calendar month
    pub fn predict_raw(&self, category: Category, month: NaiveDate) -> f64 {
        self.fit(category).predict(f64::from(month.month()))
    }

    /// Predicted cancellations for a month, rounded up to a whole count
    pub fn predicted_count(&self, category: Category, month: NaiveDate) -> i64 {
        let count = self.predict_raw(category, month).ceil() as i64;
        if self.clamp_negative {
            count.max(0)
        } else {
            count
        }
    }
}

/// Fits `TrendModel`s from historical cancellation records
#[derive(Debug, Clone)]
pub struct TrendEstimator {
    /// Most recent valid months to keep
    pub window: usize,
    pub clamp_negative: bool,
}

impl Default for TrendEstimator {
    fn default() -> Self {
        Self {
            window: TREND_WINDOW,
            clamp_negative: true,
        }
    }
}

impl TrendEstimator {
    pub fn new(window: usize, clamp_negative: bool) -> Self {
        Self { window, clamp_negative }
    }

    /// Most recent `window` valid records, oldest first
    pub fn select_observations<'a>(&self, history: &'a [HistoricalRecord]) -> Vec<&'a HistoricalRecord> {
        let mut valid: Vec<&HistoricalRecord> = history.iter().filter(|r| r.is_valid()).collect();
        valid.sort_by_key(|r| r.month);
        let skip = valid.len().saturating_sub(self.window);
        valid.split_off(skip)
    }

    /// Fit both categories, failing when fewer than two valid months exist
    pub fn fit(&self, history: &[HistoricalRecord]) -> Result<TrendModel> {
        let observations = self.select_observations(history);
        if observations.len() < MIN_TREND_ROWS {
            return Err(ProjectionError::InsufficientData {
                valid: observations.len(),
                required: MIN_TREND_ROWS,
            });
        }

        let xs: Vec<f64> = observations.iter().map(|r| f64::from(r.month.month())).collect();
        let series = |category: Category| -> Vec<f64> {
            observations
                .iter()
                .map(|r| r.count(category).unwrap_or(0.0))
                .collect()
        };

        let regular = LinearFit::ols(&xs, &series(Category::Regular));
        let special = LinearFit::ols(&xs, &series(Category::Special));
        debug!(
            "trend fitted on {} months: regular {:.4} + {:.4}x, special {:.4} + {:.4}x",
            observations.len(),
            regular.intercept,
            regular.slope,
            special.intercept,
            special.slope
        );

        Ok(TrendModel {
            regular,
            special,
            clamp_negative: self.clamp_negative,
            observations: observations.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::dates::month;
    use approx::assert_relative_eq;

    fn record(year: i32, m: u32, regular: f64, special: f64) -> HistoricalRecord {
        HistoricalRecord::new(month(year, m).unwrap(), Some(regular), Some(special))
    }

    #[test]
    fn test_ols_exact_line() {
        let fit = LinearFit::ols(&[1.0, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.predict(10.0), 21.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ols_constant_predictor_uses_mean() {
        let fit = LinearFit::ols(&[3.0, 3.0], &[10.0, 20.0]);
        assert_eq!(fit.slope, 0.0);
        assert_relative_eq!(fit.intercept, 15.0);
    }

    #[test]
    fn test_insufficient_data() {
        let history = vec![
            record(2024, 1, 10.0, 5.0),
            HistoricalRecord::new(month(2024, 2).unwrap(), Some(12.0), Some(0.0)),
        ];
        let err = TrendEstimator::default().fit(&history).unwrap_err();
        assert!(matches!(err, ProjectionError::InsufficientData { valid: 1, required: 2 }));

        assert!(TrendEstimator::default().fit(&[]).is_err());
    }

    #[test]
    fn test_selects_last_twelve_valid_months() {
        let mut history: Vec<HistoricalRecord> = (1..=12).map(|m| record(2023, m, 1000.0, 1000.0)).collect();
        // A gap month in the middle is skipped
        history.push(HistoricalRecord::new(month(2024, 1).unwrap(), None, Some(3.0)));
        history.extend((2..=3).map(|m| record(2024, m, 5.0, 5.0)));

        let estimator = TrendEstimator::default();
        let selected = estimator.select_observations(&history);
        assert_eq!(selected.len(), 12);
        assert_eq!(selected[0].month, month(2023, 3).unwrap());
        assert_eq!(selected[11].month, month(2024, 3).unwrap());
    }

    #[test]
    fn test_predicted_count_rounds_up() {
        // regular = 10.5 + 2x, special = 4 (flat)
        let history = vec![
            record(2024, 1, 12.5, 4.0),
            record(2024, 2, 14.5, 4.0),
            record(2024, 3, 16.5, 4.0),
        ];
        let model = TrendEstimator::default().fit(&history).unwrap();
        assert_eq!(model.observations, 3);

        // June: 10.5 + 12 = 22.5 -> 23
        let june = month(2024, 6).unwrap();
        assert_relative_eq!(model.predict_raw(Category::Regular, june), 22.5, epsilon = 1e-9);
        assert_eq!(model.predicted_count(Category::Regular, june), 23);
        assert_eq!(model.predicted_count(Category::Special, june), 4);
    }

    #[test]
    fn test_negative_prediction_clamping_is_configurable() {
        // Steep decline: 30 - 10x, so December predicts -90
        let history = vec![record(2024, 1, 20.0, 1.0), record(2024, 2, 10.0, 1.0)];
        let december = month(2024, 12).unwrap();

        let clamped = TrendEstimator::new(TREND_WINDOW, true).fit(&history).unwrap();
        assert_eq!(clamped.predicted_count(Category::Regular, december), 0);

        // Unclamped keeps the raw negative count
        let raw = TrendEstimator::new(TREND_WINDOW, false).fit(&history).unwrap();
        assert_eq!(raw.predicted_count(Category::Regular, december), -90);
    }

    #[test]
    fn test_zero_model() {
        let model = TrendModel::zero();
        assert_eq!(model.predicted_count(Category::Special, month(2030, 7).unwrap()), 0);
    }
}
