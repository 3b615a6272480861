//! Input record structures for the projection engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Waiting-list category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Regular registrants
    Regular,
    /// Special registrants
    Special,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Regular, Category::Special];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Regular => "regular",
            Category::Special => "special",
        }
    }

    /// Parse a category label as it appears in the source spreadsheets
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "regular" | "reguler" => Some(Category::Regular),
            "special" | "khusus" => Some(Category::Special),
            _ => None,
        }
    }
}

/// One month of recorded cancellation counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// First day of the month
    pub month: NaiveDate,

    /// Cancellations in the regular category (None = not recorded)
    pub regular_count: Option<f64>,

    /// Cancellations in the special category (None = not recorded)
    pub special_count: Option<f64>,
}

impl HistoricalRecord {
    pub fn new(month: NaiveDate, regular_count: Option<f64>, special_count: Option<f64>) -> Self {
        Self { month, regular_count, special_count }
    }

    /// Both counts recorded and non-zero
    pub fn is_valid(&self) -> bool {
        is_recorded(self.regular_count) && is_recorded(self.special_count)
    }

    pub fn count(&self, category: Category) -> Option<f64> {
        match category {
            Category::Regular => self.regular_count,
            Category::Special => self.special_count,
        }
    }
}

fn is_recorded(count: Option<f64>) -> bool {
    matches!(count, Some(c) if c.is_finite() && c != 0.0)
}

/// Scheduled departures for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartureRecord {
    pub month: NaiveDate,
    pub departures_regular: i64,
    pub departures_special: i64,
}

impl DepartureRecord {
    pub fn departures(&self, category: Category) -> i64 {
        match category {
            Category::Regular => self.departures_regular,
            Category::Special => self.departures_special,
        }
    }
}

/// Asset amounts maturing in one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturityRecord {
    pub month: NaiveDate,
    pub maturing_regular_idr: f64,
    pub maturing_regular_usd: f64,
    pub maturing_special: f64,
}

impl MaturityRecord {
    pub fn empty(month: NaiveDate) -> Self {
        Self {
            month,
            maturing_regular_idr: 0.0,
            maturing_regular_usd: 0.0,
            maturing_special: 0.0,
        }
    }

    /// Maturing amount attributed to a category; regular combines both currencies
    pub fn maturing(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.maturing_regular_idr + self.maturing_regular_usd,
            Category::Special => self.maturing_special,
        }
    }
}
