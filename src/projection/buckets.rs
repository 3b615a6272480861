//! Maturity-profile bucketing
//!
//! Groups the monthly asset (maturities) and liability (projected outflows)
//! series into forward time buckets for the liquidity-gap table.
//! Month indices are 1-based from the simulation start; bucket `k` covers
//! `(boundary[k-1], boundary[k]]` and a final overflow bucket takes the rest.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rows::ProjectionTrace;
use crate::error::{ProjectionError, Result};
use crate::params::ProjectionParams;
use crate::records::{Category, MaturityRecord};

/// Upper bounds of the fixed buckets, in months from the simulation start
pub const BUCKET_BOUNDARIES: [u32; 13] = [1, 3, 6, 12, 24, 36, 48, 60, 72, 84, 96, 108, 120];

/// Inclusive month-index range covered by one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRange {
    /// First month index in the bucket (1-based)
    pub first: u32,
    /// Last month index, `None` for the overflow bucket
    pub last: Option<u32>,
}

impl BucketRange {
    pub fn contains(&self, index: u32) -> bool {
        index >= self.first && self.last.map_or(true, |last| index <= last)
    }
}

/// Display label for a bucket upper bound: months below a year, whole years above
pub fn bucket_label(boundary: u32) -> String {
    if boundary < 12 {
        format!("{} mo", boundary)
    } else {
        format!("{} year", boundary / 12)
    }
}

/// Label of the overflow bucket past the last boundary
pub fn overflow_label(boundaries: &[u32]) -> String {
    let last = boundaries.last().copied().unwrap_or(0);
    if last < 12 {
        format!(">{} mo", last)
    } else {
        format!(">{} year", last / 12)
    }
}

/// Ranges for each boundary followed by the overflow range
pub fn bucket_ranges(boundaries: &[u32]) -> Vec<BucketRange> {
    let mut ranges = Vec::with_capacity(boundaries.len() + 1);
    let mut previous = 0;
    for &boundary in boundaries {
        ranges.push(BucketRange {
            first: previous + 1,
            last: Some(boundary),
        });
        previous = boundary;
    }
    ranges.push(BucketRange {
        first: previous + 1,
        last: None,
    });
    ranges
}

/// One row of the maturity-profile table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRow {
    pub label: String,
    pub asset_regular: f64,
    pub liability_regular: f64,
    pub asset_special: f64,
    pub liability_special: f64,
}

impl BucketRow {
    pub fn new(label: String) -> Self {
        Self {
            label,
            asset_regular: 0.0,
            liability_regular: 0.0,
            asset_special: 0.0,
            liability_special: 0.0,
        }
    }

    pub fn asset(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.asset_regular,
            Category::Special => self.asset_special,
        }
    }

    pub fn liability(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.liability_regular,
            Category::Special => self.liability_special,
        }
    }

    /// Asset minus liability
    pub fn gap(&self, category: Category) -> f64 {
        self.asset(category) - self.liability(category)
    }
}

/// Running (regular, special) liquidity gap through each bucket
pub fn cumulative_gaps(rows: &[BucketRow]) -> Vec<(f64, f64)> {
    rows.iter()
        .scan((0.0, 0.0), |running, row| {
            running.0 += row.gap(Category::Regular);
            running.1 += row.gap(Category::Special);
            Some(*running)
        })
        .collect()
}

/// Aggregates the monthly series into maturity buckets
#[derive(Debug, Clone)]
pub struct MaturityBucketer {
    boundaries: Vec<u32>,
}

impl Default for MaturityBucketer {
    fn default() -> Self {
        Self {
            boundaries: BUCKET_BOUNDARIES.to_vec(),
        }
    }
}

/// Boundaries must be non-empty, start above zero and strictly increase
pub fn validate_boundaries(boundaries: &[u32]) -> Result<()> {
    match boundaries.first() {
        None => return Err(ProjectionError::InvalidConfig("no bucket boundaries".to_string())),
        Some(0) => {
            return Err(ProjectionError::InvalidConfig(
                "first bucket boundary must be at least 1 month".to_string(),
            ))
        }
        Some(_) => {}
    }
    if let Some(pair) = boundaries.windows(2).find(|w| w[0] >= w[1]) {
        return Err(ProjectionError::InvalidConfig(format!(
            "bucket boundaries must strictly increase, found {} then {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

impl MaturityBucketer {
    pub fn new(boundaries: Vec<u32>) -> Result<Self> {
        validate_boundaries(&boundaries)?;
        Ok(Self { boundaries })
    }

    /// Bucket position for a 1-based month index; the overflow bucket is last
    pub fn bucket_for(&self, index: u32) -> usize {
        self.boundaries.partition_point(|&boundary| boundary < index)
    }

    /// Build the bucket table.
    ///
    /// The liability trace drives the month series; maturity months with no
    /// projected row are ignored and projected months with no maturity count as
    /// zero assets. Current fund placements land in the first bucket.
    pub fn aggregate(
        &self,
        trace: &ProjectionTrace,
        maturities: &[MaturityRecord],
        params: &ProjectionParams,
    ) -> Vec<BucketRow> {
        let mut rows: Vec<BucketRow> = self
            .boundaries
            .iter()
            .map(|&b| BucketRow::new(bucket_label(b)))
            .collect();
        rows.push(BucketRow::new(overflow_label(&self.boundaries)));

        let mut assets: HashMap<NaiveDate, (f64, f64)> = HashMap::new();
        for record in maturities {
            let entry = assets.entry(record.month).or_default();
            entry.0 += record.maturing(Category::Regular);
            entry.1 += record.maturing(Category::Special);
        }

        for (i, projected) in trace.rows.iter().enumerate() {
            let bucket = &mut rows[self.bucket_for(i as u32 + 1)];
            let (asset_regular, asset_special) = assets.get(&projected.month).copied().unwrap_or_default();

            bucket.asset_regular += asset_regular;
            bucket.asset_special += asset_special;
            bucket.liability_regular += projected.liability_inflow_regular;
            bucket.liability_special += projected.liability_inflow_special;
        }

        rows[0].asset_regular += params.fund_placement(Category::Regular);
        rows[0].asset_special += params.fund_placement(Category::Special);

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::rows::ProjectionRow;
    use crate::records::dates::{add_months, month};
    use approx::assert_relative_eq;

    fn trace_with_liabilities(start: NaiveDate, months: u32) -> ProjectionTrace {
        let mut trace = ProjectionTrace::new(start);
        for i in 0..months {
            let mut row = ProjectionRow::new(add_months(start, i));
            row.set_flows(Category::Regular, 1, 0, 100, 1.0, 0.0);
            row.set_flows(Category::Special, 1, 0, 100, 0.5, 0.0);
            trace.add_row(row);
        }
        trace
    }

    fn params_with_placement(regular: f64, special: f64) -> ProjectionParams {
        ProjectionParams {
            fund_placement_regular: regular,
            fund_placement_special: special,
            ..Default::default()
        }
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> = BUCKET_BOUNDARIES.iter().map(|&b| bucket_label(b)).collect();
        assert_eq!(labels[0], "1 mo");
        assert_eq!(labels[2], "6 mo");
        assert_eq!(labels[3], "1 year");
        assert_eq!(labels[4], "2 year");
        assert_eq!(labels[12], "10 year");
        assert_eq!(overflow_label(&BUCKET_BOUNDARIES), ">10 year");
    }

    #[test]
    fn test_ranges_partition_every_month_once() {
        let ranges = bucket_ranges(&BUCKET_BOUNDARIES);
        assert_eq!(ranges.len(), 14);
        assert_eq!(ranges[0], BucketRange { first: 1, last: Some(1) });
        assert_eq!(ranges[1], BucketRange { first: 2, last: Some(3) });
        assert_eq!(ranges[13], BucketRange { first: 121, last: None });

        let bucketer = MaturityBucketer::default();
        for index in 1..=400 {
            let covering: Vec<usize> = ranges
                .iter()
                .enumerate()
                .filter(|(_, r)| r.contains(index))
                .map(|(k, _)| k)
                .collect();
            assert_eq!(covering.len(), 1, "month {} covered {} times", index, covering.len());
            assert_eq!(covering[0], bucketer.bucket_for(index));
        }
    }

    #[test]
    fn test_aggregate_counts_months_per_bucket() {
        let start = month(2025, 1).unwrap();
        let trace = trace_with_liabilities(start, 150);
        let rows = MaturityBucketer::default().aggregate(&trace, &[], &params_with_placement(0.0, 0.0));

        assert_eq!(rows.len(), 14);
        let expected_months = [1.0, 2.0, 3.0, 6.0, 12.0, 12.0, 12.0, 12.0, 12.0, 12.0, 12.0, 12.0, 12.0, 30.0];
        for (row, months) in rows.iter().zip(expected_months) {
            assert_relative_eq!(row.liability_regular, months);
            assert_relative_eq!(row.liability_special, months * 0.5);
        }
    }

    #[test]
    fn test_first_bucket_adds_fund_placement() {
        let start = month(2025, 1).unwrap();
        let trace = trace_with_liabilities(start, 24);
        let maturities = vec![
            MaturityRecord {
                month: start,
                maturing_regular_idr: 100.0,
                maturing_regular_usd: 50.0,
                maturing_special: 10.0,
            },
            MaturityRecord {
                month: add_months(start, 1),
                maturing_regular_idr: 1.0,
                maturing_regular_usd: 0.0,
                maturing_special: 2.0,
            },
            // Before the start: not part of any bucket
            MaturityRecord {
                month: month(2024, 6).unwrap(),
                maturing_regular_idr: 9999.0,
                maturing_regular_usd: 0.0,
                maturing_special: 9999.0,
            },
        ];
        let rows = MaturityBucketer::default().aggregate(&trace, &maturities, &params_with_placement(5000.0, 700.0));

        assert_relative_eq!(rows[0].asset_regular, 150.0 + 5000.0);
        assert_relative_eq!(rows[0].asset_special, 10.0 + 700.0);
        assert_relative_eq!(rows[1].asset_regular, 1.0);
        assert_relative_eq!(rows[1].asset_special, 2.0);

        let total_regular: f64 = rows.iter().map(|r| r.asset_regular).sum();
        assert_relative_eq!(total_regular, 5151.0);
    }

    #[test]
    fn test_rejects_unordered_boundaries() {
        for bad in [vec![6, 3, 12], vec![3, 3], vec![], vec![0, 1]] {
            let err = MaturityBucketer::new(bad.clone()).unwrap_err();
            assert!(matches!(err, ProjectionError::InvalidConfig(_)), "{:?} accepted", bad);
        }
        assert!(MaturityBucketer::new(vec![1, 2, 12]).is_ok());
        assert!(validate_boundaries(&BUCKET_BOUNDARIES).is_ok());
    }

    #[test]
    fn test_custom_boundaries_partition() {
        let start = month(2025, 1).unwrap();
        let trace = trace_with_liabilities(start, 10);
        let bucketer = MaturityBucketer::new(vec![3, 6]).unwrap();
        let rows = bucketer.aggregate(&trace, &[], &params_with_placement(0.0, 0.0));

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["3 mo", "6 mo", ">6 mo"]);
        let liabilities: Vec<f64> = rows.iter().map(|r| r.liability(Category::Regular)).collect();
        assert_eq!(liabilities, vec![3.0, 3.0, 4.0]);
    }

    #[test]
    fn test_cumulative_gaps() {
        let mut first = BucketRow::new("1 mo".into());
        first.asset_regular = 10.0;
        first.liability_regular = 4.0;
        first.liability_special = 1.0;
        let mut second = BucketRow::new("3 mo".into());
        second.liability_regular = 8.0;
        second.asset_special = 3.0;

        assert_relative_eq!(first.gap(Category::Regular), 6.0);
        assert_relative_eq!(second.gap(Category::Special), 3.0);
        let gaps = cumulative_gaps(&[first, second]);
        assert_eq!(gaps, vec![(6.0, -1.0), (-2.0, 2.0)]);
    }
}
