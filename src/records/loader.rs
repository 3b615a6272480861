//! Load the historical, departure and maturity tables from CSV
//!
//! Numeric cells that are blank or not numbers (`n.a.`, `-`, ...) load as missing
//! rather than failing the whole file.

use std::io::Read;
use std::path::Path;

use csv::Reader;
use log::debug;

use super::dates::parse_month;
use super::{DepartureRecord, HistoricalRecord, MaturityRecord};
use crate::error::Result;

/// Raw CSV row of the historical cancellation table
#[derive(Debug, serde::Deserialize)]
struct HistoryCsvRow {
    #[serde(rename = "Month", alias = "month")]
    month: String,
    #[serde(rename = "Regular", alias = "regular_count", deserialize_with = "csv::invalid_option")]
    regular: Option<f64>,
    #[serde(rename = "Special", alias = "special_count", deserialize_with = "csv::invalid_option")]
    special: Option<f64>,
}

/// Raw CSV row of the departure table
#[derive(Debug, serde::Deserialize)]
struct DepartureCsvRow {
    #[serde(rename = "Month", alias = "month")]
    month: String,
    #[serde(rename = "DeparturesRegular", alias = "departures_regular", deserialize_with = "csv::invalid_option")]
    regular: Option<f64>,
    #[serde(rename = "DeparturesSpecial", alias = "departures_special", deserialize_with = "csv::invalid_option")]
    special: Option<f64>,
}

/// Raw CSV row of the maturity table
#[derive(Debug, serde::Deserialize)]
struct MaturityCsvRow {
    #[serde(rename = "Month", alias = "month")]
    month: String,
    #[serde(rename = "MaturingRegularIDR", alias = "maturing_regular_idr", deserialize_with = "csv::invalid_option")]
    regular_idr: Option<f64>,
    #[serde(rename = "MaturingRegularUSD", alias = "maturing_regular_usd", deserialize_with = "csv::invalid_option")]
    regular_usd: Option<f64>,
    #[serde(rename = "MaturingSpecial", alias = "maturing_special", deserialize_with = "csv::invalid_option")]
    special: Option<f64>,
}

/// Departure counts are whole registrants; fractional cells are rounded
fn to_count(value: Option<f64>) -> i64 {
    value.filter(|v| v.is_finite()).map(|v| v.round() as i64).unwrap_or(0)
}

/// Load the historical cancellation table from a CSV file
pub fn load_history<P: AsRef<Path>>(path: P) -> Result<Vec<HistoricalRecord>> {
    let file = std::fs::File::open(path)?;
    load_history_from_reader(file)
}

/// Load the historical cancellation table from any reader, sorted by month
pub fn load_history_from_reader<R: Read>(reader: R) -> Result<Vec<HistoricalRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let row: HistoryCsvRow = result?;
        records.push(HistoricalRecord::new(parse_month(&row.month)?, row.regular, row.special));
    }

    records.sort_by_key(|r| r.month);
    debug!("loaded {} historical rows", records.len());
    Ok(records)
}

/// Load the departure table from a CSV file
pub fn load_departures<P: AsRef<Path>>(path: P) -> Result<Vec<DepartureRecord>> {
    let file = std::fs::File::open(path)?;
    load_departures_from_reader(file)
}

/// Load the departure table from any reader, sorted by month
pub fn load_departures_from_reader<R: Read>(reader: R) -> Result<Vec<DepartureRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let row: DepartureCsvRow = result?;
        records.push(DepartureRecord {
            month: parse_month(&row.month)?,
            departures_regular: to_count(row.regular),
            departures_special: to_count(row.special),
        });
    }

    records.sort_by_key(|r| r.month);
    debug!("loaded {} departure rows", records.len());
    Ok(records)
}

/// Load the maturity table from a CSV file
pub fn load_maturities<P: AsRef<Path>>(path: P) -> Result<Vec<MaturityRecord>> {
    let file = std::fs::File::open(path)?;
    load_maturities_from_reader(file)
}

/// Load the maturity table from any reader, sorted by month
pub fn load_maturities_from_reader<R: Read>(reader: R) -> Result<Vec<MaturityRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let row: MaturityCsvRow = result?;
        records.push(MaturityRecord {
            month: parse_month(&row.month)?,
            maturing_regular_idr: row.regular_idr.unwrap_or(0.0),
            maturing_regular_usd: row.regular_usd.unwrap_or(0.0),
            maturing_special: row.special.unwrap_or(0.0),
        });
    }

    records.sort_by_key(|r| r.month);
    debug!("loaded {} maturity rows", records.len());
    Ok(records)
}
