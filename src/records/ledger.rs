//! Investment ledger rows and their aggregation into monthly maturities
//!
//! The ledger is the editable placement table: one row per investment with a
//! quantity, a unit price and a maturity date. Rows are rolled up by maturity
//! month into the asset feed the bucketer consumes.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::dates::parse_optional_date;
use super::{Category, MaturityRecord};
use crate::error::{ProjectionError, Result};

/// Currency of a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Idr,
    Usd,
}

impl Currency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IDR" | "RP" => Some(Currency::Idr),
            "USD" | "US$" => Some(Currency::Usd),
            _ => None,
        }
    }
}

/// One investment placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub category: Category,
    pub currency: Currency,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    /// Nominal amount in reporting currency
    pub amount: f64,
    /// None when the sheet says `n.a.` or the cell is blank
    pub maturity_date: Option<NaiveDate>,
}

impl LedgerRow {
    /// Recompute `amount` from quantity and price; a missing side counts as zero.
    /// Rows carrying neither keep the amount they were loaded with.
    pub fn recompute_amount(&mut self) {
        if self.quantity.is_some() || self.price.is_some() {
            self.amount = self.quantity.unwrap_or(0.0) * self.price.unwrap_or(0.0);
        }
    }
}

/// Raw CSV row of the investment ledger
#[derive(Debug, Deserialize)]
struct LedgerCsvRow {
    #[serde(rename = "Category", alias = "category")]
    category: String,
    #[serde(rename = "Currency", alias = "currency")]
    currency: String,
    #[serde(rename = "Qty", alias = "quantity", default, deserialize_with = "csv::invalid_option")]
    quantity: Option<f64>,
    #[serde(rename = "Price", alias = "price", default, deserialize_with = "csv::invalid_option")]
    price: Option<f64>,
    #[serde(rename = "Amount", alias = "amount", default, deserialize_with = "csv::invalid_option")]
    amount: Option<f64>,
    #[serde(rename = "maturity date", alias = "maturity_date", default)]
    maturity_date: String,
}

impl LedgerCsvRow {
    fn into_row(self) -> Result<LedgerRow> {
        let category = Category::parse(&self.category)
            .ok_or_else(|| ProjectionError::UnknownCategory(self.category.clone()))?;
        // Unlabelled placements are domestic
        let currency = if self.currency.trim().is_empty() {
            Currency::Idr
        } else {
            Currency::parse(&self.currency).ok_or_else(|| ProjectionError::UnknownCurrency(self.currency.clone()))?
        };

        let mut row = LedgerRow {
            category,
            currency,
            quantity: self.quantity,
            price: self.price,
            amount: self.amount.unwrap_or(0.0),
            maturity_date: parse_optional_date(&self.maturity_date),
        };
        row.recompute_amount();
        Ok(row)
    }
}

/// Load the investment ledger from a CSV file
pub fn load_ledger<P: AsRef<Path>>(path: P) -> Result<Vec<LedgerRow>> {
    let file = std::fs::File::open(path)?;
    load_ledger_from_reader(file)
}

/// Load the investment ledger from any reader
pub fn load_ledger_from_reader<R: Read>(reader: R) -> Result<Vec<LedgerRow>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let raw: LedgerCsvRow = result?;
        rows.push(raw.into_row()?);
    }

    Ok(rows)
}

/// Roll ledger rows up into one `MaturityRecord` per maturity month, sorted by month
pub fn aggregate_maturities(rows: &[LedgerRow]) -> Vec<MaturityRecord> {
    let mut by_month: BTreeMap<NaiveDate, MaturityRecord> = BTreeMap::new();
    let mut undated = 0usize;

    for row in rows {
        let Some(month) = row.maturity_date else {
            undated += 1;
            continue;
        };
        let record = by_month.entry(month).or_insert_with(|| MaturityRecord::empty(month));
        match (row.category, row.currency) {
            (Category::Regular, Currency::Idr) => record.maturing_regular_idr += row.amount,
            (Category::Regular, Currency::Usd) => record.maturing_regular_usd += row.amount,
            (Category::Special, _) => record.maturing_special += row.amount,
        }
    }

    if undated > 0 {
        warn!("{} ledger rows have no maturity date and were skipped", undated);
    }
    info!("aggregated {} ledger rows into {} maturity months", rows.len(), by_month.len());

    by_month.into_values().collect()
}
