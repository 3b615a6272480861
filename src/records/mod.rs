//! Input tables: historical cancellations, departures, maturities and the investment ledger

mod data;
pub mod dates;
pub mod ledger;
pub mod loader;

pub use data::{Category, DepartureRecord, HistoricalRecord, MaturityRecord};
pub use ledger::{aggregate_maturities, load_ledger, Currency, LedgerRow};
pub use loader::{
    load_departures, load_departures_from_reader, load_history, load_history_from_reader,
    load_maturities, load_maturities_from_reader,
};
