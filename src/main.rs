//! Liquidity Projection CLI
//!
//! Loads the input tables, runs one projection pass and prints the
//! maturity-profile table.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use liquidity_projection::projection::{cumulative_gaps, ProjectionConfig, ProjectionEngine, ProjectionInputs};
use liquidity_projection::records::dates::parse_month;
use liquidity_projection::records::{
    aggregate_maturities, load_departures, load_history, load_ledger, load_maturities, Category,
};
use liquidity_projection::ProjectionParams;

#[derive(Debug, Parser)]
#[command(name = "liquidity_projection", version, about = "Waiting-list and maturity-profile projection")]
struct Args {
    /// Historical cancellation table (Month, Regular, Special)
    #[arg(long)]
    history: PathBuf,

    /// Departure schedule (Month, DeparturesRegular, DeparturesSpecial)
    #[arg(long)]
    departures: Option<PathBuf>,

    /// Monthly maturities (Month, MaturingRegularIDR, MaturingRegularUSD, MaturingSpecial)
    #[arg(long, conflicts_with = "ledger")]
    maturities: Option<PathBuf>,

    /// Investment ledger to aggregate into monthly maturities
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// JSON file with scalar parameters; missing keys use the defaults
    #[arg(long)]
    params: Option<PathBuf>,

    /// Last projected month, YYYY-MM
    #[arg(long)]
    horizon_end: Option<String>,

    /// Keep negative predicted cancellation counts instead of flooring them at zero
    #[arg(long)]
    no_clamp: bool,

    /// Write the bucket table to this CSV file
    #[arg(long, default_value = "maturity_profile.csv")]
    output: PathBuf,

    /// Also write the monthly projection rows to this CSV file
    #[arg(long)]
    trace: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = match &args.params {
        Some(path) => ProjectionParams::from_json_path(path)
            .with_context(|| format!("reading parameters from {}", path.display()))?,
        None => ProjectionParams::default(),
    };

    let mut config = ProjectionConfig {
        clamp_negative_predictions: !args.no_clamp,
        ..Default::default()
    };
    if let Some(horizon) = &args.horizon_end {
        config.horizon_end = parse_month(horizon).context("parsing --horizon-end")?;
    }

    let history = load_history(&args.history)
        .with_context(|| format!("loading history from {}", args.history.display()))?;
    if history.is_empty() {
        bail!("{} contains no rows", args.history.display());
    }

    let departures = match &args.departures {
        Some(path) => load_departures(path).with_context(|| format!("loading departures from {}", path.display()))?,
        None => Vec::new(),
    };

    let maturities = match (&args.maturities, &args.ledger) {
        (Some(path), _) => load_maturities(path).with_context(|| format!("loading maturities from {}", path.display()))?,
        (None, Some(path)) => {
            let ledger = load_ledger(path).with_context(|| format!("loading ledger from {}", path.display()))?;
            aggregate_maturities(&ledger)
        }
        (None, None) => Vec::new(),
    };

    info!(
        "inputs: {} history rows, {} departure rows, {} maturity months",
        history.len(),
        departures.len(),
        maturities.len()
    );

    let engine = ProjectionEngine::new(params, config);
    let output = engine.run(&ProjectionInputs { history, departures, maturities })?;

    if !output.trend_fitted {
        println!("Warning: not enough history for a trend, cancellations projected as zero\n");
    }

    let summary = output.trace.summary();
    println!("Projection from {} ({} months)", output.trace.start, summary.total_months);
    for category in Category::ALL {
        let totals = summary.category(category);
        let exhausted = totals
            .exhaustion_month
            .map(|m| m.format("%Y-%m").to_string())
            .unwrap_or_else(|| "not within horizon".to_string());
        println!(
            "  {:<8} cancellations {:>12}  departures {:>12}  liability {:>24.2}  exhausted {}",
            category.as_str(),
            totals.total_cancellations,
            totals.total_departures,
            totals.total_liability,
            exhausted
        );
    }

    println!();
    println!(
        "{:<10} {:>24} {:>24} {:>20} {:>20} {:>24}",
        "Bucket", "Asset Regular", "Liability Regular", "Asset Special", "Liability Special", "Cum. Gap Regular"
    );
    println!("{}", "-".repeat(148));
    for (row, (gap_regular, _)) in output.buckets.iter().zip(cumulative_gaps(&output.buckets)) {
        println!(
            "{:<10} {:>24.2} {:>24.2} {:>20.2} {:>20.2} {:>24.2}",
            row.label, row.asset_regular, row.liability_regular, row.asset_special, row.liability_special, gap_regular
        );
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in &output.buckets {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("\nMaturity profile written to: {}", args.output.display());

    if let Some(path) = &args.trace {
        let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
        for row in &output.trace.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        println!("Monthly projection written to: {}", path.display());
    }

    Ok(())
}
