//! CSV ingestion of portfolios and price histories.
//!
//! Output of [`read_portfolio_csv`] must go through
//! [`crate::calculator::process_portfolio_data`] before any calculation.

use crate::types::{HistoricalPricePoint, RawRecord};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns a portfolio file must carry.
const REQUIRED_PORTFOLIO_COLUMNS: [&str; 2] = ["currency", "quantity"];

#[derive(Debug, Deserialize)]
struct PriceRow {
    price: String,
    #[serde(default)]
    date: Option<String>,
}

/// Parse a headered portfolio CSV into raw records.
///
/// Fields are trimmed and kept as strings; blank rows are skipped.
pub fn read_portfolio_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_PORTFOLIO_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.iter().all(str::is_empty) {
            continue;
        }

        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.to_string(), Value::String(value.to_string())))
            .collect();
        records.push(record);
    }

    if records.is_empty() {
        return Err(Error::EmptyPortfolio);
    }

    tracing::debug!(rows = records.len(), "Parsed portfolio CSV");
    Ok(records)
}

/// Parse a chronological price history with a `price` column and optional `date`.
///
/// Unparseable or non-finite prices become 0, which volatility calculation skips.
pub fn read_price_history_csv<R: Read>(reader: R) -> Result<Vec<HistoricalPricePoint>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    if !reader.headers()?.iter().any(|h| h == "price") {
        return Err(Error::MissingColumn("price".to_string()));
    }

    let mut points = Vec::new();
    for result in reader.deserialize() {
        let row: PriceRow = result?;
        let price = row
            .price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .unwrap_or(0.0);
        let date = row
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        points.push(match date {
            Some(date) => HistoricalPricePoint::on(date, price),
            None => HistoricalPricePoint::new(price),
        });
    }

    tracing::debug!(points = points.len(), "Parsed price history CSV");
    Ok(points)
}

/// Load a portfolio CSV from disk.
pub fn load_portfolio_file(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let file = File::open(path.as_ref())?;
    read_portfolio_csv(file)
}

/// Load a price history CSV from disk.
pub fn load_price_history_file(path: impl AsRef<Path>) -> Result<Vec<HistoricalPricePoint>> {
    let file = File::open(path.as_ref())?;
    read_price_history_csv(file)
}
