//! Core data types for the FX risk calculator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An untyped portfolio row as it arrives from tabular input or JSON.
///
/// Values may be strings (CSV) or any JSON value; they are coerced by
/// [`crate::calculator::process_portfolio_data`].
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A single portfolio line item, typically one currency pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Currency or currency-pair identifier (e.g. "EUR/USD")
    #[serde(default)]
    pub currency: String,
    /// Position size, may be negative for short positions
    #[serde(default)]
    pub quantity: f64,
    /// Exchange rate used to value the position
    #[serde(default = "default_rate")]
    pub rate: f64,
    /// Current market price
    #[serde(default)]
    pub current_price: f64,
    /// Price at which the position was opened
    #[serde(default)]
    pub open_price: f64,
    /// Daily volatility as a decimal in [0, 1]
    #[serde(default)]
    pub daily_volatility: f64,
    /// Share of total portfolio value (set by position ratios)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proportion: Option<f64>,
    /// Profit/loss (set by portfolio processing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefit: Option<f64>,
}

fn default_rate() -> f64 {
    1.0
}

impl Position {
    /// Create a position with the given currency, quantity and rate.
    pub fn new(currency: &str, quantity: f64, rate: f64) -> Self {
        Self {
            currency: currency.to_string(),
            quantity,
            rate,
            current_price: 0.0,
            open_price: 0.0,
            daily_volatility: 0.0,
            proportion: None,
            benefit: None,
        }
    }

    /// Set open and current prices.
    pub fn with_prices(mut self, open_price: f64, current_price: f64) -> Self {
        self.open_price = open_price;
        self.current_price = current_price;
        self
    }

    /// Set the daily volatility.
    pub fn with_volatility(mut self, daily_volatility: f64) -> Self {
        self.daily_volatility = daily_volatility;
        self
    }

    /// Rate used for valuation. A zero or NaN rate counts as 1.
    pub fn effective_rate(&self) -> f64 {
        if self.rate == 0.0 || self.rate.is_nan() {
            1.0
        } else {
            self.rate
        }
    }

    /// Position value: `quantity * rate`.
    pub fn value(&self) -> f64 {
        self.quantity * self.effective_rate()
    }
}

/// One observation in a chronological price history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistoricalPricePoint {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl HistoricalPricePoint {
    pub fn new(price: f64) -> Self {
        Self { price, date: None }
    }

    pub fn on(date: NaiveDate, price: f64) -> Self {
        Self {
            price,
            date: Some(date),
        }
    }
}

impl From<f64> for HistoricalPricePoint {
    fn from(price: f64) -> Self {
        Self::new(price)
    }
}

/// API response wrapper used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_value() {
        let pos = Position::new("EUR/USD", 1000.0, 1.1);
        assert!((pos.value() - 1100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate_counts_as_one() {
        let pos = Position::new("USD", 500.0, 0.0);
        assert_eq!(pos.value(), 500.0);
    }

    #[test]
    fn test_position_serde_camel_case() {
        let pos = Position::new("EUR", 10.0, 1.0).with_prices(3.0, 5.0);
        let json = serde_json::to_value(&pos).unwrap();

        assert_eq!(json["currentPrice"], 5.0);
        assert_eq!(json["openPrice"], 3.0);
        assert!(json.get("proportion").is_none());
        assert!(json.get("benefit").is_none());
    }

    #[test]
    fn test_position_deserialize_defaults() {
        let pos: Position = serde_json::from_str(r#"{"currency":"GBP","quantity":5}"#).unwrap();
        assert_eq!(pos.rate, 1.0);
        assert_eq!(pos.daily_volatility, 0.0);
        assert!(pos.proportion.is_none());
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
