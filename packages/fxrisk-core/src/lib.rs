//! FX Risk Core - Foreign-exchange portfolio risk metrics.
//!
//! This crate provides the calculation core of the FX risk dashboard:
//!
//! - **Valuation**: total value, position proportions, profit/loss
//! - **Risk metrics**: daily volatility, VaR, beta, hedging cost, Sharpe ratio,
//!   cumulative return, max drawdown
//! - **Ingestion**: CSV portfolio and price-history parsing
//! - **Sessions**: per-session portfolio storage feeding the advice boundary
//!
//! # Example
//!
//! ```rust
//! use fxrisk_core::calculator::{process_portfolio_data, value_at_risk, RiskSummary};
//! use fxrisk_core::ingest::read_portfolio_csv;
//!
//! let csv = "currency,quantity,rate,dailyVolatility\nEUR/USD,100000,1,0.05\n";
//! let raw = read_portfolio_csv(csv.as_bytes()).unwrap();
//! let positions = process_portfolio_data(&raw);
//!
//! let summary = RiskSummary::from_positions(&positions, 0.03);
//! assert_eq!(value_at_risk(summary.total_value, summary.portfolio_volatility), "$8,225");
//! ```

pub mod advice;
pub mod calculator;
pub mod config;
pub mod ingest;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use types::{ApiResponse, HistoricalPricePoint, Position, RawRecord};

// Re-export main functionality
pub use advice::{
    AdviceInput, AdviceProvider, HedgingAdvice, StaticAdviceProvider, StressTestResult,
};
pub use calculator::{process_portfolio_data, RiskReport, RiskSignals, RiskSummary};
pub use config::RiskConfig;
pub use session::PortfolioSessions;

/// Error types for fxrisk-core operations.
///
/// The calculator itself never fails; these cover the boundaries around it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Portfolio contains no positions")]
    EmptyPortfolio,

    #[error("No portfolio uploaded for session: {0}")]
    NoPortfolio(String),

    #[error("Invalid stress test scenario: {0}")]
    InvalidScenario(String),
}

/// Result type for fxrisk-core operations.
pub type Result<T> = std::result::Result<T, Error>;
