//! Portfolio-level summaries handed to the reporting and advice boundaries.

use super::risk::{hedging_cost, portfolio_volatility, sharpe_ratio, value_at_risk, var_amount};
use super::valuation::{profit_loss, total_value};
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Headline metrics returned after an upload.
///
/// These three numbers are also the only data passed to an advice provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    /// Sum of `quantity * rate`
    pub total_value: f64,
    /// Value-weighted daily volatility
    pub portfolio_volatility: f64,
    /// Sharpe ratio against the given risk-free rate
    pub sharpe_ratio: f64,
}

impl RiskSummary {
    /// Calculate the summary for processed positions.
    pub fn from_positions(positions: &[Position], risk_free_rate: f64) -> Self {
        Self {
            total_value: total_value(positions),
            portfolio_volatility: portfolio_volatility(positions),
            sharpe_ratio: sharpe_ratio(positions, risk_free_rate),
        }
    }
}

/// Every portfolio-level metric the dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    /// Number of positions
    pub position_count: usize,
    /// Total portfolio value
    pub total_value: f64,
    /// Sum of per-position profit/loss
    pub total_profit_loss: f64,
    /// Number of positions with a gain
    pub positions_in_profit: usize,
    /// Number of positions with a loss
    pub positions_in_loss: usize,
    /// Value-weighted daily volatility
    pub portfolio_volatility: f64,
    /// 95% VaR magnitude
    pub var_amount: f64,
    /// 95% VaR formatted as currency
    pub value_at_risk: String,
    /// Sharpe ratio
    pub sharpe_ratio: f64,
    /// Hedging cost ratio, when a hedging tool cost is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedging_cost: Option<f64>,
}

impl RiskReport {
    /// Calculate the report for processed positions.
    ///
    /// P/L uses each position's `benefit` when present, otherwise it is computed.
    pub fn from_positions(
        positions: &[Position],
        risk_free_rate: f64,
        hedging_tool_cost: Option<f64>,
    ) -> Self {
        let summary = RiskSummary::from_positions(positions, risk_free_rate);

        let pnl: Vec<f64> = positions
            .iter()
            .map(|p| p.benefit.unwrap_or_else(|| profit_loss(p)))
            .collect();

        Self {
            position_count: positions.len(),
            total_value: summary.total_value,
            total_profit_loss: pnl.iter().sum(),
            positions_in_profit: pnl.iter().filter(|&&v| v > 0.0).count(),
            positions_in_loss: pnl.iter().filter(|&&v| v < 0.0).count(),
            portfolio_volatility: summary.portfolio_volatility,
            var_amount: var_amount(summary.total_value, summary.portfolio_volatility),
            value_at_risk: value_at_risk(summary.total_value, summary.portfolio_volatility),
            sharpe_ratio: summary.sharpe_ratio,
            hedging_cost: hedging_tool_cost.map(|cost| hedging_cost(cost, summary.total_value)),
        }
    }

    /// The headline subset of this report.
    pub fn summary(&self) -> RiskSummary {
        RiskSummary {
            total_value: self.total_value,
            portfolio_volatility: self.portfolio_volatility,
            sharpe_ratio: self.sharpe_ratio,
        }
    }
}
