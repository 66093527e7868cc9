//! Portfolio risk metrics.
//!
//! Provides daily volatility, VaR, beta, hedging cost, portfolio volatility,
//! Sharpe ratio, cumulative return and max drawdown. Like the valuation
//! functions these never fail; invalid input yields a neutral value.

use super::valuation::total_value;
use crate::types::{HistoricalPricePoint, Position};

/// One-tailed z-score for 95% confidence.
pub const Z_SCORE_95: f64 = 1.645;

/// Fixed annual expected return used by [`sharpe_ratio`].
pub const EXPECTED_RETURN: f64 = 0.08;

/// Default annual risk-free rate.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.03;

/// Calculate daily volatility from a chronological price history.
///
/// Standard deviation of log returns `ln(p[i] / p[i-1])` over consecutive pairs
/// where both prices are positive. Divides by the number of valid returns
/// (population form). Fewer than two points, or no valid pairs, gives 0.
pub fn daily_volatility(history: &[HistoricalPricePoint]) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = history
        .windows(2)
        .filter(|w| w[0].price > 0.0 && w[1].price > 0.0)
        .map(|w| (w[1].price / w[0].price).ln())
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    variance.sqrt()
}

/// Unformatted 95% VaR magnitude: `|portfolio_value * daily_volatility * 1.645|`.
///
/// Zero or non-finite inputs yield 0.
pub fn var_amount(portfolio_value: f64, daily_volatility: f64) -> f64 {
    if !is_usable(portfolio_value) || !is_usable(daily_volatility) {
        return 0.0;
    }
    (portfolio_value * daily_volatility * Z_SCORE_95).abs()
}

/// Calculate 95% Value at Risk formatted as currency, e.g. `"$8,225"`.
///
/// The amount is rounded to a whole number and reported as a positive magnitude.
pub fn value_at_risk(portfolio_value: f64, daily_volatility: f64) -> String {
    format_currency(round_half_up(var_amount(portfolio_value, daily_volatility)))
}

/// Calculate beta of an asset against a market benchmark.
///
/// `cov(asset, market) / var(market)`, both normalized by `n`. Mismatched or empty
/// series, or a flat market, give the market-neutral default of 1.
pub fn beta(asset_returns: &[f64], market_returns: &[f64]) -> f64 {
    if asset_returns.len() != market_returns.len() {
        tracing::warn!(
            asset = asset_returns.len(),
            market = market_returns.len(),
            "Return series lengths differ, using beta of 1"
        );
        return 1.0;
    }
    if asset_returns.is_empty() {
        return 1.0;
    }

    let n = asset_returns.len() as f64;
    let asset_mean = asset_returns.iter().sum::<f64>() / n;
    let market_mean = market_returns.iter().sum::<f64>() / n;

    let (covariance, market_variance) = asset_returns
        .iter()
        .zip(market_returns)
        .fold((0.0, 0.0), |(cov, var), (a, m)| {
            let dm = m - market_mean;
            (cov + (a - asset_mean) * dm, var + dm * dm)
        });

    let covariance = covariance / n;
    let market_variance = market_variance / n;

    if market_variance == 0.0 {
        1.0
    } else {
        covariance / market_variance
    }
}

/// Hedging cost as a fraction of portfolio value.
///
/// Zero or non-finite inputs yield 0.
pub fn hedging_cost(tool_cost: f64, portfolio_value: f64) -> f64 {
    if !is_usable(tool_cost) || !is_usable(portfolio_value) {
        return 0.0;
    }
    tool_cost / portfolio_value
}

/// Value-weighted average of each position's daily volatility.
///
/// Ignores correlation between positions. Zero total value gives 0.
pub fn portfolio_volatility(positions: &[Position]) -> f64 {
    let total = total_value(positions);
    if total == 0.0 {
        return 0.0;
    }

    positions
        .iter()
        .map(|p| {
            let vol = if p.daily_volatility.is_nan() {
                0.0
            } else {
                p.daily_volatility
            };
            (p.value() / total) * vol
        })
        .sum()
}

/// Sharpe ratio: `(EXPECTED_RETURN - risk_free_rate) / portfolio_volatility`.
///
/// Uses the fixed [`EXPECTED_RETURN`]. Empty portfolios and zero volatility give 0.
pub fn sharpe_ratio(positions: &[Position], risk_free_rate: f64) -> f64 {
    if positions.is_empty() {
        return 0.0;
    }

    let volatility = portfolio_volatility(positions);
    if volatility == 0.0 {
        return 0.0;
    }

    (EXPECTED_RETURN - risk_free_rate) / volatility
}

/// Cumulative return `(final - initial) / initial` as a decimal.
///
/// Zero or non-finite inputs yield 0.
pub fn cumulative_return(final_value: f64, initial_value: f64) -> f64 {
    if !is_usable(final_value) || !is_usable(initial_value) {
        return 0.0;
    }
    (final_value - initial_value) / initial_value
}

/// Maximum drawdown of a chronological value series, as a decimal.
///
/// Tracks the running peak; each value at or below a positive peak contributes
/// `(peak - value) / peak`. Series of length 0 or 1 give 0.
pub fn max_drawdown(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let mut peak = values[0];
    let mut max_drawdown = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            max_drawdown = max_drawdown.max((peak - value) / peak);
        }
    }

    max_drawdown
}

/// Format an amount as dollars with thousands separators.
///
/// Uses the absolute value and at most three fraction digits, trailing zeros
/// dropped: `1234.5` becomes `"$1,234.5"`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }

    let formatted = format!("{:.3}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        format!("${grouped}")
    } else {
        format!("${grouped}.{frac_part}")
    }
}

// Inputs are magnitudes, so rounding half away from zero is rounding half up.
fn round_half_up(value: f64) -> f64 {
    value.round()
}

fn is_usable(value: f64) -> bool {
    value != 0.0 && value.is_finite()
}
