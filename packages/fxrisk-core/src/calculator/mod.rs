//! Risk metrics calculator.
//!
//! Pure functions over a portfolio of positions: valuation, per-position
//! proportions and P/L, the risk metrics built on them, and rule-based
//! risk signals.

mod report;
mod risk;
mod signals;
mod valuation;

pub use report::{RiskReport, RiskSummary};
pub use risk::{
    beta, cumulative_return, daily_volatility, format_currency, hedging_cost, max_drawdown,
    portfolio_volatility, sharpe_ratio, value_at_risk, var_amount, DEFAULT_RISK_FREE_RATE,
    EXPECTED_RETURN, Z_SCORE_95,
};
pub use signals::{
    market_emotion, risk_level, term_risk_distribution, MarketEmotion, PositionSignal, RiskLevel,
    RiskSignals, TermRisk,
};
pub use valuation::{
    coerce_number, normalize_record, position_ratios, process_portfolio_data, profit_loss,
    total_value,
};
