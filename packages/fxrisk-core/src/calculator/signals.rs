//! Rule-based risk signals: market mood, per-position risk levels and
//! term risk distribution.

use super::risk::portfolio_volatility;
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Market mood derived from portfolio volatility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketEmotion {
    Bullish,
    Neutral,
    Bearish,
}

impl MarketEmotion {
    pub fn label(&self) -> &'static str {
        match self {
            MarketEmotion::Bullish => "Bullish",
            MarketEmotion::Neutral => "Neutral",
            MarketEmotion::Bearish => "Bearish",
        }
    }
}

/// Risk level of a single position or portfolio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum RiskLevel {
    Low,
    MediumHigh,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::MediumHigh => "Medium-high",
            RiskLevel::High => "High",
        }
    }
}

/// Classify market mood: above 0.1 is bullish, below 0.05 bearish, otherwise neutral.
pub fn market_emotion(volatility: f64) -> MarketEmotion {
    if volatility > 0.1 {
        MarketEmotion::Bullish
    } else if volatility < 0.05 {
        MarketEmotion::Bearish
    } else {
        MarketEmotion::Neutral
    }
}

/// Classify a position by its share of the portfolio and its daily volatility.
///
/// High if proportion > 1/3 or volatility > 0.02; medium-high if proportion > 1/4
/// or volatility > 0.01; low otherwise. The worse of the two dimensions wins.
pub fn risk_level(proportion: f64, daily_volatility: f64) -> RiskLevel {
    let by_proportion = if proportion > 1.0 / 3.0 {
        RiskLevel::High
    } else if proportion > 0.25 {
        RiskLevel::MediumHigh
    } else {
        RiskLevel::Low
    };

    let by_volatility = if daily_volatility > 0.02 {
        RiskLevel::High
    } else if daily_volatility > 0.01 {
        RiskLevel::MediumHigh
    } else {
        RiskLevel::Low
    };

    by_proportion.max(by_volatility)
}

/// Estimated risk over a holding horizon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TermRisk {
    /// Horizon in days
    pub time: u32,
    pub risk: f64,
}

const TERM_FACTORS: [(u32, f64); 3] = [(30, 0.5), (60, 0.8), (90, 1.2)];

/// Portfolio volatility scaled to 30, 60 and 90 day horizons, rounded to 4 places.
///
/// Empty portfolios give an empty distribution.
pub fn term_risk_distribution(positions: &[Position]) -> Vec<TermRisk> {
    if positions.is_empty() {
        return Vec::new();
    }

    let volatility = portfolio_volatility(positions);
    TERM_FACTORS
        .iter()
        .map(|&(time, factor)| TermRisk {
            time,
            risk: (volatility * factor * 10_000.0).round() / 10_000.0,
        })
        .collect()
}

/// Risk level of one position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionSignal {
    pub currency: String,
    pub proportion: f64,
    pub daily_volatility: f64,
    pub risk_level: RiskLevel,
}

/// Risk signals for a processed portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskSignals {
    pub portfolio_volatility: f64,
    pub emotion: MarketEmotion,
    pub term_risk_distribution: Vec<TermRisk>,
    pub positions: Vec<PositionSignal>,
    /// Currency of the riskiest position, first one on ties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_exposure: Option<String>,
}

impl RiskSignals {
    /// Calculate signals for processed positions. A missing proportion counts as 0.
    pub fn from_positions(positions: &[Position]) -> Self {
        let volatility = portfolio_volatility(positions);

        let signals: Vec<PositionSignal> = positions
            .iter()
            .map(|p| {
                let proportion = p.proportion.unwrap_or(0.0);
                PositionSignal {
                    currency: p.currency.clone(),
                    proportion,
                    daily_volatility: p.daily_volatility,
                    risk_level: risk_level(proportion, p.daily_volatility),
                }
            })
            .collect();

        let main_exposure = signals
            .iter()
            .fold(None::<&PositionSignal>, |best, s| match best {
                Some(b) if b.risk_level >= s.risk_level => Some(b),
                _ => Some(s),
            })
            .map(|s| s.currency.clone());

        Self {
            portfolio_volatility: volatility,
            emotion: market_emotion(volatility),
            term_risk_distribution: term_risk_distribution(positions),
            positions: signals,
            main_exposure,
        }
    }
}
