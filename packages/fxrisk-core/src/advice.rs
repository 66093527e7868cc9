//! Advice boundary: hedging advice and stress tests from an external model.
//!
//! No model is integrated yet. [`StaticAdviceProvider`] returns a fixed
//! response shape so the rest of the pipeline can be exercised.

use crate::calculator::{market_emotion, risk_level, value_at_risk, RiskSummary};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Data passed to an advice provider.
pub type AdviceInput = RiskSummary;

/// Source of hedging advice and stress-test results.
pub trait AdviceProvider {
    /// Produce hedging advice for a portfolio summary.
    fn hedging_advice(&self, input: &AdviceInput) -> Result<HedgingAdvice>;

    /// Evaluate a free-text stress scenario.
    fn stress_test(&self, scenario: &str) -> Result<StressTestResult>;
}

/// Hedging advice as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HedgingAdvice {
    pub historical_analysis: Option<String>,
    pub current_hedging_advice: CurrentHedgingAdvice,
    pub position_risk_assessment: PositionRiskAssessment,
    pub correlation_analysis: CorrelationAnalysis,
    pub cost_benefit_analysis: CostBenefitAnalysis,
    pub recommended_positions: Vec<RecommendedPosition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentHedgingAdvice {
    pub volatility: f64,
    /// Market sentiment label
    pub emotion: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionRiskAssessment {
    pub risk: String,
    /// Formatted 95% VaR
    pub var: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationAnalysis {
    pub relative: String,
    pub estimate: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostBenefitAnalysis {
    /// Hedging cost as a fraction of portfolio value
    pub cost: f64,
    pub influence: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedPosition {
    pub currency: String,
    pub quantity: f64,
}

/// Result of a stress-test scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StressTestResult {
    pub scenario: String,
    pub influence: String,
    pub probability: f64,
    pub suggestion: String,
}

/// Placeholder provider returning canned advice.
///
/// Volatility, VaR, market mood and risk level are derived from the input; the
/// remaining text is fixed. The portfolio risk level uses the volatility rule only,
/// since the whole portfolio has no proportion to weigh.
#[derive(Debug, Clone, Default)]
pub struct StaticAdviceProvider;

const SUGGESTION: &str = "Reduce EUR exposure";

impl AdviceProvider for StaticAdviceProvider {
    fn hedging_advice(&self, input: &AdviceInput) -> Result<HedgingAdvice> {
        Ok(HedgingAdvice {
            historical_analysis: None,
            current_hedging_advice: CurrentHedgingAdvice {
                volatility: input.portfolio_volatility,
                emotion: market_emotion(input.portfolio_volatility).label().to_string(),
                suggestion: SUGGESTION.to_string(),
            },
            position_risk_assessment: PositionRiskAssessment {
                risk: risk_level(0.0, input.portfolio_volatility)
                    .label()
                    .to_string(),
                var: value_at_risk(input.total_value, input.portfolio_volatility),
                suggestion: SUGGESTION.to_string(),
            },
            correlation_analysis: CorrelationAnalysis {
                relative: "Strong positive".to_string(),
                estimate: "Medium".to_string(),
                suggestion: SUGGESTION.to_string(),
            },
            cost_benefit_analysis: CostBenefitAnalysis {
                cost: 0.0015,
                influence: "High".to_string(),
                suggestion: SUGGESTION.to_string(),
            },
            recommended_positions: vec![
                RecommendedPosition {
                    currency: "USD".to_string(),
                    quantity: 10_000.0,
                },
                RecommendedPosition {
                    currency: "EUR".to_string(),
                    quantity: 8_000.0,
                },
            ],
        })
    }

    fn stress_test(&self, scenario: &str) -> Result<StressTestResult> {
        let scenario = scenario.trim();
        if scenario.is_empty() {
            return Err(Error::InvalidScenario("scenario is empty".to_string()));
        }

        Ok(StressTestResult {
            scenario: scenario.to_string(),
            influence: "High".to_string(),
            probability: 0.01,
            suggestion: SUGGESTION.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_advice_uses_input() {
        let input = AdviceInput {
            total_value: 100_000.0,
            portfolio_volatility: 0.05,
            sharpe_ratio: 1.0,
        };

        let advice = StaticAdviceProvider.hedging_advice(&input).unwrap();
        assert_eq!(advice.current_hedging_advice.volatility, 0.05);
        assert_eq!(advice.position_risk_assessment.var, "$8,225");
        assert_eq!(advice.current_hedging_advice.emotion, "Neutral");
        assert_eq!(advice.position_risk_assessment.risk, "High");
        assert_eq!(advice.recommended_positions.len(), 2);
        assert!(advice.historical_analysis.is_none());
    }

    #[test]
    fn test_static_advice_low_volatility() {
        let input = AdviceInput {
            total_value: 50_000.0,
            portfolio_volatility: 0.008,
            sharpe_ratio: 6.25,
        };

        let advice = StaticAdviceProvider.hedging_advice(&input).unwrap();
        assert_eq!(advice.current_hedging_advice.emotion, "Bearish");
        assert_eq!(advice.position_risk_assessment.risk, "Low");
    }

    #[test]
    fn test_static_advice_high_volatility() {
        let input = AdviceInput {
            total_value: 50_000.0,
            portfolio_volatility: 0.15,
            sharpe_ratio: 0.33,
        };

        let advice = StaticAdviceProvider.hedging_advice(&input).unwrap();
        assert_eq!(advice.current_hedging_advice.emotion, "Bullish");
    }

    #[test]
    fn test_advice_serializes_camel_case() {
        let input = AdviceInput {
            total_value: 0.0,
            portfolio_volatility: 0.0,
            sharpe_ratio: 0.0,
        };
        let advice = StaticAdviceProvider.hedging_advice(&input).unwrap();
        let json = serde_json::to_value(&advice).unwrap();

        assert!(json.get("currentHedgingAdvice").is_some());
        assert!(json.get("recommendedPositions").is_some());
        assert_eq!(json["positionRiskAssessment"]["var"], "$0");
    }

    #[test]
    fn test_stress_test() {
        let result = StaticAdviceProvider.stress_test(" USD rate hike ").unwrap();
        assert_eq!(result.scenario, "USD rate hike");
        assert_eq!(result.probability, 0.01);
    }

    #[test]
    fn test_stress_test_blank_scenario() {
        let result = StaticAdviceProvider.stress_test("   ");
        assert!(matches!(result, Err(Error::InvalidScenario(_))));
    }
}
