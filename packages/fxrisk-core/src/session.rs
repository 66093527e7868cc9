//! Per-session portfolio storage.
//!
//! An upload replaces the session's portfolio wholesale; a later advice request
//! for the same session reads it back. Sessions never see each other's data.

use crate::advice::{AdviceProvider, HedgingAdvice};
use crate::calculator::{process_portfolio_data, RiskSignals, RiskSummary};
use crate::types::{Position, RawRecord};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A processed portfolio held for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSession {
    /// Processed positions, in upload order
    pub positions: Vec<Position>,
    /// Headline metrics computed at upload time
    pub summary: RiskSummary,
    /// When the portfolio was uploaded
    pub uploaded_at: DateTime<Utc>,
}

/// Store of uploaded portfolios keyed by session id.
#[derive(Debug)]
pub struct PortfolioSessions {
    risk_free_rate: f64,
    sessions: RwLock<HashMap<String, PortfolioSession>>,
}

impl PortfolioSessions {
    /// Create an empty store using the given risk-free rate for summaries.
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Process and store a portfolio for a session, replacing any previous one.
    pub fn upload(&self, session_id: &str, raw: &[RawRecord]) -> Result<RiskSummary> {
        if raw.is_empty() {
            return Err(Error::EmptyPortfolio);
        }

        let positions = process_portfolio_data(raw);
        let summary = RiskSummary::from_positions(&positions, self.risk_free_rate);
        let session = PortfolioSession {
            positions,
            summary,
            uploaded_at: Utc::now(),
        };

        let replaced = self
            .write()
            .insert(session_id.to_string(), session)
            .is_some();
        tracing::debug!(
            session_id,
            positions = raw.len(),
            replaced,
            "Stored portfolio for session"
        );

        Ok(summary)
    }

    /// Get a copy of a session's portfolio.
    pub fn get(&self, session_id: &str) -> Option<PortfolioSession> {
        self.read().get(session_id).cloned()
    }

    /// Drop a session's portfolio.
    pub fn remove(&self, session_id: &str) -> Option<PortfolioSession> {
        self.write().remove(session_id)
    }

    /// Number of sessions holding a portfolio.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Ask a provider for hedging advice on a session's portfolio.
    ///
    /// Only the session's [`RiskSummary`] is passed to the provider.
    pub fn hedging_advice(
        &self,
        session_id: &str,
        provider: &dyn AdviceProvider,
    ) -> Result<HedgingAdvice> {
        let summary = self
            .read()
            .get(session_id)
            .map(|s| s.summary)
            .ok_or_else(|| Error::NoPortfolio(session_id.to_string()))?;

        provider.hedging_advice(&summary)
    }

    /// Rule-based risk signals for a session's portfolio.
    pub fn risk_signals(&self, session_id: &str) -> Result<RiskSignals> {
        self.read()
            .get(session_id)
            .map(|s| RiskSignals::from_positions(&s.positions))
            .ok_or_else(|| Error::NoPortfolio(session_id.to_string()))
    }

    // A panic while holding the lock leaves the map itself intact.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PortfolioSession>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, PortfolioSession>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for PortfolioSessions {
    fn default() -> Self {
        Self::new(crate::calculator::DEFAULT_RISK_FREE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::StaticAdviceProvider;
    use serde_json::{json, Value};

    fn raw(quantity: f64, volatility: f64) -> Vec<RawRecord> {
        let value = json!({
            "currency": "EUR/USD",
            "quantity": quantity,
            "rate": 1.0,
            "dailyVolatility": volatility,
        });
        match value {
            Value::Object(map) => vec![map],
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_upload_returns_summary() {
        let sessions = PortfolioSessions::default();
        let summary = sessions.upload("alice", &raw(100_000.0, 0.05)).unwrap();

        assert_eq!(summary.total_value, 100_000.0);
        assert_eq!(summary.portfolio_volatility, 0.05);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_upload_empty_rejected() {
        let sessions = PortfolioSessions::default();
        let result = sessions.upload("alice", &[]);

        assert!(matches!(result, Err(Error::EmptyPortfolio)));
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_upload_replaces_previous() {
        let sessions = PortfolioSessions::default();
        sessions.upload("alice", &raw(100.0, 0.01)).unwrap();
        sessions.upload("alice", &raw(250.0, 0.02)).unwrap();

        let session = sessions.get("alice").unwrap();
        assert_eq!(session.positions.len(), 1);
        assert_eq!(session.summary.total_value, 250.0);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let sessions = PortfolioSessions::default();
        sessions.upload("alice", &raw(100.0, 0.01)).unwrap();
        sessions.upload("bob", &raw(900.0, 0.02)).unwrap();

        assert_eq!(sessions.get("alice").unwrap().summary.total_value, 100.0);
        assert_eq!(sessions.get("bob").unwrap().summary.total_value, 900.0);

        sessions.remove("alice");
        assert!(sessions.get("alice").is_none());
        assert!(sessions.get("bob").is_some());
    }

    #[test]
    fn test_hedging_advice_requires_upload() {
        let sessions = PortfolioSessions::default();
        let result = sessions.hedging_advice("alice", &StaticAdviceProvider);
        assert!(matches!(result, Err(Error::NoPortfolio(id)) if id == "alice"));
    }

    #[test]
    fn test_risk_signals() {
        let sessions = PortfolioSessions::default();
        assert!(matches!(
            sessions.risk_signals("alice"),
            Err(Error::NoPortfolio(_))
        ));

        sessions.upload("alice", &raw(1_000.0, 0.03)).unwrap();
        let signals = sessions.risk_signals("alice").unwrap();

        assert_eq!(signals.positions.len(), 1);
        assert_eq!(signals.positions[0].proportion, 1.0);
        assert_eq!(signals.main_exposure.as_deref(), Some("EUR/USD"));
    }

    #[test]
    fn test_hedging_advice() {
        let sessions = PortfolioSessions::default();
        sessions.upload("alice", &raw(100_000.0, 0.05)).unwrap();

        let advice = sessions
            .hedging_advice("alice", &StaticAdviceProvider)
            .unwrap();
        assert_eq!(advice.position_risk_assessment.var, "$8,225");
    }
}
