//! End-to-end: CSV upload through processing, reporting and advice.

use approx::assert_abs_diff_eq;
use fxrisk_core::advice::StaticAdviceProvider;
use fxrisk_core::calculator::{
    daily_volatility, max_drawdown, process_portfolio_data, total_value, MarketEmotion,
    RiskLevel, RiskReport,
};
use fxrisk_core::ingest::{read_portfolio_csv, read_price_history_csv};
use fxrisk_core::{Error, PortfolioSessions};

const PORTFOLIO: &str = "\
currency,quantity,rate,currentPrice,openPrice,dailyVolatility
EUR/USD,50000,1.08,1.09,1.07,0.006
GBP/USD,20000,1.27,1.25,1.28,0.008
USD/JPY,3000000,0.0067,151.2,149.8,0.007
AUD/USD,abc,0.65,0.66,0.67,0.009
";

#[test]
fn test_csv_to_report() {
    let raw = read_portfolio_csv(PORTFOLIO.as_bytes()).unwrap();
    let positions = process_portfolio_data(&raw);

    assert_eq!(positions.len(), 4);
    assert_eq!(positions[3].currency, "AUD/USD");
    // Non-numeric quantity collapses to zero
    assert_eq!(positions[3].quantity, 0.0);
    assert_eq!(positions[3].benefit, Some(0.0));

    let total = total_value(&positions);
    assert_abs_diff_eq!(total, 54_000.0 + 25_400.0 + 20_100.0, epsilon = 1e-6);

    let proportions: f64 = positions.iter().filter_map(|p| p.proportion).sum();
    assert_abs_diff_eq!(proportions, 1.0, epsilon = 1e-12);

    let report = RiskReport::from_positions(&positions, 0.03, Some(150.0));
    assert_eq!(report.position_count, 4);
    assert_eq!(report.positions_in_profit, 2);
    assert_eq!(report.positions_in_loss, 1);
    assert!(report.portfolio_volatility > 0.006 && report.portfolio_volatility < 0.008);
    assert!(report.value_at_risk.starts_with('$'));
    assert!(report.sharpe_ratio > 0.0);
}

#[test]
fn test_session_upload_and_advice() {
    let sessions = PortfolioSessions::new(0.03);
    let raw = read_portfolio_csv(PORTFOLIO.as_bytes()).unwrap();

    assert!(matches!(
        sessions.hedging_advice("desk-1", &StaticAdviceProvider),
        Err(Error::NoPortfolio(_))
    ));

    let summary = sessions.upload("desk-1", &raw).unwrap();
    let advice = sessions
        .hedging_advice("desk-1", &StaticAdviceProvider)
        .unwrap();

    assert_eq!(
        advice.current_hedging_advice.volatility,
        summary.portfolio_volatility
    );
    assert!(sessions.hedging_advice("desk-2", &StaticAdviceProvider).is_err());
}

#[test]
fn test_price_history_and_drawdown() {
    let history = read_price_history_csv("price\n100\n110\n90\n".as_bytes()).unwrap();
    assert_abs_diff_eq!(daily_volatility(&history), 0.14799, epsilon = 1e-4);

    let values: Vec<f64> = history.iter().map(|p| p.price).collect();
    assert_abs_diff_eq!(max_drawdown(&values), 20.0 / 110.0, epsilon = 1e-12);
}

#[test]
fn test_session_risk_signals() {
    let sessions = PortfolioSessions::default();
    let raw = read_portfolio_csv(PORTFOLIO.as_bytes()).unwrap();
    sessions.upload("desk-1", &raw).unwrap();

    let signals = sessions.risk_signals("desk-1").unwrap();
    let levels: Vec<RiskLevel> = signals.positions.iter().map(|p| p.risk_level).collect();

    // EUR is over a third of the book, GBP just over a quarter
    assert_eq!(
        levels,
        vec![
            RiskLevel::High,
            RiskLevel::MediumHigh,
            RiskLevel::Low,
            RiskLevel::Low
        ]
    );
    assert_eq!(signals.main_exposure.as_deref(), Some("EUR/USD"));
    assert_eq!(signals.emotion, MarketEmotion::Bearish);
    assert_eq!(signals.term_risk_distribution[2].time, 90);
}
