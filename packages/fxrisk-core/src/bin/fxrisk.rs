//! FX Risk CLI - Command line interface for portfolio risk metrics.
//!
//! Every command prints an `ApiResponse` JSON document on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fxrisk_core::{
    advice::{AdviceProvider, StaticAdviceProvider},
    calculator::{
        beta, cumulative_return, daily_volatility, hedging_cost, max_drawdown,
        process_portfolio_data, value_at_risk, RiskReport, RiskSignals, RiskSummary,
    },
    ingest::{load_portfolio_file, load_price_history_file},
    ApiResponse, PortfolioSessions, RiskConfig,
};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Session id used for the single in-process CLI session.
const CLI_SESSION: &str = "cli";

#[derive(Parser)]
#[command(name = "fxrisk")]
#[command(about = "FX portfolio risk metrics")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Annual risk-free rate, overrides the config file
    #[arg(long, global = true, allow_hyphen_values = true)]
    risk_free_rate: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a portfolio CSV and report every metric
    Analyze {
        /// Portfolio CSV file
        file: PathBuf,
    },
    /// Total value, portfolio volatility and Sharpe ratio of a portfolio CSV
    Summary {
        /// Portfolio CSV file
        file: PathBuf,
    },
    /// Market mood, per-position risk levels and term risk of a portfolio CSV
    Signals {
        /// Portfolio CSV file
        file: PathBuf,
    },
    /// Daily volatility of a price history CSV
    Volatility {
        /// Price history CSV file with a `price` column
        file: PathBuf,
    },
    /// 95% Value at Risk
    Var {
        /// Portfolio value
        #[arg(long)]
        value: f64,
        /// Daily volatility (0.01 = 1%)
        #[arg(long)]
        volatility: f64,
    },
    /// Beta of asset returns against market returns
    Beta {
        /// Asset returns (comma-separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        asset: Vec<f64>,
        /// Market returns (comma-separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        market: Vec<f64>,
    },
    /// Hedging cost as a fraction of portfolio value
    HedgingCost {
        /// Cost of the hedging instrument
        #[arg(long)]
        cost: f64,
        /// Portfolio value
        #[arg(long)]
        value: f64,
    },
    /// Maximum drawdown of a value series
    Drawdown {
        /// Portfolio values in chronological order (comma-separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f64>,
    },
    /// Cumulative return between two values
    CumulativeReturn {
        /// Final value
        #[arg(long = "final")]
        final_value: f64,
        /// Initial value
        #[arg(long = "initial")]
        initial_value: f64,
    },
    /// Hedging advice for a portfolio CSV
    Advice {
        /// Portfolio CSV file
        file: PathBuf,
    },
    /// Evaluate a stress test scenario
    StressTest {
        /// Scenario description
        #[arg(short, long)]
        scenario: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => RiskConfig::load_from_path(path),
        None => RiskConfig::load(),
    };

    let (response, code) = match loaded {
        Ok(mut config) => {
            if let Some(rate) = cli.risk_free_rate {
                config.risk_free_rate = rate;
            }
            init_logging(&config.log_filter);

            match run(cli.command, &config) {
                Ok(data) => (ApiResponse::ok(data), ExitCode::SUCCESS),
                Err(e) => {
                    tracing::error!("Command failed: {}", e);
                    (ApiResponse::err(e.to_string()), ExitCode::FAILURE)
                }
            }
        }
        Err(e) => (ApiResponse::err(e.to_string()), ExitCode::FAILURE),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(code)
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands, config: &RiskConfig) -> fxrisk_core::Result<Value> {
    match command {
        Commands::Analyze { file } => {
            let positions = process_portfolio_data(&load_portfolio_file(&file)?);
            let report = RiskReport::from_positions(
                &positions,
                config.risk_free_rate,
                config.hedging_tool_cost,
            );
            Ok(json!({
                "positions": positions,
                "report": report,
            }))
        }
        Commands::Summary { file } => {
            let positions = process_portfolio_data(&load_portfolio_file(&file)?);
            let summary = RiskSummary::from_positions(&positions, config.risk_free_rate);
            Ok(serde_json::to_value(summary)?)
        }
        Commands::Signals { file } => {
            let positions = process_portfolio_data(&load_portfolio_file(&file)?);
            Ok(serde_json::to_value(RiskSignals::from_positions(&positions))?)
        }
        Commands::Volatility { file } => {
            let history = load_price_history_file(&file)?;
            Ok(json!({
                "points": history.len(),
                "dailyVolatility": daily_volatility(&history),
            }))
        }
        Commands::Var { value, volatility } => Ok(json!({
            "valueAtRisk": value_at_risk(value, volatility),
        })),
        Commands::Beta { asset, market } => Ok(json!({
            "beta": beta(&asset, &market),
        })),
        Commands::HedgingCost { cost, value } => Ok(json!({
            "hedgingCost": hedging_cost(cost, value),
        })),
        Commands::Drawdown { values } => Ok(json!({
            "maxDrawdown": max_drawdown(&values),
        })),
        Commands::CumulativeReturn {
            final_value,
            initial_value,
        } => Ok(json!({
            "cumulativeReturn": cumulative_return(final_value, initial_value),
        })),
        Commands::Advice { file } => {
            let raw = load_portfolio_file(&file)?;
            let sessions = PortfolioSessions::new(config.risk_free_rate);
            let summary = sessions.upload(CLI_SESSION, &raw)?;
            let advice = sessions.hedging_advice(CLI_SESSION, &StaticAdviceProvider)?;
            Ok(json!({
                "summary": summary,
                "advice": advice,
            }))
        }
        Commands::StressTest { scenario } => {
            let result = StaticAdviceProvider.stress_test(&scenario)?;
            Ok(serde_json::to_value(result)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawdown_accepts_negative_values() {
        let cli = Cli::try_parse_from(["fxrisk", "drawdown", "--values", "-5,10,-2"]).unwrap();
        match cli.command {
            Commands::Drawdown { values } => assert_eq!(values, vec![-5.0, 10.0, -2.0]),
            _ => panic!("expected drawdown"),
        }
    }

    #[test]
    fn test_negative_risk_free_rate() {
        let cli = Cli::try_parse_from([
            "fxrisk",
            "--risk-free-rate",
            "-0.01",
            "summary",
            "portfolio.csv",
        ])
        .unwrap();
        assert_eq!(cli.risk_free_rate, Some(-0.01));

        let cli = Cli::try_parse_from([
            "fxrisk",
            "var",
            "--value",
            "1",
            "--volatility",
            "0.1",
            "--risk-free-rate",
            "-0.5",
        ])
        .unwrap();
        assert_eq!(cli.risk_free_rate, Some(-0.5));
    }

    #[test]
    fn test_signals_command() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"currency,quantity,dailyVolatility\nEUR,100,0.03\n")
            .unwrap();

        let cli = Cli::try_parse_from(["fxrisk", "signals", file.path().to_str().unwrap()]).unwrap();
        let data = run(cli.command, &RiskConfig::default()).unwrap();

        assert_eq!(data["emotion"], "bearish");
        assert_eq!(data["positions"][0]["riskLevel"], "high");
        assert_eq!(data["mainExposure"], "EUR");
    }
}
