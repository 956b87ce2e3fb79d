//! Command-line interface for the trading decision pipeline

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use fund_core::{AnalystId, Portfolio};
use fund_stages::{InlineMarketData, RunInputs, TradingPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fund-cli")]
#[command(about = "Run the trading decision pipeline", long_about = None)]
struct Args {
    /// Stock ticker symbol
    #[arg(long)]
    ticker: String,

    /// Start date (YYYY-MM-DD). Defaults to 1 year before end date
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// End date (YYYY-MM-DD). Defaults to yesterday
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Show reasoning from each researcher
    #[arg(long)]
    show_reasoning: bool,

    /// Initial cash amount
    #[arg(long, default_value_t = 100_000.0)]
    initial_capital: f64,

    /// Initial stock position
    #[arg(long, default_value_t = 0)]
    initial_position: u64,

    /// Comma-separated analyst selection (technical, fundamentals,
    /// sentiment, valuation). Defaults to all four
    #[arg(long)]
    analysts: Option<String>,

    /// JSON file holding an array of daily closing prices
    #[arg(long)]
    prices: Option<PathBuf>,
}

fn parse_analysts(arg: Option<&str>) -> anyhow::Result<Vec<AnalystId>> {
    let Some(arg) = arg else {
        return Ok(AnalystId::ALL.to_vec());
    };
    arg.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<AnalystId>().map_err(Into::into))
        .collect()
}

fn load_closes(path: Option<&PathBuf>) -> anyhow::Result<Vec<f64>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read prices file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("prices file {} is not a JSON number array", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fund_utils::init_tracing();

    let args = Args::parse();

    let today = Local::now().date_naive();
    let (start_date, end_date) = fund_utils::resolve_window(args.start_date, args.end_date, today)?;
    let analysts = parse_analysts(args.analysts.as_deref())?;
    let closes = load_closes(args.prices.as_ref())?;

    info!(
        ticker = %args.ticker,
        start = %start_date,
        end = %end_date,
        analysts = analysts.len(),
        "running trading pipeline"
    );

    let pipeline = TradingPipeline::new(Arc::new(InlineMarketData::new(closes)));
    let decision = pipeline
        .run(RunInputs {
            ticker: args.ticker,
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            portfolio: Portfolio::new(args.initial_capital, args.initial_position),
            show_reasoning: args.show_reasoning,
            analysts,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysts_defaults_to_all() {
        let analysts = parse_analysts(None).unwrap();
        assert_eq!(analysts, AnalystId::ALL.to_vec());
    }

    #[test]
    fn test_parse_analysts_selection() {
        let analysts = parse_analysts(Some("technical, valuation")).unwrap();
        assert_eq!(analysts, vec![AnalystId::Technical, AnalystId::Valuation]);
    }

    #[test]
    fn test_parse_analysts_rejects_unknown() {
        assert!(parse_analysts(Some("technical,macro")).is_err());
    }
}
