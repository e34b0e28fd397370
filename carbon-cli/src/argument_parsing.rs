//! Carbon CLI argument parsing and dispatch

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::commands;
use crate::error::CliResult;

/// Carbon-credit pricing and ledger simulator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(name = "carbon-cli")]
pub struct CarbonCli {
    /// Enable debug logging
    #[arg(short, long, global = true, env = "CARBON_VERBOSE")]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true, env = "CARBON_FORMAT")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: CarbonCommand,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CarbonCommand {
    /// Quote a constant-product swap
    Quote(QuoteArgs),

    /// Print a seeded price history
    Prices(PricesArgs),

    /// Run a scripted session against in-memory collaborators
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct QuoteArgs {
    /// Amount paid into the pool
    #[arg(short, long)]
    pub input: Decimal,

    /// Pool reserve of the input asset
    #[arg(long)]
    pub input_reserve: Decimal,

    /// Pool reserve of the output asset
    #[arg(long)]
    pub output_reserve: Decimal,

    /// Swap fee in [0, 1); defaults to 0.003
    #[arg(long)]
    pub fee: Option<Decimal>,
}

#[derive(Args, Debug, Clone)]
pub struct PricesArgs {
    /// Days of history to generate
    #[arg(short, long, default_value_t = 30)]
    pub days: u32,

    /// Random walk seed
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Last day of the series (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// TOML configuration file
    #[arg(short, long, env = "CARBON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Actor identifier for the simulated wallet
    #[arg(long, default_value = "0xA11CE")]
    pub actor: String,

    /// Last day of the simulated price history (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

/// Parse arguments, install logging and run the selected command
pub async fn run_cli() -> Result<()> {
    let cli = CarbonCli::parse();
    init_logging(cli.verbose);
    execute(cli).await?;
    Ok(())
}

pub async fn execute(cli: CarbonCli) -> CliResult<()> {
    match cli.command {
        CarbonCommand::Quote(args) => commands::quote::handle_quote_command(args, cli.format).await,
        CarbonCommand::Prices(args) => {
            commands::prices::handle_prices_command(args, cli.format).await
        }
        CarbonCommand::Simulate(args) => {
            commands::simulate::handle_simulate_command(args, cli.format).await
        }
    }
}

/// `RUST_LOG` (default `info`); `--verbose` forces `debug`
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Render a JSON value in the requested format
pub fn format_output(data: &Value, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Table => {
            if let Some(obj) = data.as_object() {
                let mut result = String::new();
                for (key, value) in obj {
                    result.push_str(&format!("{:<24} {}\n", key, plain(value)));
                }
                Ok(result)
            } else if let Some(array) = data.as_array() {
                let mut result = String::new();
                for (i, item) in array.iter().enumerate() {
                    result.push_str(&format!("[{}] {}\n", i, plain(item)));
                }
                Ok(result)
            } else {
                Ok(plain(data))
            }
        }
    }
}

/// Strings without their JSON quotes
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
