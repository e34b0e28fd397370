//! Simulate command
//!
//! Drives one scripted session through every service of a desk backed by
//! in-memory collaborators: mint, buy, sell, stake, accrue, claim, retire,
//! vote.

use chrono::{NaiveDate, Utc};
use lib_carbon::{CarbonConfig, CarbonDesk, PortfolioSummary};
use lib_ledger::{ActorId, RetirementCertificate, TransactionFilter, TransactionRecord};
use lib_market::Decimal;
use serde::Serialize;
use tracing::info;

use crate::argument_parsing::{format_output, OutputFormat, SimulateArgs};
use crate::error::{CliError, CliResult};
use crate::output::{ConsoleOutput, Output};

const MINT_AMOUNT: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
const BUY_QUOTE_AMOUNT: Decimal = Decimal::from_parts(1_550, 0, 0, false, 0);
const SELL_AMOUNT: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
const STAKE_AMOUNT: Decimal = Decimal::from_parts(250, 0, 0, false, 0);
const RETIRE_AMOUNT: Decimal = Decimal::from_parts(25, 0, 0, false, 0);
const PROPOSAL_ID: &str = "PROP-001";

// ============================================================================
// PURE LOGIC
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub actor: String,
    pub portfolio: PortfolioSummary,
    /// Newest first
    pub history: Vec<TransactionRecord>,
    pub certificates: Vec<RetirementCertificate>,
}

/// One day of staking yield on `staked` at `yield_rate` percent per year
pub fn daily_reward(staked: Decimal, yield_rate: Decimal) -> Decimal {
    (staked * yield_rate / Decimal::ONE_HUNDRED / Decimal::from(365)).round_dp(6)
}

pub async fn run_simulation(
    config: CarbonConfig,
    actor: &str,
    end_date: NaiveDate,
) -> CliResult<SimulationReport> {
    let actor_id = ActorId::new(actor);
    if actor_id.is_empty() {
        return Err(CliError::InvalidArgument("--actor must not be empty".to_string()));
    }
    let desk = CarbonDesk::simulated(config, actor_id, end_date)?;

    desk.wallet().mint(MINT_AMOUNT).await?;
    desk.swap()
        .buy_with_default_slippage(BUY_QUOTE_AMOUNT)
        .await?;
    desk.swap().sell_with_default_slippage(SELL_AMOUNT).await?;
    desk.staking().stake(STAKE_AMOUNT).await?;

    let reward = daily_reward(STAKE_AMOUNT, desk.config().staking_yield_rate);
    if reward > Decimal::ZERO {
        desk.staking().accrue_rewards(reward).await?;
        desk.staking().claim_rewards().await?;
    }

    desk.retirement()
        .retire(RETIRE_AMOUNT, Some("Simulated offset".to_string()))
        .await?;
    desk.wallet().vote(PROPOSAL_ID, true).await?;

    let report = SimulationReport {
        actor: actor.to_string(),
        portfolio: desk.portfolio().await,
        history: desk.history(TransactionFilter::All).await,
        certificates: desk.certificates().await,
    };
    info!(
        "Simulation finished with {} records",
        report.portfolio.transaction_count
    );
    Ok(report)
}

fn render_history(history: &[TransactionRecord]) -> String {
    let mut table = format!("{:<28} {:<14} {:>16}\n", "id", "kind", "amount");
    for record in history {
        table.push_str(&format!(
            "{:<28} {:<14} {:>16}\n",
            record.id().to_string(),
            record.kind().to_string(),
            record.amount().round_dp(4).to_string()
        ));
    }
    table
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

pub async fn handle_simulate_command(args: SimulateArgs, format: OutputFormat) -> CliResult<()> {
    handle_simulate_command_impl(&args, format, &ConsoleOutput).await
}

async fn handle_simulate_command_impl(
    args: &SimulateArgs,
    format: OutputFormat,
    output: &dyn Output,
) -> CliResult<()> {
    let config = match &args.config {
        Some(path) => CarbonConfig::load(path)?,
        None => CarbonConfig::default(),
    };
    let end_date = args.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let report = run_simulation(config, &args.actor, end_date).await?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::to_value(&report)?;
            output.print(&format_output(&value, format)?)
        }
        OutputFormat::Table => {
            output.header(&format!("Portfolio of {}", report.actor))?;
            let portfolio = serde_json::to_value(&report.portfolio)?;
            output.print(format_output(&portfolio, format)?.trim_end())?;
            output.header("History")?;
            output.print(render_history(&report.history).trim_end())?;
            for certificate in &report.certificates {
                output.success(&format!(
                    "Certificate {} for {} tokens stored at {}",
                    certificate.id, certificate.amount, certificate.content_address
                ))?;
            }
            Ok(())
        }
    }
}
