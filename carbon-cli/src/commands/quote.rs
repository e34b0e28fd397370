//! Quote command

use lib_market::{quote_swap_output, Decimal, PricingError, DEFAULT_FEE_RATE};
use serde::Serialize;

use crate::argument_parsing::{format_output, OutputFormat, QuoteArgs};
use crate::error::{CliError, CliResult};
use crate::output::{ConsoleOutput, Output};

// ============================================================================
// PURE LOGIC
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteReport {
    pub input: Decimal,
    pub input_reserve: Decimal,
    pub output_reserve: Decimal,
    pub fee_rate: Decimal,
    pub output: Decimal,
    /// Output units per input unit actually received
    pub effective_rate: Decimal,
    /// `output_reserve / input_reserve`
    pub spot_rate: Decimal,
    /// Shortfall of the effective rate against spot, in percent
    pub price_impact_percent: Decimal,
}

pub fn build_quote(args: &QuoteArgs) -> CliResult<QuoteReport> {
    let fee_rate = args.fee.unwrap_or(DEFAULT_FEE_RATE);
    let output = quote_swap_output(args.input, args.input_reserve, args.output_reserve, fee_rate)?;

    let effective_rate = output
        .checked_div(args.input)
        .ok_or(PricingError::Overflow)?;
    let spot_rate = args
        .output_reserve
        .checked_div(args.input_reserve)
        .ok_or(PricingError::Overflow)?;
    if spot_rate.is_zero() {
        return Err(CliError::InvalidArgument(format!(
            "spot rate {} / {} is below decimal precision",
            args.output_reserve, args.input_reserve
        )));
    }
    let price_impact_percent = effective_rate
        .checked_div(spot_rate)
        .and_then(|ratio| (Decimal::ONE - ratio).checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::Overflow)?
        .round_dp(4);

    Ok(QuoteReport {
        input: args.input,
        input_reserve: args.input_reserve,
        output_reserve: args.output_reserve,
        fee_rate,
        output,
        effective_rate,
        spot_rate,
        price_impact_percent,
    })
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

pub async fn handle_quote_command(args: QuoteArgs, format: OutputFormat) -> CliResult<()> {
    handle_quote_command_impl(&args, format, &ConsoleOutput)
}

fn handle_quote_command_impl(
    args: &QuoteArgs,
    format: OutputFormat,
    output: &dyn Output,
) -> CliResult<()> {
    let report = build_quote(args)?;
    let value = serde_json::to_value(&report)?;
    if format == OutputFormat::Table {
        output.header("Swap quote")?;
    }
    output.print(format_output(&value, format)?.trim_end())
}
