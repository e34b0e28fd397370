//! Prices command

use chrono::{NaiveDate, Utc};
use lib_market::{Decimal, PricePoint, PricingEngine, RandomWalkConfig, DEFAULT_FEE_RATE};
use serde::Serialize;

use crate::argument_parsing::{format_output, OutputFormat, PricesArgs};
use crate::error::{CliError, CliResult};
use crate::output::{ConsoleOutput, Output};

// ============================================================================
// PURE LOGIC
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceReport {
    pub seed: u64,
    pub spot_price: Decimal,
    pub change_percent: Decimal,
    /// Most recent last
    pub points: Vec<PricePoint>,
}

pub fn build_price_report(args: &PricesArgs, end_date: NaiveDate) -> CliResult<PriceReport> {
    if args.days == 0 {
        return Err(CliError::InvalidArgument("--days must be at least 1".to_string()));
    }
    let walk = RandomWalkConfig {
        days: args.days,
        seed: args.seed,
        ..RandomWalkConfig::default()
    };
    let engine = PricingEngine::simulated(DEFAULT_FEE_RATE, &walk, end_date)?;
    Ok(PriceReport {
        seed: args.seed,
        spot_price: engine.current_spot_price(),
        change_percent: engine.price_change_percent(),
        points: engine.price_history(args.days as usize),
    })
}

fn render_table(report: &PriceReport) -> String {
    let mut table = format!("{:<12} {:>8} {:>10}\n", "date", "price", "volume");
    for point in &report.points {
        table.push_str(&format!(
            "{:<12} {:>8} {:>10}\n",
            point.date.to_string(),
            point.price.to_string(),
            point.volume.to_string()
        ));
    }
    table.push_str(&format!(
        "\nspot {}  change {}%",
        report.spot_price, report.change_percent
    ));
    table
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

pub async fn handle_prices_command(args: PricesArgs, format: OutputFormat) -> CliResult<()> {
    handle_prices_command_impl(&args, format, &ConsoleOutput)
}

fn handle_prices_command_impl(
    args: &PricesArgs,
    format: OutputFormat,
    output: &dyn Output,
) -> CliResult<()> {
    let end_date = args.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let report = build_price_report(args, end_date)?;
    match format {
        OutputFormat::Json => {
            let value = serde_json::to_value(&report)?;
            output.print(&format_output(&value, format)?)
        }
        OutputFormat::Table => {
            output.header(&format!("Carbon credit prices (seed {})", report.seed))?;
            output.print(&render_table(&report))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::MockOutput;

    fn args(days: u32, seed: u64) -> PricesArgs {
        PricesArgs {
            days,
            seed,
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30),
        }
    }

    #[test]
    fn test_report_is_reproducible() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let a = build_price_report(&args(14, 9), end).unwrap();
        let b = build_price_report(&args(14, 9), end).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.points.len(), 14);
        assert_eq!(a.points.last().map(|p| p.date), Some(end));
        assert_eq!(a.spot_price, a.points[13].price);
    }

    #[test]
    fn test_zero_days_rejected() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!(matches!(
            build_price_report(&args(0, 1), end),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_oversized_window_rejected() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!(matches!(
            build_price_report(&args(100_000_000, 1), end),
            Err(CliError::Pricing(_))
        ));
    }

    #[test]
    fn test_table_output() {
        let output = MockOutput::new();
        handle_prices_command_impl(&args(3, 42), OutputFormat::Table, &output).unwrap();
        output.assert_contains_message("seed 42");
        output.assert_contains_message("2024-06-30");
        output.assert_contains_message("spot ");
    }

    #[test]
    fn test_json_output() {
        let output = MockOutput::new();
        handle_prices_command_impl(&args(5, 42), OutputFormat::Json, &output).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output.joined()).unwrap();
        assert_eq!(json["points"].as_array().map(|p| p.len()), Some(5));
    }
}
