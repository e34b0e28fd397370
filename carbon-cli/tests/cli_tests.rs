//! Argument parsing tests for the carbon CLI

use carbon_cli::{CarbonCli, CarbonCommand, OutputFormat};
use clap::Parser;
use rust_decimal_macros::dec;

#[test]
fn test_quote_arguments() {
    let cli = CarbonCli::try_parse_from([
        "carbon-cli",
        "quote",
        "--input",
        "1000",
        "--input-reserve",
        "15500000",
        "--output-reserve",
        "1000000",
        "--fee",
        "0.01",
    ])
    .unwrap();

    match cli.command {
        CarbonCommand::Quote(args) => {
            assert_eq!(args.input, dec!(1000));
            assert_eq!(args.input_reserve, dec!(15500000));
            assert_eq!(args.output_reserve, dec!(1000000));
            assert_eq!(args.fee, Some(dec!(0.01)));
        }
        other => panic!("unexpected command {:?}", other),
    }
    assert_eq!(cli.format, OutputFormat::Table);
    assert!(!cli.verbose);
}

#[test]
fn test_quote_requires_reserves() {
    assert!(CarbonCli::try_parse_from(["carbon-cli", "quote", "--input", "5"]).is_err());
}

#[test]
fn test_non_decimal_rejected() {
    assert!(CarbonCli::try_parse_from([
        "carbon-cli",
        "quote",
        "--input",
        "ten",
        "--input-reserve",
        "1",
        "--output-reserve",
        "1",
    ])
    .is_err());
}

#[test]
fn test_prices_defaults() {
    let cli = CarbonCli::try_parse_from(["carbon-cli", "prices"]).unwrap();
    match cli.command {
        CarbonCommand::Prices(args) => {
            assert_eq!(args.days, 30);
            assert_eq!(args.seed, 42);
            assert_eq!(args.end_date, None);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = CarbonCli::try_parse_from([
        "carbon-cli",
        "prices",
        "--days",
        "7",
        "--end-date",
        "2024-06-30",
        "--format",
        "json",
        "-v",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    assert!(cli.verbose);
    match cli.command {
        CarbonCommand::Prices(args) => {
            assert_eq!(args.days, 7);
            assert_eq!(args.end_date.map(|d| d.to_string()).as_deref(), Some("2024-06-30"));
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_simulate_arguments() {
    let cli = CarbonCli::try_parse_from([
        "carbon-cli",
        "simulate",
        "--config",
        "carbon.toml",
        "--actor",
        "0xB0B",
    ])
    .unwrap();

    match cli.command {
        CarbonCommand::Simulate(args) => {
            assert_eq!(args.config.as_deref(), Some(std::path::Path::new("carbon.toml")));
            assert_eq!(args.actor, "0xB0B");
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_unknown_format_rejected() {
    assert!(CarbonCli::try_parse_from(["carbon-cli", "--format", "yaml", "prices"]).is_err());
}
