//! Carbon CLI Library
//!
//! Command-line front end over the pricing engine and the carbon desk.
//!
//! - `quote`: one-off constant-product quote
//! - `prices`: seeded price history with spot and daily change
//! - `simulate`: scripted session against in-memory collaborators

pub mod argument_parsing;
pub mod commands;
pub mod error;
pub mod output;

pub use argument_parsing::{
    execute, format_output, init_logging, run_cli, CarbonCli, CarbonCommand, OutputFormat,
};
pub use error::{CliError, CliResult};
pub use output::Output;
