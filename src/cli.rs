// src/cli.rs
//! Command-line interface for the `dcf` binary.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `value` | Run every scenario of a company profile |
//! | `wacc` | Print the computed cost of capital |
//! | `implied-growth` | Solve for the growth rate priced in by the market |

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Discounted-cash-flow valuation of company profiles
#[derive(Debug, Parser)]
#[command(name = "dcf", author, version, about = "Discounted-cash-flow equity valuation")]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Runtime configuration file (JSON). Defaults to environment variables.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bisection tolerance for the implied-growth solver.
    #[arg(long, global = true)]
    pub tolerance: Option<f64>,

    /// Iteration ceiling for the implied-growth solver.
    #[arg(long, global = true)]
    pub max_iterations: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII grid tables.
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value a company under every scenario in its profile.
    ///
    /// # Examples
    ///
    ///   dcf value profiles/meta.json
    ///   dcf value profiles/mastercard.json --horizon 5 --format json
    Value(ValueArgs),

    /// Print the WACC computed from a profile.
    Wacc(WaccArgs),

    /// Solve for the constant growth rate implied by the market price.
    ///
    /// # Examples
    ///
    ///   dcf implied-growth --market-cap 15.82 --net-debt -1.1 --base-fcf 0.2 \
    ///       --years 10 --terminal-growth 0.03 --discount-rate 0.15
    ImpliedGrowth(ImpliedGrowthArgs),
}

/// Arguments for the `value` command.
#[derive(Debug, Args)]
pub struct ValueArgs {
    /// Company profile (JSON).
    pub profile: PathBuf,

    /// Limit every scenario to the first N projected years.
    #[arg(long)]
    pub horizon: Option<usize>,
}

/// Arguments for the `wacc` command.
#[derive(Debug, Args)]
pub struct WaccArgs {
    /// Company profile (JSON).
    pub profile: PathBuf,
}

/// Arguments for the `implied-growth` command.
///
/// Monetary values may be in any unit as long as they share it.
#[derive(Debug, Args)]
pub struct ImpliedGrowthArgs {
    /// Take market cap, net debt and discount rate from this profile.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Current market capitalization.
    #[arg(long, allow_hyphen_values = true)]
    pub market_cap: Option<f64>,

    /// Debt minus cash (negative for net cash).
    #[arg(long, allow_hyphen_values = true)]
    pub net_debt: Option<f64>,

    /// Trailing free cash flow.
    #[arg(long, allow_hyphen_values = true)]
    pub base_fcf: f64,

    /// Projection horizon in years.
    #[arg(long, default_value_t = 10)]
    pub years: usize,

    /// Perpetual growth after the horizon.
    #[arg(long, allow_hyphen_values = true)]
    pub terminal_growth: f64,

    /// Discount rate; defaults to the profile's rate when a profile is given.
    #[arg(long, allow_hyphen_values = true)]
    pub discount_rate: Option<f64>,
}
