// src/main.rs
mod cli;
mod report;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::{Cli, Command, ImpliedGrowthArgs, OutputFormat, ValueArgs, WaccArgs};
use dcf_valuation::config::Config;
use dcf_valuation::domain::errors::{AppError, AppResult, ValuationError};
use dcf_valuation::profile::CompanyProfile;
use dcf_valuation::scenario::{run_batch, ScenarioOutcome};
use dcf_valuation::valuation::{implied_growth, ImpliedGrowthInputs, SolverSettings};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            log::error!("{}", error);
            eprintln!("error: {}", error);
            ExitCode::from(error.exit_code())
        }
    }
}

fn run() -> AppResult<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.apply_overrides(cli.tolerance, cli.max_iterations)?;

    // Initialize logging
    config.init_logging()?;
    log::info!("Starting dcf v{}", env!("CARGO_PKG_VERSION"));

    let json_format = cli.format == OutputFormat::Json;
    match &cli.command {
        Command::Value(args) => value(args, json_format),
        Command::Wacc(args) => wacc(args, json_format),
        Command::ImpliedGrowth(args) => {
            solve_implied_growth(args, &config.engine.solver_settings(), json_format)
        }
    }
}

/// Run every scenario; exit with the first failure's code after printing all outcomes
fn value(args: &ValueArgs, json_format: bool) -> AppResult<ExitCode> {
    let profile = CompanyProfile::from_file(&args.profile)?;
    let mut prepared = profile.prepare()?;
    if let Some(horizon) = args.horizon {
        prepared = prepared.with_horizon(horizon)?;
    }

    log::info!(
        "Running {} scenarios for {}",
        prepared.scenarios.len(),
        prepared.company
    );
    let outcomes = run_batch(&prepared.context, &prepared.scenarios);

    let rendered = if json_format {
        report::valuation_json(&prepared, &outcomes)?
    } else {
        report::valuation_table(&prepared, &outcomes)
    };
    print!("{}", rendered);

    match first_failure(&outcomes) {
        Some(error) => {
            eprintln!("error: {}", error);
            Ok(ExitCode::from(error.exit_code()))
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

/// Earliest failed scenario in profile order
fn first_failure(outcomes: &[ScenarioOutcome]) -> Option<&ValuationError> {
    outcomes.iter().find_map(|o| o.result.as_ref().err())
}

fn wacc(args: &WaccArgs, json_format: bool) -> AppResult<ExitCode> {
    let prepared = CompanyProfile::from_file(&args.profile)?.prepare()?;
    print!("{}", report::wacc_output(&prepared, json_format)?);
    Ok(ExitCode::SUCCESS)
}

/// Market inputs come from flags, falling back to the profile in its declared units
fn solve_implied_growth(
    args: &ImpliedGrowthArgs,
    settings: &SolverSettings,
    json_format: bool,
) -> AppResult<ExitCode> {
    let profile = match &args.profile {
        Some(path) => Some(CompanyProfile::from_file(path)?),
        None => None,
    };

    let market_cap = args
        .market_cap
        .or_else(|| profile.as_ref().map(|p| p.market_cap))
        .ok_or_else(|| AppError::Config("--market-cap or --profile is required".to_string()))?;
    let net_debt = args
        .net_debt
        .or_else(|| profile.as_ref().map(|p| p.debt - p.cash))
        .ok_or_else(|| AppError::Config("--net-debt or --profile is required".to_string()))?;
    let discount_rate = match (args.discount_rate, &profile) {
        (Some(rate), _) => rate,
        (None, Some(profile)) => profile.prepare()?.context.discount_rate,
        (None, None) => {
            return Err(AppError::Config(
                "--discount-rate or --profile is required".to_string(),
            ))
        }
    };

    let inputs = ImpliedGrowthInputs {
        market_cap,
        net_debt,
        base_fcf: args.base_fcf,
        years: args.years,
        terminal_growth: args.terminal_growth,
        discount_rate,
    };
    let growth = implied_growth(&inputs, settings)?;
    log::info!("Implied growth {:.4} for {:?}", growth, inputs);

    print!("{}", report::implied_growth_output(growth, json_format)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcf_valuation::domain::models::ScenarioName;

    fn failed(name: ScenarioName, error: ValuationError) -> ScenarioOutcome {
        ScenarioOutcome {
            name,
            result: Err(error),
        }
    }

    #[test]
    fn first_failure_follows_profile_order() {
        let outcomes = vec![
            failed(
                ScenarioName::Pessimistic,
                ValuationError::Domain(
                    "discount rate 0.08 must exceed terminal growth 0.5".to_string(),
                ),
            ),
            failed(
                ScenarioName::Base,
                ValuationError::Config("bad margins".to_string()),
            ),
        ];
        let error = first_failure(&outcomes).unwrap();
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("must exceed terminal growth"));

        assert!(first_failure(&outcomes[..0]).is_none());
    }

    #[test]
    fn partial_results_keep_successful_scenarios() {
        let mut profile = CompanyProfile::from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/profiles/dominos.json"
        ))
        .unwrap();
        profile.scenarios[1].terminal_growth = 0.5;
        let prepared = profile.prepare().unwrap();
        let outcomes = run_batch(&prepared.context, &prepared.scenarios);

        let error = first_failure(&outcomes).unwrap();
        assert_eq!(error.exit_code(), 2);

        let table = report::valuation_table(&prepared, &outcomes);
        assert!(table.contains("Pessimistic Case"));
        assert!(table.contains("Optimistic Case"));
        assert!(table.contains("must exceed terminal growth"));
        assert!(table.contains("n/a"));
    }
}
