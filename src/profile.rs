// src/profile.rs
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::errors::{AppError, AppResult, ValuationError, ValuationResult};
use crate::domain::models::{
    CapitalStructure, MarginSchedule, ProjectionAssumptions, ScenarioSpec, ShareChange,
    ValuationContext,
};
use crate::valuation::calculate_wacc;

/// Magnitude a profile's figures are quoted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Units,
    Thousands,
    Millions,
    Billions,
}

impl Scale {
    pub fn factor(&self) -> f64 {
        match self {
            Scale::Units => 1.0,
            Scale::Thousands => 1e3,
            Scale::Millions => 1e6,
            Scale::Billions => 1e9,
        }
    }

    /// Suffix used when displaying values in this scale
    pub fn suffix(&self) -> &'static str {
        match self {
            Scale::Units => "",
            Scale::Thousands => "K",
            Scale::Millions => "M",
            Scale::Billions => "B",
        }
    }
}

/// Declared input units of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Units {
    /// Scale of every monetary field
    pub currency: Scale,
    /// Scale of the share count
    pub shares: Scale,
}

impl Units {
    pub const BASE: Units = Units {
        currency: Scale::Units,
        shares: Scale::Units,
    };
}

/// Static per-company valuation inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyProfile {
    pub name: String,
    #[serde(default)]
    pub ticker: Option<String>,
    /// Fiscal year of the first projected year
    #[serde(default = "current_fiscal_year")]
    pub base_fiscal_year: i32,
    pub units: Units,
    pub market_cap: f64,
    pub cash: f64,
    pub debt: f64,
    pub beta: f64,
    pub risk_free_rate: f64,
    pub market_return: f64,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(default)]
    pub cost_of_debt: f64,
    pub shares_outstanding: f64,
    #[serde(default)]
    pub share_change: ShareChange,
    /// Use this rate instead of the computed WACC
    #[serde(default)]
    pub discount_rate: Option<f64>,
    pub scenarios: Vec<ScenarioSpec>,
}

fn current_fiscal_year() -> i32 {
    chrono::Local::now().year()
}

fn default_tax_rate() -> f64 {
    0.21
}

/// A profile converted to base units, ready for the scenario runner
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedValuation {
    pub company: String,
    pub ticker: Option<String>,
    pub base_fiscal_year: i32,
    /// Units the profile was declared in, for display
    pub display_units: Units,
    /// Computed WACC, even when an override is used for discounting
    pub wacc: f64,
    pub context: ValuationContext,
    pub scenarios: Vec<ScenarioSpec>,
}

impl CompanyProfile {
    /// Load a profile from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to open profile {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> AppResult<Self> {
        let profile: CompanyProfile = serde_json::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse profile: {}", e)))?;

        if profile.scenarios.is_empty() {
            return Err(AppError::Config(format!(
                "Profile '{}' defines no scenarios",
                profile.name
            )));
        }

        Ok(profile)
    }

    /// Same profile with every monetary value in base currency units and the
    /// share count as an absolute number
    pub fn normalized(&self) -> CompanyProfile {
        let money = self.units.currency.factor();
        let shares = self.units.shares.factor();

        CompanyProfile {
            units: Units::BASE,
            market_cap: self.market_cap * money,
            cash: self.cash * money,
            debt: self.debt * money,
            shares_outstanding: self.shares_outstanding * shares,
            scenarios: self
                .scenarios
                .iter()
                .map(|scenario| ScenarioSpec {
                    projection: scale_projection(&scenario.projection, money),
                    ..scenario.clone()
                })
                .collect(),
            ..self.clone()
        }
    }

    pub fn capital_structure(&self) -> CapitalStructure {
        CapitalStructure {
            market_cap: self.market_cap,
            debt: self.debt,
            cash: self.cash,
            beta: self.beta,
            risk_free_rate: self.risk_free_rate,
            market_return: self.market_return,
            tax_rate: self.tax_rate,
            cost_of_debt: self.cost_of_debt,
        }
    }

    /// Normalize units, compute WACC and build the shared valuation context
    pub fn prepare(&self) -> AppResult<PreparedValuation> {
        let normalized = self.normalized();
        let capital = normalized.capital_structure();
        let wacc = calculate_wacc(&capital)?;
        let discount_rate = normalized.discount_rate.unwrap_or(wacc);

        log::info!(
            "{}: WACC {:.2}%, discounting at {:.2}%",
            self.name,
            wacc * 100.0,
            discount_rate * 100.0
        );

        Ok(PreparedValuation {
            company: self.name.clone(),
            ticker: self.ticker.clone(),
            base_fiscal_year: self.base_fiscal_year,
            display_units: self.units,
            wacc,
            context: ValuationContext {
                capital,
                discount_rate,
                initial_shares: normalized.shares_outstanding,
                share_change: normalized.share_change,
            },
            scenarios: normalized.scenarios,
        })
    }
}

impl PreparedValuation {
    /// Restrict every scenario to its first `years` projected years
    pub fn with_horizon(mut self, years: usize) -> ValuationResult<Self> {
        for scenario in &mut self.scenarios {
            scenario.projection =
                truncate_horizon(&scenario.projection, years).map_err(|e| match e {
                    ValuationError::Config(msg) => {
                        ValuationError::Config(format!("scenario '{}': {}", scenario.name, msg))
                    }
                    other => other,
                })?;
        }
        Ok(self)
    }
}

fn scale_projection(projection: &ProjectionAssumptions, factor: f64) -> ProjectionAssumptions {
    let mut scaled = projection.clone();
    match &mut scaled {
        ProjectionAssumptions::DirectGrowth { initial_fcf, .. }
        | ProjectionAssumptions::ConstantGrowth { initial_fcf, .. } => *initial_fcf *= factor,
        ProjectionAssumptions::RevenueMargin {
            initial_revenue, ..
        } => *initial_revenue *= factor,
        ProjectionAssumptions::MarginExpansion {
            initial_revenue,
            known_fcf,
            ..
        } => {
            *initial_revenue *= factor;
            known_fcf.iter_mut().for_each(|value| *value *= factor);
        }
        ProjectionAssumptions::MultiSegment { segments } => segments
            .iter_mut()
            .for_each(|segment| segment.initial_revenue *= factor),
    }
    scaled
}

/// Projection limited to the first `years` years
pub fn truncate_horizon(
    projection: &ProjectionAssumptions,
    years: usize,
) -> ValuationResult<ProjectionAssumptions> {
    if years == 0 {
        return Err(ValuationError::Config(
            "horizon must be at least one year".to_string(),
        ));
    }

    let mut truncated = projection.clone();
    match &mut truncated {
        ProjectionAssumptions::DirectGrowth { growth_rates, .. } => {
            truncate_table("growth_rates", growth_rates, years)?
        }
        ProjectionAssumptions::RevenueMargin {
            growth_rates,
            margins,
            ..
        } => {
            truncate_table("growth_rates", growth_rates, years)?;
            truncate_margins(margins, years)?;
        }
        ProjectionAssumptions::MarginExpansion {
            growth_rates,
            known_fcf,
            ..
        } => {
            truncate_table("growth_rates", growth_rates, years)?;
            known_fcf.truncate(years);
        }
        ProjectionAssumptions::MultiSegment { segments } => {
            for segment in segments.iter_mut() {
                truncate_table("growth_rates", &mut segment.growth_rates, years)?;
                truncate_margins(&mut segment.margins, years)?;
            }
        }
        ProjectionAssumptions::ConstantGrowth { years: horizon, .. } => {
            if *horizon < years {
                return Err(ValuationError::Config(format!(
                    "constant growth covers {} years, {} requested",
                    horizon, years
                )));
            }
            *horizon = years;
        }
    }

    Ok(truncated)
}

fn truncate_table(name: &str, table: &mut Vec<f64>, years: usize) -> ValuationResult<()> {
    if table.len() < years {
        return Err(ValuationError::Config(format!(
            "{} covers {} years, {} requested",
            name,
            table.len(),
            years
        )));
    }
    table.truncate(years);
    Ok(())
}

fn truncate_margins(margins: &mut MarginSchedule, years: usize) -> ValuationResult<()> {
    match margins {
        MarginSchedule::Constant(_) => Ok(()),
        MarginSchedule::PerYear(values) => truncate_table("margins", values, years),
    }
}
