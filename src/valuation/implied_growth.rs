// src/valuation/implied_growth.rs
use crate::domain::errors::{ensure_finite, ValuationError, ValuationResult};
use crate::valuation::discount::discount;
use crate::valuation::projection::project_constant_growth;

/// Hard ceiling on bisection steps
pub const DEFAULT_MAX_ITERATIONS: usize = 200;
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Bisection search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Lower end of the growth bracket
    pub low: f64,
    /// Upper end of the growth bracket
    pub high: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            low: -0.5,
            high: 0.5,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> ValuationResult<()> {
        ensure_finite("tolerance", self.tolerance)?;
        ensure_finite("search low", self.low)?;
        ensure_finite("search high", self.high)?;
        if self.tolerance <= 0.0 {
            return Err(ValuationError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(ValuationError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.low >= self.high {
            return Err(ValuationError::Config(format!(
                "search bracket [{}, {}] is empty",
                self.low, self.high
            )));
        }
        if self.low <= -1.0 {
            return Err(ValuationError::Config(format!(
                "search low {} must be greater than -100%",
                self.low
            )));
        }
        Ok(())
    }
}

/// Market observations the implied growth rate must reproduce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedGrowthInputs {
    pub market_cap: f64,
    /// Debt minus cash
    pub net_debt: f64,
    /// Trailing FCF; the first projected year is already grown once
    pub base_fcf: f64,
    pub years: usize,
    pub terminal_growth: f64,
    pub discount_rate: f64,
}

/// Constant growth rate at which the DCF enterprise value equals market cap plus net debt.
///
/// Assumes the valuation increases with growth across the bracket, which holds
/// while every projected cash flow stays positive. With a non-positive base
/// FCF the result is not meaningful.
pub fn implied_growth(
    inputs: &ImpliedGrowthInputs,
    settings: &SolverSettings,
) -> ValuationResult<f64> {
    settings.validate()?;
    ensure_finite("market_cap", inputs.market_cap)?;
    ensure_finite("net_debt", inputs.net_debt)?;

    let target_ev = inputs.market_cap + inputs.net_debt;
    let value_at = |growth: f64| -> ValuationResult<f64> {
        let projection = project_constant_growth(inputs.base_fcf, growth, inputs.years)?;
        Ok(discount(projection.values(), inputs.terminal_growth, inputs.discount_rate)?
            .enterprise_value)
    };

    let mut low = settings.low;
    let mut high = settings.high;

    for iteration in 0..settings.max_iterations {
        if high - low <= settings.tolerance {
            log::debug!(
                "implied growth converged after {} iterations in [{}, {}]",
                iteration,
                low,
                high
            );
            return Ok((low + high) / 2.0);
        }

        let mid = (low + high) / 2.0;
        if value_at(mid)? < target_ev {
            low = mid;
        } else {
            high = mid;
        }
        log::trace!("bisection step {}: [{}, {}]", iteration + 1, low, high);
    }

    if high - low <= settings.tolerance {
        return Ok((low + high) / 2.0);
    }

    Err(ValuationError::Convergence {
        low,
        high,
        iterations: settings.max_iterations,
    })
}
