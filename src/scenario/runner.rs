// src/scenario/runner.rs
use rayon::prelude::*;

use crate::domain::errors::{ensure_finite, ValuationError, ValuationResult};
use crate::domain::models::{
    ScenarioName, ScenarioResult, ScenarioSpec, ShareCountPath, ValuationContext,
};
use crate::valuation::{discount, evolve_shares, project};

/// Result of one scenario inside a batch
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub name: ScenarioName,
    pub result: ValuationResult<ScenarioResult>,
}

impl ScenarioOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Value one scenario: project FCF, evolve the share count, discount.
///
/// The per-year price values the business from that year onward, so year `t`
/// discounts `fcf[t..]` and divides by `shares[t]`.
pub fn run_scenario(
    context: &ValuationContext,
    scenario: &ScenarioSpec,
) -> ValuationResult<ScenarioResult> {
    ensure_finite("discount_rate", context.discount_rate)?;
    let net_debt = context.capital.net_debt();
    ensure_finite("net debt", net_debt)?;

    let fcf_projection = project(&scenario.projection)?;
    let share_counts = evolve_shares(&ShareCountPath {
        initial_shares: context.initial_shares,
        change: context.share_change,
        horizon: fcf_projection.horizon(),
    })?;

    let dcf = discount(
        fcf_projection.values(),
        scenario.terminal_growth,
        context.discount_rate,
    )?;
    let enterprise_value = dcf.enterprise_value;
    let equity_value = enterprise_value - net_debt;

    let mut share_prices = Vec::with_capacity(fcf_projection.horizon());
    for (year, shares) in share_counts.iter().enumerate() {
        let from_year = discount(
            fcf_projection.suffix(year),
            scenario.terminal_growth,
            context.discount_rate,
        )?;
        share_prices.push((from_year.enterprise_value - net_debt) / shares);
    }

    let final_price_per_share = share_prices.last().copied().unwrap_or(equity_value);
    let final_shares = share_counts.last().copied().unwrap_or(context.initial_shares);
    let final_fcf_per_share = fcf_projection.last() / final_shares;
    if final_fcf_per_share == 0.0 {
        return Err(ValuationError::Domain(
            "final-year FCF is zero, price-to-FCF is undefined".to_string(),
        ));
    }
    let price_to_fcf = final_price_per_share / final_fcf_per_share;

    log::debug!(
        "{}: EV {:.2}, equity {:.2}, final price {:.2}, P/FCF {:.2}",
        scenario.name,
        enterprise_value,
        equity_value,
        final_price_per_share,
        price_to_fcf
    );

    Ok(ScenarioResult {
        name: scenario.name.clone(),
        enterprise_value,
        equity_value,
        dcf,
        fcf_projection,
        share_counts,
        share_prices,
        final_price_per_share,
        price_to_fcf,
    })
}

/// Run every scenario independently, in parallel.
///
/// Outcomes keep the input order; a failing scenario never aborts its siblings.
pub fn run_batch(context: &ValuationContext, scenarios: &[ScenarioSpec]) -> Vec<ScenarioOutcome> {
    scenarios
        .par_iter()
        .map(|scenario| {
            let result = run_scenario(context, scenario);
            if let Err(e) = &result {
                log::warn!("Scenario '{}' failed: {}", scenario.name, e);
            }
            ScenarioOutcome {
                name: scenario.name.clone(),
                result,
            }
        })
        .collect()
}
