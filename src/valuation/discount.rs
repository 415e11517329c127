// src/valuation/discount.rs
use crate::domain::errors::{ensure_finite, ValuationError, ValuationResult};
use crate::domain::models::DcfResult;

/// Discount a cash-flow sequence plus a Gordon-growth terminal value.
///
/// Year `i` (0-based) is discounted `i + 1` full periods and the terminal
/// value shares the final year's factor. Any tail of a longer projection is a
/// valid input and is valued as if the first element were one year away.
pub fn discount(
    fcf: &[f64],
    terminal_growth: f64,
    discount_rate: f64,
) -> ValuationResult<DcfResult> {
    ensure_finite("terminal_growth", terminal_growth)?;
    ensure_finite("discount_rate", discount_rate)?;

    let Some(&final_fcf) = fcf.last() else {
        return Err(ValuationError::Config(
            "cannot discount an empty cash-flow sequence".to_string(),
        ));
    };
    for value in fcf {
        ensure_finite("fcf", *value)?;
    }

    if discount_rate <= terminal_growth {
        return Err(ValuationError::Domain(format!(
            "discount rate {} must exceed terminal growth {}",
            discount_rate, terminal_growth
        )));
    }
    if discount_rate <= -1.0 {
        return Err(ValuationError::Domain(format!(
            "discount rate {} must be greater than -100%",
            discount_rate
        )));
    }

    let base = 1.0 + discount_rate;
    let mut factor = 1.0;
    let mut pv_of_explicit_flows = 0.0;
    for value in fcf {
        factor /= base;
        pv_of_explicit_flows += value * factor;
    }

    let terminal_value = final_fcf * (1.0 + terminal_growth) / (discount_rate - terminal_growth);
    let terminal_value_component = terminal_value * factor;

    log::trace!(
        "discounted {} years: explicit {:.6}, terminal {:.6}",
        fcf.len(),
        pv_of_explicit_flows,
        terminal_value_component
    );

    Ok(DcfResult {
        enterprise_value: pv_of_explicit_flows + terminal_value_component,
        terminal_value_component,
        pv_of_explicit_flows,
    })
}
