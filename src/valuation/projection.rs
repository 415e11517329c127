// src/valuation/projection.rs
use crate::domain::errors::{ensure_finite, ValuationError, ValuationResult};
use crate::domain::models::{
    FcfProjection, MarginPath, MarginSchedule, ProjectionAssumptions, Segment,
};

/// Project free cash flows with the strategy named by `assumptions`
pub fn project(assumptions: &ProjectionAssumptions) -> ValuationResult<FcfProjection> {
    let projection = match assumptions {
        ProjectionAssumptions::DirectGrowth {
            initial_fcf,
            growth_rates,
        } => project_direct_growth(*initial_fcf, growth_rates)?,
        ProjectionAssumptions::RevenueMargin {
            initial_revenue,
            growth_rates,
            margins,
        } => project_revenue_margin(*initial_revenue, growth_rates, margins)?,
        ProjectionAssumptions::MarginExpansion {
            initial_revenue,
            growth_rates,
            known_fcf,
            margin_path,
        } => project_margin_expansion(*initial_revenue, growth_rates, known_fcf, margin_path)?,
        ProjectionAssumptions::MultiSegment { segments } => project_segments(segments)?,
        ProjectionAssumptions::ConstantGrowth {
            initial_fcf,
            growth_rate,
            years,
        } => project_constant_growth(*initial_fcf, *growth_rate, *years)?,
    };

    log::debug!(
        "{} projection over {} years: {:?}",
        assumptions.strategy_name(),
        projection.horizon(),
        projection.values()
    );

    Ok(projection)
}

/// FCF compounding directly: `fcf[0] = initial_fcf`, `fcf[t] = fcf[t-1] * (1 + growth[t-1])`
pub fn project_direct_growth(
    initial_fcf: f64,
    growth_rates: &[f64],
) -> ValuationResult<FcfProjection> {
    ensure_finite("initial_fcf", initial_fcf)?;
    Ok(FcfProjection::new(compound(initial_fcf, growth_rates)?))
}

/// Revenue compounding by `growth_rates`, converted to FCF by per-year margins
pub fn project_revenue_margin(
    initial_revenue: f64,
    growth_rates: &[f64],
    margins: &MarginSchedule,
) -> ValuationResult<FcfProjection> {
    ensure_finite("initial_revenue", initial_revenue)?;
    let revenue = compound(initial_revenue, growth_rates)?;
    let margins = expand_margins(margins, revenue.len())?;

    let fcf = revenue
        .iter()
        .zip(margins.iter())
        .map(|(rev, margin)| rev * margin)
        .collect();

    Ok(FcfProjection::new(fcf))
}

/// Margin for each of `horizon` years along the glide path.
///
/// Interpolates linearly from the initial margin and holds at the target from
/// year `years_to_target` onward.
pub fn margin_glide(path: &MarginPath, horizon: usize) -> ValuationResult<Vec<f64>> {
    ensure_finite("initial_margin", path.initial_margin)?;
    ensure_finite("target_margin", path.target_margin)?;
    if path.years_to_target == 0 {
        return Err(ValuationError::Config(
            "years_to_target must be at least 1".to_string(),
        ));
    }

    let step = (path.target_margin - path.initial_margin) / path.years_to_target as f64;
    let margins = (0..horizon)
        .map(|year| {
            if year >= path.years_to_target {
                path.target_margin
            } else {
                path.initial_margin + step * year as f64
            }
        })
        .collect();

    Ok(margins)
}

/// Revenue times a gliding margin, with reported actuals for the first years.
///
/// The first `known_fcf.len()` years are taken verbatim. Revenue for the last
/// known year is backed out through that year's margin and compounding
/// resumes from there.
pub fn project_margin_expansion(
    initial_revenue: f64,
    growth_rates: &[f64],
    known_fcf: &[f64],
    path: &MarginPath,
) -> ValuationResult<FcfProjection> {
    ensure_finite("initial_revenue", initial_revenue)?;
    validate_growth_rates(growth_rates)?;
    let horizon = growth_rates.len();

    if known_fcf.len() > horizon {
        return Err(ValuationError::Config(format!(
            "{} known FCF values exceed the {}-year horizon",
            known_fcf.len(),
            horizon
        )));
    }
    for value in known_fcf {
        ensure_finite("known_fcf", *value)?;
    }

    let margins = margin_glide(path, horizon)?;

    let mut fcf = Vec::with_capacity(horizon);
    fcf.extend_from_slice(known_fcf);

    // Revenue of the year before the first projected one
    let mut revenue = match known_fcf.last() {
        Some(last_known) => {
            let margin = margins[known_fcf.len() - 1];
            if margin == 0.0 {
                return Err(ValuationError::Config(
                    "cannot back out revenue from a zero margin".to_string(),
                ));
            }
            last_known / margin
        }
        None => {
            fcf.push(initial_revenue * margins[0]);
            initial_revenue
        }
    };

    for year in fcf.len()..horizon {
        revenue *= 1.0 + growth_rates[year - 1];
        fcf.push(revenue * margins[year]);
    }

    Ok(FcfProjection::new(fcf))
}

/// Consolidated FCF: each segment projected on its own, then summed per year
pub fn project_segments(segments: &[Segment]) -> ValuationResult<FcfProjection> {
    let Some(first) = segments.first() else {
        return Err(ValuationError::Config(
            "multi-segment projection needs at least one segment".to_string(),
        ));
    };

    let horizon = first.growth_rates.len();
    let mut total = vec![0.0; horizon];

    for segment in segments {
        if segment.growth_rates.len() != horizon {
            return Err(ValuationError::Config(format!(
                "segment '{}' projects {} years, expected {}",
                segment.name,
                segment.growth_rates.len(),
                horizon
            )));
        }

        let projection =
            project_revenue_margin(segment.initial_revenue, &segment.growth_rates, &segment.margins)
                .map_err(|e| match e {
                    ValuationError::Config(msg) => {
                        ValuationError::Config(format!("segment '{}': {}", segment.name, msg))
                    }
                    other => other,
                })?;

        for (sum, value) in total.iter_mut().zip(projection.values()) {
            *sum += value;
        }
    }

    Ok(FcfProjection::new(total))
}

/// One rate for `years` years, starting one period after the base FCF:
/// `fcf[i] = initial_fcf * (1 + growth_rate)^(i + 1)`
pub fn project_constant_growth(
    initial_fcf: f64,
    growth_rate: f64,
    years: usize,
) -> ValuationResult<FcfProjection> {
    ensure_finite("initial_fcf", initial_fcf)?;
    ensure_finite("growth_rate", growth_rate)?;
    if years == 0 {
        return Err(ValuationError::Config(
            "projection horizon must be at least one year".to_string(),
        ));
    }

    let fcf = (1..=years)
        .map(|year| initial_fcf * (1.0 + growth_rate).powi(year as i32))
        .collect();

    Ok(FcfProjection::new(fcf))
}

fn validate_growth_rates(growth_rates: &[f64]) -> ValuationResult<()> {
    if growth_rates.is_empty() {
        return Err(ValuationError::Config(
            "projection horizon must be at least one year".to_string(),
        ));
    }
    for rate in growth_rates {
        ensure_finite("growth rate", *rate)?;
    }
    Ok(())
}

/// `value[0] = initial`, `value[t] = value[t-1] * (1 + growth[t-1])`
fn compound(initial: f64, growth_rates: &[f64]) -> ValuationResult<Vec<f64>> {
    validate_growth_rates(growth_rates)?;

    let mut values = Vec::with_capacity(growth_rates.len());
    let mut current = initial;
    values.push(current);
    for growth in &growth_rates[..growth_rates.len() - 1] {
        current *= 1.0 + growth;
        values.push(current);
    }

    Ok(values)
}

fn expand_margins(margins: &MarginSchedule, horizon: usize) -> ValuationResult<Vec<f64>> {
    match margins {
        MarginSchedule::Constant(margin) => {
            ensure_finite("margin", *margin)?;
            Ok(vec![*margin; horizon])
        }
        MarginSchedule::PerYear(values) => {
            if values.len() != horizon {
                return Err(ValuationError::Config(format!(
                    "{} margins given for {} growth periods",
                    values.len(),
                    horizon
                )));
            }
            for margin in values {
                ensure_finite("margin", *margin)?;
            }
            Ok(values.clone())
        }
    }
}
