//! End-to-end valuation of the bundled company profiles.

use dcf_valuation::domain::errors::{AppError, ValuationError};
use dcf_valuation::domain::models::{ProjectionAssumptions, ScenarioName};
use dcf_valuation::profile::{CompanyProfile, PreparedValuation};
use dcf_valuation::scenario::{run_batch, ScenarioOutcome};
use dcf_valuation::valuation::{discount, project};
use std::path::PathBuf;

fn profile_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("profiles")
        .join(format!("{name}.json"))
}

fn prepare(name: &str) -> PreparedValuation {
    CompanyProfile::from_file(profile_path(name))
        .unwrap()
        .prepare()
        .unwrap()
}

fn run(prepared: &PreparedValuation) -> Vec<ScenarioOutcome> {
    run_batch(&prepared.context, &prepared.scenarios)
}

#[test]
fn every_bundled_profile_values_cleanly() {
    for name in ["mastercard", "meta", "toast", "dominos", "zoom"] {
        let prepared = prepare(name);
        let outcomes = run(&prepared);
        assert_eq!(outcomes.len(), 3, "{name}");
        for outcome in &outcomes {
            let result = outcome.result.as_ref().unwrap_or_else(|e| {
                panic!("{name} / {}: {e}", outcome.name);
            });
            assert_eq!(result.fcf_projection.horizon(), 10, "{name}");
            assert!(result.enterprise_value > 0.0, "{name}");
            assert!(result.final_price_per_share.is_finite(), "{name}");
        }
        assert_eq!(outcomes[0].name, ScenarioName::Pessimistic);
        assert_eq!(outcomes[1].name, ScenarioName::Base);
        assert_eq!(outcomes[2].name, ScenarioName::Optimistic);
    }
}

#[test]
fn optimistic_scenarios_are_worth_more() {
    for name in ["mastercard", "meta", "toast", "zoom"] {
        let outcomes = run(&prepare(name));
        let ev: Vec<f64> = outcomes
            .iter()
            .map(|o| o.result.as_ref().unwrap().enterprise_value)
            .collect();
        assert!(ev[0] < ev[1] && ev[1] < ev[2], "{name}: {ev:?}");
    }
}

#[test]
fn meta_base_case_matches_hand_computation() {
    let prepared = prepare("meta");
    let outcomes = run(&prepared);
    let base = outcomes[1].result.as_ref().unwrap();

    // Revenue in dollars, margin 30%
    let growth = [0.09, 0.14, 0.13, 0.12, 0.11, 0.10, 0.09, 0.08, 0.07, 0.06];
    let mut revenue = 156e9;
    let mut fcf = vec![revenue * 0.30];
    for g in &growth[..9] {
        revenue *= 1.0 + g;
        fcf.push(revenue * 0.30);
    }
    for (actual, expected) in base.fcf_projection.values().iter().zip(&fcf) {
        assert!((actual - expected).abs() / expected < 1e-12);
    }

    let r = prepared.context.discount_rate;
    let explicit: f64 = fcf
        .iter()
        .enumerate()
        .map(|(i, v)| v / (1.0 + r).powi(i as i32 + 1))
        .sum();
    let terminal = fcf[9] * 1.03 / (r - 0.03) / (1.0 + r).powi(10);
    let ev = explicit + terminal;
    assert!((base.enterprise_value - ev).abs() / ev < 1e-10);
    assert!((base.equity_value - (ev + 65e9)).abs() / ev < 1e-10);

    // Price today is equity over today's share count
    let price_today = (ev + 65e9) / 2.534e9;
    assert!((base.share_prices[0] - price_today).abs() / price_today < 1e-10);
}

#[test]
fn unit_declaration_does_not_change_prices() {
    let billions = CompanyProfile::from_file(profile_path("dominos")).unwrap();

    let mut millions = billions.clone();
    millions.units.currency = dcf_valuation::profile::Scale::Millions;
    millions.market_cap *= 1000.0;
    millions.cash *= 1000.0;
    millions.debt *= 1000.0;
    for scenario in &mut millions.scenarios {
        if let ProjectionAssumptions::DirectGrowth { initial_fcf, .. } = &mut scenario.projection {
            *initial_fcf *= 1000.0;
        }
    }

    let a = run(&billions.prepare().unwrap());
    let b = run(&millions.prepare().unwrap());
    for (x, y) in a.iter().zip(&b) {
        let x = x.result.as_ref().unwrap();
        let y = y.result.as_ref().unwrap();
        assert!((x.final_price_per_share - y.final_price_per_share).abs() < 1e-6);
        assert!((x.price_to_fcf - y.price_to_fcf).abs() < 1e-9);
    }
}

#[test]
fn mastercard_keeps_reported_actuals() {
    let prepared = prepare("mastercard");
    for scenario in &prepared.scenarios {
        let fcf = project(&scenario.projection).unwrap();
        assert!((fcf.values()[0] - 13.0e9).abs() < 1e-3);
        assert!((fcf.values()[1] - 14.7e9).abs() < 1e-3);
        assert!((fcf.values()[2] - 16.5e9).abs() < 1e-3);
        assert!(fcf.values()[3] > 16.5e9);
    }
}

#[test]
fn shortened_horizon_still_values() {
    let prepared = prepare("toast").with_horizon(5).unwrap();
    let outcomes = run(&prepared);
    for outcome in outcomes {
        let result = outcome.result.unwrap();
        assert_eq!(result.share_prices.len(), 5);
        let direct = discount(result.fcf_projection.values(), 0.0, prepared.context.discount_rate);
        assert!(direct.is_ok());
    }
}

#[test]
fn failing_scenario_is_reported_alongside_successes() {
    let mut profile = CompanyProfile::from_file(profile_path("dominos")).unwrap();
    profile.scenarios[1].terminal_growth = 0.5;

    let outcomes = run(&profile.prepare().unwrap());
    assert!(outcomes[0].is_ok());
    assert!(outcomes[2].is_ok());
    let err = outcomes[1].result.as_ref().unwrap_err();
    assert!(matches!(err, ValuationError::Domain(_)));
    assert_eq!(AppError::from(err.clone()).exit_code(), 2);
}

#[test]
fn net_cash_beyond_market_cap_fails_wacc() {
    let mut profile = CompanyProfile::from_file(profile_path("zoom")).unwrap();
    profile.cash = 30.0;
    assert!(matches!(
        profile.prepare(),
        Err(AppError::Valuation(ValuationError::Domain(_)))
    ));
}
