// src/valuation/wacc.rs
use crate::domain::errors::{ensure_finite, ValuationError, ValuationResult};
use crate::domain::models::CapitalStructure;

/// Weighted Average Cost of Capital.
///
/// Equity is priced with CAPM. The debt weight uses net debt, so a net-cash
/// position yields a negative weight and lowers the blended rate. The cost of
/// debt is the configured constant on `capital`, not a credit-spread model.
pub fn calculate_wacc(capital: &CapitalStructure) -> ValuationResult<f64> {
    ensure_finite("market_cap", capital.market_cap)?;
    ensure_finite("debt", capital.debt)?;
    ensure_finite("cash", capital.cash)?;
    ensure_finite("beta", capital.beta)?;
    ensure_finite("risk_free_rate", capital.risk_free_rate)?;
    ensure_finite("market_return", capital.market_return)?;
    ensure_finite("tax_rate", capital.tax_rate)?;
    ensure_finite("cost_of_debt", capital.cost_of_debt)?;

    let total_value = capital.total_value();
    if total_value <= 0.0 {
        return Err(ValuationError::Domain(format!(
            "total value (market cap + debt - cash) must be positive, got {}",
            total_value
        )));
    }

    let cost_of_equity = capital.cost_of_equity();
    let weight_equity = capital.market_cap / total_value;
    let weight_debt = capital.net_debt() / total_value;

    let wacc = weight_equity * cost_of_equity
        + weight_debt * capital.cost_of_debt * (1.0 - capital.tax_rate);

    log::debug!(
        "WACC {:.4} (cost of equity {:.4}, equity weight {:.4}, debt weight {:.4})",
        wacc,
        cost_of_equity,
        weight_equity,
        weight_debt
    );

    Ok(wacc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mastercard() -> CapitalStructure {
        CapitalStructure {
            market_cap: 477.823,
            debt: 1.3,
            cash: 9.2,
            beta: 1.1,
            risk_free_rate: 0.04457,
            market_return: 0.095,
            tax_rate: 0.21,
            cost_of_debt: 0.04,
        }
    }

    #[test]
    fn mastercard_wacc_matches_hand_computation() {
        let capital = mastercard();
        let cost_of_equity = 0.04457 + 1.1 * (0.095 - 0.04457);
        let total = 477.823 + 1.3 - 9.2;
        let expected =
            477.823 / total * cost_of_equity + (1.3 - 9.2) / total * 0.04 * (1.0 - 0.21);

        let wacc = calculate_wacc(&capital).unwrap();
        assert!((wacc - expected).abs() < 1e-12);
        assert!((wacc - 0.10119).abs() < 1e-4);
    }

    #[test]
    fn debt_free_company_reduces_to_levered_cost_of_equity() {
        let capital = CapitalStructure {
            market_cap: 1424.0,
            debt: 0.0,
            cash: 65.0,
            beta: 1.22,
            risk_free_rate: 0.04457,
            market_return: 0.10,
            tax_rate: 0.21,
            cost_of_debt: 0.0,
        };
        let wacc = calculate_wacc(&capital).unwrap();
        let expected = 1424.0 / (1424.0 - 65.0) * capital.cost_of_equity();
        assert!((wacc - expected).abs() < 1e-12);
        assert!(wacc > capital.cost_of_equity());
    }

    #[test]
    fn non_positive_total_value_is_a_domain_error() {
        let mut capital = mastercard();
        capital.cash = 500.0;
        assert!(matches!(
            calculate_wacc(&capital),
            Err(ValuationError::Domain(_))
        ));

        capital.cash = capital.market_cap + capital.debt;
        assert!(matches!(
            calculate_wacc(&capital),
            Err(ValuationError::Domain(_))
        ));
    }

    #[test]
    fn nan_inputs_are_rejected() {
        let mut capital = mastercard();
        capital.beta = f64::NAN;
        assert!(matches!(
            calculate_wacc(&capital),
            Err(ValuationError::Config(_))
        ));
    }
}
