// src/valuation/shares.rs
use crate::domain::errors::{ensure_finite, ValuationError, ValuationResult};
use crate::domain::models::ShareCountPath;

/// Share count for each forecast year.
///
/// `shares[0]` is the initial count and every later year compounds by the
/// signed buyback/dilution rate. Fails if any year's count is not positive.
pub fn evolve_shares(path: &ShareCountPath) -> ValuationResult<Vec<f64>> {
    let rate = path.change.signed_rate();
    ensure_finite("initial_shares", path.initial_shares)?;
    ensure_finite("share change rate", rate)?;

    if path.horizon == 0 {
        return Err(ValuationError::Config(
            "share count horizon must be at least one year".to_string(),
        ));
    }
    if path.initial_shares <= 0.0 {
        return Err(ValuationError::Config(format!(
            "initial share count must be positive, got {}",
            path.initial_shares
        )));
    }

    let mut shares = Vec::with_capacity(path.horizon);
    let mut current = path.initial_shares;
    shares.push(current);

    for year in 1..path.horizon {
        current *= 1.0 + rate;
        if current <= 0.0 || !current.is_finite() {
            return Err(ValuationError::Config(format!(
                "share count reaches {} in year {} at rate {}",
                current, year, rate
            )));
        }
        shares.push(current);
    }

    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ShareChange;

    fn path(change: ShareChange, horizon: usize) -> ShareCountPath {
        ShareCountPath {
            initial_shares: 930e6,
            change,
            horizon,
        }
    }

    #[test]
    fn buyback_shrinks_share_count() {
        let shares = evolve_shares(&path(ShareChange::Buyback { rate: 0.02 }, 3)).unwrap();
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0], 930e6);
        assert!((shares[1] - 930e6 * 0.98).abs() < 1e-3);
        assert!((shares[2] - 930e6 * 0.98 * 0.98).abs() < 1e-3);
    }

    #[test]
    fn dilution_grows_share_count() {
        let shares = evolve_shares(&path(ShareChange::Dilution { rate: 0.02 }, 4)).unwrap();
        assert!(shares.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn no_program_keeps_count_flat() {
        let shares = evolve_shares(&path(ShareChange::None, 3)).unwrap();
        assert!(shares.iter().all(|s| *s == 930e6));
    }

    #[test]
    fn full_buyback_is_rejected() {
        let err = evolve_shares(&path(ShareChange::Buyback { rate: 1.0 }, 2)).unwrap_err();
        assert!(matches!(err, ValuationError::Config(_)));
        // A single year never compounds, so the rate is not exercised
        assert!(evolve_shares(&path(ShareChange::Buyback { rate: 1.0 }, 1)).is_ok());
    }

    #[test]
    fn zero_horizon_and_non_positive_start_are_rejected() {
        assert!(evolve_shares(&path(ShareChange::None, 0)).is_err());
        let mut empty = path(ShareChange::None, 2);
        empty.initial_shares = 0.0;
        assert!(evolve_shares(&empty).is_err());
    }
}
