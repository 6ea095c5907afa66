//! Price-series preprocessing.

use crate::error::SimulationError;

/// Convert a close-price series into period-over-period fractional changes.
///
/// `change[i] = price[i+1] / price[i] - 1`, except a zero previous price
/// yields a change of 0 ("no change" rather than a division error). The
/// output always has exactly `prices.len() - 1` elements.
///
/// # Errors
///
/// [`SimulationError::InsufficientData`] when fewer than 2 prices are given.
pub fn fractional_changes(prices: &[f64]) -> Result<Vec<f64>, SimulationError> {
    if prices.len() < 2 {
        return Err(SimulationError::InsufficientData {
            message: format!("need at least 2 prices, got {}", prices.len()),
        });
    }

    let mut changes = Vec::with_capacity(prices.len() - 1);
    for window in prices.windows(2) {
        let (prev, curr) = (window[0], window[1]);
        if prev == 0.0 {
            changes.push(0.0);
        } else {
            changes.push(curr / prev - 1.0);
        }
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_n_minus_one() {
        let changes = fractional_changes(&[100.0, 102.0, 101.0, 105.0, 103.0]).unwrap();
        assert_eq!(changes.len(), 4);
    }

    #[test]
    fn test_change_values() {
        let changes = fractional_changes(&[100.0, 110.0, 99.0]).unwrap();
        assert!((changes[0] - 0.10).abs() < 1e-12);
        assert!((changes[1] - (99.0 / 110.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_previous_price_yields_zero_change() {
        let changes = fractional_changes(&[100.0, 0.0, 50.0]).unwrap();
        assert_eq!(changes[1], 0.0);
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(
            fractional_changes(&[100.0]),
            Err(SimulationError::InsufficientData { .. })
        ));
        assert!(matches!(
            fractional_changes(&[]),
            Err(SimulationError::InsufficientData { .. })
        ));
    }
}
