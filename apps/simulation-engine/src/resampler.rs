//! Bootstrap resampling of price paths.
//!
//! A synthetic path is grown multiplicatively from a start price by drawing
//! historical fractional changes uniformly at random, with replacement. The
//! resampler is generic over its random source so tests can inject a seeded
//! generator and replay identical paths.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates synthetic price paths by bootstrap resampling.
#[derive(Debug)]
pub struct PathResampler<R = StdRng> {
    rng: R,
}

impl PathResampler<StdRng> {
    /// Resampler seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Resampler with a fixed seed for reproducible paths.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for PathResampler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> PathResampler<R> {
    /// Resampler over a caller-supplied random source.
    #[must_use]
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a path of `num_bars + 1` prices starting at `start_price`.
    ///
    /// Each step draws one change from `changes` and applies it
    /// multiplicatively; prices are clamped at 0 so a path can never go
    /// negative. With an empty change set or `num_bars == 0` the path is
    /// just `[start_price]`.
    pub fn generate(&mut self, changes: &[f64], num_bars: u32, start_price: f64) -> Vec<f64> {
        if changes.is_empty() || num_bars == 0 {
            return vec![start_price];
        }

        let mut path = Vec::with_capacity(num_bars as usize + 1);
        path.push(start_price);

        let mut current = start_price;
        for _ in 0..num_bars {
            let change = changes[self.rng.random_range(0..changes.len())];
            current = (current * (1.0 + change)).max(0.0);
            path.push(current);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_path_length_and_start() {
        let mut resampler = PathResampler::with_seed(7);
        let path = resampler.generate(&[0.01, -0.02, 0.005], 50, 100.0);
        assert_eq!(path.len(), 51);
        assert_eq!(path[0], 100.0);
    }

    #[test]
    fn test_degenerate_inputs_yield_single_price() {
        let mut resampler = PathResampler::with_seed(7);
        assert_eq!(resampler.generate(&[], 10, 42.0), vec![42.0]);
        assert_eq!(resampler.generate(&[0.01], 0, 42.0), vec![42.0]);
    }

    #[test]
    fn test_prices_clamped_at_zero() {
        // A -150% change would take the price negative without the clamp.
        let mut resampler = PathResampler::with_seed(7);
        let path = resampler.generate(&[-1.5], 5, 100.0);
        assert!(path.iter().all(|p| *p >= 0.0));
        assert_eq!(path[1], 0.0);
    }

    #[test]
    fn test_same_seed_same_path() {
        let changes = [0.01, -0.02, 0.03, -0.01];
        let a = PathResampler::with_seed(99).generate(&changes, 100, 250.0);
        let b = PathResampler::with_seed(99).generate(&changes, 100, 250.0);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_path_shape_holds(
            changes in proptest::collection::vec(-0.5f64..0.5, 1..64),
            num_bars in 0u32..200,
            start in 0.01f64..10_000.0,
            seed in any::<u64>(),
        ) {
            let mut resampler = PathResampler::with_seed(seed);
            let path = resampler.generate(&changes, num_bars, start);

            let expected_len = if num_bars == 0 { 1 } else { num_bars as usize + 1 };
            prop_assert_eq!(path.len(), expected_len);
            prop_assert_eq!(path[0], start);
            prop_assert!(path.iter().all(|p| *p >= 0.0));
        }
    }
}
