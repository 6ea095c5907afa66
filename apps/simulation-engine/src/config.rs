//! Engine configuration types.

use serde::{Deserialize, Serialize};

/// Tunables shared by both engines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// How many best results the grid search keeps.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Starting equity used to express Monte Carlo P/L as a percentage.
    #[serde(default = "default_start_equity")]
    pub start_equity: f64,

    /// Start price for synthetic paths when the last historical close is
    /// unavailable or zero.
    #[serde(default = "default_fallback_start_price")]
    pub fallback_start_price: f64,
}

// Config defaults (serde default functions)
fn default_top_n() -> usize {
    5
}
fn default_start_equity() -> f64 {
    10_000.0
}
fn default_fallback_start_price() -> f64 {
    100.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            start_equity: default_start_equity(),
            fallback_start_price: default_fallback_start_price(),
        }
    }
}

impl SimulationConfig {
    /// Set the number of tracked top results.
    #[must_use]
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the starting equity.
    #[must_use]
    pub const fn with_start_equity(mut self, equity: f64) -> Self {
        self.start_equity = equity;
        self
    }

    /// Set the fallback start price.
    #[must_use]
    pub const fn with_fallback_start_price(mut self, price: f64) -> Self {
        self.fallback_start_price = price;
        self
    }
}

/// Settings for one Monte Carlo validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McSettings {
    /// Number of simulation iterations.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Synthetic bars per simulated path.
    #[serde(default = "default_bars_per_sim")]
    pub bars_per_sim: u32,
}

fn default_iterations() -> u32 {
    1000
}
fn default_bars_per_sim() -> u32 {
    500
}

impl Default for McSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            bars_per_sim: default_bars_per_sim(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.start_equity, 10_000.0);
        assert_eq!(config.fallback_start_price, 100.0);
    }

    #[test]
    fn test_builders() {
        let config = SimulationConfig::default()
            .with_top_n(3)
            .with_start_equity(50_000.0);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.start_equity, 50_000.0);
    }

    #[test]
    fn test_mc_settings_deserialize_with_defaults() {
        let settings: McSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.iterations, 1000);
        assert_eq!(settings.bars_per_sim, 500);

        let settings: McSettings =
            serde_json::from_str(r#"{"iterations": 250, "barsPerSim": 100}"#).unwrap();
        assert_eq!(settings.iterations, 250);
        assert_eq!(settings.bars_per_sim, 100);
    }
}
