//! Strategy parameter model.
//!
//! Strategies are discriminated unions resolved by pattern matching: each
//! kind carries its own parameter fields, and optimization ranges mirror the
//! same split. Shared trading costs ride alongside every parameter set.

use serde::{Deserialize, Serialize};

/// An inclusive arithmetic progression `min, min+step, ..., <= max`.
///
/// Invariant: `step > 0`. A range with `max < min` yields no values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// First value of the progression.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Positive increment between values.
    pub step: f64,
}

impl ParameterRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Materialize the progression.
    ///
    /// Returns an empty vector when `step <= 0` or `max < min`.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        let mut out = Vec::new();
        if self.step <= 0.0 {
            return out;
        }
        let mut v = self.min;
        while v <= self.max {
            out.push(v);
            v += self.step;
        }
        out
    }

    /// Estimated value count: `max(1, floor((max - min) / step) + 1)`.
    ///
    /// This is an estimate, never less than 1 even for an empty range; grid
    /// search uses it as a progress denominator without adjusting for
    /// combinations excluded at runtime.
    #[must_use]
    pub fn estimated_count(&self) -> u64 {
        if self.step <= 0.0 {
            return 1;
        }
        let n = ((self.max - self.min) / self.step).floor();
        if n.is_finite() && n >= 0.0 {
            n as u64 + 1
        } else {
            1
        }
    }
}

/// Trading costs shared by every strategy kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CostParams {
    /// Commission per trade as a decimal fraction (0.001 = 0.1%).
    pub commission_pct: f64,
    /// Absolute slippage applied per fill, in price units.
    pub slippage_amount: f64,
}

/// Strategy discriminator tag.
///
/// Unrecognized tags deserialize to [`StrategyKind::Unknown`] so a host can
/// send a newer strategy name without breaking the protocol; the run then
/// fails fast with an unsupported-strategy error before any enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    /// Simple moving average crossover.
    SmaCross,
    /// Relative strength index mean reversion.
    Rsi,
    /// Any tag this engine does not recognize.
    #[serde(other)]
    Unknown,
}

impl StrategyKind {
    /// Wire-format tag for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SmaCross => "smaCross",
            Self::Rsi => "rsi",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One concrete parameter set for a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StrategyParams {
    /// SMA crossover periods. Valid only when `short < long`.
    #[serde(rename_all = "camelCase")]
    SmaCross {
        /// Short moving-average period.
        short: f64,
        /// Long moving-average period.
        long: f64,
    },
    /// RSI period with entry/exit levels.
    #[serde(rename_all = "camelCase")]
    Rsi {
        /// RSI lookback period.
        period: f64,
        /// Buy when RSI drops below this level.
        buy_level: f64,
        /// Sell when RSI rises above this level.
        sell_level: f64,
    },
}

impl StrategyParams {
    /// The discriminator tag of this parameter set.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::SmaCross { .. } => StrategyKind::SmaCross,
            Self::Rsi { .. } => StrategyKind::Rsi,
        }
    }

    /// Whether this combination satisfies the strategy's validity invariant.
    ///
    /// SMA crossover requires `short < long`; RSI has no intra-set
    /// constraint.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::SmaCross { short, long } => short < long,
            Self::Rsi { .. } => true,
        }
    }
}

/// The parameter space to enumerate for one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OptimizationRanges {
    /// Two-dimensional SMA grid: `short` outer, `long` inner.
    #[serde(rename_all = "camelCase")]
    SmaCross {
        /// Range for the short period.
        short_sma: ParameterRange,
        /// Range for the long period.
        long_sma: ParameterRange,
    },
    /// One-dimensional RSI grid over the period; levels are fixed.
    #[serde(rename_all = "camelCase")]
    Rsi {
        /// Range for the RSI period.
        period: ParameterRange,
        /// Fixed buy level carried into every evaluation.
        buy_level: f64,
        /// Fixed sell level carried into every evaluation.
        sell_level: f64,
    },
}

impl OptimizationRanges {
    /// The discriminator tag these ranges belong to.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::SmaCross { .. } => StrategyKind::SmaCross,
            Self::Rsi { .. } => StrategyKind::Rsi,
        }
    }

    /// Estimated total combinations: the product of per-range estimates.
    #[must_use]
    pub fn estimated_combinations(&self) -> u64 {
        match self {
            Self::SmaCross {
                short_sma,
                long_sma,
            } => short_sma.estimated_count() * long_sma.estimated_count(),
            Self::Rsi { period, .. } => period.estimated_count(),
        }
    }
}
