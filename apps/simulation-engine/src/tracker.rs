//! Bounded tracking of the best-scoring parameter sets.

use serde::{Deserialize, Serialize};

use crate::strategy::{StrategyKind, StrategyParams};

/// One entry in the top-results list.
///
/// `score` is the profit factor of the combination's backtest. RSI entries
/// carry only the period; the fixed buy/sell levels are part of the request,
/// not the result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TopResult {
    /// Best SMA crossover combination.
    #[serde(rename_all = "camelCase")]
    SmaCross {
        /// Short moving-average period.
        short: f64,
        /// Long moving-average period.
        long: f64,
        /// Profit factor achieved.
        score: f64,
        /// Number of trades taken.
        trades: i32,
    },
    /// Best RSI combination.
    #[serde(rename_all = "camelCase")]
    Rsi {
        /// RSI lookback period.
        period: f64,
        /// Profit factor achieved.
        score: f64,
        /// Number of trades taken.
        trades: i32,
    },
}

impl TopResult {
    /// Build a result item from the evaluated parameter set.
    #[must_use]
    pub const fn from_params(params: &StrategyParams, score: f64, trades: i32) -> Self {
        match params {
            StrategyParams::SmaCross { short, long } => Self::SmaCross {
                short: *short,
                long: *long,
                score,
                trades,
            },
            StrategyParams::Rsi { period, .. } => Self::Rsi {
                period: *period,
                score,
                trades,
            },
        }
    }

    /// The score (profit factor) of this entry.
    #[must_use]
    pub const fn score(&self) -> f64 {
        match self {
            Self::SmaCross { score, .. } | Self::Rsi { score, .. } => *score,
        }
    }

    /// The strategy kind of this entry.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::SmaCross { .. } => StrategyKind::SmaCross,
            Self::Rsi { .. } => StrategyKind::Rsi,
        }
    }
}

/// Bounded list of the best results seen so far, descending by score.
///
/// Holds at most `capacity` entries. Ordering among equal scores is
/// implementation-defined.
#[derive(Debug, Clone)]
pub struct TopNTracker {
    capacity: usize,
    items: Vec<TopResult>,
}

impl TopNTracker {
    /// Tracker keeping the best `capacity` results.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    /// Offer a candidate result.
    ///
    /// Inserted while below capacity; afterwards it replaces the current
    /// worst entry only when it scores strictly higher. The list stays
    /// sorted non-increasing by score.
    pub fn offer(&mut self, candidate: TopResult) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() < self.capacity {
            self.items.push(candidate);
        } else {
            let worst = self.items.len() - 1;
            if candidate.score() > self.items[worst].score() {
                self.items[worst] = candidate;
            } else {
                return;
            }
        }
        self.items
            .sort_by(|a, b| b.score().total_cmp(&a.score()));
    }

    /// The best score seen so far, if any.
    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        self.items.first().map(TopResult::score)
    }

    /// The held results, best first.
    #[must_use]
    pub fn items(&self) -> &[TopResult] {
        &self.items
    }

    /// Consume the tracker, yielding the results best first.
    #[must_use]
    pub fn into_items(self) -> Vec<TopResult> {
        self.items
    }
}
