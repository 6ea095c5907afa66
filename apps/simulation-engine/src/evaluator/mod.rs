//! Strategy evaluator port.
//!
//! The backtest that turns a price series plus parameters into performance
//! metrics lives outside this crate (typically a native module owned by the
//! host). The engine depends only on the [`StrategyEvaluator`] trait and on
//! two contract points:
//!
//! - a `profit_factor` of [`ERROR_PROFIT_FACTOR`] is a domain-level
//!   "could not evaluate" sentinel, not a failure of the call itself;
//! - each evaluation's result is a scoped resource: the returned
//!   [`MetricsLease`] releases it back to the evaluator when dropped, on
//!   every exit path of the calling loop iteration.

pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strategy::{CostParams, StrategyParams};

/// Sentinel profit factor meaning "no valid result", uniform across all
/// strategy kinds (for example, too few bars for the requested period).
pub const ERROR_PROFIT_FACTOR: f64 = -1.0;

/// Performance metrics returned by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestMetrics {
    /// Gross profit over gross loss; [`ERROR_PROFIT_FACTOR`] on no result.
    pub profit_factor: f64,
    /// Number of completed trades.
    pub trades: i32,
    /// Gross profit in price units.
    pub total_profit: f64,
    /// Gross loss in price units (positive magnitude).
    pub total_loss: f64,
    /// Peak-to-trough equity decline, as a percentage.
    pub max_drawdown_pct: f64,
}

impl BacktestMetrics {
    /// Whether this result carries the error sentinel.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.profit_factor == ERROR_PROFIT_FACTOR
    }

    /// The canonical sentinel result.
    #[must_use]
    pub const fn error() -> Self {
        Self {
            profit_factor: ERROR_PROFIT_FACTOR,
            trades: 0,
            total_profit: 0.0,
            total_loss: 0.0,
            max_drawdown_pct: 100.0,
        }
    }
}

/// Errors from the evaluator collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    /// One-time initialization failed.
    #[error("evaluator initialization failed: {message}")]
    InitializationFailed {
        /// Error details.
        message: String,
    },

    /// A single evaluation call failed.
    #[error("evaluation failed: {message}")]
    EvaluationFailed {
        /// Error details.
        message: String,
    },
}

/// Scoped handle to one evaluation's metrics.
///
/// Dereferences to [`BacktestMetrics`]; on drop the metrics are released
/// back to the evaluator. Callers read the fields they need within the loop
/// iteration and let the lease fall out of scope before the next one begins.
pub struct MetricsLease<'a> {
    metrics: BacktestMetrics,
    evaluator: &'a dyn StrategyEvaluator,
}

impl std::fmt::Debug for MetricsLease<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsLease")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl<'a> MetricsLease<'a> {
    /// Wrap freshly produced metrics in a release-on-drop lease.
    #[must_use]
    pub fn new(metrics: BacktestMetrics, evaluator: &'a dyn StrategyEvaluator) -> Self {
        Self { metrics, evaluator }
    }
}

impl std::ops::Deref for MetricsLease<'_> {
    type Target = BacktestMetrics;

    fn deref(&self) -> &Self::Target {
        &self.metrics
    }
}

impl Drop for MetricsLease<'_> {
    fn drop(&mut self) {
        self.evaluator.release(&self.metrics);
    }
}

/// Port for the external strategy evaluator.
///
/// `initialize` is awaited once per worker before any evaluation and must be
/// idempotent; `evaluate` is synchronous from the engine's perspective.
#[async_trait]
pub trait StrategyEvaluator: Send + Sync {
    /// One-time setup (loading the native module, warming caches).
    ///
    /// Repeat calls must be cheap no-ops.
    async fn initialize(&self) -> Result<(), EvaluatorError> {
        Ok(())
    }

    /// Run one backtest of `params` against `close_prices`.
    ///
    /// A sentinel result (see [`BacktestMetrics::is_error`]) is returned via
    /// `Ok`; `Err` means the evaluator itself failed.
    fn evaluate<'a>(
        &'a self,
        close_prices: &[f64],
        params: &StrategyParams,
        costs: &CostParams,
    ) -> Result<MetricsLease<'a>, EvaluatorError>;

    /// Release one result's resources. Called by [`MetricsLease`] on drop.
    fn release(&self, metrics: &BacktestMetrics) {
        let _ = metrics;
    }
}
