//! Typed message contracts between the engines and their host.
//!
//! Each engine runs behind its own request/event channel pair, and every
//! message serializes to the host protocol's `{type, payload}` envelope.
//! Events on a channel are strictly ordered: progress notifications carry
//! monotonically increasing counters and the terminal `result`/`error`
//! message is always last.

use serde::{Deserialize, Serialize};

use crate::config::McSettings;
use crate::market::Bar;
use crate::stats::McSummaryStats;
use crate::strategy::{CostParams, OptimizationRanges, StrategyKind, StrategyParams};
use crate::tracker::TopResult;

/// Requests accepted by the optimization worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum OptimizationRequest {
    /// Run a grid search over the given parameter space.
    #[serde(rename_all = "camelCase")]
    StartOptimization {
        /// Historical bars, chronological.
        historical_bars: Vec<Bar>,
        /// Strategy discriminator tag.
        strategy_kind: StrategyKind,
        /// The parameter space to enumerate.
        parameter_ranges: OptimizationRanges,
        /// Shared trading costs.
        cost_params: CostParams,
    },
}

/// Events emitted by the optimization worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum OptimizationEvent {
    /// Periodic progress during enumeration.
    #[serde(rename_all = "camelCase")]
    Progress {
        /// Human-readable progress line.
        message: String,
        /// Combinations evaluated so far (valid ones only).
        #[serde(skip_serializing_if = "Option::is_none")]
        combinations_tested: Option<u64>,
        /// Estimated total combinations.
        #[serde(skip_serializing_if = "Option::is_none")]
        estimated_total: Option<u64>,
        /// Best score seen so far.
        #[serde(skip_serializing_if = "Option::is_none")]
        best_score_so_far: Option<f64>,
    },
    /// Terminal success: the full top-N list, best first.
    #[serde(rename_all = "camelCase")]
    Result {
        /// Best results found (0..N entries).
        top_results: Vec<TopResult>,
    },
    /// Terminal failure.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

/// Requests accepted by the Monte Carlo validation worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum McRequest {
    /// Validate one parameter set against resampled synthetic paths.
    #[serde(rename_all = "camelCase")]
    StartMcValidation {
        /// Historical bars, chronological.
        historical_bars: Vec<Bar>,
        /// The parameter set to validate.
        selected_parameter_set: StrategyParams,
        /// Strategy discriminator tag.
        strategy_kind: StrategyKind,
        /// Iteration and path-length settings.
        mc_settings: McSettings,
        /// Shared trading costs.
        cost_params: CostParams,
    },
}

/// Events emitted by the Monte Carlo validation worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum McEvent {
    /// Periodic progress during iteration.
    McProgress {
        /// Human-readable progress line.
        message: String,
    },
    /// Terminal success: per-iteration outcomes plus their summary.
    McResult {
        /// Profit/loss percent per iteration.
        #[serde(rename = "allPnLsPct")]
        all_pnls_pct: Vec<f64>,
        /// Maximum drawdown percent per iteration.
        #[serde(rename = "allMaxDrawdowns")]
        all_max_drawdowns: Vec<f64>,
        /// Summary statistics over the outcomes.
        #[serde(rename = "summaryStats")]
        summary_stats: McSummaryStats,
    },
    /// Terminal failure.
    McError {
        /// Human-readable failure description.
        message: String,
    },
}
