// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Simulation Engine - Rust Core Library
//!
//! Grid-search optimization and bootstrap Monte Carlo validation for
//! trading-strategy parameters.
//!
//! # Architecture
//!
//! The engine is the compute core of a larger host application. The host
//! owns the UI, the market-data provider, and the strategy evaluator
//! (backtester); this crate owns the orchestration:
//!
//! - **Contracts**: `market` (bars + data port), `strategy` (parameter
//!   model), `evaluator` (backtester port with scoped-release results)
//! - **Engines**: `grid` (exhaustive parameter enumeration with top-N
//!   tracking), `montecarlo` (bootstrap-resampled path validation),
//!   supported by `preprocess`, `resampler`, `tracker`, `stats`, `progress`
//! - **Hosting**: `worker` (actor tasks behind request/event channels),
//!   `messages` (the serde wire protocol), `config`, `error`
//!
//! Both engines are sequential and cooperative: one evaluator call at a
//! time, with periodic progress events and yields so a shared runtime stays
//! responsive.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Engine tunables and Monte Carlo settings.
pub mod config;

/// Shared error taxonomy for simulation runs.
pub mod error;

/// Strategy evaluator port, metrics, and the scriptable mock.
pub mod evaluator;

/// Grid search over a strategy's parameter space.
pub mod grid;

/// Market data types and the data-provider port.
pub mod market;

/// Request and event message contracts.
pub mod messages;

/// Monte Carlo validation over resampled paths.
pub mod montecarlo;

/// Close-price preprocessing.
pub mod preprocess;

/// Progress reporting cadence.
pub mod progress;

/// Bootstrap resampling of price paths.
pub mod resampler;

/// Monte Carlo outcome statistics.
pub mod stats;

/// Strategy parameter model.
pub mod strategy;

/// Bounded best-result tracking.
pub mod tracker;

/// Worker actor tasks.
pub mod worker;

pub use config::{McSettings, SimulationConfig};
pub use error::SimulationError;
pub use evaluator::{
    BacktestMetrics, ERROR_PROFIT_FACTOR, EvaluatorError, MetricsLease, StrategyEvaluator,
    mock::MockEvaluator,
};
pub use grid::{GridSearchEngine, GridSearchState};
pub use market::{Bar, MarketDataError, MarketDataPort, close_prices};
pub use messages::{McEvent, McRequest, OptimizationEvent, OptimizationRequest};
pub use montecarlo::{McRunOutput, MonteCarloValidator};
pub use preprocess::fractional_changes;
pub use progress::ReportCadence;
pub use resampler::PathResampler;
pub use stats::{FALLBACK_MAX_DRAWDOWN_PCT, McOutcome, McSummaryStats, summarize};
pub use strategy::{
    CostParams, OptimizationRanges, ParameterRange, StrategyKind, StrategyParams,
};
pub use tracker::{TopNTracker, TopResult};
pub use worker::{OptimizationWorker, ValidationWorker};
