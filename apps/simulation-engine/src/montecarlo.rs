//! Bootstrap Monte Carlo validation of a chosen parameter set.
//!
//! Each iteration resamples a synthetic price path from the historical
//! fractional changes and backtests the candidate parameters against it.
//! Unlike the grid search, a failed evaluation here is recoverable: the
//! iteration records the conservative fallback outcome and the run
//! continues, so one bad path cannot void an entire validation.

use tokio::sync::mpsc;
use tokio::task::yield_now;
use tracing::{debug, info, warn};

use rand::Rng;
use rand::rngs::StdRng;

use crate::config::{McSettings, SimulationConfig};
use crate::error::SimulationError;
use crate::evaluator::StrategyEvaluator;
use crate::market::{Bar, close_prices};
use crate::messages::McEvent;
use crate::preprocess::fractional_changes;
use crate::progress::ReportCadence;
use crate::resampler::PathResampler;
use crate::stats::{McOutcome, McSummaryStats, summarize};
use crate::strategy::{CostParams, StrategyParams};

/// Everything one validation run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct McRunOutput {
    /// Per-iteration outcomes, in iteration order.
    pub outcomes: Vec<McOutcome>,
    /// Summary statistics over the outcomes.
    pub summary: McSummaryStats,
}

impl McRunOutput {
    /// Profit/loss percent per iteration.
    #[must_use]
    pub fn pnls_pct(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.profit_loss_pct).collect()
    }

    /// Maximum drawdown percent per iteration.
    #[must_use]
    pub fn max_drawdowns(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.max_drawdown_pct).collect()
    }
}

/// Monte Carlo validator over bootstrap-resampled paths.
#[derive(Debug)]
pub struct MonteCarloValidator<R = StdRng> {
    config: SimulationConfig,
    resampler: PathResampler<R>,
}

impl MonteCarloValidator<StdRng> {
    /// Validator with an OS-seeded resampler.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            resampler: PathResampler::new(),
        }
    }

    /// Validator with a fixed seed for reproducible runs.
    #[must_use]
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self {
            config,
            resampler: PathResampler::with_seed(seed),
        }
    }
}

impl<R: Rng> MonteCarloValidator<R> {
    /// Validator over a caller-supplied resampler.
    #[must_use]
    pub fn from_resampler(config: SimulationConfig, resampler: PathResampler<R>) -> Self {
        Self { config, resampler }
    }

    /// Run one validation to completion.
    ///
    /// Emits progress events on `events` at roughly every tenth of the
    /// iteration count. The output always holds exactly
    /// `settings.iterations` outcomes; iterations the evaluator could not
    /// score carry the fallback outcome.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InsufficientData`] when `bars` yields fewer than
    /// two close prices; per-iteration evaluator failures are not errors.
    pub async fn run(
        &mut self,
        evaluator: &dyn StrategyEvaluator,
        bars: &[Bar],
        params: &StrategyParams,
        settings: McSettings,
        costs: &CostParams,
        events: &mpsc::Sender<McEvent>,
    ) -> Result<McRunOutput, SimulationError> {
        let closes = close_prices(bars);
        let changes = fractional_changes(&closes)?;
        let start = start_price(&closes, self.config.fallback_start_price);

        let iterations = settings.iterations;
        let cadence = ReportCadence::new(u64::from(iterations), ReportCadence::MONTE_CARLO_DIVISOR);

        info!(
            strategy = %params.kind(),
            iterations,
            bars_per_sim = settings.bars_per_sim,
            start_price = start,
            "starting Monte Carlo validation"
        );
        emit(
            events,
            McEvent::McProgress {
                message: format!("Starting {iterations} Monte Carlo iterations"),
            },
        )
        .await;

        let mut outcomes = Vec::with_capacity(iterations as usize);
        for i in 1..=u64::from(iterations) {
            let path = self
                .resampler
                .generate(&changes, settings.bars_per_sim, start);

            let outcome = match evaluator.evaluate(&path, params, costs) {
                Ok(lease) if !lease.is_error() => McOutcome {
                    profit_loss_pct: (lease.total_profit - lease.total_loss)
                        / self.config.start_equity
                        * 100.0,
                    max_drawdown_pct: lease.max_drawdown_pct,
                },
                Ok(_) => McOutcome::fallback(),
                Err(err) => {
                    warn!(iteration = i, error = %err, "iteration failed, recording fallback");
                    McOutcome::fallback()
                }
            };
            outcomes.push(outcome);

            if cadence.is_due(i) {
                debug!(completed = i, iterations, "Monte Carlo progress");
                emit(
                    events,
                    McEvent::McProgress {
                        message: format!("Completed {i} / {iterations} iterations"),
                    },
                )
                .await;
                yield_now().await;
            }
        }

        let summary = summarize(iterations, settings.bars_per_sim, &outcomes);
        info!(
            iterations,
            average_pl_pct = ?summary.average_pl_pct,
            "Monte Carlo validation complete"
        );
        Ok(McRunOutput { outcomes, summary })
    }
}

/// Start price for synthetic paths: the last close, unless it is missing or
/// zero, in which case the configured fallback applies.
fn start_price(closes: &[f64], fallback: f64) -> f64 {
    match closes.last() {
        Some(last) if *last != 0.0 => *last,
        _ => fallback,
    }
}

async fn emit(events: &mpsc::Sender<McEvent>, event: McEvent) {
    if events.send(event).await.is_err() {
        warn!("validation event receiver dropped");
    }
}
