//! Exhaustive grid search over a strategy's parameter space.
//!
//! Enumeration is sequential and cooperative: one evaluator call per
//! combination, a progress event at the strategy's cadence, and a
//! `yield_now` after each emission so the surrounding task never starves
//! its runtime. Evaluator failures are fatal here; the sentinel "no valid
//! result" metrics are not, and simply leave the tracker untouched.

use tokio::sync::mpsc;
use tokio::task::yield_now;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::evaluator::StrategyEvaluator;
use crate::market::{Bar, close_prices};
use crate::messages::OptimizationEvent;
use crate::progress::ReportCadence;
use crate::strategy::{CostParams, OptimizationRanges, StrategyKind, StrategyParams};
use crate::tracker::{TopNTracker, TopResult};

/// Lifecycle of one grid search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridSearchState {
    /// No run started yet.
    #[default]
    Idle,
    /// Enumeration in progress.
    Enumerating,
    /// Last run finished and produced a result.
    Done,
    /// Last run aborted on a fatal error.
    Failed,
}

/// Sequential grid search engine.
///
/// Owns no collaborators; the evaluator and event channel are supplied per
/// run so one engine can serve successive requests.
#[derive(Debug)]
pub struct GridSearchEngine {
    config: SimulationConfig,
    state: GridSearchState,
}

impl GridSearchEngine {
    /// Engine with the given tunables.
    #[must_use]
    pub const fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            state: GridSearchState::Idle,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GridSearchState {
        self.state
    }

    /// Run one grid search to completion.
    ///
    /// Emits progress events on `events` while enumerating and returns the
    /// best results, descending by score. The returned list may hold fewer
    /// than `top_n` entries (or none) when most combinations produce the
    /// evaluator's sentinel result.
    ///
    /// # Errors
    ///
    /// [`SimulationError::UnsupportedStrategy`] when `kind` is unknown or
    /// does not match `ranges`; [`SimulationError::InsufficientData`] when
    /// `bars` is empty; [`SimulationError::Evaluator`] when any evaluation
    /// call fails (the run stops at the first failure).
    pub async fn run(
        &mut self,
        evaluator: &dyn StrategyEvaluator,
        bars: &[Bar],
        kind: StrategyKind,
        ranges: &OptimizationRanges,
        costs: &CostParams,
        events: &mpsc::Sender<OptimizationEvent>,
    ) -> Result<Vec<TopResult>, SimulationError> {
        self.state = GridSearchState::Enumerating;
        let result = self
            .enumerate(evaluator, bars, kind, ranges, costs, events)
            .await;
        self.state = if result.is_ok() {
            GridSearchState::Done
        } else {
            GridSearchState::Failed
        };
        result
    }

    async fn enumerate(
        &self,
        evaluator: &dyn StrategyEvaluator,
        bars: &[Bar],
        kind: StrategyKind,
        ranges: &OptimizationRanges,
        costs: &CostParams,
        events: &mpsc::Sender<OptimizationEvent>,
    ) -> Result<Vec<TopResult>, SimulationError> {
        if kind != ranges.kind() {
            return Err(SimulationError::UnsupportedStrategy {
                strategy: kind.to_string(),
            });
        }

        let closes = close_prices(bars);
        if closes.is_empty() {
            return Err(SimulationError::InsufficientData {
                message: "no historical bars provided".to_string(),
            });
        }

        let estimated = ranges.estimated_combinations();
        let (label, divisor) = match ranges {
            OptimizationRanges::SmaCross { .. } => ("SMA", ReportCadence::GRID_SMA_DIVISOR),
            OptimizationRanges::Rsi { .. } => ("RSI", ReportCadence::GRID_RSI_DIVISOR),
        };
        let cadence = ReportCadence::new(estimated, divisor);

        info!(
            strategy = %kind,
            estimated_combinations = estimated,
            bars = bars.len(),
            "starting grid search"
        );
        emit(
            events,
            OptimizationEvent::Progress {
                message: format!("Starting {label} Grid Search. Total combinations: ~{estimated}"),
                combinations_tested: None,
                estimated_total: Some(estimated),
                best_score_so_far: None,
            },
        )
        .await;

        let mut tracker = TopNTracker::new(self.config.top_n);
        let mut tested: u64 = 0;

        for params in combinations(ranges) {
            if !params.is_valid() {
                continue;
            }

            {
                let lease = evaluator.evaluate(&closes, &params, costs)?;
                tested += 1;
                if !lease.is_error() {
                    tracker.offer(TopResult::from_params(&params, lease.profit_factor, lease.trades));
                }
            }

            if cadence.is_due(tested) {
                let best = tracker.best_score();
                debug!(tested, best_score = ?best, "grid search progress");
                emit(
                    events,
                    OptimizationEvent::Progress {
                        message: format!(
                            "Tested {tested} / ~{estimated}. Best score: {}",
                            format_score(best)
                        ),
                        combinations_tested: Some(tested),
                        estimated_total: Some(estimated),
                        best_score_so_far: best,
                    },
                )
                .await;
                yield_now().await;
            }
        }

        let best = tracker.best_score();
        info!(tested, best_score = ?best, "grid search complete");
        emit(
            events,
            OptimizationEvent::Progress {
                message: format!("Grid search complete. Tested {tested} combinations."),
                combinations_tested: Some(tested),
                estimated_total: Some(estimated),
                best_score_so_far: best,
            },
        )
        .await;

        Ok(tracker.into_items())
    }
}

/// Enumerate every candidate parameter set, outer-to-inner.
///
/// SMA iterates `short` outer and `long` inner; invalid pairs are included
/// and filtered by the caller so the walk order is plain to read.
fn combinations(ranges: &OptimizationRanges) -> Vec<StrategyParams> {
    match ranges {
        OptimizationRanges::SmaCross {
            short_sma,
            long_sma,
        } => {
            let longs = long_sma.values();
            let mut out = Vec::new();
            for short in short_sma.values() {
                for long in &longs {
                    out.push(StrategyParams::SmaCross { short, long: *long });
                }
            }
            out
        }
        OptimizationRanges::Rsi {
            period,
            buy_level,
            sell_level,
        } => period
            .values()
            .into_iter()
            .map(|p| StrategyParams::Rsi {
                period: p,
                buy_level: *buy_level,
                sell_level: *sell_level,
            })
            .collect(),
    }
}

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "N/A".to_string(), |s| format!("{s:.2}"))
}

async fn emit(events: &mpsc::Sender<OptimizationEvent>, event: OptimizationEvent) {
    if events.send(event).await.is_err() {
        warn!("optimization event receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use crate::evaluator::{BacktestMetrics, mock::MockEvaluator};
    use crate::strategy::ParameterRange;

    use super::*;

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| Bar::new(i as i64 * 60_000, *c, *c, *c, *c, 1.0))
            .collect()
    }

    fn sma_ranges() -> OptimizationRanges {
        // shorts 5,10,15 x longs 10,20,30; 7 pairs satisfy short < long.
        OptimizationRanges::SmaCross {
            short_sma: ParameterRange::new(5.0, 15.0, 5.0),
            long_sma: ParameterRange::new(10.0, 30.0, 10.0),
        }
    }

    fn metrics(profit_factor: f64) -> BacktestMetrics {
        BacktestMetrics {
            profit_factor,
            trades: 4,
            total_profit: 400.0,
            total_loss: 200.0,
            max_drawdown_pct: 10.0,
        }
    }

    async fn drain(rx: &mut mpsc::Receiver<OptimizationEvent>) -> Vec<OptimizationEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn test_sma_run_skips_invalid_pairs() {
        let evaluator = MockEvaluator::returning(metrics(1.5));
        let mut engine = GridSearchEngine::new(SimulationConfig::default());
        let (tx, mut rx) = mpsc::channel(256);

        let results = engine
            .run(
                &evaluator,
                &bars(&[100.0, 101.0, 102.0]),
                StrategyKind::SmaCross,
                &sma_ranges(),
                &CostParams::default(),
                &tx,
            )
            .await
            .unwrap();

        assert_eq!(evaluator.call_count(), 7);
        assert!(
            evaluator
                .evaluated_params()
                .iter()
                .all(StrategyParams::is_valid)
        );
        assert_eq!(evaluator.release_count(), 7);
        // Capacity-bounded: 7 offered, 5 kept.
        assert_eq!(results.len(), 5);
        assert_eq!(engine.state(), GridSearchState::Done);

        let events = drain(&mut rx).await;
        assert!(matches!(
            events.last(),
            Some(OptimizationEvent::Progress {
                combinations_tested: Some(7),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_rsi_run_is_one_dimensional() {
        let evaluator = MockEvaluator::returning(metrics(2.0));
        let mut engine = GridSearchEngine::new(SimulationConfig::default());
        let (tx, _rx) = mpsc::channel(256);

        let ranges = OptimizationRanges::Rsi {
            period: ParameterRange::new(10.0, 20.0, 5.0),
            buy_level: 30.0,
            sell_level: 70.0,
        };
        let results = engine
            .run(
                &evaluator,
                &bars(&[100.0, 99.0, 101.0]),
                StrategyKind::Rsi,
                &ranges,
                &CostParams::default(),
                &tx,
            )
            .await
            .unwrap();

        assert_eq!(evaluator.call_count(), 3);
        assert!(evaluator.evaluated_params().iter().all(|p| matches!(
            p,
            StrategyParams::Rsi {
                buy_level: b,
                sell_level: s,
                ..
            } if *b == 30.0 && *s == 70.0
        )));
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_sentinel_results_are_skipped_not_fatal() {
        let evaluator = MockEvaluator::sentinel();
        let mut engine = GridSearchEngine::new(SimulationConfig::default());
        let (tx, _rx) = mpsc::channel(256);

        let results = engine
            .run(
                &evaluator,
                &bars(&[100.0, 101.0]),
                StrategyKind::SmaCross,
                &sma_ranges(),
                &CostParams::default(),
                &tx,
            )
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(engine.state(), GridSearchState::Done);
        // Sentinel leases still release.
        assert_eq!(evaluator.release_count(), evaluator.call_count());
    }

    #[tokio::test]
    async fn test_evaluator_failure_is_fatal() {
        let evaluator = MockEvaluator::failing_on_call(3, metrics(1.2));
        let mut engine = GridSearchEngine::new(SimulationConfig::default());
        let (tx, _rx) = mpsc::channel(256);

        let err = engine
            .run(
                &evaluator,
                &bars(&[100.0, 101.0]),
                StrategyKind::SmaCross,
                &sma_ranges(),
                &CostParams::default(),
                &tx,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SimulationError::Evaluator { .. }));
        assert_eq!(engine.state(), GridSearchState::Failed);
        assert_eq!(evaluator.call_count(), 3);
        // The two successful calls released their leases.
        assert_eq!(evaluator.release_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_strategy_fails_before_any_evaluation() {
        let evaluator = MockEvaluator::returning(metrics(1.0));
        let mut engine = GridSearchEngine::new(SimulationConfig::default());
        let (tx, _rx) = mpsc::channel(256);

        let err = engine
            .run(
                &evaluator,
                &bars(&[100.0, 101.0]),
                StrategyKind::Unknown,
                &sma_ranges(),
                &CostParams::default(),
                &tx,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SimulationError::UnsupportedStrategy { .. }));
        assert_eq!(evaluator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_bars_is_insufficient_data() {
        let evaluator = MockEvaluator::returning(metrics(1.0));
        let mut engine = GridSearchEngine::new(SimulationConfig::default());
        let (tx, _rx) = mpsc::channel(256);

        let err = engine
            .run(
                &evaluator,
                &[],
                StrategyKind::SmaCross,
                &sma_ranges(),
                &CostParams::default(),
                &tx,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SimulationError::InsufficientData { .. }));
    }

    #[tokio::test]
    async fn test_progress_counters_are_monotonic() {
        let evaluator = MockEvaluator::returning(metrics(1.5));
        let mut engine = GridSearchEngine::new(SimulationConfig::default());
        let (tx, mut rx) = mpsc::channel(256);

        let ranges = OptimizationRanges::Rsi {
            period: ParameterRange::new(1.0, 40.0, 1.0),
            buy_level: 30.0,
            sell_level: 70.0,
        };
        engine
            .run(
                &evaluator,
                &bars(&[100.0, 101.0]),
                StrategyKind::Rsi,
                &ranges,
                &CostParams::default(),
                &tx,
            )
            .await
            .unwrap();

        let counters: Vec<u64> = drain(&mut rx)
            .await
            .iter()
            .filter_map(|e| match e {
                OptimizationEvent::Progress {
                    combinations_tested, ..
                } => *combinations_tested,
                _ => None,
            })
            .collect();

        assert!(!counters.is_empty());
        assert!(counters.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*counters.last().unwrap(), 40);
    }
}
