//! Worker tasks hosting the engines behind request/event channels.
//!
//! Each worker is an actor: it owns its request receiver, runs until the
//! sender side closes, and reports everything — progress, results,
//! failures — as events on its outbound channel. A failed run never takes
//! the worker down; the next request starts fresh.
//!
//! The evaluator is initialized once per worker, before the first
//! evaluation, and the guard is concurrency-safe: a request arriving while
//! initialization is in flight awaits the same attempt.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::evaluator::{EvaluatorError, StrategyEvaluator};
use crate::grid::GridSearchEngine;
use crate::messages::{McEvent, McRequest, OptimizationEvent, OptimizationRequest};
use crate::montecarlo::MonteCarloValidator;

/// Actor task serving grid-search optimization requests.
pub struct OptimizationWorker {
    evaluator: Arc<dyn StrategyEvaluator>,
    config: SimulationConfig,
    requests: mpsc::Receiver<OptimizationRequest>,
    events: mpsc::Sender<OptimizationEvent>,
    init: OnceCell<()>,
}

impl OptimizationWorker {
    /// Worker reading requests from `requests` and reporting on `events`.
    #[must_use]
    pub fn new(
        evaluator: Arc<dyn StrategyEvaluator>,
        config: SimulationConfig,
        requests: mpsc::Receiver<OptimizationRequest>,
        events: mpsc::Sender<OptimizationEvent>,
    ) -> Self {
        Self {
            evaluator,
            config,
            requests,
            events,
            init: OnceCell::new(),
        }
    }

    /// Serve requests until the request channel closes.
    pub async fn run(mut self) {
        info!("optimization worker started");
        while let Some(request) = self.requests.recv().await {
            self.handle(request).await;
        }
        info!("optimization worker stopped");
    }

    async fn handle(&self, request: OptimizationRequest) {
        if let Err(err) = ensure_initialized(&self.init, &self.evaluator).await {
            error!(error = %err, "evaluator initialization failed");
            self.send(OptimizationEvent::Error {
                message: SimulationError::from(err).to_string(),
            })
            .await;
            return;
        }

        let OptimizationRequest::StartOptimization {
            historical_bars,
            strategy_kind,
            parameter_ranges,
            cost_params,
        } = request;

        let mut engine = GridSearchEngine::new(self.config);
        let outcome = engine
            .run(
                self.evaluator.as_ref(),
                &historical_bars,
                strategy_kind,
                &parameter_ranges,
                &cost_params,
                &self.events,
            )
            .await;

        match outcome {
            Ok(top_results) => {
                self.send(OptimizationEvent::Result { top_results }).await;
            }
            Err(err) => {
                error!(error = %err, "optimization run failed");
                self.send(OptimizationEvent::Error {
                    message: err.to_string(),
                })
                .await;
            }
        }
    }

    async fn send(&self, event: OptimizationEvent) {
        if self.events.send(event).await.is_err() {
            warn!("optimization event receiver dropped");
        }
    }
}

/// Actor task serving Monte Carlo validation requests.
pub struct ValidationWorker {
    evaluator: Arc<dyn StrategyEvaluator>,
    config: SimulationConfig,
    seed: Option<u64>,
    requests: mpsc::Receiver<McRequest>,
    events: mpsc::Sender<McEvent>,
    init: OnceCell<()>,
}

impl ValidationWorker {
    /// Worker reading requests from `requests` and reporting on `events`.
    #[must_use]
    pub fn new(
        evaluator: Arc<dyn StrategyEvaluator>,
        config: SimulationConfig,
        requests: mpsc::Receiver<McRequest>,
        events: mpsc::Sender<McEvent>,
    ) -> Self {
        Self {
            evaluator,
            config,
            seed: None,
            requests,
            events,
            init: OnceCell::new(),
        }
    }

    /// Seed the per-request resampler for reproducible runs.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Serve requests until the request channel closes.
    pub async fn run(mut self) {
        info!("validation worker started");
        while let Some(request) = self.requests.recv().await {
            self.handle(request).await;
        }
        info!("validation worker stopped");
    }

    async fn handle(&self, request: McRequest) {
        if let Err(err) = ensure_initialized(&self.init, &self.evaluator).await {
            error!(error = %err, "evaluator initialization failed");
            self.send(McEvent::McError {
                message: SimulationError::from(err).to_string(),
            })
            .await;
            return;
        }

        let McRequest::StartMcValidation {
            historical_bars,
            selected_parameter_set,
            strategy_kind,
            mc_settings,
            cost_params,
        } = request;

        if strategy_kind != selected_parameter_set.kind() {
            let err = SimulationError::UnsupportedStrategy {
                strategy: strategy_kind.to_string(),
            };
            error!(error = %err, "validation request rejected");
            self.send(McEvent::McError {
                message: err.to_string(),
            })
            .await;
            return;
        }

        let mut validator = match self.seed {
            Some(seed) => MonteCarloValidator::with_seed(self.config, seed),
            None => MonteCarloValidator::new(self.config),
        };
        let outcome = validator
            .run(
                self.evaluator.as_ref(),
                &historical_bars,
                &selected_parameter_set,
                mc_settings,
                &cost_params,
                &self.events,
            )
            .await;

        match outcome {
            Ok(output) => {
                self.send(McEvent::McResult {
                    all_pnls_pct: output.pnls_pct(),
                    all_max_drawdowns: output.max_drawdowns(),
                    summary_stats: output.summary,
                })
                .await;
            }
            Err(err) => {
                error!(error = %err, "validation run failed");
                self.send(McEvent::McError {
                    message: err.to_string(),
                })
                .await;
            }
        }
    }

    async fn send(&self, event: McEvent) {
        if self.events.send(event).await.is_err() {
            warn!("validation event receiver dropped");
        }
    }
}

/// Await the worker's one-time evaluator initialization.
///
/// Concurrent callers share a single attempt; once it succeeds, later calls
/// return immediately without touching the evaluator again.
async fn ensure_initialized(
    init: &OnceCell<()>,
    evaluator: &Arc<dyn StrategyEvaluator>,
) -> Result<(), EvaluatorError> {
    let evaluator = Arc::clone(evaluator);
    init.get_or_try_init(|| async move { evaluator.initialize().await })
        .await?;
    Ok(())
}
