//! Scriptable evaluator for tests and host development.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::strategy::{CostParams, StrategyParams};

use super::{BacktestMetrics, EvaluatorError, MetricsLease, StrategyEvaluator};

/// What the mock does on each `evaluate` call.
#[derive(Debug, Clone)]
enum Behavior {
    /// Return the same metrics every time.
    Fixed(BacktestMetrics),
    /// Return the error-sentinel metrics every time.
    Sentinel,
    /// Fail every call with the given message.
    Failing(String),
    /// Fail the nth call (1-based), succeed otherwise.
    FailOnCall(usize, BacktestMetrics),
}

/// In-memory [`StrategyEvaluator`] with scripted behavior and call recording.
///
/// Records every parameter set it is asked to evaluate and counts releases
/// and initializations, so tests can assert the engine's iteration, skip,
/// and scoped-release discipline.
#[derive(Debug)]
pub struct MockEvaluator {
    behavior: Behavior,
    calls: Mutex<Vec<StrategyParams>>,
    releases: AtomicUsize,
    initializations: AtomicUsize,
}

impl MockEvaluator {
    /// Mock returning `metrics` on every call.
    #[must_use]
    pub fn returning(metrics: BacktestMetrics) -> Self {
        Self::with_behavior(Behavior::Fixed(metrics))
    }

    /// Mock returning the error sentinel on every call.
    #[must_use]
    pub fn sentinel() -> Self {
        Self::with_behavior(Behavior::Sentinel)
    }

    /// Mock failing every call with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Failing(message.into()))
    }

    /// Mock failing only the `call` -th evaluation (1-based), returning
    /// `metrics` on the others.
    #[must_use]
    pub fn failing_on_call(call: usize, metrics: BacktestMetrics) -> Self {
        Self::with_behavior(Behavior::FailOnCall(call, metrics))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            releases: AtomicUsize::new(0),
            initializations: AtomicUsize::new(0),
        }
    }

    /// Every parameter set evaluated so far, in call order.
    #[must_use]
    pub fn evaluated_params(&self) -> Vec<StrategyParams> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of `evaluate` calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Number of results released so far.
    #[must_use]
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Number of `initialize` calls so far.
    #[must_use]
    pub fn initialization_count(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StrategyEvaluator for MockEvaluator {
    async fn initialize(&self) -> Result<(), EvaluatorError> {
        self.initializations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn evaluate<'a>(
        &'a self,
        _close_prices: &[f64],
        params: &StrategyParams,
        _costs: &CostParams,
    ) -> Result<MetricsLease<'a>, EvaluatorError> {
        let call_index = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|_| EvaluatorError::EvaluationFailed {
                    message: "mock call log poisoned".to_string(),
                })?;
            calls.push(*params);
            calls.len()
        };

        let metrics = match &self.behavior {
            Behavior::Fixed(metrics) => *metrics,
            Behavior::Sentinel => BacktestMetrics::error(),
            Behavior::Failing(message) => {
                return Err(EvaluatorError::EvaluationFailed {
                    message: message.clone(),
                });
            }
            Behavior::FailOnCall(call, metrics) => {
                if call_index == *call {
                    return Err(EvaluatorError::EvaluationFailed {
                        message: format!("scripted failure on call {call}"),
                    });
                }
                *metrics
            }
        };

        Ok(MetricsLease::new(metrics, self))
    }

    fn release(&self, _metrics: &BacktestMetrics) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
