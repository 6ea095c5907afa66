//! Progress cadence for long-running loops.

/// Decides when a loop should emit a progress notification.
///
/// A report is due every `floor(total / divisor) + 1` completions and always
/// once the completion count reaches the (estimated) total. The `+ 1` keeps
/// the interval positive for small totals.
#[derive(Debug, Clone, Copy)]
pub struct ReportCadence {
    interval: u64,
    total: u64,
}

impl ReportCadence {
    /// Cadence used by the SMA grid search (~every 2% of combinations).
    pub const GRID_SMA_DIVISOR: u64 = 50;
    /// Cadence used by the RSI grid search (~every 5% of combinations).
    pub const GRID_RSI_DIVISOR: u64 = 20;
    /// Cadence used by Monte Carlo validation (~every 10% of iterations).
    pub const MONTE_CARLO_DIVISOR: u64 = 10;

    /// Cadence for a loop of `total` steps reporting about `divisor` times.
    #[must_use]
    pub const fn new(total: u64, divisor: u64) -> Self {
        Self {
            interval: total / divisor + 1,
            total,
        }
    }

    /// Whether a report is due after `completed` steps.
    #[must_use]
    pub const fn is_due(&self, completed: u64) -> bool {
        if completed == 0 {
            return false;
        }
        completed % self.interval == 0 || completed >= self.total
    }
}
