//! Summary statistics over Monte Carlo outcomes.

use serde::{Deserialize, Serialize};

/// Drawdown recorded for an iteration the evaluator could not score.
///
/// Fallback outcomes keep per-iteration counts aligned; the summary filters
/// them out of the drawdown distribution so failures do not distort it.
pub const FALLBACK_MAX_DRAWDOWN_PCT: f64 = 100.0;

/// One Monte Carlo iteration's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McOutcome {
    /// Net profit of the iteration as a percent of starting equity.
    pub profit_loss_pct: f64,
    /// Maximum drawdown of the iteration, as a percentage.
    pub max_drawdown_pct: f64,
}

impl McOutcome {
    /// The conservative outcome recorded for a failed or skipped iteration.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            profit_loss_pct: 0.0,
            max_drawdown_pct: FALLBACK_MAX_DRAWDOWN_PCT,
        }
    }
}

/// Descriptive statistics over a Monte Carlo run.
///
/// Optional fields are absent (not zero) when the underlying collection was
/// empty, distinguishing "no data" from a computed statistic of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct McSummaryStats {
    /// Iterations requested for the run.
    pub num_iterations: u32,
    /// Synthetic bars per simulated path.
    pub num_bars_per_sim: u32,
    /// Mean profit/loss percent.
    #[serde(rename = "averagePLPct", skip_serializing_if = "Option::is_none")]
    pub average_pl_pct: Option<f64>,
    /// Upper median profit/loss percent (ascending index `floor(n/2)`).
    #[serde(rename = "medianPLPct", skip_serializing_if = "Option::is_none")]
    pub median_pl_pct: Option<f64>,
    /// 5th-percentile profit/loss percent.
    #[serde(rename = "pnl05PercentilePct", skip_serializing_if = "Option::is_none")]
    pub pnl_05_percentile_pct: Option<f64>,
    /// 10th-percentile profit/loss percent.
    #[serde(rename = "pnl10PercentilePct", skip_serializing_if = "Option::is_none")]
    pub pnl_10_percentile_pct: Option<f64>,
    /// Mean maximum drawdown over non-fallback iterations.
    #[serde(rename = "averageMaxDD", skip_serializing_if = "Option::is_none")]
    pub average_max_dd: Option<f64>,
    /// Median maximum drawdown over non-fallback iterations.
    #[serde(rename = "medianMaxDD", skip_serializing_if = "Option::is_none")]
    pub median_max_dd: Option<f64>,
    /// 95th-percentile maximum drawdown over non-fallback iterations.
    #[serde(rename = "maxDD95Percentile", skip_serializing_if = "Option::is_none")]
    pub max_dd_95_percentile: Option<f64>,
}

/// Value at ascending index `floor(len * fraction)` of a sorted slice.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let idx = (sorted.len() as f64 * fraction).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Reduce a run's outcomes to summary statistics.
///
/// The median is the "upper median": the value at ascending index
/// `floor(n/2)`, not an average of the middle pair. Drawdown statistics are
/// computed only over outcomes below [`FALLBACK_MAX_DRAWDOWN_PCT`]; when
/// every outcome is a fallback they all collapse to that value.
#[must_use]
pub fn summarize(num_iterations: u32, num_bars_per_sim: u32, outcomes: &[McOutcome]) -> McSummaryStats {
    let mut stats = McSummaryStats {
        num_iterations,
        num_bars_per_sim,
        ..Default::default()
    };

    if outcomes.is_empty() {
        return stats;
    }

    let pnls: Vec<f64> = outcomes.iter().map(|o| o.profit_loss_pct).collect();
    let mut sorted_pnls = pnls.clone();
    sorted_pnls.sort_by(f64::total_cmp);

    stats.average_pl_pct = Some(mean(&pnls));
    stats.median_pl_pct = Some(sorted_pnls[sorted_pnls.len() / 2]);
    stats.pnl_05_percentile_pct = Some(percentile(&sorted_pnls, 0.05));
    stats.pnl_10_percentile_pct = Some(percentile(&sorted_pnls, 0.10));

    let valid_dds: Vec<f64> = outcomes
        .iter()
        .map(|o| o.max_drawdown_pct)
        .filter(|dd| *dd < FALLBACK_MAX_DRAWDOWN_PCT)
        .collect();

    if valid_dds.is_empty() {
        stats.average_max_dd = Some(FALLBACK_MAX_DRAWDOWN_PCT);
        stats.median_max_dd = Some(FALLBACK_MAX_DRAWDOWN_PCT);
        stats.max_dd_95_percentile = Some(FALLBACK_MAX_DRAWDOWN_PCT);
    } else {
        let mut sorted_dds = valid_dds.clone();
        sorted_dds.sort_by(f64::total_cmp);
        stats.average_max_dd = Some(mean(&valid_dds));
        stats.median_max_dd = Some(sorted_dds[sorted_dds.len() / 2]);
        stats.max_dd_95_percentile = Some(percentile(&sorted_dds, 0.95));
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(pl: f64, dd: f64) -> McOutcome {
        McOutcome {
            profit_loss_pct: pl,
            max_drawdown_pct: dd,
        }
    }

    #[test]
    fn test_empty_outcomes_leave_fields_unset() {
        let stats = summarize(100, 500, &[]);
        assert_eq!(stats.num_iterations, 100);
        assert_eq!(stats.num_bars_per_sim, 500);
        assert!(stats.average_pl_pct.is_none());
        assert!(stats.median_pl_pct.is_none());
        assert!(stats.average_max_dd.is_none());
        assert!(stats.max_dd_95_percentile.is_none());
    }

    #[test]
    fn test_upper_median_for_even_count() {
        let outcomes: Vec<McOutcome> =
            [1.0, 2.0, 3.0, 4.0].iter().map(|pl| outcome(*pl, 10.0)).collect();
        let stats = summarize(4, 100, &outcomes);
        // floor(4 / 2) = index 2 of [1, 2, 3, 4], not the averaged 2.5.
        assert_eq!(stats.median_pl_pct, Some(3.0));
    }

    #[test]
    fn test_percentile_indices() {
        let outcomes: Vec<McOutcome> = (0..100).map(|i| outcome(f64::from(i), 10.0)).collect();
        let stats = summarize(100, 100, &outcomes);
        assert_eq!(stats.pnl_05_percentile_pct, Some(5.0));
        assert_eq!(stats.pnl_10_percentile_pct, Some(10.0));
        assert_eq!(stats.median_pl_pct, Some(50.0));
        assert_eq!(stats.average_pl_pct, Some(49.5));
    }

    #[test]
    fn test_drawdown_filter_excludes_fallbacks() {
        let outcomes = vec![
            outcome(1.0, 10.0),
            outcome(0.0, FALLBACK_MAX_DRAWDOWN_PCT),
            outcome(2.0, 20.0),
            outcome(0.0, FALLBACK_MAX_DRAWDOWN_PCT),
        ];
        let stats = summarize(4, 100, &outcomes);
        assert_eq!(stats.average_max_dd, Some(15.0));
        assert_eq!(stats.median_max_dd, Some(20.0));
    }

    #[test]
    fn test_all_fallbacks_collapse_to_sentinel() {
        let outcomes = vec![McOutcome::fallback(); 10];
        let stats = summarize(10, 100, &outcomes);
        assert_eq!(stats.average_max_dd, Some(100.0));
        assert_eq!(stats.median_max_dd, Some(100.0));
        assert_eq!(stats.max_dd_95_percentile, Some(100.0));
        assert_eq!(stats.average_pl_pct, Some(0.0));
    }

    #[test]
    fn test_wire_field_names() {
        let stats = summarize(2, 10, &[outcome(1.0, 5.0), outcome(-1.0, 6.0)]);
        let json = serde_json::to_value(stats).unwrap();
        assert!(json.get("averagePLPct").is_some());
        assert!(json.get("medianPLPct").is_some());
        assert!(json.get("pnl05PercentilePct").is_some());
        assert!(json.get("pnl10PercentilePct").is_some());
        assert!(json.get("averageMaxDD").is_some());
        assert!(json.get("maxDD95Percentile").is_some());
        assert_eq!(json["numIterations"], 2);
        assert_eq!(json["numBarsPerSim"], 10);
    }

    #[test]
    fn test_unset_fields_not_serialized() {
        let json = serde_json::to_value(summarize(0, 0, &[])).unwrap();
        assert!(json.get("averagePLPct").is_none());
        assert!(json.get("medianMaxDD").is_none());
    }
}
