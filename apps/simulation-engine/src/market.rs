//! Market data types and the data-provider port.
//!
//! The engine consumes historical bars supplied by the host; it never fetches
//! data itself. [`MarketDataPort`] is the driven port a host implements on
//! top of its provider (exchange REST API, cache, fixture file). The engine
//! assumes bars are chronologically ordered and makes no attempt to detect
//! or repair gaps.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One OHLCV candlestick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Interval open time in epoch milliseconds.
    pub timestamp: i64,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Traded volume over the interval.
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    #[must_use]
    pub const fn new(
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Extract the close-price series from a bar sequence.
#[must_use]
pub fn close_prices(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Market data error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketDataError {
    /// Connection error.
    #[error("market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Symbol not found.
    #[error("symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Provider API error.
    #[error("market data API error: {message}")]
    ApiError {
        /// Error details.
        message: String,
    },
}

/// Port for fetching historical bars from an external provider.
///
/// This is a driven (secondary/outbound) port. The host provides the
/// implementation; the engine only defines the contract it relies on:
/// an ordered, gap-tolerant sequence of bars for a symbol and interval.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Fetch up to `limit` bars for `symbol` at `interval`.
    ///
    /// `time_range` is an optional `(start, end)` pair in epoch milliseconds.
    /// Returned bars must be chronologically ordered with no duplicate
    /// timestamps.
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
        time_range: Option<(i64, i64)>,
    ) -> Result<Vec<Bar>, MarketDataError>;
}
