//! Reporters turning a timestamp-sorted result set into bytes.
mod json;
mod metrics;
mod plot;
mod text;


use clap::ValueEnum;

use crate::error::AppResult;
use crate::results::Results;

pub use metrics::{ByteMetrics, LatencyMetrics, Metrics};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Reporter {
    /// Aligned human-readable summary.
    #[default]
    Text,
    /// Aggregated metrics as a JSON object.
    Json,
    /// SVG scatter plot of latency over time.
    Plot,
}

impl Reporter {
    /// Renders `results`, which are expected to be sorted by timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error when aggregation, serialization or plotting fails.
    pub fn render(self, results: &Results) -> AppResult<Vec<u8>> {
        match self {
            Self::Text => text::render(&Metrics::compute(results)?),
            Self::Json => json::render(&Metrics::compute(results)?),
            Self::Plot => plot::render(results),
        }
    }
}
