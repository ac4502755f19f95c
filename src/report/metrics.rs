use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use hdrhistogram::Histogram;
use serde::Serialize;

use crate::error::{AppError, AppResult, ReportError};
use crate::results::{Results, latency_nanos};

const SIGNIFICANT_DIGITS: u8 = 3;
const PERCENT_SCALE: u128 = 10_000;
/// Requests per nanosecond to requests per second, scaled by 100.
const RATE_SCALE: u128 = 100_000_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencyMetrics {
    #[serde(with = "latency_nanos")]
    pub mean: Duration,
    #[serde(with = "latency_nanos")]
    pub p50: Duration,
    #[serde(with = "latency_nanos")]
    pub p95: Duration,
    #[serde(with = "latency_nanos")]
    pub p99: Duration,
    #[serde(with = "latency_nanos")]
    pub max: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ByteMetrics {
    pub total: u64,
    pub mean: u64,
}

/// Aggregated view of a result set.
///
/// Ratios are kept as integers scaled by 100 so `rate_x100 == 1234` reads
/// as 12.34 requests per second.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub requests: u64,
    /// Time between the first and the last attempt.
    #[serde(with = "latency_nanos")]
    pub duration: Duration,
    pub rate_x100: u64,
    pub latencies: LatencyMetrics,
    pub bytes_in: ByteMetrics,
    pub bytes_out: ByteMetrics,
    /// Percentage of 2xx responses, scaled by 100.
    pub success_x100: u64,
    pub status_codes: BTreeMap<u16, u64>,
    /// Distinct error messages, sorted.
    pub errors: Vec<String>,
}

impl Metrics {
    /// Aggregates `results`, which are expected to be sorted by timestamp.
    ///
    /// An empty set yields zeroed metrics.
    ///
    /// # Errors
    ///
    /// Returns an error when the latency histogram cannot be built.
    pub fn compute(results: &Results) -> AppResult<Self> {
        let (Some(first), Some(last)) = (results.first(), results.last()) else {
            return Ok(Self::default());
        };

        let mut histogram =
            Histogram::<u64>::new(SIGNIFICANT_DIGITS).map_err(|err| histogram_error("create", err))?;
        let mut latency_total: u128 = 0;
        let mut latency_max = Duration::ZERO;
        let mut bytes_in: u64 = 0;
        let mut bytes_out: u64 = 0;
        let mut successes: u64 = 0;
        let mut status_codes: BTreeMap<u16, u64> = BTreeMap::new();
        let mut errors = BTreeSet::new();

        for result in results {
            let nanos = duration_nanos(result.latency);
            histogram
                .record(nanos)
                .map_err(|err| histogram_error("record", err))?;
            latency_total = latency_total.saturating_add(u128::from(nanos));
            latency_max = latency_max.max(result.latency);
            bytes_in = bytes_in.saturating_add(result.bytes_in);
            bytes_out = bytes_out.saturating_add(result.bytes_out);
            if result.is_success() {
                successes = successes.saturating_add(1);
            }
            let count = status_codes.entry(result.code).or_default();
            *count = count.saturating_add(1);
            if !result.error.is_empty() {
                errors.insert(result.error.as_str());
            }
        }

        let requests = u64::try_from(results.len()).unwrap_or(u64::MAX);
        let duration = last
            .timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .unwrap_or(Duration::ZERO);
        let quantile = |q: f64| Duration::from_nanos(histogram.value_at_quantile(q)).min(latency_max);

        Ok(Self {
            requests,
            duration,
            rate_x100: scaled_ratio(u128::from(requests), RATE_SCALE, duration.as_nanos()),
            latencies: LatencyMetrics {
                mean: Duration::from_nanos(mean(latency_total, requests)),
                p50: quantile(0.5),
                p95: quantile(0.95),
                p99: quantile(0.99),
                max: latency_max,
            },
            bytes_in: ByteMetrics {
                total: bytes_in,
                mean: mean(u128::from(bytes_in), requests),
            },
            bytes_out: ByteMetrics {
                total: bytes_out,
                mean: mean(u128::from(bytes_out), requests),
            },
            success_x100: scaled_ratio(u128::from(successes), PERCENT_SCALE, u128::from(requests)),
            status_codes,
            errors: errors.into_iter().map(str::to_owned).collect(),
        })
    }
}

fn duration_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

fn mean(total: u128, count: u64) -> u64 {
    let value = total.checked_div(u128::from(count)).unwrap_or(0);
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn scaled_ratio(numerator: u128, scale: u128, denominator: u128) -> u64 {
    let value = numerator
        .saturating_mul(scale)
        .checked_div(denominator)
        .unwrap_or(0);
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn histogram_error<E>(context: &'static str, err: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::report(ReportError::Histogram {
        context,
        source: Box::new(err),
    })
}
