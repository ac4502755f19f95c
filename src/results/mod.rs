//! Per-attempt outcomes and their ordered, serializable collection.

use std::io::{Read, Write};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ResultsError};

/// Code recorded when the response body failed content validation.
pub const VALIDATION_FAILED_CODE: u16 = 250;

/// Outcome of a single attempt.
///
/// `code` is zero when no response was received. Latency covers dispatch to
/// the end of the body read and stays zero when either failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttackResult {
    pub code: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(with = "latency_nanos")]
    pub latency: Duration,
    pub bytes_out: u64,
    pub bytes_in: u64,
    pub error: String,
}

impl AttackResult {
    /// Empty result stamped at `timestamp`.
    #[must_use]
    pub const fn started_at(timestamp: DateTime<Utc>) -> Self {
        Self {
            code: 0,
            timestamp,
            latency: Duration::ZERO,
            bytes_out: 0,
            bytes_in: 0,
            error: String::new(),
        }
    }

    /// 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// No response, a non-2xx status, or failed validation.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.code >= VALIDATION_FAILED_CODE || self.code < 200
    }
}

/// Results ordered by timestamp once [`Results::sort`] has run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Results(Vec<AttackResult>);

impl Results {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, result: AttackResult) {
        self.0.push(result);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttackResult> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[AttackResult] {
        &self.0
    }

    #[must_use]
    pub fn first(&self) -> Option<&AttackResult> {
        self.0.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&AttackResult> {
        self.0.last()
    }

    /// Stable sort by ascending timestamp.
    pub fn sort(&mut self) -> &mut Self {
        self.0.sort_by(|left, right| left.timestamp.cmp(&right.timestamp));
        self
    }

    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }

    /// Writes the results as one JSON array followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn encode<W: Write>(&self, mut out: W) -> AppResult<()> {
        serde_json::to_writer(&mut out, self)
            .map_err(|err| AppError::results(ResultsError::Encode { source: err }))?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    /// Reads one JSON array of results.
    ///
    /// The order of the input is kept; call [`Results::sort`] after merging.
    ///
    /// # Errors
    ///
    /// Returns an error when the input is not a valid result array.
    pub fn decode<R: Read>(input: R) -> AppResult<Self> {
        serde_json::from_reader(input)
            .map_err(|err| AppError::results(ResultsError::Decode { source: err }))
    }
}

impl From<Vec<AttackResult>> for Results {
    fn from(results: Vec<AttackResult>) -> Self {
        Self(results)
    }
}

impl FromIterator<AttackResult> for Results {
    fn from_iter<I: IntoIterator<Item = AttackResult>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<AttackResult> for Results {
    fn extend<I: IntoIterator<Item = AttackResult>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Results {
    type Item = AttackResult;
    type IntoIter = std::vec::IntoIter<AttackResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'results> IntoIterator for &'results Results {
    type Item = &'results AttackResult;
    type IntoIter = std::slice::Iter<'results, AttackResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Serializes a `Duration` as integer nanoseconds.
pub(crate) mod latency_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        latency: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
