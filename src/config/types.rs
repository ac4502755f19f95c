use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_duration;
use crate::error::ValidationError;

/// Attack settings read from `stress.toml` / `stress.json`.
///
/// Every key is optional; values given on the command line take precedence.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub targets: Option<String>,
    pub body: Option<String>,
    pub headers: Option<Vec<String>>,
    pub rate: Option<u64>,
    pub duration: Option<DurationValue>,
    pub concurrency: Option<u64>,
    pub number: Option<u64>,
    pub redirects: Option<usize>,
    pub timeout: Option<DurationValue>,
    pub laddr: Option<String>,
    pub seed: Option<u64>,
    pub output: Option<String>,
}

/// Either plain seconds (`10`) or a duration string (`"1500ms"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration(text),
        }
    }
}
