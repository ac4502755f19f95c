use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid request format: `{line}`")]
    InvalidTargetFormat { line: String },
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Rate must be > 0.")]
    ZeroRate,
    #[error("Concurrency must be > 0.")]
    ZeroConcurrency,
    #[error("Target set is empty.")]
    EmptyTargets,
    #[error("Invalid local address '{value}': {source}")]
    InvalidLocalAddress {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("`--concurrency` requires `--number` (and the other way around).")]
    ConcurrencyRequiresNumber,
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
