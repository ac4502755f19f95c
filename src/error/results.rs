use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("Failed to decode results: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode results: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
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
