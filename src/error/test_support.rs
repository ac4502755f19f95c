use super::{ResultsError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ResultsError {
    fn from(message: &'static str) -> Self {
        ResultsError::TestExpectation { message }
    }
}

impl From<String> for ResultsError {
    fn from(value: String) -> Self {
        ResultsError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
