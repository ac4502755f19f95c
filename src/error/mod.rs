mod app;
mod config;
mod http;
mod report;
mod results;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use report::ReportError;
pub use results::ResultsError;
pub use validation::ValidationError;
