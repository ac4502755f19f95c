use crate::error::{AppError, AppResult, ReportError};

use super::Metrics;

pub(super) fn render(metrics: &Metrics) -> AppResult<Vec<u8>> {
    let mut output = serde_json::to_vec_pretty(metrics)
        .map_err(|err| AppError::report(ReportError::Serialize { source: err }))?;
    output.push(b'\n');
    Ok(output)
}
