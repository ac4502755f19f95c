use std::fmt::Write as _;
use std::time::Duration;

use crate::error::{AppError, AppResult, ReportError};

use super::Metrics;

pub(super) fn render(metrics: &Metrics) -> AppResult<Vec<u8>> {
    let mut output = String::new();
    let latencies = &metrics.latencies;

    write_row(
        &mut output,
        "Requests",
        "[total, rate]",
        &format!("{}, {}", metrics.requests, format_x100(metrics.rate_x100)),
    )?;
    write_row(
        &mut output,
        "Duration",
        "[total]",
        &format_duration(metrics.duration),
    )?;
    write_row(
        &mut output,
        "Latencies",
        "[mean, 50, 95, 99, max]",
        &[
            latencies.mean,
            latencies.p50,
            latencies.p95,
            latencies.p99,
            latencies.max,
        ]
        .map(format_duration)
        .join(", "),
    )?;
    write_row(
        &mut output,
        "Bytes In",
        "[total, mean]",
        &format!("{}, {}", metrics.bytes_in.total, metrics.bytes_in.mean),
    )?;
    write_row(
        &mut output,
        "Bytes Out",
        "[total, mean]",
        &format!("{}, {}", metrics.bytes_out.total, metrics.bytes_out.mean),
    )?;
    write_row(
        &mut output,
        "Success",
        "[ratio]",
        &format!("{}%", format_x100(metrics.success_x100)),
    )?;
    let codes: Vec<String> = metrics
        .status_codes
        .iter()
        .map(|(code, count)| format!("{}:{}", code, count))
        .collect();
    write_row(&mut output, "Status Codes", "[code:count]", &codes.join("  "))?;

    write_line(&mut output, "Error Set:")?;
    for error in &metrics.errors {
        write_line(&mut output, error)?;
    }
    Ok(output.into_bytes())
}

fn write_row(output: &mut String, label: &str, columns: &str, values: &str) -> AppResult<()> {
    writeln!(output, "{:<14}{:<25}{}", label, columns, values)
        .map_err(|err| AppError::report(ReportError::WriteLine { source: err }))
}

fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::report(ReportError::WriteLine { source: err }))
}

fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

fn format_duration(duration: Duration) -> String {
    format!("{:?}", duration)
}
