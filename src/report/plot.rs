use std::fmt::Display;

use plotters::prelude::*;

use crate::error::{AppError, AppResult, ReportError};
use crate::results::Results;

const PLOT_SIZE: (u32, u32) = (1280, 640);
const MIN_AXIS_SPAN: u64 = 1;

pub(super) fn render(results: &Results) -> AppResult<Vec<u8>> {
    let start = results.first().map(|result| result.timestamp);
    let mut ok_points: Vec<(u64, u64)> = Vec::with_capacity(results.len());
    let mut failed_points: Vec<(u64, u64)> = Vec::new();
    for result in results {
        let elapsed_ms = start
            .and_then(|start| result.timestamp.signed_duration_since(start).to_std().ok())
            .map_or(0, |elapsed| millis(elapsed.as_millis()));
        let point = (elapsed_ms, millis(result.latency.as_millis()));
        if result.is_failure() {
            failed_points.push(point);
        } else {
            ok_points.push(point);
        }
    }

    let x_max = axis_max(ok_points.iter().chain(&failed_points).map(|(x, _)| *x));
    let y_max = axis_max(ok_points.iter().chain(&failed_points).map(|(_, y)| *y));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PLOT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Latency over time", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0u64..x_max, 0u64..y_max)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .x_desc("Elapsed (ms)")
            .y_desc("Latency (ms)")
            .draw()
            .map_err(plot_error)?;

        chart
            .draw_series(
                ok_points
                    .iter()
                    .map(|point| Circle::new(*point, 2, GREEN.filled())),
            )
            .map_err(plot_error)?
            .label("OK")
            .legend(|(x, y)| Circle::new((x, y), 3, GREEN.filled()));
        chart
            .draw_series(failed_points.iter().map(|point| Cross::new(*point, 3, RED)))
            .map_err(plot_error)?
            .label("Error")
            .legend(|(x, y)| Cross::new((x, y), 3, RED));

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(plot_error)?;

        root.present().map_err(plot_error)?;
    }
    Ok(svg.into_bytes())
}

fn millis(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn axis_max(values: impl Iterator<Item = u64>) -> u64 {
    values.max().unwrap_or(0).saturating_add(MIN_AXIS_SPAN)
}

fn plot_error<E: Display>(err: E) -> AppError {
    AppError::report(ReportError::Plot {
        message: err.to_string(),
    })
}
