use std::io::Write;

use tracing::{debug, info};

use crate::args::ReportArgs;
use crate::error::AppResult;
use crate::results::Results;

use super::io::{create_output, open_input};

/// Decodes every input, merges and re-sorts them, and writes the rendered report.
pub(crate) fn run_report(args: &ReportArgs) -> AppResult<()> {
    let mut all = Results::new();
    for input in args.input.split(',').map(str::trim) {
        let results = Results::decode(open_input(input)?)?;
        debug!("Decoded {} results from {}", results.len(), input);
        all.extend(results);
    }
    all.sort();

    let data = args.reporter.render(&all)?;
    let mut out = create_output(&args.output)?;
    out.write_all(&data)?;
    out.flush()?;
    info!("Reported {} results", all.len());
    Ok(())
}
