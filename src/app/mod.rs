//! Subcommand runners.
mod attack;
mod io;
mod report;


pub(crate) use attack::run_attack;
pub(crate) use report::run_report;
