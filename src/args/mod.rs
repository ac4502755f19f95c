//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;


pub use cli::{AttackArgs, Command, ReportArgs, StressArgs};

pub use defaults::{STDIN, STDOUT};

pub(crate) use defaults::DEFAULT_CONFIG_FILES;
pub(crate) use parsers::{parse_duration, parse_header, parse_local_addr};
