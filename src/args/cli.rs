use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::attack::DEFAULT_REDIRECTS;
use crate::report::Reporter;

use super::defaults::{DEFAULT_DURATION, DEFAULT_RATE, DEFAULT_TIMEOUT, STDIN, STDOUT};
use super::parsers::{parse_duration, parse_header, parse_local_addr};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "stress",
    version,
    about = "HTTP load generator: attack a list of targets at a fixed rate or concurrency, then report on the results."
)]
pub struct StressArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Worker threads for the async runtime (defaults to the number of CPUs)
    #[arg(long = "cpus", global = true)]
    pub cpus: Option<NonZeroUsize>,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Send requests to the targets and write the encoded results
    Attack(AttackArgs),
    /// Aggregate encoded results into a report
    Report(ReportArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AttackArgs {
    /// Targets file, one `METHOD [Key:Value ...] URL [FILESPEC]` per line
    #[arg(long = "targets", default_value = STDIN)]
    pub targets: String,

    /// File whose content is the default request body
    #[arg(long = "body")]
    pub body: Option<String>,

    /// Header added to every target, 'Key: Value' (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Requests per second in fixed-rate mode
    #[arg(long = "rate", default_value_t = DEFAULT_RATE)]
    pub rate: u64,

    /// Length of a fixed-rate attack (supports ms/s/m/h)
    #[arg(long = "duration", default_value = DEFAULT_DURATION, value_parser = parse_duration)]
    pub duration: Duration,

    /// Number of workers; switches to fixed-concurrency mode together with --number
    #[arg(long = "concurrency", short = 'c')]
    pub concurrency: Option<u64>,

    /// Total requests in fixed-concurrency mode
    #[arg(long = "number", short = 'n')]
    pub number: Option<u64>,

    /// Redirects followed before a request fails
    #[arg(long = "redirects", default_value_t = DEFAULT_REDIRECTS)]
    pub redirects: usize,

    /// Connect and response-header timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = DEFAULT_TIMEOUT, value_parser = parse_duration)]
    pub timeout: Duration,

    /// Local IP address to bind outgoing connections to
    #[arg(long = "laddr", value_parser = parse_local_addr)]
    pub laddr: Option<IpAddr>,

    /// Shuffle targets with this seed before attacking
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Results file
    #[arg(long = "output", short = 'o', default_value = STDOUT)]
    pub output: String,

    /// Path to a TOML or JSON config file (defaults to ./stress.toml or ./stress.json)
    #[arg(long = "config")]
    pub config: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Report format
    #[arg(long = "reporter", value_enum, default_value_t = Reporter::Text)]
    pub reporter: Reporter,

    /// Results files, comma separated
    #[arg(long = "input", short = 'i', default_value = STDIN)]
    pub input: String,

    /// Report file
    #[arg(long = "output", short = 'o', default_value = STDOUT)]
    pub output: String,
}
