use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info};

use crate::args::AttackArgs;
use crate::attack::{Attacker, AttackerConfig};
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, HttpError, ValidationError};
use crate::results::Results;
use crate::targets::{Header, Targets};

use super::io::{create_output, open_input};

/// Scheduling picked from the attack arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AttackMode {
    Rate { rate: u64, duration: Duration },
    Concurrency { concurrency: u64, number: u64 },
}

impl AttackMode {
    pub(super) fn from_args(args: &AttackArgs) -> AppResult<Self> {
        match (args.concurrency, args.number) {
            (Some(concurrency), Some(number)) => Ok(Self::Concurrency {
                concurrency,
                number,
            }),
            (None, None) => Ok(Self::Rate {
                rate: args.rate,
                duration: args.duration,
            }),
            (Some(_), None) | (None, Some(_)) => {
                error!("Both --concurrency and --number are required for a fixed-concurrency attack.");
                Err(AppError::validation(ValidationError::ConcurrencyRequiresNumber))
            }
        }
    }
}

/// Runs the `attack` subcommand and writes the encoded results.
///
/// `matches` are the `attack` subcommand matches, used to let command-line
/// values win over the config file.
pub(crate) async fn run_attack(mut args: AttackArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let mode = AttackMode::from_args(&args)?;
    let targets = load_targets(&args)?;
    let attacker = Attacker::new(&AttackerConfig {
        redirects: args.redirects,
        timeout: args.timeout,
        local_addr: args.laddr,
    })?;

    let results = match mode {
        AttackMode::Rate { rate, duration } => {
            info!(
                "Attacking {} targets at {} req/s for {:?}",
                targets.len(),
                rate,
                duration
            );
            attacker.attack_rate(&targets, rate, duration).await?
        }
        AttackMode::Concurrency {
            concurrency,
            number,
        } => {
            info!(
                "Attacking {} targets with {} workers for {} requests",
                targets.len(),
                concurrency,
                number
            );
            attacker
                .attack_concurrency(&targets, concurrency, number)
                .await?
        }
    };

    write_results(&results, &args.output)?;
    let failures = results.iter().filter(|result| result.is_failure()).count();
    info!("Done: {} results, {} failed", results.len(), failures);
    Ok(())
}

pub(super) fn load_targets(args: &AttackArgs) -> AppResult<Targets> {
    let body = match args.body.as_deref() {
        Some(path) => read_body(path)?,
        None => Vec::new(),
    };
    let header: Header = args
        .headers
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let source = BufReader::new(open_input(&args.targets)?);
    let mut targets = Targets::from_reader(source, &body, &header)?;
    if let Some(seed) = args.seed {
        targets.shuffle(seed);
    }
    Ok(targets)
}

fn read_body(path: &str) -> AppResult<Vec<u8>> {
    std::fs::read(path).map_err(|err| {
        error!("Failed to read body file '{}': {}", path, err);
        AppError::http(HttpError::ReadBodyFile {
            path: Path::new(path).to_path_buf(),
            source: err,
        })
    })
}

fn write_results(results: &Results, output: &str) -> AppResult<()> {
    let mut out = create_output(output)?;
    results.encode(&mut out)
}
