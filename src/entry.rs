use clap::{CommandFactory, FromArgMatches};

use crate::app::{run_attack, run_report};
use crate::args::{Command, StressArgs};
use crate::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let matches = StressArgs::command().get_matches();
    let args = StressArgs::from_arg_matches(&matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    match args.command {
        Command::Attack(attack_args) => {
            let mut builder = tokio::runtime::Builder::new_multi_thread();
            builder.enable_all();
            if let Some(cpus) = args.cpus {
                builder.worker_threads(cpus.get());
            }
            let runtime = builder.build()?;
            let attack_matches = matches.subcommand_matches("attack").unwrap_or(&matches);
            runtime.block_on(run_attack(attack_args, attack_matches))
        }
        Command::Report(report_args) => run_report(&report_args),
    }
}
