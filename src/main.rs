mod app;
mod args;
mod attack;
mod config;
mod entry;
mod error;
mod logger;
mod report;
mod results;
mod targets;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
