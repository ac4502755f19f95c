use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use tracing::error;

use crate::args::{STDIN, STDOUT};
use crate::error::AppResult;

/// Opens `name` for reading; `stdin` names standard input.
pub(super) fn open_input(name: &str) -> AppResult<Box<dyn Read>> {
    if name == STDIN {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    match File::open(name) {
        Ok(file) => Ok(Box::new(BufReader::new(file))),
        Err(err) => {
            error!("Failed to open '{}': {}", name, err);
            Err(err.into())
        }
    }
}

/// Creates (or truncates) `name` for writing; `stdout` names standard output.
pub(super) fn create_output(name: &str) -> AppResult<Box<dyn Write>> {
    if name == STDOUT {
        return Ok(Box::new(std::io::stdout().lock()));
    }
    match File::create(name) {
        Ok(file) => Ok(Box::new(BufWriter::new(file))),
        Err(err) => {
            error!("Failed to create '{}': {}", name, err);
            Err(err.into())
        }
    }
}
