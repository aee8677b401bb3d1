use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::config::{self, Strategy, ValidateError};
use crate::out::{Out, blank, info, warn};

/// The user closed the input stream; the run is abandoned without a summary.
#[derive(Debug, Error)]
#[error("operation cancelled")]
pub(crate) struct Cancelled;

fn read_line(o: &mut Out<'_>, prompt: &str) -> Result<String> {
    o.prompt(format_args!("{prompt}"))?;

    let mut line = String::new();

    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(Cancelled.into());
    }

    Ok(line.trim().to_string())
}

/// Prompt until `validate` accepts the input.
fn ask<T>(
    o: &mut Out<'_>,
    prompt: &str,
    validate: impl Fn(&str) -> Result<T, ValidateError>,
) -> Result<T> {
    loop {
        let line = read_line(o, prompt)?;

        match validate(&line) {
            Ok(value) => return Ok(value),
            Err(e) => warn!(o, "{e}"),
        }
    }
}

pub(crate) fn source(o: &mut Out<'_>) -> Result<PathBuf> {
    ask(
        o,
        "Enter source path (containing folders to merge): ",
        |input| config::check_source(Path::new(input)),
    )
}

pub(crate) fn dest(o: &mut Out<'_>) -> Result<PathBuf> {
    ask(
        o,
        "Enter destination path (where merged files will go): ",
        |input| config::check_dest(Path::new(input)),
    )
}

pub(crate) fn strategy(o: &mut Out<'_>) -> Result<Strategy> {
    blank!(o, "");
    info!(o, "Merge options:");
    info!(o, "1. Merge entire folder structures (preserves directory hierarchy)");
    info!(o, "2. Merge contents only (flattens all files into the destination)");

    ask(o, "Choose option (1 or 2): ", |input| match input {
        "1" => Ok(Strategy::Preserve),
        "2" => Ok(Strategy::Flatten),
        _ => Err(ValidateError::BadChoice("1 or 2")),
    })
}
