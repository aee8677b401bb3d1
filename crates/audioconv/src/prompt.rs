use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::config::{
    self, Bitrate, Mode, OutputFormat, Quality, SampleRate, ValidateError,
};
use crate::out::{Out, blank, info, warn};

/// The user closed the input stream; the run is abandoned without a summary.
#[derive(Debug, Error)]
#[error("operation cancelled")]
pub(crate) struct Cancelled;

/// Read one trimmed line, failing with [`Cancelled`] on end of input.
fn read_line(o: &mut Out<'_>, prompt: &str) -> Result<String> {
    o.prompt(format_args!("{prompt}"))?;

    let mut line = String::new();

    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(Cancelled.into());
    }

    Ok(line.trim().to_string())
}

/// Prompt until `validate` accepts the input. The validators are pure; this
/// loop is the only place input retry lives.
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

pub(crate) fn mode(o: &mut Out<'_>) -> Result<Mode> {
    info!(o, "Conversion mode:");
    info!(o, "1. Convert a single file");
    info!(o, "2. Convert all files in a folder");

    ask(o, "Choose mode (1 or 2): ", |input| match input {
        "1" => Ok(Mode::Single),
        "2" => Ok(Mode::Folder),
        _ => Err(ValidateError::BadChoice("1 or 2")),
    })
}

pub(crate) fn source(o: &mut Out<'_>, mode: Mode) -> Result<PathBuf> {
    let prompt = match mode {
        Mode::Single => "Enter path to the audio file: ",
        Mode::Folder => "Enter source folder (containing audio files to convert): ",
    };

    ask(o, prompt, |input| {
        config::check_source(Path::new(input), mode)
    })
}

pub(crate) fn dest(o: &mut Out<'_>, default: &Path) -> Result<PathBuf> {
    let prompt = format!("Enter destination folder (default: {}): ", default.display());

    ask(o, &prompt, |input| {
        let path = if input.is_empty() {
            default.to_path_buf()
        } else {
            PathBuf::from(input)
        };

        config::check_dest(&path)
    })
}

pub(crate) fn format(o: &mut Out<'_>) -> Result<OutputFormat> {
    blank!(o, "");
    info!(o, "Supported output formats:");

    for (n, format) in OutputFormat::ALL.iter().enumerate() {
        info!(o, "{}. {}", n + 1, format.ext().to_uppercase());
    }

    info!(o, "7. Custom format");

    loop {
        let choice = read_line(o, "Choose output format (1-7): ")?;

        if let Ok(n) = choice.parse::<usize>() {
            if (1..=OutputFormat::ALL.len()).contains(&n) {
                return Ok(OutputFormat::ALL[n - 1]);
            }

            if n == OutputFormat::ALL.len() + 1 {
                return ask(o, "Enter custom format (e.g. ogg): ", config::parse_format);
            }
        }

        warn!(o, "Please enter a number between 1 and 7.");
    }
}

pub(crate) fn quality(o: &mut Out<'_>) -> Result<Quality> {
    blank!(o, "");
    info!(o, "Audio quality options:");
    info!(o, "1. Highest quality (0)");
    info!(o, "2. High quality (2)");
    info!(o, "3. Medium quality (4)");
    info!(o, "4. Low quality (6)");
    info!(o, "5. Lowest quality (9)");
    info!(o, "6. Custom quality");

    loop {
        let choice = read_line(o, "Choose quality (1-6): ")?;

        let preset = match choice.as_str() {
            "1" => Some(0),
            "2" => Some(2),
            "3" => Some(4),
            "4" => Some(6),
            "5" => Some(9),
            "6" => {
                return ask(
                    o,
                    "Enter quality (0-9, 0=highest, 9=lowest): ",
                    config::parse_quality,
                );
            }
            _ => None,
        };

        if let Some(preset) = preset {
            return Ok(config::quality_from(preset)?);
        }

        warn!(o, "Please enter a number between 1 and 6.");
    }
}

pub(crate) fn bitrate(o: &mut Out<'_>) -> Result<Option<Bitrate>> {
    ask(
        o,
        "Enter bitrate (e.g. 192k, leave blank for default): ",
        config::parse_bitrate,
    )
}

pub(crate) fn sample_rate(o: &mut Out<'_>) -> Result<Option<SampleRate>> {
    ask(
        o,
        "Enter sample rate (e.g. 44100, leave blank for default): ",
        config::parse_sample_rate,
    )
}

pub(crate) fn overwrite(o: &mut Out<'_>) -> Result<bool> {
    ask(o, "Overwrite existing files? (y/n): ", config::parse_yes_no)
}
