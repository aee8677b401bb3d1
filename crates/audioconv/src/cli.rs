use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

use crate::config::{self, Config, Mode, SampleRate};
use crate::ffmpeg::Ffmpeg;
use crate::out::{Out, blank, error, heading, info, ok};
use crate::prompt::{self, Cancelled};
use crate::run;

/// Batch convert audio files with ffmpeg. Values not given as options are
/// asked for interactively.
#[derive(Parser)]
pub struct Audioconv {
    /// Audio file or folder of audio files to convert.
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Destination folder for converted files.
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Output format: mp3, wav, flac, aac, ogg or m4a.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Quality from 0 (highest) to 9 (lowest).
    #[arg(long, value_name = "N")]
    pub quality: Option<u8>,

    /// Target bitrate, e.g. 192k.
    #[arg(long, value_name = "RATE")]
    pub bitrate: Option<String>,

    /// Target sample rate in Hz, e.g. 44100.
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Overwrite destination files that already exist.
    #[arg(long, value_name = "BOOL")]
    pub overwrite: Option<bool>,
}

pub fn entry(opts: &Audioconv) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut o = Out::new(&mut stdout);

    match try_entry(&mut o, opts) {
        Err(e) if e.is::<Cancelled>() => {
            blank!(o, "");
            info!(o, "Operation cancelled by user.");
            Ok(())
        }
        other => other,
    }
}

fn try_entry(o: &mut Out<'_>, opts: &Audioconv) -> Result<()> {
    heading!(o, "=== Audio File Converter ===");
    blank!(o, "");

    if let Err(e) = Ffmpeg::probe() {
        error!(o, "FFmpeg is not installed or not available on PATH.");
        info!(o, "Install it from https://ffmpeg.org/download.html and try again.");
        return Err(e);
    }

    ok!(o, "FFmpeg found.");
    blank!(o, "");

    let config = resolve_config(o, opts)?;
    describe_config(o, &config)?;

    let summary = run::run(o, &Ffmpeg, &config)?;
    blank!(o, "");
    summary.print(o)?;

    Ok(())
}

/// Fill the run configuration from options, prompting for whatever is
/// missing. Option values flow through the same validators as prompt input,
/// but a bad option aborts instead of re-asking.
fn resolve_config(o: &mut Out<'_>, opts: &Audioconv) -> Result<Config> {
    let (mode, source) = match &opts.source {
        Some(path) => {
            let mode = if path.is_file() {
                Mode::Single
            } else {
                Mode::Folder
            };

            (mode, config::check_source(path, mode)?)
        }
        None => {
            let mode = prompt::mode(o)?;
            (mode, prompt::source(o, mode)?)
        }
    };

    let default_dest = config::default_dest(&source, mode);
    let dest = match &opts.dest {
        Some(path) => config::check_dest(path)?,
        None => prompt::dest(o, &default_dest)?,
    };

    let format = match &opts.format {
        Some(input) => config::parse_format(input)?,
        None => prompt::format(o)?,
    };

    let quality = match opts.quality {
        Some(value) => config::quality_from(value)?,
        None => prompt::quality(o)?,
    };

    let bitrate = match &opts.bitrate {
        Some(input) => config::parse_bitrate(input)?,
        None => prompt::bitrate(o)?,
    };

    let sample_rate = match opts.sample_rate {
        Some(hz) => Some(SampleRate::new(hz)),
        None => prompt::sample_rate(o)?,
    };

    let overwrite = match opts.overwrite {
        Some(overwrite) => overwrite,
        None => prompt::overwrite(o)?,
    };

    Ok(Config {
        mode,
        source,
        dest,
        format,
        quality,
        bitrate,
        sample_rate,
        overwrite,
    })
}

fn describe_config(o: &mut Out<'_>, config: &Config) -> Result<()> {
    blank!(o, "");
    info!(o, "Source: {}", config.source.display());
    info!(o, "Destination: {}", config.dest.display());

    let mode = match config.mode {
        Mode::Single => "Single file",
        Mode::Folder => "Folder",
    };
    info!(o, "Mode: {mode}");

    info!(o, "Output format: {}", config.format.ext().to_uppercase());
    info!(o, "Quality: {} (0=highest, 9=lowest)", config.quality);

    match &config.bitrate {
        Some(bitrate) => info!(o, "Bitrate: {bitrate}"),
        None => info!(o, "Bitrate: Default"),
    }

    match config.sample_rate {
        Some(rate) => info!(o, "Sample rate: {rate}"),
        None => info!(o, "Sample rate: Default"),
    }

    let overwrite = if config.overwrite { "Yes" } else { "No" };
    info!(o, "Overwrite existing: {overwrite}");
    blank!(o, "");

    Ok(())
}
