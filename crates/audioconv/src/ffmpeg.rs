use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use crate::config::{Bitrate, OutputFormat, Quality, SampleRate};

/// Encoding parameters handed through to the external transcoder unchanged.
#[derive(Clone)]
pub(crate) struct EncodeParams {
    pub(crate) format: OutputFormat,
    pub(crate) quality: Quality,
    pub(crate) bitrate: Option<Bitrate>,
    pub(crate) sample_rate: Option<SampleRate>,
    pub(crate) overwrite: bool,
}

/// Result of one transcode call: the exit status and whatever the tool wrote
/// to its diagnostic stream.
pub(crate) struct Transcode {
    pub(crate) success: bool,
    pub(crate) diagnostics: String,
}

/// Capability seam over the external transcoder, so the pipeline can be
/// exercised without spawning a real process.
pub(crate) trait Transcoder {
    fn transcode(&self, input: &Path, output: &Path, params: &EncodeParams) -> Result<Transcode>;
}

pub(crate) struct Ffmpeg;

impl Ffmpeg {
    /// Verify ffmpeg is reachable. Absence is fatal for the whole program,
    /// not per item.
    pub(crate) fn probe() -> Result<()> {
        let status = Command::new("ffmpeg")
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => bail!("ffmpeg -version exited with {status}"),
            Err(e) => Err(e).context("ffmpeg is not installed or not on PATH"),
        }
    }
}

impl Transcoder for Ffmpeg {
    fn transcode(&self, input: &Path, output: &Path, params: &EncodeParams) -> Result<Transcode> {
        let result = Command::new("ffmpeg")
            .args(build_args(input, output, params))
            .stdin(Stdio::null())
            .output()
            .context("failed to run ffmpeg")?;

        Ok(Transcode {
            success: result.status.success(),
            diagnostics: String::from_utf8_lossy(&result.stderr).into_owned(),
        })
    }
}

/// Assemble the ffmpeg argument list. `-map_metadata 0` carries source tags
/// into the output; the quality knob depends on the target format.
pub(crate) fn build_args(input: &Path, output: &Path, params: &EncodeParams) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-i".into(),
        input.into(),
        "-map_metadata".into(),
        "0".into(),
    ];

    if params.overwrite {
        args.push("-y".into());
    }

    if let Some(knob) = params.format.quality_arg() {
        args.push(knob.into());
        args.push(params.quality.to_string().into());
    }

    if let Some(bitrate) = &params.bitrate {
        args.push("-b:a".into());
        args.push(bitrate.as_str().into());
    }

    if let Some(rate) = params.sample_rate {
        args.push("-ar".into());
        args.push(rate.to_string().into());
    }

    args.push(output.into());
    args
}

/// Pick the most relevant line out of the transcoder's stderr chatter: the
/// last one mentioning "error" or "invalid", case-insensitive.
pub(crate) fn extract_diagnostic(diagnostics: &str) -> Option<String> {
    diagnostics
        .lines()
        .filter(|line| {
            let lower = line.to_ascii_lowercase();
            lower.contains("error") || lower.contains("invalid")
        })
        .next_back()
        .map(|line| line.trim().to_string())
}
