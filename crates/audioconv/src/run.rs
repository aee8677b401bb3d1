use anyhow::Result;

use crate::config::{Config, Mode};
use crate::ffmpeg::{self, EncodeParams, Transcoder};
use crate::out::{Out, blank, error, heading, info, ok, warn};
use crate::plan::{self, Disposition, Plan};
use crate::select::{self, Item, RECOGNIZED_EXTENSIONS};

/// Terminal result of executing one plan.
pub(crate) enum Outcome {
    Converted,
    Skipped,
    Failed(String),
}

/// Running totals for one conversion pass. Threaded through the run
/// explicitly; there is no ambient state.
#[derive(Default)]
pub(crate) struct RunSummary {
    pub(crate) converted: usize,
    pub(crate) skipped: usize,
    /// Reasons for each failure, in encounter order.
    pub(crate) failures: Vec<String>,
}

impl RunSummary {
    pub(crate) fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Converted => self.converted += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(reason) => self.failures.push(reason.clone()),
        }
    }

    #[inline]
    pub(crate) fn failed(&self) -> usize {
        self.failures.len()
    }

    #[inline]
    pub(crate) fn total(&self) -> usize {
        self.converted + self.skipped + self.failed()
    }

    #[inline]
    pub(crate) fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn print(&self, o: &mut Out<'_>) -> Result<()> {
        heading!(o, "=== Conversion Summary ===");
        info!(o, "Files converted: {}", self.converted);
        info!(o, "Files skipped: {}", self.skipped);
        info!(o, "Errors encountered: {}", self.failed());
        info!(o, "Total files processed: {}", self.total());

        if self.is_clean() {
            ok!(o, "Conversion completed successfully.");
        } else {
            warn!(o, "Conversion completed with some errors.");
        }

        Ok(())
    }
}

/// Run the full selection, planning and conversion pass. Per-item failures
/// are folded into the summary; only selection problems abort.
pub(crate) fn run(
    o: &mut Out<'_>,
    transcoder: &dyn Transcoder,
    config: &Config,
) -> Result<RunSummary> {
    let items = select::select(o, &config.source, config.mode, RECOGNIZED_EXTENSIONS)?;
    describe_selection(o, &items, config)?;

    let mut summary = RunSummary::default();

    if items.is_empty() {
        warn!(o, "No audio files found to process.");
        return Ok(summary);
    }

    let params = EncodeParams {
        format: config.format,
        quality: config.quality,
        bitrate: config.bitrate.clone(),
        sample_rate: config.sample_rate,
        overwrite: config.overwrite,
    };

    blank!(o, "");
    heading!(o, "--- Starting conversion ---");

    for item in &items {
        let plan = plan::plan(item, &config.dest, config.format, config.overwrite);
        let outcome = execute(o, transcoder, item, &plan, &params)?;
        summary.record(&outcome);
    }

    Ok(summary)
}

fn describe_selection(o: &mut Out<'_>, items: &[Item], config: &Config) -> Result<()> {
    match config.mode {
        Mode::Single => {
            let Some(item) = items.first() else {
                return Ok(());
            };

            info!(o, "File to convert: {}", item.name);

            if !item.ext.is_empty() {
                info!(o, "Detected input format: {}", item.ext.to_uppercase());
            }
        }
        Mode::Folder => {
            info!(o, "Found {} audio files to convert", items.len());

            let mut formats: Vec<&str> = items.iter().map(|item| item.ext.as_str()).collect();
            formats.sort_unstable();
            formats.dedup();

            if !formats.is_empty() {
                let formats: Vec<String> =
                    formats.into_iter().map(str::to_uppercase).collect();
                info!(o, "Input formats detected: {}", formats.join(", "));
            }
        }
    }

    Ok(())
}

/// Apply one plan. Skips never touch the transcoder; process invokes it and
/// classifies the exit. Never retries.
fn execute(
    o: &mut Out<'_>,
    transcoder: &dyn Transcoder,
    item: &Item,
    plan: &Plan,
    params: &EncodeParams,
) -> Result<Outcome> {
    match plan.disposition {
        Disposition::SkipExists => {
            info!(o, "Skipped (already exists): {}", item.name);
            Ok(Outcome::Skipped)
        }
        Disposition::SkipSame => {
            info!(o, "Skipped (same format and location): {}", item.name);
            Ok(Outcome::Skipped)
        }
        Disposition::SkipEmpty => {
            info!(o, "Skipped (empty file): {}", item.name);
            Ok(Outcome::Skipped)
        }
        Disposition::Process => {
            let dest_name = plan
                .dest
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!(o, "Converting: {} -> {}", item.name, dest_name);

            match transcoder.transcode(&item.path, &plan.dest, params) {
                Ok(transcode) if transcode.success => {
                    ok!(o, "Converted: {}", item.name);
                    Ok(Outcome::Converted)
                }
                Ok(transcode) => {
                    let reason = ffmpeg::extract_diagnostic(&transcode.diagnostics)
                        .unwrap_or_else(|| "conversion failed".to_string());

                    error!(o, "Error converting {}", item.name);

                    {
                        let mut o = o.indent(1);
                        error!(o, "{reason}");
                    }

                    Ok(Outcome::Failed(reason))
                }
                Err(e) => {
                    error!(o, "Error converting {}: {e:#}", item.name);
                    Ok(Outcome::Failed(e.to_string()))
                }
            }
        }
    }
}
