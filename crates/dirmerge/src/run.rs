use std::borrow::Cow;
use std::path::Path;

use anyhow::Result;

use crate::config::{Config, Strategy};
use crate::copy;
use crate::out::{Out, blank, error, heading, info, ok, warn};
use crate::plan::{self, Disposition, Plan};
use crate::scan::{self, Item};

/// Terminal result of executing one plan.
pub(crate) enum Outcome {
    Copied,
    /// Copied over a removed stale non-file entry.
    Replaced,
    Skipped,
    Failed(String),
}

/// Running totals for one merge pass. Threaded through the run explicitly;
/// there is no ambient state.
#[derive(Default)]
pub(crate) struct RunSummary {
    pub(crate) copied: usize,
    pub(crate) replaced: usize,
    pub(crate) skipped: usize,
    /// Reasons for each failure, in encounter order.
    pub(crate) failures: Vec<String>,
}

impl RunSummary {
    pub(crate) fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Copied => self.copied += 1,
            Outcome::Replaced => self.replaced += 1,
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
        self.copied + self.replaced + self.skipped + self.failed()
    }

    #[inline]
    pub(crate) fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn print(&self, o: &mut Out<'_>) -> Result<()> {
        heading!(o, "=== Merge Summary ===");
        info!(o, "Files copied: {}", self.copied);
        info!(o, "Files replaced: {}", self.replaced);
        info!(o, "Files skipped: {}", self.skipped);
        info!(o, "Errors encountered: {}", self.failed());
        info!(o, "Total files processed: {}", self.total());

        if self.is_clean() {
            ok!(o, "Merge completed successfully.");
        } else {
            warn!(o, "Merge completed with some errors.");
        }

        Ok(())
    }
}

/// Run the full merge pass: enumerate subfolders, walk each, plan and copy
/// one file at a time. Per-item failures are folded into the summary.
pub(crate) fn run(o: &mut Out<'_>, config: &Config) -> Result<RunSummary> {
    let folders = scan::subfolders(&config.source, &config.dest)?;

    info!(o, "Found {} folders to process:", folders.len());

    {
        let mut o = o.indent(1);

        for folder in &folders {
            blank!(o, "- {}", name_of(folder));
        }
    }

    let mut summary = RunSummary::default();

    if folders.is_empty() {
        warn!(o, "No folders found to merge.");
        return Ok(summary);
    }

    blank!(o, "");

    match config.strategy {
        Strategy::Preserve => heading!(o, "--- Merging with folder structure preserved ---"),
        Strategy::Flatten => heading!(o, "--- Merging contents only (flattened) ---"),
    }

    for folder in &folders {
        blank!(o, "");
        info!(o, "Processing folder: {}", name_of(folder));

        for item in scan::walk(o, folder, &config.source)? {
            let plan = plan::plan(&item, &config.dest, config.strategy);
            let outcome = execute(o, &item, &plan, config.strategy)?;
            summary.record(&outcome);
        }
    }

    Ok(summary)
}

fn name_of(folder: &Path) -> Cow<'_, str> {
    folder
        .file_name()
        .unwrap_or(folder.as_os_str())
        .to_string_lossy()
}

/// Apply one plan: skip, copy, or replace-then-copy. Never retries; every
/// failure is terminal for its item only.
fn execute(o: &mut Out<'_>, item: &Item, plan: &Plan, strategy: Strategy) -> Result<Outcome> {
    let label = match strategy {
        Strategy::Preserve => item.rel.display().to_string(),
        Strategy::Flatten => item.name.clone(),
    };

    match plan.disposition {
        Disposition::SkipExists => {
            info!(o, "Skipped (already exists): {label}");
            Ok(Outcome::Skipped)
        }
        Disposition::Copy => match copy::copy_with_metadata(&item.path, &plan.dest) {
            Ok(()) => {
                let dest_name = plan
                    .dest
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();

                if dest_name == item.name {
                    ok!(o, "Copied: {label}");
                } else {
                    ok!(o, "Copied with new name: {} -> {dest_name}", item.name);
                }

                Ok(Outcome::Copied)
            }
            Err(e) => {
                error!(o, "Error processing file '{label}': {e}");
                Ok(Outcome::Failed(e.to_string()))
            }
        },
        Disposition::Replace => {
            let result = copy::remove_stale(&plan.dest)
                .and_then(|()| copy::copy_with_metadata(&item.path, &plan.dest));

            match result {
                Ok(()) => {
                    ok!(o, "Replaced: {label}");
                    Ok(Outcome::Replaced)
                }
                Err(e) => {
                    error!(o, "Error replacing '{label}': {e}");
                    Ok(Outcome::Failed(e.to_string()))
                }
            }
        }
    }
}
