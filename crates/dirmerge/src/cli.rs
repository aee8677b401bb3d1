use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

pub use crate::config::Strategy;
use crate::config::{self, Config};
use crate::out::{Out, blank, heading, info};
use crate::prompt::{self, Cancelled};
use crate::run;

/// Merge every subfolder of a source directory into one destination. Values
/// not given as options are asked for interactively.
#[derive(Parser)]
pub struct Dirmerge {
    /// Directory whose subfolders will be merged.
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Destination directory for the merged files.
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// How merged files are laid out under the destination.
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,
}

pub fn entry(opts: &Dirmerge) -> Result<()> {
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

fn try_entry(o: &mut Out<'_>, opts: &Dirmerge) -> Result<()> {
    heading!(o, "=== Folder Merge ===");
    blank!(o, "");

    let config = resolve_config(o, opts)?;

    info!(o, "Destination path: {}", config.dest.display());
    blank!(o, "");

    let summary = run::run(o, &config)?;
    blank!(o, "");
    summary.print(o)?;

    Ok(())
}

/// Fill the run configuration from options, prompting for whatever is
/// missing. Option values flow through the same validators as prompt input,
/// but a bad option aborts instead of re-asking.
fn resolve_config(o: &mut Out<'_>, opts: &Dirmerge) -> Result<Config> {
    let source = match &opts.source {
        Some(path) => config::check_source(path)?,
        None => prompt::source(o)?,
    };

    let dest = match &opts.dest {
        Some(path) => config::check_dest(path)?,
        None => prompt::dest(o)?,
    };

    let strategy = match opts.strategy {
        Some(strategy) => strategy,
        None => prompt::strategy(o)?,
    };

    Ok(Config {
        source,
        dest,
        strategy,
    })
}
