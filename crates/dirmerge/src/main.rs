//! A tool to merge sibling directory trees into one destination.
//!
//! See the `dirmerge` crate documentation for more information.

use anyhow::Result;
use clap::Parser;

const VERSION: &str = match option_env!("MEDIAUTIL_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// A tool to merge sibling directory trees into one destination.
#[derive(Parser)]
#[command(author, about, max_term_width = 80, version = VERSION)]
struct Opts {
    #[command(flatten)]
    inner: dirmerge::cli::Dirmerge,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    dirmerge::cli::entry(&opts.inner)
}
