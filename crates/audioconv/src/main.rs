//! A tool to perform batch conversion of audio files.
//!
//! See the `audioconv` crate documentation for more information.

use anyhow::Result;
use clap::Parser;

const VERSION: &str = match option_env!("MEDIAUTIL_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// A tool to perform batch conversion of audio files.
#[derive(Parser)]
#[command(author, about, max_term_width = 80, version = VERSION)]
struct Opts {
    #[command(flatten)]
    inner: audioconv::cli::Audioconv,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    audioconv::cli::entry(&opts.inner)
}
