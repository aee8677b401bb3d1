//! A tool to merge sibling directory trees into one destination.
//!
//! Every subfolder of the source is walked recursively and its files are
//! copied into the destination, either keeping the relative hierarchy or
//! flattened into one directory with rename-on-collision. Existing files are
//! never overwritten; outcomes are tallied into a final summary.

pub mod cli;

mod config;
mod copy;
mod out;
mod plan;
mod prompt;
mod run;
mod scan;
