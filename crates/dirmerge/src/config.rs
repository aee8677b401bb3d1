use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;

/// Everything one merge run needs, fully validated up front.
pub(crate) struct Config {
    pub(crate) source: PathBuf,
    pub(crate) dest: PathBuf,
    pub(crate) strategy: Strategy,
}

/// How merged files are laid out under the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Keep the relative directory hierarchy of every source tree.
    Preserve,
    /// Place all files directly under the destination, renaming on collision.
    Flatten,
}

/// Why a raw input value was rejected. The messages double as the retry
/// hints shown by the interactive prompts.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ValidateError {
    #[error("please enter a path")]
    EmptyPath,
    #[error("path '{0}' does not exist")]
    Missing(PathBuf),
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot use '{0}': {1}")]
    Unusable(PathBuf, String),
    #[error("please enter {0}")]
    BadChoice(&'static str),
}

/// Normalize and check the source root, which must be an existing directory.
pub(crate) fn check_source(path: &Path) -> Result<PathBuf, ValidateError> {
    if path.as_os_str().is_empty() {
        return Err(ValidateError::EmptyPath);
    }

    let path = fs::canonicalize(path).map_err(|_| ValidateError::Missing(path.to_path_buf()))?;

    if !path.is_dir() {
        return Err(ValidateError::NotADirectory(path));
    }

    Ok(path)
}

/// Normalize the destination directory, creating it (and parents) as needed.
pub(crate) fn check_dest(path: &Path) -> Result<PathBuf, ValidateError> {
    if path.as_os_str().is_empty() {
        return Err(ValidateError::EmptyPath);
    }

    fs::create_dir_all(path)
        .map_err(|e| ValidateError::Unusable(path.to_path_buf(), e.to_string()))?;
    fs::canonicalize(path).map_err(|e| ValidateError::Unusable(path.to_path_buf(), e.to_string()))
}
