use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Copy `source` to `dest`, creating parent directories as needed and
/// carrying the source timestamps over.
pub(crate) fn copy_with_metadata(source: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::copy(source, dest)?;

    let metadata = fs::metadata(source)?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )?;

    Ok(())
}

/// Remove a stale non-file destination entry so a copy can take its place.
/// Only symlinks and empty directories are removable; a populated directory
/// makes this fail, which the caller records as a per-item failure.
pub(crate) fn remove_stale(dest: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(dest)?;

    if metadata.is_dir() {
        fs::remove_dir(dest)
    } else {
        fs::remove_file(dest)
    }
}
