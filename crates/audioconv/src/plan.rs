use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::select::Item;

/// What to do with one selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    Process,
    /// Destination exists and overwriting was not requested.
    SkipExists,
    /// Source already has the target format and lives in the destination
    /// directory, so converting would be an in-place no-op. Compares
    /// extension and parent directory only, never content.
    SkipSame,
    /// Zero-byte source.
    SkipEmpty,
}

/// A computed destination and disposition for one item. Never mutated after
/// planning.
pub(crate) struct Plan {
    pub(crate) dest: PathBuf,
    pub(crate) disposition: Disposition,
}

pub(crate) fn plan(
    item: &Item,
    dest_dir: &Path,
    format: OutputFormat,
    overwrite: bool,
) -> Plan {
    let stem = item
        .path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dest = dest_dir.join(format!("{stem}.{}", format.ext()));

    let disposition = if dest.exists() && !overwrite {
        Disposition::SkipExists
    } else if item.ext == format.ext() && item.path.parent() == Some(dest_dir) {
        Disposition::SkipSame
    } else if item.metadata.len() == 0 {
        Disposition::SkipEmpty
    } else {
        Disposition::Process
    };

    Plan { dest, disposition }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{Disposition, plan};
    use crate::config::OutputFormat;
    use crate::select::{Item, extension};

    fn item(path: &Path) -> Item {
        Item {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ext: extension(path),
            metadata: fs::metadata(path).unwrap(),
        }
    }

    #[test]
    fn fresh_item_is_processed() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("song.mp3");
        fs::write(&source, b"data").unwrap();
        let dest_dir = dir.path().join("out");
        fs::create_dir(&dest_dir).unwrap();

        let plan = plan(&item(&source), &dest_dir, OutputFormat::Wav, false);
        assert_eq!(plan.disposition, Disposition::Process);
        assert_eq!(plan.dest, dest_dir.join("song.wav"));
    }

    #[test]
    fn existing_destination_skips_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("song.mp3");
        fs::write(&source, b"data").unwrap();
        let dest_dir = dir.path().join("out");
        fs::create_dir(&dest_dir).unwrap();
        fs::write(dest_dir.join("song.wav"), b"old").unwrap();

        let plan = plan(&item(&source), &dest_dir, OutputFormat::Wav, false);
        assert_eq!(plan.disposition, Disposition::SkipExists);
    }

    #[test]
    fn existing_destination_processes_with_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("song.mp3");
        fs::write(&source, b"data").unwrap();
        let dest_dir = dir.path().join("out");
        fs::create_dir(&dest_dir).unwrap();
        fs::write(dest_dir.join("song.wav"), b"old").unwrap();

        let plan = plan(&item(&source), &dest_dir, OutputFormat::Wav, true);
        assert_eq!(plan.disposition, Disposition::Process);
    }

    #[test]
    fn same_format_and_location_skips() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("song.mp3");
        fs::write(&source, b"data").unwrap();

        // Converting mp3 to mp3 into its own directory would be a no-op.
        let plan = plan(&item(&source), dir.path(), OutputFormat::Mp3, true);
        assert_eq!(plan.disposition, Disposition::SkipSame);
    }

    #[test]
    fn same_format_elsewhere_is_processed() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("song.mp3");
        fs::write(&source, b"data").unwrap();
        let dest_dir = dir.path().join("out");
        fs::create_dir(&dest_dir).unwrap();

        let plan = plan(&item(&source), &dest_dir, OutputFormat::Mp3, false);
        assert_eq!(plan.disposition, Disposition::Process);
    }

    #[test]
    fn empty_source_skips() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("silence.mp3");
        fs::write(&source, b"").unwrap();
        let dest_dir = dir.path().join("out");
        fs::create_dir(&dest_dir).unwrap();

        let plan = plan(&item(&source), &dest_dir, OutputFormat::Wav, false);
        assert_eq!(plan.disposition, Disposition::SkipEmpty);
    }

    #[test]
    fn exists_check_wins_over_same_check() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("song.mp3");
        fs::write(&source, b"data").unwrap();

        // Destination song.mp3 exists (it is the source itself), overwrite
        // is off: the exists check fires before the same-format check.
        let plan = plan(&item(&source), dir.path(), OutputFormat::Mp3, false);
        assert_eq!(plan.disposition, Disposition::SkipExists);
    }
}
