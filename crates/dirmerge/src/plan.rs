use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Strategy;
use crate::scan::Item;

/// What to do with one scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Copy to a destination path that is currently free.
    Copy,
    /// Destination is occupied by a stale non-file entry; replace it. Applies
    /// to both strategies.
    Replace,
    /// Destination already holds a regular file. Presence alone skips;
    /// content is never compared.
    SkipExists,
}

/// A computed destination and disposition for one item. Never mutated after
/// planning.
pub(crate) struct Plan {
    pub(crate) dest: PathBuf,
    pub(crate) disposition: Disposition,
}

pub(crate) fn plan(item: &Item, dest_root: &Path, strategy: Strategy) -> Plan {
    match strategy {
        Strategy::Preserve => {
            let dest = dest_root.join(&item.rel);
            let disposition = disposition_for(&dest);
            Plan { dest, disposition }
        }
        Strategy::Flatten => {
            let dest = dest_root.join(&item.name);

            match disposition_for(&dest) {
                // A regular file in the way means rename, not skip: the
                // whole point of flattening is collecting same-named files.
                Disposition::SkipExists => Plan {
                    dest: free_name(dest_root, &item.name),
                    disposition: Disposition::Copy,
                },
                disposition => Plan { dest, disposition },
            }
        }
    }
}

fn disposition_for(dest: &Path) -> Disposition {
    match fs::symlink_metadata(dest) {
        Ok(metadata) if metadata.is_file() => Disposition::SkipExists,
        Ok(..) => Disposition::Replace,
        Err(..) => Disposition::Copy,
    }
}

/// First free `stem_N.ext` name under `dest_root`, counting up from 1.
fn free_name(dest_root: &Path, name: &str) -> PathBuf {
    let (stem, ext) = split_name(name);
    let mut counter = 1u32;

    loop {
        let candidate = if ext.is_empty() {
            format!("{stem}_{counter}")
        } else {
            format!("{stem}_{counter}.{ext}")
        };

        let path = dest_root.join(candidate);

        if fs::symlink_metadata(&path).is_err() {
            return path;
        }

        counter += 1;
    }
}

fn split_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::{Disposition, plan, split_name};
    use crate::config::Strategy;
    use crate::scan::Item;

    fn item(base: &Path, rel: &str) -> Item {
        let path = base.join(rel);

        Item {
            path: path.clone(),
            rel: PathBuf::from(rel),
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    #[test]
    fn preserve_keeps_relative_structure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged");
        fs::create_dir(&dest).unwrap();

        let item = item(dir.path(), "album/cd1/track.flac");
        let plan = plan(&item, &dest, Strategy::Preserve);

        assert_eq!(plan.dest, dest.join("album/cd1/track.flac"));
        assert_eq!(plan.disposition, Disposition::Copy);
    }

    #[test]
    fn preserve_skips_existing_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged");
        fs::create_dir_all(dest.join("album")).unwrap();
        fs::write(dest.join("album/track.flac"), b"old").unwrap();

        let item = item(dir.path(), "album/track.flac");
        let plan = plan(&item, &dest, Strategy::Preserve);

        assert_eq!(plan.disposition, Disposition::SkipExists);
    }

    #[test]
    fn stale_directory_entry_is_replace_eligible() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged");
        fs::create_dir_all(dest.join("album/track.flac")).unwrap();

        let item = item(dir.path(), "album/track.flac");
        let plan = plan(&item, &dest, Strategy::Preserve);

        assert_eq!(plan.disposition, Disposition::Replace);
    }

    #[test]
    fn flatten_uses_the_file_name_only() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged");
        fs::create_dir(&dest).unwrap();

        let item = item(dir.path(), "album/cd1/track.flac");
        let plan = plan(&item, &dest, Strategy::Flatten);

        assert_eq!(plan.dest, dest.join("track.flac"));
        assert_eq!(plan.disposition, Disposition::Copy);
    }

    #[test]
    fn flatten_renames_on_collision() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("a.txt"), b"first").unwrap();

        let item = item(dir.path(), "one/a.txt");
        let plan = plan(&item, &dest, Strategy::Flatten);

        assert_eq!(plan.dest, dest.join("a_1.txt"));
        assert_eq!(plan.disposition, Disposition::Copy);
    }

    #[test]
    fn flatten_suffix_counts_past_taken_names() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("a.txt"), b"0").unwrap();
        fs::write(dest.join("a_1.txt"), b"1").unwrap();
        fs::write(dest.join("a_2.txt"), b"2").unwrap();

        let item = item(dir.path(), "one/a.txt");
        let plan = plan(&item, &dest, Strategy::Flatten);

        assert_eq!(plan.dest, dest.join("a_3.txt"));
    }

    #[test]
    fn flatten_replaces_stale_non_file_entries() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged");
        fs::create_dir_all(dest.join("a.txt")).unwrap();

        let item = item(dir.path(), "one/a.txt");
        let plan = plan(&item, &dest, Strategy::Flatten);

        assert_eq!(plan.dest, dest.join("a.txt"));
        assert_eq!(plan.disposition, Disposition::Replace);
    }

    #[test]
    fn name_splitting() {
        assert_eq!(split_name("a.txt"), ("a", "txt"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", "gz"));
        assert_eq!(split_name("README"), ("README", ""));
        assert_eq!(split_name(".hidden"), (".hidden", ""));
    }
}
