use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

use crate::out::{Out, warn};

/// One source file selected for merging.
pub(crate) struct Item {
    pub(crate) path: PathBuf,
    /// Path relative to the base source root. Unique within the source side
    /// of one run, which is what keeps preserve-mode destinations unique.
    pub(crate) rel: PathBuf,
    pub(crate) name: String,
}

/// Immediate subdirectories of `root`, excluding the one whose name matches
/// the destination's final path component. The name check is what keeps a
/// destination nested under the source root from being merged into itself.
pub(crate) fn subfolders(root: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let dest_name = dest.file_name();
    let mut folders = Vec::new();

    let entries = fs::read_dir(root).with_context(|| format!("list {}", root.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }

        if dest_name.is_some() && path.file_name() == dest_name {
            continue;
        }

        folders.push(path);
    }

    Ok(folders)
}

/// Every regular file under `folder`, recursively, with paths relative to
/// `base`. Hidden files and ignore rules are not filtered; unreadable
/// entries are reported and passed over.
pub(crate) fn walk(o: &mut Out<'_>, folder: &Path, base: &Path) -> Result<Vec<Item>> {
    let mut items = Vec::new();

    for entry in WalkBuilder::new(folder).standard_filters(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(o, "Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.into_path();

        let rel = match path.strip_prefix(base) {
            Ok(rel) => rel.to_path_buf(),
            Err(..) => path.clone(),
        };

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        items.push(Item { path, rel, name });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::PathBuf;

    use termcolor::Buffer;

    use super::{subfolders, walk};
    use crate::out::Out;

    #[test]
    fn destination_folder_is_excluded_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("merged")).unwrap();
        fs::write(dir.path().join("stray.txt"), b"x").unwrap();

        let folders = subfolders(dir.path(), &dir.path().join("merged")).unwrap();
        let names: BTreeSet<String> = folders
            .iter()
            .filter_map(|f| f.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, BTreeSet::from(["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn walk_is_recursive_and_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("music");
        fs::create_dir_all(folder.join("albums")).unwrap();
        fs::write(folder.join("top.txt"), b"t").unwrap();
        fs::write(folder.join("albums").join("deep.txt"), b"d").unwrap();
        fs::write(folder.join(".hidden"), b"h").unwrap();

        let mut buffer = Buffer::no_color();
        let mut o = Out::new(&mut buffer);

        let items = walk(&mut o, &folder, dir.path()).unwrap();
        let rels: BTreeSet<PathBuf> = items.into_iter().map(|item| item.rel).collect();

        assert_eq!(
            rels,
            BTreeSet::from([
                PathBuf::from("music/top.txt"),
                PathBuf::from("music/albums/deep.txt"),
                PathBuf::from("music/.hidden"),
            ])
        );
    }
}
