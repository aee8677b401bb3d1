use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::config::Mode;
use crate::out::{Out, warn};

/// Input extensions the folder scan recognizes. `wma` is accepted as input
/// even though it is not offered as an output format.
pub(crate) const RECOGNIZED_EXTENSIONS: &[&str] =
    &["wav", "mp3", "flac", "aac", "ogg", "m4a", "wma"];

/// One source file selected for conversion.
pub(crate) struct Item {
    pub(crate) path: PathBuf,
    pub(crate) name: String,
    /// Lower-cased extension without the dot; empty when the file has none.
    pub(crate) ext: String,
    pub(crate) metadata: Metadata,
}

impl Item {
    fn from_path(path: PathBuf) -> Result<Self> {
        let metadata =
            fs::metadata(&path).with_context(|| format!("stat {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = extension(&path);

        Ok(Self {
            path,
            name,
            ext,
            metadata,
        })
    }
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Select the items to convert. Single mode yields the file itself even when
/// its extension is not recognized (with a warning); folder mode yields every
/// immediate child that is a regular file with a recognized extension, in
/// directory listing order.
pub(crate) fn select(
    o: &mut Out<'_>,
    root: &Path,
    mode: Mode,
    recognized: &[&str],
) -> Result<Vec<Item>> {
    match mode {
        Mode::Single => {
            if !root.is_file() {
                bail!("'{}' is not a file", root.display());
            }

            let item = Item::from_path(root.to_path_buf())?;

            if !recognized.contains(&item.ext.as_str()) {
                warn!(o, "Warning: '{}' may not be a supported audio file.", item.name);
            }

            Ok(vec![item])
        }
        Mode::Folder => {
            if !root.is_dir() {
                bail!("'{}' is not a directory", root.display());
            }

            let mut items = Vec::new();

            let entries =
                fs::read_dir(root).with_context(|| format!("list {}", root.display()))?;

            for entry in entries {
                let entry = entry?;
                let path = entry.path();

                if !path.is_file() {
                    continue;
                }

                let ext = extension(&path);

                if !recognized.contains(&ext.as_str()) {
                    continue;
                }

                items.push(Item::from_path(path)?);
            }

            Ok(items)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;

    use termcolor::Buffer;

    use super::{RECOGNIZED_EXTENSIONS, select};
    use crate::config::Mode;
    use crate::out::Out;

    #[test]
    fn folder_mode_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"a").unwrap();
        fs::write(dir.path().join("b.FLAC"), b"b").unwrap();
        fs::write(dir.path().join("notes.txt"), b"n").unwrap();
        fs::create_dir(dir.path().join("inner")).unwrap();
        fs::write(dir.path().join("inner").join("c.mp3"), b"c").unwrap();

        let mut buffer = Buffer::no_color();
        let mut o = Out::new(&mut buffer);

        let items =
            select(&mut o, dir.path(), Mode::Folder, RECOGNIZED_EXTENSIONS).unwrap();
        let names: BTreeSet<String> = items.into_iter().map(|item| item.name).collect();

        assert_eq!(
            names,
            BTreeSet::from(["a.mp3".to_string(), "b.FLAC".to_string()])
        );
    }

    #[test]
    fn single_mode_keeps_unrecognized_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("voice.xyz");
        fs::write(&file, b"data").unwrap();

        let mut buffer = Buffer::no_color();
        let mut o = Out::new(&mut buffer);

        let items = select(&mut o, &file, Mode::Single, RECOGNIZED_EXTENSIONS).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].ext, "xyz");

        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains("may not be a supported audio file"));
    }

    #[test]
    fn single_mode_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();

        let mut buffer = Buffer::no_color();
        let mut o = Out::new(&mut buffer);

        assert!(select(&mut o, dir.path(), Mode::Single, RECOGNIZED_EXTENSIONS).is_err());
    }

    #[test]
    fn folder_mode_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();

        let mut buffer = Buffer::no_color();
        let mut o = Out::new(&mut buffer);

        let missing = dir.path().join("missing");
        assert!(select(&mut o, &missing, Mode::Folder, RECOGNIZED_EXTENSIONS).is_err());
    }
}
