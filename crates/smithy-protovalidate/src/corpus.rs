//! Discovery and loading of the Smithy and `.proto` corpora.

use crate::error::{InjectError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every regular file under `root` whose extension equals `extension`
/// (case-sensitive, without the dot), in a stable order.
///
/// Symlinked files are followed; symlinked directories are not descended into.
pub fn collect_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = entry.map_err(|source| InjectError::Walk {
            root: root.to_path_buf(),
            source,
        })?;

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == extension);
        if matches {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| InjectError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|source| InjectError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every source file up front so both resolution passes see the same text.
pub fn load_sources(root: &Path, extension: &str) -> Result<Vec<String>> {
    collect_files(root, extension)?
        .iter()
        .map(|path| read_text(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_files_filters_by_extension_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("z.smithy"), "").unwrap();
        std::fs::write(nested.join("m.smithy"), "").unwrap();
        std::fs::write(nested.join("upper.SMITHY"), "").unwrap();
        std::fs::write(nested.join("m.proto"), "").unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();

        let files = collect_files(dir.path(), "smithy").unwrap();
        assert_eq!(files, vec![nested.join("m.smithy"), dir.path().join("z.smithy")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        let root = dir.path().join("root");
        std::fs::create_dir_all(&real).unwrap();
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(real.join("model.smithy"), "structure Msg {}\n").unwrap();
        std::os::unix::fs::symlink(real.join("model.smithy"), root.join("model.smithy")).unwrap();

        let files = collect_files(&root, "smithy").unwrap();
        assert_eq!(files, vec![root.join("model.smithy")]);
        assert_eq!(read_text(&files[0]).unwrap(), "structure Msg {}\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        let root = dir.path().join("root");
        std::fs::create_dir_all(&real).unwrap();
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(real.join("model.smithy"), "").unwrap();
        std::os::unix::fs::symlink(&real, root.join("linked")).unwrap();

        assert!(collect_files(&root, "smithy").unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_files(&dir.path().join("nope"), "proto").unwrap_err();
        assert!(matches!(err, InjectError::Walk { .. }));
    }
}
