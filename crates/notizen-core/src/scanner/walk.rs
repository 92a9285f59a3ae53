use crate::error::Error;
use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

pub const INDEX_FILE_NAME: &str = "index.html";
pub const LIBRARY_DIR_NAME: &str = "lib";

/// Which files a scan keeps.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    pub include_hidden: bool,
    ignore_patterns: Vec<Pattern>,
}

impl ScanFilter {
    pub fn new(include_hidden: bool, ignore_globs: &[String]) -> Self {
        let ignore_patterns = ignore_globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();

        Self {
            include_hidden,
            ignore_patterns,
        }
    }

    /// `relative` is relative to the scan root.
    fn keeps(&self, relative: &Path) -> bool {
        !is_generated(relative)
            && !self
                .ignore_patterns
                .iter()
                .any(|pattern| pattern.matches_path(relative))
    }
}

/// POSIX notion of hidden: the basename starts with a dot.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Output of a previous run: the index itself or anything under `lib/`.
pub fn is_generated(relative: &Path) -> bool {
    relative == Path::new(INDEX_FILE_NAME) || relative.starts_with(LIBRARY_DIR_NAME)
}

/// Recursively lists regular files below `root`, like `find -type f`.
///
/// Hidden directories are pruned without descending into them and hidden
/// files are dropped, unless the filter includes hidden entries. The root
/// itself is always scanned. Returned paths are `root` joined with the
/// file's relative path, in file-name order.
pub fn list_files(root: &Path, filter: &ScanFilter) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            filter.include_hidden || entry.depth() == 0 || !is_hidden(entry.path())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.io_error().map(io::Error::kind) == Some(io::ErrorKind::PermissionDenied) {
                    error!(
                        "Access denied reading {}: {}",
                        err.path().unwrap_or(root).display(),
                        err
                    );
                    continue;
                }
                return Err(err.into());
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if !filter.keeps(relative) {
            debug!("Skipping {}", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new(".secret")));
        assert!(is_hidden(Path::new("notes/.git")));
        assert!(!is_hidden(Path::new("notes/readme.txt")));
        assert!(!is_hidden(Path::new("notes/a.b")));
    }

    #[test]
    fn test_is_generated() {
        assert!(is_generated(Path::new("index.html")));
        assert!(is_generated(Path::new("lib/jquery.min.js")));
        assert!(!is_generated(Path::new("library/notes.md")));
        assert!(!is_generated(Path::new("2023/index.html")));
    }

    #[test]
    fn test_list_files_prunes_hidden() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join(".git/objects/abc"), "x").unwrap();
        fs::write(root.join(".secret"), "x").unwrap();
        fs::write(root.join("readme.txt"), "x").unwrap();
        fs::write(root.join("sub/note.md"), "x").unwrap();
        fs::write(root.join("sub/.swap"), "x").unwrap();

        let files = list_files(root, &ScanFilter::default()).unwrap();
        assert_eq!(relative_names(root, &files), vec!["readme.txt", "sub/note.md"]);

        let all = list_files(root, &ScanFilter::new(true, &[])).unwrap();
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_list_files_skips_generated_and_ignored() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::create_dir_all(root.join("drafts")).unwrap();
        fs::write(root.join("index.html"), "x").unwrap();
        fs::write(root.join("lib/jquery.min.js"), "x").unwrap();
        fs::write(root.join("drafts/wip.md"), "x").unwrap();
        fs::write(root.join("keep.md"), "x").unwrap();

        let filter = ScanFilter::new(false, &["drafts/*".to_string(), "[".to_string()]);
        let files = list_files(root, &filter).unwrap();
        assert_eq!(relative_names(root, &files), vec!["keep.md"]);
    }

    #[test]
    fn test_hidden_root_is_still_scanned() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join(".notes");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.md"), "x").unwrap();

        let files = list_files(&root, &ScanFilter::default()).unwrap();
        assert_eq!(files, vec![root.join("a.md")]);
    }
}
