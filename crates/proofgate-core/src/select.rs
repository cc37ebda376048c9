//! # File Selection — Deterministic Artifact Walks
//!
//! Gate stages operate over the repository's tracked text artifacts,
//! discovered by filesystem traversal. [`FileSelector`] holds the
//! selection predicate: an extension allowlist, an explicit dotfile
//! allowlist, and a set of build/VCS directory names that are pruned
//! from the walk entirely.
//!
//! Selection is allowlist-based. A file with an unknown extension is not
//! scanned, but a file that is selected and later turns out to be
//! undecodable is a violation for the stage that reads it, never a
//! silent skip.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error raised while walking a directory tree.
#[derive(Error, Debug)]
pub enum SelectError {
    /// A directory in scope could not be read.
    #[error("cannot read directory {dir}: {source}")]
    ReadDir {
        /// The directory that failed to enumerate.
        dir: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Extensions selected by the default predicate: the text formats that
/// appear in a proof repository.
const DEFAULT_EXTENSIONS: &[&str] = &[
    "cfg", "ini", "json", "jsonl", "lock", "md", "py", "regex", "rs", "sh", "toml", "txt",
    "yaml", "yml",
];

/// Dotfiles scanned despite having no (or a leading-dot) extension.
const DEFAULT_DOTFILES: &[&str] = &[".editorconfig", ".gitattributes", ".gitignore"];

/// Directory names pruned from every walk: VCS internals and build output.
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git", ".venv", "__pycache__", "build", "dist", "node_modules", "target",
];

/// Selection predicate plus deterministic recursive walk.
///
/// Immutable once constructed. The sets are ordered so that membership
/// checks and iteration are stable across runs.
#[derive(Debug, Clone)]
pub struct FileSelector {
    extensions: BTreeSet<String>,
    dotfiles: BTreeSet<String>,
    excluded_dirs: BTreeSet<String>,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSIONS.iter().copied(),
            DEFAULT_DOTFILES.iter().copied(),
            DEFAULT_EXCLUDED_DIRS.iter().copied(),
        )
    }
}

impl FileSelector {
    /// Construct a selector from explicit allowlists and exclusions.
    ///
    /// Extensions are matched without their leading dot and
    /// case-insensitively. Dotfile names and excluded directory names are
    /// matched exactly against the final path component.
    pub fn new<E, D, X>(extensions: E, dotfiles: D, excluded_dirs: X) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
        X: IntoIterator,
        X::Item: Into<String>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.into().to_ascii_lowercase())
                .collect(),
            dotfiles: dotfiles.into_iter().map(Into::into).collect(),
            excluded_dirs: excluded_dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a file path is selected for scanning.
    ///
    /// Dotfiles are only selected if they appear in the dotfile allowlist;
    /// other files are selected by extension. A file with no extension is
    /// never selected.
    pub fn selects(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with('.') {
            return self.dotfiles.contains(name);
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.contains(&ext.to_ascii_lowercase()),
            None => false,
        }
    }

    /// Whether a directory name is pruned from the walk.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }

    /// Recursively collect every selected file under `root`.
    ///
    /// Excluded directories are pruned without descending. The result is
    /// sorted lexicographically, which fixes the scan order and therefore
    /// the receipt line order for every stage built on this walk.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::ReadDir`] if any in-scope directory cannot
    /// be enumerated. An unreadable directory is a hard failure, not a
    /// skip: the guard must not pass a tree it could not fully see.
    pub fn select_files(&self, root: &Path) -> Result<Vec<PathBuf>, SelectError> {
        let mut files = Vec::new();
        self.walk(root, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn walk(&self, dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), SelectError> {
        let entries = fs::read_dir(dir).map_err(|source| SelectError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| SelectError::ReadDir {
                dir: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if !self.is_excluded_dir(&name) {
                    self.walk(&path, acc)?;
                }
            } else if self.selects(&path) {
                acc.push(path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_by_extension_allowlist() {
        let selector = FileSelector::default();
        assert!(selector.selects(Path::new("proofs/run.jsonl")));
        assert!(selector.selects(Path::new("schemas/event.schema.json")));
        assert!(selector.selects(Path::new("README.md")));
        assert!(!selector.selects(Path::new("logo.png")));
        assert!(!selector.selects(Path::new("tool.pyc")));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let selector = FileSelector::default();
        assert!(selector.selects(Path::new("NOTES.MD")));
        assert!(selector.selects(Path::new("data.JSON")));
    }

    #[test]
    fn file_without_extension_is_not_selected() {
        let selector = FileSelector::default();
        assert!(!selector.selects(Path::new("Makefile")));
        assert!(!selector.selects(Path::new("LICENSE")));
    }

    #[test]
    fn dotfiles_require_explicit_allowlisting() {
        let selector = FileSelector::default();
        assert!(selector.selects(Path::new(".gitignore")));
        assert!(!selector.selects(Path::new(".env")));
        assert!(!selector.selects(Path::new(".DS_Store")));
    }

    #[test]
    fn excluded_dirs_are_pruned() {
        let selector = FileSelector::default();
        assert!(selector.is_excluded_dir(".git"));
        assert!(selector.is_excluded_dir("target"));
        assert!(!selector.is_excluded_dir("schemas"));
    }

    #[test]
    fn select_files_walks_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("b")).unwrap();
        std::fs::create_dir_all(root.join("a")).unwrap();
        std::fs::write(root.join("b/z.json"), b"{}").unwrap();
        std::fs::write(root.join("a/y.jsonl"), b"{}").unwrap();
        std::fs::write(root.join("top.md"), b"# hi").unwrap();
        std::fs::write(root.join("skip.bin"), b"\x00").unwrap();

        let files = FileSelector::default().select_files(root).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["a/y.jsonl", "b/z.json", "top.md"]);
    }

    #[test]
    fn select_files_prunes_excluded_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::create_dir_all(root.join("target/debug")).unwrap();
        std::fs::write(root.join(".git/config.txt"), b"x").unwrap();
        std::fs::write(root.join("target/debug/out.json"), b"{}").unwrap();
        std::fs::write(root.join("kept.json"), b"{}").unwrap();

        let files = FileSelector::default().select_files(root).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("kept.json"));
    }

    #[test]
    fn select_files_missing_root_is_an_error() {
        let err = FileSelector::default()
            .select_files(Path::new("/tmp/proofgate-no-such-root-xyz"))
            .unwrap_err();
        assert!(matches!(err, SelectError::ReadDir { .. }));
    }

    #[test]
    fn select_files_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for name in ["c.json", "a.json", "b.json"] {
            std::fs::write(root.join(name), b"{}").unwrap();
        }
        let selector = FileSelector::default();
        let first = selector.select_files(root).unwrap();
        let second = selector.select_files(root).unwrap();
        assert_eq!(first, second);
    }
}
