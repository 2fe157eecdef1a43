//! Filesystem locations for tape files and the body files they reference.

use std::path::{Path, PathBuf};

/// Resolves external body files against the tape root directory.
///
/// Tapes reference body files by a relative, forward-slash path so that a
/// tape directory can be committed and shared across platforms.
#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    /// Creates a resolver rooted at the given tape directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Renders a body file location as it should appear on tape.
    ///
    /// Files under the root are written relative to it; files elsewhere keep
    /// their full path. Separators are normalized to `/` either way.
    #[must_use]
    pub fn to_tape_path(&self, file: &Path) -> String {
        let path = file.strip_prefix(&self.root).unwrap_or(file);
        path.to_string_lossy().replace('\\', "/")
    }

    /// Resolves an on-tape path back to a filesystem location.
    #[must_use]
    pub fn from_tape_path(&self, tape_path: &str) -> PathBuf {
        self.root.join(tape_path)
    }
}

/// Derives the file name a tape is stored under from its name.
///
/// Runs of characters that are awkward in file names collapse to a single
/// underscore, so `"my tape"` is stored as `my_tape.yaml`.
#[must_use]
pub fn tape_file_name(tape_name: &str) -> String {
    let mut stem = String::with_capacity(tape_name.len());
    let mut gap = false;
    for c in tape_name.chars() {
        if c.is_alphanumeric() || c == '-' || c == '.' {
            if gap && !stem.is_empty() {
                stem.push('_');
            }
            gap = false;
            stem.push(c);
        } else {
            gap = true;
        }
    }
    if stem.is_empty() {
        stem.push_str("tape");
    }
    format!("{stem}.yaml")
}
