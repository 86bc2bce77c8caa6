//! Candidate discovery.
//!
//! Discovery is the first pass of the two-pass scan: the full candidate
//! list is collected up front so the progress total is fixed before any
//! fingerprinting starts. Children are visited in file-name order so
//! the discovery order (and therefore record and cluster order) is
//! stable across runs on the same tree.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::CoordinatorError;

/// Filename extensions accepted as image candidates (case-insensitive).
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Directory walker producing the candidate file list for one scan.
#[derive(Debug)]
pub struct Walker {
    root: PathBuf,
    recursive: bool,
}

impl Walker {
    /// Create a walker over `root`.
    ///
    /// With `recursive` set, the full subtree is walked; otherwise only
    /// the direct children of `root` are listed.
    #[must_use]
    pub fn new(root: &Path, recursive: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive,
        }
    }

    /// Enumerate all candidate files under the root.
    ///
    /// Candidates are regular files whose extension is in
    /// [`IMAGE_EXTENSIONS`]. Symlinks are not followed. Unreadable
    /// subdirectories are logged and skipped; an unreadable or missing
    /// root is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError`] if the root is not a readable
    /// directory.
    pub fn discover(&self) -> Result<Vec<PathBuf>, CoordinatorError> {
        let meta =
            std::fs::metadata(&self.root).map_err(|source| CoordinatorError::Unreadable {
                path: self.root.clone(),
                source,
            })?;
        if !meta.is_dir() {
            return Err(CoordinatorError::NotADirectory(self.root.clone()));
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut candidates = Vec::new();

        for entry in WalkDir::new(&self.root)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Root-level failure aborts; anything deeper is skipped.
                    if e.path() == Some(self.root.as_path()) {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walk error"));
                        return Err(CoordinatorError::Unreadable {
                            path: self.root.clone(),
                            source,
                        });
                    }
                    log::warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if is_image_candidate(entry.path()) {
                candidates.push(entry.into_path());
            } else {
                log::trace!("not an image candidate: {}", entry.path().display());
            }
        }

        log::debug!(
            "discovered {} candidate(s) under {} (recursive: {})",
            candidates.len(),
            self.root.display(),
            self.recursive
        );
        Ok(candidates)
    }
}

/// Check whether a path has an accepted image extension.
fn is_image_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
