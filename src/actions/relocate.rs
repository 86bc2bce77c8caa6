//! Bulk relocation and deletion of selected records.
//!
//! Both operations run the whole batch: a failing file is reported and
//! left selected on disk, and processing continues. Moves never
//! overwrite; a taken destination name gets a numeric suffix before
//! the extension (`photo.jpg`, `photo_1.jpg`, ...). On success the
//! record's selection flag is cleared; the in-memory records are
//! otherwise untouched and callers are expected to re-scan or discard
//! relocated entries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::ImageRecord;

/// A per-file move/delete failure. Collected, never fatal to the batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileOpError {
    /// Source path of the record that failed.
    pub path: PathBuf,
    /// Human-readable failure detail.
    pub message: String,
}

impl std::fmt::Display for FileOpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Aggregate result of a batch move or delete.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Files successfully moved or deleted.
    pub completed: usize,
    /// Complete list of per-file failures.
    pub errors: Vec<FileOpError>,
    /// Bytes moved or freed.
    pub bytes: u64,
}

impl BatchOutcome {
    /// True when every attempted file succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// One-line summary for the operator.
    #[must_use]
    pub fn summary(&self, verb: &str) -> String {
        if self.all_succeeded() {
            format!("{verb} {} file(s), {} bytes", self.completed, self.bytes)
        } else {
            format!(
                "{verb} {} file(s), {} failed, {} bytes",
                self.completed,
                self.errors.len(),
                self.bytes
            )
        }
    }
}

/// Move every selected record into `dest_dir`.
///
/// Destination names are collision-safe: an occupied name is probed
/// with `_1`, `_2`, ... suffixes until a free slot is found. Each
/// successful move clears that record's selection flag; failures leave
/// the record selected and in place.
pub fn move_selected(records: &mut [ImageRecord], dest_dir: &Path) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for record in records.iter_mut().filter(|r| r.selected) {
        let Some(file_name) = record.path.file_name() else {
            outcome.errors.push(FileOpError {
                path: record.path.clone(),
                message: "path has no file name".to_string(),
            });
            continue;
        };

        let dest = collision_free_dest(dest_dir, Path::new(file_name));
        match fs::rename(&record.path, &dest) {
            Ok(()) => {
                log::info!("moved {} -> {}", record.path.display(), dest.display());
                record.selected = false;
                outcome.completed += 1;
                outcome.bytes += record.size;
            }
            Err(e) => {
                log::error!("failed to move {}: {e}", record.path.display());
                outcome.errors.push(FileOpError {
                    path: record.path.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    log::info!("{}", outcome.summary("moved"));
    outcome
}

/// Permanently delete every selected record.
///
/// There is no trash: deletion is irreversible, so the caller must
/// pass its already-obtained confirmation. An unconfirmed call is a
/// no-op. Each successful delete clears that record's selection flag;
/// failures leave the record selected and on disk.
pub fn delete_selected(records: &mut [ImageRecord], confirmed: bool) -> BatchOutcome {
    if !confirmed {
        log::warn!("delete not confirmed, nothing removed");
        return BatchOutcome::default();
    }

    let mut outcome = BatchOutcome::default();
    for record in records.iter_mut().filter(|r| r.selected) {
        match fs::remove_file(&record.path) {
            Ok(()) => {
                log::info!("deleted {}", record.path.display());
                record.selected = false;
                outcome.completed += 1;
                outcome.bytes += record.size;
            }
            Err(e) => {
                log::error!("failed to delete {}: {e}", record.path.display());
                outcome.errors.push(FileOpError {
                    path: record.path.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    log::info!("{}", outcome.summary("deleted"));
    outcome
}

/// Find a free destination path for `file_name` inside `dir`.
///
/// Probes `name.ext`, then `name_1.ext`, `name_2.ext`, ... until an
/// unoccupied name is found.
fn collision_free_dest(dir: &Path, file_name: &Path) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = file_name.extension().map(|e| e.to_string_lossy().into_owned());

    for n in 1u32.. {
        let name = match &ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("suffix probing exhausted u32 range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_hasher::ImageHash;
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn record_for(path: PathBuf, selected: bool) -> ImageRecord {
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        ImageRecord {
            path,
            fingerprint: ImageHash::from_bytes(&[0; 8]).unwrap(),
            digest: [0; 16],
            modified: SystemTime::UNIX_EPOCH,
            size,
            selected,
        }
    }

    #[test]
    fn collision_suffix_probes_sequentially() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("photo.jpg"), b"0").unwrap();
        fs::write(dir.path().join("photo_1.jpg"), b"1").unwrap();

        let dest = collision_free_dest(dir.path(), Path::new("photo.jpg"));
        assert_eq!(dest, dir.path().join("photo_2.jpg"));
    }

    #[test]
    fn free_name_is_used_as_is() {
        let dir = tempdir().unwrap();
        let dest = collision_free_dest(dir.path(), Path::new("photo.jpg"));
        assert_eq!(dest, dir.path().join("photo.jpg"));
    }

    #[test]
    fn move_two_same_named_files_never_overwrites() {
        let src_a = tempdir().unwrap();
        let src_b = tempdir().unwrap();
        let dest = tempdir().unwrap();

        let a = src_a.path().join("photo.jpg");
        let b = src_b.path().join("photo.jpg");
        fs::write(&a, b"contents a").unwrap();
        fs::write(&b, b"contents b").unwrap();

        let mut records = vec![record_for(a.clone(), true), record_for(b.clone(), true)];
        let outcome = move_selected(&mut records, dest.path());

        assert_eq!(outcome.completed, 2);
        assert!(outcome.all_succeeded());
        assert!(!a.exists());
        assert!(!b.exists());
        assert_eq!(
            fs::read(dest.path().join("photo.jpg")).unwrap(),
            b"contents a"
        );
        assert_eq!(
            fs::read(dest.path().join("photo_1.jpg")).unwrap(),
            b"contents b"
        );
        assert!(records.iter().all(|r| !r.selected));
    }

    #[test]
    fn move_skips_unselected_records() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let a = src.path().join("keep.jpg");
        fs::write(&a, b"kept").unwrap();

        let mut records = vec![record_for(a.clone(), false)];
        let outcome = move_selected(&mut records, dest.path());
        assert_eq!(outcome.completed, 0);
        assert!(a.exists());
    }

    #[test]
    fn failed_move_keeps_record_selected() {
        let dest = tempdir().unwrap();
        let mut records = vec![record_for(PathBuf::from("/nonexistent/ghost.jpg"), true)];

        let outcome = move_selected(&mut records, dest.path());
        assert_eq!(outcome.completed, 0);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].path, PathBuf::from("/nonexistent/ghost.jpg"));
        assert!(records[0].selected);
    }

    #[test]
    fn delete_removes_selected_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"aa").unwrap();
        fs::write(&b, b"bb").unwrap();

        let mut records = vec![record_for(a.clone(), true), record_for(b.clone(), false)];
        let outcome = delete_selected(&mut records, true);

        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.bytes, 2);
        assert!(!a.exists());
        assert!(b.exists());
        assert!(!records[0].selected);
    }

    #[test]
    fn unconfirmed_delete_is_a_noop() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        fs::write(&a, b"aa").unwrap();

        let mut records = vec![record_for(a.clone(), true)];
        let outcome = delete_selected(&mut records, false);

        assert_eq!(outcome.completed, 0);
        assert!(outcome.all_succeeded());
        assert!(a.exists());
        assert!(records[0].selected);
    }

    #[test]
    fn delete_continues_past_failures() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let c = dir.path().join("c.jpg");
        fs::write(&a, b"aa").unwrap();
        fs::write(&c, b"cc").unwrap();

        let mut records = vec![
            record_for(a.clone(), true),
            record_for(dir.path().join("missing.jpg"), true),
            record_for(c.clone(), true),
        ];
        let outcome = delete_selected(&mut records, true);

        assert_eq!(outcome.completed, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(!a.exists());
        assert!(!c.exists());
        assert!(!records[0].selected);
        assert!(records[1].selected);
        assert!(!records[2].selected);
    }

    #[cfg(unix)]
    #[test]
    fn delete_permission_failure_is_partial() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked_dir = dir.path().join("locked");
        fs::create_dir(&locked_dir).unwrap();
        let locked = locked_dir.join("x.jpg");
        let free_a = dir.path().join("a.jpg");
        let free_b = dir.path().join("b.jpg");
        fs::write(&locked, b"xx").unwrap();
        fs::write(&free_a, b"aa").unwrap();
        fs::write(&free_b, b"bb").unwrap();

        // Read-only directory: unlink inside it fails.
        let probe = locked_dir.join("probe.jpg");
        fs::write(&probe, b"p").unwrap();
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o555)).unwrap();
        if fs::remove_file(&probe).is_ok() {
            // Running with privileges that ignore directory permissions.
            fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut records = vec![
            record_for(free_a.clone(), true),
            record_for(locked.clone(), true),
            record_for(free_b.clone(), true),
        ];
        let outcome = delete_selected(&mut records, true);

        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(outcome.completed, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].path, locked);
        assert!(!free_a.exists());
        assert!(!free_b.exists());
        assert!(locked.exists());
        assert!(records[1].selected);
    }

    #[test]
    fn summary_wording() {
        let ok = BatchOutcome {
            completed: 2,
            errors: Vec::new(),
            bytes: 10,
        };
        assert_eq!(ok.summary("moved"), "moved 2 file(s), 10 bytes");

        let partial = BatchOutcome {
            completed: 1,
            errors: vec![FileOpError {
                path: PathBuf::from("/x"),
                message: "denied".to_string(),
            }],
            bytes: 5,
        };
        assert_eq!(partial.summary("deleted"), "deleted 1 file(s), 1 failed, 5 bytes");
    }
}
