//! Scanner module: file discovery and image fingerprinting.
//!
//! A scan turns a directory tree into a flat set of [`ImageRecord`]s
//! (one per successfully decoded image) plus a list of [`ScanError`]s
//! (one per candidate that failed). The submodules split the work:
//!
//! - [`walker`]: candidate discovery (recursive or flat, extension filter)
//! - [`fingerprint`]: per-file perceptual hash + content digest
//! - [`coordinator`]: two-pass orchestration with parallel fingerprinting

pub mod coordinator;
pub mod fingerprint;
pub mod walker;

use std::path::PathBuf;
use std::time::SystemTime;

use image_hasher::ImageHash;
use serde::Serialize;

pub use coordinator::{scan, scan_with, ScanOptions, ScanOutcome};
pub use fingerprint::FingerprintExtractor;
pub use walker::{Walker, IMAGE_EXTENSIONS};

/// 128-bit content digest (MD5 of the raw file bytes).
///
/// Equal digests mean byte-identical files.
pub type ContentDigest = [u8; 16];

/// Render a content digest as lowercase hex.
#[must_use]
pub fn digest_hex(digest: &ContentDigest) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// One successfully fingerprinted image.
///
/// Records are created during a scan and immutable afterwards, except
/// for the caller-owned `selected` flag. Clusters refer to records by
/// index into the scan's record vector, so record order is the
/// discovery order for the whole session.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// Absolute path to the image (session-unique key).
    pub path: PathBuf,
    /// 64-bit DCT perceptual hash.
    pub fingerprint: ImageHash,
    /// MD5 digest of the exact file bytes.
    pub digest: ContentDigest,
    /// Last modification time.
    pub modified: SystemTime,
    /// File size in bytes.
    pub size: u64,
    /// Selection flag, owned by the caller. The classifier's
    /// auto-select operations set it; relocation clears it on success.
    pub selected: bool,
}

impl ImageRecord {
    /// Hamming distance between two records' perceptual hashes.
    #[must_use]
    pub fn distance(&self, other: &ImageRecord) -> u32 {
        self.fingerprint.dist(&other.fingerprint)
    }
}

/// Why a candidate file could not be fingerprinted.
///
/// The category is presentational: it shapes the message shown to the
/// operator but never changes control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    /// The file ended before the decoder expected it to.
    Truncated,
    /// The decoder recognized the format but the stream is damaged.
    CorruptStream,
    /// The file is not a supported image format.
    InvalidFormat,
    /// The file could not be read at all.
    PermissionDenied,
    /// Anything else.
    Unknown,
}

impl std::fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Truncated => "truncated",
            Self::CorruptStream => "corrupt stream",
            Self::InvalidFormat => "invalid format",
            Self::PermissionDenied => "permission denied",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A per-file scan failure. Collected, never fatal to the scan.
#[derive(Debug, Clone, thiserror::Error, Serialize)]
#[error("{path}: {kind}: {message}")]
pub struct ScanError {
    /// Path of the candidate that failed.
    pub path: PathBuf,
    /// Coarse failure category.
    pub kind: ScanErrorKind,
    /// Human-readable detail from the underlying error.
    pub message: String,
}

/// Fatal scan failure: the root itself cannot be enumerated.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// The scan root is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The scan root could not be read.
    #[error("cannot read {path}: {source}")]
    Unreadable {
        /// The scan root.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
