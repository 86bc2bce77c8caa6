//! Per-file fingerprinting: perceptual hash plus content digest.
//!
//! The extractor decodes the image once for the 64-bit DCT pHash, and
//! independently streams the raw bytes through MD5 so byte-identical
//! copies can later be told apart from merely similar ones. Files are
//! never loaded whole into memory for the digest.

use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use image::ImageError;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use md5::{Digest, Md5};

use super::{ContentDigest, ImageRecord, ScanError, ScanErrorKind};

/// Chunk size for streaming the content digest.
const DIGEST_CHUNK: usize = 64 * 1024;

/// Computes an [`ImageRecord`] for a single file.
///
/// Construction precomputes the DCT coefficient tables, so one
/// extractor should be shared across a whole scan. It is `Sync` and
/// safe to use from the fingerprinting worker pool.
pub struct FingerprintExtractor {
    hasher: Hasher,
}

impl FingerprintExtractor {
    /// Create an extractor using the 64-bit DCT pHash configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: HasherConfig::new()
                .hash_alg(HashAlg::Median)
                .preproc_dct()
                .to_hasher(),
        }
    }

    /// Fingerprint one file.
    ///
    /// Reads the file twice: once through the image decoder for the
    /// perceptual hash, once as raw bytes for the digest. No side
    /// effects beyond reading.
    ///
    /// # Errors
    ///
    /// Returns a categorized [`ScanError`] if the file cannot be read
    /// or decoded.
    pub fn extract(&self, path: &Path) -> Result<ImageRecord, ScanError> {
        let metadata = std::fs::metadata(path).map_err(|e| ScanError {
            path: path.to_path_buf(),
            kind: classify_io_kind(e.kind()),
            message: e.to_string(),
        })?;
        let modified = metadata.modified().unwrap_or(std::time::UNIX_EPOCH);

        let img = image::open(path).map_err(|e| ScanError {
            path: path.to_path_buf(),
            kind: classify_image_error(&e),
            message: e.to_string(),
        })?;
        let fingerprint = self.hasher.hash_image(&img);
        drop(img);

        let digest = stream_digest(path).map_err(|e| ScanError {
            path: path.to_path_buf(),
            kind: classify_io_kind(e.kind()),
            message: e.to_string(),
        })?;

        Ok(ImageRecord {
            path: path.to_path_buf(),
            fingerprint,
            digest,
            modified,
            size: metadata.len(),
            selected: false,
        })
    }
}

impl Default for FingerprintExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream a file through MD5 in fixed-size chunks.
fn stream_digest(path: &Path) -> io::Result<ContentDigest> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; DIGEST_CHUNK];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().into())
}

/// Map a decode failure to a coarse category using the structured
/// error variants, never the message text. Unmatched cases fall back
/// to [`ScanErrorKind::Unknown`].
fn classify_image_error(err: &ImageError) -> ScanErrorKind {
    match err {
        ImageError::IoError(e) => classify_io_kind(e.kind()),
        ImageError::Unsupported(_) => ScanErrorKind::InvalidFormat,
        ImageError::Decoding(_) => {
            if chain_has_unexpected_eof(err) {
                ScanErrorKind::Truncated
            } else {
                ScanErrorKind::CorruptStream
            }
        }
        _ => ScanErrorKind::Unknown,
    }
}

/// Map a raw I/O failure to a coarse category.
fn classify_io_kind(kind: io::ErrorKind) -> ScanErrorKind {
    match kind {
        io::ErrorKind::PermissionDenied => ScanErrorKind::PermissionDenied,
        io::ErrorKind::UnexpectedEof => ScanErrorKind::Truncated,
        _ => ScanErrorKind::Unknown,
    }
}

/// Walk the error source chain looking for an EOF-shaped I/O error.
fn chain_has_unexpected_eof(err: &dyn StdError) -> bool {
    let mut source = err.source();
    while let Some(e) = source {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::UnexpectedEof {
                return true;
            }
        }
        source = e.source();
    }
    false
}
