//! Scan orchestration.
//!
//! The coordinator runs the two scan passes: enumerate every candidate
//! first (fixing the progress total), then fingerprint them on a
//! bounded rayon pool. Per-file failures are collected alongside the
//! successes; only a failure to enumerate the root aborts the scan.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::{
    CoordinatorError, FingerprintExtractor, ImageRecord, ScanError, ScanErrorKind, Walker,
};
use crate::progress::ScanProgress;

/// Options for one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Walk the full subtree (`true`) or only direct children.
    pub recursive: bool,
    /// Worker threads for fingerprinting. `0` means one per CPU core.
    pub threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            threads: 0,
        }
    }
}

/// Result of one scan: fingerprinted records plus collected failures.
///
/// `records` preserves discovery order; cluster stability depends on it.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Successfully fingerprinted images, in discovery order.
    pub records: Vec<ImageRecord>,
    /// Per-file failures, in discovery order.
    pub errors: Vec<ScanError>,
}

impl ScanOutcome {
    /// True when the scan saw no candidate files at all.
    ///
    /// This is the informational "nothing found" outcome, not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.errors.is_empty()
    }

    /// Count errors per category, for summary display.
    #[must_use]
    pub fn error_counts(&self) -> HashMap<ScanErrorKind, usize> {
        let mut counts = HashMap::new();
        for err in &self.errors {
            *counts.entry(err.kind).or_insert(0) += 1;
        }
        counts
    }
}

/// Scan `root` for images with default worker sizing.
///
/// See [`scan_with`] for the full contract.
///
/// # Errors
///
/// Returns [`CoordinatorError`] if the root cannot be enumerated.
pub fn scan(
    root: &Path,
    recursive: bool,
    progress: &dyn ScanProgress,
) -> Result<ScanOutcome, CoordinatorError> {
    scan_with(
        root,
        &ScanOptions {
            recursive,
            threads: 0,
        },
        progress,
    )
}

/// Scan `root` for images.
///
/// Discovery runs first and fixes the candidate count; the progress
/// callback then fires exactly once per candidate with a cumulative
/// count, regardless of worker completion order. Fingerprinting
/// failures land in [`ScanOutcome::errors`] and never abort the scan.
///
/// # Errors
///
/// Returns [`CoordinatorError`] if the root cannot be enumerated;
/// no partial results are produced in that case.
pub fn scan_with(
    root: &Path,
    options: &ScanOptions,
    progress: &dyn ScanProgress,
) -> Result<ScanOutcome, CoordinatorError> {
    let candidates = Walker::new(root, options.recursive).discover()?;
    let total = candidates.len();

    if total == 0 {
        log::info!("no image files found under {}", root.display());
        return Ok(ScanOutcome::default());
    }

    log::info!("fingerprinting {} file(s)", total);
    progress.on_scan_start(total);

    let extractor = FingerprintExtractor::new();
    let processed = AtomicUsize::new(0);

    let fingerprint_all = || -> Vec<Result<ImageRecord, ScanError>> {
        candidates
            .par_iter()
            .map(|path| {
                let outcome = extractor.extract(path);
                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.on_file(done, total, path.to_string_lossy().as_ref());
                outcome
            })
            .collect()
    };

    let results = match options.threads {
        0 => fingerprint_all(),
        n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => pool.install(fingerprint_all),
            Err(e) => {
                log::warn!("failed to build {n}-thread pool, using global pool: {e}");
                fingerprint_all()
            }
        },
    };

    progress.on_scan_end();

    // par_iter + collect keeps input order, so both lists stay in
    // discovery order.
    let mut outcome = ScanOutcome::default();
    for result in results {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(err) => {
                log::debug!("scan error: {err}");
                outcome.errors.push(err);
            }
        }
    }

    log::info!(
        "scan complete: {} image(s), {} error(s)",
        outcome.records.len(),
        outcome.errors.len()
    );
    Ok(outcome)
}
