//! Progress reporting for the scan phase.
//!
//! The core only ever talks to the [`ScanProgress`] trait; the CLI
//! hands it an indicatif-backed [`Progress`] reporter. The callback is
//! invoked exactly once per candidate file, success or failure, with a
//! cumulative processed count against a total fixed before processing
//! begins.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Callback for scan progress.
///
/// Implementations must be thread-safe: the fingerprinting workers
/// report completion from the worker pool, in whatever order files
/// finish.
pub trait ScanProgress: Send + Sync {
    /// Called once before processing starts, with the fixed total.
    fn on_scan_start(&self, _total: usize) {}

    /// Called once per processed file with the cumulative count.
    fn on_file(&self, current: usize, total: usize, path: &str);

    /// Called once after the last file.
    fn on_scan_end(&self) {}
}

/// No-op progress sink for library callers and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ScanProgress for NullProgress {
    fn on_file(&self, _current: usize, _total: usize, _path: &str) {}
}

/// Terminal progress bar backed by indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a reporter. With `quiet` set, nothing is drawn.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ScanProgress for Progress {
    fn on_scan_start(&self, total: usize) {
        if self.quiet {
            return;
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_message("Fingerprinting");
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_file(&self, current: usize, _total: usize, path: &str) {
        if self.quiet {
            return;
        }
        if let Some(ref pb) = *self.bar.lock().unwrap() {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(path, 40));
        }
    }

    fn on_scan_end(&self) {
        if self.quiet {
            return;
        }
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_with_message("Fingerprinting complete");
        }
    }
}

/// Shorten a path for the progress message, keeping the file name.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.len() >= max_len {
        let chars: Vec<char> = file_name.chars().collect();
        let keep = max_len.saturating_sub(3).min(chars.len());
        let tail: String = chars[chars.len() - keep..].iter().collect();
        return format!("...{tail}");
    }
    format!(".../{file_name}")
}
