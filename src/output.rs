//! Rendering of classified clusters for the terminal and for scripts.

use std::path::Path;
use std::time::SystemTime;

use bytesize::ByteSize;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clusters::{member_status, Cluster, MemberStatus};
use crate::scanner::{digest_hex, ImageRecord, ScanError};

/// One cluster member in the JSON report.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// File path.
    pub path: String,
    /// Identical (byte-duplicate) or similar.
    pub status: MemberStatus,
    /// File size in bytes.
    pub size: u64,
    /// Modification time, RFC 3339.
    pub modified: String,
    /// Hex MD5 content digest.
    pub digest: String,
    /// Base64 perceptual hash.
    pub fingerprint: String,
    /// Current selection flag.
    pub selected: bool,
}

/// One cluster in the JSON report.
#[derive(Debug, Serialize)]
pub struct ClusterReport {
    /// 1-based cluster number, in emission order.
    pub id: usize,
    /// Member files, in discovery order.
    pub files: Vec<FileReport>,
}

/// Top-level JSON report.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Scan root.
    pub root: String,
    /// Similarity threshold used.
    pub threshold: u32,
    /// Number of successfully fingerprinted images.
    pub scanned: usize,
    /// Similarity clusters.
    pub clusters: Vec<ClusterReport>,
    /// Per-file scan failures.
    pub errors: Vec<ScanError>,
}

fn format_mtime(t: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(t)
}

/// Build the serializable report.
#[must_use]
pub fn build_report(
    root: &Path,
    threshold: u32,
    records: &[ImageRecord],
    clusters: &[Cluster],
    errors: &[ScanError],
) -> Report {
    let clusters = clusters
        .iter()
        .enumerate()
        .map(|(i, cluster)| ClusterReport {
            id: i + 1,
            files: cluster
                .members
                .iter()
                .map(|&idx| {
                    let r = &records[idx];
                    FileReport {
                        path: r.path.display().to_string(),
                        status: member_status(cluster, r),
                        size: r.size,
                        modified: format_mtime(r.modified).to_rfc3339(),
                        digest: digest_hex(&r.digest),
                        fingerprint: r.fingerprint.to_base64(),
                        selected: r.selected,
                    }
                })
                .collect(),
        })
        .collect();

    Report {
        root: root.display().to_string(),
        threshold,
        scanned: records.len(),
        clusters,
        errors: errors.to_vec(),
    }
}

/// Render the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns a serialization error if the report cannot be encoded.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Render a human-readable cluster listing.
#[must_use]
pub fn render_text(
    records: &[ImageRecord],
    clusters: &[Cluster],
    errors: &[ScanError],
) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for (i, cluster) in clusters.iter().enumerate() {
        let _ = writeln!(out, "Cluster {} ({} files)", i + 1, cluster.len());
        for &idx in &cluster.members {
            let r = &records[idx];
            let mark = if r.selected { 'x' } else { ' ' };
            let _ = writeln!(
                out,
                "  [{mark}] {:<9} {:>10}  {}  {}",
                member_status(cluster, r).to_string(),
                ByteSize(r.size).to_string(),
                format_mtime(r.modified).format("%Y-%m-%d %H:%M:%S"),
                r.path.display()
            );
        }
        out.push('\n');
    }

    if !errors.is_empty() {
        let _ = writeln!(out, "{} file(s) could not be scanned:", errors.len());
        for err in errors {
            let _ = writeln!(out, "  {err}");
        }
    }
    out
}
