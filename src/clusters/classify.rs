//! Duplicate classification and retention-based auto-selection.
//!
//! Within a cluster, members sharing a content digest with at least
//! one other member are `Identical`; the rest are `Similar`. The two
//! auto-select operations mark the newer copies for relocation and
//! always leave the earliest-modified file of each group unselected.
//! They only ever touch the caller-owned selection flags, never the
//! filesystem.

use std::collections::HashMap;

use serde::Serialize;

use super::Cluster;
use crate::scanner::{ContentDigest, ImageRecord};

/// Classification of one cluster member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// At least one other member is byte-identical.
    Identical,
    /// Visually connected but a unique byte sequence.
    Similar,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identical => f.write_str("identical"),
            Self::Similar => f.write_str("similar"),
        }
    }
}

/// Count content digests across the given member indices.
fn digest_counts_for(
    members: &[usize],
    records: &[ImageRecord],
) -> HashMap<ContentDigest, usize> {
    let mut counts = HashMap::new();
    for &idx in members {
        *counts.entry(records[idx].digest).or_insert(0) += 1;
    }
    counts
}

/// Compute and attach the cluster's digest-count map.
///
/// Must run once per cluster before [`member_status`] is meaningful.
/// Re-running recomputes the same derived data.
pub fn classify<'a>(
    cluster: &'a mut Cluster,
    records: &[ImageRecord],
) -> &'a HashMap<ContentDigest, usize> {
    cluster.digest_counts = digest_counts_for(&cluster.members, records);
    &cluster.digest_counts
}

/// Status of `record` within `cluster`.
///
/// Requires [`classify`] to have populated the digest counts; an
/// unclassified cluster reports every member as `Similar`.
#[must_use]
pub fn member_status(cluster: &Cluster, record: &ImageRecord) -> MemberStatus {
    if cluster.digest_counts.get(&record.digest).copied().unwrap_or(0) > 1 {
        MemberStatus::Identical
    } else {
        MemberStatus::Similar
    }
}

/// Select the redundant byte-identical copies in a cluster.
///
/// For every digest shared by more than one member, all copies except
/// the earliest-modified are marked selected. Already-selected members
/// stay selected and are not counted again; the return value is the
/// number of newly selected records.
pub fn select_identical(cluster: &Cluster, records: &mut [ImageRecord]) -> usize {
    let mut by_digest: HashMap<ContentDigest, Vec<usize>> = HashMap::new();
    for &idx in &cluster.members {
        by_digest.entry(records[idx].digest).or_default().push(idx);
    }

    let mut newly_selected = 0;
    for group in by_digest.values_mut() {
        if group.len() < 2 {
            continue;
        }
        newly_selected += select_all_but_earliest(group, records);
    }
    log::debug!("select_identical: {newly_selected} newly selected");
    newly_selected
}

/// Select the redundant visually-similar members in a cluster.
///
/// Considers only members whose digest is unique within the cluster
/// (the `Similar` subset). If that subset has more than one member,
/// all but the earliest-modified are marked selected. Idempotent in
/// the same way as [`select_identical`].
pub fn select_similar(cluster: &Cluster, records: &mut [ImageRecord]) -> usize {
    let counts = digest_counts_for(&cluster.members, records);
    let mut singles: Vec<usize> = cluster
        .members
        .iter()
        .copied()
        .filter(|&idx| counts.get(&records[idx].digest) == Some(&1))
        .collect();

    if singles.len() < 2 {
        return 0;
    }
    let newly_selected = select_all_but_earliest(&mut singles, records);
    log::debug!("select_similar: {newly_selected} newly selected");
    newly_selected
}

/// Sort `group` by modification time (ties broken by index), leave the
/// earliest unselected, select the rest. Returns the newly set count.
fn select_all_but_earliest(group: &mut [usize], records: &mut [ImageRecord]) -> usize {
    group.sort_by_key(|&idx| (records[idx].modified, idx));
    let mut newly_selected = 0;
    for &idx in &group[1..] {
        if !records[idx].selected {
            records[idx].selected = true;
            newly_selected += 1;
        }
    }
    newly_selected
}
