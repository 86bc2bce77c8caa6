//! Similarity clustering and duplicate classification.
//!
//! Records are grouped into equivalence clusters by perceptual
//! distance ([`clusterer`]), then each cluster is partitioned into
//! byte-identical versus merely similar members ([`classify`]).
//!
//! Clusters hold indices into the scan's record vector rather than
//! owning records, so the selection flags live in exactly one place.

pub mod classify;
pub mod clusterer;
pub mod unionfind;

use std::collections::HashMap;

use crate::scanner::ContentDigest;

pub use classify::{
    classify, member_status, select_identical, select_similar, MemberStatus,
};
pub use clusterer::{cluster_records, DEFAULT_THRESHOLD};
pub use unionfind::UnionFind;

/// One equivalence cluster of visually connected records.
///
/// `members` are indices into the originating record vector, in
/// discovery order. Every cluster has at least two members.
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    /// Member record indices, in discovery order.
    pub members: Vec<usize>,
    /// Occurrences of each content digest within the cluster.
    /// Derived data, filled by [`classify`].
    pub digest_counts: HashMap<ContentDigest, usize>,
}

impl Cluster {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
