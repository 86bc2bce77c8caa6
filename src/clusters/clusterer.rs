//! Pairwise similarity clustering.
//!
//! Every pair of records within Hamming distance `threshold` gets an
//! edge; clusters are the connected components with two or more
//! members. Connectivity is transitive by design: A-B and B-C within
//! threshold puts A and C in one cluster even when A-C alone would not
//! link. The O(n²) comparison is the deliberate baseline; callers
//! needing sub-quadratic behavior are expected to pre-bucket before
//! calling in.

use super::{Cluster, UnionFind};
use crate::scanner::ImageRecord;

/// Default Hamming distance threshold for the 64-bit pHash.
pub const DEFAULT_THRESHOLD: u32 = 10;

/// Group records into similarity clusters.
///
/// Membership order within a cluster follows the input order, and
/// clusters are emitted in order of their first member, so output is
/// stable for a given input sequence. Singleton components are
/// dropped. An empty input yields an empty cluster list.
#[must_use]
pub fn cluster_records(records: &[ImageRecord], threshold: u32) -> Vec<Cluster> {
    let n = records.len();
    if n == 0 {
        log::info!("no records to cluster");
        return Vec::new();
    }

    let mut uf = UnionFind::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if records[i].distance(&records[j]) <= threshold {
                uf.union(i, j);
            }
        }
    }

    // Assign cluster slots in first-seen order so emission order never
    // depends on hash-map iteration.
    let mut slot_of_root: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
    let mut clusters: Vec<Cluster> = Vec::new();
    for i in 0..n {
        let root = uf.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            clusters.push(Cluster::default());
            clusters.len() - 1
        });
        clusters[slot].members.push(i);
    }

    clusters.retain(|c| c.len() >= 2);

    if clusters.is_empty() {
        log::info!("no similar images found (threshold {threshold})");
    } else {
        log::info!(
            "found {} cluster(s) covering {} image(s)",
            clusters.len(),
            clusters.iter().map(Cluster::len).sum::<usize>()
        );
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_hasher::ImageHash;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn record(name: &str, hash_bytes: [u8; 8]) -> ImageRecord {
        ImageRecord {
            path: PathBuf::from(format!("/pics/{name}")),
            fingerprint: ImageHash::from_bytes(&hash_bytes).unwrap(),
            digest: [0; 16],
            modified: SystemTime::UNIX_EPOCH,
            size: 100,
            selected: false,
        }
    }

    #[test]
    fn identical_fingerprints_cluster_together() {
        let records = vec![
            record("a.png", [0; 8]),
            record("b.png", [0; 8]),
            record("c.png", [0xff; 8]),
        ];
        let clusters = cluster_records(&records, 10);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec![0, 1]);
    }

    #[test]
    fn chaining_is_transitive() {
        // dist(a,b) = 8, dist(b,c) = 9, dist(a,c) = 17.
        let a = record("a.png", [0, 0, 0, 0, 0, 0, 0, 0]);
        let b = record("b.png", [0xff, 0, 0, 0, 0, 0, 0, 0]);
        let c = record("c.png", [0xff, 0xff, 0x80, 0, 0, 0, 0, 0]);
        assert_eq!(a.distance(&b), 8);
        assert_eq!(b.distance(&c), 9);
        assert_eq!(a.distance(&c), 17);

        let clusters = cluster_records(&[a, b, c], 10);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec![0, 1, 2]);
    }

    #[test]
    fn no_singleton_clusters() {
        let records = vec![
            record("a.png", [0; 8]),
            record("b.png", [0xff; 8]),
            record("c.png", [0x0f; 8]),
        ];
        // All pairwise distances exceed the threshold.
        let clusters = cluster_records(&records, 10);
        assert!(clusters.is_empty());
    }

    #[test]
    fn unmatched_records_are_absent() {
        let records = vec![
            record("a.png", [0; 8]),
            record("b.png", [1, 0, 0, 0, 0, 0, 0, 0]),
            record("far.png", [0xff; 8]),
        ];
        let clusters = cluster_records(&records, 10);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec![0, 1]);
    }

    #[test]
    fn clusters_partition_their_members() {
        let records = vec![
            record("a.png", [0; 8]),
            record("b.png", [0; 8]),
            record("c.png", [0xff; 8]),
            record("d.png", [0xff; 8]),
            record("e.png", [0x0f, 0x0f, 0x0f, 0x0f, 0, 0, 0, 0]),
        ];
        let clusters = cluster_records(&records, 2);
        let mut seen: Vec<usize> = clusters.iter().flat_map(|c| c.members.clone()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), clusters.iter().map(Cluster::len).sum::<usize>());
        assert!(seen.iter().all(|&i| i < records.len()));
    }

    #[test]
    fn emission_order_follows_first_member() {
        let records = vec![
            record("a.png", [0xff; 8]),
            record("b.png", [0; 8]),
            record("c.png", [0xff; 8]),
            record("d.png", [0; 8]),
        ];
        let clusters = cluster_records(&records, 0);
        assert_eq!(clusters.len(), 2);
        // The cluster containing record 0 comes first.
        assert_eq!(clusters[0].members, vec![0, 2]);
        assert_eq!(clusters[1].members, vec![1, 3]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(cluster_records(&[], 10).is_empty());
    }

    #[test]
    fn zero_threshold_groups_only_exact_fingerprints() {
        let records = vec![
            record("a.png", [0; 8]),
            record("b.png", [1, 0, 0, 0, 0, 0, 0, 0]),
        ];
        assert!(cluster_records(&records, 0).is_empty());
    }
}
