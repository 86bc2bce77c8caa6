//! Property tests for the clustering invariants.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::SystemTime;

use image_hasher::ImageHash;
use imgdupe::clusters::cluster_records;
use imgdupe::scanner::ImageRecord;
use proptest::prelude::*;

fn record_with(bytes: [u8; 8], i: usize) -> ImageRecord {
    ImageRecord {
        path: PathBuf::from(format!("/fake/{i}.png")),
        fingerprint: ImageHash::from_bytes(&bytes).unwrap(),
        digest: [i as u8; 16],
        modified: SystemTime::UNIX_EPOCH,
        size: 1,
        selected: false,
    }
}

proptest! {
    #[test]
    fn clusters_partition_and_have_no_singletons(
        hashes in prop::collection::vec(any::<[u8; 8]>(), 0..40),
        threshold in 0u32..=16,
    ) {
        let records: Vec<ImageRecord> = hashes
            .iter()
            .enumerate()
            .map(|(i, &bytes)| record_with(bytes, i))
            .collect();

        let clusters = cluster_records(&records, threshold);

        let mut seen = HashSet::new();
        for cluster in &clusters {
            // No singleton clusters.
            prop_assert!(cluster.len() >= 2);
            for &idx in &cluster.members {
                prop_assert!(idx < records.len());
                // Each record appears in at most one cluster.
                prop_assert!(seen.insert(idx));
                // Every member has an in-cluster partner within threshold.
                let has_partner = cluster.members.iter().any(|&j| {
                    j != idx && records[idx].distance(&records[j]) <= threshold
                });
                prop_assert!(has_partner);
            }
        }

        // Records outside every cluster have no partner at all.
        for i in 0..records.len() {
            if !seen.contains(&i) {
                let no_partner = (0..records.len()).all(|j| {
                    j == i || records[i].distance(&records[j]) > threshold
                });
                prop_assert!(no_partner);
            }
        }
    }

    #[test]
    fn clustering_is_deterministic(
        hashes in prop::collection::vec(any::<[u8; 8]>(), 0..30),
        threshold in 0u32..=16,
    ) {
        let records: Vec<ImageRecord> = hashes
            .iter()
            .enumerate()
            .map(|(i, &bytes)| record_with(bytes, i))
            .collect();

        let first = cluster_records(&records, threshold);
        let second = cluster_records(&records, threshold);

        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(&a.members, &b.members);
        }
    }

    #[test]
    fn membership_order_follows_input_order(
        hashes in prop::collection::vec(any::<[u8; 8]>(), 0..30),
        threshold in 0u32..=16,
    ) {
        let records: Vec<ImageRecord> = hashes
            .iter()
            .enumerate()
            .map(|(i, &bytes)| record_with(bytes, i))
            .collect();

        for cluster in cluster_records(&records, threshold) {
            let mut sorted = cluster.members.clone();
            sorted.sort_unstable();
            prop_assert_eq!(cluster.members, sorted);
        }
    }
}
