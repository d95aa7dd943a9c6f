//! Property-based tests for canonical archive determinism

use blockmap::archive::Archive;
use blockmap::types::{Digest, DIGEST_LEN};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn entries() -> impl Strategy<Value = BTreeMap<String, [u8; DIGEST_LEN]>> {
    prop::collection::btree_map("[a-z0-9_./-]{1,24}", any::<[u8; DIGEST_LEN]>(), 0..24)
}

proptest! {
    /// Insertion order never changes the canonical bytes
    #[test]
    fn test_marshal_independent_of_order(map in entries(), seed in any::<u64>()) {
        let mut pairs: Vec<(String, Digest)> = map.into_iter().collect();
        let forward: Archive = pairs.iter().cloned().collect();

        // Deterministic shuffle driven by the seed
        let len = pairs.len();
        if len > 1 {
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                pairs.swap(i, j);
            }
        }
        let mut shuffled = Archive::new();
        for (path, digest) in pairs {
            shuffled.insert(path, digest);
        }

        prop_assert_eq!(
            forward.marshal_canonical().unwrap(),
            shuffled.marshal_canonical().unwrap()
        );
    }

    /// Canonical bytes parse back to the same archive
    #[test]
    fn test_unmarshal_round_trip(map in entries()) {
        let archive: Archive = map.into_iter().collect();
        let bytes = archive.marshal_canonical().unwrap();
        let parsed = Archive::unmarshal_canonical(&bytes).unwrap();
        prop_assert_eq!(&parsed, &archive);
        prop_assert_eq!(parsed.marshal_canonical().unwrap(), bytes);
    }
}
