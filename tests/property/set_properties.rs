//! Property-based tests for ordered set guarantees

use proptest::prelude::*;
use yang_context::{Set, SetOptions};

fn dedup(values: &[u8]) -> Vec<u8> {
    let mut seen = Vec::new();
    for v in values {
        if !seen.contains(v) {
            seen.push(*v);
        }
    }
    seen
}

/// Set mode never stores duplicates and reports existing positions
#[test]
fn test_set_mode_uniqueness_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(any::<u8>(), 0..64), |values| {
            let mut set = Set::new();
            for v in &values {
                let index = set.add(*v, SetOptions::empty()).unwrap();
                assert_eq!(set[index], *v);
            }

            assert_eq!(set.as_slice(), dedup(&values).as_slice());
            for v in &values {
                let index = set.contains(v).unwrap();
                assert_eq!(set.add(*v, SetOptions::empty()).unwrap(), index);
            }

            Ok(())
        })
        .unwrap();
}

/// List mode keeps every insertion in order
#[test]
fn test_list_mode_length_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(any::<u8>(), 0..64), |values| {
            let mut set = Set::new();
            for (i, v) in values.iter().enumerate() {
                assert_eq!(set.add(*v, SetOptions::USE_AS_LIST).unwrap(), i);
            }

            assert_eq!(set.len(), values.len());
            assert_eq!(set.as_slice(), values.as_slice());

            Ok(())
        })
        .unwrap();
}

/// Removing by index moves the last item into the hole
#[test]
fn test_remove_at_swap_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(any::<u16>(), 1..32), any::<prop::sample::Index>()),
            |(values, pick)| {
                let mut set = Set::new();
                for v in &values {
                    set.add(*v, SetOptions::USE_AS_LIST).unwrap();
                }
                let index = pick.index(values.len());

                let removed = set.remove_at(index).unwrap();
                assert_eq!(removed, values[index]);
                assert_eq!(set.len(), values.len() - 1);
                if index < set.len() {
                    assert_eq!(set[index], values[values.len() - 1]);
                }
                assert!(set.remove_at(set.len()).is_err());

                Ok(())
            },
        )
        .unwrap();
}

/// Merging in set mode equals deduplicating the concatenation
#[test]
fn test_merge_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(any::<u8>(), 0..32),
                prop::collection::vec(any::<u8>(), 0..32),
            ),
            |(left, right)| {
                let mut dst: Set<u8> = left.iter().copied().collect();
                let src: Set<u8> = right.iter().copied().collect();
                let before = dst.len();

                let added = dst.merge(src, SetOptions::empty()).unwrap();

                let mut all = left.clone();
                all.extend_from_slice(&right);
                assert_eq!(dst.as_slice(), dedup(&all).as_slice());
                assert_eq!(added, dst.len() - before);

                Ok(())
            },
        )
        .unwrap();
}
