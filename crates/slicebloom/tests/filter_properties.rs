//! Black-box behavior of the public filter API

use proptest::collection::vec;
use proptest::prelude::*;
use slicebloom::{BloomFilter, FilterConfig, FilterError};

#[test]
fn small_filter_scenario() {
    let mut filter = BloomFilter::new(FilterConfig::new(100, 0.01)).unwrap();
    assert_eq!(filter.num_slices(), 7, "capacity 100 at p=0.01 probes 7 slices");

    for value in [&b"a"[..], b"b", b"c"] {
        filter.insert(value).unwrap();
    }

    assert!(filter.contains(b"a"));
    assert!(filter.contains(b"b"));
    assert!(filter.contains(b"c"));
    assert_eq!(filter.len(), 3);
}

#[test]
fn capacity_zero_is_rejected_at_construction() {
    let result = BloomFilter::new(FilterConfig::new(0, 0.01));
    assert!(matches!(
        result,
        Err(FilterError::InvalidConfiguration(_))
    ));
}

#[test]
fn filling_to_capacity_keeps_every_member_visible() {
    let mut filter = BloomFilter::new(FilterConfig::new(1000, 0.001)).unwrap();
    let values: Vec<Vec<u8>> = (0..1000u32).map(|i| i.to_be_bytes().to_vec()).collect();

    for value in &values {
        filter.insert(value).unwrap();
    }
    for value in &values {
        assert!(filter.contains(value), "false negative at full capacity");
    }
    assert_eq!(filter.len(), 1000);
}

#[test]
fn observed_false_positive_rate_stays_near_target() {
    let target = 0.01;
    let mut filter = BloomFilter::new(FilterConfig::new(1000, target)).unwrap();
    for i in 0..1000u32 {
        filter.insert(format!("member_{i}").as_bytes()).unwrap();
    }

    let mut false_positives = 0u32;
    let probes = 100_000u32;
    for i in 0..probes {
        if filter.contains(format!("outsider_{i}").as_bytes()) {
            false_positives += 1;
        }
    }

    let observed = f64::from(false_positives) / f64::from(probes);
    assert!(
        observed <= target * 1.5,
        "observed false-positive rate {observed} exceeds 1.5x target {target}"
    );
}

proptest! {
    #[test]
    fn prop_no_false_negatives(values in vec(vec(any::<u8>(), 0..64), 1..50)) {
        let mut filter = BloomFilter::new(FilterConfig::new(200, 0.01)).unwrap();
        for value in &values {
            filter.insert(value).unwrap();
        }
        for value in &values {
            prop_assert!(filter.contains(value), "false negative for {:?}", value);
        }
    }

    #[test]
    fn prop_round_trip_preserves_answers(
        values in vec(vec(any::<u8>(), 0..64), 1..50),
        probe in vec(any::<u8>(), 0..64),
    ) {
        let mut filter = BloomFilter::new(FilterConfig::new(200, 0.01)).unwrap();
        for value in &values {
            filter.insert(value).unwrap();
        }

        let restored = BloomFilter::from_bytes(&filter.to_bytes(), None).unwrap();

        prop_assert_eq!(restored.capacity(), filter.capacity());
        prop_assert_eq!(restored.hash_algorithm(), filter.hash_algorithm());
        prop_assert_eq!(restored.total_bits(), filter.total_bits());
        for value in &values {
            prop_assert!(restored.contains(value), "round trip lost {:?}", value);
        }
        prop_assert_eq!(restored.contains(&probe), filter.contains(&probe));
    }

    #[test]
    fn prop_insert_signals_new_bits_then_membership(value in vec(any::<u8>(), 0..64)) {
        let mut filter = BloomFilter::new(FilterConfig::new(10, 0.001)).unwrap();

        let first = filter.insert(&value).unwrap();
        let second = filter.insert(&value).unwrap();

        prop_assert!(!first, "an empty filter has no bits set yet");
        prop_assert!(second, "all bits are set after the first insert");
    }

    #[test]
    fn prop_contains_is_pure(value in vec(any::<u8>(), 0..64)) {
        let mut filter = BloomFilter::new(FilterConfig::new(50, 0.01)).unwrap();
        filter.insert(b"resident").unwrap();

        let before = (filter.len(), filter.bits_set());
        let answer = filter.contains(&value);
        for _ in 0..3 {
            prop_assert_eq!(filter.contains(&value), answer);
        }
        prop_assert_eq!((filter.len(), filter.bits_set()), before);
    }
}
