//! Property tests for the resolution cache and resolver.

use proptest::prelude::*;
use tag_level::{Level, LevelCache, RegistryLimits, TagLevels, TagRef};

const TAGS: [&str; 12] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "net", "wifi", "ble", "uart",
];

#[derive(Debug, Clone)]
enum Op {
    Lookup(usize),
    Set(usize, u8),
    Reset(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..TAGS.len()).prop_map(Op::Lookup),
        3 => (0..TAGS.len(), 0u8..=5).prop_map(|(t, l)| Op::Set(t, l)),
        1 => (0u8..=5).prop_map(Op::Reset),
    ]
}

fn level(raw: u8) -> Level {
    Level::from_u8(raw).unwrap()
}

proptest! {
    #[test]
    fn heap_order_and_bounds_hold(ops in prop::collection::vec(op(), 1..300)) {
        let mut levels = TagLevels::<7>::with_limits(RegistryLimits::DEFAULT);
        for op in ops {
            match op {
                Op::Lookup(t) => { levels.effective_level(TAGS[t]); }
                Op::Set(t, l) => levels.set_level(TAGS[t], level(l)),
                Op::Reset(l) => levels.set_level("*", level(l)),
            }
            prop_assert!(levels.cache().len() <= 7);
            prop_assert!(levels.cache().heap_is_valid());
        }
    }

    #[test]
    fn resolution_matches_a_plain_model(ops in prop::collection::vec(op(), 1..300)) {
        let mut levels = TagLevels::<3>::default();
        let mut model_default = Level::Verbose;
        let mut model: std::collections::HashMap<&str, Level> = Default::default();

        for op in ops {
            match op {
                Op::Lookup(t) => {
                    let expected = model.get(TAGS[t]).copied().unwrap_or(model_default);
                    prop_assert_eq!(levels.effective_level(TAGS[t]), expected);
                }
                Op::Set(t, l) => {
                    levels.set_level(TAGS[t], level(l));
                    model.insert(TAGS[t], level(l));
                }
                Op::Reset(l) => {
                    levels.set_level("*", level(l));
                    model.clear();
                    model_default = level(l);
                }
            }
        }
    }

    #[test]
    fn cached_entries_are_distinct(lookups in prop::collection::vec(0..TAGS.len(), 1..200)) {
        let mut levels = TagLevels::<7>::default();
        for t in lookups {
            levels.effective_level(TAGS[t]);
            let mut seen: Vec<&str> = levels.cache().iter().map(|s| s.tag().as_str()).collect();
            let len = seen.len();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), len);
        }
    }

    #[test]
    fn eviction_removes_the_oldest_entry(lookups in prop::collection::vec(0..TAGS.len(), 1..400)) {
        let mut cache = LevelCache::<7>::new();
        for t in lookups {
            let tag = TagRef::new(TAGS[t]);
            if cache.try_get(&tag).is_some() {
                continue;
            }
            let oldest = if cache.is_full() {
                cache.iter().min_by_key(|s| s.generation()).map(|s| s.tag().as_str())
            } else {
                None
            };
            let evicted = cache.insert(tag, Level::Info).map(|t| t.as_str());
            prop_assert_eq!(evicted, oldest);
            prop_assert!(cache.heap_is_valid());
        }
    }
}
