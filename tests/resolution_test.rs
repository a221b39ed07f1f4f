//! End-to-end resolution behavior through the public API.

use tag_level::{Level, LevelCache, RegistryLimits, TagLevels, TagRef};

fn cached_tags(cache: &LevelCache<'_, 3>) -> Vec<(String, Level, u32)> {
    let mut tags: Vec<_> = cache
        .iter()
        .map(|slot| (slot.tag().as_str().to_owned(), slot.level(), slot.generation()))
        .collect();
    tags.sort_by_key(|(_, _, generation)| *generation);
    tags
}

#[test]
fn fourth_tag_evicts_the_oldest() {
    let mut cache = LevelCache::<3>::new();
    assert_eq!(cache.insert(TagRef::new("a"), Level::Error), None);
    assert_eq!(cache.insert(TagRef::new("b"), Level::Warn), None);
    assert_eq!(cache.insert(TagRef::new("c"), Level::Info), None);
    assert_eq!(cache.generation_of(0), Some(0));

    let evicted = cache.insert(TagRef::new("d"), Level::Debug).unwrap();
    assert_eq!(evicted.as_str(), "a");
    assert!(cache.heap_is_valid());
    assert_eq!(
        cached_tags(&cache),
        vec![
            ("b".to_owned(), Level::Warn, 1),
            ("c".to_owned(), Level::Info, 2),
            ("d".to_owned(), Level::Debug, 3),
        ]
    );
}

#[test]
fn updating_an_override_replaces_it() {
    let mut levels = TagLevels::new();
    levels.set_level("net", Level::Warn);
    assert_eq!(levels.effective_level("net"), Level::Warn);

    levels.set_level("net", Level::Error);
    assert_eq!(levels.effective_level("net"), Level::Error);
    assert_eq!(levels.overrides().len(), 1);
}

#[test]
fn unknown_tag_follows_wildcard_default() {
    let mut levels = TagLevels::new();
    assert_eq!(levels.effective_level("x"), Level::Verbose);

    levels.set_level("*", Level::Error);
    assert_eq!(levels.effective_level("x"), Level::Error);
}

#[test]
fn repeated_lookups_are_stable() {
    let mut levels = TagLevels::new();
    levels.set_level("net", Level::Info);
    let first = levels.effective_level("net");
    for _ in 0..100 {
        assert_eq!(levels.effective_level("net"), first);
    }
}

#[test]
fn override_wins_over_default_until_wildcard() {
    let mut levels = TagLevels::new();
    levels.set_level("*", Level::Warn);
    levels.set_level("net", Level::Debug);
    assert_eq!(levels.effective_level("net"), Level::Debug);
    assert_eq!(levels.effective_level("wifi"), Level::Warn);

    levels.set_level("*", Level::Info);
    assert_eq!(levels.effective_level("net"), Level::Info);
    assert!(levels.overrides().is_empty());
}

#[test]
fn evicted_override_is_reloaded_from_registry() {
    let mut levels = TagLevels::<3>::default();
    levels.set_level("net", Level::Error);
    assert_eq!(levels.effective_level("net"), Level::Error);

    for tag in ["a", "b", "c", "d", "e"] {
        levels.effective_level(tag);
    }
    assert!(!levels.cache().iter().any(|slot| slot.tag().as_str() == "net"));
    assert_eq!(levels.effective_level("net"), Level::Error);
}

#[test]
fn cache_never_exceeds_capacity() {
    let names: Vec<String> = (0..100).map(|i| format!("tag{i}")).collect();
    let mut levels = TagLevels::<7>::default();
    for name in &names {
        levels.effective_level(name.as_str());
        assert!(levels.cache().len() <= 7);
        assert!(levels.cache().heap_is_valid());
    }
    assert!(levels.cache().is_full());
}

#[test]
fn none_silences_every_message() {
    let mut levels = TagLevels::new();
    levels.set_level("quiet", Level::None);
    for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Verbose] {
        assert!(!levels.should_emit(level, "quiet"));
    }
}

#[test]
fn exhausted_registry_keeps_existing_overrides() {
    let mut levels = TagLevels::<3>::with_limits(RegistryLimits::new(2, 512));
    levels.set_level("a", Level::Error);
    levels.set_level("b", Level::Warn);
    levels.set_level("c", Level::Info);

    assert_eq!(levels.effective_level("a"), Level::Error);
    assert_eq!(levels.effective_level("b"), Level::Warn);
    assert_eq!(levels.effective_level("c"), Level::Verbose);

    // updates to existing tags still succeed
    levels.set_level("a", Level::Debug);
    assert_eq!(levels.effective_level("a"), Level::Debug);
}
