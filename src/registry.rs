//! Override registry: the authoritative tag → level list.
//!
//! An intrusive singly linked list threaded through a fixed slot arena, with
//! tag text copied into a separate fixed text arena. Brand-new tags are
//! inserted at the head; updates rewrite the level in place, so list order is
//! "first set, most recent first" rather than "most recently touched".
//!
//! Both arenas are reserved at construction. If the allocator refuses the
//! reservation they start empty and grow on demand instead, still bounded by
//! the limits. Running out of slots, text bytes or memory is reported as
//! [`RegistryError`] and leaves the registry unchanged.

use crate::config::RegistryLimits;
use crate::error::RegistryError;
use crate::hash::tag_fingerprint;
use crate::Level;

/// Index into the slot arena.
type SlotId = u32;

/// One override node.
#[derive(Clone, Copy, Debug)]
struct Slot {
    next: Option<SlotId>,
    level: Level,
    fingerprint: u64,
    start: u32,
    len: u32,
}

/// Result of a successful [`OverrideRegistry::set`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The tag was new and now heads the list.
    Inserted,
    /// An existing override was rewritten in place.
    Updated { previous: Level },
}

/// Registry of explicit per-tag overrides.
///
/// Lookups are linear in the number of overridden tags; the
/// [`LevelCache`](crate::LevelCache) exists so this walk is rare.
#[derive(Clone, Debug)]
pub struct OverrideRegistry {
    slots: Vec<Slot>,
    text: String,
    head: Option<SlotId>,
    limits: RegistryLimits,
}

impl Default for OverrideRegistry {
    fn default() -> Self {
        Self::new(RegistryLimits::DEFAULT)
    }
}

impl OverrideRegistry {
    /// Reserve both arenas up front. Limits are clamped to
    /// [`RegistryLimits::MAX`].
    pub fn new(limits: RegistryLimits) -> Self {
        let limits = limits.clamped();
        let mut slots = Vec::new();
        let mut text = String::new();
        if slots.try_reserve_exact(limits.max_overrides).is_err()
            || text.try_reserve_exact(limits.max_tag_bytes).is_err()
        {
            tracing::warn!(?limits, "cannot reserve override registry; growing on demand");
            slots = Vec::new();
            text = String::new();
        }
        Self {
            slots,
            text,
            head: None,
            limits,
        }
    }

    #[inline]
    pub fn limits(&self) -> RegistryLimits {
        self.limits
    }

    /// Number of overridden tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Text bytes still available for new tags.
    #[inline]
    pub fn remaining_text(&self) -> usize {
        self.limits.max_tag_bytes.saturating_sub(self.text.len())
    }

    /// Add or update the override for `tag`.
    ///
    /// The wildcard is not special here; [`TagLevels`](crate::TagLevels)
    /// intercepts it before the registry is consulted.
    pub fn set(&mut self, tag: &str, level: Level) -> Result<SetOutcome, RegistryError> {
        let fingerprint = tag_fingerprint(tag);
        if let Some(id) = self.find(tag, fingerprint) {
            let slot = &mut self.slots[id as usize];
            let previous = slot.level;
            slot.level = level;
            return Ok(SetOutcome::Updated { previous });
        }

        if self.slots.len() >= self.limits.max_overrides {
            return Err(RegistryError::SlotsExhausted {
                capacity: self.limits.max_overrides,
            });
        }
        let remaining = self.remaining_text();
        if tag.len() > remaining {
            return Err(RegistryError::TextExhausted {
                needed: tag.len(),
                remaining,
            });
        }

        if self.slots.try_reserve(1).is_err() || self.text.try_reserve(tag.len()).is_err() {
            return Err(RegistryError::AllocationFailed);
        }

        // both fit in u32: lengths are bounded by the clamped limits
        let start = self.text.len() as u32;
        self.text.push_str(tag);
        let id = self.slots.len() as SlotId;
        self.slots.push(Slot {
            next: self.head,
            level,
            fingerprint,
            start,
            len: tag.len() as u32,
        });
        self.head = Some(id);
        Ok(SetOutcome::Inserted)
    }

    /// Level overriding `tag`, if any. First content match wins.
    pub fn lookup(&self, tag: &str) -> Option<Level> {
        self.lookup_fingerprinted(tag, tag_fingerprint(tag))
    }

    /// [`lookup`](Self::lookup) with a fingerprint the caller already has.
    pub(crate) fn lookup_fingerprinted(&self, tag: &str, fingerprint: u64) -> Option<Level> {
        self.find(tag, fingerprint)
            .map(|id| self.slots[id as usize].level)
    }

    #[inline]
    pub fn contains(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Drop every override. Arena capacity is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.text.clear();
        self.head = None;
    }

    /// Iterate `(tag, level)` from the head: newest tag first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Level)> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let slot = &self.slots[cursor? as usize];
            cursor = slot.next;
            Some((self.text_of(slot), slot.level))
        })
    }

    fn find(&self, tag: &str, fingerprint: u64) -> Option<SlotId> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let slot = &self.slots[id as usize];
            if slot.fingerprint == fingerprint && self.text_of(slot) == tag {
                return Some(id);
            }
            cursor = slot.next;
        }
        None
    }

    #[inline]
    fn text_of(&self, slot: &Slot) -> &str {
        let start = slot.start as usize;
        &self.text[start..start + slot.len as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> OverrideRegistry {
        OverrideRegistry::new(RegistryLimits::new(3, 16))
    }

    #[test]
    fn set_and_lookup() {
        let mut reg = small();
        assert_eq!(reg.set("net", Level::Warn), Ok(SetOutcome::Inserted));
        assert_eq!(reg.lookup("net"), Some(Level::Warn));
        assert_eq!(reg.lookup("wifi"), None);
        assert!(reg.contains("net"));
    }

    #[test]
    fn update_rewrites_in_place() {
        let mut reg = small();
        reg.set("net", Level::Warn).unwrap();
        assert_eq!(
            reg.set("net", Level::Error),
            Ok(SetOutcome::Updated { previous: Level::Warn })
        );
        assert_eq!(reg.len(), 1, "no duplicate entry");
        assert_eq!(reg.lookup("net"), Some(Level::Error));
    }

    #[test]
    fn new_tags_head_insert_and_updates_keep_position() {
        let mut reg = small();
        reg.set("a", Level::Error).unwrap();
        reg.set("b", Level::Warn).unwrap();
        reg.set("c", Level::Info).unwrap();
        reg.set("a", Level::Debug).unwrap();

        let order: Vec<_> = reg.iter().collect();
        assert_eq!(
            order,
            vec![("c", Level::Info), ("b", Level::Warn), ("a", Level::Debug)]
        );
    }

    #[test]
    fn lookup_compares_content() {
        let mut reg = small();
        let owned = String::from("storage");
        reg.set(&owned, Level::Info).unwrap();
        drop(owned);
        assert_eq!(reg.lookup("storage"), Some(Level::Info));
    }

    #[test]
    fn slot_exhaustion_leaves_registry_unchanged() {
        let mut reg = small();
        for tag in ["a", "b", "c"] {
            reg.set(tag, Level::Info).unwrap();
        }
        assert_eq!(
            reg.set("d", Level::Error),
            Err(RegistryError::SlotsExhausted { capacity: 3 })
        );
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.lookup("d"), None);

        // updates need no new slot
        assert!(reg.set("a", Level::Error).is_ok());
    }

    #[test]
    fn text_exhaustion_leaves_registry_unchanged() {
        let mut reg = OverrideRegistry::new(RegistryLimits::new(8, 8));
        reg.set("abcdef", Level::Info).unwrap();
        assert_eq!(
            reg.set("xyz", Level::Info),
            Err(RegistryError::TextExhausted { needed: 3, remaining: 2 })
        );
        assert_eq!(reg.len(), 1);
        assert!(reg.set("xy", Level::Info).is_ok());
        assert_eq!(reg.remaining_text(), 0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut reg = small();
        reg.set("a", Level::Info).unwrap();
        reg.set("b", Level::Info).unwrap();
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.iter().count(), 0);
        assert_eq!(reg.remaining_text(), 16);
        assert_eq!(reg.lookup("a"), None);
    }

    #[test]
    fn huge_limits_are_clamped_and_do_not_abort() {
        let mut reg = OverrideRegistry::new(RegistryLimits::new(usize::MAX / 4, usize::MAX));
        assert_eq!(
            reg.limits(),
            RegistryLimits::new(RegistryLimits::MAX, RegistryLimits::MAX)
        );
        assert_eq!(reg.set("net", Level::Warn), Ok(SetOutcome::Inserted));
        assert_eq!(reg.set("wifi", Level::Info), Ok(SetOutcome::Inserted));
        assert_eq!(reg.lookup("net"), Some(Level::Warn));
        assert_eq!(reg.iter().count(), 2);
    }

    #[test]
    fn empty_tag_is_an_ordinary_key() {
        let mut reg = small();
        reg.set("", Level::Error).unwrap();
        assert_eq!(reg.lookup(""), Some(Level::Error));
    }
}
