//! Resolution cache: a fixed binary min-heap keyed by generation.
//!
//! The cache maps a bounded subset of tags to their last-known level. Slots
//! form a complete binary tree (`C = 2^n - 1`), heap-ordered on a
//! monotonically increasing generation, so index 0 always holds the entry
//! validated longest ago: the eviction candidate.
//!
//! ## Fill and steady state
//!
//! While fewer than `C` entries exist, new entries are appended. Generations
//! are handed out in increasing order, so every appended entry is at least as
//! new as its parent and the heap property holds without any sifting. Hits
//! during this phase do not touch generations.
//!
//! Once full, a hit stamps the entry with the next generation and sinks it
//! toward the leaves, and a miss overwrites the root and sinks the newcomer.
//! Recency is therefore approximate: right after the cache fills, entries
//! keep their fill-order generations even if they were hit during the fill,
//! so the first eviction round may pick a recently used tag. This happens at
//! most once per cache lifetime.

use crate::layout::{PackedEntry, GENERATION_MAX};
use crate::tag::TagRef;
use crate::Level;

/// Default number of cached tags.
pub const DEFAULT_CACHE_CAPACITY: usize = 31;

/// One cache slot: a borrowed tag and its packed level/generation.
#[derive(Clone, Copy, Debug)]
pub struct CachedTag<'t> {
    tag: TagRef<'t>,
    entry: PackedEntry,
}

impl<'t> CachedTag<'t> {
    const EMPTY: Self = Self {
        tag: TagRef::EMPTY,
        entry: PackedEntry::new(Level::None, 0),
    };

    #[inline]
    pub fn tag(&self) -> TagRef<'t> {
        self.tag
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.entry.level()
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.entry.generation()
    }
}

/// Bounded tag → level cache.
///
/// `C` must be of the form `2^n - 1` with `n >= 2`; anything else fails to
/// compile when the cache is constructed.
#[derive(Clone, Debug)]
pub struct LevelCache<'t, const C: usize = DEFAULT_CACHE_CAPACITY> {
    slots: [CachedTag<'t>; C],
    len: usize,
    next_generation: u32,
}

impl<'t, const C: usize> LevelCache<'t, C> {
    /// Compile-time shape check: a complete binary tree of at least 3 nodes.
    const SHAPE_OK: () = assert!(
        C >= 3 && (C + 1).is_power_of_two(),
        "cache capacity must be 2^n - 1 with n >= 2"
    );

    pub const fn new() -> Self {
        let () = Self::SHAPE_OK;
        Self {
            slots: [CachedTag::EMPTY; C],
            len: 0,
            next_generation: 0,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        C
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == C
    }

    /// The generation the next write or validation will receive.
    #[inline]
    pub const fn next_generation(&self) -> u32 {
        self.next_generation
    }

    /// Live entries in array (heap) order.
    pub fn iter(&self) -> impl Iterator<Item = &CachedTag<'t>> + '_ {
        self.slots[..self.len].iter()
    }

    /// Generation stored at `index`, if that slot is live.
    pub fn generation_of(&self, index: usize) -> Option<u32> {
        self.live().get(index).map(CachedTag::generation)
    }

    /// Look `tag` up. On a hit in a full cache, the entry becomes the newest
    /// and sinks away from the root.
    pub fn try_get(&mut self, tag: &TagRef<'_>) -> Option<Level> {
        let index = self.position(tag)?;
        let level = self.slots[index].level();

        if self.is_full() {
            let generation = self.take_generation();
            self.slots[index].entry = self.slots[index].entry.with_generation(generation);
            self.bubble_down(index);
        }
        Some(level)
    }

    /// Cache `tag` at `level`, evicting the root if full.
    ///
    /// Returns the evicted tag, if any. The caller guarantees `tag` is not
    /// already cached.
    pub fn insert(&mut self, tag: TagRef<'t>, level: Level) -> Option<TagRef<'t>> {
        let generation = self.take_generation();
        let fresh = CachedTag {
            tag,
            entry: PackedEntry::new(level, generation),
        };

        if self.len < C {
            self.slots[self.len] = fresh;
            self.len += 1;
            return None;
        }

        let evicted = std::mem::replace(&mut self.slots[0], fresh).tag;
        self.bubble_down(0);
        Some(evicted)
    }

    /// Patch the cached level of a tag whose override changed.
    ///
    /// Generations are left alone: a level change is not a use.
    pub fn update_level(&mut self, text: &str, fingerprint: u64, level: Level) -> bool {
        match self
            .live()
            .iter()
            .position(|slot| slot.tag.matches_text(text, fingerprint))
        {
            Some(index) => {
                self.slots[index].entry = self.slots[index].entry.with_level(level);
                true
            }
            None => false,
        }
    }

    /// Forget every entry and restart generations at zero.
    pub fn clear(&mut self) {
        self.len = 0;
        self.next_generation = 0;
    }

    /// Sink the entry at `index` while it is newer than its smaller child.
    ///
    /// Descends only while `index` has two children (`index < C / 2`); with
    /// `C = 2^n - 1` that single bound keeps both child indices in range. Only
    /// used once the cache is full, so every child slot is live.
    pub fn bubble_down(&mut self, mut index: usize) {
        while index < C / 2 {
            let left = index * 2 + 1;
            let right = left + 1;
            let next = if self.slots[left].generation() < self.slots[right].generation() {
                left
            } else {
                right
            };
            if self.slots[index].generation() <= self.slots[next].generation() {
                break;
            }
            self.slots.swap(index, next);
            index = next;
        }
    }

    /// Does every parent with two children hold a generation no newer than
    /// either child?
    pub fn heap_is_valid(&self) -> bool {
        (0..self.len / 2).all(|parent| {
            let left = parent * 2 + 1;
            let right = left + 1;
            let generation = self.slots[parent].generation();
            generation <= self.slots[left].generation()
                && (right >= self.len || generation <= self.slots[right].generation())
        })
    }

    #[inline]
    fn live(&self) -> &[CachedTag<'t>] {
        &self.slots[..self.len]
    }

    fn position(&self, tag: &TagRef<'_>) -> Option<usize> {
        self.live().iter().position(|slot| slot.tag.matches(tag))
    }

    /// Hand out the next generation, renumbering first if the 29-bit field
    /// is about to overflow.
    fn take_generation(&mut self) -> u32 {
        if self.next_generation > GENERATION_MAX {
            self.renumber();
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Replace live generations by their rank. Relative order is preserved,
    /// so the heap property survives; the counter continues from `len`.
    fn renumber(&mut self) {
        let mut order: [usize; C] = std::array::from_fn(|i| i);
        let live = &mut order[..self.len];
        live.sort_unstable_by_key(|&i| self.slots[i].generation());
        for (rank, &index) in live.iter().enumerate() {
            self.slots[index].entry = self.slots[index].entry.with_generation(rank as u32);
        }
        self.next_generation = self.len as u32;
        tracing::trace!(entries = self.len, "cache generations renumbered");
    }

    #[cfg(test)]
    fn set_next_generation(&mut self, generation: u32) {
        self.next_generation = generation;
    }
}

impl<const C: usize> Default for LevelCache<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}
