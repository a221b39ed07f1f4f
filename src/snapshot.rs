//! Fixed-layout state counters for a level context.
//!
//! A snapshot is 16 plain bytes so it can be pushed through the same
//! constrained channel as the log output and decoded on the host side.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Level;

/// Wire size of a [`LevelSnapshot`].
pub const SNAPSHOT_LEN: usize = 16;

/// Counters describing a [`TagLevels`](crate::TagLevels) context.
///
/// ```
/// use tag_level::{Level, LevelSnapshot, TagLevels};
/// use zerocopy::{FromBytes, IntoBytes};
///
/// let mut levels = TagLevels::new();
/// levels.set_level("net", Level::Warn);
/// levels.effective_level("net");
///
/// let bytes = levels.snapshot().as_bytes().to_vec();
/// let decoded = LevelSnapshot::read_from_bytes(&bytes).unwrap();
/// assert_eq!(decoded.overrides(), 1);
/// assert_eq!(decoded.cached(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct LevelSnapshot {
    next_generation: u32,
    overrides: u16,
    cached: u16,
    capacity: u16,
    default_level: u8,
    _reserved: [u8; 5],
}

const _: () = assert!(size_of::<LevelSnapshot>() == SNAPSHOT_LEN);

impl LevelSnapshot {
    /// Counts above `u16::MAX` saturate.
    pub fn new(
        default_level: Level,
        cached: usize,
        capacity: usize,
        overrides: usize,
        next_generation: u32,
    ) -> Self {
        let clamp = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
        Self {
            next_generation,
            overrides: clamp(overrides),
            cached: clamp(cached),
            capacity: clamp(capacity),
            default_level: default_level.as_u8(),
            _reserved: [0; 5],
        }
    }

    /// Decoded default level; `None` if the byte was corrupted in transit.
    #[inline]
    pub fn default_level(&self) -> Option<Level> {
        Level::from_u8(self.default_level)
    }

    #[inline]
    pub fn cached(&self) -> u16 {
        self.cached
    }

    #[inline]
    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    #[inline]
    pub fn overrides(&self) -> u16 {
        self.overrides
    }

    #[inline]
    pub fn next_generation(&self) -> u32 {
        self.next_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_through_bytes() {
        let snapshot = LevelSnapshot::new(Level::Warn, 3, 31, 7, 42);
        let bytes = snapshot.as_bytes();
        assert_eq!(bytes.len(), SNAPSHOT_LEN);

        let decoded = LevelSnapshot::read_from_bytes(bytes).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.default_level(), Some(Level::Warn));
        assert_eq!(decoded.capacity(), 31);
        assert_eq!(decoded.next_generation(), 42);
    }

    #[test]
    fn counts_saturate() {
        let snapshot = LevelSnapshot::new(Level::Info, 0, 0, 1 << 20, 0);
        assert_eq!(snapshot.overrides(), u16::MAX);
    }

    #[test]
    fn corrupted_level_byte_is_rejected() {
        let mut bytes = [0u8; SNAPSHOT_LEN];
        bytes[10] = 9;
        let decoded = LevelSnapshot::read_from_bytes(&bytes[..]).unwrap();
        assert_eq!(decoded.default_level(), None);
    }

    #[test]
    fn short_buffer_fails_to_decode() {
        assert!(LevelSnapshot::read_from_bytes(&[0u8; 4][..]).is_err());
    }
}
