//! Cache word layout: level and generation packed into one `u32`.
//!
//! ```text
//! ┌─────────┬────────────────────────────┐
//! │ Level   │ Generation                 │
//! │ 3 bits  │ 29 bits                    │
//! │ [31:29] │ [28:0]                     │
//! └─────────┴────────────────────────────┘
//! ```

use crate::Level;

/// Bits reserved for the level.
pub const LEVEL_BITS: u8 = 3;

/// Bits reserved for the generation counter.
pub const GENERATION_BITS: u8 = 29;

/// Bit position where the level is stored (bits 31:29).
pub const LEVEL_SHIFT: u8 = GENERATION_BITS;

/// Mask to extract the level from a packed word.
pub const LEVEL_MASK: u32 = ((1 << LEVEL_BITS) - 1) << LEVEL_SHIFT;

/// Mask to extract the generation from a packed word.
pub const GENERATION_MASK: u32 = (1 << GENERATION_BITS) - 1;

/// Largest generation a packed word can hold.
pub const GENERATION_MAX: u32 = GENERATION_MASK;

const _: () = {
    assert!(
        LEVEL_BITS as u32 + GENERATION_BITS as u32 == u32::BITS,
        "LEVEL_BITS + GENERATION_BITS must fill exactly one u32"
    );
    assert!(
        (Level::Verbose as u32) < (1 << LEVEL_BITS),
        "every Level must fit in LEVEL_BITS"
    );
    assert!(LEVEL_MASK & GENERATION_MASK == 0);
};

/// A cached level together with the generation it was last validated at.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedEntry(u32);

impl PackedEntry {
    /// Pack `level` and `generation`.
    ///
    /// `generation` must not exceed [`GENERATION_MAX`].
    #[inline]
    pub const fn new(level: Level, generation: u32) -> Self {
        debug_assert!(generation <= GENERATION_MAX, "generation exceeds 29 bits");
        Self(((level as u32) << LEVEL_SHIFT) | (generation & GENERATION_MASK))
    }

    #[inline]
    pub const fn level(self) -> Level {
        match Level::from_u8(((self.0 & LEVEL_MASK) >> LEVEL_SHIFT) as u8) {
            Some(level) => level,
            // only `new`/`with_*` write the level bits, always from a valid Level
            None => Level::MOST_VERBOSE,
        }
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.0 & GENERATION_MASK
    }

    #[inline]
    pub const fn with_level(self, level: Level) -> Self {
        Self::new(level, self.generation())
    }

    #[inline]
    pub const fn with_generation(self, generation: u32) -> Self {
        Self::new(self.level(), generation)
    }

    /// Raw packed bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for PackedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedEntry")
            .field("level", &self.level())
            .field("generation", &self.generation())
            .finish()
    }
}
