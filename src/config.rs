//! Startup configuration for a [`TagLevels`](crate::TagLevels) context.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Level;

/// Default bounded wait for the read (log) path, in milliseconds.
pub const DEFAULT_MAX_WAIT_MS: u64 = 10;

/// Default bounded wait for the read (log) path.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(DEFAULT_MAX_WAIT_MS);

/// Memory budget for the override registry.
///
/// Both arenas are reserved once at construction when the allocator allows it.
/// Running out of either is the registry's allocation failure. Values above
/// [`RegistryLimits::MAX`] are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryLimits {
    /// Maximum number of distinct overridden tags.
    pub max_overrides: usize,
    /// Total bytes of tag text the registry may copy.
    pub max_tag_bytes: usize,
}

impl RegistryLimits {
    pub const DEFAULT: Self = Self {
        max_overrides: 32,
        max_tag_bytes: 512,
    };

    /// Largest usable value for either limit: slot ids and text offsets are `u32`.
    pub const MAX: usize = u32::MAX as usize;

    pub const fn new(max_overrides: usize, max_tag_bytes: usize) -> Self {
        Self {
            max_overrides,
            max_tag_bytes,
        }
    }

    /// Both limits capped at [`MAX`](Self::MAX).
    pub const fn clamped(self) -> Self {
        const fn cap(n: usize) -> usize {
            if n > RegistryLimits::MAX { RegistryLimits::MAX } else { n }
        }
        Self::new(cap(self.max_overrides), cap(self.max_tag_bytes))
    }
}

impl Default for RegistryLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A tag → level pair applied at startup.
///
/// Emitted by `log_tags!` (for tags declared with `#[level = ...]`) and by
/// the `tag-level-build` code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPreset {
    pub tag: &'static str,
    pub level: Level,
}

impl LevelPreset {
    pub const fn new(tag: &'static str, level: Level) -> Self {
        Self { tag, level }
    }
}

/// Configuration for a level context.
///
/// ```
/// use std::time::Duration;
/// use tag_level::{Level, LevelPreset, TagLevelsConfig};
///
/// const PRESETS: &[LevelPreset] = &[LevelPreset::new("net", Level::Warn)];
///
/// let config = TagLevelsConfig::new()
///     .default_level(Level::Info)
///     .max_wait(Duration::from_millis(5))
///     .presets(PRESETS);
/// assert_eq!(config.default_level, Level::Info);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagLevelsConfig {
    /// Level for tags without an override.
    pub default_level: Level,
    pub limits: RegistryLimits,
    /// Bounded wait for the read path, in milliseconds.
    pub max_wait_ms: u64,
    /// Overrides applied in order right after construction.
    #[serde(skip)]
    pub presets: &'static [LevelPreset],
}

impl TagLevelsConfig {
    pub const fn new() -> Self {
        Self {
            default_level: Level::MOST_VERBOSE,
            limits: RegistryLimits::DEFAULT,
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
            presets: &[],
        }
    }

    pub const fn default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    pub const fn limits(mut self, limits: RegistryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Durations beyond `u64::MAX` milliseconds saturate.
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait_ms = u64::try_from(max_wait.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub const fn presets(mut self, presets: &'static [LevelPreset]) -> Self {
        self.presets = presets;
        self
    }

    #[inline]
    pub const fn max_wait_duration(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}

impl Default for TagLevelsConfig {
    fn default() -> Self {
        Self::new()
    }
}
