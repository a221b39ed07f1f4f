//! Resolver: the level context callers consult on every log statement.
//!
//! [`TagLevels`] owns the override registry, the resolution cache and the
//! default level as one unit of state. It is a plain value: whoever
//! configures logging creates it, and concurrent callers go through
//! [`SharedTagLevels`](crate::SharedTagLevels).

use crate::cache::{LevelCache, DEFAULT_CACHE_CAPACITY};
use crate::config::{LevelPreset, RegistryLimits, TagLevelsConfig};
use crate::error::RegistryError;
use crate::level::should_emit;
use crate::registry::OverrideRegistry;
use crate::snapshot::LevelSnapshot;
use crate::traits::IntoTag;
use crate::Level;

/// Tag → effective level resolution.
///
/// ```
/// use tag_level::{Level, TagLevels};
///
/// let mut levels = TagLevels::new();
/// levels.set_level("net", Level::Warn);
///
/// assert_eq!(levels.effective_level("net"), Level::Warn);
/// assert_eq!(levels.effective_level("wifi"), Level::Verbose);
///
/// levels.set_level("*", Level::Error);
/// assert_eq!(levels.effective_level("net"), Level::Error);
/// ```
#[derive(Clone, Debug)]
pub struct TagLevels<'t, const C: usize = DEFAULT_CACHE_CAPACITY> {
    registry: OverrideRegistry,
    cache: LevelCache<'t, C>,
    default_level: Level,
}

impl<const C: usize> Default for TagLevels<'_, C> {
    fn default() -> Self {
        Self::with_limits(RegistryLimits::DEFAULT)
    }
}

impl<'t> TagLevels<'t> {
    /// Empty context with the default cache capacity: no overrides, default
    /// level [`Level::Verbose`].
    pub fn new() -> Self {
        Self::default()
    }

    /// [`with_config`](Self::with_config) at the default cache capacity.
    pub fn from_config(config: &TagLevelsConfig) -> Self {
        Self::with_config(config)
    }
}

impl<'t, const C: usize> TagLevels<'t, C> {
    pub fn with_limits(limits: RegistryLimits) -> Self {
        Self {
            registry: OverrideRegistry::new(limits),
            cache: LevelCache::new(),
            default_level: Level::MOST_VERBOSE,
        }
    }

    /// Build from configuration, then apply its presets in order.
    pub fn with_config(config: &TagLevelsConfig) -> Self {
        let mut levels = Self::with_limits(config.limits);
        levels.default_level = config.default_level;
        levels.apply_presets(config.presets);
        levels
    }

    #[inline]
    pub fn default_level(&self) -> Level {
        self.default_level
    }

    #[inline]
    pub fn overrides(&self) -> &OverrideRegistry {
        &self.registry
    }

    #[inline]
    pub fn cache(&self) -> &LevelCache<'t, C> {
        &self.cache
    }

    /// Set the level for `tag`; `"*"` resets everything to `level`.
    ///
    /// Never fails visibly. If the registry has no room for a new tag the
    /// request is dropped and the tag keeps resolving as before.
    pub fn set_level<'a>(&mut self, tag: impl IntoTag<'a>, level: Level) {
        let tag = tag.into_tag();
        if let Err(error) = self.try_set_level(tag, level) {
            tracing::warn!(tag = tag.as_str(), %level, %error, "dropping log level override");
        }
    }

    /// [`set_level`](Self::set_level), reporting registry exhaustion.
    pub fn try_set_level<'a>(
        &mut self,
        tag: impl IntoTag<'a>,
        level: Level,
    ) -> Result<(), RegistryError> {
        let tag = tag.into_tag();
        if tag.is_wildcard() {
            self.reset(level);
            return Ok(());
        }

        let outcome = self.registry.set(tag.as_str(), level)?;
        let patched = self.cache.update_level(tag.as_str(), tag.fingerprint(), level);
        tracing::trace!(tag = tag.as_str(), %level, ?outcome, patched, "log level override set");
        Ok(())
    }

    /// Apply presets in order through [`set_level`](Self::set_level).
    pub fn apply_presets(&mut self, presets: &[LevelPreset]) {
        for preset in presets {
            self.set_level(preset.tag, preset.level);
        }
    }

    /// Effective level for `tag`: cached, overridden, or the default.
    ///
    /// Misses are cached too, so tags that were never overridden also
    /// resolve without walking the registry next time.
    pub fn effective_level(&mut self, tag: impl IntoTag<'t>) -> Level {
        let tag = tag.into_tag();
        if let Some(level) = self.cache.try_get(&tag) {
            return level;
        }

        let level = self
            .registry
            .lookup_fingerprinted(tag.as_str(), tag.fingerprint())
            .unwrap_or(self.default_level);
        if let Some(evicted) = self.cache.insert(tag, level) {
            tracing::trace!(tag = tag.as_str(), evicted = evicted.as_str(), "level cache eviction");
        }
        level
    }

    /// Should a message at `message_level` tagged `tag` be emitted?
    #[inline]
    pub fn should_emit(&mut self, message_level: Level, tag: impl IntoTag<'t>) -> bool {
        should_emit(message_level, self.effective_level(tag))
    }

    /// Counters describing the current state.
    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot::new(
            self.default_level,
            self.cache.len(),
            C,
            self.registry.len(),
            self.cache.next_generation(),
        )
    }

    fn reset(&mut self, level: Level) {
        self.default_level = level;
        self.registry.clear();
        self.cache.clear();
        tracing::debug!(%level, "log levels reset by wildcard");
    }
}
