//! Shared access to a level context.
//!
//! The registry, cache and default level form one critical section behind a
//! single mutex with two acquisition modes:
//!
//! - the write path ([`SharedTagLevels::set_level`]) waits as long as it takes,
//!   because losing a level change silently is worse than a short stall;
//! - the read path ([`SharedTagLevels::effective_level`]) waits at most
//!   `max_wait` and gives up, so a log statement never stalls its caller. A
//!   missed acquisition drops that one message; nothing is queued or retried.
//!
//! Calling the write path while the same thread already holds the lock
//! deadlocks; see [`SharedTagLevels::with_levels`].

use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::config::{TagLevelsConfig, DEFAULT_MAX_WAIT};
use crate::level::should_emit;
use crate::resolver::TagLevels;
use crate::traits::IntoTag;
use crate::Level;

/// A [`TagLevels`] behind one mutex with blocking writes and bounded reads.
#[derive(Debug)]
pub struct SharedTagLevels<'t, const C: usize = DEFAULT_CACHE_CAPACITY> {
    inner: Mutex<TagLevels<'t, C>>,
    max_wait: Duration,
}

impl<'t> SharedTagLevels<'t> {
    /// Empty context at the default cache capacity and wait bound.
    pub fn new() -> Self {
        Self::from_levels(TagLevels::new(), DEFAULT_MAX_WAIT)
    }

    pub fn from_config(config: &TagLevelsConfig) -> Self {
        Self::with_config(config)
    }
}

impl<const C: usize> Default for SharedTagLevels<'_, C> {
    fn default() -> Self {
        Self::from_levels(TagLevels::default(), DEFAULT_MAX_WAIT)
    }
}

impl<'t, const C: usize> SharedTagLevels<'t, C> {
    pub fn from_levels(levels: TagLevels<'t, C>, max_wait: Duration) -> Self {
        Self {
            inner: Mutex::new(levels),
            max_wait,
        }
    }

    pub fn with_config(config: &TagLevelsConfig) -> Self {
        Self::from_levels(TagLevels::with_config(config), config.max_wait_duration())
    }

    /// Bounded wait used by the read path.
    #[inline]
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Write path: blocks until the lock is held, then applies the change.
    pub fn set_level<'a>(&self, tag: impl IntoTag<'a>, level: Level) {
        self.inner.lock().set_level(tag, level);
    }

    /// Read path: `None` if the lock could not be taken within `max_wait`.
    pub fn effective_level(&self, tag: impl IntoTag<'t>) -> Option<Level> {
        let tag = tag.into_tag();
        match self.inner.try_lock_for(self.max_wait) {
            Some(mut levels) => Some(levels.effective_level(tag)),
            None => {
                tracing::trace!(tag = tag.as_str(), "log level lock busy; skipping message");
                None
            }
        }
    }

    /// Should a message be emitted? `false` when the lock was not acquired.
    pub fn should_log(&self, message_level: Level, tag: impl IntoTag<'t>) -> bool {
        self.effective_level(tag)
            .is_some_and(|tag_level| should_emit(message_level, tag_level))
    }

    /// Run `f` with exclusive access, waiting without bound.
    ///
    /// Do not call back into `self` from `f`: the mutex is not reentrant.
    pub fn with_levels<R>(&self, f: impl FnOnce(&mut TagLevels<'t, C>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn into_inner(self) -> TagLevels<'t, C> {
        self.inner.into_inner()
    }
}
