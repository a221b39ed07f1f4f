//! Error types.
//!
//! None of these cross the log write path: the writer degrades to "fewer
//! logs" instead. They surface only on configuration-facing APIs.

use thiserror::Error;

/// Failure to decode a [`Level`](crate::Level).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseLevelError {
    #[error("unknown log level name '{0}'")]
    UnknownName(String),
    #[error("log level value {0} is out of range (0..=5)")]
    OutOfRange(u8),
}

/// Failure to record an override in the [`OverrideRegistry`](crate::OverrideRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Every override slot is in use.
    #[error("override registry is full ({capacity} tags)")]
    SlotsExhausted { capacity: usize },
    /// The tag text does not fit in the remaining text arena.
    #[error("override text arena cannot hold {needed} more bytes ({remaining} remaining)")]
    TextExhausted { needed: usize, remaining: usize },
    /// The allocator refused to grow an arena that could not be reserved up front.
    #[error("override registry allocation failed")]
    AllocationFailed,
}
