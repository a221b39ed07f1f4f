//! # Per-tag log level filtering (tag-level)
//!
//! Decides, for every log statement, whether a message of a given severity
//! and tag should be emitted. Built for serial loggers on constrained
//! targets: memory is bounded up front and the hot path never allocates.
//!
//! ## Design
//!
//! Three pieces of state live in one [`TagLevels`] context:
//!
//! ```text
//! ┌────────────────────┐   miss   ┌──────────────────────┐   miss   ┌───────────────┐
//! │ LevelCache (heap)  │ ───────► │ OverrideRegistry     │ ───────► │ default level │
//! │ C slots, 32-bit    │          │ arena-backed list of │          │ (wildcard)    │
//! │ level|generation   │ ◄─────── │ explicit overrides   │          │               │
//! └────────────────────┘  insert  └──────────────────────┘          └───────────────┘
//! ```
//!
//! Each cache slot packs a 3-bit level and a 29-bit generation into one
//! `u32`; the slots form a binary min-heap on generation so the root is
//! always the eviction candidate.
//!
//! ## Usage
//!
//! ```
//! use tag_level::{log_info, log_warn, Level, SerialLogger, SharedTagLevels};
//!
//! let levels = SharedTagLevels::new();
//! levels.set_level("wifi", Level::Warn);
//!
//! let mut uart = SerialLogger::new(&levels, Vec::new(), || 0);
//! log_info!(uart, "wifi", "scan done"); // filtered
//! log_warn!(uart, "wifi", "rssi {}", -90); // emitted
//! ```

pub mod cache;
pub mod config;
pub mod dump;
pub mod error;
pub mod hash;
pub mod layout;
pub mod level;
mod macros;
pub mod registry;
pub mod resolver;
pub mod snapshot;
pub mod sync;
pub mod tag;
pub mod traits;
pub mod writer;

#[cfg(feature = "bevy")]
pub mod bevy;

pub use cache::{CachedTag, LevelCache, DEFAULT_CACHE_CAPACITY};
pub use config::{LevelPreset, RegistryLimits, TagLevelsConfig, DEFAULT_MAX_WAIT, DEFAULT_MAX_WAIT_MS};
pub use dump::{char_lines, hex_lines, CharChunk, HexChunk, BYTES_PER_LINE};
pub use error::{ParseLevelError, RegistryError};
pub use hash::{fnv1a_64, tag_fingerprint};
pub use layout::{
    PackedEntry, GENERATION_BITS, GENERATION_MASK, GENERATION_MAX, LEVEL_BITS, LEVEL_MASK,
    LEVEL_SHIFT,
};
pub use level::{should_emit, Level};
pub use registry::{OverrideRegistry, SetOutcome};
pub use resolver::TagLevels;
pub use snapshot::{LevelSnapshot, SNAPSHOT_LEN};
pub use sync::SharedTagLevels;
pub use tag::{Tag, TagRef, WILDCARD};
pub use traits::IntoTag;
pub use writer::{
    FnTransport, SerialLogger, StartInstant, TickSource, Transport, WriteOutcome, LINE_CAPACITY,
    TRANSMIT_TIMEOUT,
};

pub use tag_level_macro::log_tags;
