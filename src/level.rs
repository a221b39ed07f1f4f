//! Severity levels and the emit/suppress comparison.
//!
//! Levels are ordered from most severe (lowest value) to most verbose
//! (highest value). A tag configured at level `L` passes every message whose
//! level is `<= L`, so [`Level::None`] silences a tag completely and
//! [`Level::Verbose`] lets everything through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseLevelError;

/// Log severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    /// No output at all.
    None = 0,
    /// Critical errors the module cannot recover from on its own.
    Error = 1,
    /// Error conditions that were recovered from.
    Warn = 2,
    /// Normal flow of events.
    Info = 3,
    /// Extra information not needed for normal use (values, pointers, sizes).
    Debug = 4,
    /// Large or frequent output that can flood the channel.
    #[default]
    Verbose = 5,
}

impl Level {
    /// The most verbose level; the initial default for untagged lookups.
    pub const MOST_VERBOSE: Self = Self::Verbose;

    /// Every level, most severe first.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Verbose,
    ];

    /// Decode a level from its numeric value.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Error),
            2 => Some(Self::Warn),
            3 => Some(Self::Info),
            4 => Some(Self::Debug),
            5 => Some(Self::Verbose),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Verbose => "verbose",
        }
    }

    /// One-letter prefix used in rendered log lines.
    ///
    /// `None` never passes a filter, but a writer asked to render it falls back
    /// to the info letter.
    pub const fn letter(self) -> char {
        match self {
            Self::Error => 'E',
            Self::Warn => 'W',
            Self::Debug => 'D',
            Self::Verbose => 'V',
            Self::None | Self::Info => 'I',
        }
    }

    /// ANSI foreground color code for this level.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Error => "31",
            Self::Warn => "33",
            Self::Debug => "32",
            Self::Verbose => "34",
            Self::None | Self::Info => "37",
        }
    }

    /// Does a message at `self` pass a tag configured at `tag_level`?
    #[inline]
    pub const fn passes(self, tag_level: Self) -> bool {
        should_emit(self, tag_level)
    }
}

/// Emit iff `message_level <= tag_level`.
#[inline]
pub const fn should_emit(message_level: Level, tag_level: Level) -> bool {
    message_level as u8 <= tag_level as u8
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Level {
    type Error = ParseLevelError;

    fn try_from(value: u8) -> Result<Self, ParseLevelError> {
        Self::from_u8(value).ok_or(ParseLevelError::OutOfRange(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "none" | "n" | "off" => Self::None,
            "error" | "e" => Self::Error,
            "warn" | "warning" | "w" => Self::Warn,
            "info" | "i" => Self::Info,
            "debug" | "d" => Self::Debug,
            "verbose" | "v" => Self::Verbose,
            _ => return Err(ParseLevelError::UnknownName(s.to_string())),
        };
        Ok(level)
    }
}
