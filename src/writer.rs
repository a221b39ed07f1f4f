//! Serial writer: filters, formats and transmits log lines.
//!
//! The writer sits on top of a [`SharedTagLevels`]: every call resolves the
//! tag through the bounded-wait read path, and a busy lock simply skips the
//! line. Formatting happens only for lines that pass both the static
//! `local_level` ceiling and the tag's effective level.
//!
//! Rendered lines look like
//!
//! ```text
//! \x1b[0;33mW (1234) net: link down\x1b[0m\r\n
//! ```
//!
//! and are built in a fixed [`LINE_CAPACITY`]-byte buffer. Messages that do
//! not fit are cut at a character boundary; the color reset and line
//! terminator are always present.

use std::fmt::{self, Write as _};
use std::io;
use std::time::{Duration, Instant};

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::dump::{CharChunk, HexChunk, BYTES_PER_LINE};
use crate::level::should_emit;
use crate::sync::SharedTagLevels;
use crate::traits::IntoTag;
use crate::Level;

/// Size of the line buffer, including color codes and terminator.
pub const LINE_CAPACITY: usize = 256;

/// Timeout handed to the transport for each line.
pub const TRANSMIT_TIMEOUT: Duration = Duration::from_millis(100);

const COLOR_RESET: &str = "\x1b[0m";
const LINE_END: &str = "\r\n";

/// The physical output channel (UART, USB CDC, a test buffer, ...).
pub trait Transport {
    /// Send one rendered line. Failures are the transport's business; the
    /// writer never retries.
    fn transmit(&mut self, bytes: &[u8], timeout: Duration);
}

impl<W: io::Write> Transport for W {
    fn transmit(&mut self, bytes: &[u8], _timeout: Duration) {
        if let Err(error) = self.write_all(bytes) {
            tracing::trace!(%error, "log transport write failed");
        }
    }
}

/// Adapts a closure into a [`Transport`].
pub struct FnTransport<F>(pub F);

impl<F> Transport for FnTransport<F>
where
    F: FnMut(&[u8], Duration),
{
    #[inline]
    fn transmit(&mut self, bytes: &[u8], timeout: Duration) {
        (self.0)(bytes, timeout);
    }
}

/// Millisecond tick counter stamped into every line.
pub trait TickSource {
    fn now_ms(&self) -> u32;
}

impl<F: Fn() -> u32> TickSource for F {
    #[inline]
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// Ticks since construction, from the host clock. Wraps after ~49 days like
/// a 32-bit RTOS tick counter.
#[derive(Clone, Copy, Debug)]
pub struct StartInstant(Instant);

impl StartInstant {
    pub fn now() -> Self {
        Self(Instant::now())
    }
}

impl Default for StartInstant {
    fn default() -> Self {
        Self::now()
    }
}

impl TickSource for StartInstant {
    fn now_ms(&self) -> u32 {
        self.0.elapsed().as_millis() as u32
    }
}

/// What happened to one write call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The line was rendered and handed to the transport.
    Emitted { bytes: usize },
    /// Filtered out by the local ceiling or the tag's level, or an
    /// argument's `Display` impl failed while rendering.
    Suppressed,
    /// The level table was busy; the line was dropped.
    Skipped,
}

impl WriteOutcome {
    #[inline]
    pub fn is_emitted(self) -> bool {
        matches!(self, Self::Emitted { .. })
    }
}

/// Fixed-capacity line under construction.
///
/// Text past the usable capacity is dropped; `reserve` bytes at the end are
/// kept free for the trailer.
struct LineBuffer {
    bytes: [u8; LINE_CAPACITY],
    len: usize,
    limit: usize,
}

impl LineBuffer {
    const fn new() -> Self {
        Self {
            bytes: [0; LINE_CAPACITY],
            len: 0,
            limit: LINE_CAPACITY,
        }
    }

    fn start(&mut self, reserve: usize) {
        self.len = 0;
        self.limit = LINE_CAPACITY - reserve;
    }

    /// Append the trailer into the reserved tail.
    fn finish(&mut self, trailer: &str) {
        self.limit = LINE_CAPACITY;
        self.push(trailer);
    }

    fn push(&mut self, s: &str) {
        let room = self.limit - self.len;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s);
        Ok(())
    }
}

/// Filters and writes tagged log lines to a [`Transport`].
///
/// ```
/// use tag_level::{log_info, log_warn, Level, SharedTagLevels, SerialLogger};
///
/// let levels = SharedTagLevels::new();
/// levels.set_level("net", Level::Warn);
///
/// let mut logger = SerialLogger::new(&levels, Vec::new(), || 1234).with_color(false);
/// log_info!(logger, "net", "suppressed");
/// log_warn!(logger, "net", "link {} down", 2);
///
/// assert_eq!(logger.transport(), b"W (1234) net: link 2 down\r\n");
/// ```
pub struct SerialLogger<'l, 't, T, K, const C: usize = DEFAULT_CACHE_CAPACITY> {
    levels: &'l SharedTagLevels<'t, C>,
    transport: T,
    ticks: K,
    line: LineBuffer,
    local_level: Level,
    color: bool,
}

impl<'l, 't, T, K, const C: usize> SerialLogger<'l, 't, T, K, C>
where
    T: Transport,
    K: TickSource,
{
    /// Colored output, no static ceiling.
    pub fn new(levels: &'l SharedTagLevels<'t, C>, transport: T, ticks: K) -> Self {
        Self {
            levels,
            transport,
            ticks,
            line: LineBuffer::new(),
            local_level: Level::MOST_VERBOSE,
            color: true,
        }
    }

    /// Static ceiling checked before any tag resolution.
    pub fn with_local_level(mut self, level: Level) -> Self {
        self.local_level = level;
        self
    }

    /// Toggle ANSI color codes.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn local_level(&self) -> Level {
        self.local_level
    }

    #[inline]
    pub fn levels(&self) -> &'l SharedTagLevels<'t, C> {
        self.levels
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Blocking write path on the shared level table.
    pub fn set_level<'a>(&self, tag: impl IntoTag<'a>, level: Level) {
        self.levels.set_level(tag, level);
    }

    /// Filter, render and transmit one line.
    ///
    /// A line whose arguments fail to format is never transmitted.
    pub fn write(
        &mut self,
        level: Level,
        tag: impl IntoTag<'t>,
        args: fmt::Arguments<'_>,
    ) -> WriteOutcome {
        if !should_emit(level, self.local_level) {
            return WriteOutcome::Suppressed;
        }
        let tag = tag.into_tag();
        let Some(tag_level) = self.levels.effective_level(tag) else {
            return WriteOutcome::Skipped;
        };
        if !should_emit(level, tag_level) {
            return WriteOutcome::Suppressed;
        }

        let trailer_len = LINE_END.len() + if self.color { COLOR_RESET.len() } else { 0 };
        self.line.start(trailer_len);
        let ticks = self.ticks.now_ms();
        // LineBuffer itself never fails; overflow is truncation
        let rendered = if self.color {
            write!(
                self.line,
                "\x1b[0;{}m{} ({}) {}: {}",
                level.color(),
                level.letter(),
                ticks,
                tag,
                args
            )
        } else {
            write!(self.line, "{} ({}) {}: {}", level.letter(), ticks, tag, args)
        };
        if rendered.is_err() {
            tracing::debug!(%tag, "log argument failed to format; line dropped");
            return WriteOutcome::Suppressed;
        }
        if self.color {
            self.line.finish(COLOR_RESET);
            self.line.push(LINE_END);
        } else {
            self.line.finish(LINE_END);
        }

        self.transport.transmit(self.line.as_bytes(), TRANSMIT_TIMEOUT);
        WriteOutcome::Emitted {
            bytes: self.line.len,
        }
    }

    /// Log `bytes` as hex, [`BYTES_PER_LINE`] per line. Returns lines emitted.
    pub fn buffer_hex(&mut self, level: Level, tag: impl IntoTag<'t>, bytes: &[u8]) -> usize {
        let tag = tag.into_tag();
        bytes
            .chunks(BYTES_PER_LINE)
            .filter(|&chunk| {
                self.write(level, tag, format_args!("{}", HexChunk(chunk)))
                    .is_emitted()
            })
            .count()
    }

    /// Log `bytes` as characters, [`BYTES_PER_LINE`] per line.
    pub fn buffer_char(&mut self, level: Level, tag: impl IntoTag<'t>, bytes: &[u8]) -> usize {
        let tag = tag.into_tag();
        bytes
            .chunks(BYTES_PER_LINE)
            .filter(|&chunk| {
                self.write(level, tag, format_args!("{}", CharChunk(chunk)))
                    .is_emitted()
            })
            .count()
    }
}
