//! Buffer dumps, one fixed-width line at a time.
//!
//! Both renderers are `Display` wrappers over a borrowed chunk so they can
//! be formatted straight into a line buffer without allocating.

use std::fmt;

/// Bytes rendered per dump line.
pub const BYTES_PER_LINE: usize = 16;

/// Renders bytes as lowercase hex, each followed by a space.
#[derive(Clone, Copy, Debug)]
pub struct HexChunk<'a>(pub &'a [u8]);

impl fmt::Display for HexChunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x} ")?;
        }
        Ok(())
    }
}

/// Renders bytes as characters. Anything outside printable ASCII becomes `.`.
#[derive(Clone, Copy, Debug)]
pub struct CharChunk<'a>(pub &'a [u8]);

impl fmt::Display for CharChunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        for &byte in self.0 {
            let c = if byte == b' ' || byte.is_ascii_graphic() {
                byte as char
            } else {
                '.'
            };
            f.write_char(c)?;
        }
        Ok(())
    }
}

/// Hex lines for `bytes`, [`BYTES_PER_LINE`] per line.
pub fn hex_lines(bytes: &[u8]) -> impl Iterator<Item = HexChunk<'_>> {
    bytes.chunks(BYTES_PER_LINE).map(HexChunk)
}

/// Character lines for `bytes`, [`BYTES_PER_LINE`] per line.
pub fn char_lines(bytes: &[u8]) -> impl Iterator<Item = CharChunk<'_>> {
    bytes.chunks(BYTES_PER_LINE).map(CharChunk)
}
