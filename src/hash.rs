//! Tag fingerprints.
//!
//! Uses FNV-1a for fast, const-compatible hashing. A fingerprint is only a
//! pre-filter: equal fingerprints are always confirmed by comparing the text.

/// FNV-1a 64-bit hash, usable in const contexts.
pub const fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0x100000001b3);
        i += 1;
    }
    hash
}

/// Fingerprint of a tag's text.
#[inline]
pub const fn tag_fingerprint(tag: &str) -> u64 {
    fnv1a_64(tag.as_bytes())
}
