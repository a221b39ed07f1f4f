//! Tag identities.
//!
//! Tags are compared by content. Every tag carries an FNV-1a fingerprint so
//! most mismatches are rejected with one integer comparison; a matching
//! fingerprint is confirmed by address first and then by bytes.

use std::fmt;

use crate::hash::tag_fingerprint;

/// The tag that addresses the default level instead of a single tag.
pub const WILDCARD: &str = "*";

/// A canonical static tag with a precomputed fingerprint.
///
/// Usually declared through [`log_tags!`](crate::log_tags), but can be built
/// directly in a `const`:
///
/// ```
/// use tag_level::Tag;
///
/// const NET: Tag = Tag::new("net");
/// assert_eq!(NET.name(), "net");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    name: &'static str,
    fingerprint: u64,
}

impl Tag {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            fingerprint: tag_fingerprint(name),
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn fingerprint(self) -> u64 {
        self.fingerprint
    }

    #[inline]
    pub const fn tag_ref(self) -> TagRef<'static> {
        TagRef {
            text: self.name,
            fingerprint: self.fingerprint,
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Borrowed tag text plus its fingerprint. This is what the cache stores; it
/// never owns the text.
#[derive(Clone, Copy)]
pub struct TagRef<'t> {
    text: &'t str,
    fingerprint: u64,
}

impl<'t> TagRef<'t> {
    #[inline]
    pub const fn new(text: &'t str) -> Self {
        Self {
            text,
            fingerprint: tag_fingerprint(text),
        }
    }

    /// Placeholder stored in unused cache slots.
    pub(crate) const EMPTY: TagRef<'static> = TagRef {
        text: "",
        fingerprint: tag_fingerprint(""),
    };

    #[inline]
    pub fn as_str(&self) -> &'t str {
        self.text
    }

    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.text == WILDCARD
    }

    /// Content equality; same-address text short-circuits the byte compare.
    #[inline]
    pub fn matches(&self, other: &TagRef<'_>) -> bool {
        self.fingerprint == other.fingerprint
            && (std::ptr::eq(self.text, other.text) || self.text == other.text)
    }

    /// Content equality against text with a known fingerprint.
    #[inline]
    pub(crate) fn matches_text(&self, text: &str, fingerprint: u64) -> bool {
        self.fingerprint == fingerprint && self.text == text
    }
}

impl PartialEq for TagRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for TagRef<'_> {}

impl fmt::Debug for TagRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagRef({:?})", self.text)
    }
}

impl fmt::Display for TagRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_tag_fingerprint_matches_runtime() {
        const NET: Tag = Tag::new("net");
        assert_eq!(NET.tag_ref().fingerprint(), TagRef::new("net").fingerprint());
    }

    #[test]
    fn tag_ref_builds_in_const_context() {
        const NET: TagRef<'static> = TagRef::new("net");
        assert_eq!(NET, Tag::new("net").tag_ref());
        assert_eq!(NET.fingerprint(), tag_fingerprint("net"));
    }

    #[test]
    fn equal_text_in_different_storage_matches() {
        let owned = String::from("storage");
        let a = TagRef::new(&owned);
        let b = TagRef::new("storage");
        assert!(!std::ptr::eq(a.as_str(), b.as_str()));
        assert!(a.matches(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn different_text_does_not_match() {
        assert_ne!(TagRef::new("net"), TagRef::new("nett"));
        assert_ne!(TagRef::new("net"), TagRef::new(""));
    }

    #[test]
    fn wildcard_detection() {
        assert!(TagRef::new("*").is_wildcard());
        assert!(!TagRef::new("**").is_wildcard());
    }
}
