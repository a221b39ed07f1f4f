//! Conversions into [`TagRef`].

use crate::tag::{Tag, TagRef};

/// Anything that can name a tag for at least `'t`.
///
/// Implemented for string slices, `&String`, the static [`Tag`] produced by
/// [`log_tags!`](crate::log_tags), and [`TagRef`] itself. Static tags skip
/// hashing because their fingerprint is computed at compile time.
pub trait IntoTag<'t> {
    fn into_tag(self) -> TagRef<'t>;
}

impl<'t> IntoTag<'t> for &'t str {
    #[inline]
    fn into_tag(self) -> TagRef<'t> {
        TagRef::new(self)
    }
}

impl<'t> IntoTag<'t> for &'t String {
    #[inline]
    fn into_tag(self) -> TagRef<'t> {
        TagRef::new(self.as_str())
    }
}

impl<'t> IntoTag<'t> for Tag {
    #[inline]
    fn into_tag(self) -> TagRef<'t> {
        self.tag_ref()
    }
}

impl<'t> IntoTag<'t> for TagRef<'t> {
    #[inline]
    fn into_tag(self) -> TagRef<'t> {
        self
    }
}
