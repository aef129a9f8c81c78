//! Byte range attachment for values read from source text.
//!
//! Lines, entries and warnings of the database text carry the range they were read from, so that
//! [`crate::diagnostics`] can point at them.

use std::ops::Range;

/// A value together with the byte range `[start, end)` of the source text it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRangeMixin<T> {
    content: T,
    start: usize,
    end: usize,
}

impl<T> SourceRangeMixin<T> {
    /// Wraps `content` with a range.
    pub const fn new(content: T, start: usize, end: usize) -> Self {
        Self {
            content,
            start,
            end,
        }
    }

    /// The wrapped value.
    pub const fn content(&self) -> &T {
        &self.content
    }

    /// Takes the wrapped value out.
    pub fn into_content(self) -> T {
        self.content
    }

    /// Start byte index, inclusive.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// End byte index, exclusive.
    pub const fn end(&self) -> usize {
        self.end
    }

    /// The range as `start..end`.
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Replaces the wrapped value, keeping the range.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SourceRangeMixin<U> {
        SourceRangeMixin::new(f(self.content), self.start, self.end)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for SourceRangeMixin<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at indices [{}, {})",
            self.content, self.start, self.end
        )
    }
}

impl<T: std::error::Error + 'static> std::error::Error for SourceRangeMixin<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.content)
    }
}

/// Extension to wrap any value with a range.
pub trait SourceRangeMixinExt: Sized {
    /// Wraps `self` with `range`.
    fn into_wrapper_range(self, range: Range<usize>) -> SourceRangeMixin<Self> {
        SourceRangeMixin::new(self, range.start, range.end)
    }

    /// Wraps `self` with the range of `wrapper`.
    fn into_wrapper<W>(self, wrapper: &SourceRangeMixin<W>) -> SourceRangeMixin<Self> {
        SourceRangeMixin::new(self, wrapper.start, wrapper.end)
    }
}

impl<T> SourceRangeMixinExt for T {}
