//! Line tokenizer of the database text.
//!
//! Splits the source into lines, tolerating both `\n` and `\r\n`, and classifies each one. Every
//! line keeps the byte range of its content, excluding the line break.

use crate::mixin::{SourceRangeMixin, SourceRangeMixinExt};

/// A classified line of the database text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// An empty or whitespace only line.
    Blank,
    /// A line starting with `#`, without the marker.
    Comment(&'a str),
    /// A `key=value` line, split on the first `=`. Both sides are trimmed.
    Entry {
        /// Text before the first `=`.
        key: &'a str,
        /// Text after the first `=`. May contain further `=`.
        value: &'a str,
    },
    /// A non-comment line without `=`.
    Malformed(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            return Self::Comment(comment);
        }
        match line.split_once('=') {
            Some((key, value)) => Self::Entry {
                key: key.trim(),
                value: value.trim(),
            },
            None => Self::Malformed(trimmed),
        }
    }
}

/// Iterator over the lines of a source text.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> Lines<'a> {
    /// Starts at the beginning of `source`.
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self { source, index: 0 }
    }

    /// Byte offset of the next line.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns `(content_end, next_index)` for the line at the current index. The content end
    /// excludes a `\r` right before the `\n`.
    fn current_line_bounds(&self) -> (usize, usize) {
        let rest = &self.source[self.index..];
        match rest.find('\n') {
            Some(newline) => {
                let end = self.index + newline;
                let content_end = if rest[..newline].ends_with('\r') {
                    end - 1
                } else {
                    end
                };
                (content_end, end + 1)
            }
            None => (self.source.len(), self.source.len()),
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = SourceRangeMixin<Line<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.source.len() {
            return None;
        }
        let start = self.index;
        let (content_end, next) = self.current_line_bounds();
        self.index = next;
        Some(Line::classify(&self.source[start..content_end]).into_wrapper_range(start..content_end))
    }
}

/// Tokenizes `source` into classified lines.
///
/// ```
/// use pvdb_rs::db::lex::{Line, lex};
///
/// let lines: Vec<_> = lex("# head\r\npv_001.bpm = 180\n").map(|line| *line.content()).collect();
/// assert_eq!(
///     lines,
///     vec![
///         Line::Comment(" head"),
///         Line::Entry { key: "pv_001.bpm", value: "180" },
///     ]
/// );
/// ```
#[must_use]
pub const fn lex(source: &str) -> Lines<'_> {
    Lines::new(source)
}

/// Splits a key of the shape `pv_<id>.<path>` into the id and the path.
///
/// ```
/// use pvdb_rs::db::lex::split_pv_key;
///
/// assert_eq!(split_pv_key("pv_042.song_name"), Some(("042", "song_name")));
/// assert_eq!(split_pv_key("pv_042"), None);
/// assert_eq!(split_pv_key("song_name"), None);
/// ```
#[must_use]
pub fn split_pv_key(key: &str) -> Option<(&str, &str)> {
    let (id, path) = key.strip_prefix("pv_")?.split_once('.')?;
    (!id.is_empty()).then_some((id, path))
}
