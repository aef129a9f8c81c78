//! Cheap checks on text that may or may not be a database.

use std::collections::HashSet;

use super::lex::{Line, lex, split_pv_key};

const MIN_LINES: usize = 5;
const KNOWN_KEY_PARTS: [&str; 4] = [".song_name", ".bpm", ".difficulty", ".performer"];

/// Counts found by [`summarize_db`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DbSummary {
    /// Distinct PV ids.
    pub songs: usize,
    /// Lines of the text, blank and comment lines included.
    pub lines: usize,
}

/// Whether `content` looks like a database: at least five lines between the first and last
/// non-blank characters, a `pv_<id>.<path>` key,
/// and a key naming one of the song name, BPM, difficulty or performer fields.
#[must_use]
pub fn looks_like_pv_db(content: &str) -> bool {
    if content.trim().split('\n').count() < MIN_LINES {
        return false;
    }
    let keys: Vec<_> = lex(content)
        .filter_map(|line| match *line.content() {
            Line::Entry { key, .. } => Some(key),
            _ => None,
        })
        .collect();
    keys.iter().any(|key| split_pv_key(key).is_some())
        && keys
            .iter()
            .any(|key| KNOWN_KEY_PARTS.iter().any(|part| key.contains(part)))
}

/// Counts the songs and lines of `content` without reading the songs.
#[must_use]
pub fn summarize_db(content: &str) -> DbSummary {
    let songs: HashSet<_> = lex(content)
        .filter_map(|line| match *line.content() {
            Line::Entry { key, .. } => split_pv_key(key).map(|(pv_id, _)| pv_id),
            _ => None,
        })
        .collect();
    DbSummary {
        songs: songs.len(),
        lines: content.split('\n').count(),
    }
}
