//! Reads songs back from the database text.
//!
//! Real world files are often partial, so missing or unreadable keys fall back to defaults instead
//! of failing. [`parse_db_strict`] reports every fallback as a [`ValidationWarning`].

use std::{collections::HashMap, ops::Range};

use itertools::Itertools;
use thiserror::Error;

use super::lex::{Line, lex, split_pv_key};
use crate::{
    level::FALLBACK_TOKEN,
    mixin::{SourceRangeMixin, SourceRangeMixinExt},
    model::{
        CreditRole, DEFAULT_PERFORMER, DifficultyEntry, DifficultyKind, MAX_PERFORMERS, Song,
        Variant,
    },
};

/// Upper bound of `another_song.length` accepted from a file.
pub const MAX_VARIANTS: usize = 999;

const DEFAULT_BPM: u32 = 120;
const DEFAULT_DATE: &str = "20250101";
const DEFAULT_SABI: &str = "30.0";
const DEFAULT_SORT_INDEX: u32 = 50;
const EXTRA_FALLBACK_TOKEN: &str = "PV_LV_09_0";

/// A fallback taken while reading the database text.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationWarning {
    /// A line is neither blank, a comment nor `key=value`.
    #[error("line `{line}` has no `=` and was skipped")]
    MalformedLine {
        /// The trimmed line.
        line: String,
    },
    /// A PV id is not a decimal number. It is ordered before every numeric id.
    #[error("PV id `{pv_id}` is not numeric")]
    NonNumericPvId {
        /// The id.
        pv_id: String,
    },
    /// A key is missing and its default was used.
    #[error("pv_{pv_id}.{key} is missing, using `{default}`")]
    MissingKey {
        /// The id of the song.
        pv_id: String,
        /// The key, without the `pv_<id>.` prefix.
        key: String,
        /// The value used instead.
        default: String,
    },
    /// A value could not be read as a number and its default was used.
    #[error("pv_{pv_id}.{key} has a non-numeric value `{value}`, using `{default}`")]
    InvalidNumber {
        /// The id of the song.
        pv_id: String,
        /// The key, without the `pv_<id>.` prefix.
        key: String,
        /// The rejected value.
        value: String,
        /// The value used instead.
        default: String,
    },
    /// A count was larger than supported and was clamped.
    #[error("pv_{pv_id}.{key} is {value}, clamped to {limit}")]
    Clamped {
        /// The id of the song.
        pv_id: String,
        /// The key, without the `pv_<id>.` prefix.
        key: String,
        /// The original count.
        value: i64,
        /// The count used instead.
        limit: usize,
    },
    /// The text has no `pv_<id>.` key at all.
    #[error("no PV entries found")]
    NoPvEntries,
}

/// A [`ValidationWarning`] with the byte range of the line it is about.
pub type ValidationWarningWithRange = SourceRangeMixin<ValidationWarning>;

/// Songs read from the database text, with the fallbacks that were taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbParseOutput {
    /// Songs in ascending PV id order.
    pub songs: Vec<Song>,
    /// Fallbacks, in the order they were taken.
    pub warnings: Vec<ValidationWarningWithRange>,
}

/// Reads songs from the database text, silently using defaults for missing keys.
///
/// ```
/// use pvdb_rs::db::parse_db;
///
/// let songs = parse_db("pv_042.song_name=Test\n");
/// assert_eq!(songs.len(), 1);
/// assert_eq!(songs[0].pv_id, "042");
/// assert_eq!(songs[0].bpm, 120);
/// assert!(songs[0].difficulties.is_empty());
/// ```
#[must_use]
pub fn parse_db(source: &str) -> Vec<Song> {
    parse_db_strict(source).songs
}

/// Reads songs from the database text, reporting every default that was used.
#[must_use]
pub fn parse_db_strict(source: &str) -> DbParseOutput {
    let mut warnings = vec![];
    let mut blocks: HashMap<&str, Block> = HashMap::new();

    for line in lex(source) {
        let range = line.as_range();
        match *line.content() {
            Line::Blank | Line::Comment(_) => {}
            Line::Malformed(text) => warnings.push(
                ValidationWarning::MalformedLine {
                    line: text.to_string(),
                }
                .into_wrapper_range(range),
            ),
            Line::Entry { key, value } => {
                let Some((pv_id, path)) = split_pv_key(key) else {
                    continue;
                };
                blocks
                    .entry(pv_id)
                    .or_insert_with(|| Block::new(range.clone()))
                    .entries
                    .insert(path, value.into_wrapper_range(range));
            }
        }
    }

    if blocks.is_empty() {
        warnings.push(ValidationWarning::NoPvEntries.into_wrapper_range(0..0));
        return DbParseOutput {
            songs: vec![],
            warnings,
        };
    }

    let songs = blocks
        .iter()
        .sorted_by(|(a, _), (b, _)| pv_id_order(a).cmp(&pv_id_order(b)).then(a.cmp(b)))
        .map(|(&pv_id, block)| {
            if !pv_id.bytes().all(|b| b.is_ascii_digit()) {
                warnings.push(
                    ValidationWarning::NonNumericPvId {
                        pv_id: pv_id.to_string(),
                    }
                    .into_wrapper_range(block.first.clone()),
                );
            }
            SongReader {
                pv_id,
                block,
                warnings: &mut warnings,
            }
            .read()
        })
        .collect();

    log::debug!("parsed {} songs from the database text", blocks.len());
    DbParseOutput { songs, warnings }
}

/// Orders decimal ids numerically without overflowing, and every other id as zero.
fn pv_id_order(pv_id: &str) -> (usize, &str) {
    if pv_id.bytes().all(|b| b.is_ascii_digit()) {
        let significant = pv_id.trim_start_matches('0');
        (significant.len(), significant)
    } else {
        (0, "")
    }
}

/// The entries of one PV id. Later lines overwrite earlier ones.
#[derive(Debug)]
struct Block<'a> {
    first: Range<usize>,
    entries: HashMap<&'a str, SourceRangeMixin<&'a str>>,
}

impl Block<'_> {
    fn new(first: Range<usize>) -> Self {
        Self {
            first,
            entries: HashMap::new(),
        }
    }
}

struct SongReader<'a, 'w> {
    pv_id: &'a str,
    block: &'a Block<'a>,
    warnings: &'w mut Vec<ValidationWarningWithRange>,
}

impl<'a> SongReader<'a, '_> {
    fn get(&self, key: &str) -> Option<&'a SourceRangeMixin<&'a str>> {
        self.block.entries.get(key)
    }

    fn value(&self, key: &str) -> Option<&'a str> {
        self.get(key).map(|entry| *entry.content())
    }

    fn warn_missing(&mut self, key: &str, default: &str) {
        self.warnings.push(
            ValidationWarning::MissingKey {
                pv_id: self.pv_id.to_string(),
                key: key.to_string(),
                default: default.to_string(),
            }
            .into_wrapper_range(self.block.first.clone()),
        );
    }

    fn warn_invalid(&mut self, key: &str, entry: &SourceRangeMixin<&str>, default: String) {
        self.warnings.push(
            ValidationWarning::InvalidNumber {
                pv_id: self.pv_id.to_string(),
                key: key.to_string(),
                value: (*entry.content()).to_string(),
                default,
            }
            .into_wrapper(entry),
        );
    }

    fn text_or(&mut self, key: &str, default: impl FnOnce() -> String) -> String {
        if let Some(value) = self.value(key) {
            return value.to_string();
        }
        let default = default();
        self.warn_missing(key, &default);
        default
    }

    /// Reads a number. A missing key falls back silently unless `required`.
    fn number_or<T>(&mut self, key: &str, default: T, required: bool) -> T
    where
        T: std::str::FromStr + ToString,
    {
        let Some(entry) = self.get(key) else {
            if required {
                self.warn_missing(key, &default.to_string());
            }
            return default;
        };
        entry.content().parse().unwrap_or_else(|_| {
            self.warn_invalid(key, entry, default.to_string());
            default
        })
    }

    fn count_or(&mut self, key: &str, default: i64, limit: usize) -> usize {
        let value = self.number_or(key, default, false);
        let count = usize::try_from(value.max(0)).unwrap_or(usize::MAX);
        if count > limit {
            let range = self
                .get(key)
                .map_or_else(|| self.block.first.clone(), SourceRangeMixin::as_range);
            self.warnings.push(
                ValidationWarning::Clamped {
                    pv_id: self.pv_id.to_string(),
                    key: key.to_string(),
                    value,
                    limit,
                }
                .into_wrapper_range(range),
            );
            return limit;
        }
        count
    }

    fn read(mut self) -> Song {
        let pv_id = self.pv_id;
        let mut song = Song::with_date(pv_id, String::new());
        song.song_name = self.text_or("song_name", || format!("Song {pv_id}"));
        let song_name = song.song_name.clone();
        song.song_name_en = self.text_or("song_name_en", || song_name.clone());
        song.song_name_reading = self.text_or("song_name_reading", || song_name);

        song.bpm = self.number_or("bpm", DEFAULT_BPM, true);
        song.date = self.text_or("date", || DEFAULT_DATE.into());

        song.sabi_play = self.text_or("sabi.playtime", || DEFAULT_SABI.into());
        song.sabi_start = self.read_sabi_start();

        self.read_difficulties(&mut song);

        let performers = self.count_or("performer.num", 1, MAX_PERFORMERS);
        song.performers = (0..performers)
            .map(|i| self.text_or(&format!("performer.{i}.chara"), || DEFAULT_PERFORMER.into()))
            .collect();

        for role in CreditRole::ALL {
            let credit = song.songinfo.get_mut(role);
            if let Some(value) = self.value(&format!("songinfo.{role}")) {
                credit.original = value.to_string();
            }
            if let Some(value) = self.value(&format!("songinfo_en.{role}")) {
                credit.english = value.to_string();
            }
        }

        let length = self.count_or("another_song.length", 0, MAX_VARIANTS);
        song.audio_variants = (1..length).map(|i| self.read_variant(i)).collect();
        song
    }

    /// Values above 1000 are taken as milliseconds.
    fn read_sabi_start(&mut self) -> String {
        const KEY: &str = "sabi.start_time";
        let Some(entry) = self.get(KEY) else {
            self.warn_missing(KEY, DEFAULT_SABI);
            return DEFAULT_SABI.into();
        };
        let raw = *entry.content();
        match raw.parse::<f64>() {
            Ok(value) if value > 1000.0 => format_seconds(value / 1000.0),
            Ok(_) => raw.to_string(),
            Err(_) => {
                self.warn_invalid(KEY, entry, DEFAULT_SABI.into());
                DEFAULT_SABI.into()
            }
        }
    }

    fn read_chart(&mut self, family: &str, index: usize, fallback_level: &str) -> DifficultyEntry {
        let level = self.text_or(&format!("difficulty.{family}.{index}.level"), || {
            fallback_level.into()
        });
        let sort_index = self.number_or(
            &format!("difficulty.{family}.{index}.level_sortindex"),
            DEFAULT_SORT_INDEX,
            true,
        );
        DifficultyEntry::new(level, sort_index)
    }

    fn read_difficulties(&mut self, song: &mut Song) {
        for kind in [
            DifficultyKind::Easy,
            DifficultyKind::Normal,
            DifficultyKind::Hard,
            DifficultyKind::Extreme,
        ] {
            let length = self.value(&format!("difficulty.{kind}.length"));
            if length.is_some_and(|length| length != "0") {
                let entry = self.read_chart(kind.as_str(), 0, FALLBACK_TOKEN);
                song.difficulties.insert(kind, entry);
            }
        }
        if self.number_or("difficulty.extreme.length", 0_i64, false) > 1 {
            let entry = self.read_chart("extreme", 1, EXTRA_FALLBACK_TOKEN);
            song.difficulties.insert(DifficultyKind::ExtremeExtra, entry);
        }
    }

    fn read_variant(&mut self, index: usize) -> Variant {
        let prefix = format!("another_song.{index}");
        let mut variant = Variant {
            name: self.text_or(&format!("{prefix}.name"), || format!("Variant {index}")),
            name_en: self.text_or(&format!("{prefix}.name_en"), || format!("Variant {index}")),
            name_reading: self.text_or(&format!("{prefix}.name_reading"), || {
                format!("Variant {index}")
            }),
            vocal_disp: self
                .value(&format!("{prefix}.vocal_disp_name"))
                .unwrap_or_default()
                .to_string(),
            vocal_disp_en: self
                .value(&format!("{prefix}.vocal_disp_name_en"))
                .unwrap_or_default()
                .to_string(),
            ..Variant::default()
        };
        if let Some(chara) = self.value(&format!("{prefix}.vocal_chara_num")) {
            variant.performers.push(chara.to_string());
        }
        if let Some(suffix) = self
            .value(&format!("{prefix}.song_file_name"))
            .and_then(|file| variant_file_suffix(self.pv_id, file))
            .filter(|suffix| *suffix != index.to_string())
        {
            variant.file_suffix = suffix.to_string();
        }
        variant
    }
}

/// Recovers the suffix from `rom/sound/song/pv_<id>_<suffix>.ogg`.
fn variant_file_suffix<'a>(pv_id: &str, file: &'a str) -> Option<&'a str> {
    file.strip_prefix("rom/sound/song/pv_")?
        .strip_prefix(pv_id)?
        .strip_prefix('_')?
        .strip_suffix(".ogg")
        .filter(|suffix| !suffix.is_empty())
}

/// Formats seconds the way the editor always has: at least one decimal digit.
fn format_seconds(seconds: f64) -> String {
    let text = seconds.to_string();
    if seconds.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}
