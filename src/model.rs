//! In-memory record model of a song pack.
//!
//! [`PackConfig`] is the unit that the editor works on: pack metadata plus an ordered list of
//! [`Song`]s. Every other module transforms snapshots of these values and never keeps them.
//!
//! With the `serde` feature, the model serializes to the JSON shape used by `.pdpack` files:
//!
//! ```json
//! {
//!   "pack_name": "My Pack",
//!   "pack_name_jp": "",
//!   "songs": [{ "pv_id": "001", "song_name": "...", "bpm": "180", "difficulties": { "easy": { "level": "PV_LV_03_0", "level_sort_index": "50" } } }]
//! }
//! ```

use itertools::Itertools;

pub mod chara;
pub mod difficulty;
pub mod songinfo;
pub mod validity;

pub use self::{
    difficulty::{Difficulties, DifficultyEntry, DifficultyKind},
    songinfo::{Credit, CreditRole, SongInfo},
};

/// The largest PV id accepted by the editor.
pub const MAX_PV_ID: u32 = 9999;

/// The number of performers a song or a variant may have at most.
pub const MAX_PERFORMERS: usize = 6;

/// Performer used when nothing else is known.
pub const DEFAULT_PERFORMER: &str = "MIK";

/// One chart entry of the database.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Song {
    /// Zero padded decimal id, such as `"001"`. Every database key of this song starts with `pv_{pv_id}.`.
    pub pv_id: String,
    /// Name in the original language.
    pub song_name: String,
    /// English name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub song_name_en: String,
    /// Reading of the name, written in Hiragana.
    #[cfg_attr(feature = "serde", serde(default))]
    pub song_name_reading: String,
    /// Tempo in beats per minute.
    #[cfg_attr(feature = "serde", serde(with = "lenient_number"))]
    pub bpm: u32,
    /// Creation date formatted as `YYYYMMDD`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub date: String,
    /// Start of the chorus preview, in seconds.
    #[cfg_attr(feature = "serde", serde(default = "default_sabi"))]
    pub sabi_start: String,
    /// Length of the chorus preview, in seconds.
    #[cfg_attr(feature = "serde", serde(default = "default_sabi"))]
    pub sabi_play: String,
    /// Charts of this song.
    #[cfg_attr(feature = "serde", serde(default))]
    pub difficulties: Difficulties,
    /// Character codes of the performers. The first one is the primary performer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub performers: Vec<String>,
    /// Credits.
    #[cfg_attr(feature = "serde", serde(default))]
    pub songinfo: SongInfo,
    /// Alternative vocal takes, numbered from 1 in the database.
    #[cfg_attr(feature = "serde", serde(default))]
    pub audio_variants: Vec<Variant>,
}

#[cfg(feature = "serde")]
fn default_sabi() -> String {
    "0".into()
}

impl Song {
    /// Creates an empty song dated today, performed by [`DEFAULT_PERFORMER`].
    #[must_use]
    pub fn new(pv_id: impl Into<String>) -> Self {
        Self::with_date(pv_id, chrono::Local::now().format("%Y%m%d").to_string())
    }

    /// Creates an empty song with the given `YYYYMMDD` date.
    #[must_use]
    pub fn with_date(pv_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            pv_id: pv_id.into(),
            song_name: String::new(),
            song_name_en: String::new(),
            song_name_reading: String::new(),
            bpm: 120,
            date: date.into(),
            sabi_start: "0".into(),
            sabi_play: "0".into(),
            difficulties: Difficulties::default(),
            performers: vec![DEFAULT_PERFORMER.into()],
            songinfo: SongInfo::default(),
            audio_variants: vec![],
        }
    }

    /// The primary performer, used for vocal attribution of the base take.
    #[must_use]
    pub fn primary_performer(&self) -> Option<&str> {
        self.performers.first().map(String::as_str)
    }

    /// Prefix shared by every database key of this song, e.g. `pv_001`.
    #[must_use]
    pub fn key_prefix(&self) -> String {
        format!("pv_{}", self.pv_id)
    }
}

/// An alternative vocal/audio take of a [`Song`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Variant {
    /// Name in the original language.
    pub name: String,
    /// English name.
    pub name_en: String,
    /// Reading of the name, written in Hiragana.
    pub name_reading: String,
    /// Vocal credit shown in game.
    pub vocal_disp: String,
    /// English vocal credit shown in game.
    pub vocal_disp_en: String,
    /// Appended to the audio file name. The 1-based variant index is used when empty.
    pub file_suffix: String,
    /// Character codes of the performers of this take.
    pub performers: Vec<String>,
}

impl Variant {
    /// The primary performer of this take, falling back to the primary performer of `song`.
    #[must_use]
    pub fn primary_performer<'a>(&'a self, song: &'a Song) -> Option<&'a str> {
        self.performers
            .first()
            .map(String::as_str)
            .or_else(|| song.primary_performer())
    }

    /// Suffix of the audio file for the variant at 1-based `index`.
    #[must_use]
    pub fn file_suffix_or(&self, index: usize) -> String {
        let suffix = self.file_suffix.trim();
        if suffix.is_empty() {
            index.to_string()
        } else {
            suffix.to_string()
        }
    }
}

/// A pack of songs plus the bookkeeping stored in `.pdpack` files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackConfig {
    /// Name of the pack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pack_name: String,
    /// Japanese name of the pack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pack_name_jp: String,
    /// Songs in display order.
    pub songs: Vec<Song>,
    /// Container format version, `"2.0"` for encrypted packs.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub version: Option<String>,
    /// Name of the tool that wrote the file.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub created_by: Option<String>,
    /// Whether the file was written encrypted.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub encryption: Option<bool>,
    /// Set when the file was converted from the plain JSON format.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub migrated_from: Option<String>,
    /// Set on automatic backups.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub autosave: Option<bool>,
    /// Time of the automatic backup, `YYYYmmdd_HHMMSS`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub timestamp: Option<String>,
}

/// Version written into encrypted packs.
pub const ENCRYPTED_PACK_VERSION: &str = "2.0";
/// Tool name written into saved packs.
pub const CREATED_BY: &str = "MikuMikuDB Editor";
/// Tool name written into automatic backups.
pub const CREATED_BY_AUTOSAVE: &str = "MikuMikuDB Editor (Autosave)";
/// Marker for packs converted from the plain JSON format.
pub const MIGRATED_FROM_LEGACY: &str = "legacy_json";

impl PackConfig {
    /// Creates an empty pack.
    #[must_use]
    pub fn new(pack_name: impl Into<String>, pack_name_jp: impl Into<String>) -> Self {
        Self {
            pack_name: pack_name.into(),
            pack_name_jp: pack_name_jp.into(),
            ..Self::default()
        }
    }

    /// Stamps the metadata of a pack about to be written encrypted.
    pub fn mark_encrypted(&mut self) {
        self.version = Some(ENCRYPTED_PACK_VERSION.into());
        self.created_by = Some(CREATED_BY.into());
        self.encryption = Some(true);
    }

    /// Stamps the metadata of a plain JSON pack being upgraded to the encrypted format.
    pub fn migrate_from_legacy(&mut self) {
        self.mark_encrypted();
        self.migrated_from = Some(MIGRATED_FROM_LEGACY.into());
    }

    /// Stamps the metadata of an automatic backup taken at `at`.
    pub fn mark_autosave<Tz: chrono::TimeZone>(&mut self, at: &chrono::DateTime<Tz>)
    where
        Tz::Offset: std::fmt::Display,
    {
        self.mark_encrypted();
        self.created_by = Some(CREATED_BY_AUTOSAVE.into());
        self.autosave = Some(true);
        self.timestamp = Some(at.format("%Y%m%d_%H%M%S").to_string());
    }

    /// Whether the pack claims to have been written encrypted.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.encryption.unwrap_or(false)
    }

    /// PV ids used by more than one song, with their counts. Duplicates are allowed in a pack,
    /// but the game keeps only one of them.
    #[must_use]
    pub fn duplicate_pv_ids(&self) -> Vec<(&str, usize)> {
        self.songs
            .iter()
            .map(|song| song.pv_id.as_str())
            .counts()
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .sorted()
            .collect()
    }

    /// Finds a song by its PV id.
    #[must_use]
    pub fn song(&self, pv_id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.pv_id == pv_id)
    }
}

/// Formats a user-entered PV id as the canonical zero padded form.
///
/// Returns `None` when `raw` is not a decimal number in `1..=9999`.
///
/// ```
/// use pvdb_rs::model::normalize_pv_id;
///
/// assert_eq!(normalize_pv_id("7").as_deref(), Some("007"));
/// assert_eq!(normalize_pv_id(" 1234 ").as_deref(), Some("1234"));
/// assert_eq!(normalize_pv_id("0"), None);
/// ```
#[must_use]
pub fn normalize_pv_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let id: u32 = raw.parse().ok()?;
    (1..=MAX_PV_ID)
        .contains(&id)
        .then(|| format!("{id:03}"))
}

/// Accepts a JSON number or a numeric string, and writes a string.
///
/// The editor historically stored these values as strings, while imported databases stored them
/// as numbers, so both appear in real `.pdpack` files.
#[cfg(feature = "serde")]
pub(crate) mod lenient_number {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Float(f64),
        String(String),
    }

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => n,
            NumberOrString::Float(f) if f.fract() == 0.0 && f >= 0.0 => f as u64,
            NumberOrString::Float(f) => {
                return Err(D::Error::custom(format!("expected an integer, found {f}")));
            }
            NumberOrString::String(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("expected an integer, found {s:?}")))?,
        };
        u32::try_from(value).map_err(|_| D::Error::custom(format!("{value} is out of range")))
    }
}
