//! Validity checks for songs entered by hand.
//!
//! These are the rules the editor applies before accepting a song or a variant. They are
//! independent of serialization: [`crate::db`] and [`crate::pack`] take records as they are, and
//! it is up to the caller to decide whether a record must be valid first.

use thiserror::Error;

use super::{
    MAX_PERFORMERS, PackConfig, Song, Variant, chara::is_character_code, normalize_pv_id,
};
use crate::level::token_to_numeric;

/// A violated rule of a [`Song`] or [`Variant`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// The PV id is not a zero padded number in `1..=9999`.
    #[error("PV id `{0}` must be a number between 001 and 9999")]
    InvalidPvId(String),
    /// A required text field is empty.
    #[error("`{0}` is required")]
    Required(&'static str),
    /// A reading contains characters other than Hiragana.
    #[error("`{field}` must be written in Hiragana, found {text:?}")]
    NotHiragana {
        /// The checked field.
        field: &'static str,
        /// The rejected text.
        text: String,
    },
    /// The BPM is zero.
    #[error("BPM must be a positive integer")]
    InvalidBpm,
    /// The date is not `YYYYMMDD`.
    #[error("date `{0}` must be formatted as YYYYMMDD")]
    InvalidDate(String),
    /// No chart is selected.
    #[error("at least one difficulty must be selected")]
    NoDifficulty,
    /// A chart has a level token that does not decode.
    #[error("difficulty `{kind}` has an invalid level token `{level}`")]
    InvalidLevel {
        /// The difficulty.
        kind: &'static str,
        /// The rejected token.
        level: String,
    },
    /// The performer list is empty or too long.
    #[error("there must be between 1 and {max} performers, found {0}", max = MAX_PERFORMERS)]
    PerformerCount(usize),
    /// A performer is not a three letter code.
    #[error("performer `{0}` is not a character code")]
    InvalidPerformer(String),
    /// No original-language credit is given.
    #[error("at least one original credit must be filled in")]
    NoOriginalCredit,
    /// No English credit is given.
    #[error("at least one English credit must be filled in")]
    NoEnglishCredit,
    /// A variant is invalid.
    #[error("variant {index}: {error}")]
    Variant {
        /// 1-based index of the variant.
        index: usize,
        /// The violated rule.
        error: Box<ValidationError>,
    },
}

/// Whether `text` is strict Hiragana: U+3040..=U+309F, the prolonged sound mark and whitespace.
///
/// ```
/// use pvdb_rs::model::validity::is_hiragana;
///
/// assert!(is_hiragana("みくみく ー"));
/// assert!(!is_hiragana("ミク"));
/// assert!(!is_hiragana(""));
/// ```
#[must_use]
pub fn is_hiragana(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| matches!(c, '\u{3040}'..='\u{309F}' | 'ー') || c.is_whitespace())
}

/// Like [`is_hiragana`], also allowing the full width space, common Japanese punctuation and ASCII
/// digits. Used for variant readings.
#[must_use]
pub fn is_loose_hiragana(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| {
            matches!(
                c,
                '\u{3040}'..='\u{309F}' | '\u{3000}' | 'ー' | '・' | '。' | '、' | '！' | '？'
            ) || c.is_ascii_digit()
                || c.is_whitespace()
        })
}

fn check_performers(performers: &[String], errors: &mut Vec<ValidationError>) {
    if performers.is_empty() || performers.len() > MAX_PERFORMERS {
        errors.push(ValidationError::PerformerCount(performers.len()));
    }
    errors.extend(
        performers
            .iter()
            .filter(|code| !is_character_code(code))
            .map(|code| ValidationError::InvalidPerformer(code.clone())),
    );
}

impl Variant {
    /// Collects every violated rule. An empty result means the variant is valid.
    #[must_use]
    pub fn check_validity(&self) -> Vec<ValidationError> {
        let mut errors = vec![];
        if self.name.trim().is_empty() {
            errors.push(ValidationError::Required("name"));
        }
        if self.name_en.trim().is_empty() {
            errors.push(ValidationError::Required("name_en"));
        }
        if self.name_reading.trim().is_empty() {
            errors.push(ValidationError::Required("name_reading"));
        } else if !is_loose_hiragana(self.name_reading.trim()) {
            errors.push(ValidationError::NotHiragana {
                field: "name_reading",
                text: self.name_reading.clone(),
            });
        }
        check_performers(&self.performers, &mut errors);
        errors
    }
}

impl Song {
    /// Collects every violated rule, including those of the variants. An empty result means the
    /// song is valid.
    #[must_use]
    pub fn check_validity(&self) -> Vec<ValidationError> {
        let mut errors = vec![];

        if normalize_pv_id(&self.pv_id).as_deref() != Some(self.pv_id.as_str()) {
            errors.push(ValidationError::InvalidPvId(self.pv_id.clone()));
        }
        if self.song_name.trim().is_empty() {
            errors.push(ValidationError::Required("song_name"));
        }
        if self.song_name_en.trim().is_empty() {
            errors.push(ValidationError::Required("song_name_en"));
        }
        if self.song_name_reading.trim().is_empty() {
            errors.push(ValidationError::Required("song_name_reading"));
        } else if !is_hiragana(self.song_name_reading.trim()) {
            errors.push(ValidationError::NotHiragana {
                field: "song_name_reading",
                text: self.song_name_reading.clone(),
            });
        }
        if self.bpm == 0 {
            errors.push(ValidationError::InvalidBpm);
        }
        if self.date.len() != 8 || !self.date.bytes().all(|b| b.is_ascii_digit()) {
            errors.push(ValidationError::InvalidDate(self.date.clone()));
        }

        if self.difficulties.is_empty() {
            errors.push(ValidationError::NoDifficulty);
        }
        errors.extend(
            self.difficulties
                .iter()
                .filter(|(_, entry)| token_to_numeric(&entry.level).is_empty())
                .map(|(kind, entry)| ValidationError::InvalidLevel {
                    kind: kind.as_str(),
                    level: entry.level.clone(),
                }),
        );

        check_performers(&self.performers, &mut errors);

        if !self.songinfo.has_original() {
            errors.push(ValidationError::NoOriginalCredit);
        }
        if !self.songinfo.has_english() {
            errors.push(ValidationError::NoEnglishCredit);
        }

        for (index, variant) in (1..).zip(&self.audio_variants) {
            errors.extend(
                variant
                    .check_validity()
                    .into_iter()
                    .map(|error| ValidationError::Variant {
                        index,
                        error: Box::new(error),
                    }),
            );
        }
        errors
    }
}

impl PackConfig {
    /// Collects every violated rule of every song, paired with the index of the song.
    #[must_use]
    pub fn check_validity(&self) -> Vec<(usize, ValidationError)> {
        self.songs
            .iter()
            .enumerate()
            .flat_map(|(index, song)| {
                song.check_validity()
                    .into_iter()
                    .map(move |error| (index, error))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Credit, DifficultyEntry, DifficultyKind};

    fn valid_song() -> Song {
        let mut song = Song::with_date("001", "20250101");
        song.song_name = "テスト".into();
        song.song_name_en = "Test".into();
        song.song_name_reading = "てすと".into();
        song.difficulties.insert(
            DifficultyKind::Hard,
            DifficultyEntry::from_rating(DifficultyKind::Hard, "7.5"),
        );
        song.songinfo.music = Credit::new("作曲", "Composer");
        song
    }

    #[test]
    fn valid_song_passes() {
        assert_eq!(valid_song().check_validity(), vec![]);
    }

    #[test]
    fn collects_every_violation() {
        let mut song = valid_song();
        song.pv_id = "1".into();
        song.song_name_reading = "テスト".into();
        song.bpm = 0;
        song.performers.clear();
        song.songinfo.music.english.clear();
        assert_eq!(
            song.check_validity(),
            vec![
                ValidationError::InvalidPvId("1".into()),
                ValidationError::NotHiragana {
                    field: "song_name_reading",
                    text: "テスト".into(),
                },
                ValidationError::InvalidBpm,
                ValidationError::PerformerCount(0),
                ValidationError::NoEnglishCredit,
            ]
        );
    }

    #[test]
    fn performer_count_message() {
        assert_eq!(
            ValidationError::PerformerCount(7).to_string(),
            "there must be between 1 and 6 performers, found 7"
        );
    }

    #[test]
    fn broken_level_token() {
        let mut song = valid_song();
        song.difficulties
            .insert(DifficultyKind::Easy, DifficultyEntry::new("LV_3", 50));
        assert_eq!(
            song.check_validity(),
            vec![ValidationError::InvalidLevel {
                kind: "easy",
                level: "LV_3".into(),
            }]
        );
    }

    #[test]
    fn variant_rules() {
        let mut song = valid_song();
        song.audio_variants.push(Variant {
            name: "別".into(),
            name_en: "Other".into(),
            name_reading: "べつ！2".into(),
            performers: vec!["RIN".into()],
            ..Variant::default()
        });
        assert_eq!(song.check_validity(), vec![]);

        song.audio_variants.push(Variant::default());
        let errors = song.check_validity();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|error| matches!(
            error,
            ValidationError::Variant { index: 2, .. }
        )));
    }

    #[test]
    fn hiragana_rules() {
        assert!(is_hiragana("はつね みく"));
        assert!(!is_hiragana("はつね、みく"));
        assert!(is_loose_hiragana("はつね、みく"));
        assert!(is_loose_hiragana("みく　39"));
        assert!(!is_loose_hiragana("miku"));
    }
}
