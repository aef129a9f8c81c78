//! Writes songs as database text.
//!
//! The output is a header comment followed by one block of `pv_<id>.<key>=<value>` lines per
//! song, separated by a blank line and joined with `\n`. Keys within a block are written in the
//! fixed order the game expects.

use std::fmt::Display;

use thiserror::Error;

use crate::model::{DifficultyEntry, DifficultyKind, PackConfig, Song};

/// `scriptformat` value of every chart.
pub const SCRIPT_FORMAT: &str = "0x15122517";

const RULE_WIDTH: usize = 30;

/// A song that cannot be written.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum SerializeError {
    /// A field that every block needs is empty.
    #[error("song `{pv_id}` has no {field}")]
    MissingField {
        /// The id of the song.
        pv_id: String,
        /// The empty field.
        field: &'static str,
    },
    /// The BPM is zero.
    #[error("song `{pv_id}` has a BPM of zero")]
    InvalidBpm {
        /// The id of the song.
        pv_id: String,
    },
    /// The song has variants but no performer to credit the base take.
    #[error("song `{pv_id}` has audio variants but no performer")]
    NoPerformer {
        /// The id of the song.
        pv_id: String,
    },
    /// A value would break the line structure, such as a line break in a name or a `.` in the id.
    #[error("song `{pv_id}` has a {field} that cannot be written on one line")]
    InvalidValue {
        /// The id of the song.
        pv_id: String,
        /// The offending field.
        field: &'static str,
    },
    /// The pack name contains a line break.
    #[error("the pack name cannot be written on one line")]
    InvalidPackName,
}

/// Writes the header and every song of `pack`.
///
/// # Errors
///
/// Returns [`SerializeError`] for the first song that lacks a field the text needs.
pub fn serialize_pack(pack: &PackConfig) -> Result<String, SerializeError> {
    if has_line_break(&pack.pack_name) {
        return Err(SerializeError::InvalidPackName);
    }
    let rule = format!("#{}", "-".repeat(RULE_WIDTH));
    let mut lines = vec![
        "# Generated by MikuMikuDB Editor".to_string(),
        "# Created by NyxC".to_string(),
        String::new(),
        rule.clone(),
        format!("# {} Additional Charts", pack.pack_name),
        "#".to_string(),
    ];
    lines.extend(pack.songs.iter().map(|song| {
        if song.song_name_en.is_empty() {
            format!("# pv_{}\t{}", song.pv_id, song.song_name)
        } else {
            format!("# pv_{}\t{} | {}", song.pv_id, song.song_name, song.song_name_en)
        }
    }));
    lines.push(rule);
    lines.push(String::new());

    for (i, song) in pack.songs.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(song_lines(song)?);
    }
    log::debug!(
        "serialized {} songs of pack `{}`",
        pack.songs.len(),
        pack.pack_name
    );
    Ok(lines.join("\n"))
}

/// Writes the block of one song, without the header.
///
/// # Errors
///
/// Returns [`SerializeError`] when the song lacks a field the text needs.
pub fn serialize_song(song: &Song) -> Result<String, SerializeError> {
    Ok(song_lines(song)?.join("\n"))
}

fn check(song: &Song) -> Result<(), SerializeError> {
    let missing = |field| SerializeError::MissingField {
        pv_id: song.pv_id.clone(),
        field,
    };
    if song.pv_id.is_empty() {
        return Err(missing("pv_id"));
    }
    if song.song_name.is_empty() {
        return Err(missing("song_name"));
    }
    if song.date.is_empty() {
        return Err(missing("date"));
    }
    if song.bpm == 0 {
        return Err(SerializeError::InvalidBpm {
            pv_id: song.pv_id.clone(),
        });
    }
    if !song.audio_variants.is_empty() && song.performers.is_empty() {
        return Err(SerializeError::NoPerformer {
            pv_id: song.pv_id.clone(),
        });
    }
    match first_invalid_field(song) {
        Some(field) => Err(SerializeError::InvalidValue {
            pv_id: song.pv_id.clone(),
            field,
        }),
        None => Ok(()),
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

/// A pv_id must stay one segment of `pv_<id>.<key>`.
fn is_key_segment(value: &str) -> bool {
    !value
        .chars()
        .any(|c| c == '.' || c == '=' || c.is_whitespace())
}

fn first_broken<const N: usize>(fields: [(&'static str, &str); N]) -> Option<&'static str> {
    fields
        .into_iter()
        .find_map(|(field, value)| has_line_break(value).then_some(field))
}

fn first_invalid_field(song: &Song) -> Option<&'static str> {
    if !is_key_segment(&song.pv_id) {
        return Some("pv_id");
    }
    let fields = [
        ("song_name", song.song_name.as_str()),
        ("song_name_en", song.song_name_en.as_str()),
        ("song_name_reading", song.song_name_reading.as_str()),
        ("date", song.date.as_str()),
        ("sabi.playtime", song.sabi_play.as_str()),
        ("sabi.start_time", song.sabi_start.as_str()),
    ];
    if let Some(field) = first_broken(fields) {
        return Some(field);
    }
    if song.performers.iter().any(|chara| has_line_break(chara)) {
        return Some("performer");
    }
    if song
        .difficulties
        .iter()
        .any(|(_, entry)| has_line_break(&entry.level))
    {
        return Some("difficulty level");
    }
    for variant in &song.audio_variants {
        let fields = [
            ("another_song.name", variant.name.as_str()),
            ("another_song.name_en", variant.name_en.as_str()),
            ("another_song.name_reading", variant.name_reading.as_str()),
            ("another_song.vocal_disp_name", variant.vocal_disp.as_str()),
            ("another_song.vocal_disp_name_en", variant.vocal_disp_en.as_str()),
        ];
        if let Some(field) = first_broken(fields) {
            return Some(field);
        }
        if variant.performers.iter().any(|chara| has_line_break(chara)) {
            return Some("another_song.vocal_chara_num");
        }
        if has_line_break(&variant.file_suffix) {
            return Some("another_song.song_file_name");
        }
    }
    if song.songinfo.originals().any(|(_, value)| has_line_break(value)) {
        return Some("songinfo");
    }
    if song.songinfo.englishes().any(|(_, value)| has_line_break(value)) {
        return Some("songinfo_en");
    }
    None
}

/// Collects the lines of one block, prefixing every key with `pv_<id>.`.
struct Block {
    prefix: String,
    lines: Vec<String>,
}

impl Block {
    fn put(&mut self, key: impl Display, value: impl Display) {
        self.lines.push(format!("{}.{key}={value}", self.prefix));
    }

    fn chart(&mut self, family: &str, index: usize, entry: &DifficultyEntry, script: &str) {
        let key = format!("difficulty.{family}.{index}");
        self.put(format_args!("{key}.level"), &entry.level);
        self.put(
            format_args!("{key}.level_sortindex"),
            entry.level_sort_index,
        );
        self.put(format_args!("{key}.script_filename"), script);
        self.put(format_args!("{key}.scriptformat"), SCRIPT_FORMAT);
        self.put(format_args!("{key}.version"), 1);
    }

    fn single_chart(&mut self, song: &Song, kind: DifficultyKind) {
        if let Some(entry) = song.difficulties.get(kind) {
            self.put(format_args!("difficulty.{kind}.0.edition"), 0);
            let script = format!("rom/script/pv_{}_{kind}.dsc", song.pv_id);
            self.chart(kind.as_str(), 0, entry, &script);
            self.put(format_args!("difficulty.{kind}.length"), 1);
        } else {
            self.put(format_args!("difficulty.{kind}.length"), 0);
        }
    }

    /// The extreme family holds the regular chart first, then the extra chart at the next index.
    fn extreme_charts(&mut self, song: &Song) {
        let mut count = 0;
        if let Some(entry) = song.difficulties.get(DifficultyKind::Extreme) {
            self.put("difficulty.extreme.0.edition", 0);
            let script = format!("rom/script/pv_{}_extreme.dsc", song.pv_id);
            self.chart("extreme", 0, entry, &script);
            count += 1;
        }
        if let Some(entry) = song.difficulties.get(DifficultyKind::ExtremeExtra) {
            self.put(format_args!("difficulty.extreme.{count}.attribute.extra"), 1);
            self.put(
                format_args!("difficulty.extreme.{count}.attribute.original"),
                0,
            );
            self.put(format_args!("difficulty.extreme.{count}.edition"), 1);
            let script = format!("rom/script/pv_{}_extreme_{count}.dsc", song.pv_id);
            self.chart("extreme", count, entry, &script);
            count += 1;
        }
        self.put("difficulty.extreme.length", count);
    }

    fn variants(&mut self, song: &Song) {
        let Some(primary) = song.primary_performer() else {
            return;
        };
        self.put("another_song.0.name", &song.song_name);
        self.put("another_song.0.name_en", &song.song_name_en);
        self.put("another_song.0.name_reading", &song.song_name_reading);
        self.put("another_song.0.vocal_chara_num", primary);

        for (j, variant) in (1..).zip(&song.audio_variants) {
            let key = format!("another_song.{j}");
            let reading = if variant.name_reading.is_empty() {
                &variant.name
            } else {
                &variant.name_reading
            };
            self.put(format_args!("{key}.name"), &variant.name);
            self.put(format_args!("{key}.name_en"), &variant.name_en);
            self.put(format_args!("{key}.name_reading"), reading);
            self.put(
                format_args!("{key}.vocal_chara_num"),
                variant.primary_performer(song).unwrap_or(primary),
            );
            self.put(
                format_args!("{key}.song_file_name"),
                format_args!(
                    "rom/sound/song/pv_{}_{}.ogg",
                    song.pv_id,
                    variant.file_suffix_or(j)
                ),
            );
            if !variant.vocal_disp.is_empty() {
                self.put(format_args!("{key}.vocal_disp_name"), &variant.vocal_disp);
            }
            if !variant.vocal_disp_en.is_empty() {
                self.put(
                    format_args!("{key}.vocal_disp_name_en"),
                    &variant.vocal_disp_en,
                );
            }
        }
        self.put("another_song.length", song.audio_variants.len() + 1);
    }
}

fn song_lines(song: &Song) -> Result<Vec<String>, SerializeError> {
    check(song)?;
    let id = &song.pv_id;
    let mut block = Block {
        prefix: song.key_prefix(),
        lines: vec![],
    };

    if !song.audio_variants.is_empty() {
        block.variants(song);
    }

    block.put("bpm", song.bpm);
    block.put("chainslide_failure_name", "slide_ng03");
    block.put("chainslide_first_name", "slide_long02a");
    block.put("chainslide_sub_name", "slide_button08");
    block.put("chainslide_success_name", "slide_ok03");
    block.put("date", song.date.as_str());

    block.single_chart(song, DifficultyKind::Easy);
    block.extreme_charts(song);
    block.single_chart(song, DifficultyKind::Hard);
    block.single_chart(song, DifficultyKind::Normal);

    block.put("hiddentiming", "0.3");
    block.put("high_speedrate", 4);
    block.put("movie_filename", format_args!("rom/movie/pv_{id}.mp4"));
    block.put("movie_pvtype", "ONLY");
    block.put("movie_surface", "FRONT");
    block.put("pack", 2);

    for (j, chara) in song.performers.iter().enumerate() {
        block.put(format_args!("performer.{j}.chara"), chara);
        block.put(format_args!("performer.{j}.pv_costume"), 1);
        block.put(format_args!("performer.{j}.type"), "VOCAL");
    }
    block.put("performer.num", song.performers.len());

    block.put("sabi.playtime", song.sabi_play.as_str());
    block.put("sabi.start_time", song.sabi_start.as_str());

    block.put("se_name", "01_button1");
    block.put("slide_name", "slide_se13");
    block.put("slidertouch_name", "slide_windchime");
    block.put("song_filename", format_args!("rom/sound/song/pv_{id}.ogg"));

    block.put("song_name", &song.song_name);
    block.put("song_name_en", song.song_name_en.as_str());
    block.put("song_name_reading", song.song_name_reading.as_str());

    for (role, value) in song.songinfo.originals() {
        block.put(format_args!("songinfo.{role}"), value);
    }
    for (role, value) in song.songinfo.englishes() {
        block.put(format_args!("songinfo_en.{role}"), value);
    }

    block.put("sudden_timing", "0.6");
    Ok(block.lines)
}
