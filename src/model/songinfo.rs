//! Credits of a song.
//!
//! The database stores six credit roles, each in an original-language form
//! (`songinfo.<role>`) and an English form (`songinfo_en.<role>`). `.pdpack` files keep them as
//! one flat object where the English form is keyed `<role>_en`.

use std::collections::BTreeMap;

/// A credit role of the `songinfo` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CreditRole {
    /// `arranger`
    Arranger,
    /// `guitar_player`
    GuitarPlayer,
    /// `lyrics`
    Lyrics,
    /// `manipulator`
    Manipulator,
    /// `music`
    Music,
    /// `pv_editor`
    PvEditor,
}

impl CreditRole {
    /// All roles, in database order.
    pub const ALL: [Self; 6] = [
        Self::Arranger,
        Self::GuitarPlayer,
        Self::Lyrics,
        Self::Manipulator,
        Self::Music,
        Self::PvEditor,
    ];

    /// The key of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arranger => "arranger",
            Self::GuitarPlayer => "guitar_player",
            Self::Lyrics => "lyrics",
            Self::Manipulator => "manipulator",
            Self::Music => "music",
            Self::PvEditor => "pv_editor",
        }
    }

    /// The key of the English form of this role in `.pdpack` files.
    #[must_use]
    pub const fn english_key(self) -> &'static str {
        match self {
            Self::Arranger => "arranger_en",
            Self::GuitarPlayer => "guitar_player_en",
            Self::Lyrics => "lyrics_en",
            Self::Manipulator => "manipulator_en",
            Self::Music => "music_en",
            Self::PvEditor => "pv_editor_en",
        }
    }
}

impl std::fmt::Display for CreditRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credit in both languages. Empty strings mean "not credited".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Credit {
    /// Credit in the original language.
    pub original: String,
    /// Credit in English.
    pub english: String,
}

impl Credit {
    /// Creates a credit.
    #[must_use]
    pub fn new(original: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            english: english.into(),
        }
    }
}

/// The `songinfo` credits of a song.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")
)]
pub struct SongInfo {
    /// `arranger`
    pub arranger: Credit,
    /// `guitar_player`
    pub guitar_player: Credit,
    /// `lyrics`
    pub lyrics: Credit,
    /// `manipulator`
    pub manipulator: Credit,
    /// `music`
    pub music: Credit,
    /// `pv_editor`
    pub pv_editor: Credit,
}

impl SongInfo {
    /// The credit of `role`.
    #[must_use]
    pub const fn get(&self, role: CreditRole) -> &Credit {
        match role {
            CreditRole::Arranger => &self.arranger,
            CreditRole::GuitarPlayer => &self.guitar_player,
            CreditRole::Lyrics => &self.lyrics,
            CreditRole::Manipulator => &self.manipulator,
            CreditRole::Music => &self.music,
            CreditRole::PvEditor => &self.pv_editor,
        }
    }

    /// The credit of `role`, mutably.
    pub const fn get_mut(&mut self, role: CreditRole) -> &mut Credit {
        match role {
            CreditRole::Arranger => &mut self.arranger,
            CreditRole::GuitarPlayer => &mut self.guitar_player,
            CreditRole::Lyrics => &mut self.lyrics,
            CreditRole::Manipulator => &mut self.manipulator,
            CreditRole::Music => &mut self.music,
            CreditRole::PvEditor => &mut self.pv_editor,
        }
    }

    /// Populated original-language credits, in database order.
    pub fn originals(&self) -> impl Iterator<Item = (CreditRole, &str)> {
        CreditRole::ALL.into_iter().filter_map(|role| {
            let value = self.get(role).original.as_str();
            (!value.is_empty()).then_some((role, value))
        })
    }

    /// Populated English credits, in database order.
    pub fn englishes(&self) -> impl Iterator<Item = (CreditRole, &str)> {
        CreditRole::ALL.into_iter().filter_map(|role| {
            let value = self.get(role).english.as_str();
            (!value.is_empty()).then_some((role, value))
        })
    }

    /// Whether any original-language credit is populated.
    #[must_use]
    pub fn has_original(&self) -> bool {
        self.originals().next().is_some()
    }

    /// Whether any English credit is populated.
    #[must_use]
    pub fn has_english(&self) -> bool {
        self.englishes().next().is_some()
    }
}

impl From<BTreeMap<String, String>> for SongInfo {
    fn from(mut map: BTreeMap<String, String>) -> Self {
        let mut info = Self::default();
        for role in CreditRole::ALL {
            let credit = info.get_mut(role);
            credit.original = map.remove(role.as_str()).unwrap_or_default();
            credit.english = map.remove(role.english_key()).unwrap_or_default();
        }
        info
    }
}

impl From<SongInfo> for BTreeMap<String, String> {
    fn from(info: SongInfo) -> Self {
        let mut map = Self::new();
        for (role, value) in info.originals() {
            map.insert(role.as_str().to_string(), value.to_string());
        }
        for (role, value) in info.englishes() {
            map.insert(role.english_key().to_string(), value.to_string());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_map_conversion() {
        let map: BTreeMap<String, String> = [
            ("music", "作曲者"),
            ("music_en", "Composer"),
            ("lyrics_en", "Writer"),
            ("unrelated", "ignored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let info = SongInfo::from(map);
        assert_eq!(info.music, Credit::new("作曲者", "Composer"));
        assert_eq!(info.lyrics, Credit::new("", "Writer"));
        assert!(info.has_original());
        assert!(info.has_english());

        let back = BTreeMap::from(info);
        assert_eq!(back.len(), 3);
        assert_eq!(back.get("lyrics_en").map(String::as_str), Some("Writer"));
        assert!(!back.contains_key("lyrics"));
    }

    #[test]
    fn passes_are_in_role_order() {
        let mut info = SongInfo::default();
        info.pv_editor.original = "編集".into();
        info.arranger.original = "編曲".into();
        info.music.english = "Music".into();
        let roles: Vec<_> = info.originals().map(|(role, _)| role).collect();
        assert_eq!(roles, vec![CreditRole::Arranger, CreditRole::PvEditor]);
        let roles: Vec<_> = info.englishes().map(|(role, _)| role).collect();
        assert_eq!(roles, vec![CreditRole::Music]);
    }
}
