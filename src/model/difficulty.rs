//! Charts of a song.
//!
//! The database knows four difficulty families. The `extreme` family can hold a second, "extra"
//! chart, which the model keeps as its own [`DifficultyKind::ExtremeExtra`] entry.

use crate::level::numeric_to_token;

/// A kind of chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DifficultyKind {
    /// `easy`
    Easy,
    /// `normal`
    Normal,
    /// `hard`
    Hard,
    /// `extreme`
    Extreme,
    /// `extreme_extra`, stored under the `extreme` family of the database.
    ExtremeExtra,
}

impl DifficultyKind {
    /// All kinds, in the order the editor lists them.
    pub const ALL: [Self; 5] = [
        Self::Easy,
        Self::Normal,
        Self::Hard,
        Self::Extreme,
        Self::ExtremeExtra,
    ];

    /// The key of this kind in `.pdpack` files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::Extreme => "extreme",
            Self::ExtremeExtra => "extreme_extra",
        }
    }

    /// The database family this kind is written under.
    #[must_use]
    pub const fn family(self) -> &'static str {
        match self {
            Self::ExtremeExtra => "extreme",
            other => other.as_str(),
        }
    }

    /// The sort index the editor assigns to charts of this kind.
    #[must_use]
    pub const fn default_sort_index(self) -> u32 {
        match self {
            Self::Easy | Self::Normal | Self::ExtremeExtra => 50,
            Self::Hard => 80,
            Self::Extreme => 20,
        }
    }

    /// Ratings the editor offers for this kind.
    #[must_use]
    pub const fn level_options(self) -> &'static [&'static str] {
        match self {
            Self::Easy => &["1.0", "1.5", "2.0", "2.5", "3.0", "3.5", "4.0", "4.5"],
            Self::Normal => &["3.0", "3.5", "4.0", "4.5", "5.0", "5.5", "6.0"],
            Self::Hard => &["5.0", "5.5", "6.0", "6.5", "7.0", "7.5", "8.0", "8.5"],
            Self::Extreme | Self::ExtremeExtra => &[
                "6.0", "6.5", "7.0", "7.5", "8.0", "8.5", "9.0", "9.5", "10.0",
            ],
        }
    }
}

impl std::fmt::Display for DifficultyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DifficultyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown difficulty `{s}`"))
    }
}

/// A chart of a song.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifficultyEntry {
    /// Level token such as `PV_LV_07_5`.
    pub level: String,
    /// Position of the chart in the level sorted song list.
    #[cfg_attr(feature = "serde", serde(with = "crate::model::lenient_number"))]
    pub level_sort_index: u32,
}

impl DifficultyEntry {
    /// Creates an entry from a level token and a sort index.
    #[must_use]
    pub fn new(level: impl Into<String>, level_sort_index: u32) -> Self {
        Self {
            level: level.into(),
            level_sort_index,
        }
    }

    /// Creates an entry from a rating such as `"7.5"`, with the sort index assigned to `kind`.
    #[must_use]
    pub fn from_rating(kind: DifficultyKind, rating: &str) -> Self {
        Self::new(numeric_to_token(rating), kind.default_sort_index())
    }
}

/// The charts of a song, at most one per [`DifficultyKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Difficulties {
    /// The `easy` chart.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub easy: Option<DifficultyEntry>,
    /// The `normal` chart.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub normal: Option<DifficultyEntry>,
    /// The `hard` chart.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub hard: Option<DifficultyEntry>,
    /// The `extreme` chart.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub extreme: Option<DifficultyEntry>,
    /// The extra `extreme` chart.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub extreme_extra: Option<DifficultyEntry>,
}

impl Difficulties {
    /// The chart of `kind`, if present.
    #[must_use]
    pub const fn get(&self, kind: DifficultyKind) -> Option<&DifficultyEntry> {
        match kind {
            DifficultyKind::Easy => self.easy.as_ref(),
            DifficultyKind::Normal => self.normal.as_ref(),
            DifficultyKind::Hard => self.hard.as_ref(),
            DifficultyKind::Extreme => self.extreme.as_ref(),
            DifficultyKind::ExtremeExtra => self.extreme_extra.as_ref(),
        }
    }

    const fn slot_mut(&mut self, kind: DifficultyKind) -> &mut Option<DifficultyEntry> {
        match kind {
            DifficultyKind::Easy => &mut self.easy,
            DifficultyKind::Normal => &mut self.normal,
            DifficultyKind::Hard => &mut self.hard,
            DifficultyKind::Extreme => &mut self.extreme,
            DifficultyKind::ExtremeExtra => &mut self.extreme_extra,
        }
    }

    /// Sets the chart of `kind`, returning the replaced one.
    pub fn insert(&mut self, kind: DifficultyKind, entry: DifficultyEntry) -> Option<DifficultyEntry> {
        self.slot_mut(kind).replace(entry)
    }

    /// Removes the chart of `kind`.
    pub fn remove(&mut self, kind: DifficultyKind) -> Option<DifficultyEntry> {
        self.slot_mut(kind).take()
    }

    /// Iterates over present charts in [`DifficultyKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (DifficultyKind, &DifficultyEntry)> {
        DifficultyKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|entry| (kind, entry)))
    }

    /// The number of present charts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no chart is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_iterate() {
        let mut difficulties = Difficulties::default();
        assert!(difficulties.is_empty());
        difficulties.insert(
            DifficultyKind::ExtremeExtra,
            DifficultyEntry::from_rating(DifficultyKind::ExtremeExtra, "9.5"),
        );
        difficulties.insert(
            DifficultyKind::Easy,
            DifficultyEntry::from_rating(DifficultyKind::Easy, "2.0"),
        );
        let kinds: Vec<_> = difficulties.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![DifficultyKind::Easy, DifficultyKind::ExtremeExtra]);
        assert_eq!(
            difficulties.get(DifficultyKind::ExtremeExtra),
            Some(&DifficultyEntry::new("PV_LV_09_5", 50))
        );
        assert!(difficulties.remove(DifficultyKind::Easy).is_some());
        assert_eq!(difficulties.len(), 1);
    }

    #[test]
    fn sort_index_policy() {
        assert_eq!(DifficultyKind::Easy.default_sort_index(), 50);
        assert_eq!(DifficultyKind::Normal.default_sort_index(), 50);
        assert_eq!(DifficultyKind::Hard.default_sort_index(), 80);
        assert_eq!(DifficultyKind::Extreme.default_sort_index(), 20);
        assert_eq!(DifficultyKind::ExtremeExtra.default_sort_index(), 50);
    }

    #[test]
    fn kind_names() {
        assert_eq!("extreme_extra".parse(), Ok(DifficultyKind::ExtremeExtra));
        assert!("master".parse::<DifficultyKind>().is_err());
        assert_eq!(DifficultyKind::ExtremeExtra.family(), "extreme");
    }
}
