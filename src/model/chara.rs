//! Performer character codes.

/// A character known to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Character {
    /// Three letter code used in the database, such as `MIK`.
    pub code: &'static str,
    /// Japanese display name.
    pub name_jp: &'static str,
    /// English display name.
    pub name_en: &'static str,
}

/// Characters offered by the editor, in display order.
pub const KNOWN_CHARACTERS: [Character; 10] = [
    Character {
        code: "MIK",
        name_jp: "初音ミク",
        name_en: "Hatsune Miku",
    },
    Character {
        code: "RIN",
        name_jp: "鏡音リン",
        name_en: "Kagamine Rin",
    },
    Character {
        code: "LEN",
        name_jp: "鏡音レン",
        name_en: "Kagamine Len",
    },
    Character {
        code: "LUK",
        name_jp: "巡音ルカ",
        name_en: "Megurine Luka",
    },
    Character {
        code: "KAI",
        name_jp: "カイト",
        name_en: "KAITO",
    },
    Character {
        code: "MEI",
        name_jp: "メイコ",
        name_en: "MEIKO",
    },
    Character {
        code: "HAK",
        name_jp: "弱音ハク",
        name_en: "Yowane Haku",
    },
    Character {
        code: "NER",
        name_jp: "亞北ネル",
        name_en: "Akita Neru",
    },
    Character {
        code: "SAK",
        name_jp: "咲音メイコ",
        name_en: "Sakine Meiko",
    },
    Character {
        code: "TET",
        name_jp: "重音テト",
        name_en: "Kasane Teto",
    },
];

/// Looks up a known character by code.
#[must_use]
pub fn find_character(code: &str) -> Option<&'static Character> {
    KNOWN_CHARACTERS.iter().find(|chara| chara.code == code)
}

/// Whether `code` has the shape of a character code: three ASCII uppercase letters.
///
/// Imported databases may use codes the editor does not list, so this does not require the code
/// to be in [`KNOWN_CHARACTERS`].
#[must_use]
pub fn is_character_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
