//! `.pdpack` files written by the editor.
#![cfg(feature = "pack")]

use std::sync::LazyLock;

use pretty_assertions::assert_eq;
use pvdb_rs::{
    db::{parse_db, serialize_pack},
    model::{DifficultyKind, PackConfig},
    pack::{
        DecodeError, ENCRYPTED_HEADER, PackCodec, PackFormat, PackSummary,
        entropy::EntropyMock, fernet::DecryptionError, summarize_pack,
    },
};

const EDITOR_SAVED: &[u8] = include_bytes!("files/editor_saved.pdpack");
const LEGACY: &[u8] = include_bytes!("files/legacy.pdpack");
const LEGACY_DB: &str = include_str!("files/fixture_pack.txt");

/// The editor's key. Derived once since it takes 100 000 rounds.
static CODEC: LazyLock<PackCodec<EntropyMock<16>>> =
    LazyLock::new(|| PackCodec::with_entropy(EntropyMock([0x39; 16])));

#[test]
fn test_legacy_pack() {
    let decoded = CODEC.decode_with_format(LEGACY).unwrap();
    assert_eq!(decoded.format, PackFormat::LegacyJson);

    let pack = decoded.config;
    assert_eq!(pack.pack_name, "Fixture Pack");
    assert_eq!(pack.pack_name_jp, "フィクスチャ");
    assert_eq!(pack.version, None);
    assert!(!pack.is_encrypted());
    assert_eq!(pack.songs.len(), 2);

    let star = &pack.songs[0];
    assert_eq!(star.bpm, 150);
    assert_eq!(
        star.difficulties
            .get(DifficultyKind::Hard)
            .map(|entry| entry.level_sort_index),
        Some(80)
    );
    assert_eq!(star.songinfo.music.original, "作曲者");
    assert_eq!(star.songinfo.lyrics.english, "Lyricist");
    assert_eq!(star.audio_variants[0].file_suffix, "luka");

    let imported = &pack.songs[1];
    assert_eq!(imported.bpm, 128);
    assert_eq!(
        imported
            .difficulties
            .get(DifficultyKind::Easy)
            .map(|entry| entry.level_sort_index),
        Some(50)
    );
}

#[test]
fn test_legacy_pack_to_database_text() {
    let pack = CODEC.decode(LEGACY).unwrap();
    assert_eq!(serialize_pack(&pack).unwrap(), LEGACY_DB);
    assert_eq!(parse_db(LEGACY_DB), pack.songs);
}

#[test]
fn test_editor_saved_pack() {
    let decoded = CODEC.decode_with_format(EDITOR_SAVED).unwrap();
    assert_eq!(decoded.format, PackFormat::Encrypted);

    let mut expected = CODEC.decode(LEGACY).unwrap();
    expected.mark_encrypted();
    assert_eq!(decoded.config, expected);
}

#[test]
fn test_reencrypted_pack_reads_back() {
    let mut pack = CODEC.decode(LEGACY).unwrap();
    pack.migrate_from_legacy();

    let mut codec = PackCodec::with_entropy(EntropyMock([0x01; 16]));
    let bytes = codec.encode_at(&pack, 1_750_000_000).unwrap();
    assert!(bytes.starts_with(ENCRYPTED_HEADER));

    let decoded = CODEC.decode(&bytes).unwrap();
    assert_eq!(decoded.migrated_from.as_deref(), Some("legacy_json"));
    assert_eq!(decoded.version.as_deref(), Some("2.0"));
    assert_eq!(decoded, pack);
}

#[test]
fn test_tampered_pack_is_rejected() {
    let token_start = ENCRYPTED_HEADER.len();
    // Each base64 character carries six bits, so swapping one character always changes the
    // decoded token.
    for i in (token_start..EDITOR_SAVED.len()).step_by(7) {
        let mut tampered = EDITOR_SAVED.to_vec();
        tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
        let result = CODEC.decode(&tampered);
        assert!(
            matches!(result, Err(DecodeError::Decrypt(_))),
            "byte {i}: {result:?}"
        );
    }
}

#[test]
fn test_truncated_pack_is_rejected() {
    let truncated = &EDITOR_SAVED[..EDITOR_SAVED.len() - 12];
    assert!(matches!(
        CODEC.decode(truncated),
        Err(DecodeError::Decrypt(_))
    ));
    assert!(matches!(
        CODEC.decode(ENCRYPTED_HEADER),
        Err(DecodeError::Decrypt(DecryptionError::InvalidToken))
    ));
}

#[test]
fn test_unknown_format() {
    assert!(matches!(
        CODEC.decode(b"PK\x03\x04"),
        Err(DecodeError::UnknownFormat)
    ));
    assert!(matches!(
        CODEC.decode(b"  {\"songs\": []}"),
        Err(DecodeError::UnknownFormat)
    ));
}

#[test]
fn test_summary() {
    assert_eq!(
        summarize_pack(&CODEC, EDITOR_SAVED).unwrap(),
        PackSummary {
            format: PackFormat::Encrypted,
            songs: 2,
            pack_name: "Fixture Pack".into(),
            version: "2.0".into(),
        }
    );
    assert_eq!(
        summarize_pack(&CODEC, LEGACY).unwrap(),
        PackSummary {
            format: PackFormat::LegacyJson,
            songs: 2,
            pack_name: "Fixture Pack".into(),
            version: "1.0".into(),
        }
    );
}

#[test]
fn test_autosave_metadata() {
    let mut pack = PackConfig::new("Auto", "");
    let at = chrono::NaiveDate::from_ymd_opt(2025, 3, 9)
        .and_then(|date| date.and_hms_opt(14, 5, 6))
        .unwrap()
        .and_utc();
    pack.mark_autosave(&at);

    let mut codec = PackCodec::with_entropy(EntropyMock([0x02; 16]));
    let decoded = CODEC.decode(&codec.encode(&pack).unwrap()).unwrap();
    assert_eq!(
        decoded.created_by.as_deref(),
        Some("MikuMikuDB Editor (Autosave)")
    );
    assert_eq!(decoded.autosave, Some(true));
    assert_eq!(decoded.timestamp.as_deref(), Some("20250309_140506"));
}
