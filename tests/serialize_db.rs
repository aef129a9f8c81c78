use pretty_assertions::assert_eq;
use pvdb_rs::{
    db::{SerializeError, parse_db, serialize_pack, serialize_song},
    model::{Credit, DifficultyEntry, DifficultyKind, PackConfig, Song, Variant},
};

fn base_song() -> Song {
    let mut song = Song::with_date("001", "20250101");
    song.song_name = "テスト".into();
    song.song_name_en = "Test".into();
    song.song_name_reading = "てすと".into();
    song.bpm = 180;
    song.difficulties.insert(
        DifficultyKind::Easy,
        DifficultyEntry::new("PV_LV_03_0", 50),
    );
    song.performers = vec!["MIK".into()];
    song.songinfo.music = Credit::new("X", "Y");
    song
}

#[test]
fn test_single_song_block() {
    let text = serialize_song(&base_song()).unwrap();
    let lines: Vec<_> = text.lines().collect();

    assert!(lines.contains(&"pv_001.bpm=180"));
    assert!(lines.contains(&"pv_001.difficulty.easy.length=1"));
    assert!(lines.contains(&"pv_001.performer.num=1"));
    assert!(!text.contains("another_song"));
    assert!(lines.iter().all(|line| line.starts_with("pv_001.")));
    assert_eq!(lines.first(), Some(&"pv_001.bpm=180"));
    assert_eq!(lines.last(), Some(&"pv_001.sudden_timing=0.6"));
}

#[test]
fn test_full_key_order() {
    let text = serialize_song(&base_song()).unwrap();
    let expected = "\
pv_001.bpm=180
pv_001.chainslide_failure_name=slide_ng03
pv_001.chainslide_first_name=slide_long02a
pv_001.chainslide_sub_name=slide_button08
pv_001.chainslide_success_name=slide_ok03
pv_001.date=20250101
pv_001.difficulty.easy.0.edition=0
pv_001.difficulty.easy.0.level=PV_LV_03_0
pv_001.difficulty.easy.0.level_sortindex=50
pv_001.difficulty.easy.0.script_filename=rom/script/pv_001_easy.dsc
pv_001.difficulty.easy.0.scriptformat=0x15122517
pv_001.difficulty.easy.0.version=1
pv_001.difficulty.easy.length=1
pv_001.difficulty.extreme.length=0
pv_001.difficulty.hard.length=0
pv_001.difficulty.normal.length=0
pv_001.hiddentiming=0.3
pv_001.high_speedrate=4
pv_001.movie_filename=rom/movie/pv_001.mp4
pv_001.movie_pvtype=ONLY
pv_001.movie_surface=FRONT
pv_001.pack=2
pv_001.performer.0.chara=MIK
pv_001.performer.0.pv_costume=1
pv_001.performer.0.type=VOCAL
pv_001.performer.num=1
pv_001.sabi.playtime=0
pv_001.sabi.start_time=0
pv_001.se_name=01_button1
pv_001.slide_name=slide_se13
pv_001.slidertouch_name=slide_windchime
pv_001.song_filename=rom/sound/song/pv_001.ogg
pv_001.song_name=テスト
pv_001.song_name_en=Test
pv_001.song_name_reading=てすと
pv_001.songinfo.music=X
pv_001.songinfo_en.music=Y
pv_001.sudden_timing=0.6";
    assert_eq!(text, expected);
}

#[test]
fn test_extreme_extra_alone_takes_index_zero() {
    let mut song = base_song();
    song.difficulties.insert(
        DifficultyKind::ExtremeExtra,
        DifficultyEntry::new("PV_LV_09_5", 50),
    );
    let text = serialize_song(&song).unwrap();
    let extreme: Vec<_> = text
        .lines()
        .filter(|line| line.starts_with("pv_001.difficulty.extreme."))
        .collect();
    assert_eq!(
        extreme,
        vec![
            "pv_001.difficulty.extreme.0.attribute.extra=1",
            "pv_001.difficulty.extreme.0.attribute.original=0",
            "pv_001.difficulty.extreme.0.edition=1",
            "pv_001.difficulty.extreme.0.level=PV_LV_09_5",
            "pv_001.difficulty.extreme.0.level_sortindex=50",
            "pv_001.difficulty.extreme.0.script_filename=rom/script/pv_001_extreme_0.dsc",
            "pv_001.difficulty.extreme.0.scriptformat=0x15122517",
            "pv_001.difficulty.extreme.0.version=1",
            "pv_001.difficulty.extreme.length=1",
        ]
    );
}

#[test]
fn test_both_extreme_charts() {
    let mut song = base_song();
    song.difficulties.insert(
        DifficultyKind::Extreme,
        DifficultyEntry::new("PV_LV_09_0", 50),
    );
    song.difficulties.insert(
        DifficultyKind::ExtremeExtra,
        DifficultyEntry::new("PV_LV_10_0", 50),
    );
    let text = serialize_song(&song).unwrap();
    assert!(text.contains("pv_001.difficulty.extreme.0.edition=0"));
    assert!(text.contains("pv_001.difficulty.extreme.0.level=PV_LV_09_0"));
    assert!(text.contains("pv_001.difficulty.extreme.1.attribute.extra=1"));
    assert!(text.contains("pv_001.difficulty.extreme.1.script_filename=rom/script/pv_001_extreme_1.dsc"));
    assert!(text.contains("pv_001.difficulty.extreme.length=2"));
}

#[test]
fn test_variants_block() {
    let mut song = base_song();
    song.performers = vec!["MIK".into(), "RIN".into()];
    song.audio_variants = vec![
        Variant {
            name: "テスト (リン)".into(),
            name_en: "Test (Rin)".into(),
            name_reading: "てすと".into(),
            vocal_disp: "鏡音リン".into(),
            performers: vec!["RIN".into()],
            ..Variant::default()
        },
        Variant {
            name: "テスト2".into(),
            name_en: "Test 2".into(),
            file_suffix: "alt".into(),
            ..Variant::default()
        },
    ];
    let text = serialize_song(&song).unwrap();
    let variants: Vec<_> = text
        .lines()
        .take_while(|line| line.starts_with("pv_001.another_song."))
        .collect();
    assert_eq!(
        variants,
        vec![
            "pv_001.another_song.0.name=テスト",
            "pv_001.another_song.0.name_en=Test",
            "pv_001.another_song.0.name_reading=てすと",
            "pv_001.another_song.0.vocal_chara_num=MIK",
            "pv_001.another_song.1.name=テスト (リン)",
            "pv_001.another_song.1.name_en=Test (Rin)",
            "pv_001.another_song.1.name_reading=てすと",
            "pv_001.another_song.1.vocal_chara_num=RIN",
            "pv_001.another_song.1.song_file_name=rom/sound/song/pv_001_1.ogg",
            "pv_001.another_song.1.vocal_disp_name=鏡音リン",
            "pv_001.another_song.2.name=テスト2",
            "pv_001.another_song.2.name_en=Test 2",
            "pv_001.another_song.2.name_reading=テスト2",
            "pv_001.another_song.2.vocal_chara_num=MIK",
            "pv_001.another_song.2.song_file_name=rom/sound/song/pv_001_alt.ogg",
            "pv_001.another_song.length=3",
        ]
    );
}

#[test]
fn test_songinfo_two_passes() {
    let mut song = base_song();
    song.songinfo.lyrics = Credit::new("作詞", "Lyrics");
    song.songinfo.arranger = Credit::new("", "Arranger");
    let text = serialize_song(&song).unwrap();
    let credits: Vec<_> = text
        .lines()
        .filter(|line| line.contains(".songinfo"))
        .collect();
    assert_eq!(
        credits,
        vec![
            "pv_001.songinfo.lyrics=作詞",
            "pv_001.songinfo.music=X",
            "pv_001.songinfo_en.arranger=Arranger",
            "pv_001.songinfo_en.lyrics=Lyrics",
            "pv_001.songinfo_en.music=Y",
        ]
    );
}

#[test]
fn test_pack_separates_blocks() {
    let mut pack = PackConfig::new("Two", "");
    let mut second = base_song();
    second.pv_id = "002".into();
    second.song_name_en.clear();
    pack.songs = vec![base_song(), second];

    let text = serialize_pack(&pack).unwrap();
    assert!(text.contains("# pv_001\tテスト | Test\n# pv_002\tテスト\n"));
    assert!(text.contains("pv_001.sudden_timing=0.6\n\npv_002.bpm=180\n"));
    assert!(!text.ends_with('\n'));
}

#[test]
fn test_line_breaks_are_rejected() {
    let invalid = |pv_id: &str, field| -> Result<String, SerializeError> {
        Err(SerializeError::InvalidValue {
            pv_id: pv_id.into(),
            field,
        })
    };

    let mut song = base_song();
    song.song_name = "Evil\npv_001.bpm=999".into();
    assert_eq!(serialize_song(&song), invalid("001", "song_name"));

    let mut song = base_song();
    song.sabi_start = "30.0\r".into();
    assert_eq!(serialize_song(&song), invalid("001", "sabi.start_time"));

    let mut song = base_song();
    song.audio_variants = vec![Variant {
        name: "Alt".into(),
        name_en: "Alt\npv_001.pack=9".into(),
        ..Variant::default()
    }];
    assert_eq!(serialize_song(&song), invalid("001", "another_song.name_en"));

    let mut song = base_song();
    song.songinfo.lyrics = Credit::new("", "Words\nmore");
    assert_eq!(serialize_song(&song), invalid("001", "songinfo_en"));

    let mut song = base_song();
    song.songinfo.arranger = Credit::new("編\r\n曲", "");
    assert_eq!(serialize_song(&song), invalid("001", "songinfo"));
}

#[test]
fn test_pv_id_must_be_one_key_segment() {
    for pv_id in ["1.5", "00=1", "0 1"] {
        let mut song = base_song();
        song.pv_id = pv_id.into();
        assert_eq!(
            serialize_song(&song),
            Err(SerializeError::InvalidValue {
                pv_id: pv_id.into(),
                field: "pv_id",
            })
        );
    }
}

#[test]
fn test_pack_name_line_break_is_rejected() {
    let mut pack = PackConfig::new("Bad\npv_001.bpm=1", "");
    pack.songs.push(base_song());
    assert_eq!(serialize_pack(&pack), Err(SerializeError::InvalidPackName));
}

#[test]
fn test_written_text_keeps_song_values() {
    let mut pack = PackConfig::new("Safe", "");
    let mut song = base_song();
    song.song_name = "a=b # c".into();
    pack.songs.push(song);

    let parsed = parse_db(&serialize_pack(&pack).unwrap());
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].song_name, "a=b # c");
    assert_eq!(parsed[0].bpm, 180);
}
