//! Benchmark for writing database text.

use criterion::{BenchmarkId, Criterion, Throughput};
use pvdb_rs::{
    db::serialize_pack,
    model::{Credit, DifficultyEntry, DifficultyKind, PackConfig, Song, Variant},
};

fn sample_pack(songs: usize) -> PackConfig {
    let mut pack = PackConfig::new("Bench Pack", "ベンチ");
    pack.songs = (1..=songs)
        .map(|id| {
            let mut song = Song::with_date(format!("{id:03}"), "20250101");
            song.song_name = format!("曲 {id}");
            song.song_name_en = format!("Song {id}");
            song.song_name_reading = "きょく".into();
            song.bpm = 120 + (id % 80) as u32;
            song.sabi_start = "45.0".into();
            song.sabi_play = "20.0".into();
            for kind in DifficultyKind::ALL {
                song.difficulties
                    .insert(kind, DifficultyEntry::from_rating(kind, "7.5"));
            }
            song.performers = vec!["MIK".into(), "LUK".into()];
            song.songinfo.music = Credit::new("作曲", "Music");
            song.songinfo.lyrics = Credit::new("作詞", "Lyrics");
            if id % 3 == 0 {
                song.audio_variants.push(Variant {
                    name: format!("曲 {id} (ルカ)"),
                    name_en: format!("Song {id} (Luka)"),
                    name_reading: "きょく".into(),
                    performers: vec!["LUK".into()],
                    ..Variant::default()
                });
            }
            song
        })
        .collect();
    pack
}

fn bench_serialize_db(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_db");

    for songs in [10, 100, 1000] {
        let pack = sample_pack(songs);
        group.throughput(Throughput::Elements(songs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(songs), &pack, |b, pack| {
            b.iter(|| serialize_pack(std::hint::black_box(pack)).expect("bench pack is complete"));
        });
    }

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_serialize_db(&mut criterion);
}
