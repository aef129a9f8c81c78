//! Reader and writer of Project DIVA song databases.
//!
//! Two formats are handled:
//!
//! - `mod_pv_db.txt`, the flat `key=value` text the game reads, in [`db`].
//! - `.pdpack`, the project file of the song pack editor, in [`pack`]. New packs are JSON sealed in
//!   a Fernet token, old packs are plain JSON. Both are read.
//!
//! Songs live in [`model`]. Difficulty ratings such as `7.5` and their level tokens such as
//! `PV_LV_07_5` are converted in [`level`].
//!
//! ```rust
//! use pvdb_rs::{
//!     db::{parse_db, serialize_pack},
//!     model::{DifficultyEntry, DifficultyKind, PackConfig, Song},
//! };
//!
//! let mut song = Song::new("001");
//! song.song_name = "Song".into();
//! song.song_name_en = "Song".into();
//! song.song_name_reading = "そんぐ".into();
//! song.bpm = 180;
//! song.difficulties
//!     .insert(DifficultyKind::Easy, DifficultyEntry::new("PV_LV_03_0", 50));
//!
//! let mut pack = PackConfig::new("Pack", "パック");
//! pack.songs.push(song);
//!
//! let text = serialize_pack(&pack).unwrap();
//! assert!(text.contains("pv_001.bpm=180"));
//! assert_eq!(parse_db(&text)[0].bpm, 180);
//! ```
//!
//! # Features
//!
//! - `pack` (default): reading and writing `.pdpack` files. Enables `serde`.
//! - `rand` (default): operating system randomness for new pack IVs.
//! - `diagnostics` (default): [`ariadne`](https://crates.io/crates/ariadne) reports of database
//!   warnings.
//! - `serde`: `Serialize`/`Deserialize` on the model and warnings.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod db;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod level;
pub mod mixin;
pub mod model;
#[cfg(feature = "pack")]
pub mod pack;
