//! The flat `key=value` database text read by the game.
//!
//! Raw text == [`lex`] ==> lines == [`parse`] ==> [`Song`](crate::model::Song)s
//!
//! [`PackConfig`](crate::model::PackConfig) == [`serialize`] ==> text
//!
//! A song block looks like this:
//!
//! ```text
//! pv_001.bpm=180
//! pv_001.chainslide_failure_name=slide_ng03
//! pv_001.date=20250101
//! pv_001.difficulty.easy.0.edition=0
//! pv_001.difficulty.easy.0.level=PV_LV_03_0
//! pv_001.difficulty.easy.length=1
//! pv_001.performer.0.chara=MIK
//! pv_001.performer.num=1
//! ```

pub mod detect;
pub mod lex;
pub mod parse;
pub mod serialize;

pub use self::{
    detect::{DbSummary, looks_like_pv_db, summarize_db},
    parse::{
        DbParseOutput, ValidationWarning, ValidationWarningWithRange, parse_db, parse_db_strict,
    },
    serialize::{SerializeError, serialize_pack, serialize_song},
};
