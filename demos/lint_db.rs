//! Lints a `mod_pv_db.txt` file and prints every defaulted or skipped value.
//!
//! ```text
//! cargo run --example lint_db -- path/to/mod_pv_db.txt
//! ```
//!
//! Without an argument, a small built-in sample is linted.

use anyhow::{Context, Result};
use clap::Parser;
use pvdb_rs::{db::parse_db_strict, diagnostics::emit_db_warnings};

const SAMPLE: &str = "\
# A database with a few problems
pv_001.song_name=Sample
pv_001.bpm=fast
pv_001.performer.num=12
this line has no separator
pv_001.difficulty.easy.length=1
";

#[derive(Parser, Debug)]
#[clap(about)]
struct CliArgs {
    /// The database text to lint.
    file: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let (name, source) = match &cli_args.file {
        Some(path) => (
            path.display().to_string(),
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => ("sample.txt".to_string(), SAMPLE.to_string()),
    };

    let output = parse_db_strict(&source);
    println!(
        "{}: {} songs, {} warnings",
        name,
        output.songs.len(),
        output.warnings.len()
    );
    emit_db_warnings(&name, &source, &output.warnings);
    Ok(())
}
