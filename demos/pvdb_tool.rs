//! Command line front end: converts between `.pdpack` files and `mod_pv_db.txt`.
//!
//! ```text
//! cargo run --example pvdb_tool -- generate my_pack.pdpack -o mod_pv_db.txt
//! cargo run --example pvdb_tool -- import mod_pv_db.txt -o imported.pdpack --name "Imported"
//! cargo run --example pvdb_tool -- migrate old.pdpack
//! cargo run --example pvdb_tool -- info my_pack.pdpack
//! ```
//!
//! Set `LOG_LEVEL=debug` to see what the library does.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pvdb_rs::{
    db::{looks_like_pv_db, parse_db_strict, serialize_pack, summarize_db},
    model::PackConfig,
    pack::{PackCodec, PackFormat, detect_format, entropy::Entropy, summarize_pack},
};
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser, Debug)]
#[clap(version, about)]
struct CliArgs {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Writes the database text of a pack.
    Generate {
        /// The `.pdpack` file to read.
        pack: PathBuf,
        /// Where to write the text.
        #[clap(short, long, default_value = "mod_pv_db.txt")]
        output: PathBuf,
        /// Write even if some songs fail validation.
        #[clap(long)]
        force: bool,
    },
    /// Reads database text into a new encrypted pack.
    Import {
        /// The database text to read.
        db: PathBuf,
        /// Where to write the pack.
        #[clap(short, long)]
        output: PathBuf,
        /// Name of the new pack.
        #[clap(long, default_value = "Imported Pack")]
        name: String,
    },
    /// Rewrites a legacy JSON pack as an encrypted pack.
    Migrate {
        /// The pack to convert.
        pack: PathBuf,
        /// Where to write the result. Defaults to overwriting the input.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Prints what a pack or database file contains.
    Info {
        /// A `.pdpack` file or database text.
        file: PathBuf,
    },
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

fn generate<E>(codec: &PackCodec<E>, pack: &Path, output: &Path, force: bool) -> Result<()> {
    let config = codec
        .decode(&read(pack)?)
        .with_context(|| format!("failed to open {}", pack.display()))?;

    let problems = config.check_validity();
    for (index, problem) in &problems {
        let pv_id = config.songs.get(*index).map_or("?", |song| song.pv_id.as_str());
        log::warn!("pv_{pv_id}: {problem}");
    }
    if !problems.is_empty() && !force {
        bail!(
            "{} problems found, fix them or pass --force",
            problems.len()
        );
    }
    for (pv_id, count) in config.duplicate_pv_ids() {
        log::warn!("pv_{pv_id} is used by {count} songs");
    }

    let text = serialize_pack(&config)?;
    write(output, text.as_bytes())?;
    log::info!(
        "wrote {} songs to {}",
        config.songs.len(),
        output.display()
    );
    Ok(())
}

fn import<E: Entropy>(
    codec: &mut PackCodec<E>,
    db: &Path,
    output: &Path,
    name: String,
) -> Result<()> {
    let bytes = read(db)?;
    let text =
        String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", db.display()))?;
    let parsed = parse_db_strict(&text);
    if parsed.songs.is_empty() {
        bail!("no PV entries found in {}", db.display());
    }
    for warning in &parsed.warnings {
        log::debug!("{warning}");
    }
    log::info!(
        "read {} songs, {} values defaulted",
        parsed.songs.len(),
        parsed.warnings.len()
    );

    let mut config = PackConfig::new(name, "");
    config.songs = parsed.songs;
    config.mark_encrypted();
    write(output, &codec.encode(&config)?)?;
    log::info!("saved {}", output.display());
    Ok(())
}

fn migrate<E: Entropy>(
    codec: &mut PackCodec<E>,
    pack: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let decoded = codec
        .decode_with_format(&read(pack)?)
        .with_context(|| format!("failed to open {}", pack.display()))?;
    if decoded.format == PackFormat::Encrypted {
        log::info!("{} is already encrypted", pack.display());
        return Ok(());
    }
    let mut config = decoded.config;
    config.migrate_from_legacy();
    let output = output.unwrap_or(pack);
    write(output, &codec.encode(&config)?)?;
    log::info!("migrated {} to {}", pack.display(), output.display());
    Ok(())
}

fn info<E>(codec: &PackCodec<E>, file: &Path) -> Result<()> {
    let bytes = read(file)?;
    if detect_format(&bytes).is_some() {
        let summary = summarize_pack(codec, &bytes)?;
        println!("format:  {}", summary.format);
        println!("name:    {}", summary.pack_name);
        println!("version: {}", summary.version);
        println!("songs:   {}", summary.songs);
        return Ok(());
    }
    let text = String::from_utf8_lossy(&bytes);
    if !looks_like_pv_db(&text) {
        bail!("{} is neither a pack nor database text", file.display());
    }
    let summary = summarize_db(&text);
    println!("format:  database text");
    println!("songs:   {}", summary.songs);
    println!("lines:   {}", summary.lines);
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let mut codec = PackCodec::new();
    match cli_args.command {
        Command::Generate {
            pack,
            output,
            force,
        } => generate(&codec, &pack, &output, force),
        Command::Import { db, output, name } => import(&mut codec, &db, &output, name),
        Command::Migrate { pack, output } => migrate(&mut codec, &pack, output.as_deref()),
        Command::Info { file } => info(&codec, &file),
    }
}
