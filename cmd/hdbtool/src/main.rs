use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use hashdb::{BackingMode, EntryMatch, FsIndexBackend, HashDb, HashDbConfig, LookupFlags};
use hashdb_input::extract_md5_hash;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "hdbtool",
    version,
    about = "Inspect hash databases and their lookup indexes"
)]
struct Args {
    /// Report why a hash-set name fell back to the file name
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the hash-set name
    Name {
        /// Hash database or index file
        path: PathBuf,

        /// What is available on disk for this hash-set
        #[arg(long, value_enum, default_value_t = Mode::IndexOnly)]
        mode: Mode,
    },

    /// Create an empty index
    MakeIndex {
        /// Hash database or index file
        path: PathBuf,

        /// Source type of the hash-set
        #[arg(long, default_value = "md5sum")]
        db_type: String,

        /// What is available on disk for this hash-set
        #[arg(long, value_enum, default_value_t = Mode::IndexOnly)]
        mode: Mode,
    },

    /// Read the source record for a hash at a byte offset
    Lookup {
        /// Hash database or index file
        path: PathBuf,

        /// MD5 hash, or an md5sum record containing one
        hash: String,

        /// Byte offset of the record in the source file
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Only report whether the record matches
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// What is available on disk for this hash-set
        #[arg(long, value_enum, default_value_t = Mode::IndexOnly)]
        mode: Mode,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Full,
    IndexOnly,
    Structured,
}

impl From<Mode> for BackingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Full => BackingMode::FullDatabase,
            Mode::IndexOnly => BackingMode::IndexOnly,
            Mode::Structured => BackingMode::StructuredIndex,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;
    let config = HashDbConfig {
        verbose: args.verbose,
    };

    match args.command {
        Command::Name { path, mode } => {
            let db = open(&path, mode, config)?;
            println!("{}", db.name());
        }
        Command::MakeIndex {
            path,
            db_type,
            mode,
        } => {
            let mut db = open(&path, mode, config)?;
            db.make_index(&FsIndexBackend, &db_type)
                .with_context(|| format!("make index for {}", path.display()))?;
            let index = db
                .index()
                .map(|index| index.path().display().to_string())
                .unwrap_or_default();
            info!(name = %db.name(), index = %index, "created empty index");
            println!("{index}");
        }
        Command::Lookup {
            path,
            hash,
            offset,
            quick,
            mode,
        } => {
            let digest = extract_md5_hash(&hash).ok_or_else(|| anyhow!("no md5 hash in {hash:?}"))?;
            let hash = hex::encode(digest);
            let flags = if quick {
                LookupFlags::QUICK
            } else {
                LookupFlags::empty()
            };

            let db = open(&path, mode, config)?;
            db.get_entry(&hash, offset, flags, &mut |entry: &EntryMatch<'_>| {
                if quick {
                    println!("{}", entry.hash);
                } else {
                    println!("{}\t{}\t{}", entry.hash, db.name(), entry.name);
                }
                Ok(())
            })
            .with_context(|| format!("lookup {hash} in {}", path.display()))?;
        }
    }

    Ok(())
}

fn open(path: &Path, mode: Mode, config: HashDbConfig) -> Result<HashDb> {
    HashDb::open(path, mode.into(), config, &FsIndexBackend)
        .with_context(|| format!("open {}", path.display()))
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}
