use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DURATION_CACHE_FILE: &str = "duration_cache.json";

#[derive(Parser, Debug)]
#[command(
    name = "coursegen",
    version,
    about = "Turn course spreadsheet exports into generated catalog data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the catalog as a TypeScript data module.
    Generate(GenerateArgs),
    /// Warm the duration cache for a content table.
    Prefetch(PrefetchArgs),
    /// Render the catalog as SQL seed statements.
    Seed(GenerateArgs),
    Status(StatusArgs),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum MatchMode {
    /// Byte-for-byte equality of category and title.
    #[default]
    Exact,
    /// Equality after trimming and lowercasing both sides.
    Normalized,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Normalized => "normalized",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    #[arg(long, default_value = ".cache/coursegen")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub layout: Option<PathBuf>,

    #[arg(long, default_value_t = 5)]
    pub workers: usize,

    #[arg(long)]
    pub fetch_timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub no_fetch: bool,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    #[arg(long)]
    pub content_csv: PathBuf,

    #[arg(long)]
    pub category_csv: PathBuf,

    #[arg(long)]
    pub course_csv: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = MatchMode::Exact)]
    pub match_mode: MatchMode,

    #[arg(long, default_value_t = false)]
    pub no_manifest: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PrefetchArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    #[arg(long)]
    pub content_csv: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/coursegen")]
    pub cache_root: PathBuf,
}

impl FetchArgs {
    pub fn cache_path(&self) -> PathBuf {
        self.cache_root.join(DURATION_CACHE_FILE)
    }
}

impl StatusArgs {
    pub fn cache_path(&self) -> PathBuf {
        self.cache_root.join(DURATION_CACHE_FILE)
    }
}
