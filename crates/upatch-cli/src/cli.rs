use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use upatch_diff::DiffAlgorithm;

#[derive(Parser)]
#[command(
    name = "upatch",
    about = "upatch: git-style patches between files and directory trees",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show changes between two files or two directory trees
    Diff(DiffArgs),
    /// Print the fingerprint and mode recorded for files
    Hash(HashArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Old side; `/dev/null` marks a creation
    pub old: PathBuf,
    /// New side; `/dev/null` marks a deletion
    pub new: PathBuf,
    #[arg(long)]
    pub src_prefix: Option<String>,
    #[arg(long)]
    pub dst_prefix: Option<String>,
    #[arg(long, conflicts_with_all = ["src_prefix", "dst_prefix"])]
    pub no_prefix: bool,
    /// Lines of context around each change
    #[arg(short = 'U', long)]
    pub unified: Option<usize>,
    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,
    /// Print file headers without hunks
    #[arg(long)]
    pub header_only: bool,
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorChoice,
    /// TOML file with prefix and differ settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum AlgorithmArg {
    Myers,
    Patience,
    Lcs,
}

impl From<AlgorithmArg> for DiffAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Myers => DiffAlgorithm::Myers,
            AlgorithmArg::Patience => DiffAlgorithm::Patience,
            AlgorithmArg::Lcs => DiffAlgorithm::Lcs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}
