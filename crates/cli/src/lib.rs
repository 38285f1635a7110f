//! isocheck CLI -- generate histories and check isolation levels.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use isocheck_core::{IsolationLevel, Strategy};

#[derive(Debug, Parser)]
#[command(
    name = "isocheck",
    about = "Black-box isolation checking for transactional histories"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a recorded history against an isolation level
    Check(CheckArgs),
    /// Generate random transactional histories
    Generate(GenerateArgs),
    /// Print the JSON Schema for the history input format to stdout
    Schema,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// History file: a JSON array of operations, or a generated history
    /// envelope
    #[arg(long)]
    pub input: PathBuf,
    /// Isolation level to check
    #[arg(long)]
    pub level: Level,
    /// Cycle search mode
    #[arg(long, default_value = "bounded")]
    pub mode: Mode,
    /// History variant
    #[arg(long, default_value = "list-append")]
    pub variant: Variant,
    /// Write-log file for the register variant: JSON map of key to
    /// ordered versions
    #[arg(long)]
    pub write_log: Option<PathBuf>,
    /// Depth bound for the bounded modes
    #[arg(long, default_value_t = isocheck_core::isolation::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Seed for the bounded-random mode
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Output the verdict as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Number of histories to generate
    #[arg(long)]
    pub n_hist: u64,
    /// Number of transactions per history
    #[arg(long)]
    pub n_txn: u64,
    /// Number of keys
    #[arg(long)]
    pub n_key: u64,
    /// Number of events per transaction
    #[arg(long)]
    pub n_evt: u64,
    /// Base seed; history i uses seed + i
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Output directory for generated history files
    #[arg(long)]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Level {
    #[value(name = "pl-1")]
    Pl1,
    #[value(name = "pl-2")]
    Pl2,
    Psi,
    Si,
    Ser,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Bounded,
    BoundedRandom,
    ShortestPath,
    Exhaustive,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Variant {
    ListAppend,
    RwRegister,
}

impl From<Level> for IsolationLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Pl1 => Self::Pl1,
            Level::Pl2 => Self::Pl2,
            Level::Psi => Self::ParallelSnapshotIsolation,
            Level::Si => Self::SnapshotIsolation,
            Level::Ser => Self::Serializable,
        }
    }
}

impl CheckArgs {
    /// The search strategy selected by `--mode`, `--max-depth`, `--seed`.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self.mode {
            Mode::Bounded => Strategy::Bounded {
                max_depth: self.max_depth,
            },
            Mode::BoundedRandom => Strategy::BoundedRandom {
                max_depth: self.max_depth,
                seed: self.seed,
            },
            Mode::ShortestPath => Strategy::ShortestPath,
            Mode::Exhaustive => Strategy::Exhaustive,
        }
    }
}

/// Renders a witness cycle as `T1 (ww) T2 (wr) T1`.
#[must_use]
pub fn render_cycle(cycle: &[isocheck_core::TxnDepEdge<String>]) -> String {
    use std::fmt::Write;

    let mut rendered = String::new();
    if let Some(first) = cycle.first() {
        let _ = write!(rendered, "T{}", first.from);
        for edge in cycle {
            let _ = write!(rendered, " ({}) T{}", edge.dep, edge.to);
        }
    }
    rendered
}
