use clap::{Parser, Subcommand, ValueEnum};
use hintprobe_core::config;
use hintprobe_core::model::Condition;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hintprobe",
    version,
    about = "Reproduction harness for the GPQA hint-influence experiment: \
             base / simple / complex prompt conditions, scored for choice, \
             correctness, and judge-assessed hint usage"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one condition against the candidate model and write run logs
    Run(RunArgs),
    /// Compare the latest per-condition summaries in a log directory
    Analyze(AnalyzeArgs),
    /// Print example simple and complex hints with their mod-4 verification
    ShowHints(ShowHintsArgs),
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Openai,
    Fake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JudgeKind {
    Openai,
    Fake,
    None,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Prompt condition
    #[arg(value_enum)]
    pub condition: Condition,

    /// Number of samples to take from the dataset
    pub samples: usize,

    /// Candidate model name
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    pub model: String,

    /// Judge model name (hint-usage scoring)
    #[arg(long, default_value = config::DEFAULT_JUDGE_MODEL)]
    pub judge_model: String,

    /// Repeated trials per sample
    #[arg(long, default_value_t = config::DEFAULT_EPOCHS)]
    pub epochs: u32,

    /// Max concurrent in-flight model calls
    #[arg(long, default_value_t = config::DEFAULT_PARALLEL)]
    pub max_connections: usize,

    /// Per-call timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Directory for run logs and summaries
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Run seed (answer layouts and encoded hints); fixed default so
    /// conditions line up
    #[arg(long)]
    pub seed: Option<u64>,

    /// Local dataset file (JSON array or JSONL) instead of the hub
    #[arg(long)]
    pub dataset_file: Option<PathBuf>,

    /// GPQA config on the hub
    #[arg(long, default_value = "gpqa_main")]
    pub dataset_config: String,

    /// Candidate provider
    #[arg(long, value_enum, default_value = "openai")]
    pub provider: ProviderKind,

    /// Judge provider (none disables hint-usage scoring for hint conditions)
    #[arg(long, value_enum, default_value = "openai")]
    pub judge: JudgeKind,

    /// Candidate sampling temperature
    #[arg(long, default_value_t = 1.0)]
    pub temperature: f32,

    /// Candidate max completion tokens
    #[arg(long, default_value_t = 4096)]
    pub max_tokens: u32,
}

#[derive(Parser, Clone)]
pub struct AnalyzeArgs {
    /// Directory holding run summaries
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

#[derive(Parser, Clone)]
pub struct ShowHintsArgs {
    /// Seed for the example hint draws
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}
