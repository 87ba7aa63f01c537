use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// Empty in-process store; every lookup is not found.
    Memory,
    /// YAML or JSON fixture file.
    File,
    /// AWS Secrets Manager (requires the `aws` feature).
    Aws,
}

#[derive(Debug, Args, Clone)]
pub struct BackendArgs {
    /// Secret store to read from. Falls back to SECVER_BACKEND, then `file`.
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,
    /// Fixture file for the `file` backend. Falls back to SECVER_FIXTURES.
    #[arg(long)]
    pub fixtures: Option<PathBuf>,
    /// AWS region for the `aws` backend. Defaults to the SDK's region chain.
    #[arg(long)]
    pub region: Option<String>,
}
