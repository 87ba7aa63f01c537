use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one version of a secret and print its attributes.
    Get {
        secret_id: String,
        #[arg(long)]
        version_id: Option<String>,
        #[arg(long)]
        version_stage: Option<String>,
        /// Print secret_string and secret_binary instead of a placeholder.
        #[arg(long)]
        show_sensitive: bool,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Print the data source's attribute schema.
    Schema {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check the configured secret store backend.
    Doctor {
        #[command(flatten)]
        backend: BackendArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}
