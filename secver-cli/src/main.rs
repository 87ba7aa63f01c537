use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "secver", version, about = "Resolve versions of secrets by id or stage label")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. `debug`, `secver_core=trace`).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Get {
            secret_id,
            version_id,
            version_stage,
            show_sensitive,
            output,
            backend,
        } => {
            cmd::get::get_cmd(
                &secret_id,
                version_id.as_deref(),
                version_stage.as_deref(),
                show_sensitive,
                backend,
                output,
            )
            .await
        }
        Command::Schema { output } => cmd::schema::schema_cmd(output),
        Command::Doctor { backend, output } => cmd::doctor::doctor_cmd(backend, output).await,
    }
}
