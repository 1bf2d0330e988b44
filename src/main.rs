//! # TaskFlow CLI
//!
//! Manage tasks from the terminal against a local JSON store or a hosted
//! record store, with the same dashboard statistics either way.
//!
//! ## Quick Start
//!
//! ```bash
//! # Sign in (required before touching tasks)
//! taskflow login --email ada@example.com --first-name Ada
//!
//! # Overview counts and the task list
//! taskflow dashboard
//!
//! # Add, progress and remove tasks
//! taskflow add "Write release notes" --priority high --due friday
//! taskflow start 4
//! taskflow complete 4
//! taskflow delete 4
//! ```
//!
//! Data is stored in `~/.taskflow/` (override with `--data-dir`). Put
//! `taskflow.toml` there to switch to the hosted backend:
//!
//! ```toml
//! [backend]
//! kind = "remote"
//!
//! [remote]
//! base_url = "https://api.example.com/v1"
//! ```
//!
//! Set `RUST_LOG=taskflow=debug` to trace repository calls on stderr.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taskflow::cli::Cli;
use taskflow::cmd;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Tracing is opt-in via RUST_LOG; ignore filters that don't parse.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = cmd::run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
