use std::path::PathBuf;

use clap::{Args, Parser};

use crate::cmd::Commands;
use crate::config::BackendKind;

/// Task dashboard CLI.
/// Data lives in ~/.taskflow unless --data-dir is given.
#[derive(Parser)]
#[command(name = "taskflow", version, about = "Task dashboard with local or hosted storage")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory holding taskflow.toml, the session and the local task store.
    #[arg(long, global = true, env = "TASKFLOW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Task store to use, overriding the configuration file.
    #[arg(long, global = true, value_enum, env = "TASKFLOW_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Hosted store project id.
    #[arg(long, global = true, env = "TASKFLOW_PROJECT_ID", hide_env_values = true)]
    pub project_id: Option<String>,

    /// Hosted store public key.
    #[arg(long, global = true, env = "TASKFLOW_PUBLIC_KEY", hide_env_values = true)]
    pub public_key: Option<String>,
}
