use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::fields::Role;

/// Role-aware task dashboard for property operations.
/// State is held in memory only: the builtin demo dataset, or a JSON seed
/// file passed via --data. Nothing is written back to disk.
#[derive(Parser)]
#[command(name = "tb", version, about = "Property operations task dashboard")]
pub struct Cli {
    /// Path to a JSON seed file: {"users": [..], "tasks": [..]}.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Act as this user id.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Act as the first user holding this role. Ignored when --user is set.
    #[arg(long, global = true, value_enum)]
    pub role: Option<Role>,

    #[command(subcommand)]
    pub command: Commands,
}
