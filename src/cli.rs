//! CLI argument parsing.
//!
//! Every employee field arrives through prompts; flags only pick the backend
//! and override config.
use crate::config::Backend;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "emp-intake",
    version,
    about = "Register employees into the attendance system's Firestore collection",
    after_help = "Commands:\n  menu         Interactive menu (default)\n  add          Register one employee\n  bulk         Register several employees with one confirmation\n  list         List employees ordered by name\n  init         Write an intake.json config\n\nExamples:\n  emp-intake --project attendance-demo\n  FIRESTORE_EMULATOR_HOST=localhost:8080 emp-intake --project demo add\n  emp-intake --backend memory bulk\n  emp-intake list --json"
)]
pub struct RootArgs {
    /// Config file (defaults to ./intake.json when present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum, global = true)]
    pub backend: Option<Backend>,

    /// Firestore project id
    #[arg(long, value_name = "ID", global = true)]
    pub project: Option<String>,

    /// Collection holding employee documents
    #[arg(long, value_name = "NAME", global = true)]
    pub collection: Option<String>,

    /// Per-request timeout for remote calls
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Reject values whose duplicate check could not complete
    #[arg(long, global = true)]
    pub fail_closed: bool,

    /// Log remote calls to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive menu
    Menu,
    /// Register one employee
    Add,
    /// Register several employees with one confirmation
    Bulk,
    /// List employees ordered by name
    List(ListArgs),
    /// Write an intake.json config
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for the config
    #[arg(long, value_name = "PATH", default_value = crate::config::DEFAULT_CONFIG_FILE)]
    pub out: PathBuf,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}
