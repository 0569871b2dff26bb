use std::path::PathBuf;

use clap::Parser;

use taskdesk::store::DEFAULT_PAGE_SIZE;

use crate::cmd::Commands;

/// Task list for the sales CRM.
/// Storage defaults to ~/.taskdesk/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "td", version, about = "Sales CRM task list")]
pub struct Cli {
    /// Path to the JSON task store.
    #[arg(long, global = true, env = "TASKDESK_DB")]
    pub db: Option<PathBuf>,

    /// Maximum number of tasks loaded from the store.
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// More logging: -v for info, -vv for debug. RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
