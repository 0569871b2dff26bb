//! # td - CRM task list CLI
//!
//! Lists, groups and summarises the tasks of a sales CRM, and creates,
//! edits, completes and deletes them in a local JSON store.
//!
//! ```bash
//! # Add a follow-up due Friday afternoon
//! td add "Send revised quote" --type follow-up --priority high --due "friday 15:00" --tag renewal
//!
//! # Everything overdue, most important first
//! td list --filter overdue --sort priority
//!
//! # Grouped view: Overdue / Today / Tomorrow / This Week / Later / No Due Date
//! td list --grouped
//!
//! # Header counters
//! td stats
//! ```
//!
//! Data lives in `~/.taskdesk/tasks.json` unless `--db` or `TASKDESK_DB` says
//! otherwise.

use std::path::PathBuf;

use chrono::Local;
use clap::Parser;

use taskdesk::store::JsonStore;

pub mod cli;
pub mod cmd;
pub mod output;

use cli::Cli;
use cmd::*;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let db_path = match cli.db {
        Some(path) => path,
        None => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".taskdesk").join("tasks.json")
        }
    };
    log::debug!("using task store {}", db_path.display());

    let mut store = JsonStore::new(db_path).with_page_size(cli.page_size);
    let now = Local::now().naive_local();

    let result = match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::List { quick, priority, task_type, status, search, sort, grouped, limit } =>
            cmd_list(&store, now, quick, priority, task_type, status, search, sort, grouped, limit),

        Commands::Stats { json } => cmd_stats(&store, now, json),

        Commands::View { id } => cmd_view(&store, now, id),

        Commands::Add { title, task_type, priority, status, due, assignee, related_to, desc, tags } =>
            cmd_add(&mut store, now, title, task_type, priority, status, due, assignee,
                    related_to, desc, tags),

        Commands::Update {
            id, title, task_type, priority, status, due, clear_due, assignee, related_to,
            desc, add_tags, rm_tags,
        } => cmd_update(&mut store, now, id, title, task_type, priority, status, due, clear_due,
                        assignee, related_to, desc, add_tags, rm_tags),

        Commands::Complete { id } => cmd_complete(&mut store, id),

        Commands::Delete { id } => cmd_delete(&mut store, id),

        Commands::Tags => cmd_tags(&store),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
