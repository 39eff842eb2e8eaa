//! # TB - Property Operations Task Board
//!
//! A role-aware task dashboard for property management teams: managers
//! assign and track maintenance and administrative work across properties,
//! staff see and progress only their own assignments.
//!
//! ## Key Features
//!
//! - **Role Scoping**: managers see every task, staff see theirs; one
//!   predicate drives both the views and the mutation guards
//! - **Dashboard Filtering**: sidebar selectors, per-assignee narrowing,
//!   status/priority multi-selects, due buckets (overdue/today/week), and
//!   full-text search across titles, people, labels, and dates
//! - **Two Interfaces**: a CLI for scripted queries + an interactive TUI
//!   with kanban and table views that adapt to the terminal width
//! - **In-Memory State**: ships with a builtin demo dataset; point `--data`
//!   at a JSON seed file to load your own. Nothing is persisted
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the dashboard as the default staff login
//! tb ui
//!
//! # Launch as the manager
//! tb --role manager ui
//!
//! # List one assignee's overdue work
//! tb --role manager list --staff rahul --due overdue
//!
//! # Add a task via CLI
//! tb --role manager add "Fix lobby lighting" --assignee meena --due tomorrow --property BLD-A
//!
//! # Badge counts and workload
//! tb --role manager summary
//! ```
//!
//! ## Key Commands
//!
//! - `tb ui` - launch the interactive dashboard
//! - `tb list` - filtered task listing, same pipeline as the dashboard
//! - `tb summary` - sidebar counts plus the manager workload strip
//! - `tb add / update / delete` - manager task administration
//! - `tb start / complete / reopen` - status transitions
//!
//! Seed files follow the shape `{"users": [..], "tasks": [..]}`; when the
//! `users` array is omitted the builtin roster is kept.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod filter;
pub mod seed;
pub mod store;
pub mod task;
pub mod user;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use fields::{Role, Status};
use store::Store;
use user::User;

/// Pick the session's acting user: --user wins, then --role, then the
/// first staff member (matching the demo's default login).
fn resolve_acting_user(store: &Store, user: Option<String>, role: Option<Role>) -> User {
    if let Some(id) = user {
        match store.user(&id) {
            Some(u) => return u.clone(),
            None => {
                eprintln!("No user with id {id}");
                std::process::exit(1);
            }
        }
    }
    if let Some(role) = role {
        match store.users_with_role(role).first() {
            Some(u) => return (*u).clone(),
            None => {
                eprintln!("No user holds the {role:?} role");
                std::process::exit(1);
            }
        }
    }
    let fallback = store
        .users
        .iter()
        .find(|u| u.role == Role::Staff)
        .or_else(|| store.users.get(1))
        .or_else(|| store.users.first());
    match fallback {
        Some(u) => u.clone(),
        None => {
            eprintln!("Seed data contains no users.");
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Completions never need the dataset.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let mut store = match cli.data.as_deref() {
        Some(path) => match Store::from_path(path) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => Store::builtin(),
    };

    let user = resolve_acting_user(&store, cli.user, cli.role);

    match cli.command {
        Commands::Ui => cmd_ui(store, user),

        Commands::List {
            filter,
            staff,
            status,
            priority,
            due,
            search,
            sort,
            limit,
        } => cmd_list(
            &store, &user, filter, staff, status, priority, due, search, sort, limit,
        ),

        Commands::Summary => cmd_summary(&store, &user),

        Commands::Add {
            title,
            desc,
            assignee,
            priority,
            status,
            due,
            property,
        } => cmd_add(
            &mut store, &user, title, desc, assignee, priority, status, due, property,
        ),

        Commands::View { id } => cmd_view(&store, &user, id),

        Commands::Update {
            id,
            title,
            desc,
            assignee,
            priority,
            status,
            due,
            property,
            clear_due,
            clear_property,
        } => cmd_update(
            &mut store, &user, id, title, desc, assignee, priority, status, due, property,
            clear_due, clear_property,
        ),

        Commands::Start { id } => {
            cmd_set_status(&mut store, &user, id, Status::InProgress, "Started")
        }

        Commands::Complete { id } => {
            cmd_set_status(&mut store, &user, id, Status::Completed, "Completed")
        }

        Commands::Reopen { id } => {
            cmd_set_status(&mut store, &user, id, Status::Pending, "Reopened")
        }

        Commands::Delete { id } => cmd_delete(&mut store, &user, id),

        Commands::Users => cmd_users(&store),

        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
