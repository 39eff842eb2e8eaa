//! Command implementations for the CLI interface.
//!
//! Each subcommand works against the in-memory store for one invocation:
//! read commands derive a view the same way the dashboard does, mutating
//! commands apply the store's permissive merge semantics and report the
//! result. Role checks live here, not in the store, so the store keeps the
//! same behaviour for every caller.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use chrono::{Local, NaiveDate};

use crate::fields::*;
use crate::filter::{derive_view, workload_summary, FilterState};
use crate::store::*;
use crate::task::TaskDraft;
use crate::tui::run::run_dashboard;
use crate::user::User;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard.
    Ui,

    /// List visible tasks with the dashboard's filters.
    List {
        /// Sidebar selector: all | my-tasks | pending | in-progress | completed.
        #[arg(long, value_enum, default_value_t = SidebarFilter::All)]
        filter: SidebarFilter,
        /// Narrow to one assignee (id or name). Managers only.
        #[arg(long)]
        staff: Option<String>,
        /// Keep only these statuses. May be repeated.
        #[arg(long, value_enum)]
        status: Vec<Status>,
        /// Keep only these priorities. May be repeated.
        #[arg(long, value_enum)]
        priority: Vec<Priority>,
        /// Due bucket: overdue | today | week.
        #[arg(long, value_enum)]
        due: Option<DueBucket>,
        /// Case-insensitive search over titles, descriptions, properties,
        /// labels, people, and dates.
        #[arg(long)]
        search: Option<String>,
        /// Row order: rank (status then priority) or insertion.
        #[arg(long, value_enum, default_value_t = SortOrder::Rank)]
        sort: SortOrder,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show task counts and, for managers, the staff workload.
    Summary,

    /// Add a new task (managers only).
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Assignee (user id or name).
        #[arg(long)]
        assignee: Option<String>,
        /// Priority: critical | high | medium | low.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Status: pending | in-progress | completed.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Property reference, e.g. BND-401.
        #[arg(long)]
        property: Option<String>,
    },

    /// View a single task by id or title.
    View {
        /// Task id or exact title.
        id: String,
    },

    /// Update fields on a task (managers only).
    Update {
        /// Task id or exact title.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Assignee (user id or name).
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Property reference.
        #[arg(long)]
        property: Option<String>,
        /// Clear the due date.
        #[arg(long)]
        clear_due: bool,
        /// Clear the property reference.
        #[arg(long)]
        clear_property: bool,
    },

    /// Move a task to In Progress.
    Start {
        /// Task id or exact title.
        id: String,
    },

    /// Mark a task Completed.
    Complete {
        /// Task id or exact title.
        id: String,
    },

    /// Reopen a task (status Pending).
    Reopen {
        /// Task id or exact title.
        id: String,
    },

    /// Delete a task by id or title (managers only).
    Delete {
        /// Task id or exact title.
        id: String,
    },

    /// List the user roster.
    Users,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal dashboard.
pub fn cmd_ui(store: Store, user: User) {
    if let Err(e) = run_dashboard(store, user) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

fn parse_due_or_exit(s: &str, today: NaiveDate) -> NaiveDate {
    match parse_due_input(s, today) {
        Some(d) => d,
        None => {
            eprintln!("Unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'.");
            std::process::exit(1);
        }
    }
}

fn resolve_task_or_exit(store: &Store, identifier: &str) -> String {
    match resolve_task(store, identifier) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn resolve_user_or_exit(store: &Store, identifier: &str) -> String {
    match resolve_user(store, identifier) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// List tasks through the same derivation the dashboard uses.
#[allow(clippy::too_many_arguments)]
pub fn cmd_list(
    store: &Store,
    user: &User,
    filter: SidebarFilter,
    staff: Option<String>,
    status: Vec<Status>,
    priority: Vec<Priority>,
    due: Option<DueBucket>,
    search: Option<String>,
    sort: SortOrder,
    limit: Option<usize>,
) {
    let today = Local::now().date_naive();
    let state = FilterState {
        sidebar: filter,
        staff: staff.map(|s| resolve_user_or_exit(store, &s)),
        statuses: status,
        priorities: priority,
        due,
        query: search.unwrap_or_default(),
        sort,
    };
    let mut view = derive_view(&store.tasks, &store.users, user, &state, today);
    if let Some(n) = limit {
        view.tasks.truncate(n);
    }
    print_table(store, &view.tasks, today);
}

/// Print badge counts and the manager workload strip.
pub fn cmd_summary(store: &Store, user: &User) {
    let today = Local::now().date_naive();
    let view = derive_view(&store.tasks, &store.users, user, &FilterState::default(), today);
    let c = view.counts;
    println!("Tasks for {} ({})", user.name, format_role(user.role));
    println!("All:          {}", c.all);
    println!("My tasks:     {}", c.my_tasks);
    println!("Pending:      {}", c.pending);
    println!("In progress:  {}", c.in_progress);
    println!("Completed:    {}", c.completed);

    let workload = workload_summary(&store.tasks, &store.users, user);
    if !workload.is_empty() {
        let parts: Vec<String> = workload
            .iter()
            .map(|w| format!("{} {}", w.name, w.count))
            .collect();
        println!("Workload:     {}", parts.join(" | "));
    }
}

/// Add a new task to the store.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    store: &mut Store,
    user: &User,
    title: String,
    desc: Option<String>,
    assignee: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    due: Option<String>,
    property: Option<String>,
) {
    if !user.is_manager() {
        eprintln!("Only managers can create tasks.");
        std::process::exit(1);
    }
    let today = Local::now().date_naive();
    let draft = TaskDraft {
        title: Some(title),
        description: desc,
        assigned_to: assignee.map(|a| resolve_user_or_exit(store, &a)),
        priority,
        status,
        due_date: due.map(|d| parse_due_or_exit(&d, today)),
        property_id: property,
    };
    let id = store.create(draft, &user.id, today);
    println!("Added task {id}");
}

/// View detailed information about a single visible task.
pub fn cmd_view(store: &Store, user: &User, id: String) {
    let task_id = resolve_task_or_exit(store, &id);
    let task = store.get(&task_id).filter(|t| user.can_see(t));
    let Some(task) = task else {
        // Out-of-scope tasks read as absent for staff.
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    };
    let today = Local::now().date_naive();
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Status:       {}", format_status(task.status));
    println!("Priority:     {}", format_priority(task.priority));
    println!("Assignee:     {}", store.user_name(&task.assigned_to));
    println!("Created by:   {}", store.user_name(&task.created_by));
    println!(
        "Due:          {}",
        match task.due_date {
            Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    println!(
        "Property:     {}",
        task.property_id.clone().unwrap_or_else(|| "-".into())
    );
    println!("Created:      {}", task.created_at);
    println!("Description:\n{}", task.description);
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    store: &mut Store,
    user: &User,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    assignee: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    due: Option<String>,
    property: Option<String>,
    clear_due: bool,
    clear_property: bool,
) {
    if !user.is_manager() {
        eprintln!("Only managers can edit tasks. Staff can start/complete/reopen their own.");
        std::process::exit(1);
    }
    let task_id = resolve_task_or_exit(store, &id);
    let today = Local::now().date_naive();
    let draft = TaskDraft {
        title,
        description: desc,
        assigned_to: assignee.map(|a| resolve_user_or_exit(store, &a)),
        priority,
        status,
        due_date: due.map(|d| parse_due_or_exit(&d, today)),
        property_id: property,
    };
    if !store.update(&task_id, draft) {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    }
    if clear_due || clear_property {
        if let Some(t) = store.get_mut(&task_id) {
            if clear_due {
                t.due_date = None;
            }
            if clear_property {
                t.property_id = None;
            }
        }
    }
    println!("Updated task {task_id}");
}

/// Shared status transition for start/complete/reopen.
pub fn cmd_set_status(store: &mut Store, user: &User, id: String, status: Status, verb: &str) {
    let task_id = resolve_task_or_exit(store, &id);
    let visible = store.get(&task_id).map(|t| user.can_see(t)).unwrap_or(false);
    if !visible {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    }
    store.set_status(&task_id, status);
    println!("{verb} task {task_id}");
}

/// Delete a task by id.
pub fn cmd_delete(store: &mut Store, user: &User, id: String) {
    if !user.is_manager() {
        eprintln!("Only managers can delete tasks.");
        std::process::exit(1);
    }
    let task_id = resolve_task_or_exit(store, &id);
    if !store.delete(&task_id) {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    }
    println!("Deleted task {task_id}");
}

/// Print the user roster.
pub fn cmd_users(store: &Store) {
    println!("{:<4} {:<18} {:<8} {}", "ID", "Name", "Role", "Email");
    for u in &store.users {
        println!(
            "{:<4} {:<18} {:<8} {}",
            u.id,
            truncate(&u.name, 18),
            format_role(u.role),
            u.email
        );
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
