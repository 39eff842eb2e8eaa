//! Task store and shared formatting helpers.
//!
//! The `Store` owns the user roster and the mutable task collection, and is
//! the only place tasks are created, patched, or removed. Mutations on a
//! missing id are silent no-ops; views resolve dangling user references to a
//! fallback label instead of failing. Nothing here touches the filesystem
//! except `Store::from_path`, which loads a one-shot seed file.

use std::fs;
use std::path::Path;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Role, Status};
use crate::seed;
use crate::task::{Task, TaskDraft};
use crate::user::User;

/// In-memory store holding the user roster and task collection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
}

impl Store {
    /// Store preloaded with the builtin demo dataset.
    pub fn builtin() -> Self {
        Store {
            users: seed::users(),
            tasks: seed::tasks(),
        }
    }

    /// Load a seed file. The file replaces the builtin tasks wholesale; if it
    /// carries no `users` array the builtin roster is kept.
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let buf = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let mut store: Store = serde_json::from_str(&buf)
            .map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
        if store.users.is_empty() {
            store.users = seed::users();
        }
        Ok(store)
    }

    /// Get a task by ID.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Get a user by ID.
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Display name for a user reference, with a fallback for dangling ids.
    pub fn user_name(&self, id: &str) -> &str {
        if id.is_empty() {
            return "Unassigned";
        }
        self.user(id).map(|u| u.name.as_str()).unwrap_or("Unknown")
    }

    /// All users with the given role, in roster order.
    pub fn users_with_role(&self, role: Role) -> Vec<&User> {
        self.users.iter().filter(|u| u.role == role).collect()
    }

    /// Smallest unused id at or above `candidate` (ids are numeric strings).
    fn unique_id(&self, mut candidate: i64) -> String {
        loop {
            let id = candidate.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            candidate += 1;
        }
    }

    /// Create a task from a draft and insert it at the head of the collection.
    ///
    /// Missing text fields default to empty strings, `priority` to Medium,
    /// `status` to Pending, and `created_by` to the acting user. Returns the
    /// generated id.
    pub fn create(&mut self, draft: TaskDraft, acting_user: &str, today: NaiveDate) -> String {
        let id = self.unique_id(Local::now().timestamp_millis());
        let task = Task {
            id: id.clone(),
            title: draft.title.unwrap_or_default(),
            description: draft.description.unwrap_or_default(),
            assigned_to: draft.assigned_to.unwrap_or_default(),
            created_by: acting_user.to_string(),
            priority: draft.priority.unwrap_or(Priority::Medium),
            status: draft.status.unwrap_or(Status::Pending),
            due_date: draft.due_date,
            created_at: today,
            property_id: draft.property_id,
        };
        self.tasks.insert(0, task);
        id
    }

    /// Merge the draft's set fields onto the task with the given id.
    /// Silently does nothing if no such task exists. Returns whether a task
    /// was patched.
    pub fn update(&mut self, id: &str, draft: TaskDraft) -> bool {
        let Some(task) = self.get_mut(id) else {
            return false;
        };
        if let Some(title) = draft.title {
            task.title = title;
        }
        if let Some(description) = draft.description {
            task.description = description;
        }
        if let Some(assigned_to) = draft.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(priority) = draft.priority {
            task.priority = priority;
        }
        if let Some(status) = draft.status {
            task.status = status;
        }
        if let Some(due) = draft.due_date {
            task.due_date = Some(due);
        }
        if let Some(property) = draft.property_id {
            task.property_id = Some(property);
        }
        true
    }

    /// Remove the task with the given id; no-op if absent.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Set a task's status; no-op if absent.
    pub fn set_status(&mut self, id: &str, status: Status) -> bool {
        self.update(
            id,
            TaskDraft {
                status: Some(status),
                ..TaskDraft::default()
            },
        )
    }
}

/// Resolve a task identifier (id or exact title, case-insensitive) to a
/// task id. Errors when the title is ambiguous and suggests using the id.
pub fn resolve_task(store: &Store, identifier: &str) -> Result<String, String> {
    if store.get(identifier).is_some() {
        return Ok(identifier.to_string());
    }
    let matches: Vec<&Task> = store
        .tasks
        .iter()
        .filter(|t| t.title.to_lowercase() == identifier.to_lowercase())
        .collect();
    match matches.len() {
        0 => Err(format!("No task found matching '{identifier}'")),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let mut msg = format!("Multiple tasks titled '{identifier}':\n");
            for t in matches {
                msg.push_str(&format!("  {} [{}]\n", t.id, format_status(t.status)));
            }
            msg.push_str("Use the id instead.");
            Err(msg)
        }
    }
}

/// Resolve a user identifier (id, full name, or first name) to a user id.
pub fn resolve_user(store: &Store, identifier: &str) -> Result<String, String> {
    if let Some(u) = store.user(identifier) {
        return Ok(u.id.clone());
    }
    let needle = identifier.to_lowercase();
    let matches: Vec<&User> = store
        .users
        .iter()
        .filter(|u| {
            let first = u.name.split(' ').next().unwrap_or("");
            u.name.to_lowercase() == needle || first.to_lowercase() == needle
        })
        .collect();
    match matches.len() {
        0 => Err(format!("No user found matching '{identifier}'")),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let mut msg = format!("Multiple users named '{identifier}':\n");
            for u in matches {
                msg.push_str(&format!("  {} {}\n", u.id, u.name));
            }
            msg.push_str("Use the id instead.");
            Err(msg)
        }
    }
}

/// Parse human-readable due date input.
///
/// Supports "today", "tomorrow", "in 3d", "in 2w", and "YYYY-MM-DD".
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::InProgress => "In Progress",
        Status::Completed => "Completed",
    }
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Critical => "Critical",
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

/// Format a role for display.
pub fn format_role(r: Role) -> &'static str {
    match r {
        Role::Manager => "Manager",
        Role::Staff => "Staff",
    }
}

/// Format a due date as e.g. "Feb 5, 2026".
pub fn format_due(due: Option<NaiveDate>) -> String {
    match due {
        None => "-".into(),
        Some(d) => d.format("%b %-d, %Y").to_string(),
    }
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            if days == 0 {
                "today".into()
            } else if days == 1 {
                "tomorrow".into()
            } else if days > 1 {
                format!("in {days}d")
            } else {
                format!("{}d late", -days)
            }
        }
    }
}

/// Print tasks in a formatted table.
pub fn print_table(store: &Store, tasks: &[&Task], today: NaiveDate) {
    // Header.
    println!(
        "{:<14} {:<12} {:<9} {:<10} {:<9} {:<14} {}",
        "ID", "Status", "Pri", "Due", "Prop", "Assignee", "Title"
    );
    for t in tasks {
        let due = format_due_relative(t.due_date, today);
        let property = t.property_id.clone().unwrap_or_else(|| "-".into());
        println!(
            "{:<14} {:<12} {:<9} {:<10} {:<9} {:<14} {}",
            truncate(&t.id, 14),
            format_status(t.status),
            format_priority(t.priority),
            due,
            truncate(&property, 9),
            truncate(store.user_name(&t.assigned_to), 14),
            t.title
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_create_defaults_and_head_insert() {
        let mut store = Store::builtin();
        let today = d(2026, 2, 5);
        let id = store.create(TaskDraft::default(), "1", today);

        assert!(!id.is_empty());
        let task = store.get(&id).expect("created task");
        assert_eq!(task.title, "");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, Status::Pending);
        assert_eq!(task.created_by, "1");
        assert_eq!(task.created_at, today);
        assert!(task.due_date.is_none());
        // Head insertion: newest first.
        assert_eq!(store.tasks[0].id, id);
    }

    #[test]
    fn test_create_generates_distinct_ids() {
        let mut store = Store::builtin();
        let today = d(2026, 2, 5);
        let a = store.create(TaskDraft::default(), "1", today);
        let b = store.create(TaskDraft::default(), "1", today);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unique_id_skips_taken() {
        let mut store = Store::builtin();
        let today = d(2026, 2, 5);
        let draft = TaskDraft {
            title: Some("first".into()),
            ..TaskDraft::default()
        };
        let id = store.create(draft, "1", today);
        let n: i64 = id.parse().unwrap();
        assert_eq!(store.unique_id(n), (n + 1).to_string());
    }

    #[test]
    fn test_update_merges_only_set_fields() {
        let mut store = Store::builtin();
        let patched = store.update(
            "2",
            TaskDraft {
                status: Some(Status::Completed),
                ..TaskDraft::default()
            },
        );
        assert!(patched);
        let task = store.get("2").unwrap();
        assert_eq!(task.status, Status::Completed);
        // Untouched fields survive the merge.
        assert_eq!(task.title, "Fix sofa pickup – Bandra");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.property_id.as_deref(), Some("BND-401"));
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = Store::builtin();
        let before = store.tasks.len();
        assert!(!store.update("no-such-id", TaskDraft::default()));
        assert_eq!(store.tasks.len(), before);
    }

    #[test]
    fn test_delete() {
        let mut store = Store::builtin();
        assert!(store.delete("7"));
        assert!(store.get("7").is_none());
        assert!(!store.delete("7"));
    }

    #[test]
    fn test_set_status() {
        let mut store = Store::builtin();
        assert!(store.set_status("1", Status::InProgress));
        assert_eq!(store.get("1").unwrap().status, Status::InProgress);
        assert!(!store.set_status("999", Status::Completed));
    }

    #[test]
    fn test_user_name_fallbacks() {
        let store = Store::builtin();
        assert_eq!(store.user_name("2"), "Rahul Kumar");
        assert_eq!(store.user_name("42"), "Unknown");
        assert_eq!(store.user_name(""), "Unassigned");
    }

    #[test]
    fn test_resolve_task_by_id_or_title() {
        let store = Store::builtin();
        assert_eq!(resolve_task(&store, "4"), Ok("4".to_string()));
        assert_eq!(
            resolve_task(&store, "fix sofa pickup – bandra"),
            Ok("2".to_string())
        );
        assert!(resolve_task(&store, "no such task").is_err());
    }

    #[test]
    fn test_resolve_task_ambiguous_title() {
        let mut store = Store::builtin();
        let draft = TaskDraft {
            title: Some("AC maintenance check".into()),
            ..TaskDraft::default()
        };
        store.create(draft, "1", d(2026, 2, 5));
        let err = resolve_task(&store, "AC maintenance check").unwrap_err();
        assert!(err.contains("Multiple tasks"));
    }

    #[test]
    fn test_resolve_user() {
        let store = Store::builtin();
        assert_eq!(resolve_user(&store, "3"), Ok("3".to_string()));
        assert_eq!(resolve_user(&store, "rahul"), Ok("2".to_string()));
        assert_eq!(resolve_user(&store, "Meena Patel"), Ok("3".to_string()));
        assert!(resolve_user(&store, "nobody").is_err());
    }

    #[test]
    fn test_parse_due_input() {
        let today = d(2026, 2, 5);
        assert_eq!(parse_due_input("today", today), Some(today));
        assert_eq!(parse_due_input("tomorrow", today), Some(d(2026, 2, 6)));
        assert_eq!(parse_due_input("in 3d", today), Some(d(2026, 2, 8)));
        assert_eq!(parse_due_input("in 2w", today), Some(d(2026, 2, 19)));
        assert_eq!(parse_due_input("2026-03-01", today), Some(d(2026, 3, 1)));
        assert_eq!(parse_due_input("not a date", today), None);
    }

    #[test]
    fn test_format_due() {
        assert_eq!(format_due(Some(d(2026, 2, 5))), "Feb 5, 2026");
        assert_eq!(format_due(None), "-");
    }

    #[test]
    fn test_format_due_relative() {
        let today = d(2026, 2, 5);
        assert_eq!(format_due_relative(Some(d(2026, 2, 5)), today), "today");
        assert_eq!(format_due_relative(Some(d(2026, 2, 6)), today), "tomorrow");
        assert_eq!(format_due_relative(Some(d(2026, 2, 9)), today), "in 4d");
        assert_eq!(format_due_relative(Some(d(2026, 2, 3)), today), "2d late");
        assert_eq!(format_due_relative(None, today), "-");
    }
}
