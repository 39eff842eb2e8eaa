//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single unit
//! of assignable work, plus the `TaskDraft` partial used as the input to
//! create and update operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Status};

/// A unit of assignable work with status, priority, assignee and due date.
///
/// `assigned_to` and `created_by` hold user ids from the roster. They are
/// not validated against it: a dangling reference renders as "Unknown"
/// rather than failing. Field names serialize in camelCase so a seed file
/// matches the dashboard's original data shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to: String,
    pub created_by: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub property_id: Option<String>,
}

/// Partial task fields, as collected from a form or CLI flags.
///
/// Every field is optional; `Store::create` fills the gaps with defaults
/// and `Store::update` merges only the fields that are present. Clearing an
/// already-set due date or property id goes through `Store::get_mut` at the
/// call site instead of being encoded here.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<NaiveDate>,
    pub property_id: Option<String>,
}
