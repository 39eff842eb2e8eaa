//! Enumerations and field types for the task dashboard.
//!
//! This module defines the structured value types shared by the data model,
//! the CLI flags, and the view filter state: task status and priority, user
//! roles, the sidebar filter, due-date buckets, sort order, and view mode.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "In Progress", alias = "InProgress")]
    InProgress,
    #[serde(alias = "Completed")]
    Completed,
}

/// Priority classification for task importance.
///
/// The four-value set is canonical; seed data written against the older
/// three-value revision (no `Critical`) still deserializes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "Critical")]
    Critical,
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Low")]
    Low,
}

/// User role. Managers see the whole collection and own the assignment
/// verbs; staff are scoped to their own tasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[serde(alias = "Manager")]
    Manager,
    #[serde(alias = "Staff")]
    Staff,
}

/// Sidebar selection: the primary single-select filter.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum SidebarFilter {
    #[default]
    All,
    MyTasks,
    Pending,
    InProgress,
    Completed,
}

impl SidebarFilter {
    /// The status this selection restricts to, if it is a status entry.
    pub fn status(self) -> Option<Status> {
        match self {
            SidebarFilter::Pending => Some(Status::Pending),
            SidebarFilter::InProgress => Some(Status::InProgress),
            SidebarFilter::Completed => Some(Status::Completed),
            SidebarFilter::All | SidebarFilter::MyTasks => None,
        }
    }
}

/// Mutually-exclusive due-date bucket filter.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DueBucket {
    Overdue,
    Today,
    Week,
}

/// Ordering applied as the final pipeline stage.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Preserve the collection's insertion order.
    Insertion,
    /// Stable status-then-priority rank sort.
    #[default]
    Rank,
}

/// Presentation of the visible tasks on a wide terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Board,
    Table,
}

/// Minimum terminal width, in columns, for the wide (sidebar + board/table)
/// layout. Narrower terminals get the flat list and the filter popup.
pub const WIDE_MIN_COLS: u16 = 100;

/// Classify a terminal width. Called on every frame, so a resize takes
/// effect immediately.
pub fn wide_layout(width: u16) -> bool {
    width >= WIDE_MIN_COLS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_filter_status() {
        assert_eq!(SidebarFilter::Pending.status(), Some(Status::Pending));
        assert_eq!(SidebarFilter::InProgress.status(), Some(Status::InProgress));
        assert_eq!(SidebarFilter::Completed.status(), Some(Status::Completed));
        assert_eq!(SidebarFilter::All.status(), None);
        assert_eq!(SidebarFilter::MyTasks.status(), None);
    }

    #[test]
    fn test_wide_layout_threshold() {
        assert!(!wide_layout(WIDE_MIN_COLS - 1));
        assert!(wide_layout(WIDE_MIN_COLS));
        assert!(wide_layout(WIDE_MIN_COLS + 1));
    }

    #[test]
    fn test_status_accepts_display_spelling() {
        let s: Status = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(s, Status::InProgress);
        let s: Status = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(s, Status::InProgress);
    }

    #[test]
    fn test_priority_accepts_display_spelling() {
        let p: Priority = serde_json::from_str("\"Critical\"").unwrap();
        assert_eq!(p, Priority::Critical);
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }
}
