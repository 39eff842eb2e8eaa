//! View derivation pipeline.
//!
//! `derive_view` is a pure function from the task collection, the acting
//! user, and the ephemeral filter state to the ordered list of visible tasks
//! plus sidebar counts. It never mutates anything and takes `today` as an
//! argument, so every stage can be pinned down in tests without touching the
//! clock. The UI recomputes it wholesale after every mutation or state
//! change.

use chrono::{Duration, NaiveDate};

use crate::fields::{DueBucket, Priority, SidebarFilter, SortOrder, Status};
use crate::store::{format_due, format_priority, format_status};
use crate::task::Task;
use crate::user::User;

/// Per-session filter and search state.
///
/// The sidebar selector and the staff select belong to the wide layout; the
/// status/priority/due multi-selects belong to the narrow layout's filter
/// popup. The two surfaces are mutually exclusive in the UI, so at most one
/// family of fields is populated at a time, but the pipeline applies
/// whatever it is handed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub sidebar: SidebarFilter,
    /// Assignee narrowing, honoured for managers only. `None` means all staff.
    pub staff: Option<String>,
    pub statuses: Vec<Status>,
    pub priorities: Vec<Priority>,
    pub due: Option<DueBucket>,
    pub query: String,
    pub sort: SortOrder,
}

/// Sidebar badge counts, all computed over the role-scoped universe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub my_tasks: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Output of one derivation pass.
#[derive(Debug)]
pub struct ViewModel<'a> {
    pub tasks: Vec<&'a Task>,
    pub counts: TaskCounts,
}

/// One staff member's share of the collection, for the manager header strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadEntry {
    pub user_id: String,
    /// First name only.
    pub name: String,
    pub count: usize,
}

/// Sort rank of a status. Lower sorts first.
pub fn status_rank(s: Status) -> u8 {
    match s {
        Status::Pending => 1,
        Status::InProgress => 2,
        Status::Completed => 3,
    }
}

/// Sort rank of a priority. Lower sorts first.
pub fn priority_rank(p: Priority) -> u8 {
    match p {
        Priority::Critical => 1,
        Priority::High => 2,
        Priority::Medium => 3,
        Priority::Low => 4,
    }
}

fn display_name<'a>(users: &'a [User], id: &str) -> &'a str {
    users
        .iter()
        .find(|u| u.id == id)
        .map(|u| u.name.as_str())
        .unwrap_or("Unknown")
}

/// Whether a task falls into a due-date bucket, date-only comparison.
/// Tasks without a due date fall into no bucket.
fn in_due_bucket(task: &Task, bucket: DueBucket, today: NaiveDate) -> bool {
    let Some(due) = task.due_date else {
        return false;
    };
    match bucket {
        DueBucket::Overdue => due < today && task.status != Status::Completed,
        DueBucket::Today => due == today,
        DueBucket::Week => today <= due && due <= today + Duration::days(7),
    }
}

/// Case-insensitive substring match over every searchable field: title,
/// description, property id, priority and status labels, assignee and
/// creator names, and the due date in both display and ISO form.
fn matches_query(task: &Task, users: &[User], query: &str) -> bool {
    if task.title.to_lowercase().contains(query) || task.description.to_lowercase().contains(query)
    {
        return true;
    }
    if let Some(property) = &task.property_id {
        if property.to_lowercase().contains(query) {
            return true;
        }
    }
    if format_priority(task.priority).to_lowercase().contains(query)
        || format_status(task.status).to_lowercase().contains(query)
    {
        return true;
    }
    if display_name(users, &task.assigned_to).to_lowercase().contains(query)
        || display_name(users, &task.created_by).to_lowercase().contains(query)
    {
        return true;
    }
    match task.due_date {
        Some(due) => {
            format_due(Some(due)).to_lowercase().contains(query)
                || due.to_string().contains(query)
        }
        None => false,
    }
}

/// Derive the visible task list and sidebar counts for one user.
///
/// Stages apply in a fixed order, each narrowing the last: role scoping,
/// sidebar selector, staff select (managers only), status and priority
/// multi-selects, due bucket, search, then the rank sort. Counts are taken
/// from the role-scoped set alone so the badges stay stable while the user
/// types a search or toggles filters.
pub fn derive_view<'a>(
    tasks: &'a [Task],
    users: &[User],
    user: &User,
    state: &FilterState,
    today: NaiveDate,
) -> ViewModel<'a> {
    let mut view: Vec<&Task> = tasks.iter().filter(|t| user.can_see(t)).collect();

    let counts = TaskCounts {
        all: view.len(),
        my_tasks: view.iter().filter(|t| t.assigned_to == user.id).count(),
        pending: view.iter().filter(|t| t.status == Status::Pending).count(),
        in_progress: view.iter().filter(|t| t.status == Status::InProgress).count(),
        completed: view.iter().filter(|t| t.status == Status::Completed).count(),
    };

    match state.sidebar {
        SidebarFilter::All => {}
        SidebarFilter::MyTasks => view.retain(|t| t.assigned_to == user.id),
        other => {
            // Remaining variants map onto a single status.
            if let Some(status) = other.status() {
                view.retain(|t| t.status == status);
            }
        }
    }

    if user.is_manager() {
        if let Some(staff) = &state.staff {
            view.retain(|t| &t.assigned_to == staff);
        }
    }

    if !state.statuses.is_empty() {
        view.retain(|t| state.statuses.contains(&t.status));
    }
    if !state.priorities.is_empty() {
        view.retain(|t| state.priorities.contains(&t.priority));
    }
    if let Some(bucket) = state.due {
        view.retain(|t| in_due_bucket(t, bucket, today));
    }

    if !state.query.is_empty() {
        let query = state.query.to_lowercase();
        view.retain(|t| matches_query(t, users, &query));
    }

    if state.sort == SortOrder::Rank {
        // Stable: ties keep their insertion order.
        view.sort_by_key(|t| (status_rank(t.status), priority_rank(t.priority)));
    }

    ViewModel { tasks: view, counts }
}

/// Per-staff assigned task counts for the manager header. Empty for staff.
pub fn workload_summary(tasks: &[Task], users: &[User], user: &User) -> Vec<WorkloadEntry> {
    if !user.is_manager() {
        return Vec::new();
    }
    users
        .iter()
        .filter(|u| !u.is_manager())
        .map(|u| WorkloadEntry {
            user_id: u.id.clone(),
            name: u.name.split(' ').next().unwrap_or(&u.name).to_string(),
            count: tasks.iter().filter(|t| t.assigned_to == u.id).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn today() -> NaiveDate {
        d(2026, 2, 5)
    }

    fn manager() -> User {
        seed::users().into_iter().find(|u| u.id == "1").unwrap()
    }

    fn staff_rahul() -> User {
        seed::users().into_iter().find(|u| u.id == "2").unwrap()
    }

    fn ids<'a>(view: &'a ViewModel<'a>) -> Vec<&'a str> {
        view.tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_staff_sees_only_assigned() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &staff_rahul(), &state, today());
        assert_eq!(ids(&view), vec!["1", "2", "5", "9", "12", "13"]);
        assert!(view.tasks.iter().all(|t| t.assigned_to == "2"));
    }

    #[test]
    fn test_manager_sees_everything() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(view.tasks.len(), tasks.len());
    }

    #[test]
    fn test_derivation_is_pure() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            query: "building".into(),
            ..FilterState::default()
        };
        let first = derive_view(&tasks, &users, &manager(), &state, today());
        let second = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_rank_sort_full_collection() {
        let tasks = seed::tasks();
        let users = seed::users();
        let view = derive_view(&tasks, &users, &manager(), &FilterState::default(), today());
        // Pending by priority, then In Progress, then Completed; ties keep
        // insertion order (8 before 10, 3 before 11 before 12, 4 before 9).
        assert_eq!(
            ids(&view),
            vec!["1", "2", "6", "8", "10", "3", "11", "12", "4", "9", "5", "13", "7"]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut tasks = seed::tasks();
        // Clone a Pending/Low task under a fresh id at the head; both share
        // the sort key, so the head insertion must surface first.
        let mut twin = tasks.iter().find(|t| t.id == "8").unwrap().clone();
        twin.id = "99".into();
        tasks.insert(0, twin);
        let users = seed::users();
        let view = derive_view(&tasks, &users, &manager(), &FilterState::default(), today());
        let order: Vec<&str> = ids(&view);
        let pos99 = order.iter().position(|id| *id == "99").unwrap();
        let pos8 = order.iter().position(|id| *id == "8").unwrap();
        let pos10 = order.iter().position(|id| *id == "10").unwrap();
        assert!(pos99 < pos8 && pos8 < pos10);
    }

    #[test]
    fn test_insertion_sort_preserves_input_order() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        let expected: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids(&view), expected);
    }

    #[test]
    fn test_sidebar_status_filter() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            sidebar: SidebarFilter::Pending,
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&view), vec!["1", "2", "6", "8", "10"]);
    }

    #[test]
    fn test_sidebar_my_tasks() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            sidebar: SidebarFilter::MyTasks,
            ..FilterState::default()
        };
        // Nothing in the seed is assigned to the manager.
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert!(view.tasks.is_empty());

        let view = derive_view(&tasks, &users, &staff_rahul(), &state, today());
        assert_eq!(view.tasks.len(), 6);
    }

    #[test]
    fn test_staff_select_narrows_for_manager() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            staff: Some("3".into()),
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&view), vec!["3", "7", "10"]);
    }

    #[test]
    fn test_staff_select_ignored_for_staff() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            staff: Some("3".into()),
            ..FilterState::default()
        };
        // A staff session keeps its own scope regardless of the select.
        let view = derive_view(&tasks, &users, &staff_rahul(), &state, today());
        assert_eq!(view.tasks.len(), 6);
        assert!(view.tasks.iter().all(|t| t.assigned_to == "2"));
    }

    #[test]
    fn test_multi_select_status_and_priority() {
        let tasks = seed::tasks();
        let users = seed::users();

        // OR within one filter.
        let state = FilterState {
            statuses: vec![Status::Pending, Status::Completed],
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(view.tasks.len(), 8);

        let state = FilterState {
            priorities: vec![Priority::High],
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&view), vec!["2", "3", "5", "11", "12"]);

        // AND across filter families.
        let state = FilterState {
            statuses: vec![Status::Pending],
            priorities: vec![Priority::High],
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&view), vec!["2"]);
    }

    #[test]
    fn test_due_bucket_today() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            due: Some(DueBucket::Today),
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&view), vec!["2", "9", "12"]);
    }

    #[test]
    fn test_due_bucket_overdue_excludes_completed() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            due: Some(DueBucket::Overdue),
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        // Tasks 5, 7 and 13 are past due but Completed; 3 and 11 remain.
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&view), vec!["3", "11"]);
    }

    #[test]
    fn test_due_bucket_week_inclusive_bounds() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            due: Some(DueBucket::Week),
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        let listed = ids(&view);
        // Day zero and day seven both count: task 2 is due today, task 1
        // exactly a week out (Feb 12).
        assert!(listed.contains(&"2"));
        assert!(listed.contains(&"1"));
        assert_eq!(listed, vec!["1", "2", "4", "6", "8", "9", "10", "12"]);
    }

    #[test]
    fn test_no_due_date_falls_outside_buckets() {
        let mut tasks = seed::tasks();
        tasks.iter_mut().find(|t| t.id == "2").unwrap().due_date = None;
        let users = seed::users();
        for bucket in [DueBucket::Overdue, DueBucket::Today, DueBucket::Week] {
            let state = FilterState {
                due: Some(bucket),
                ..FilterState::default()
            };
            let view = derive_view(&tasks, &users, &manager(), &state, today());
            assert!(!ids(&view).contains(&"2"));
        }
    }

    #[test]
    fn test_search_finds_bandra_by_title() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            query: "bandra".into(),
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.tasks[0].title, "Fix sofa pickup – Bandra");
        assert_eq!(view.tasks[0].property_id.as_deref(), Some("BND-401"));
    }

    #[test]
    fn test_search_covers_all_fields() {
        let tasks = seed::tasks();
        let users = seed::users();
        let run = |query: &str| {
            let state = FilterState {
                query: query.into(),
                sort: SortOrder::Insertion,
                ..FilterState::default()
            };
            derive_view(&tasks, &users, &manager(), &state, today())
        };

        // Property id.
        assert_eq!(ids(&run("gym-01")), vec!["8"]);
        // Priority label.
        assert_eq!(ids(&run("critical")), vec!["1"]);
        // Status label.
        assert_eq!(run("in progress").tasks.len(), 5);
        // Assignee display name.
        assert_eq!(ids(&run("meena")), vec!["3", "7", "10"]);
        // Creator display name: everything in the seed is Priya's.
        assert_eq!(run("priya").tasks.len(), 13);
        // Display-formatted due date.
        assert_eq!(ids(&run("feb 5, 2026")), vec!["2", "9", "12"]);
        // ISO due date.
        assert_eq!(ids(&run("2026-02-04")), vec!["3", "11"]);
    }

    #[test]
    fn test_empty_query_is_no_filter() {
        let tasks = seed::tasks();
        let users = seed::users();
        let view = derive_view(&tasks, &users, &manager(), &FilterState::default(), today());
        assert_eq!(view.tasks.len(), 13);
    }

    #[test]
    fn test_search_skips_missing_property_id() {
        let tasks = seed::tasks();
        let users = seed::users();
        // Tasks 12 and 13 carry no property id; the query must not match
        // them via an absent field, and must not panic.
        let state = FilterState {
            query: "bld".into(),
            sort: SortOrder::Insertion,
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&view), vec!["1", "4"]);
    }

    #[test]
    fn test_search_matches_dangling_assignee_as_unknown() {
        let mut tasks = seed::tasks();
        tasks.iter_mut().find(|t| t.id == "4").unwrap().assigned_to = "77".into();
        let users = seed::users();
        let state = FilterState {
            query: "unknown".into(),
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert_eq!(ids(&view), vec!["4"]);
    }

    #[test]
    fn test_counts_for_manager() {
        let tasks = seed::tasks();
        let users = seed::users();
        let view = derive_view(&tasks, &users, &manager(), &FilterState::default(), today());
        assert_eq!(
            view.counts,
            TaskCounts {
                all: 13,
                my_tasks: 0,
                pending: 5,
                in_progress: 5,
                completed: 3,
            }
        );
    }

    #[test]
    fn test_counts_for_staff_use_scoped_universe() {
        let tasks = seed::tasks();
        let users = seed::users();
        let view = derive_view(&tasks, &users, &staff_rahul(), &FilterState::default(), today());
        assert_eq!(
            view.counts,
            TaskCounts {
                all: 6,
                my_tasks: 6,
                pending: 2,
                in_progress: 2,
                completed: 2,
            }
        );
    }

    #[test]
    fn test_counts_unaffected_by_search_and_filters() {
        let tasks = seed::tasks();
        let users = seed::users();
        let state = FilterState {
            query: "zzz-no-match".into(),
            statuses: vec![Status::Completed],
            due: Some(DueBucket::Today),
            ..FilterState::default()
        };
        let view = derive_view(&tasks, &users, &manager(), &state, today());
        assert!(view.tasks.is_empty());
        assert_eq!(view.counts.all, 13);
        assert_eq!(view.counts.pending, 5);
    }

    #[test]
    fn test_workload_summary() {
        let tasks = seed::tasks();
        let users = seed::users();
        let summary = workload_summary(&tasks, &users, &manager());
        let brief: Vec<(&str, usize)> =
            summary.iter().map(|w| (w.name.as_str(), w.count)).collect();
        assert_eq!(brief, vec![("Rahul", 6), ("Meena", 3), ("Ajay", 4)]);

        assert!(workload_summary(&tasks, &users, &staff_rahul()).is_empty());
    }
}
