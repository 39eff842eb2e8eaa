//! Builtin seed dataset.
//!
//! The dashboard ships with the demo roster and task list it has always
//! shipped with: four users (one manager, three staff) and thirteen
//! maintenance/administrative tasks across the Mumbai properties. A seed
//! file passed via `--data` replaces this wholesale; nothing is ever
//! written back.

use chrono::NaiveDate;

use crate::fields::{Priority, Role, Status};
use crate::task::Task;
use crate::user::User;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn user(id: &str, name: &str, email: &str, role: Role, avatar: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        role,
        avatar: avatar.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    description: &str,
    assigned_to: &str,
    priority: Priority,
    status: Status,
    due: NaiveDate,
    property_id: Option<&str>,
    created_at: NaiveDate,
) -> Task {
    Task {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        assigned_to: assigned_to.into(),
        created_by: "1".into(),
        priority,
        status,
        due_date: Some(due),
        created_at,
        property_id: property_id.map(Into::into),
    }
}

/// The static user roster.
pub fn users() -> Vec<User> {
    vec![
        user("1", "Priya Sharma", "priya@rufrent.com", Role::Manager, "PS"),
        user("2", "Rahul Kumar", "rahul@rufrent.com", Role::Staff, "RK"),
        user("3", "Meena Patel", "meena@rufrent.com", Role::Staff, "MP"),
        user("4", "Ajay Singh", "ajay@rufrent.com", Role::Staff, "AS"),
    ]
}

/// The initial task collection, most recent first.
pub fn tasks() -> Vec<Task> {
    vec![
        task(
            "1",
            "Emergency water leak – Building B",
            "Urgent! Major water leak on 5th floor needs immediate attention",
            "2",
            Priority::Critical,
            Status::Pending,
            date(2026, 2, 12),
            Some("BLD-B"),
            date(2026, 2, 12),
        ),
        task(
            "2",
            "Fix sofa pickup – Bandra",
            "Coordinate with tenant for sofa pickup at Bandra West property",
            "2",
            Priority::High,
            Status::Pending,
            date(2026, 2, 5),
            Some("BND-401"),
            date(2026, 2, 2),
        ),
        task(
            "3",
            "Studio cleaning – Andheri",
            "Deep cleaning required before new tenant move-in",
            "3",
            Priority::High,
            Status::InProgress,
            date(2026, 2, 4),
            Some("AND-204"),
            date(2026, 2, 1),
        ),
        task(
            "4",
            "AC maintenance check",
            "Routine AC servicing for all units in building A",
            "4",
            Priority::Medium,
            Status::InProgress,
            date(2026, 2, 7),
            Some("BLD-A"),
            date(2026, 2, 1),
        ),
        task(
            "5",
            "Key handover – Powai",
            "New tenant key handover and property walkthrough",
            "2",
            Priority::High,
            Status::Completed,
            date(2026, 2, 3),
            Some("POW-105"),
            date(2026, 1, 31),
        ),
        task(
            "6",
            "Plumbing repair – Juhu",
            "Fix leaking tap in kitchen",
            "4",
            Priority::Medium,
            Status::Pending,
            date(2026, 2, 6),
            Some("JUH-302"),
            date(2026, 2, 2),
        ),
        task(
            "7",
            "Security deposit return",
            "Process security deposit for outgoing tenant",
            "3",
            Priority::Low,
            Status::Completed,
            date(2026, 2, 2),
            Some("BND-201"),
            date(2026, 1, 30),
        ),
        task(
            "8",
            "Gym equipment inspection",
            "Monthly inspection of community gym equipment",
            "4",
            Priority::Low,
            Status::Pending,
            date(2026, 2, 8),
            Some("GYM-01"),
            date(2026, 2, 2),
        ),
        task(
            "9",
            "Paint touch-up – Versova",
            "Touch up wall paint in living room and bedroom",
            "2",
            Priority::Medium,
            Status::InProgress,
            date(2026, 2, 5),
            Some("VER-501"),
            date(2026, 2, 1),
        ),
        task(
            "10",
            "Parking slot reassignment",
            "Update parking assignments for new residents",
            "3",
            Priority::Low,
            Status::Pending,
            date(2026, 2, 9),
            Some("PKG-B"),
            date(2026, 2, 3),
        ),
        task(
            "11",
            "WiFi router replacement",
            "Replace faulty router in studio apartment",
            "4",
            Priority::High,
            Status::InProgress,
            date(2026, 2, 4),
            Some("AND-308"),
            date(2026, 2, 2),
        ),
        task(
            "12",
            "Monthly rent collection",
            "Follow up with tenants for February rent payment",
            "2",
            Priority::High,
            Status::InProgress,
            date(2026, 2, 5),
            None,
            date(2026, 2, 1),
        ),
        task(
            "13",
            "Fire extinguisher check",
            "Quarterly fire safety equipment inspection",
            "2",
            Priority::Medium,
            Status::Completed,
            date(2026, 2, 1),
            None,
            date(2026, 1, 29),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_shape() {
        let users = users();
        let tasks = tasks();
        assert_eq!(users.len(), 4);
        assert_eq!(tasks.len(), 13);

        let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 13, "task ids must be unique");

        let user_ids: HashSet<_> = users.iter().map(|u| u.id.as_str()).collect();
        for t in &tasks {
            assert!(user_ids.contains(t.assigned_to.as_str()), "task {} assignee", t.id);
            assert!(user_ids.contains(t.created_by.as_str()), "task {} creator", t.id);
        }
    }

    #[test]
    fn test_seed_has_one_manager() {
        let managers: Vec<_> = users().into_iter().filter(|u| u.is_manager()).collect();
        assert_eq!(managers.len(), 1);
        assert_eq!(managers[0].name, "Priya Sharma");
    }
}
