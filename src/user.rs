//! User roster entries and role-based visibility.
//!
//! The roster is static for a session: loaded once at startup and never
//! mutated. Role checks are concentrated here so the filter pipeline and
//! the mutation guards agree on exactly one definition of "may see" and
//! "may manage".

use serde::{Deserialize, Serialize};

use crate::fields::Role;
use crate::task::Task;

/// A dashboard user: display fields plus the role that scopes visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Short display initials shown in the top bar and user list.
    pub avatar: String,
}

impl User {
    /// Whether this user's views include the given task.
    ///
    /// Managers see every task; staff only see tasks assigned to them.
    /// This is the role-scoping stage of the filter pipeline and is also
    /// consulted before staff-initiated mutations.
    pub fn can_see(&self, task: &Task) -> bool {
        match self.role {
            Role::Manager => true,
            Role::Staff => task.assigned_to == self.id,
        }
    }

    /// Whether this user holds the assignment verbs: create, delete,
    /// reassign, and filtering by staff member.
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, Status};
    use chrono::NaiveDate;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.into(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            role,
            avatar: "U".into(),
        }
    }

    fn task_assigned_to(id: &str) -> Task {
        Task {
            id: "t1".into(),
            title: "Check boiler".into(),
            description: String::new(),
            assigned_to: id.into(),
            created_by: "1".into(),
            priority: Priority::Medium,
            status: Status::Pending,
            due_date: None,
            created_at: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            property_id: None,
        }
    }

    #[test]
    fn test_manager_sees_everything() {
        let manager = user("1", Role::Manager);
        assert!(manager.can_see(&task_assigned_to("2")));
        assert!(manager.can_see(&task_assigned_to("1")));
        assert!(manager.is_manager());
    }

    #[test]
    fn test_staff_sees_only_own_tasks() {
        let staff = user("2", Role::Staff);
        assert!(staff.can_see(&task_assigned_to("2")));
        assert!(!staff.can_see(&task_assigned_to("3")));
        assert!(!staff.is_manager());
    }
}
