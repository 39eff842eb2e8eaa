//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure for creating and editing
//! tasks in the TUI, including field ordering, selector state, and the
//! reduced staff editing mode.

use crate::{
    fields::{Priority, Status},
    store::{format_priority, format_status},
    task::Task,
    tui::input::InputField,
};

/// Order constants for the form fields.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const ASSIGNEE_FIELD: usize = 2;
pub const PRIORITY_FIELD: usize = 3;
pub const STATUS_FIELD: usize = 4;
pub const DUE_FIELD: usize = 5;
pub const PROPERTY_FIELD: usize = 6;

/// Task form for editing fields.
///
/// Text fields are `InputField`s; assignee, priority, and status are
/// selectors cycled with Left/Right. In `staff_view` mode only the
/// description and status are editable, mirroring what staff may change
/// on their own tasks.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub property: InputField,
    pub assignee: usize,
    pub priority: usize,
    pub status: usize,
    pub current_field: usize,
    /// Selectable assignees as (user id, display name). The leading entry
    /// is the unassigned placeholder; the rest is the staff roster.
    pub assignees: Vec<(String, String)>,
    pub priorities: Vec<Priority>,
    pub statuses: Vec<Status>,
    pub staff_view: bool,
}

impl TaskForm {
    /// Create a new empty form with the given staff roster as assignee
    /// options. Priority defaults to Medium and status to Pending.
    pub fn new(staff: Vec<(String, String)>) -> Self {
        let mut assignees = vec![(String::new(), "Unassigned".to_string())];
        assignees.extend(staff);
        Self {
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::new(),
            property: InputField::new(),
            assignee: 0,
            priority: 2, // Medium
            status: 0,   // Pending
            current_field: TITLE_FIELD,
            assignees,
            priorities: vec![
                Priority::Critical,
                Priority::High,
                Priority::Medium,
                Priority::Low,
            ],
            statuses: vec![Status::Pending, Status::InProgress, Status::Completed],
            staff_view: false,
        }
    }

    /// Create a form populated from an existing task.
    pub fn from_task(task: &Task, staff: Vec<(String, String)>, staff_view: bool) -> Self {
        let mut form = Self::new(staff);
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.due = InputField::with_value(
            &task.due_date.map(|d| d.to_string()).unwrap_or_default(),
        );
        form.property = InputField::with_value(task.property_id.as_deref().unwrap_or(""));
        form.assignee = form
            .assignees
            .iter()
            .position(|(id, _)| *id == task.assigned_to)
            .unwrap_or(0);
        form.priority = form
            .priorities
            .iter()
            .position(|&p| p == task.priority)
            .unwrap_or(2);
        form.status = form
            .statuses
            .iter()
            .position(|&s| s == task.status)
            .unwrap_or(0);
        form.staff_view = staff_view;
        if staff_view {
            form.current_field = DESCRIPTION_FIELD;
        }
        form
    }

    /// Get mutable references to all input fields in visual order.
    pub fn fields_mut(&mut self) -> Vec<&mut InputField> {
        vec![
            &mut self.title,
            &mut self.description,
            &mut self.due,
            &mut self.property,
        ]
    }

    /// Get the total number of fields (input fields + selectors).
    pub fn field_count(&self) -> usize {
        7
    }

    /// Whether the given field may be edited in the current mode.
    pub fn editable(&self, field: usize) -> bool {
        if self.staff_view {
            matches!(field, DESCRIPTION_FIELD | STATUS_FIELD)
        } else {
            true
        }
    }

    /// Move to the next editable field in the form.
    pub fn next_field(&mut self) {
        let count = self.field_count();
        self.current_field = (self.current_field + 1) % count;
        while !self.editable(self.current_field) {
            self.current_field = (self.current_field + 1) % count;
        }
        self.update_active_field();
    }

    /// Move to the previous editable field in the form.
    pub fn prev_field(&mut self) {
        let count = self.field_count();
        self.current_field = if self.current_field == 0 {
            count - 1
        } else {
            self.current_field - 1
        };
        while !self.editable(self.current_field) {
            self.current_field = if self.current_field == 0 {
                count - 1
            } else {
                self.current_field - 1
            };
        }
        self.update_active_field();
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        for field in self.fields_mut() {
            field.active = false;
        }

        match self.current_field {
            TITLE_FIELD => self.title.active = true,
            DESCRIPTION_FIELD => self.description.active = true,
            DUE_FIELD => self.due.active = true,
            PROPERTY_FIELD => self.property.active = true,
            ASSIGNEE_FIELD | PRIORITY_FIELD | STATUS_FIELD => {}
            _ => {}
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_char(c),
            DESCRIPTION_FIELD => self.description.handle_char(c),
            DUE_FIELD => self.due.handle_char(c),
            PROPERTY_FIELD => self.property.handle_char(c),
            _ => {}
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_backspace(),
            DESCRIPTION_FIELD => self.description.handle_backspace(),
            DUE_FIELD => self.due.handle_backspace(),
            PROPERTY_FIELD => self.property.handle_backspace(),
            _ => {}
        }
    }

    /// Handle delete input for the currently active field.
    pub fn handle_delete(&mut self) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_delete(),
            DESCRIPTION_FIELD => self.description.handle_delete(),
            DUE_FIELD => self.due.handle_delete(),
            PROPERTY_FIELD => self.property.handle_delete(),
            _ => {}
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            TITLE_FIELD => {
                if right {
                    self.title.move_cursor_right()
                } else {
                    self.title.move_cursor_left()
                }
            }
            DESCRIPTION_FIELD => {
                if right {
                    self.description.move_cursor_right()
                } else {
                    self.description.move_cursor_left()
                }
            }
            DUE_FIELD => {
                if right {
                    self.due.move_cursor_right()
                } else {
                    self.due.move_cursor_left()
                }
            }
            PROPERTY_FIELD => {
                if right {
                    self.property.move_cursor_right()
                } else {
                    self.property.move_cursor_left()
                }
            }
            ASSIGNEE_FIELD => {
                if right {
                    self.assignee = (self.assignee + 1) % self.assignees.len();
                } else {
                    self.assignee = if self.assignee == 0 {
                        self.assignees.len() - 1
                    } else {
                        self.assignee - 1
                    };
                }
            }
            PRIORITY_FIELD => {
                if right {
                    self.priority = (self.priority + 1) % self.priorities.len();
                } else {
                    self.priority = if self.priority == 0 {
                        self.priorities.len() - 1
                    } else {
                        self.priority - 1
                    };
                }
            }
            STATUS_FIELD => {
                if right {
                    self.status = (self.status + 1) % self.statuses.len();
                } else {
                    self.status = if self.status == 0 {
                        self.statuses.len() - 1
                    } else {
                        self.status - 1
                    };
                }
            }
            _ => {}
        }
    }

    /// The currently selected assignee's user id. Empty means unassigned.
    pub fn selected_assignee(&self) -> &str {
        &self.assignees[self.assignee].0
    }

    /// The currently selected assignee's display name.
    pub fn selected_assignee_name(&self) -> &str {
        &self.assignees[self.assignee].1
    }

    /// The currently selected priority.
    pub fn selected_priority(&self) -> Priority {
        self.priorities[self.priority]
    }

    /// The currently selected status.
    pub fn selected_status(&self) -> Status {
        self.statuses[self.status]
    }

    /// Display label for the selected priority.
    pub fn selected_priority_label(&self) -> &'static str {
        format_priority(self.selected_priority())
    }

    /// Display label for the selected status.
    pub fn selected_status_label(&self) -> &'static str {
        format_status(self.selected_status())
    }
}
