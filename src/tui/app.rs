//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between
//! the dashboard, forms, and dialogs. The layout adapts to the terminal
//! width: wide terminals get a sidebar plus a board or table, narrow
//! terminals get a flat card list with a filter popup.

use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};

use crate::fields::{wide_layout, DueBucket, Priority, Role, SidebarFilter, Status, ViewMode};
use crate::filter::{derive_view, workload_summary, FilterState, TaskCounts};
use crate::store::{
    format_due, format_due_relative, format_priority, format_role, format_status, parse_due_input,
    Store,
};
use crate::task::{Task, TaskDraft};
use crate::tui::{
    colors::{AMBER, DARK_RED, GOLD, MOSS_GREEN, STEEL_BLUE},
    enums::{AppState, FocusArea, InputMode},
    input::InputField,
    task_form::{
        TaskForm, ASSIGNEE_FIELD, DESCRIPTION_FIELD, DUE_FIELD, PRIORITY_FIELD, PROPERTY_FIELD,
        STATUS_FIELD, TITLE_FIELD,
    },
    utils::centered_rect,
};
use crate::user::User;

/// Sidebar entries in display order, bound to the 1-5 shortcut keys.
const SIDEBAR_ENTRIES: [(SidebarFilter, &str); 5] = [
    (SidebarFilter::All, "All Tasks"),
    (SidebarFilter::MyTasks, "My Tasks"),
    (SidebarFilter::Pending, "Pending"),
    (SidebarFilter::InProgress, "In Progress"),
    (SidebarFilter::Completed, "Completed"),
];

/// Board lanes, left to right.
const BOARD_STATUSES: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

const FILTER_STATUSES: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];
const FILTER_PRIORITIES: [Priority; 4] = [
    Priority::Critical,
    Priority::High,
    Priority::Medium,
    Priority::Low,
];
const FILTER_BUCKETS: [DueBucket; 3] = [DueBucket::Overdue, DueBucket::Today, DueBucket::Week];

/// Total rows in the narrow-layout filter popup, including "clear all".
const FILTER_ROWS: usize = 11;

/// Accent color for a status lane.
fn status_color(status: Status) -> Color {
    match status {
        Status::Pending => AMBER,
        Status::InProgress => STEEL_BLUE,
        Status::Completed => MOSS_GREEN,
    }
}

/// Add the value to the set if absent, remove it if present.
fn toggle_membership<T: PartialEq>(set: &mut Vec<T>, value: T) {
    if let Some(pos) = set.iter().position(|v| *v == value) {
        set.remove(pos);
    } else {
        set.push(value);
    }
}

/// Main application state for the TUI.
pub struct App {
    state: AppState,
    store: Store,
    user: User,
    today: NaiveDate,

    // Wide-layout filter surface.
    sidebar: SidebarFilter,
    staff_pick: Option<String>,
    // Narrow-layout filter surface.
    statuses: Vec<Status>,
    priorities: Vec<Priority>,
    due: Option<DueBucket>,
    // Shared between both layouts.
    search: InputField,
    search_active: bool,

    wide: bool,
    view_mode: ViewMode,
    focus: FocusArea,

    // Derived from the store on every refresh.
    visible: Vec<String>,
    counts: TaskCounts,
    board_columns: [Vec<String>; 3],

    table_state: TableState,
    list_state: ListState,
    board_column: usize,
    board_card: usize,
    board_scroll: [usize; 3],
    /// Task the open detail, edit, or confirm dialog refers to.
    selected_task: Option<String>,

    task_form: Option<TaskForm>,
    input_mode: InputMode,
    filter_row: usize,
    user_list_state: ListState,
    confirm_action: Option<String>,
    status_message: String,
}

impl App {
    /// Create a new application with today's date.
    pub fn new(store: Store, user: User) -> Self {
        Self::with_today(store, user, Local::now().date_naive())
    }

    fn with_today(store: Store, user: User, today: NaiveDate) -> Self {
        let mut app = Self {
            state: AppState::Dashboard,
            store,
            user,
            today,
            sidebar: SidebarFilter::All,
            staff_pick: None,
            statuses: Vec::new(),
            priorities: Vec::new(),
            due: None,
            search: InputField::new(),
            search_active: false,
            wide: true,
            view_mode: ViewMode::Board,
            focus: FocusArea::Main,
            visible: Vec::new(),
            counts: TaskCounts::default(),
            board_columns: Default::default(),
            table_state: TableState::default(),
            list_state: ListState::default(),
            board_column: 0,
            board_card: 0,
            board_scroll: [0; 3],
            selected_task: None,
            task_form: None,
            input_mode: InputMode::None,
            filter_row: 0,
            user_list_state: ListState::default(),
            confirm_action: None,
            status_message: String::new(),
        };
        app.refresh();
        app
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Build the filter set for the current layout. Wide layouts filter
    /// with the sidebar and staff picker; narrow layouts use the filter
    /// popup. The inactive surface is ignored entirely, never merged.
    fn effective_filters(&self) -> FilterState {
        if self.wide {
            FilterState {
                sidebar: self.sidebar,
                staff: self.staff_pick.clone(),
                query: self.search.value.clone(),
                ..Default::default()
            }
        } else {
            FilterState {
                statuses: self.statuses.clone(),
                priorities: self.priorities.clone(),
                due: self.due,
                query: self.search.value.clone(),
                ..Default::default()
            }
        }
    }

    /// Recompute the visible task list, sidebar counts, and board lanes
    /// from the store, then restore the selection to the same task where
    /// it survived the change.
    fn refresh(&mut self) {
        let old_row = self
            .table_state
            .selected()
            .and_then(|i| self.visible.get(i).cloned());
        let old_card = self.board_columns[self.board_column]
            .get(self.board_card)
            .cloned();

        let filters = self.effective_filters();
        let (visible, counts, columns) = {
            let view = derive_view(
                &self.store.tasks,
                &self.store.users,
                &self.user,
                &filters,
                self.today,
            );
            let visible: Vec<String> = view.tasks.iter().map(|t| t.id.clone()).collect();
            let mut columns: [Vec<String>; 3] = Default::default();
            for task in &view.tasks {
                let lane = match task.status {
                    Status::Pending => 0,
                    Status::InProgress => 1,
                    Status::Completed => 2,
                };
                columns[lane].push(task.id.clone());
            }
            (visible, view.counts, columns)
        };
        self.visible = visible;
        self.counts = counts;
        self.board_columns = columns;

        let row = match old_row.and_then(|id| self.visible.iter().position(|t| *t == id)) {
            Some(i) => Some(i),
            None if !self.visible.is_empty() => Some(0),
            None => None,
        };
        self.select_row(row);

        let mut found = None;
        if let Some(id) = old_card {
            for lane in 0..self.board_columns.len() {
                if let Some(i) = self.board_columns[lane].iter().position(|t| *t == id) {
                    found = Some((lane, i));
                    break;
                }
            }
        }
        match found {
            Some((lane, card)) => {
                self.board_column = lane;
                self.board_card = card;
            }
            None => self.clamp_board_card(),
        }
    }

    /// Keep the table and list selection in step; the active one depends
    /// on the current layout.
    fn select_row(&mut self, index: Option<usize>) {
        self.table_state.select(index);
        self.list_state.select(index);
    }

    fn clamp_board_card(&mut self) {
        let len = self.board_columns[self.board_column].len();
        self.board_card = self.board_card.min(len.saturating_sub(1));
    }

    /// Id of the task under the cursor, for whichever view is active.
    fn selected_task_id(&self) -> Option<String> {
        if self.wide && self.view_mode == ViewMode::Board {
            self.board_columns[self.board_column]
                .get(self.board_card)
                .cloned()
        } else {
            let index = self.table_state.selected()?;
            self.visible.get(index).cloned()
        }
    }

    /// Point both the row selection and the board selection at the task.
    fn focus_task(&mut self, id: &str) {
        if let Some(pos) = self.visible.iter().position(|t| t == id) {
            self.select_row(Some(pos));
        }
        let mut found = None;
        for lane in 0..self.board_columns.len() {
            if let Some(i) = self.board_columns[lane].iter().position(|t| t == id) {
                found = Some((lane, i));
                break;
            }
        }
        if let Some((lane, card)) = found {
            self.board_column = lane;
            self.board_card = card;
        }
    }

    fn staff_options(&self) -> Vec<(String, String)> {
        self.store
            .users_with_role(Role::Staff)
            .into_iter()
            .map(|u| (u.id.clone(), u.name.clone()))
            .collect()
    }

    fn active_filter_count(&self) -> usize {
        self.statuses.len() + self.priorities.len() + usize::from(self.due.is_some())
    }

    fn assignee_initials(&self, task: &Task) -> String {
        if task.assigned_to.is_empty() {
            "--".to_string()
        } else {
            match self.store.user(&task.assigned_to) {
                Some(user) => user.avatar.clone(),
                None => "??".to_string(),
            }
        }
    }

    /// Poll for and handle keyboard events based on current application
    /// state.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                if self.search_active {
                    self.handle_search_input(key.code);
                    return Ok(false);
                }

                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
                {
                    return Ok(true);
                }

                let should_quit = match self.state {
                    AppState::Dashboard => self.handle_dashboard_input(key.code)?,
                    AppState::TaskDetail => self.handle_detail_input(key.code)?,
                    AppState::AddTask | AppState::EditTask => self.handle_form_input(key.code)?,
                    AppState::FilterPopup => self.handle_filter_input(key.code)?,
                    AppState::SwitchUser => self.handle_switch_user_input(key.code)?,
                    AppState::Help => self.handle_help_input(key.code)?,
                    AppState::Confirm => self.handle_confirm_input(key.code)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Handle keystrokes while the search field is capturing input. The
    /// view updates live on every edit.
    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                self.search_active = false;
                self.input_mode = InputMode::None;
            }
            KeyCode::Esc => {
                self.search.clear();
                self.search_active = false;
                self.input_mode = InputMode::None;
                self.refresh();
            }
            KeyCode::Backspace => {
                self.search.handle_backspace();
                self.refresh();
            }
            KeyCode::Delete => {
                self.search.handle_delete();
                self.refresh();
            }
            KeyCode::Left => self.search.move_cursor_left(),
            KeyCode::Right => self.search.move_cursor_right(),
            KeyCode::Char(c) => {
                self.search.handle_char(c);
                self.refresh();
            }
            _ => {}
        }
    }

    fn handle_dashboard_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc => {
                if !self.search.value.is_empty() {
                    self.search.clear();
                    self.refresh();
                } else {
                    return Ok(true);
                }
            }
            KeyCode::Char('/') => {
                self.search_active = true;
                self.input_mode = InputMode::Text;
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            KeyCode::Char('u') => self.open_switch_user(),
            KeyCode::Char('r') => self.toggle_role(),
            KeyCode::Char('v') if self.wide => self.toggle_view_mode(),
            KeyCode::Char('f') if !self.wide => {
                self.filter_row = 0;
                self.state = AppState::FilterPopup;
            }
            KeyCode::Char('t') if self.wide => self.cycle_staff_pick(),
            KeyCode::Char(c @ '1'..='5') if self.wide => {
                self.select_sidebar_index(c as usize - '1' as usize)
            }
            KeyCode::Tab if self.wide => {
                self.focus = match self.focus {
                    FocusArea::Sidebar => FocusArea::Main,
                    FocusArea::Main => FocusArea::Sidebar,
                };
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => self.handle_nav(key),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.wide && self.focus == FocusArea::Sidebar {
                    self.focus = FocusArea::Main;
                } else if let Some(id) = self.selected_task_id() {
                    self.selected_task = Some(id);
                    self.state = AppState::TaskDetail;
                }
            }
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('s') => self.cycle_selected_status(),
            _ => {}
        }
        Ok(false)
    }

    /// Route arrow keys to the focused pane and active view.
    fn handle_nav(&mut self, key: KeyCode) {
        if self.wide && self.focus == FocusArea::Sidebar {
            let index = SIDEBAR_ENTRIES
                .iter()
                .position(|(filter, _)| *filter == self.sidebar)
                .unwrap_or(0);
            match key {
                KeyCode::Up if index > 0 => self.select_sidebar_index(index - 1),
                KeyCode::Down if index + 1 < SIDEBAR_ENTRIES.len() => {
                    self.select_sidebar_index(index + 1)
                }
                _ => {}
            }
        } else if self.wide && self.view_mode == ViewMode::Board {
            match key {
                KeyCode::Left if self.board_column > 0 => {
                    self.board_column -= 1;
                    self.clamp_board_card();
                }
                KeyCode::Right if self.board_column + 1 < self.board_columns.len() => {
                    self.board_column += 1;
                    self.clamp_board_card();
                }
                KeyCode::Up if self.board_card > 0 => self.board_card -= 1,
                KeyCode::Down => {
                    if self.board_card + 1 < self.board_columns[self.board_column].len() {
                        self.board_card += 1;
                    }
                }
                _ => {}
            }
        } else {
            let len = self.visible.len();
            if len == 0 {
                return;
            }
            let current = self.table_state.selected().unwrap_or(0);
            match key {
                KeyCode::Up if current > 0 => self.select_row(Some(current - 1)),
                KeyCode::Down if current + 1 < len => self.select_row(Some(current + 1)),
                _ => {}
            }
        }
    }

    fn select_sidebar_index(&mut self, index: usize) {
        if let Some((filter, _)) = SIDEBAR_ENTRIES.get(index) {
            self.sidebar = *filter;
            self.refresh();
        }
    }

    /// Switch between the board and the table, keeping the cursor on the
    /// same task.
    fn toggle_view_mode(&mut self) {
        let id = self.selected_task_id();
        self.view_mode = match self.view_mode {
            ViewMode::Board => ViewMode::Table,
            ViewMode::Table => ViewMode::Board,
        };
        if let Some(id) = id {
            self.focus_task(&id);
        }
    }

    /// Step the manager's staff filter through the roster: all staff,
    /// then each staff member in turn, then back to all.
    fn cycle_staff_pick(&mut self) {
        if !self.user.is_manager() {
            return;
        }
        let staff: Vec<String> = self
            .store
            .users_with_role(Role::Staff)
            .iter()
            .map(|u| u.id.clone())
            .collect();
        self.staff_pick = match &self.staff_pick {
            None => staff.first().cloned(),
            Some(current) => match staff.iter().position(|id| id == current) {
                Some(i) if i + 1 < staff.len() => Some(staff[i + 1].clone()),
                _ => None,
            },
        };
        self.refresh();
    }

    fn open_switch_user(&mut self) {
        let current = self.store.users.iter().position(|u| u.id == self.user.id);
        self.user_list_state.select(current.or(Some(0)));
        self.state = AppState::SwitchUser;
    }

    /// Jump to the first user holding the other role.
    fn toggle_role(&mut self) {
        let target = if self.user.is_manager() {
            Role::Staff
        } else {
            Role::Manager
        };
        let next = self
            .store
            .users_with_role(target)
            .first()
            .map(|u| (*u).clone());
        if let Some(user) = next {
            self.apply_user(user);
        }
    }

    /// Make the given user the acting user and rebuild the view. The
    /// staff filter only makes sense for managers, so it resets when a
    /// staff member takes over.
    fn apply_user(&mut self, user: User) {
        if user.role == Role::Staff {
            self.staff_pick = None;
        }
        self.set_status_message(format!(
            "Acting as {} ({})",
            user.name,
            format_role(user.role)
        ));
        self.user = user;
        self.state = AppState::Dashboard;
        self.refresh();
    }

    fn open_add_form(&mut self) {
        if !self.user.is_manager() {
            self.set_status_message("Only managers can create tasks".to_string());
            return;
        }
        let mut form = TaskForm::new(self.staff_options());
        form.update_active_field();
        self.task_form = Some(form);
        self.input_mode = InputMode::Text;
        self.state = AppState::AddTask;
    }

    /// Open the edit form for the task under the cursor. Staff get the
    /// reduced form covering only the description and status.
    fn open_edit_form(&mut self) {
        let target = match self.selected_task.clone().or_else(|| self.selected_task_id()) {
            Some(id) => id,
            None => return,
        };
        let staff_view = !self.user.is_manager();
        let options = self.staff_options();
        if let Some(task) = self.store.get(&target) {
            let mut form = TaskForm::from_task(task, options, staff_view);
            form.update_active_field();
            self.task_form = Some(form);
            self.selected_task = Some(target);
            self.input_mode = InputMode::Text;
            self.state = AppState::EditTask;
        }
    }

    fn request_delete(&mut self) {
        if !self.user.is_manager() {
            self.set_status_message("Only managers can delete tasks".to_string());
            return;
        }
        let target = match self.selected_task.clone().or_else(|| self.selected_task_id()) {
            Some(id) => id,
            None => return,
        };
        let title = match self.store.get(&target) {
            Some(task) => task.title.clone(),
            None => return,
        };
        self.confirm_action = Some(format!("Delete task '{}'", title));
        self.selected_task = Some(target);
        self.state = AppState::Confirm;
    }

    /// Advance the task under the cursor to the next status and follow
    /// it into its new lane.
    fn cycle_selected_status(&mut self) {
        let target = match self.selected_task.clone().or_else(|| self.selected_task_id()) {
            Some(id) => id,
            None => return,
        };
        let next = match self.store.get(&target).map(|t| t.status) {
            Some(Status::Pending) => Status::InProgress,
            Some(Status::InProgress) => Status::Completed,
            Some(Status::Completed) => Status::Pending,
            None => return,
        };
        self.store.set_status(&target, next);
        self.set_status_message(format!("Task status updated to {}", format_status(next)));
        self.refresh();
        self.focus_task(&target);
    }

    fn handle_detail_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.selected_task = None;
                self.state = AppState::Dashboard;
            }
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('s') => self.cycle_selected_status(),
            KeyCode::Char('d') => self.request_delete(),
            _ => {}
        }
        Ok(false)
    }

    fn handle_form_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Esc => self.close_form(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.task_form.as_mut() {
                    form.next_field();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.task_form.as_mut() {
                    form.prev_field();
                }
            }
            KeyCode::Left => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_left_right(false);
                }
            }
            KeyCode::Right => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_left_right(true);
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_delete();
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_char(c);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn close_form(&mut self) {
        self.task_form = None;
        self.selected_task = None;
        self.input_mode = InputMode::None;
        self.state = AppState::Dashboard;
    }

    /// Validate the open form and apply it to the store. Validation
    /// failures keep the form open with a message in the status bar.
    fn submit_form(&mut self) {
        let form = match self.task_form.take() {
            Some(form) => form,
            None => return,
        };

        if !form.staff_view && form.title.value.trim().is_empty() {
            self.set_status_message("Title is required".to_string());
            self.task_form = Some(form);
            return;
        }

        let due_text = form.due.value.trim().to_string();
        let mut due_date = None;
        if !due_text.is_empty() {
            match parse_due_input(&due_text, self.today) {
                Some(date) => due_date = Some(date),
                None => {
                    self.set_status_message(
                        "Unrecognised due date. Use YYYY-MM-DD, today, tomorrow, or in 3d"
                            .to_string(),
                    );
                    self.task_form = Some(form);
                    return;
                }
            }
        }

        let property = form.property.value.trim().to_string();
        let property_empty = property.is_empty();

        let draft = if form.staff_view {
            TaskDraft {
                description: Some(form.description.value.clone()),
                status: Some(form.selected_status()),
                ..Default::default()
            }
        } else {
            TaskDraft {
                title: Some(form.title.value.trim().to_string()),
                description: Some(form.description.value.clone()),
                assigned_to: Some(form.selected_assignee().to_string()),
                priority: Some(form.selected_priority()),
                status: Some(form.selected_status()),
                due_date,
                property_id: if property_empty { None } else { Some(property) },
            }
        };

        match self.state {
            AppState::AddTask => {
                let id = self.store.create(draft, &self.user.id, self.today);
                self.set_status_message("Task created".to_string());
                self.close_form();
                self.refresh();
                self.focus_task(&id);
            }
            AppState::EditTask => {
                let target = match self.selected_task.clone() {
                    Some(id) => id,
                    None => {
                        self.close_form();
                        return;
                    }
                };
                // Drafts merge field by field, so clearing the due date
                // or property takes a direct write after the merge.
                let clear_due = !form.staff_view && due_date.is_none();
                let clear_property = !form.staff_view && property_empty;
                self.store.update(&target, draft);
                if clear_due {
                    if let Some(task) = self.store.get_mut(&target) {
                        task.due_date = None;
                    }
                }
                if clear_property {
                    if let Some(task) = self.store.get_mut(&target) {
                        task.property_id = None;
                    }
                }
                self.set_status_message("Task updated".to_string());
                self.close_form();
                self.refresh();
                self.focus_task(&target);
            }
            _ => {}
        }
    }

    fn handle_filter_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => {
                self.state = AppState::Dashboard
            }
            KeyCode::Up if self.filter_row > 0 => self.filter_row -= 1,
            KeyCode::Down if self.filter_row + 1 < FILTER_ROWS => self.filter_row += 1,
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_filter_row(),
            _ => {}
        }
        Ok(false)
    }

    /// Apply the highlighted filter popup row. Status and priority rows
    /// toggle set membership, due rows behave like radio buttons, and
    /// the last row clears everything.
    fn toggle_filter_row(&mut self) {
        match self.filter_row {
            0..=2 => toggle_membership(&mut self.statuses, FILTER_STATUSES[self.filter_row]),
            3..=6 => {
                toggle_membership(&mut self.priorities, FILTER_PRIORITIES[self.filter_row - 3])
            }
            7..=9 => {
                let bucket = FILTER_BUCKETS[self.filter_row - 7];
                self.due = if self.due == Some(bucket) {
                    None
                } else {
                    Some(bucket)
                };
            }
            _ => {
                self.statuses.clear();
                self.priorities.clear();
                self.due = None;
            }
        }
        self.refresh();
    }

    fn handle_switch_user_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('u') => {
                self.state = AppState::Dashboard
            }
            KeyCode::Up => {
                let current = self.user_list_state.selected().unwrap_or(0);
                if current > 0 {
                    self.user_list_state.select(Some(current - 1));
                }
            }
            KeyCode::Down => {
                let current = self.user_list_state.selected().unwrap_or(0);
                if current + 1 < self.store.users.len() {
                    self.user_list_state.select(Some(current + 1));
                }
            }
            KeyCode::Enter => {
                if let Some(index) = self.user_list_state.selected() {
                    if let Some(user) = self.store.users.get(index).cloned() {
                        self.apply_user(user);
                    }
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_help_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Enter => {
                self.state = AppState::Dashboard
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_confirm_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if self.confirm_action.is_some() {
                    if let Some(id) = self.selected_task.take() {
                        if self.store.delete(&id) {
                            self.set_status_message("Task deleted".to_string());
                        }
                    }
                    self.refresh();
                }
                self.state = AppState::Dashboard;
                self.confirm_action = None;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Dashboard;
                self.confirm_action = None;
                self.selected_task = None;
            }
            _ => {}
        }
        Ok(false)
    }

    fn render_header(&mut self, f: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("TASKBOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{} ({})", self.user.name, format_role(self.user.role)),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            ),
        ];
        if self.search_active {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("Search: {}_", self.search.value),
                Style::default().fg(GOLD),
            ));
        } else if !self.search.value.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("Search: {}", self.search.value),
                Style::default().fg(GOLD),
            ));
        }

        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_dashboard(&mut self, f: &mut Frame, area: Rect) {
        if self.wide {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(26), Constraint::Min(0)])
                .split(area);
            self.render_sidebar(f, chunks[0]);
            match self.view_mode {
                ViewMode::Board => self.render_board(f, chunks[1]),
                ViewMode::Table => self.render_table(f, chunks[1]),
            }
        } else {
            self.render_card_list(f, area);
        }
    }

    /// Render the wide-layout sidebar: view shortcuts with badge counts,
    /// plus the staff filter and workload summary for managers.
    fn render_sidebar(&mut self, f: &mut Frame, area: Rect) {
        let badges = [
            self.counts.all,
            self.counts.my_tasks,
            self.counts.pending,
            self.counts.in_progress,
            self.counts.completed,
        ];

        let mut lines = Vec::new();
        for (i, ((filter, label), count)) in SIDEBAR_ENTRIES.iter().zip(badges).enumerate() {
            let active = *filter == self.sidebar;
            let marker = if active { "» " } else { "  " };
            let style = if active {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("{}{}. {} ({})", marker, i + 1, label, count),
                style,
            )));
        }

        if self.user.is_manager() {
            lines.push(Line::from(""));
            let staff_label = match &self.staff_pick {
                Some(id) => self.store.user_name(id).to_string(),
                None => "All staff".to_string(),
            };
            lines.push(Line::from(format!("Staff [t]: {}", staff_label)));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Workload",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for entry in workload_summary(&self.store.tasks, &self.store.users, &self.user) {
                lines.push(Line::from(format!("  {} {}", entry.name, entry.count)));
            }
        }

        let border_style = if self.focus == FocusArea::Sidebar {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let sidebar = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Views")
                .border_style(border_style),
        );
        f.render_widget(sidebar, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(area);
        for lane in 0..BOARD_STATUSES.len() {
            self.render_board_column(f, chunks[lane], lane);
        }
    }

    /// Render a single board lane with its scroll window and indicators.
    fn render_board_column(&mut self, f: &mut Frame, area: Rect, column: usize) {
        let status = BOARD_STATUSES[column];
        let accent = status_color(status);
        let is_selected = self.focus == FocusArea::Main && column == self.board_column;

        let border_style = if is_selected {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(accent)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                "{} ({})",
                format_status(status),
                self.board_columns[column].len()
            ))
            .border_style(border_style);

        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.board_columns[column].is_empty() {
            return;
        }

        let card_height = 5usize;
        let available_height = inner.height as usize;
        let visible_cards = available_height / card_height;
        if visible_cards == 0 {
            return;
        }

        // Keep the selected card inside the visible window.
        let scroll = if column == self.board_column {
            let start = self.board_scroll[column];
            if self.board_card < start {
                self.board_scroll[column] = self.board_card;
            } else if self.board_card >= start + visible_cards {
                self.board_scroll[column] = self.board_card + 1 - visible_cards;
            }
            self.board_scroll[column]
        } else {
            let max = self.board_columns[column]
                .len()
                .saturating_sub(visible_cards);
            self.board_scroll[column] = self.board_scroll[column].min(max);
            self.board_scroll[column]
        };

        let mut current_y = 0usize;
        let mut rendered = 0usize;
        let cards = &self.board_columns[column];
        for (index, task_id) in cards.iter().enumerate().skip(scroll) {
            if let Some(task) = self.store.get(task_id) {
                if current_y + card_height > available_height {
                    break;
                }
                let card_area = Rect {
                    x: inner.x,
                    y: inner.y + current_y as u16,
                    width: inner.width,
                    height: card_height as u16,
                };
                let selected = is_selected && index == self.board_card;
                self.render_card(f, card_area, task, accent, selected);
                current_y += card_height;
                rendered += 1;
            }
        }

        if scroll > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", scroll))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y,
                    width: inner.width,
                    height: 1,
                },
            );
        }
        let remaining = cards.len().saturating_sub(scroll + rendered);
        if remaining > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y + inner.height - 1,
                    width: inner.width,
                    height: 1,
                },
            );
        }
    }

    /// Render a single task card: the title wrapped to at most two
    /// lines, then priority, due, and assignee initials.
    fn render_card(&self, f: &mut Frame, area: Rect, task: &Task, accent: Color, selected: bool) {
        let style = if selected {
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };

        let available_width = area.width.saturating_sub(2) as usize;
        let mut lines = Vec::new();
        let mut current_line = String::new();
        for word in task.title.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.len() + 1 + word.len() <= available_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(current_line.clone());
                current_line = word.to_string();
                if lines.len() >= 2 {
                    break;
                }
            }
        }
        if !current_line.is_empty() && lines.len() < 2 {
            lines.push(current_line);
        }

        let mut card_text: Vec<Line> = lines.into_iter().map(Line::from).collect();
        card_text.push(Line::from(format!(
            "{} | {} | {}",
            format_priority(task.priority),
            format_due_relative(task.due_date, self.today),
            self.assignee_initials(task),
        )));

        let card = Paragraph::new(card_text)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
            .wrap(Wrap { trim: true });
        f.render_widget(card, area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let header_cells = ["ID", "Status", "Priority", "Due", "Property", "Assignee", "Title"]
            .iter()
            .map(|h| {
                ratatui::widgets::Cell::from(*h)
                    .style(Style::default().add_modifier(Modifier::BOLD))
            });
        let header = Row::new(header_cells)
            .style(Style::default().bg(STEEL_BLUE).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|id| self.store.get(id))
            .map(|task| {
                let style = match task.status {
                    Status::Completed => Style::default().fg(Color::DarkGray),
                    Status::InProgress => Style::default().fg(status_color(task.status)),
                    Status::Pending => Style::default().fg(Color::White),
                };
                Row::new(vec![
                    ratatui::widgets::Cell::from(task.id.clone()),
                    ratatui::widgets::Cell::from(format_status(task.status)),
                    ratatui::widgets::Cell::from(format_priority(task.priority)),
                    ratatui::widgets::Cell::from(format_due(task.due_date)),
                    ratatui::widgets::Cell::from(
                        task.property_id.as_deref().unwrap_or("-").to_string(),
                    ),
                    ratatui::widgets::Cell::from(
                        self.store.user_name(&task.assigned_to).to_string(),
                    ),
                    ratatui::widgets::Cell::from(task.title.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(6),  // ID
            Constraint::Length(12), // Status
            Constraint::Length(9),  // Priority
            Constraint::Length(13), // Due
            Constraint::Length(10), // Property
            Constraint::Length(14), // Assignee
            Constraint::Min(20),    // Title
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{})",
                self.visible.len(),
                self.counts.all
            )))
            .row_highlight_style(Style::default().bg(GOLD).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    /// Render the narrow-layout task list: two lines per task, with the
    /// active filter count in the title.
    fn render_card_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .visible
            .iter()
            .filter_map(|id| self.store.get(id))
            .map(|task| {
                let meta = format!(
                    "  {} | {} | {} | {}",
                    format_status(task.status),
                    format_priority(task.priority),
                    format_due_relative(task.due_date, self.today),
                    self.assignee_initials(task),
                );
                ListItem::new(vec![
                    Line::from(Span::styled(
                        task.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(meta, Style::default().fg(Color::Gray))),
                ])
            })
            .collect();

        let filters = self.active_filter_count();
        let title = if filters > 0 {
            format!(
                "Tasks ({}/{}) [{} active]",
                self.visible.len(),
                self.counts.all,
                filters
            )
        } else {
            format!("Tasks ({}/{})", self.visible.len(), self.counts.all)
        };

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(GOLD).fg(Color::Black))
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_detail(&mut self, f: &mut Frame, area: Rect) {
        let id = match &self.selected_task {
            Some(id) => id.clone(),
            None => return,
        };
        let task = match self.store.get(&id) {
            Some(task) => task,
            None => return,
        };

        let hint = if self.user.is_manager() {
            "[e] edit  [s] status  [d] delete  [Esc] close"
        } else {
            "[e] edit  [s] status  [Esc] close"
        };

        let text = vec![
            Line::from(Span::styled(
                task.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Status:      {}", format_status(task.status))),
            Line::from(format!("Priority:    {}", format_priority(task.priority))),
            Line::from(format!(
                "Assignee:    {}",
                self.store.user_name(&task.assigned_to)
            )),
            Line::from(format!(
                "Due:         {} ({})",
                format_due(task.due_date),
                format_due_relative(task.due_date, self.today)
            )),
            Line::from(format!(
                "Property:    {}",
                task.property_id.as_deref().unwrap_or("-")
            )),
            Line::from(format!(
                "Created by:  {}",
                self.store.user_name(&task.created_by)
            )),
            Line::from(format!("Created:     {}", task.created_at)),
            Line::from(""),
            Line::from(task.description.clone()),
            Line::from(""),
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        ];

        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);
        let detail = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Task Details")
                    .border_style(Style::default().fg(GOLD)),
            )
            .style(Style::default().bg(Color::Black))
            .wrap(Wrap { trim: true });
        f.render_widget(detail, popup_area);
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let form = match self.task_form.as_ref() {
            Some(form) => form,
            None => return,
        };

        let title = if self.state == AppState::AddTask {
            "New Task"
        } else {
            "Edit Task"
        };
        let outer = Block::default().borders(Borders::ALL).title(title);
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        let field_border = |index: usize| {
            if index == form.current_field {
                Style::default().fg(GOLD)
            } else if !form.editable(index) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            }
        };

        let text_fields = [
            (TITLE_FIELD, "Title", &form.title),
            (DESCRIPTION_FIELD, "Description", &form.description),
            (DUE_FIELD, "Due (YYYY-MM-DD, today, in 3d)", &form.due),
            (PROPERTY_FIELD, "Property", &form.property),
        ];
        for (index, label, field) in text_fields {
            let widget = Paragraph::new(field.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(field_border(index)),
            );
            f.render_widget(widget, chunks[index]);
        }

        let selectors = [
            (
                ASSIGNEE_FIELD,
                "Assignee",
                form.selected_assignee_name().to_string(),
            ),
            (
                PRIORITY_FIELD,
                "Priority",
                form.selected_priority_label().to_string(),
            ),
            (
                STATUS_FIELD,
                "Status",
                form.selected_status_label().to_string(),
            ),
        ];
        for (index, label, value) in selectors {
            let widget = Paragraph::new(format!("< {} >", value)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(field_border(index)),
            );
            f.render_widget(widget, chunks[index]);
        }

        let cursor_fields = [
            (TITLE_FIELD, &form.title),
            (DESCRIPTION_FIELD, &form.description),
            (DUE_FIELD, &form.due),
            (PROPERTY_FIELD, &form.property),
        ];
        for (index, field) in cursor_fields {
            if field.active {
                f.set_cursor_position((
                    chunks[index].x + field.cursor as u16 + 1,
                    chunks[index].y + 1,
                ));
            }
        }

        let mut instructions = vec![
            Line::from("[Tab]/[Shift+Tab] move between fields   [Left]/[Right] change selection"),
            Line::from("[Enter] save   [Esc] cancel"),
        ];
        if form.staff_view {
            instructions.push(Line::from(
                "Staff may change the description and status only.",
            ));
        }
        let footer = Paragraph::new(instructions)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(footer, chunks[7]);
    }

    fn filter_rows(&self) -> Vec<(usize, String, Option<bool>)> {
        let mut rows = Vec::new();
        for (i, status) in FILTER_STATUSES.iter().enumerate() {
            rows.push((
                i,
                format!("Status: {}", format_status(*status)),
                Some(self.statuses.contains(status)),
            ));
        }
        for (i, priority) in FILTER_PRIORITIES.iter().enumerate() {
            rows.push((
                3 + i,
                format!("Priority: {}", format_priority(*priority)),
                Some(self.priorities.contains(priority)),
            ));
        }
        let bucket_labels = ["Overdue", "Due today", "Due this week"];
        for (i, bucket) in FILTER_BUCKETS.iter().enumerate() {
            rows.push((
                7 + i,
                format!("Due: {}", bucket_labels[i]),
                Some(self.due == Some(*bucket)),
            ));
        }
        rows.push((10, "Clear all filters".to_string(), None));
        rows
    }

    fn render_filter_popup(&mut self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 70, area);
        f.render_widget(Clear, popup_area);

        let mut lines = Vec::new();
        for (row, label, checked) in self.filter_rows() {
            let marker = if row == self.filter_row { "» " } else { "  " };
            let boxmark = match checked {
                Some(true) => "[x] ",
                Some(false) => "[ ] ",
                None => "",
            };
            let style = if row == self.filter_row {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("{}{}{}", marker, boxmark, label),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Space] toggle   [Up]/[Down] move   [Esc] close",
            Style::default().fg(Color::DarkGray),
        )));

        let popup = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Filters")
                    .border_style(Style::default().fg(GOLD)),
            )
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, popup_area);
    }

    fn render_switch_user(&mut self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(40, 50, area);
        f.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = self
            .store
            .users
            .iter()
            .map(|user| {
                let marker = if user.id == self.user.id {
                    " (current)"
                } else {
                    ""
                };
                ListItem::new(format!(
                    "{} ({}){}",
                    user.name,
                    format_role(user.role),
                    marker
                ))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Switch User")
                    .border_style(Style::default().fg(GOLD)),
            )
            .style(Style::default().bg(Color::Black))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("► ");

        f.render_stateful_widget(list, popup_area, &mut self.user_list_state);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 80, area);
        f.render_widget(Clear, popup_area);

        let section = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let text = vec![
            Line::from(Span::styled("Global", section)),
            Line::from("  /          search all task fields"),
            Line::from("  Enter      open task details"),
            Line::from("  s          cycle task status"),
            Line::from("  e          edit task"),
            Line::from("  a          add task (managers)"),
            Line::from("  d          delete task (managers)"),
            Line::from("  u          switch user"),
            Line::from("  r          toggle manager/staff role"),
            Line::from("  q, Ctrl+q  quit"),
            Line::from(""),
            Line::from(Span::styled("Wide terminals (100+ columns)", section)),
            Line::from("  Tab        move focus between sidebar and tasks"),
            Line::from("  1-5        sidebar views (all, mine, by status)"),
            Line::from("  v          toggle board/table"),
            Line::from("  t          cycle staff filter (managers)"),
            Line::from("  Arrows     move between cards and columns"),
            Line::from(""),
            Line::from(Span::styled("Narrow terminals", section)),
            Line::from("  f          open the filter popup"),
            Line::from("  Up/Down    move through the task list"),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to close",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let help = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help")
                    .border_style(Style::default().fg(GOLD)),
            )
            .style(Style::default().bg(Color::Black))
            .wrap(Wrap { trim: false });
        f.render_widget(help, popup_area);
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(self.confirm_action.as_deref().unwrap_or("")),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.search_active {
            format!(
                "Search: {} (Esc to clear, Enter to confirm)",
                self.search.value
            )
        } else if !self.search.value.is_empty() {
            format!(
                "Tasks: {} (filtered by '{}') | Press 'h' for help",
                self.visible.len(),
                self.search.value
            )
        } else {
            match self.state {
                AppState::Dashboard => {
                    if self.wide {
                        if self.user.is_manager() {
                            "Tab pane | v view | 1-5 filter | t staff | / search | a add  e edit  d delete  s status | u user  r role | h help | q quit".to_string()
                        } else {
                            "Tab pane | v view | 1-5 filter | / search | e edit  s status | u user  r role | h help | q quit".to_string()
                        }
                    } else if self.user.is_manager() {
                        "f filters | / search | a add  e edit  d delete  s status | u user  r role | h help | q quit".to_string()
                    } else {
                        "f filters | / search | e edit  s status | u user  r role | h help | q quit".to_string()
                    }
                }
                AppState::TaskDetail => "Task Details".to_string(),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::FilterPopup => "Filters | Space toggle | Esc close".to_string(),
                AppState::SwitchUser => "Switch User | Enter select | Esc cancel".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(STEEL_BLUE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view
    /// renderers. The layout class is re-read from the frame width every
    /// pass, so resizing the terminal flips the layout on the next draw.
    fn render(&mut self, f: &mut Frame) {
        let area = f.area();

        let wide = wide_layout(area.width);
        if wide != self.wide {
            self.wide = wide;
            self.focus = FocusArea::Main;
            if wide && self.state == AppState::FilterPopup {
                self.state = AppState::Dashboard;
            }
            self.refresh();
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(f, chunks[0]);

        match self.state {
            AppState::AddTask | AppState::EditTask => self.render_task_form(f, chunks[1]),
            _ => self.render_dashboard(f, chunks[1]),
        }

        match self.state {
            AppState::TaskDetail => self.render_detail(f, area),
            AppState::FilterPopup => self.render_filter_popup(f, area),
            AppState::SwitchUser => self.render_switch_user(f, area),
            AppState::Help => self.render_help(f, area),
            AppState::Confirm => self.render_confirm(f, area),
            _ => {}
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn manager_app() -> App {
        let store = Store::builtin();
        let user = store.users[0].clone();
        App::with_today(store, user, d(2026, 2, 5))
    }

    fn staff_app() -> App {
        let store = Store::builtin();
        let user = store.users[1].clone();
        App::with_today(store, user, d(2026, 2, 5))
    }

    #[test]
    fn test_toggle_membership() {
        let mut set = vec![Status::Pending];
        toggle_membership(&mut set, Status::Completed);
        assert_eq!(set, vec![Status::Pending, Status::Completed]);
        toggle_membership(&mut set, Status::Pending);
        assert_eq!(set, vec![Status::Completed]);
    }

    #[test]
    fn test_wide_layout_uses_sidebar_surface_only() {
        let mut app = manager_app();
        app.sidebar = SidebarFilter::Pending;
        app.staff_pick = Some("2".to_string());
        app.statuses = vec![Status::Completed];
        app.due = Some(DueBucket::Overdue);

        let filters = app.effective_filters();
        assert_eq!(filters.sidebar, SidebarFilter::Pending);
        assert_eq!(filters.staff.as_deref(), Some("2"));
        assert!(filters.statuses.is_empty());
        assert!(filters.due.is_none());
    }

    #[test]
    fn test_narrow_layout_uses_popup_surface_only() {
        let mut app = manager_app();
        app.wide = false;
        app.sidebar = SidebarFilter::Pending;
        app.statuses = vec![Status::Completed];
        app.priorities = vec![Priority::High];
        app.due = Some(DueBucket::Week);

        let filters = app.effective_filters();
        assert_eq!(filters.sidebar, SidebarFilter::All);
        assert!(filters.staff.is_none());
        assert_eq!(filters.statuses, vec![Status::Completed]);
        assert_eq!(filters.priorities, vec![Priority::High]);
        assert_eq!(filters.due, Some(DueBucket::Week));
    }

    #[test]
    fn test_layout_flip_swaps_visible_set() {
        let mut app = manager_app();
        app.wide = false;
        app.statuses = vec![Status::Completed];
        app.sidebar = SidebarFilter::Pending;
        app.refresh();
        assert_eq!(app.visible, vec!["5", "13", "7"]);

        app.wide = true;
        app.refresh();
        assert_eq!(app.visible, vec!["1", "2", "6", "8", "10"]);
    }

    #[test]
    fn test_board_lanes_match_seed_ordering() {
        let app = manager_app();
        assert_eq!(app.board_columns[0], vec!["1", "2", "6", "8", "10"]);
        assert_eq!(app.board_columns[1], vec!["3", "11", "12", "4", "9"]);
        assert_eq!(app.board_columns[2], vec!["5", "13", "7"]);
    }

    #[test]
    fn test_staff_pick_cycles_roster_and_wraps() {
        let mut app = manager_app();
        assert!(app.staff_pick.is_none());
        app.cycle_staff_pick();
        assert_eq!(app.staff_pick.as_deref(), Some("2"));
        app.cycle_staff_pick();
        assert_eq!(app.staff_pick.as_deref(), Some("3"));
        app.cycle_staff_pick();
        assert_eq!(app.staff_pick.as_deref(), Some("4"));
        app.cycle_staff_pick();
        assert!(app.staff_pick.is_none());
    }

    #[test]
    fn test_staff_cannot_create_or_delete() {
        let mut app = staff_app();
        app.open_add_form();
        assert!(app.task_form.is_none());
        assert_eq!(app.status_message, "Only managers can create tasks");

        app.request_delete();
        assert!(matches!(app.state, AppState::Dashboard));
        assert_eq!(app.status_message, "Only managers can delete tasks");
    }

    #[test]
    fn test_status_cycle_follows_task_into_new_lane() {
        let mut app = manager_app();
        assert_eq!(app.selected_task_id().as_deref(), Some("1"));
        app.cycle_selected_status();
        assert_eq!(app.store.get("1").unwrap().status, Status::InProgress);
        assert_eq!(app.board_column, 1);
        assert_eq!(app.board_columns[1][app.board_card], "1");
    }

    #[test]
    fn test_confirmed_delete_removes_task() {
        let mut app = manager_app();
        app.request_delete();
        assert!(matches!(app.state, AppState::Confirm));
        assert_eq!(
            app.confirm_action.as_deref(),
            Some("Delete task 'Emergency water leak – Building B'")
        );
        app.handle_confirm_input(KeyCode::Char('y')).unwrap();
        assert!(app.store.get("1").is_none());
        assert!(matches!(app.state, AppState::Dashboard));
        assert_eq!(app.counts.all, 12);
    }

    #[test]
    fn test_cancelled_delete_keeps_task() {
        let mut app = manager_app();
        app.request_delete();
        app.handle_confirm_input(KeyCode::Char('n')).unwrap();
        assert!(app.store.get("1").is_some());
        assert!(app.confirm_action.is_none());
    }

    #[test]
    fn test_filter_popup_rows_toggle_and_clear() {
        let mut app = manager_app();
        app.wide = false;
        app.refresh();

        app.filter_row = 0;
        app.toggle_filter_row();
        assert_eq!(app.statuses, vec![Status::Pending]);
        assert_eq!(app.visible.len(), 5);

        app.filter_row = 7;
        app.toggle_filter_row();
        assert_eq!(app.due, Some(DueBucket::Overdue));
        app.filter_row = 8;
        app.toggle_filter_row();
        assert_eq!(app.due, Some(DueBucket::Today));
        app.toggle_filter_row();
        assert!(app.due.is_none());

        app.filter_row = 10;
        app.toggle_filter_row();
        assert!(app.statuses.is_empty());
        assert_eq!(app.visible.len(), 13);
    }

    #[test]
    fn test_switching_to_staff_clears_staff_pick() {
        let mut app = manager_app();
        app.staff_pick = Some("3".to_string());
        let rahul = app.store.users[1].clone();
        app.apply_user(rahul);
        assert!(app.staff_pick.is_none());
        assert_eq!(app.status_message, "Acting as Rahul Kumar (Staff)");
        assert_eq!(app.visible.len(), 6);
    }

    #[test]
    fn test_view_toggle_keeps_cursor_on_task() {
        let mut app = manager_app();
        app.board_column = 1;
        app.board_card = 2;
        assert_eq!(app.selected_task_id().as_deref(), Some("12"));
        app.toggle_view_mode();
        assert_eq!(app.view_mode, ViewMode::Table);
        assert_eq!(app.table_state.selected(), Some(7));
        assert_eq!(app.selected_task_id().as_deref(), Some("12"));
    }

    #[test]
    fn test_search_narrows_both_layouts() {
        let mut app = manager_app();
        app.search.value = "andheri".to_string();
        app.refresh();
        assert_eq!(app.visible, vec!["3"]);

        app.wide = false;
        app.refresh();
        assert_eq!(app.visible, vec!["3"]);
    }
}
