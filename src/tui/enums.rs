//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    Dashboard,
    TaskDetail,
    AddTask,
    EditTask,
    FilterPopup,
    SwitchUser,
    Help,
    Confirm,
}

/// Input mode for text entry fields.
#[derive(Clone)]
pub enum InputMode {
    None,
    Text,
}

/// Which pane receives navigation keys in the wide layout.
///
/// Narrow layouts have no sidebar, so focus always sits on the task pane
/// there.
#[derive(Clone, Copy, PartialEq)]
pub enum FocusArea {
    Sidebar,
    Main,
}
