//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Accent colors for the three status lanes, plus the shared
// highlight and warning tones.

/// Used for the Pending lane and its badges
pub const AMBER: Color = Color::Rgb(217, 119, 6);
/// Used for the In Progress lane and the status bar
pub const STEEL_BLUE: Color = Color::Rgb(37, 99, 235);
/// Used for the Completed lane
pub const MOSS_GREEN: Color = Color::Rgb(22, 163, 74);
/// Used for the focused pane, card, and form field
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for the delete confirmation dialog
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
