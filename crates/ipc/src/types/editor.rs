//! Editor UI configuration types.

use serde::{Deserialize, Serialize};

/// Current interaction mode (informational for the panels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Select,
    Move,
    Rotate,
    Scale,
    Add,
}

/// Grid and tool settings for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub mode: EditorMode,
    pub selected_tool: Option<String>,
    pub show_grid: bool,
    /// Round dragged positions to the grid. Off unless the user turns it on.
    pub snap_to_grid: bool,
    /// Grid cell size in meters
    pub grid_size: f32,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            mode: EditorMode::Select,
            selected_tool: None,
            show_grid: true,
            snap_to_grid: false,
            grid_size: 0.5,
        }
    }
}
