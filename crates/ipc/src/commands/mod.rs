//! Command types for IPC messages.

use crate::types::{CameraUpdate, EditorMode, FurnitureUpdate, RoomUpdate};
use serde::{Deserialize, Serialize};

/// Furniture manipulation commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FurnitureCommand {
    /// Place a new item from the catalog template with `template_id`
    Add {
        template_id: String,
        position: Option<[f32; 3]>,
    },
    Update { id: String, update: FurnitureUpdate },
    /// Remove an item; without `confirmed` the editor asks first
    Remove { id: String, confirmed: bool },
    Select { id: Option<String> },
    Duplicate { id: String },
    SetDragging { id: String, dragging: bool },
}

/// Editor settings commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorCommand {
    SetMode(EditorMode),
    SetSelectedTool(Option<String>),
    ToggleGrid,
    ToggleSnapToGrid,
    SetGridSize(f32),
    LoadCategories,
}

/// Scene-wide commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneCommand {
    UpdateRoom(RoomUpdate),
    SetLoading(bool),
    SetError(Option<String>),
    /// Clear all furniture and restore defaults; without `confirmed` the editor asks first
    Reset { confirmed: bool },
    Save { path: String },
    Load { path: String },
}

/// Camera control commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CameraCommand {
    Update(CameraUpdate),
    ResetView,
}

/// Destructive action waiting for user confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmAction {
    RemoveFurniture { id: String },
    ResetScene,
}

impl ConfirmAction {
    /// Prompt shown to the user before running the action
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::RemoveFurniture { .. } => "Delete this furniture item?",
            Self::ResetScene => "Delete all furniture?",
        }
    }
}
