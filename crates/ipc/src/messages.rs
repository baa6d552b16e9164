//! Main IPC message enums for communication between the viewport and panels.

use serde::{Deserialize, Serialize};

use crate::IpcError;
use crate::commands::{CameraCommand, ConfirmAction, EditorCommand, FurnitureCommand, SceneCommand};
use crate::types::{CameraState, EditorState, FurnitureItem};

/// Messages from the panels (or hotkeys) to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToEditor {
    Furniture(FurnitureCommand),
    Editor(EditorCommand),
    Scene(SceneCommand),
    Camera(CameraCommand),
}

/// Messages from the editor to the panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EditorToUi {
    /// Furniture list changed (add, remove, transform edit, load)
    ItemsChanged { items: Vec<FurnitureItem> },

    /// Selection moved to another item, or cleared
    SelectionChanged { selected_id: Option<String> },

    /// Grid, snap, mode, or tool settings changed
    EditorChanged(EditorState),

    /// Camera pose changed in the store
    CameraChanged(CameraState),

    /// A destructive action needs the user to confirm it
    ConfirmationRequired { action: ConfirmAction, message: String },

    /// Scene document written or read
    DocumentSaved { path: String },
    DocumentLoaded { path: String },

    /// Error notification
    Error { code: String, message: String },
}

impl UiToEditor {
    /// Parse a message received as JSON text
    pub fn from_json(text: &str) -> Result<Self, IpcError> {
        if text.trim().is_empty() {
            return Err(IpcError::InvalidFormat("empty message".to_string()));
        }
        Ok(serde_json::from_str(text)?)
    }
}

impl EditorToUi {
    /// Serialize for delivery to a panel
    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}
