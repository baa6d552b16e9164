//! Scene documents
//!
//! A saved scene is pretty-printed JSON holding the room, camera pose,
//! editor settings, and placed furniture. Selection and drag flags are
//! session state and are never written.

use std::path::{Path, PathBuf};

use atelier_ipc::{CameraState, EditorState, FurnitureItem, Room, Transform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version written by this build
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to access scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed scene file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported scene file version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// Placed item as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: String,
    pub template_id: String,
    pub name: String,
    pub model_path: String,
    pub category: String,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl From<&FurnitureItem> for SavedItem {
    fn from(item: &FurnitureItem) -> Self {
        Self {
            id: item.id.clone(),
            template_id: item.template_id.clone(),
            name: item.name.clone(),
            model_path: item.model_path.clone(),
            category: item.category.clone(),
            transform: item.transform,
            thumbnail: item.thumbnail.clone(),
        }
    }
}

impl From<SavedItem> for FurnitureItem {
    fn from(saved: SavedItem) -> Self {
        Self {
            id: saved.id,
            template_id: saved.template_id,
            name: saved.name,
            model_path: saved.model_path,
            category: saved.category,
            transform: saved.transform.with_clamped_scale(),
            thumbnail: saved.thumbnail,
            is_selected: false,
            is_dragging: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub version: u32,
    pub room: Room,
    pub camera: CameraState,
    pub editor: EditorState,
    pub items: Vec<SavedItem>,
}

impl SceneDocument {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| DocumentError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Self = serde_json::from_str(&text).map_err(|source| DocumentError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        if document.version != DOCUMENT_VERSION {
            return Err(DocumentError::Version {
                found: document.version,
                expected: DOCUMENT_VERSION,
            });
        }
        Ok(document)
    }
}
