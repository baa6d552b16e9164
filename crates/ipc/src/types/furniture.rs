//! Furniture catalog and placed-item types.

use serde::{Deserialize, Serialize};

use super::scene::Transform;

/// Catalog entry used to instantiate placeable furniture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureTemplate {
    pub id: String,
    pub name: String,
    pub model_path: String,
    pub thumbnail: String,
    pub default_scale: [f32; 3],
    pub category: String,
}

/// Group of templates shown together in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureCategory {
    pub id: String,
    pub name: String,
    pub items: Vec<FurnitureTemplate>,
}

/// A furniture instance placed in the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: String,
    /// Template this item was created from
    pub template_id: String,
    pub name: String,
    pub model_path: String,
    pub category: String,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub is_dragging: bool,
}

/// Partial item update merged by the furniture store.
///
/// `transform` replaces the whole transform; the per-component fields are
/// applied after it so callers can patch a single component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FurnitureUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default)]
    pub rotation: Option<[f32; 3]>,
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
}

impl FurnitureUpdate {
    pub fn position(position: [f32; 3]) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn rotation(rotation: [f32; 3]) -> Self {
        Self {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    pub fn scale(scale: [f32; 3]) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
