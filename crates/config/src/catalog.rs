//! Built-in furniture catalog

use atelier_ipc::{FurnitureCategory, FurnitureTemplate};

/// Catalog used when no config file overrides it
pub fn default_categories() -> Vec<FurnitureCategory> {
    vec![FurnitureCategory {
        id: "desk".to_string(),
        name: "Desk".to_string(),
        items: vec![FurnitureTemplate {
            id: "desk-1".to_string(),
            name: "Desk".to_string(),
            model_path: "models/furniture/FEV0000005.glb".to_string(),
            thumbnail: "thumbnails/chair-office.jpg".to_string(),
            default_scale: [1.0, 1.0, 1.0],
            category: "desk".to_string(),
        }],
    }]
}
