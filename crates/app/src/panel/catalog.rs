//! Catalog section: templates grouped by category, click to place

use atelier_ipc::{FurnitureCategory, FurnitureCommand, UiToEditor};
use atelier_scene::UiCommand;
use bevy::prelude::*;

/// Button that places its template at the origin
#[derive(Component, Debug, Clone)]
pub struct CatalogButton {
    pub template_id: String,
}

/// Rows the catalog section shows: a heading per category, then its templates
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRow {
    Category(String),
    Template { id: String, name: String },
}

pub fn catalog_rows(categories: &[FurnitureCategory]) -> Vec<CatalogRow> {
    let mut rows = Vec::new();
    for category in categories.iter().filter(|c| !c.items.is_empty()) {
        rows.push(CatalogRow::Category(category.name.clone()));
        rows.extend(category.items.iter().map(|template| CatalogRow::Template {
            id: template.id.clone(),
            name: template.name.clone(),
        }));
    }
    rows
}

pub fn place_from_catalog(
    buttons: Query<(&Interaction, &CatalogButton), Changed<Interaction>>,
    mut commands: MessageWriter<UiCommand>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        info!("Placing {} from the catalog", button.template_id);
        commands.write(UiCommand(UiToEditor::Furniture(FurnitureCommand::Add {
            template_id: button.template_id.clone(),
            position: None,
        })));
    }
}
