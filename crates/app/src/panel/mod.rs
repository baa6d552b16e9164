//! Side panel
//!
//! Docked to the right of the viewport. The top block shows the editor
//! settings, any pending confirmation, and the outcome of the last document
//! operation. Below it sit the selected item's numeric fields and the
//! furniture catalog.

use atelier_ipc::{EditorMode, EditorToUi};
use atelier_scene::{EditorResource, OutboundUiMessages};
use atelier_state::Editor;
use bevy::prelude::*;

mod catalog;
mod fields;

pub use catalog::{CatalogRow, catalog_rows};
pub use fields::{FieldEntry, PanelField};

use catalog::CatalogButton;
use fields::{FieldButton, FieldText};

const PANEL_WIDTH: f32 = 320.0;
const BUTTON_IDLE: Color = Color::srgb(0.9, 0.9, 0.9);
const BUTTON_HOVERED: Color = Color::srgb(0.82, 0.86, 0.95);
const TEXT_COLOR: Color = Color::srgb(0.15, 0.15, 0.15);

const KEY_HELP: &str = "\
Click a field, type a value, Enter to apply
1-9 add | Tab next | Esc deselect
Del delete | Ctrl+D duplicate
R/Shift+R rotate | +/- scale | arrows move
Q/W/E/T mode | G grid | Shift+G snap | [ ] size
Home reset view | Ctrl+S save | Ctrl+O load | Ctrl+N clear
Ctrl+R reload models";

/// Outcome of the last notification worth showing
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PanelStatus {
    pub last_message: Option<String>,
}

#[derive(Component)]
struct SidePanelText;

pub struct SidePanelPlugin;

impl Plugin for SidePanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PanelStatus>()
            .init_resource::<FieldEntry>()
            .add_systems(Startup, spawn_side_panel)
            .add_systems(
                Update,
                (
                    fields::start_field_entry,
                    fields::type_into_field,
                    catalog::place_from_catalog,
                    highlight_buttons,
                ),
            )
            .add_systems(
                PostUpdate,
                (
                    drain_notifications,
                    refresh_panel_text,
                    fields::refresh_field_text,
                )
                    .chain(),
            );
    }
}

fn heading(text: &str) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(TEXT_COLOR),
        Node {
            margin: UiRect::top(Val::Px(10.0)),
            ..default()
        },
    )
}

fn row_button() -> impl Bundle {
    (
        Button,
        Node {
            padding: UiRect::axes(Val::Px(8.0), Val::Px(3.0)),
            ..default()
        },
        BackgroundColor(BUTTON_IDLE),
    )
}

fn row_text(text: String) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(TEXT_COLOR),
    )
}

fn spawn_side_panel(mut commands: Commands, editor: Res<EditorResource>) {
    let rows = catalog_rows(editor.furniture().categories());
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Px(PANEL_WIDTH),
                height: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(12.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                overflow: Overflow::scroll_y(),
                border: UiRect::left(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.92)),
            BorderColor::all(Color::srgb(0.8, 0.8, 0.8)),
            // Lets the camera tell presses on the panel from presses on the viewport
            Interaction::default(),
            Name::new("Side panel"),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(String::new()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                SidePanelText,
            ));

            panel.spawn(heading("Properties"));
            for field in PanelField::all() {
                panel
                    .spawn((row_button(), FieldButton(field)))
                    .with_children(|button| {
                        button.spawn((row_text(field.label()), FieldText(field)));
                    });
            }

            panel.spawn(heading("Catalog"));
            for row in rows {
                match row {
                    CatalogRow::Category(name) => {
                        panel.spawn(row_text(name));
                    }
                    CatalogRow::Template { id, name } => {
                        panel
                            .spawn((row_button(), CatalogButton { template_id: id }))
                            .with_children(|button| {
                                button.spawn(row_text(format!("+ {name}")));
                            });
                    }
                }
            }
        });
}

fn highlight_buttons(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut background) in buttons.iter_mut() {
        background.0 = match interaction {
            Interaction::Pressed | Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        };
    }
}

/// Log outbound notifications and keep the ones the panel reports
fn drain_notifications(mut outbound: ResMut<OutboundUiMessages>, mut status: ResMut<PanelStatus>) {
    for msg in outbound.drain() {
        match msg.to_json() {
            Ok(json) => debug!("Editor -> panel: {}", json),
            Err(e) => warn!("Could not serialize panel notification: {}", e),
        }
        let line = match msg {
            EditorToUi::DocumentSaved { path } => format!("Saved {path}"),
            EditorToUi::DocumentLoaded { path } => format!("Loaded {path}"),
            EditorToUi::Error { message, .. } => format!("Error: {message}"),
            _ => continue,
        };
        status.last_message = Some(line);
    }
}

fn refresh_panel_text(
    editor: Res<EditorResource>,
    status: Res<PanelStatus>,
    mut texts: Query<&mut Text, With<SidePanelText>>,
) {
    if !editor.is_changed() && !status.is_changed() {
        return;
    }
    let content = panel_text(&editor.0, &status);
    for mut text in texts.iter_mut() {
        text.0.clone_from(&content);
    }
}

fn mode_label(mode: EditorMode) -> &'static str {
    match mode {
        EditorMode::Select => "Select",
        EditorMode::Move => "Move",
        EditorMode::Rotate => "Rotate",
        EditorMode::Scale => "Scale",
        EditorMode::Add => "Add",
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

/// Full panel text for the current editor state
pub fn panel_text(editor: &Editor, status: &PanelStatus) -> String {
    let store = editor.furniture();
    let settings = store.editor();
    let room = editor.scene().room();
    let mut lines = vec![
        format!("Room: {}", room.name),
        format!(
            "Mode: {} | Grid: {} ({:.2} m) | Snap: {}",
            mode_label(settings.mode),
            on_off(settings.show_grid),
            settings.grid_size,
            on_off(settings.snap_to_grid)
        ),
        format!("Items: {}", store.items().len()),
        String::new(),
    ];

    let panel = editor.panel();
    if panel.selected_id().is_some() {
        lines.push(format!("Selected: {}", panel.name()));
    } else {
        lines.push("Nothing selected".to_string());
    }

    if let Some(action) = editor.pending_confirmation() {
        lines.push(String::new());
        lines.push(format!("{} [Y/N]", action.prompt()));
    }
    if editor.scene().is_loading() {
        lines.push("Loading models...".to_string());
    }
    if let Some(error) = editor.scene().error() {
        lines.push(format!("Scene error: {error}"));
    }
    if let Some(message) = &status.last_message {
        lines.push(String::new());
        lines.push(message.clone());
    }

    lines.push(String::new());
    lines.push(KEY_HELP.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_ipc::{FurnitureCommand, SceneCommand, UiToEditor};

    fn add_desk(editor: &mut Editor) {
        editor.apply(UiToEditor::Furniture(FurnitureCommand::Add {
            template_id: "desk-1".to_string(),
            position: Some([1.0, 0.0, 2.0]),
        }));
    }

    #[test]
    fn test_empty_scene_text() {
        let editor = Editor::default();
        let text = panel_text(&editor, &PanelStatus::default());
        assert!(text.contains("Items: 0"));
        assert!(text.contains("Nothing selected"));
        assert!(!text.contains("[Y/N]"));
    }

    #[test]
    fn test_selected_item_is_named() {
        let mut editor = Editor::default();
        add_desk(&mut editor);
        let id = editor.furniture().items()[0].id.clone();
        editor.apply(UiToEditor::Furniture(FurnitureCommand::Select { id: Some(id) }));

        let text = panel_text(&editor, &PanelStatus::default());
        assert!(text.contains("Selected: Desk"));
        assert!(!text.contains("Nothing selected"));
    }

    #[test]
    fn test_pending_confirmation_is_prompted() {
        let mut editor = Editor::default();
        add_desk(&mut editor);
        editor.apply(UiToEditor::Scene(SceneCommand::Reset { confirmed: false }));

        let text = panel_text(&editor, &PanelStatus::default());
        assert!(text.contains("Delete all furniture? [Y/N]"));
    }

    #[test]
    fn test_loading_and_error_are_shown() {
        let mut editor = Editor::default();
        editor.apply(UiToEditor::Scene(SceneCommand::SetLoading(true)));
        let text = panel_text(&editor, &PanelStatus::default());
        assert!(text.contains("Loading models..."));

        editor.apply(UiToEditor::Scene(SceneCommand::SetLoading(false)));
        editor.apply(UiToEditor::Scene(SceneCommand::SetError(Some(
            "missing.glb".to_string(),
        ))));
        let text = panel_text(&editor, &PanelStatus::default());
        assert!(!text.contains("Loading models..."));
        assert!(text.contains("Scene error: missing.glb"));
    }

    #[test]
    fn test_status_line_is_shown() {
        let status = PanelStatus {
            last_message: Some("Saved scene.atelier.json".to_string()),
        };
        let text = panel_text(&Editor::default(), &status);
        assert!(text.contains("Saved scene.atelier.json"));
    }
}
