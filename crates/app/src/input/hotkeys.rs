//! Hotkey handling for Atelier
//!
//! - 1-9: Add the Nth catalog template at the origin
//! - Tab / Escape: Select the next item / clear the selection
//! - Delete or Backspace: Delete the selected item (asks first)
//! - Ctrl+D: Duplicate the selected item
//! - R / Shift+R: Rotate the selected item 15 degrees about Y
//! - + / -: Scale the selected item uniformly
//! - Arrow keys: Move the selected item one grid cell
//! - G / Shift+G: Toggle the grid / grid snapping
//! - [ / ]: Halve / double the grid size
//! - Q, W, E, T: Select, move, rotate, scale mode
//! - Home: Reset the view
//! - Ctrl+S / Ctrl+O: Save / load the scene document
//! - Ctrl+N: Clear the scene (asks first)
//! - Ctrl+R: Reload every furniture model from disk
//! - Y or Enter / N or Escape: Answer a pending confirmation
//!
//! Absolute values and the remaining axes are typed into the side panel's
//! fields.

use atelier_ipc::{
    CameraCommand, EditorCommand, EditorMode, FurnitureCommand, SceneCommand, UiToEditor,
};
use atelier_scene::{EditorResource, OutboundUiMessages, ReloadModels, UiCommand};
use atelier_state::{Axis, Editor, PanelEdit};
use bevy::prelude::*;

use crate::config::AppConfig;
use crate::panel::FieldEntry;

const ROTATE_STEP_DEGREES: f32 = 15.0;
const SCALE_STEP: f32 = 1.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn from_input(keys: &ButtonInput<KeyCode>) -> Self {
        Self {
            ctrl: keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight),
            shift: keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight),
        }
    }
}

/// What a key press does
#[derive(Debug, Clone, PartialEq)]
pub enum HotkeyAction {
    Command(UiToEditor),
    Panel(PanelEdit),
    Confirm,
    Cancel,
    ReloadModels,
}

fn digit_index(key: KeyCode) -> Option<usize> {
    let index = match key {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        KeyCode::Digit9 => 8,
        _ => return None,
    };
    Some(index)
}

/// Map a key press to an action given the current editor state
pub fn action_for(
    key: KeyCode,
    mods: Modifiers,
    editor: &Editor,
    config: &AppConfig,
) -> Option<HotkeyAction> {
    use HotkeyAction::{Cancel, Command, Confirm, Panel};

    if editor.pending_confirmation().is_some() {
        return match key {
            KeyCode::KeyY | KeyCode::Enter => Some(Confirm),
            KeyCode::KeyN | KeyCode::Escape => Some(Cancel),
            _ => None,
        };
    }

    let store = editor.furniture();
    let settings = store.editor();
    let selected_id = store.selected().map(|item| item.id.clone());
    let panel = editor.panel();
    let document = config.document_path.display().to_string();

    if mods.ctrl {
        return match key {
            KeyCode::KeyS => Some(Command(UiToEditor::Scene(SceneCommand::Save { path: document }))),
            KeyCode::KeyO => Some(Command(UiToEditor::Scene(SceneCommand::Load { path: document }))),
            KeyCode::KeyN => Some(Command(UiToEditor::Scene(SceneCommand::Reset {
                confirmed: false,
            }))),
            KeyCode::KeyR => Some(HotkeyAction::ReloadModels),
            KeyCode::KeyD => selected_id
                .map(|id| Command(UiToEditor::Furniture(FurnitureCommand::Duplicate { id }))),
            _ => None,
        };
    }

    if let Some(index) = digit_index(key) {
        let template = store
            .categories()
            .iter()
            .flat_map(|category| category.items.iter())
            .nth(index)?;
        return Some(Command(UiToEditor::Furniture(FurnitureCommand::Add {
            template_id: template.id.clone(),
            position: None,
        })));
    }

    let editor_command = |command| Some(Command(UiToEditor::Editor(command)));

    match key {
        KeyCode::Delete | KeyCode::Backspace => selected_id.map(|id| {
            Command(UiToEditor::Furniture(FurnitureCommand::Remove {
                id,
                confirmed: false,
            }))
        }),
        KeyCode::Escape => selected_id
            .map(|_| Command(UiToEditor::Furniture(FurnitureCommand::Select { id: None }))),
        KeyCode::Tab => {
            let items = store.items();
            if items.is_empty() {
                return None;
            }
            let next = match items.iter().position(|item| item.is_selected) {
                Some(current) => (current + 1) % items.len(),
                None => 0,
            };
            Some(Command(UiToEditor::Furniture(FurnitureCommand::Select {
                id: Some(items[next].id.clone()),
            })))
        }
        KeyCode::KeyG if mods.shift => editor_command(EditorCommand::ToggleSnapToGrid),
        KeyCode::KeyG => editor_command(EditorCommand::ToggleGrid),
        KeyCode::BracketLeft => editor_command(EditorCommand::SetGridSize(settings.grid_size / 2.0)),
        KeyCode::BracketRight => {
            editor_command(EditorCommand::SetGridSize(settings.grid_size * 2.0))
        }
        KeyCode::KeyQ => editor_command(EditorCommand::SetMode(EditorMode::Select)),
        KeyCode::KeyW => editor_command(EditorCommand::SetMode(EditorMode::Move)),
        KeyCode::KeyE => editor_command(EditorCommand::SetMode(EditorMode::Rotate)),
        KeyCode::KeyT => editor_command(EditorCommand::SetMode(EditorMode::Scale)),
        KeyCode::Home => Some(Command(UiToEditor::Camera(CameraCommand::ResetView))),
        _ => {
            // Panel edits need a selection
            selected_id.as_ref()?;
            let step = settings.grid_size;
            let position = panel.position();
            match key {
                KeyCode::KeyR => {
                    let delta = if mods.shift {
                        -ROTATE_STEP_DEGREES
                    } else {
                        ROTATE_STEP_DEGREES
                    };
                    let degrees = panel.rotation_degrees()[1] + delta;
                    Some(Panel(PanelEdit::RotationDegrees(Axis::Y, degrees)))
                }
                KeyCode::Equal | KeyCode::NumpadAdd => Some(Panel(PanelEdit::UniformScale(
                    panel.uniform_scale() * SCALE_STEP,
                ))),
                KeyCode::Minus | KeyCode::NumpadSubtract => Some(Panel(PanelEdit::UniformScale(
                    panel.uniform_scale() / SCALE_STEP,
                ))),
                KeyCode::ArrowLeft => Some(Panel(PanelEdit::Position(Axis::X, position[0] - step))),
                KeyCode::ArrowRight => Some(Panel(PanelEdit::Position(Axis::X, position[0] + step))),
                KeyCode::ArrowUp => Some(Panel(PanelEdit::Position(Axis::Z, position[2] - step))),
                KeyCode::ArrowDown => Some(Panel(PanelEdit::Position(Axis::Z, position[2] + step))),
                _ => None,
            }
        }
    }
}

/// Apply hotkeys pressed this frame. Keys go to the panel field instead
/// while one is being typed into.
pub fn handle_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    entry: Res<FieldEntry>,
    config: Res<AppConfig>,
    mut editor: ResMut<EditorResource>,
    mut commands: MessageWriter<UiCommand>,
    mut reloads: MessageWriter<ReloadModels>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    if entry.is_active() {
        return;
    }
    let mods = Modifiers::from_input(&keys);
    for key in keys.get_just_pressed() {
        let Some(action) = action_for(*key, mods, &editor.0, &config) else {
            continue;
        };
        match action {
            HotkeyAction::Command(message) => {
                commands.write(UiCommand(message));
            }
            HotkeyAction::Panel(edit) => {
                editor.panel_edit(edit);
            }
            HotkeyAction::Confirm => outbound.extend(editor.confirm_pending()),
            HotkeyAction::Cancel => editor.cancel_pending(),
            HotkeyAction::ReloadModels => {
                reloads.write(ReloadModels);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_ipc::EditorToUi;

    fn press(key: KeyCode, editor: &Editor) -> Option<HotkeyAction> {
        action_for(key, Modifiers::default(), editor, &AppConfig::default())
    }

    fn ctrl(key: KeyCode, editor: &Editor) -> Option<HotkeyAction> {
        let mods = Modifiers {
            ctrl: true,
            shift: false,
        };
        action_for(key, mods, editor, &AppConfig::default())
    }

    fn editor_with_selected_desk() -> (Editor, String) {
        let mut editor = Editor::default();
        let out = editor.apply(UiToEditor::Furniture(FurnitureCommand::Add {
            template_id: "desk-1".to_string(),
            position: None,
        }));
        let id = out
            .iter()
            .find_map(|msg| match msg {
                EditorToUi::ItemsChanged { items } => items.last().map(|item| item.id.clone()),
                _ => None,
            })
            .unwrap();
        editor.apply(UiToEditor::Furniture(FurnitureCommand::Select {
            id: Some(id.clone()),
        }));
        (editor, id)
    }

    #[test]
    fn test_digit_adds_template() {
        let editor = Editor::default();
        assert_eq!(
            press(KeyCode::Digit1, &editor),
            Some(HotkeyAction::Command(UiToEditor::Furniture(
                FurnitureCommand::Add {
                    template_id: "desk-1".to_string(),
                    position: None,
                }
            )))
        );
        assert_eq!(press(KeyCode::Digit9, &editor), None);
    }

    #[test]
    fn test_selection_keys_need_a_selection() {
        let editor = Editor::default();
        assert_eq!(press(KeyCode::Delete, &editor), None);
        assert_eq!(ctrl(KeyCode::KeyD, &editor), None);
        assert_eq!(press(KeyCode::KeyR, &editor), None);
    }

    #[test]
    fn test_delete_asks_for_confirmation() {
        let (mut editor, id) = editor_with_selected_desk();
        let Some(HotkeyAction::Command(message)) = press(KeyCode::Delete, &editor) else {
            panic!("delete should map to a command");
        };
        assert_eq!(
            message,
            UiToEditor::Furniture(FurnitureCommand::Remove {
                id: id.clone(),
                confirmed: false
            })
        );

        editor.apply(message);
        assert!(editor.pending_confirmation().is_some());
        assert_eq!(press(KeyCode::KeyY, &editor), Some(HotkeyAction::Confirm));
        assert_eq!(press(KeyCode::Escape, &editor), Some(HotkeyAction::Cancel));
        assert_eq!(press(KeyCode::KeyG, &editor), None);
    }

    #[test]
    fn test_rotate_and_scale_edit_panel() {
        let (editor, _) = editor_with_selected_desk();
        assert_eq!(
            press(KeyCode::KeyR, &editor),
            Some(HotkeyAction::Panel(PanelEdit::RotationDegrees(Axis::Y, 15.0)))
        );
        let Some(HotkeyAction::Panel(PanelEdit::UniformScale(scale))) =
            press(KeyCode::Equal, &editor)
        else {
            panic!("plus should scale");
        };
        assert!((scale - editor.panel().uniform_scale() * SCALE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_save_uses_document_path() {
        let editor = Editor::default();
        let config = AppConfig {
            document_path: "room.json".into(),
        };
        let mods = Modifiers {
            ctrl: true,
            shift: false,
        };
        assert_eq!(
            action_for(KeyCode::KeyS, mods, &editor, &config),
            Some(HotkeyAction::Command(UiToEditor::Scene(SceneCommand::Save {
                path: "room.json".to_string()
            })))
        );
    }

    #[test]
    fn test_ctrl_r_reloads_and_r_rotates() {
        let (editor, _) = editor_with_selected_desk();
        assert_eq!(ctrl(KeyCode::KeyR, &editor), Some(HotkeyAction::ReloadModels));
        assert!(matches!(
            press(KeyCode::KeyR, &editor),
            Some(HotkeyAction::Panel(PanelEdit::RotationDegrees(Axis::Y, _)))
        ));
    }

    #[test]
    fn test_tab_cycles_selection() {
        let (editor, id) = editor_with_selected_desk();
        assert_eq!(
            press(KeyCode::Tab, &editor),
            Some(HotkeyAction::Command(UiToEditor::Furniture(
                FurnitureCommand::Select { id: Some(id) }
            )))
        );
    }
}
