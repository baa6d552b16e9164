//! Numeric property fields
//!
//! Clicking a field row starts an entry seeded with the field's current
//! value. Typed characters edit it, Enter writes it to the selected item as
//! an absolute value, and Escape drops it.

use atelier_scene::EditorResource;
use atelier_state::{Axis, PanelEdit, PropertyPanel};
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

/// One editable number in the property section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelField {
    Position(Axis),
    Rotation(Axis),
    Scale(Axis),
    UniformScale,
}

impl PanelField {
    /// Every field, in display order
    pub fn all() -> Vec<PanelField> {
        let mut fields = Vec::with_capacity(10);
        fields.extend(Axis::ALL.map(PanelField::Position));
        fields.extend(Axis::ALL.map(PanelField::Rotation));
        fields.extend(Axis::ALL.map(PanelField::Scale));
        fields.push(PanelField::UniformScale);
        fields
    }

    pub fn label(self) -> String {
        let axis = |axis: Axis| match axis {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        match self {
            PanelField::Position(a) => format!("Position {}", axis(a)),
            PanelField::Rotation(a) => format!("Rotation {} (deg)", axis(a)),
            PanelField::Scale(a) => format!("Scale {}", axis(a)),
            PanelField::UniformScale => "Uniform scale".to_string(),
        }
    }

    /// Value the panel currently shows for this field
    pub fn current(self, panel: &PropertyPanel) -> f32 {
        let component = |values: [f32; 3], axis: Axis| match axis {
            Axis::X => values[0],
            Axis::Y => values[1],
            Axis::Z => values[2],
        };
        match self {
            PanelField::Position(a) => component(panel.position(), a),
            PanelField::Rotation(a) => component(panel.rotation_degrees(), a),
            PanelField::Scale(a) => component(panel.scale(), a),
            PanelField::UniformScale => panel.uniform_scale(),
        }
    }

    /// Edit that writes `value` to this field
    pub fn edit(self, value: f32) -> PanelEdit {
        match self {
            PanelField::Position(a) => PanelEdit::Position(a, value),
            PanelField::Rotation(a) => PanelEdit::RotationDegrees(a, value),
            PanelField::Scale(a) => PanelEdit::Scale(a, value),
            PanelField::UniformScale => PanelEdit::UniformScale(value),
        }
    }
}

/// Field being typed into, if any
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct FieldEntry {
    active: Option<(PanelField, String)>,
}

impl FieldEntry {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn field(&self) -> Option<PanelField> {
        self.active.as_ref().map(|(field, _)| *field)
    }

    pub fn buffer(&self) -> Option<&str> {
        self.active.as_ref().map(|(_, buffer)| buffer.as_str())
    }

    pub fn begin(&mut self, field: PanelField, current: f32) {
        let seeded = format!("{current:.2}");
        self.active = Some((field, seeded));
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Accept digits, one decimal point, and a leading minus sign
    pub fn push(&mut self, c: char) {
        let Some((_, buffer)) = self.active.as_mut() else {
            return;
        };
        let accepted = match c {
            '0'..='9' => true,
            '.' => !buffer.contains('.'),
            '-' => buffer.is_empty(),
            _ => false,
        };
        if accepted {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some((_, buffer)) = self.active.as_mut() {
            buffer.pop();
        }
    }

    /// End the entry and return the edit to apply, or `None` when the
    /// buffer is not a finite number.
    pub fn commit(&mut self) -> Option<PanelEdit> {
        let (field, buffer) = self.active.take()?;
        let value = buffer.parse::<f32>().ok().filter(|v| v.is_finite())?;
        Some(field.edit(value))
    }
}

/// What a key press does to an active entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKey {
    Text(String),
    Backspace,
    Commit,
    Cancel,
}

pub fn entry_key(key: &Key) -> Option<EntryKey> {
    match key {
        Key::Character(text) => Some(EntryKey::Text(text.to_string())),
        Key::Backspace => Some(EntryKey::Backspace),
        Key::Enter => Some(EntryKey::Commit),
        Key::Escape => Some(EntryKey::Cancel),
        _ => None,
    }
}

/// Row button that starts an entry for its field
#[derive(Component, Debug, Clone, Copy)]
pub struct FieldButton(pub PanelField);

/// Text showing a field's label and value
#[derive(Component, Debug, Clone, Copy)]
pub struct FieldText(pub PanelField);

pub fn start_field_entry(
    buttons: Query<(&Interaction, &FieldButton), Changed<Interaction>>,
    editor: Res<EditorResource>,
    mut entry: ResMut<FieldEntry>,
) {
    for (interaction, FieldButton(field)) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let panel = editor.panel();
        if panel.selected_id().is_none() {
            continue;
        }
        entry.begin(*field, field.current(panel));
        debug!("Editing {}", field.label());
    }
}

pub fn type_into_field(
    mut keys: MessageReader<KeyboardInput>,
    mut entry: ResMut<FieldEntry>,
    mut editor: ResMut<EditorResource>,
) {
    if !entry.is_active() {
        keys.clear();
        return;
    }
    if editor.panel().selected_id().is_none() {
        entry.cancel();
        keys.clear();
        return;
    }

    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        match entry_key(&event.logical_key) {
            Some(EntryKey::Text(text)) => text.chars().for_each(|c| entry.push(c)),
            Some(EntryKey::Backspace) => entry.backspace(),
            Some(EntryKey::Commit) => {
                if let Some(edit) = entry.commit() {
                    editor.panel_edit(edit);
                } else {
                    warn!("Ignoring field value that is not a number");
                }
            }
            Some(EntryKey::Cancel) => entry.cancel(),
            None => {}
        }
    }
}

/// Label and value line for one field row
pub fn field_line(field: PanelField, panel: &PropertyPanel, entry: &FieldEntry) -> String {
    if entry.field() == Some(field) {
        let buffer = entry.buffer().unwrap_or_default();
        return format!("{}: {}_", field.label(), buffer);
    }
    if panel.selected_id().is_none() {
        return format!("{}: -", field.label());
    }
    format!("{}: {:.2}", field.label(), field.current(panel))
}

pub fn refresh_field_text(
    editor: Res<EditorResource>,
    entry: Res<FieldEntry>,
    mut texts: Query<(&FieldText, &mut Text)>,
) {
    if !editor.is_changed() && !entry.is_changed() {
        return;
    }
    for (FieldText(field), mut text) in texts.iter_mut() {
        let line = field_line(*field, editor.panel(), &entry);
        if text.0 != line {
            text.0 = line;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_ipc::{FurnitureCommand, UiToEditor};
    use atelier_state::Editor;

    fn editor_with_selected_desk() -> Editor {
        let mut editor = Editor::default();
        editor.apply(UiToEditor::Furniture(FurnitureCommand::Add {
            template_id: "desk-1".to_string(),
            position: Some([1.0, 0.0, 2.0]),
        }));
        let id = editor.furniture().items()[0].id.clone();
        editor.apply(UiToEditor::Furniture(FurnitureCommand::Select { id: Some(id) }));
        editor
    }

    fn type_value(field: PanelField, text: &str) -> Option<PanelEdit> {
        let mut entry = FieldEntry::default();
        entry.begin(field, 0.0);
        for _ in 0..4 {
            entry.backspace();
        }
        text.chars().for_each(|c| entry.push(c));
        entry.commit()
    }

    #[test]
    fn test_every_panel_edit_is_reachable() {
        assert_eq!(
            type_value(PanelField::Position(Axis::Y), "0.75"),
            Some(PanelEdit::Position(Axis::Y, 0.75))
        );
        assert_eq!(
            type_value(PanelField::Rotation(Axis::X), "-90"),
            Some(PanelEdit::RotationDegrees(Axis::X, -90.0))
        );
        assert_eq!(
            type_value(PanelField::Rotation(Axis::Z), "45"),
            Some(PanelEdit::RotationDegrees(Axis::Z, 45.0))
        );
        assert_eq!(
            type_value(PanelField::Scale(Axis::Z), "2.5"),
            Some(PanelEdit::Scale(Axis::Z, 2.5))
        );
        assert_eq!(
            type_value(PanelField::UniformScale, "3"),
            Some(PanelEdit::UniformScale(3.0))
        );
        assert_eq!(PanelField::all().len(), 10);
    }

    #[test]
    fn test_entry_filters_characters() {
        let mut entry = FieldEntry::default();
        entry.begin(PanelField::Position(Axis::X), 0.0);
        while entry.buffer() != Some("") {
            entry.backspace();
        }
        "-1a.5.2-".chars().for_each(|c| entry.push(c));
        assert_eq!(entry.buffer(), Some("-1.52"));
    }

    #[test]
    fn test_invalid_entry_commits_nothing() {
        assert_eq!(type_value(PanelField::Scale(Axis::X), "-"), None);
        assert_eq!(type_value(PanelField::Scale(Axis::X), ""), None);

        let mut entry = FieldEntry::default();
        entry.begin(PanelField::UniformScale, 1.0);
        entry.cancel();
        assert!(!entry.is_active());
        assert_eq!(entry.commit(), None);
    }

    #[test]
    fn test_entry_seeds_current_value() {
        let editor = editor_with_selected_desk();
        let field = PanelField::Position(Axis::Z);
        let mut entry = FieldEntry::default();
        entry.begin(field, field.current(editor.panel()));
        assert_eq!(entry.buffer(), Some("2.00"));
        assert_eq!(entry.commit(), Some(PanelEdit::Position(Axis::Z, 2.0)));
    }

    #[test]
    fn test_committed_rotation_reaches_store() {
        let mut editor = editor_with_selected_desk();
        let edit = type_value(PanelField::Rotation(Axis::X), "90").unwrap();
        assert!(editor.panel_edit(edit));
        let rotation = editor.furniture().items()[0].transform.rotation;
        assert!((rotation[0] - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((PanelField::Rotation(Axis::X).current(editor.panel()) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_field_line_shows_entry_and_value() {
        let editor = editor_with_selected_desk();
        let mut entry = FieldEntry::default();
        let field = PanelField::Position(Axis::X);
        assert_eq!(field_line(field, editor.panel(), &entry), "Position X: 1.00");

        entry.begin(field, 1.0);
        entry.push('5');
        assert_eq!(field_line(field, editor.panel(), &entry), "Position X: 1.005_");

        let empty = Editor::default();
        assert_eq!(
            field_line(PanelField::UniformScale, empty.panel(), &FieldEntry::default()),
            "Uniform scale: -"
        );
    }

    #[test]
    fn test_entry_keys() {
        assert_eq!(entry_key(&Key::Enter), Some(EntryKey::Commit));
        assert_eq!(entry_key(&Key::Escape), Some(EntryKey::Cancel));
        assert_eq!(entry_key(&Key::Backspace), Some(EntryKey::Backspace));
        assert_eq!(entry_key(&Key::Tab), None);
    }
}
