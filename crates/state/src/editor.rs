//! Editor facade
//!
//! Bundles the scene store, furniture store, property panel, and drag
//! controller behind one entry point. Panels talk to it with
//! [`UiToEditor`] messages and receive [`EditorToUi`] notifications back;
//! the viewport drives drags and camera mirroring through direct methods.

use std::path::Path;

use atelier_config::EditorConfig;
use atelier_ipc::{
    CameraCommand, CameraUpdate, ConfirmAction, EditorCommand, EditorToUi, FurnitureCommand,
    SceneCommand, UiToEditor,
};
use tracing::{info, warn};

use crate::document::{DOCUMENT_VERSION, DocumentError, SavedItem, SceneDocument};
use crate::drag::{DragController, DragPlane, PointerSource, Ray};
use crate::furniture::FurnitureStore;
use crate::panel::{Axis, PropertyPanel};
use crate::scene::SceneStore;
use crate::view::ResetView;

/// A single property panel edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEdit {
    Position(Axis, f32),
    RotationDegrees(Axis, f32),
    Scale(Axis, f32),
    UniformScale(f32),
}

pub struct Editor {
    scene: SceneStore,
    furniture: FurnitureStore,
    panel: PropertyPanel,
    drag: DragController,
    view_reset: Option<Box<dyn ResetView>>,
    pending: Option<ConfirmAction>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            scene: SceneStore::new(config.room.clone(), config.camera),
            furniture: FurnitureStore::new(config.catalog.clone(), config.editor.clone()),
            panel: PropertyPanel::default(),
            drag: DragController::new(DragPlane::floor(0.0)),
            view_reset: None,
            pending: None,
        }
    }

    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    pub fn furniture(&self) -> &FurnitureStore {
        &self.furniture
    }

    pub fn panel(&self) -> &PropertyPanel {
        &self.panel
    }

    /// Id of the item currently being dragged
    pub fn dragging(&self) -> Option<&str> {
        self.drag.active()
    }

    /// Destructive action waiting for confirmation
    pub fn pending_confirmation(&self) -> Option<&ConfirmAction> {
        self.pending.as_ref()
    }

    /// Register the renderer's view reset capability
    pub fn register_view_reset(&mut self, reset: Box<dyn ResetView>) {
        self.view_reset = Some(reset);
    }

    pub fn reset_view(&mut self) {
        match self.view_reset.as_mut() {
            Some(reset) => reset.reset_view(),
            None => warn!("Reset view requested but no viewport is registered"),
        }
    }

    /// Apply a message from the panels and return the notifications it causes
    pub fn apply(&mut self, message: UiToEditor) -> Vec<EditorToUi> {
        let selected_before = self.panel.selected_id().map(str::to_string);
        let mut out = match message {
            UiToEditor::Furniture(command) => self.apply_furniture(command),
            UiToEditor::Editor(command) => self.apply_editor(command),
            UiToEditor::Scene(command) => self.apply_scene(command),
            UiToEditor::Camera(command) => self.apply_camera(command),
        };
        self.panel.sync(&self.furniture);
        if self.panel.selected_id() != selected_before.as_deref() {
            out.push(EditorToUi::SelectionChanged {
                selected_id: self.panel.selected_id().map(str::to_string),
            });
        }
        out
    }

    /// Run the pending destructive action
    pub fn confirm_pending(&mut self) -> Vec<EditorToUi> {
        let Some(action) = self.pending.take() else {
            return Vec::new();
        };
        let message = match action {
            ConfirmAction::RemoveFurniture { id } => {
                UiToEditor::Furniture(FurnitureCommand::Remove { id, confirmed: true })
            }
            ConfirmAction::ResetScene => UiToEditor::Scene(SceneCommand::Reset { confirmed: true }),
        };
        self.apply(message)
    }

    /// Drop the pending destructive action
    pub fn cancel_pending(&mut self) {
        if let Some(action) = self.pending.take() {
            info!("Cancelled: {}", action.prompt());
        }
    }

    fn request_confirmation(&mut self, action: ConfirmAction) -> Vec<EditorToUi> {
        let message = action.prompt().to_string();
        self.pending = Some(action.clone());
        vec![EditorToUi::ConfirmationRequired { action, message }]
    }

    fn items_changed(&self) -> EditorToUi {
        EditorToUi::ItemsChanged {
            items: self.furniture.items().to_vec(),
        }
    }

    fn apply_furniture(&mut self, command: FurnitureCommand) -> Vec<EditorToUi> {
        match command {
            FurnitureCommand::Add {
                template_id,
                position,
            } => {
                let Some(template) = self.furniture.template(&template_id).cloned() else {
                    return vec![EditorToUi::Error {
                        code: "unknown_template".to_string(),
                        message: format!("No furniture template '{template_id}'"),
                    }];
                };
                self.furniture.add(&template, position.unwrap_or([0.0; 3]));
                vec![self.items_changed()]
            }
            FurnitureCommand::Update { id, update } => {
                if self.furniture.update(&id, &update) {
                    vec![self.items_changed()]
                } else {
                    Vec::new()
                }
            }
            FurnitureCommand::Remove { id, confirmed } => {
                if self.furniture.get(&id).is_none() {
                    return Vec::new();
                }
                if !confirmed {
                    return self.request_confirmation(ConfirmAction::RemoveFurniture { id });
                }
                if self.drag.active() == Some(id.as_str()) {
                    self.drag.pointer_up(&mut self.furniture);
                }
                self.furniture.remove(&id);
                vec![self.items_changed()]
            }
            FurnitureCommand::Select { id } => {
                if self.drag.active().is_some() && self.drag.active() != id.as_deref() {
                    self.drag.pointer_up(&mut self.furniture);
                }
                self.furniture.select(id.as_deref());
                vec![self.items_changed()]
            }
            FurnitureCommand::Duplicate { id } => match self.furniture.duplicate(&id) {
                Some(_) => vec![self.items_changed()],
                None => Vec::new(),
            },
            FurnitureCommand::SetDragging { id, dragging } => {
                if self.furniture.set_dragging(&id, dragging) {
                    vec![self.items_changed()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn apply_editor(&mut self, command: EditorCommand) -> Vec<EditorToUi> {
        match command {
            EditorCommand::SetMode(mode) => self.furniture.set_mode(mode),
            EditorCommand::SetSelectedTool(tool) => self.furniture.set_selected_tool(tool),
            EditorCommand::ToggleGrid => self.furniture.toggle_grid(),
            EditorCommand::ToggleSnapToGrid => self.furniture.toggle_snap_to_grid(),
            EditorCommand::SetGridSize(size) => self.furniture.set_grid_size(size),
            EditorCommand::LoadCategories => self.furniture.load_categories(),
        }
        vec![EditorToUi::EditorChanged(self.furniture.editor().clone())]
    }

    fn apply_scene(&mut self, command: SceneCommand) -> Vec<EditorToUi> {
        match command {
            SceneCommand::UpdateRoom(update) => {
                self.scene.update_room(update);
                Vec::new()
            }
            SceneCommand::SetLoading(loading) => {
                self.scene.set_loading(loading);
                Vec::new()
            }
            SceneCommand::SetError(error) => {
                self.scene.set_error(error);
                Vec::new()
            }
            SceneCommand::Reset { confirmed } => {
                if !confirmed {
                    return self.request_confirmation(ConfirmAction::ResetScene);
                }
                self.drag.pointer_up(&mut self.furniture);
                self.furniture.reset();
                info!("Scene reset");
                vec![
                    self.items_changed(),
                    EditorToUi::EditorChanged(self.furniture.editor().clone()),
                ]
            }
            SceneCommand::Save { path } => match self.save(&path) {
                Ok(()) => vec![EditorToUi::DocumentSaved { path }],
                Err(err) => vec![document_error(err)],
            },
            SceneCommand::Load { path } => match self.load(&path) {
                Ok(()) => vec![
                    EditorToUi::DocumentLoaded { path },
                    self.items_changed(),
                    EditorToUi::EditorChanged(self.furniture.editor().clone()),
                    EditorToUi::CameraChanged(*self.scene.camera()),
                ],
                Err(err) => vec![document_error(err)],
            },
        }
    }

    fn apply_camera(&mut self, command: CameraCommand) -> Vec<EditorToUi> {
        match command {
            CameraCommand::Update(update) => {
                if self.scene.update_camera(update) {
                    vec![EditorToUi::CameraChanged(*self.scene.camera())]
                } else {
                    Vec::new()
                }
            }
            CameraCommand::ResetView => {
                self.reset_view();
                Vec::new()
            }
        }
    }

    /// Apply a property panel edit to the selected item
    pub fn panel_edit(&mut self, edit: PanelEdit) -> bool {
        let store = &mut self.furniture;
        let changed = match edit {
            PanelEdit::Position(axis, value) => self.panel.set_position(store, axis, value),
            PanelEdit::RotationDegrees(axis, degrees) => {
                self.panel.set_rotation_degrees(store, axis, degrees)
            }
            PanelEdit::Scale(axis, value) => self.panel.set_scale(store, axis, value),
            PanelEdit::UniformScale(value) => self.panel.set_uniform_scale(store, value),
        };
        self.panel.sync(&self.furniture);
        changed
    }

    /// Pointer pressed on furniture `id`
    pub fn pointer_down(&mut self, id: &str) -> bool {
        let started = self.drag.pointer_down(&mut self.furniture, id);
        self.panel.sync(&self.furniture);
        started
    }

    /// Pointer moved while possibly dragging; `ray` is the pointer ray in world space
    pub fn pointer_move(&mut self, ray: &Ray, source: PointerSource) -> bool {
        let moved = self.drag.pointer_move(&mut self.furniture, ray, source);
        if moved {
            self.panel.sync(&self.furniture);
        }
        moved
    }

    /// Pointer released anywhere
    pub fn pointer_up(&mut self) -> bool {
        self.drag.pointer_up(&mut self.furniture)
    }

    /// Mirror the live camera pose into the scene store
    pub fn mirror_camera(&mut self, position: [f32; 3], target: [f32; 3]) -> bool {
        self.scene.update_camera(CameraUpdate {
            position: Some(position),
            target: Some(target),
        })
    }

    /// Snapshot the current scene as a document
    pub fn document(&self) -> SceneDocument {
        SceneDocument {
            version: DOCUMENT_VERSION,
            room: self.scene.room().clone(),
            camera: *self.scene.camera(),
            editor: self.furniture.editor().clone(),
            items: self.furniture.items().iter().map(SavedItem::from).collect(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        self.document().save(path)?;
        info!(
            "Saved {} furniture items to {}",
            self.furniture.items().len(),
            path.display()
        );
        Ok(())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let document = SceneDocument::load(path)?;
        self.drag.pointer_up(&mut self.furniture);
        self.pending = None;
        self.scene.replace(document.room, document.camera);
        self.furniture.replace(
            document.items.into_iter().map(Into::into).collect(),
            document.editor,
        );
        self.panel.sync(&self.furniture);
        info!(
            "Loaded {} furniture items from {}",
            self.furniture.items().len(),
            path.display()
        );
        Ok(())
    }
}

fn document_error(err: DocumentError) -> EditorToUi {
    warn!("{}", err);
    EditorToUi::Error {
        code: "document".to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::CameraProjection;
    use crate::view::ResetRequest;
    use atelier_ipc::{FurnitureUpdate, Transform};
    use glam::{Vec2, Vec3};
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPS: f32 = 1e-3;

    fn add_desk(editor: &mut Editor, position: [f32; 3]) -> String {
        editor.apply(UiToEditor::Furniture(FurnitureCommand::Add {
            template_id: "desk-1".to_string(),
            position: Some(position),
        }));
        editor.furniture().items().last().unwrap().id.clone()
    }

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < EPS)
    }

    #[test]
    fn test_place_drag_rotate_duplicate_remove() {
        let mut editor = Editor::default();

        let id = add_desk(&mut editor, [0.0, 0.0, 0.0]);
        assert_eq!(editor.furniture().items().len(), 1);
        let item = editor.furniture().get(&id).unwrap();
        assert_eq!(item.transform.position, [0.0, 0.0, 0.0]);
        assert!(!item.is_selected);

        let out = editor.apply(UiToEditor::Furniture(FurnitureCommand::Select {
            id: Some(id.clone()),
        }));
        assert!(out.contains(&EditorToUi::SelectionChanged {
            selected_id: Some(id.clone())
        }));
        assert!(editor.furniture().get(&id).unwrap().is_selected);

        // Screen center of a camera aimed at (2, 0, -1) maps to that floor point
        let camera = CameraProjection::new(
            Vec3::new(8.0, 6.0, 8.0),
            Vec3::new(2.0, 0.0, -1.0),
            FRAC_PI_3,
            16.0 / 9.0,
        );
        assert!(editor.pointer_down(&id));
        assert!(editor.pointer_move(&camera.ray_through(Vec2::ZERO), PointerSource::Document));
        assert!(editor.pointer_up());
        let position = editor.furniture().get(&id).unwrap().transform.position;
        assert!(close(position, [2.0, 0.0, -1.0]), "{position:?}");

        assert!(editor.panel_edit(PanelEdit::RotationDegrees(Axis::Y, 90.0)));
        let rotation = editor.furniture().get(&id).unwrap().transform.rotation;
        assert!((rotation[1] - FRAC_PI_2).abs() < 1e-6);

        editor.apply(UiToEditor::Furniture(FurnitureCommand::Duplicate { id: id.clone() }));
        assert_eq!(editor.furniture().items().len(), 2);
        let copy = editor.furniture().items()[1].clone();
        assert!(close(copy.transform.position, [3.0, 0.0, 0.0]));

        let out = editor.apply(UiToEditor::Furniture(FurnitureCommand::Remove {
            id: id.clone(),
            confirmed: false,
        }));
        assert!(matches!(out[0], EditorToUi::ConfirmationRequired { .. }));
        assert_eq!(editor.furniture().items().len(), 2);

        editor.confirm_pending();
        assert_eq!(editor.furniture().items().len(), 1);
        assert_eq!(editor.furniture().items()[0].id, copy.id);
        assert!(editor.panel().selected_id().is_none());
    }

    #[test]
    fn test_default_drag_lands_on_exact_floor_point() {
        let mut editor = Editor::default();
        let id = add_desk(&mut editor, [0.0, 0.0, 0.0]);

        let camera = CameraProjection::new(
            Vec3::new(8.0, 6.0, 8.0),
            Vec3::new(1.3, 0.0, 0.7),
            FRAC_PI_3,
            16.0 / 9.0,
        );
        assert!(editor.pointer_down(&id));
        assert!(editor.pointer_move(&camera.ray_through(Vec2::ZERO), PointerSource::Object));
        let position = editor.furniture().get(&id).unwrap().transform.position;
        assert!(close(position, [1.3, 0.0, 0.7]), "{position:?}");
    }

    #[test]
    fn test_unknown_template_reports_error() {
        let mut editor = Editor::default();
        let out = editor.apply(UiToEditor::Furniture(FurnitureCommand::Add {
            template_id: "throne".to_string(),
            position: None,
        }));
        assert!(matches!(&out[0], EditorToUi::Error { code, .. } if code == "unknown_template"));
        assert!(editor.furniture().items().is_empty());
    }

    #[test]
    fn test_reset_waits_for_confirmation() {
        let mut editor = Editor::default();
        add_desk(&mut editor, [0.0; 3]);

        editor.apply(UiToEditor::Scene(SceneCommand::Reset { confirmed: false }));
        assert_eq!(editor.pending_confirmation(), Some(&ConfirmAction::ResetScene));
        editor.cancel_pending();
        assert!(editor.confirm_pending().is_empty());
        assert_eq!(editor.furniture().items().len(), 1);

        editor.apply(UiToEditor::Scene(SceneCommand::Reset { confirmed: false }));
        editor.confirm_pending();
        assert!(editor.furniture().items().is_empty());
    }

    #[test]
    fn test_unknown_ids_are_silent() {
        let mut editor = Editor::default();
        for command in [
            FurnitureCommand::Update {
                id: "ghost".to_string(),
                update: FurnitureUpdate::position([1.0; 3]),
            },
            FurnitureCommand::Remove {
                id: "ghost".to_string(),
                confirmed: true,
            },
            FurnitureCommand::Duplicate {
                id: "ghost".to_string(),
            },
            FurnitureCommand::SetDragging {
                id: "ghost".to_string(),
                dragging: true,
            },
        ] {
            assert!(editor.apply(UiToEditor::Furniture(command)).is_empty());
        }
    }

    #[test]
    fn test_reset_view_uses_registered_capability() {
        let mut editor = Editor::default();
        editor.reset_view();

        let request = ResetRequest::default();
        editor.register_view_reset(Box::new(request.clone()));
        editor.apply(UiToEditor::Camera(CameraCommand::ResetView));
        assert!(request.take());
    }

    #[test]
    fn test_camera_mirror_only_reports_changes() {
        let mut editor = Editor::default();
        assert!(!editor.mirror_camera([8.0, 6.0, 8.0], [0.0; 3]));
        assert!(editor.mirror_camera([7.0, 6.0, 8.0], [0.0; 3]));
        assert_eq!(editor.scene().camera().position, [7.0, 6.0, 8.0]);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let mut editor = Editor::default();
        let id = add_desk(&mut editor, [1.0, 0.0, 1.0]);
        editor.apply(UiToEditor::Furniture(FurnitureCommand::Select {
            id: Some(id.clone()),
        }));
        editor.panel_edit(PanelEdit::UniformScale(2.0));
        editor.apply(UiToEditor::Editor(EditorCommand::ToggleGrid));
        editor.save(&path).unwrap();

        let mut restored = Editor::default();
        let out = restored.apply(UiToEditor::Scene(SceneCommand::Load {
            path: path.display().to_string(),
        }));
        assert!(matches!(out[0], EditorToUi::DocumentLoaded { .. }));

        let item = restored.furniture().get(&id).unwrap();
        assert_eq!(item.transform.scale, [2.0, 2.0, 2.0]);
        assert!(!item.is_selected, "selection is not persisted");
        assert!(!restored.furniture().editor().show_grid);

        // New ids never collide with loaded ones
        let new_id = add_desk(&mut restored, [0.0; 3]);
        assert_ne!(new_id, id);
    }

    #[test]
    fn test_load_rejects_other_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.json");
        let mut document = Editor::default().document();
        document.version = 99;
        document.save(&path).unwrap();

        let mut editor = Editor::default();
        assert!(matches!(
            editor.load(&path),
            Err(DocumentError::Version { found: 99, .. })
        ));
        let out = editor.apply(UiToEditor::Scene(SceneCommand::Load {
            path: dir.path().join("missing.json").display().to_string(),
        }));
        assert!(matches!(&out[0], EditorToUi::Error { code, .. } if code == "document"));
    }

    fn saved_desk(id: &str) -> SavedItem {
        SavedItem {
            id: id.to_string(),
            template_id: "desk-1".to_string(),
            name: "Desk".to_string(),
            model_path: "models/desk.glb".to_string(),
            category: "desk".to_string(),
            transform: Transform::default(),
            thumbnail: None,
        }
    }

    fn load_items(items: Vec<SavedItem>) -> Editor {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let mut document = Editor::default().document();
        document.items = items;
        document.save(&path).unwrap();

        let mut editor = Editor::default();
        editor.load(&path).unwrap();
        editor
    }

    #[test]
    fn test_loaded_scale_is_clamped() {
        let mut saved = saved_desk("desk-1-1");
        saved.transform.scale = [0.0, 1.0, 1.0];
        let item: atelier_ipc::FurnitureItem = saved.into();
        assert!(item.transform.scale[0] > 0.0);
    }

    #[test]
    fn test_repeated_loaded_ids_are_renamed() {
        let mut editor = load_items(vec![saved_desk("desk-1-1"), saved_desk("desk-1-1")]);
        let ids: Vec<_> = editor.furniture().items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], "desk-1-1");
        assert_ne!(ids[0], ids[1]);

        // Each id now addresses exactly one item
        editor.apply(UiToEditor::Furniture(FurnitureCommand::Select {
            id: Some(ids[1].clone()),
        }));
        let selected: Vec<_> = editor.furniture().items().iter().filter(|i| i.is_selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, ids[1]);

        let new_id = add_desk(&mut editor, [0.0; 3]);
        assert!(!ids.contains(&new_id));
    }

    #[test]
    fn test_add_after_loading_largest_id() {
        let loaded = format!("desk-1-{}", u64::MAX);
        let mut editor = load_items(vec![saved_desk(&loaded), saved_desk("desk-1-1")]);

        let new_id = add_desk(&mut editor, [0.0; 3]);
        assert_ne!(new_id, loaded);
        assert_ne!(new_id, "desk-1-1");
        assert_eq!(editor.furniture().items().len(), 3);
    }
}
