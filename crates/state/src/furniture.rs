//! Furniture store
//!
//! Owns the placed furniture items, the template catalog, and the editor
//! settings. It is the single source of truth for selection: exactly the
//! item flagged `is_selected` is selected, and no other state records it.

use atelier_ipc::{
    EditorMode, EditorState, FurnitureCategory, FurnitureItem, FurnitureTemplate,
    FurnitureUpdate, Transform, clamp_scale,
};
use tracing::{debug, info, warn};

use crate::ids::IdGenerator;

/// Offset applied to a duplicate relative to its source
pub const DUPLICATE_OFFSET: [f32; 3] = [1.0, 0.0, 1.0];

#[derive(Debug, Clone)]
pub struct FurnitureStore {
    items: Vec<FurnitureItem>,
    categories: Vec<FurnitureCategory>,
    editor: EditorState,
    default_categories: Vec<FurnitureCategory>,
    default_editor: EditorState,
    ids: IdGenerator,
}

impl Default for FurnitureStore {
    fn default() -> Self {
        Self::new(atelier_config::default_categories(), EditorState::default())
    }
}

impl FurnitureStore {
    /// Create an empty store with the given catalog and editor settings as defaults
    pub fn new(categories: Vec<FurnitureCategory>, editor: EditorState) -> Self {
        Self {
            items: Vec::new(),
            categories: categories.clone(),
            editor: editor.clone(),
            default_categories: categories,
            default_editor: editor,
            ids: IdGenerator::default(),
        }
    }

    pub fn items(&self) -> &[FurnitureItem] {
        &self.items
    }

    pub fn categories(&self) -> &[FurnitureCategory] {
        &self.categories
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn get(&self, id: &str) -> Option<&FurnitureItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut FurnitureItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Next generated id not held by any current item
    fn fresh_id(&mut self, template_id: &str) -> String {
        loop {
            let id = self.ids.next(template_id);
            if self.get(&id).is_none() {
                return id;
            }
            debug!("Skipping id {} already in use", id);
        }
    }

    /// The currently selected item, if any
    pub fn selected(&self) -> Option<&FurnitureItem> {
        self.items.iter().find(|item| item.is_selected)
    }

    /// Whether any item is being dragged (camera controls stay off meanwhile)
    pub fn any_dragging(&self) -> bool {
        self.items.iter().any(|item| item.is_dragging)
    }

    /// Look up a catalog template by id
    pub fn template(&self, template_id: &str) -> Option<&FurnitureTemplate> {
        self.categories
            .iter()
            .flat_map(|category| category.items.iter())
            .find(|template| template.id == template_id)
    }

    /// Place a new item built from `template` at `position`.
    ///
    /// Returns the new item's id. The item starts unselected with zero rotation
    /// and the template's default scale.
    pub fn add(&mut self, template: &FurnitureTemplate, position: [f32; 3]) -> String {
        let id = self.fresh_id(&template.id);
        let thumbnail = (!template.thumbnail.is_empty()).then(|| template.thumbnail.clone());
        self.items.push(FurnitureItem {
            id: id.clone(),
            template_id: template.id.clone(),
            name: template.name.clone(),
            model_path: template.model_path.clone(),
            category: template.category.clone(),
            transform: Transform::from_position_scale(position, template.default_scale),
            thumbnail,
            is_selected: false,
            is_dragging: false,
        });
        info!("Added furniture '{}' (id: {}) at {:?}", template.name, id, position);
        id
    }

    /// Merge `update` into the item with `id`. Unknown ids are ignored.
    ///
    /// Returns whether an item was found.
    pub fn update(&mut self, id: &str, update: &FurnitureUpdate) -> bool {
        let Some(item) = self.get_mut(id) else {
            debug!("Ignoring update for unknown furniture {}", id);
            return false;
        };

        if let Some(name) = &update.name {
            item.name = name.clone();
        }
        if let Some(model_path) = &update.model_path {
            item.model_path = model_path.clone();
        }
        if let Some(category) = &update.category {
            item.category = category.clone();
        }
        if let Some(thumbnail) = &update.thumbnail {
            item.thumbnail = Some(thumbnail.clone());
        }
        if let Some(transform) = update.transform {
            item.transform = transform;
        }
        if let Some(position) = update.position {
            item.transform.position = position;
        }
        if let Some(rotation) = update.rotation {
            item.transform.rotation = rotation;
        }
        if let Some(scale) = update.scale {
            item.transform.scale = scale;
        }
        item.transform.scale = clamp_scale(item.transform.scale);
        true
    }

    /// Delete the item with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            info!("Removed furniture {}", id);
        } else {
            debug!("Ignoring remove for unknown furniture {}", id);
        }
        removed
    }

    /// Select the item with `id` and deselect every other item; `None` deselects all.
    ///
    /// Deselected items also stop dragging so that no item is dragging
    /// without being selected.
    pub fn select(&mut self, id: Option<&str>) {
        for item in &mut self.items {
            item.is_selected = Some(item.id.as_str()) == id;
            if !item.is_selected {
                item.is_dragging = false;
            }
        }
        debug!("Selection set to {:?}", id);
    }

    /// Copy the item with `id` into a new item offset by [`DUPLICATE_OFFSET`].
    ///
    /// The source item is left untouched. Returns the new id, or `None` when
    /// `id` is unknown.
    pub fn duplicate(&mut self, id: &str) -> Option<String> {
        let Some(source) = self.get(id) else {
            debug!("Ignoring duplicate for unknown furniture {}", id);
            return None;
        };

        let template = FurnitureTemplate {
            id: source.template_id.clone(),
            name: source.name.clone(),
            model_path: source.model_path.clone(),
            thumbnail: source.thumbnail.clone().unwrap_or_default(),
            default_scale: source.transform.scale,
            category: source.category.clone(),
        };
        let [x, y, z] = source.transform.position;
        let position = [
            x + DUPLICATE_OFFSET[0],
            y + DUPLICATE_OFFSET[1],
            z + DUPLICATE_OFFSET[2],
        ];
        Some(self.add(&template, position))
    }

    /// Set the dragging flag of the item with `id`.
    ///
    /// Starting a drag on an item that is not selected is refused; clearing
    /// the flag is always allowed.
    pub fn set_dragging(&mut self, id: &str, dragging: bool) -> bool {
        let Some(item) = self.get_mut(id) else {
            debug!("Ignoring set_dragging for unknown furniture {}", id);
            return false;
        };
        if dragging && !item.is_selected {
            warn!("Refusing to drag unselected furniture {}", id);
            return false;
        }
        item.is_dragging = dragging;
        true
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.editor.mode = mode;
    }

    pub fn set_selected_tool(&mut self, tool: Option<String>) {
        self.editor.selected_tool = tool;
    }

    pub fn toggle_grid(&mut self) {
        self.editor.show_grid = !self.editor.show_grid;
    }

    pub fn toggle_snap_to_grid(&mut self) {
        self.editor.snap_to_grid = !self.editor.snap_to_grid;
    }

    /// Set the grid cell size; non-positive sizes are ignored
    pub fn set_grid_size(&mut self, size: f32) {
        if size > 0.0 && size.is_finite() {
            self.editor.grid_size = size;
        } else {
            warn!("Ignoring invalid grid size {}", size);
        }
    }

    /// Restore the template catalog from configuration
    pub fn load_categories(&mut self) {
        self.categories = self.default_categories.clone();
    }

    /// Clear all items and restore the default catalog and editor settings
    pub fn reset(&mut self) {
        self.items.clear();
        self.categories = self.default_categories.clone();
        self.editor = self.default_editor.clone();
        info!("Furniture store reset");
    }

    /// Replace the items and editor state wholesale (scene document load).
    ///
    /// Transient flags are cleared and ids are registered with the generator.
    /// An item repeating an earlier item's id gets a fresh id.
    pub(crate) fn replace(&mut self, items: Vec<FurnitureItem>, editor: EditorState) {
        for item in &items {
            self.ids.observe(&item.id);
        }
        self.items = Vec::with_capacity(items.len());
        for mut item in items {
            if self.get(&item.id).is_some() {
                let id = self.fresh_id(&item.template_id);
                warn!("Loaded furniture id {} is repeated, renamed to {}", item.id, id);
                item.id = id;
            }
            item.is_selected = false;
            item.is_dragging = false;
            item.transform = item.transform.with_clamped_scale();
            self.items.push(item);
        }
        self.editor = editor;
    }

    /// Mutable access for the drag routine, which writes positions directly
    pub(crate) fn dragging_item_mut(&mut self, id: &str) -> Option<&mut FurnitureItem> {
        self.get_mut(id).filter(|item| item.is_dragging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn desk() -> FurnitureTemplate {
        FurnitureStore::default().template("desk-1").unwrap().clone()
    }

    fn assert_invariants(store: &FurnitureStore) {
        let selected = store.items().iter().filter(|i| i.is_selected).count();
        assert!(selected <= 1, "{selected} items selected");
        for item in store.items() {
            assert!(!item.is_dragging || item.is_selected, "{} drags unselected", item.id);
            assert!(item.transform.scale.iter().all(|s| *s > 0.0));
        }
        let ids: HashSet<_> = store.items().iter().map(|i| &i.id).collect();
        assert_eq!(ids.len(), store.items().len(), "duplicate ids");
    }

    #[test]
    fn test_add_uses_template_defaults() {
        let mut store = FurnitureStore::default();
        let id = store.add(&desk(), [0.0, 0.0, 0.0]);

        let item = store.get(&id).unwrap();
        assert_eq!(store.items().len(), 1);
        assert_eq!(item.template_id, "desk-1");
        assert_eq!(item.transform.position, [0.0, 0.0, 0.0]);
        assert_eq!(item.transform.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(item.transform.scale, [1.0, 1.0, 1.0]);
        assert!(!item.is_selected);
        assert!(!item.is_dragging);
    }

    #[test]
    fn test_rapid_adds_get_distinct_ids() {
        let mut store = FurnitureStore::default();
        let template = desk();
        for _ in 0..100 {
            store.add(&template, [0.0; 3]);
        }
        assert_invariants(&store);
    }

    #[test]
    fn test_add_remove_sequence() {
        let mut store = FurnitureStore::default();
        let template = desk();
        let a = store.add(&template, [0.0; 3]);
        let b = store.add(&template, [1.0, 0.0, 0.0]);
        let c = store.add(&template, [2.0, 0.0, 0.0]);

        assert!(store.remove(&b));
        assert!(!store.remove(&b));
        assert!(!store.remove("missing"));

        let ids: Vec<_> = store.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec![a, c]);
        assert_invariants(&store);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = FurnitureStore::default();
        store.add(&desk(), [0.0; 3]);
        let before = store.items().to_vec();

        assert!(!store.update("nope", &FurnitureUpdate::position([5.0, 0.0, 5.0])));
        assert_eq!(store.items(), &before[..]);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = FurnitureStore::default();
        let id = store.add(&desk(), [0.0; 3]);

        let update = FurnitureUpdate {
            name: Some("Standing desk".to_string()),
            rotation: Some([0.0, 1.0, 0.0]),
            ..Default::default()
        };
        assert!(store.update(&id, &update));

        let item = store.get(&id).unwrap();
        assert_eq!(item.name, "Standing desk");
        assert_eq!(item.transform.rotation, [0.0, 1.0, 0.0]);
        assert_eq!(item.transform.position, [0.0; 3]);
    }

    #[test]
    fn test_update_clamps_scale() {
        let mut store = FurnitureStore::default();
        let id = store.add(&desk(), [0.0; 3]);
        store.update(&id, &FurnitureUpdate::scale([0.0, -1.0, 2.0]));
        assert_invariants(&store);
        assert_eq!(store.get(&id).unwrap().transform.scale[2], 2.0);
    }

    #[test]
    fn test_select_is_exclusive() {
        let mut store = FurnitureStore::default();
        let a = store.add(&desk(), [0.0; 3]);
        let b = store.add(&desk(), [0.0; 3]);

        store.select(Some(&a));
        assert_eq!(store.selected().unwrap().id, a);
        store.select(Some(&b));
        assert_eq!(store.selected().unwrap().id, b);
        assert_invariants(&store);

        store.select(None);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_drag_requires_selection() {
        let mut store = FurnitureStore::default();
        let a = store.add(&desk(), [0.0; 3]);
        let b = store.add(&desk(), [0.0; 3]);

        assert!(!store.set_dragging(&a, true));
        assert!(!store.any_dragging());

        store.select(Some(&a));
        assert!(store.set_dragging(&a, true));
        assert!(store.any_dragging());

        // Selecting elsewhere ends the drag on the old item
        store.select(Some(&b));
        assert!(!store.get(&a).unwrap().is_dragging);
        assert_invariants(&store);
    }

    #[test]
    fn test_duplicate_offsets_copy() {
        let mut store = FurnitureStore::default();
        let id = store.add(&desk(), [2.0, 0.0, -1.0]);
        store.update(&id, &FurnitureUpdate::scale([2.0, 2.0, 2.0]));
        let source = store.get(&id).unwrap().clone();

        let copy_id = store.duplicate(&id).unwrap();
        let copy = store.get(&copy_id).unwrap();

        assert_ne!(copy_id, id);
        assert_eq!(copy.name, source.name);
        assert_eq!(copy.model_path, source.model_path);
        assert_eq!(copy.category, source.category);
        assert_eq!(copy.template_id, source.template_id);
        assert_eq!(copy.transform.scale, [2.0, 2.0, 2.0]);
        assert_eq!(copy.transform.position, [3.0, 0.0, 0.0]);
        assert_eq!(store.get(&id).unwrap(), &source);
        assert!(store.duplicate("missing").is_none());
    }

    #[test]
    fn test_editor_settings() {
        let mut store = FurnitureStore::default();
        store.toggle_grid();
        store.toggle_snap_to_grid();
        store.set_grid_size(0.25);
        store.set_grid_size(-1.0);
        store.set_mode(EditorMode::Rotate);
        store.set_selected_tool(Some("measure".to_string()));

        let editor = store.editor();
        assert!(!editor.show_grid);
        assert!(editor.snap_to_grid);
        assert_eq!(editor.grid_size, 0.25);
        assert_eq!(editor.mode, EditorMode::Rotate);

        store.reset();
        assert_eq!(store.editor(), &EditorState::default());
    }

    #[test]
    fn test_reset_and_load_categories() {
        let mut store = FurnitureStore::default();
        store.add(&desk(), [0.0; 3]);
        store.reset();
        assert!(store.items().is_empty());

        store.load_categories();
        store.load_categories();
        assert_eq!(store.categories(), &atelier_config::default_categories()[..]);
    }
}
