//! Property panel model
//!
//! Holds an editable mirror of the selected item's transform. Rotation is
//! shown in degrees and stored in radians; every edit converts on write and
//! the next sync converts back.

use atelier_ipc::{ConfirmAction, FurnitureUpdate, MIN_SCALE};
use tracing::info;

use crate::furniture::FurnitureStore;

/// Transform component addressed by a panel field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPanel {
    selected_id: Option<String>,
    name: String,
    position: [f32; 3],
    rotation_degrees: [f32; 3],
    scale: [f32; 3],
}

impl Default for PropertyPanel {
    fn default() -> Self {
        Self {
            selected_id: None,
            name: String::new(),
            position: [0.0; 3],
            rotation_degrees: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl PropertyPanel {
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn rotation_degrees(&self) -> [f32; 3] {
        self.rotation_degrees
    }

    pub fn scale(&self) -> [f32; 3] {
        self.scale
    }

    /// Value for the uniform-scale control: the X scale
    pub fn uniform_scale(&self) -> f32 {
        self.scale[0]
    }

    /// Re-read the selected item's transform from the store.
    ///
    /// Returns whether the selection changed since the last sync.
    pub fn sync(&mut self, store: &FurnitureStore) -> bool {
        let selected = store.selected();
        let changed = selected.map(|item| item.id.as_str()) != self.selected_id.as_deref();

        match selected {
            Some(item) => {
                let transform = &item.transform;
                self.selected_id = Some(item.id.clone());
                self.name = item.name.clone();
                self.position = transform.position;
                self.rotation_degrees = transform.rotation.map(f32::to_degrees);
                self.scale = transform.scale;
            }
            None => *self = Self::default(),
        }
        changed
    }

    pub fn set_position(&mut self, store: &mut FurnitureStore, axis: Axis, value: f32) -> bool {
        let Some(id) = self.selected_id.clone() else {
            return false;
        };
        self.position[axis.index()] = value;
        store.update(&id, &FurnitureUpdate::position(self.position))
    }

    /// Set one rotation component in degrees
    pub fn set_rotation_degrees(
        &mut self,
        store: &mut FurnitureStore,
        axis: Axis,
        degrees: f32,
    ) -> bool {
        let Some(id) = self.selected_id.clone() else {
            return false;
        };
        self.rotation_degrees[axis.index()] = degrees;
        let radians = self.rotation_degrees.map(f32::to_radians);
        store.update(&id, &FurnitureUpdate::rotation(radians))
    }

    pub fn set_scale(&mut self, store: &mut FurnitureStore, axis: Axis, value: f32) -> bool {
        let Some(id) = self.selected_id.clone() else {
            return false;
        };
        self.scale[axis.index()] = value.max(MIN_SCALE);
        store.update(&id, &FurnitureUpdate::scale(self.scale))
    }

    /// Write `value` to all three scale axes at once
    pub fn set_uniform_scale(&mut self, store: &mut FurnitureStore, value: f32) -> bool {
        let Some(id) = self.selected_id.clone() else {
            return false;
        };
        self.scale = [value.max(MIN_SCALE); 3];
        store.update(&id, &FurnitureUpdate::scale(self.scale))
    }

    /// Duplicate the selected item. No confirmation is asked.
    pub fn duplicate_selected(&self, store: &mut FurnitureStore) -> Option<String> {
        store.duplicate(self.selected_id.as_deref()?)
    }

    /// Delete the selected item after `confirm` approves it.
    pub fn delete_selected(
        &mut self,
        store: &mut FurnitureStore,
        confirm: impl FnOnce(&ConfirmAction) -> bool,
    ) -> bool {
        let Some(id) = self.selected_id.clone() else {
            return false;
        };
        if !confirm(&ConfirmAction::RemoveFurniture { id: id.clone() }) {
            info!("Delete of {} cancelled", id);
            return false;
        }
        let removed = store.remove(&id);
        self.sync(store);
        removed
    }
}
