//! Scene store
//!
//! Plain state container for the room geometry, the mirrored camera pose,
//! and transient loading/error flags. Updates are last-write-wins and only
//! shape-checked by the types.

use atelier_ipc::{CameraState, CameraUpdate, Room, RoomUpdate};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SceneStore {
    room: Room,
    camera: CameraState,
    is_loading: bool,
    error: Option<String>,
    initial_room: Room,
    initial_camera: CameraState,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(atelier_config::default_room(), CameraState::default())
    }
}

impl SceneStore {
    pub fn new(room: Room, camera: CameraState) -> Self {
        Self {
            room: room.clone(),
            camera,
            is_loading: false,
            error: None,
            initial_room: room,
            initial_camera: camera,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Camera pose the view returns to on reset
    pub fn initial_camera(&self) -> &CameraState {
        &self.initial_camera
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn update_room(&mut self, update: RoomUpdate) {
        let RoomUpdate {
            name,
            dimensions,
            walls,
            floor,
            ceiling,
        } = update;
        if let Some(name) = name {
            self.room.name = name;
        }
        if let Some(dimensions) = dimensions {
            self.room.dimensions = dimensions;
        }
        if let Some(walls) = walls {
            self.room.walls = walls;
        }
        if let Some(floor) = floor {
            self.room.floor = floor;
        }
        if let Some(ceiling) = ceiling {
            self.room.ceiling = ceiling;
        }
    }

    /// Merge a partial camera pose. Returns whether anything changed.
    pub fn update_camera(&mut self, update: CameraUpdate) -> bool {
        let before = self.camera;
        if let Some(position) = update.position {
            self.camera.position = position;
        }
        if let Some(target) = update.target {
            self.camera.target = target;
        }
        self.camera != before
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Replace room and camera (scene document load)
    pub(crate) fn replace(&mut self, room: Room, camera: CameraState) {
        self.room = room;
        self.camera = camera;
    }

    /// Restore the initial room and camera and clear the flags
    pub fn reset(&mut self) {
        self.room = self.initial_room.clone();
        self.camera = self.initial_camera;
        self.is_loading = false;
        self.error = None;
        debug!("Scene store reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_room_update() {
        let mut store = SceneStore::default();
        let walls = store.room().walls.clone();
        store.update_room(RoomUpdate {
            name: Some("Office".to_string()),
            ..Default::default()
        });
        assert_eq!(store.room().name, "Office");
        assert_eq!(store.room().walls, walls);
    }

    #[test]
    fn test_camera_update_reports_change() {
        let mut store = SceneStore::default();
        assert!(!store.update_camera(CameraUpdate {
            position: Some([8.0, 6.0, 8.0]),
            target: None,
        }));
        assert!(store.update_camera(CameraUpdate {
            position: None,
            target: Some([1.0, 0.0, 0.0]),
        }));
        assert_eq!(store.camera().position, [8.0, 6.0, 8.0]);
        assert_eq!(store.camera().target, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut store = SceneStore::default();
        store.set_loading(true);
        store.set_error(Some("boom".to_string()));
        store.update_camera(CameraUpdate {
            position: Some([0.0, 1.0, 0.0]),
            target: None,
        });
        store.reset();

        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(store.camera(), store.initial_camera());
    }
}
