//! Drag-to-move for furniture
//!
//! A primary press on a furniture mesh selects the item and starts a drag.
//! Moves reported by the picking backend for the dragged object and raw
//! window cursor moves both feed the same editor routine, so a fast drag
//! that slips off the object keeps tracking. A release over the object or
//! anywhere in the window ends it.

use atelier_state::{PointerSource, Ray};
use bevy::input::mouse::MouseButton;
use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

use crate::camera::MainCamera;
use crate::furniture::FurnitureEntity;
use crate::EditorResource;

/// Systems that start, move, and end furniture drags
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DragSystems;

pub struct DragPlugin;

impl Plugin for DragPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MeshPickingPlugin).add_systems(
            Update,
            (start_drag, track_drag, end_drag).chain().in_set(DragSystems),
        );
    }
}

/// Walk up the hierarchy from a picked mesh to its furniture root
fn furniture_id(
    mut entity: Entity,
    furniture: &Query<&FurnitureEntity>,
    parents: &Query<&ChildOf>,
) -> Option<String> {
    loop {
        if let Ok(root) = furniture.get(entity) {
            return Some(root.id.clone());
        }
        entity = parents.get(entity).ok()?.parent();
    }
}

/// World-space pointer ray in the editor's math types
fn pointer_ray(camera: &Camera, camera_transform: &GlobalTransform, cursor: Vec2) -> Option<Ray> {
    let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
    Some(Ray::new(
        glam::Vec3::from_array(ray.origin.to_array()),
        glam::Vec3::from_array(ray.direction.as_vec3().to_array()),
    ))
}

fn start_drag(
    mut press_events: MessageReader<Pointer<Press>>,
    furniture: Query<&FurnitureEntity>,
    parents: Query<&ChildOf>,
    mut editor: ResMut<EditorResource>,
) {
    for event in press_events.read() {
        if event.button != PointerButton::Primary {
            continue;
        }
        let Some(id) = furniture_id(event.entity, &furniture, &parents) else {
            continue;
        };
        if editor.pointer_down(&id) {
            info!("Dragging {}", id);
        }
    }
}

fn track_drag(
    mut move_events: MessageReader<Pointer<Move>>,
    mut cursor_events: MessageReader<CursorMoved>,
    furniture: Query<&FurnitureEntity>,
    parents: Query<&ChildOf>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    window_query: Query<Entity, With<PrimaryWindow>>,
    mut editor: ResMut<EditorResource>,
) {
    let Some(dragged) = editor.dragging().map(str::to_string) else {
        move_events.clear();
        cursor_events.clear();
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let object_moves = move_events
        .read()
        .filter(|event| {
            furniture_id(event.entity, &furniture, &parents).as_deref() == Some(dragged.as_str())
        })
        .map(|event| (event.pointer_location.position, PointerSource::Object))
        .collect::<Vec<_>>();

    let primary = window_query.single().ok();
    let document_moves = cursor_events
        .read()
        .filter(|event| Some(event.window) == primary)
        .map(|event| (event.position, PointerSource::Document))
        .collect::<Vec<_>>();

    for (cursor, source) in object_moves.into_iter().chain(document_moves) {
        if let Some(ray) = pointer_ray(camera, camera_transform, cursor) {
            editor.pointer_move(&ray, source);
        }
    }
}

fn end_drag(
    mut release_events: MessageReader<Pointer<Release>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut editor: ResMut<EditorResource>,
) {
    let released_on_object = release_events
        .read()
        .any(|event| event.button == PointerButton::Primary);
    let released_anywhere = mouse_button.just_released(MouseButton::Left);

    if (released_on_object || released_anywhere) && editor.dragging().is_some() {
        editor.pointer_up();
    }
}
