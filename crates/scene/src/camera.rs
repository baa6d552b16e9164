//! Orbit camera controller
//!
//! Controls:
//! - Left drag starting on empty space, or middle drag: Orbit around target
//! - Right drag, or Shift + Middle drag: Pan
//! - Scroll wheel: Dolly (zoom)
//!
//! All controls are suspended while a furniture item is being dragged. A
//! left press that lands on furniture or on a UI node never orbits.
//! The live pose is mirrored into the scene store whenever it changes.

use std::f32::consts::FRAC_PI_2;

use atelier_ipc::CameraState;
use atelier_state::ResetRequest;
use bevy::input::mouse::{MouseButton, MouseMotion, MouseWheel};
use bevy::prelude::*;

use crate::EditorResource;
use crate::drag::DragSystems;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Handle the editor raises to ask for a view reset
#[derive(Resource, Clone, Default)]
pub struct ViewResetHandle(pub ResetRequest);

/// Whether the current left-button drag orbits the camera
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrbitGrab {
    pub active: bool,
}

/// A left press orbits only when it starts on empty viewport space
fn left_press_orbits(any_dragging: bool, over_ui: bool) -> bool {
    !any_dragging && !over_ui
}

fn orbit_held(middle: bool, shift: bool, left_grab: bool) -> bool {
    (middle && !shift) || left_grab
}

fn pan_held(middle: bool, shift: bool, right: bool) -> bool {
    (middle && shift) || right
}

/// Camera orbit controller state
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Horizontal angle (yaw) in radians
    pub yaw: f32,
    /// Elevation above the horizon in radians
    pub pitch: f32,
    /// Orbit sensitivity (radians per pixel)
    pub orbit_sensitivity: f32,
    /// Pan sensitivity (units per pixel, scaled by distance)
    pub pan_sensitivity: f32,
    /// Zoom sensitivity (distance units per scroll line)
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_state(&CameraState::default())
    }
}

impl OrbitCamera {
    pub const MIN_PITCH: f32 = 0.0;
    /// Straight down; the camera never goes below the floor
    pub const MAX_PITCH: f32 = FRAC_PI_2;

    /// Orbit parameters that place the camera at `state.position` looking at `state.target`
    pub fn from_state(state: &CameraState) -> Self {
        let target = Vec3::from_array(state.target);
        let offset = Vec3::from_array(state.position) - target;
        let distance = offset.length();
        let (yaw, pitch) = if distance > f32::EPSILON {
            (offset.x.atan2(offset.z), (offset.y / distance).asin())
        } else {
            (0.0, 0.0)
        };

        let mut orbit = Self {
            target,
            distance,
            yaw,
            pitch,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.002,
            zoom_sensitivity: 1.0,
            min_distance: 2.0,
            max_distance: 50.0,
        };
        orbit.clamp();
        orbit
    }

    /// Calculate camera position from orbit parameters
    pub fn calculate_position(&self) -> Vec3 {
        let horizontal_distance = self.distance * self.pitch.cos();
        let y = self.distance * self.pitch.sin();
        let x = horizontal_distance * self.yaw.sin();
        let z = horizontal_distance * self.yaw.cos();

        self.target + Vec3::new(x, y, z)
    }

    /// Current pose as stored in the scene store
    pub fn to_state(&self) -> CameraState {
        CameraState {
            position: self.calculate_position().to_array(),
            target: self.target.to_array(),
        }
    }

    fn clamp(&mut self) {
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.pitch = self.pitch.clamp(Self::MIN_PITCH, Self::MAX_PITCH);
    }
}

/// Plugin for orbit camera controls
pub struct CameraControllerPlugin;

impl Plugin for CameraControllerPlugin {
    fn build(&self, app: &mut App) {
        // orbit and pan both read MouseMotion, so they must run sequentially.
        // Drags start first so a press on furniture never orbits.
        app.init_resource::<OrbitGrab>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (
                    follow_store_camera,
                    handle_view_reset,
                    track_orbit_grab,
                    camera_orbit_system,
                    camera_pan_system,
                    camera_zoom_system,
                    update_camera_transform,
                )
                    .chain()
                    .after(DragSystems),
            );
    }
}

fn spawn_camera(mut commands: Commands, editor: Res<EditorResource>) {
    let orbit = OrbitCamera::from_state(editor.scene().camera());
    let position = orbit.calculate_position();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 60f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(position).looking_at(orbit.target, Vec3::Y),
        MainCamera,
        orbit,
    ));
}

/// Apply camera poses written to the store by something other than the viewport
/// (panel commands, scene reset, document load)
fn follow_store_camera(editor: Res<EditorResource>, mut camera_query: Query<&mut OrbitCamera>) {
    if !editor.is_changed() {
        return;
    }
    let stored = editor.scene().camera();
    for mut orbit in camera_query.iter_mut() {
        let live = orbit.to_state();
        if !poses_match(&live, stored) {
            debug!("Camera following store pose {:?}", stored);
            *orbit = OrbitCamera::from_state(stored);
        }
    }
}

fn poses_match(a: &CameraState, b: &CameraState) -> bool {
    Vec3::from_array(a.position).abs_diff_eq(Vec3::from_array(b.position), 1e-3)
        && Vec3::from_array(a.target).abs_diff_eq(Vec3::from_array(b.target), 1e-3)
}

fn handle_view_reset(
    handle: Res<ViewResetHandle>,
    editor: Res<EditorResource>,
    mut camera_query: Query<&mut OrbitCamera>,
) {
    if !handle.0.take() {
        return;
    }
    for mut orbit in camera_query.iter_mut() {
        *orbit = OrbitCamera::from_state(editor.scene().initial_camera());
    }
    info!("View reset");
}

fn track_orbit_grab(
    mouse_button: Res<ButtonInput<MouseButton>>,
    ui_nodes: Query<&Interaction>,
    editor: Res<EditorResource>,
    mut grab: ResMut<OrbitGrab>,
) {
    if mouse_button.just_pressed(MouseButton::Left) {
        let over_ui = ui_nodes.iter().any(|i| *i != Interaction::None);
        grab.active = left_press_orbits(editor.furniture().any_dragging(), over_ui);
    } else if !mouse_button.pressed(MouseButton::Left) && grab.active {
        grab.active = false;
    }
}

/// Handle orbit (left drag on empty space, or middle drag without shift)
fn camera_orbit_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    key_input: Res<ButtonInput<KeyCode>>,
    grab: Res<OrbitGrab>,
    mut motion_events: MessageReader<MouseMotion>,
    mut camera_query: Query<&mut OrbitCamera>,
    editor: Res<EditorResource>,
) {
    let shift_held =
        key_input.pressed(KeyCode::ShiftLeft) || key_input.pressed(KeyCode::ShiftRight);
    let held = orbit_held(mouse_button.pressed(MouseButton::Middle), shift_held, grab.active);
    if editor.furniture().any_dragging() || !held {
        motion_events.clear();
        return;
    }

    let delta: Vec2 = motion_events.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    for mut orbit in camera_query.iter_mut() {
        orbit.yaw -= delta.x * orbit.orbit_sensitivity;
        orbit.pitch -= delta.y * orbit.orbit_sensitivity;
        orbit.clamp();
    }
}

/// Handle pan (right drag, or shift + middle drag)
fn camera_pan_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    key_input: Res<ButtonInput<KeyCode>>,
    mut motion_events: MessageReader<MouseMotion>,
    mut camera_query: Query<(&mut OrbitCamera, &Transform)>,
    editor: Res<EditorResource>,
) {
    let shift_held =
        key_input.pressed(KeyCode::ShiftLeft) || key_input.pressed(KeyCode::ShiftRight);
    let held = pan_held(
        mouse_button.pressed(MouseButton::Middle),
        shift_held,
        mouse_button.pressed(MouseButton::Right),
    );
    if editor.furniture().any_dragging() || !held {
        motion_events.clear();
        return;
    }

    let delta: Vec2 = motion_events.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    for (mut orbit, transform) in camera_query.iter_mut() {
        let right = transform.rotation * Vec3::X;
        let up = transform.rotation * Vec3::Y;
        let pan_scale = orbit.pan_sensitivity * orbit.distance;
        orbit.target += (-right * delta.x + up * delta.y) * pan_scale;
    }
}

/// Handle zoom (scroll wheel)
fn camera_zoom_system(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut OrbitCamera>,
    editor: Res<EditorResource>,
) {
    if editor.furniture().any_dragging() {
        scroll_events.clear();
        return;
    }

    let scroll_delta: f32 = scroll_events.read().map(|event| event.y).sum();
    if scroll_delta == 0.0 {
        return;
    }

    for mut orbit in camera_query.iter_mut() {
        // Scale zoom speed by current distance for consistent feel
        let zoom_amount = scroll_delta * orbit.zoom_sensitivity * (orbit.distance * 0.1);
        orbit.distance -= zoom_amount;
        orbit.clamp();
    }
}

/// Update camera transform from orbit state and mirror the pose into the store
fn update_camera_transform(
    mut camera_query: Query<(&OrbitCamera, &mut Transform), (With<MainCamera>, Changed<OrbitCamera>)>,
    mut editor: ResMut<EditorResource>,
) {
    for (orbit, mut transform) in camera_query.iter_mut() {
        let position = orbit.calculate_position();
        *transform = Transform::from_translation(position).looking_at(orbit.target, Vec3::Y);
        editor.mirror_camera(position.to_array(), orbit.target.to_array());
    }
}
