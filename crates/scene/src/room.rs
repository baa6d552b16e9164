//! Room geometry: floor, ceiling, and walls rebuilt whenever the stored room changes

use std::f32::consts::PI;

use atelier_ipc::{Room, SurfaceMaterial};
use bevy::picking::prelude::Pickable;
use bevy::prelude::*;

use crate::EditorResource;

/// Marker for entities spawned from the room description
#[derive(Component)]
pub struct RoomPart;

/// Room the current `RoomPart` entities were built from
#[derive(Resource, Default)]
struct SpawnedRoom(Option<Room>);

pub struct RoomPlugin;

impl Plugin for RoomPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnedRoom>()
            .add_systems(Update, sync_room);
    }
}

/// Parse a surface's hex color, falling back to white
pub(crate) fn surface_color(material: &SurfaceMaterial) -> Color {
    match Srgba::hex(&material.color) {
        Ok(color) => color.into(),
        Err(e) => {
            warn!("Invalid surface color {:?}: {}", material.color, e);
            Color::WHITE
        }
    }
}

/// Euler rotation (radians, XYZ order) as a quaternion
pub(crate) fn euler_to_quat(rotation: [f32; 3]) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation[0], rotation[1], rotation[2])
}

fn surface_material(material: &SurfaceMaterial) -> StandardMaterial {
    StandardMaterial {
        base_color: surface_color(material),
        perceptual_roughness: 0.9,
        ..default()
    }
}

fn sync_room(
    mut commands: Commands,
    editor: Res<EditorResource>,
    mut spawned: ResMut<SpawnedRoom>,
    parts: Query<Entity, With<RoomPart>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let room = editor.scene().room();
    if spawned.0.as_ref() == Some(room) {
        return;
    }

    for entity in parts.iter() {
        commands.entity(entity).despawn();
    }

    let dims = &room.dimensions;
    let floor_mesh = meshes.add(Plane3d::default().mesh().size(dims.width, dims.depth));

    commands.spawn((
        Mesh3d(floor_mesh.clone()),
        MeshMaterial3d(materials.add(surface_material(&room.floor.material))),
        Transform::IDENTITY,
        Pickable::IGNORE,
        RoomPart,
        Name::new("Floor"),
    ));

    // Facing down, so it is culled when the camera looks from above
    commands.spawn((
        Mesh3d(floor_mesh),
        MeshMaterial3d(materials.add(surface_material(&room.ceiling.material))),
        Transform::from_xyz(0.0, dims.height, 0.0)
            .with_rotation(Quat::from_rotation_x(PI)),
        Pickable::IGNORE,
        RoomPart,
        Name::new("Ceiling"),
    ));

    for wall in &room.walls {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(wall.width, wall.height, wall.thickness))),
            MeshMaterial3d(materials.add(surface_material(&wall.material))),
            Transform::from_translation(Vec3::from_array(wall.position))
                .with_rotation(euler_to_quat(wall.rotation)),
            Pickable::IGNORE,
            RoomPart,
            Name::new(format!("Wall {}", wall.id)),
        ));
    }

    info!(
        "Room '{}' built: {}x{}x{} with {} walls",
        room.name,
        dims.width,
        dims.height,
        dims.depth,
        room.walls.len()
    );
    spawned.0 = Some(room.clone());
}
