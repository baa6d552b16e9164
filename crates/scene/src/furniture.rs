//! Furniture entities
//!
//! One root entity per placed item, carrying the item's transform. Its
//! children are either the decoded model meshes or a translucent fallback
//! box while the model is loading or after it failed.

use std::collections::{HashMap, HashSet};

use atelier_assets::ModelData;
use atelier_ipc::{FurnitureItem, Transform as ItemTransform};
use bevy::prelude::*;

use crate::loading::{ModelRequest, ReloadModels};
use crate::room::euler_to_quat;
use crate::EditorResource;

const SELECTION_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);
const SELECTION_PADDING: f32 = 0.1;

/// Root entity of a placed furniture item
#[derive(Component, Debug)]
pub struct FurnitureEntity {
    pub id: String,
    pub model_path: String,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Ready,
    Failed,
}

/// Model-space bounding box of whatever the entity currently shows
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub(crate) struct ModelBounds {
    pub center: Vec3,
    pub size: Vec3,
}

impl Default for ModelBounds {
    /// The unit fallback box
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec3::ONE,
        }
    }
}

impl ModelBounds {
    pub fn from_model(model: &ModelData) -> Self {
        Self {
            center: Vec3::from_array(model.bounds.center()),
            size: Vec3::from_array(model.bounds.size()),
        }
    }
}

#[derive(Component)]
struct FallbackBox;

#[derive(Resource)]
struct FurnitureAssets {
    box_mesh: Handle<Mesh>,
    loading: Handle<StandardMaterial>,
    failed: Handle<StandardMaterial>,
    failed_selected: Handle<StandardMaterial>,
}

fn translucent(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        alpha_mode: AlphaMode::Blend,
        ..default()
    }
}

impl FromWorld for FurnitureAssets {
    fn from_world(world: &mut World) -> Self {
        let box_mesh = world
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::new(1.0, 1.0, 1.0));
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        Self {
            box_mesh,
            loading: materials.add(translucent(Color::srgba(0.8, 0.8, 0.8, 0.5))),
            failed: materials.add(translucent(Color::srgba(0.306, 0.804, 0.769, 0.7))),
            failed_selected: materials.add(translucent(Color::srgba(1.0, 0.42, 0.42, 0.7))),
        }
    }
}

pub struct FurniturePlugin;

impl Plugin for FurniturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FurnitureAssets>().add_systems(
            Update,
            (
                sync_furniture_entities,
                reload_furniture_models,
                update_fallback_materials,
                draw_selection_bounds,
            )
                .chain(),
        );
    }
}

/// Bevy transform for an item transform
pub(crate) fn item_transform(transform: &ItemTransform) -> Transform {
    Transform {
        translation: Vec3::from_array(transform.position),
        rotation: euler_to_quat(transform.rotation),
        scale: Vec3::from_array(transform.scale),
    }
}

/// Spawn, despawn, and move furniture entities to match the store
fn sync_furniture_entities(
    mut commands: Commands,
    editor: Res<EditorResource>,
    assets: Res<FurnitureAssets>,
    mut entities: Query<(Entity, &FurnitureEntity, &mut Transform)>,
    mut requests: MessageWriter<ModelRequest>,
) {
    if !editor.is_changed() {
        return;
    }

    let items: HashMap<&str, &FurnitureItem> = editor
        .furniture()
        .items()
        .iter()
        .map(|item| (item.id.as_str(), item))
        .collect();
    let mut present = HashSet::new();

    for (entity, furniture, mut transform) in entities.iter_mut() {
        match items.get(furniture.id.as_str()) {
            Some(item) if item.model_path == furniture.model_path => {
                let target = item_transform(&item.transform);
                if *transform != target {
                    *transform = target;
                }
                present.insert(furniture.id.clone());
            }
            _ => {
                debug!("Despawning furniture entity for {}", furniture.id);
                commands.entity(entity).despawn();
            }
        }
    }

    for item in editor.furniture().items() {
        if present.contains(item.id.as_str()) {
            continue;
        }
        let entity = commands
            .spawn((
                item_transform(&item.transform),
                Visibility::default(),
                FurnitureEntity {
                    id: item.id.clone(),
                    model_path: item.model_path.clone(),
                },
                ModelStatus::Loading,
                ModelBounds::default(),
                Name::new(item.name.clone()),
            ))
            .with_children(|parent| {
                parent.spawn(fallback_box(&assets));
            })
            .id();

        requests.write(ModelRequest {
            entity,
            path: item.model_path.clone(),
        });
        debug!("Spawned furniture entity for {}", item.id);
    }
}

fn fallback_box(assets: &FurnitureAssets) -> impl Bundle {
    (
        Mesh3d(assets.box_mesh.clone()),
        MeshMaterial3d(assets.loading.clone()),
        FallbackBox,
    )
}

/// Put every item back to its loading box and request its model again
fn reload_furniture_models(
    mut commands: Commands,
    mut reloads: MessageReader<ReloadModels>,
    assets: Res<FurnitureAssets>,
    mut entities: Query<(Entity, &FurnitureEntity, &mut ModelStatus, &mut ModelBounds)>,
    mut requests: MessageWriter<ModelRequest>,
) {
    if reloads.read().count() == 0 {
        return;
    }
    for (entity, furniture, mut status, mut bounds) in entities.iter_mut() {
        *status = ModelStatus::Loading;
        *bounds = ModelBounds::default();
        commands
            .entity(entity)
            .despawn_related::<Children>()
            .with_children(|parent| {
                parent.spawn(fallback_box(&assets));
            });
        requests.write(ModelRequest {
            entity,
            path: furniture.model_path.clone(),
        });
    }
}

/// Grey while loading; teal after a failure, coral when that item is selected
fn update_fallback_materials(
    editor: Res<EditorResource>,
    assets: Res<FurnitureAssets>,
    owners: Query<(&FurnitureEntity, &ModelStatus)>,
    mut boxes: Query<(&ChildOf, &mut MeshMaterial3d<StandardMaterial>), With<FallbackBox>>,
) {
    for (child_of, mut material) in boxes.iter_mut() {
        let Ok((furniture, status)) = owners.get(child_of.parent()) else {
            continue;
        };
        let wanted = match status {
            ModelStatus::Loading | ModelStatus::Ready => &assets.loading,
            ModelStatus::Failed => {
                let selected = editor
                    .furniture()
                    .get(&furniture.id)
                    .is_some_and(|item| item.is_selected);
                if selected {
                    &assets.failed_selected
                } else {
                    &assets.failed
                }
            }
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

/// Yellow wireframe around the selected item
fn draw_selection_bounds(
    editor: Res<EditorResource>,
    items: Query<(&FurnitureEntity, &GlobalTransform, &ModelBounds)>,
    mut gizmos: Gizmos,
) {
    let Some(selected) = editor.furniture().selected() else {
        return;
    };
    for (furniture, global, bounds) in items.iter() {
        if furniture.id != selected.id {
            continue;
        }
        let local = Transform::from_translation(bounds.center)
            .with_scale(bounds.size + Vec3::splat(SELECTION_PADDING));
        gizmos.cube(*global * local, SELECTION_COLOR);
    }
}
