//! Bridge between furniture entities and the async model loader
//!
//! Requests run on a small tokio runtime; finished loads come back over a
//! channel and are drained once per frame. Results for entities that were
//! despawned (or re-pointed at another model) in the meantime are dropped.
//!
//! The scene store's loading flag is up while any request is outstanding,
//! and the last failure is recorded as the scene error. The catalog's models
//! are preloaded at startup.

use atelier_assets::{MeshData, ModelData, ModelLoadError, ModelLoader};
use atelier_config::AssetConfig;
use atelier_ipc::{SceneCommand, UiToEditor};
use bevy::asset::RenderAssetUsages;
use bevy::ecs::message::Message;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::EditorResource;
use crate::furniture::{FurnitureEntity, ModelBounds, ModelStatus};

/// Ask for the model at `path` to be attached to `entity`
#[derive(Message, Debug, Clone)]
pub struct ModelRequest {
    pub entity: Entity,
    pub path: String,
}

/// Drop cached models and load every placed item's model again
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ReloadModels;

/// Count of requests whose results haven't been drained yet
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LoadTracker {
    pending: usize,
}

impl LoadTracker {
    /// Record `count` new requests. Returns true when loading just began.
    fn started(&mut self, count: usize) -> bool {
        let was_idle = self.pending == 0;
        self.pending += count;
        was_idle && self.pending > 0
    }

    /// Record one drained result. Returns true when the last one is in.
    fn finished(&mut self) -> bool {
        let was_busy = self.pending > 0;
        self.pending = self.pending.saturating_sub(1);
        was_busy && self.pending == 0
    }
}

struct LoadedModel {
    entity: Entity,
    path: String,
    result: Result<ModelData, ModelLoadError>,
}

#[derive(Resource)]
struct ModelLoaderResource {
    loader: ModelLoader,
    runtime: Runtime,
    tracker: LoadTracker,
    tx: mpsc::UnboundedSender<LoadedModel>,
    rx: mpsc::UnboundedReceiver<LoadedModel>,
}

pub struct ModelLoadingPlugin {
    config: AssetConfig,
}

impl ModelLoadingPlugin {
    pub fn new(config: AssetConfig) -> Self {
        Self { config }
    }
}

impl Plugin for ModelLoadingPlugin {
    fn build(&self, app: &mut App) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("atelier-assets")
            .enable_all()
            .build()
            .expect("Failed to start model loading runtime");
        let (tx, rx) = mpsc::unbounded_channel();

        info!("Model loader reading from {}", self.config.root.display());
        app.insert_resource(ModelLoaderResource {
            loader: ModelLoader::from_config(&self.config),
            runtime,
            tracker: LoadTracker::default(),
            tx,
            rx,
        })
        .add_message::<ModelRequest>()
        .add_message::<ReloadModels>()
        .add_systems(Startup, preload_catalog)
        .add_systems(
            Update,
            (clear_cache_on_reload, dispatch_model_requests, apply_loaded_models).chain(),
        );
    }
}

fn set_loading(editor: &mut EditorResource, loading: bool) {
    editor.apply(UiToEditor::Scene(SceneCommand::SetLoading(loading)));
}

/// Warm the cache with every catalog model so the first placement is quick
fn preload_catalog(loading: Res<ModelLoaderResource>, editor: Res<EditorResource>) {
    let mut paths: Vec<String> = editor
        .furniture()
        .categories()
        .iter()
        .flat_map(|category| category.items.iter())
        .map(|template| template.model_path.clone())
        .collect();
    paths.sort();
    paths.dedup();
    if paths.is_empty() {
        return;
    }

    let loader = loading.loader.clone();
    loading.runtime.spawn(async move {
        for (path, result) in loader.preload_models(&paths).await {
            if let Err(e) = result {
                warn!("Could not preload {}: {}", path, e);
            }
        }
    });
}

fn clear_cache_on_reload(mut reloads: MessageReader<ReloadModels>, loading: Res<ModelLoaderResource>) {
    if reloads.read().count() > 0 {
        loading.loader.clear_cache();
        info!("Reloading furniture models");
    }
}

fn dispatch_model_requests(
    mut requests: MessageReader<ModelRequest>,
    mut loading: ResMut<ModelLoaderResource>,
    mut editor: ResMut<EditorResource>,
) {
    let requests: Vec<ModelRequest> = requests.read().cloned().collect();
    if requests.is_empty() {
        return;
    }
    if loading.tracker.started(requests.len()) {
        editor.apply(UiToEditor::Scene(SceneCommand::SetError(None)));
        set_loading(&mut editor, true);
    }

    for ModelRequest { entity, path } in requests {
        let loader = loading.loader.clone();
        let tx = loading.tx.clone();
        loading.runtime.spawn(async move {
            let result = loader.load_model(&path).await;
            // Receiver only closes at shutdown
            let _ = tx.send(LoadedModel {
                entity,
                path,
                result,
            });
        });
    }
}

fn apply_loaded_models(
    mut commands: Commands,
    mut loading: ResMut<ModelLoaderResource>,
    mut editor: ResMut<EditorResource>,
    mut targets: Query<(&FurnitureEntity, &mut ModelStatus, &mut ModelBounds)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    while let Ok(loaded) = loading.rx.try_recv() {
        if loading.tracker.finished() {
            set_loading(&mut editor, false);
        }
        let Ok((furniture, mut status, mut bounds)) = targets.get_mut(loaded.entity) else {
            debug!("Discarding model {} for removed furniture", loaded.path);
            continue;
        };
        if furniture.model_path != loaded.path {
            debug!("Discarding stale model {} for {}", loaded.path, furniture.id);
            continue;
        }

        match loaded.result {
            Ok(model) => {
                *bounds = ModelBounds::from_model(&model);
                *status = ModelStatus::Ready;
                commands
                    .entity(loaded.entity)
                    .despawn_related::<Children>()
                    .with_children(|parent| {
                        for mesh in &model.meshes {
                            parent.spawn((
                                Mesh3d(meshes.add(build_mesh(mesh))),
                                MeshMaterial3d(materials.add(mesh_material(mesh))),
                            ));
                        }
                    });
                info!("Model {} ready for {}", loaded.path, furniture.id);
            }
            Err(err) => {
                warn!("Could not load model for {}, using fallback: {}", furniture.id, err);
                editor.apply(UiToEditor::Scene(SceneCommand::SetError(Some(err.to_string()))));
                *status = ModelStatus::Failed;
            }
        }
    }
}

/// Convert decoded mesh data to a Bevy mesh
fn build_mesh(data: &MeshData) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone());
    if !data.uvs.is_empty() && data.uvs.len() == data.positions.len() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone());
    }
    mesh.insert_indices(Indices::U32(data.indices.clone()));

    if !data.normals.is_empty() && data.normals.len() == data.positions.len() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
    } else {
        mesh.compute_normals();
    }
    mesh
}

fn mesh_material(data: &MeshData) -> StandardMaterial {
    let [r, g, b, a] = data.base_color;
    StandardMaterial {
        base_color: Color::linear_rgba(r, g, b, a),
        alpha_mode: if a < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        perceptual_roughness: 0.7,
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(normals: bool) -> MeshData {
        MeshData {
            name: None,
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            normals: if normals { vec![[0.0, 1.0, 0.0]; 3] } else { Vec::new() },
            uvs: Vec::new(),
            indices: vec![0, 1, 2],
            base_color: [1.0, 1.0, 1.0, 0.5],
        }
    }

    #[test]
    fn test_tracker_reports_transitions() {
        let mut tracker = LoadTracker::default();
        assert!(tracker.started(2));
        assert!(!tracker.started(1), "already loading");
        assert!(!tracker.finished());
        assert!(!tracker.finished());
        assert!(tracker.finished());
        assert!(!tracker.finished(), "nothing outstanding");
        assert!(!tracker.started(0));
    }

    #[test]
    fn test_build_mesh_keeps_geometry() {
        let mesh = build_mesh(&triangle(true));
        assert_eq!(mesh.count_vertices(), 3);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(3));
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert!(mesh.attribute(Mesh::ATTRIBUTE_UV_0).is_none());
    }

    #[test]
    fn test_missing_normals_are_computed() {
        let mesh = build_mesh(&triangle(false));
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
    }

    #[test]
    fn test_translucent_base_color_blends() {
        let material = mesh_material(&triangle(true));
        assert!(matches!(material.alpha_mode, AlphaMode::Blend));
    }
}
