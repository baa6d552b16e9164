//! Bevy scene for Atelier
//!
//! Renders the room and placed furniture from the editor state and feeds
//! viewport input (drags, camera moves) back into it. The [`EditorResource`]
//! is the only copy of editor state; entities are a projection of it.

use atelier_config::EditorConfig;
use atelier_ipc::{EditorToUi, UiToEditor};
use atelier_state::Editor;
use bevy::ecs::message::Message;
use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

mod camera;
mod drag;
mod furniture;
mod grid;
mod loading;
mod room;

pub use camera::{CameraControllerPlugin, MainCamera, OrbitCamera, ViewResetHandle};
pub use drag::{DragPlugin, DragSystems};
pub use furniture::{FurnitureEntity, FurniturePlugin, ModelStatus};
pub use grid::GridPlugin;
pub use loading::{ModelLoadingPlugin, ModelRequest, ReloadModels};
pub use room::{RoomPart, RoomPlugin};

/// The editor state, owned by the ECS world
#[derive(Resource, Deref, DerefMut)]
pub struct EditorResource(pub Editor);

/// Panel command to apply to the editor
#[derive(Message, Debug, Clone)]
pub struct UiCommand(pub UiToEditor);

/// Resource for queuing notifications to send to the panels.
/// The app crate drains this after each frame.
#[derive(Resource, Default)]
pub struct OutboundUiMessages {
    pub messages: Vec<EditorToUi>,
}

impl OutboundUiMessages {
    pub fn send(&mut self, msg: EditorToUi) {
        self.messages.push(msg);
    }

    pub fn extend(&mut self, msgs: impl IntoIterator<Item = EditorToUi>) {
        self.messages.extend(msgs);
    }

    /// Take all queued messages, leaving the queue empty
    pub fn drain(&mut self) -> Vec<EditorToUi> {
        std::mem::take(&mut self.messages)
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<EditorConfig>()
            .cloned()
            .unwrap_or_default();

        let view_reset = ViewResetHandle::default();
        let mut editor = Editor::new(&config);
        editor.register_view_reset(Box::new(view_reset.0.clone()));

        app.insert_resource(EditorResource(editor))
            .insert_resource(view_reset)
            .init_resource::<OutboundUiMessages>()
            .add_message::<UiCommand>()
            .add_systems(Startup, setup_lighting)
            .add_systems(Update, apply_ui_commands);

        app.add_plugins(CameraControllerPlugin);
        app.add_plugins(RoomPlugin);
        app.add_plugins(ModelLoadingPlugin::new(config.assets.clone()));
        app.add_plugins(FurniturePlugin);
        app.add_plugins(DragPlugin);
        app.add_plugins(GridPlugin);
    }
}

fn apply_ui_commands(
    mut commands: MessageReader<UiCommand>,
    mut editor: ResMut<EditorResource>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    for UiCommand(message) in commands.read() {
        outbound.extend(editor.apply(message.clone()));
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });

    info!("Scene lighting initialized");
}
