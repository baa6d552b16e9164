//! Atelier - 3D interior design editor

use atelier_config::{DEFAULT_SCALE, EditorConfig};
use bevy::prelude::*;
use bevy::window::WindowResolution;

mod config;
mod input;
mod panel;

use atelier_scene::ScenePlugin;
use config::AppConfig;

fn main() {
    let editor_config = EditorConfig::from_env().unwrap_or_else(|e| {
        // The log plugin isn't installed yet
        eprintln!("atelier: {e}; using the default configuration");
        EditorConfig::default()
    });
    let app_config = AppConfig::from_env();

    // Display configuration - single source of truth for window size
    let display = editor_config.display.clone();
    let mut resolution = WindowResolution::new(display.width, display.height);
    if display.scale != DEFAULT_SCALE {
        resolution = resolution.with_scale_factor_override(display.scale);
    }

    let window_config = Window {
        title: "Atelier".into(),
        resolution,
        present_mode: bevy::window::PresentMode::AutoVsync,
        ..default()
    };

    let mut app = App::new();

    // ScenePlugin reads the editor config while building
    app.insert_resource(editor_config)
        .insert_resource(display)
        .insert_resource(app_config)
        .insert_resource(ClearColor(Color::srgb(0.94, 0.94, 0.94)));

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window_config),
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                ..default()
            }),
    );

    app.add_plugins(ScenePlugin)
        .add_plugins(panel::SidePanelPlugin)
        .add_plugins(input::InputPlugin)
        .run();
}
