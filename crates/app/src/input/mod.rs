//! Keyboard input for the editor
//!
//! Pointer input on the viewport is handled by the scene crate; this module
//! only maps hotkeys to editor commands and panel edits.

use bevy::input::InputSystems;
use bevy::prelude::*;

mod hotkeys;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, hotkeys::handle_hotkeys.after(InputSystems));

        info!("Input plugin initialized");
    }
}
