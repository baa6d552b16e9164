//! Built-in room layout
//!
//! A 10 x 3 x 8 meter box: four walls centered on each edge of the floor,
//! facing inward, half the wall height above the floor.

use std::f32::consts::{FRAC_PI_2, PI};

use atelier_ipc::{Ceiling, Floor, Room, RoomDimensions, SurfaceMaterial, Wall};

const WIDTH: f32 = 10.0;
const HEIGHT: f32 = 3.0;
const DEPTH: f32 = 8.0;
const WALL_THICKNESS: f32 = 0.2;
const WALL_COLOR: &str = "#ffffff";
const FLOOR_COLOR: &str = "#f5f5f5";

fn wall(id: &str, position: [f32; 3], yaw: f32, width: f32) -> Wall {
    Wall {
        id: id.to_string(),
        position,
        rotation: [0.0, yaw, 0.0],
        width,
        height: HEIGHT,
        thickness: WALL_THICKNESS,
        material: SurfaceMaterial::color(WALL_COLOR),
    }
}

/// Room used when no config file overrides it
pub fn default_room() -> Room {
    let half_height = HEIGHT / 2.0;
    Room {
        id: "room-1".to_string(),
        name: "Main Room".to_string(),
        dimensions: RoomDimensions {
            width: WIDTH,
            height: HEIGHT,
            depth: DEPTH,
        },
        walls: vec![
            wall("wall-1", [0.0, half_height, -DEPTH / 2.0], 0.0, WIDTH),
            wall("wall-2", [WIDTH / 2.0, half_height, 0.0], FRAC_PI_2, DEPTH),
            wall("wall-3", [0.0, half_height, DEPTH / 2.0], PI, WIDTH),
            wall("wall-4", [-WIDTH / 2.0, half_height, 0.0], -FRAC_PI_2, DEPTH),
        ],
        floor: Floor {
            width: WIDTH,
            depth: DEPTH,
            material: SurfaceMaterial::color(FLOOR_COLOR),
        },
        ceiling: Ceiling {
            width: WIDTH,
            depth: DEPTH,
            height: HEIGHT,
            material: SurfaceMaterial::color(WALL_COLOR),
        },
    }
}
