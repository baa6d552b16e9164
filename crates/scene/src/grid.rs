//! Floor grid overlay, drawn with gizmos while the grid is enabled

use std::f32::consts::FRAC_PI_2;

use bevy::math::Isometry3d;
use bevy::prelude::*;

use crate::EditorResource;

/// Side length of the grid area in world units
const GRID_EXTENT: f32 = 20.0;
/// Spacing of the emphasised section lines
const SECTION_SIZE: f32 = 2.0;
/// Upper bound on cells per side so tiny grid sizes stay drawable
const MAX_CELLS: u32 = 400;

const CELL_COLOR: Color = Color::srgb(0.435, 0.435, 0.435);
const SECTION_COLOR: Color = Color::srgb(0.2, 0.2, 0.2);

pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_grid);
    }
}

/// Cells per side for `spacing`, never zero
fn cell_count(spacing: f32) -> u32 {
    if spacing <= 0.0 {
        return 1;
    }
    ((GRID_EXTENT / spacing).round() as u32).clamp(1, MAX_CELLS)
}

fn draw_grid(editor: Res<EditorResource>, mut gizmos: Gizmos) {
    let settings = editor.furniture().editor();
    if !settings.show_grid {
        return;
    }

    // Lift slightly off the floor to avoid z-fighting
    let floor = Isometry3d::new(Vec3::new(0.0, 0.001, 0.0), Quat::from_rotation_x(FRAC_PI_2));

    let cells = cell_count(settings.grid_size);
    let spacing = GRID_EXTENT / cells as f32;
    gizmos.grid(floor, UVec2::splat(cells), Vec2::splat(spacing), CELL_COLOR);

    let sections = cell_count(SECTION_SIZE);
    gizmos.grid(
        floor,
        UVec2::splat(sections),
        Vec2::splat(GRID_EXTENT / sections as f32),
        SECTION_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count() {
        assert_eq!(cell_count(0.5), 40);
        assert_eq!(cell_count(2.0), 10);
        assert_eq!(cell_count(0.001), MAX_CELLS);
        assert_eq!(cell_count(0.0), 1);
        assert_eq!(cell_count(100.0), 1);
    }
}
