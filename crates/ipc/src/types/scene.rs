//! Scene-related types for IPC messages.

use serde::{Deserialize, Serialize};

/// Smallest scale component a transform may hold.
pub const MIN_SCALE: f32 = 0.01;

/// 3D transform with position, Euler rotation (radians, XYZ order), and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Transform {
    /// Transform at `position` with no rotation and the given scale
    pub fn from_position_scale(position: [f32; 3], scale: [f32; 3]) -> Self {
        Self {
            position,
            rotation: [0.0; 3],
            scale: clamp_scale(scale),
        }
    }

    /// Copy of this transform with every scale component at least [`MIN_SCALE`]
    pub fn with_clamped_scale(mut self) -> Self {
        self.scale = clamp_scale(self.scale);
        self
    }
}

/// Clamp each scale component to [`MIN_SCALE`], mapping NaN to the minimum as well.
pub fn clamp_scale(scale: [f32; 3]) -> [f32; 3] {
    scale.map(|s| if s.is_nan() { MIN_SCALE } else { s.max(MIN_SCALE) })
}

/// Surface material of a wall, floor, or ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    /// CSS-style hex color, e.g. `#f5f5f5`
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
}

impl SurfaceMaterial {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            texture: None,
        }
    }
}

/// Outer room dimensions in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    pub material: SurfaceMaterial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub width: f32,
    pub depth: f32,
    pub material: SurfaceMaterial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ceiling {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub material: SurfaceMaterial,
}

/// Room geometry: dimensions, walls in draw order, floor, and ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub dimensions: RoomDimensions,
    pub walls: Vec<Wall>,
    pub floor: Floor,
    pub ceiling: Ceiling,
}

/// Partial room update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dimensions: Option<RoomDimensions>,
    #[serde(default)]
    pub walls: Option<Vec<Wall>>,
    #[serde(default)]
    pub floor: Option<Floor>,
    #[serde(default)]
    pub ceiling: Option<Ceiling>,
}

/// Camera pose mirrored from the live viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: [8.0, 6.0, 8.0],
            target: [0.0; 3],
        }
    }
}

/// Partial camera update; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraUpdate {
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default)]
    pub target: Option<[f32; 3]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scale() {
        assert_eq!(clamp_scale([1.0, 0.0, -2.0]), [1.0, MIN_SCALE, MIN_SCALE]);
        assert_eq!(clamp_scale([f32::NAN, 2.0, 3.0]), [MIN_SCALE, 2.0, 3.0]);
    }

    #[test]
    fn test_room_update_deserializes_partially() {
        let update: RoomUpdate = serde_json::from_str(r#"{"name":"Studio"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("Studio"));
        assert!(update.walls.is_none());
    }
}
