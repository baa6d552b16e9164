//! Drag-to-move interaction
//!
//! Pointer movement during a drag is projected onto a horizontal plane at
//! floor height. The hit point's X and Z become the item's position; Y is
//! left alone so dragged furniture stays on the floor.
//!
//! Two pointer sources feed the same routine: moves over the dragged
//! object's own geometry and document-wide moves that keep tracking when a
//! fast drag leaves the object's screen bounds. Both go through
//! [`DragController::pointer_move`] so they always agree.

use glam::{Mat4, Vec2, Vec3};
use tracing::{debug, trace};

use crate::furniture::FurnitureStore;

/// Epsilon below which a ray counts as parallel to the plane
const PARALLEL_EPSILON: f32 = 1e-6;

/// Far clip distance used when unprojecting pointer positions
const FAR_PLANE: f32 = 1000.0;

/// Ray with an origin and a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Plane of points `p` with `normal.dot(p) + offset == 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPlane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Default for DragPlane {
    fn default() -> Self {
        Self::floor(0.0)
    }
}

impl DragPlane {
    /// Horizontal plane at `height`, facing up
    pub fn floor(height: f32) -> Self {
        Self {
            normal: Vec3::Y,
            offset: -height,
        }
    }

    /// Intersection of `ray` with the plane.
    ///
    /// Returns `None` when the ray is parallel to the plane or the plane lies
    /// behind the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -(self.normal.dot(ray.origin) + self.offset) / denom;
        if t < 0.0 {
            return None;
        }
        Some(ray.at(t))
    }
}

/// Convert a pointer position in viewport pixels to normalized device
/// coordinates (x right, y up, both in -1..1).
///
/// Returns `None` for an empty viewport.
pub fn pointer_to_ndc(pointer: Vec2, viewport_min: Vec2, viewport_size: Vec2) -> Option<Vec2> {
    if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
        return None;
    }
    let local = (pointer - viewport_min) / viewport_size;
    Some(Vec2::new(local.x * 2.0 - 1.0, -(local.y * 2.0 - 1.0)))
}

/// Perspective camera description sufficient to cast pointer rays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjection {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
}

impl CameraProjection {
    pub fn new(position: Vec3, target: Vec3, fov_y: f32, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y,
            aspect,
            near: 0.1,
        }
    }

    /// Ray from the camera through the point at `ndc`
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let view = Mat4::look_at_rh(self.position, self.target, self.up);
        let projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, FAR_PLANE);
        let inverse = (projection * view).inverse();
        let on_near_plane = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        Ray::new(self.position, on_near_plane - self.position)
    }
}

/// Round `value` to the nearest multiple of `grid_size`
pub fn snap_to_grid(value: f32, grid_size: f32) -> f32 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Where a pointer move came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    /// Move over the dragged object's own geometry
    Object,
    /// Window-wide move, reported wherever the pointer is
    Document,
}

/// Per-viewport drag state machine: idle, or dragging one item.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    plane: DragPlane,
    active: Option<String>,
}

impl DragController {
    pub fn new(plane: DragPlane) -> Self {
        Self { plane, active: None }
    }

    pub fn plane(&self) -> &DragPlane {
        &self.plane
    }

    /// Id of the item being dragged
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Pointer pressed on item `id`: select it and start dragging.
    pub fn pointer_down(&mut self, store: &mut FurnitureStore, id: &str) -> bool {
        if let Some(previous) = self.active.take() {
            store.set_dragging(&previous, false);
        }
        store.select(Some(id));
        if store.set_dragging(id, true) {
            debug!("Drag started on {}", id);
            self.active = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Pointer moved along `ray`. Returns whether the dragged item moved.
    pub fn pointer_move(
        &mut self,
        store: &mut FurnitureStore,
        ray: &Ray,
        source: PointerSource,
    ) -> bool {
        let Some(id) = self.active.as_deref() else {
            return false;
        };
        let Some(hit) = self.plane.intersect(ray) else {
            trace!("{:?} pointer ray misses the drag plane", source);
            return false;
        };

        let editor = store.editor();
        let (mut x, mut z) = (hit.x, hit.z);
        if editor.snap_to_grid {
            x = snap_to_grid(x, editor.grid_size);
            z = snap_to_grid(z, editor.grid_size);
        }

        let Some(item) = store.dragging_item_mut(id) else {
            // Item removed or deselected mid-drag
            self.active = None;
            return false;
        };
        let position = &mut item.transform.position;
        if position[0] == x && position[2] == z {
            return false;
        }
        position[0] = x;
        position[2] = z;
        trace!("{:?} drag moved {} to ({}, {})", source, id, x, z);
        true
    }

    /// Pointer released, either over the item or anywhere in the window.
    ///
    /// Whichever release arrives first ends the drag; later ones are no-ops.
    pub fn pointer_up(&mut self, store: &mut FurnitureStore) -> bool {
        let Some(id) = self.active.take() else {
            return false;
        };
        store.set_dragging(&id, false);
        debug!("Drag ended on {}", id);
        true
    }
}
