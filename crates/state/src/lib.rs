//! Editor state for Atelier
//!
//! Renderer-independent core of the furniture editor: the scene and
//! furniture stores, drag-to-move interaction, the property panel model,
//! scene documents, and the [`Editor`] facade that ties them together.
//! Everything here runs on the caller's thread; the viewport owns one
//! [`Editor`] and mutates it from its event handlers.

mod document;
mod drag;
mod editor;
mod furniture;
mod ids;
mod panel;
mod scene;
mod view;

pub use document::{DOCUMENT_VERSION, DocumentError, SavedItem, SceneDocument};
pub use drag::{
    CameraProjection, DragController, DragPlane, PointerSource, Ray, pointer_to_ndc, snap_to_grid,
};
pub use editor::{Editor, PanelEdit};
pub use furniture::{DUPLICATE_OFFSET, FurnitureStore};
pub use ids::IdGenerator;
pub use panel::{Axis, PropertyPanel};
pub use scene::SceneStore;
pub use view::{ResetRequest, ResetView};
