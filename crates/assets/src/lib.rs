//! Model loading for Atelier
//!
//! Fetches glTF/GLB furniture models, decodes them into renderer-independent
//! [`ModelData`], and caches the result by path. Every load returns its own
//! copy so placements never share mutable geometry.
//!
//! Overlapping requests for a path that is not cached yet share one fetch.
//! Transient fetch failures are retried with exponential backoff; decode
//! failures are reported straight away.

mod decode;
mod error;
mod loader;
mod model;
mod source;

pub use decode::decode_gltf;
pub use error::ModelLoadError;
pub use loader::{ModelLoader, RetryPolicy};
pub use model::{Bounds, MeshData, ModelData};
pub use source::{FsSource, ModelSource};
