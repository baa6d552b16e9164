//! Type definitions for IPC messages.

mod editor;
mod furniture;
mod scene;

pub use editor::*;
pub use furniture::*;
pub use scene::*;
