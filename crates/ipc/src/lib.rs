//! Message protocol and data model for Atelier
//!
//! Defines the furniture, room, and editor types plus all messages exchanged
//! between the 3D viewport and the side panels.

mod commands;
mod error;
mod messages;
mod types;

pub use commands::*;
pub use error::IpcError;
pub use messages::*;
pub use types::*;
