//! View reset capability
//!
//! The renderer registers an implementation with the editor so toolbar and
//! hotkey actions can reset the camera without holding a camera handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Something that can put the viewport camera back to its initial pose
pub trait ResetView: Send + Sync {
    fn reset_view(&mut self);
}

/// Reset request flag shared between the editor and a render loop.
///
/// `reset_view` raises the flag; the render loop calls [`ResetRequest::take`]
/// once per frame and resets its camera when it returns `true`.
#[derive(Debug, Clone, Default)]
pub struct ResetRequest {
    pending: Arc<AtomicBool>,
}

impl ResetRequest {
    /// Consume a pending request
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

impl ResetView for ResetRequest {
    fn reset_view(&mut self) {
        self.pending.store(true, Ordering::SeqCst);
    }
}
