//! Where model bytes come from

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ModelLoadError;

/// Byte source for model files.
///
/// Errors flagged transient are retried by the loader.
pub trait ModelSource: Send + Sync + 'static {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, ModelLoadError>> + Send;

    /// Directory external buffer URIs of `path` resolve against
    fn base_dir(&self, _path: &str) -> Option<PathBuf> {
        None
    }
}

/// Reads models from disk under an asset root
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl ModelSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, ModelLoadError> {
        let full = self.resolve(path);
        debug!("Reading model {}", full.display());
        tokio::fs::read(&full).await.map_err(|e| ModelLoadError::Fetch {
            path: path.to_string(),
            message: e.to_string(),
            transient: !matches!(
                e.kind(),
                ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::InvalidInput
            ),
        })
    }

    fn base_dir(&self, path: &str) -> Option<PathBuf> {
        self.resolve(path).parent().map(Path::to_path_buf)
    }
}
