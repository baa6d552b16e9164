//! Application settings taken from the environment

use std::path::PathBuf;

use bevy::prelude::*;

/// Environment variable naming the scene document used by save and load
pub const DOCUMENT_ENV_VAR: &str = "ATELIER_DOCUMENT";

const DEFAULT_DOCUMENT: &str = "scene.atelier.json";

#[derive(Resource, Debug, Clone)]
pub struct AppConfig {
    /// Target of Ctrl+S and source of Ctrl+O
    pub document_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from(DEFAULT_DOCUMENT),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        match std::env::var_os(DOCUMENT_ENV_VAR) {
            Some(path) => Self {
                document_path: PathBuf::from(path),
            },
            None => Self::default(),
        }
    }
}
