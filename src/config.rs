//! # Configuration
//!
//! Tunables for an editing session. Configuration is plain JSON so it can be
//! embedded in the hosting application's own settings file.
//!
//! ```json
//! {
//!     "texel_scale": 0.25,
//!     "worker_count": 4,
//!     "history_limit": 200,
//!     "prune_empty_chunks": true,
//!     "mesh_cache_capacity": 4096
//! }
//! ```
//!
//! Missing fields fall back to [`EditorConfig::default`].

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::EditorResult;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// UV units per voxel handed to the greedy mesher.
    pub texel_scale: f32,
    /// Number of mesh worker threads.
    pub worker_count: usize,
    /// Maximum number of undo entries kept. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Drop chunks that are entirely default after an edit.
    pub prune_empty_chunks: bool,
    /// Number of finished chunk meshes kept around.
    pub mesh_cache_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let worker_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            texel_scale: 0.25,
            worker_count,
            history_limit: None,
            prune_empty_chunks: true,
            mesh_cache_capacity: 4096,
        }
    }
}

impl EditorConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(text: &str) -> EditorResult<Self> {
        let mut config: EditorConfig = serde_json::from_str(text)?;
        config.sanitize();
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded editor configuration from {:?}", path.as_ref());
        Ok(config)
    }

    fn sanitize(&mut self) {
        self.worker_count = self.worker_count.max(1);
        self.mesh_cache_capacity = self.mesh_cache_capacity.max(1);
    }
}
