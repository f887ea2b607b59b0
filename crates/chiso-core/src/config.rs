//! Configuration types for the chiso synthesis service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory where uploaded inputs are written (transient)
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// Directory where produced videos land; served publicly by filename
    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,

    /// Directory holding the bundled frontend
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Candidate engine installation directories, probed in order
    #[serde(default = "default_engine_dirs")]
    pub engine_dirs: Vec<PathBuf>,

    /// Weights directory expected under the engine root
    #[serde(default = "default_checkpoints_subdir")]
    pub checkpoints_subdir: PathBuf,

    /// Model configuration file expected under the engine root
    #[serde(default = "default_model_config_subpath")]
    pub model_config_subpath: PathBuf,

    /// Launcher executable expected under the engine root
    #[serde(default = "default_launcher_subpath")]
    pub launcher_subpath: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            outputs_dir: default_outputs_dir(),
            static_dir: default_static_dir(),
            engine_dirs: default_engine_dirs(),
            checkpoints_subdir: default_checkpoints_subdir(),
            model_config_subpath: default_model_config_subpath(),
            launcher_subpath: default_launcher_subpath(),
        }
    }
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_outputs_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_engine_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(from_env) = std::env::var("CHISO_ENGINE_DIR") {
        let trimmed = from_env.trim();
        if !trimmed.is_empty() {
            dirs.push(PathBuf::from(trimmed));
        }
    }

    dirs.push(PathBuf::from("/opt/chiso/engine"));
    dirs.push(PathBuf::from("./engine"));
    dirs.push(PathBuf::from("../engine"));
    dirs
}

fn default_checkpoints_subdir() -> PathBuf {
    PathBuf::from("checkpoints")
}

fn default_model_config_subpath() -> PathBuf {
    PathBuf::from("checkpoints/cfg/model.json")
}

fn default_launcher_subpath() -> PathBuf {
    PathBuf::from("bin/synthesize")
}
