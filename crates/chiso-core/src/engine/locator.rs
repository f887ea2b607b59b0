//! Engine installation discovery and asset validation.

use std::path::PathBuf;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// A resolved, asset-checked engine installation.
///
/// All paths are absolute. The handle is cheap to construct and is
/// re-resolved for every job rather than cached; see `SynthesisRuntime`.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    /// Engine installation root.
    pub root: PathBuf,
    /// Weights directory under the root.
    pub checkpoints: PathBuf,
    /// Model configuration file under the root.
    pub config_file: PathBuf,
    /// Launcher executable under the root.
    pub launcher: PathBuf,
}

/// Resolves the engine installation from an ordered candidate list.
#[derive(Debug, Clone)]
pub struct EngineLocator {
    candidates: Vec<PathBuf>,
    checkpoints_subdir: PathBuf,
    model_config_subpath: PathBuf,
    launcher_subpath: PathBuf,
}

impl EngineLocator {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            candidates: config.engine_dirs.clone(),
            checkpoints_subdir: config.checkpoints_subdir.clone(),
            model_config_subpath: config.model_config_subpath.clone(),
            launcher_subpath: config.launcher_subpath.clone(),
        }
    }

    /// Resolve the engine installation.
    ///
    /// Probes the candidate directories in order and takes the first that
    /// exists; no merging between candidates. The chosen root must contain
    /// the weights directory and the model configuration file, otherwise
    /// the installation is considered incomplete.
    pub fn locate(&self) -> Result<EngineHandle> {
        let root = self
            .candidates
            .iter()
            .find(|candidate| candidate.exists())
            .ok_or_else(|| Error::EngineNotFound(join_candidates(&self.candidates)))?;

        let root = std::fs::canonicalize(root)?;
        debug!("using synthesis engine at {}", root.display());

        let checkpoints = root.join(&self.checkpoints_subdir);
        if !checkpoints.is_dir() {
            return Err(Error::AssetsMissing(checkpoints));
        }

        let config_file = root.join(&self.model_config_subpath);
        if !config_file.is_file() {
            return Err(Error::AssetsMissing(config_file));
        }

        // The launcher is not probed here; a broken installation surfaces
        // as an engine failure when the job is actually invoked.
        let launcher = root.join(&self.launcher_subpath);

        Ok(EngineHandle {
            root,
            checkpoints,
            config_file,
            launcher,
        })
    }
}

fn join_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
