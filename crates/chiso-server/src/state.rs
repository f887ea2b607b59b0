//! Shared application state

use std::sync::Arc;

use chiso_core::{ArtifactStore, EngineConfig, SynthesisRuntime};

/// Shared application state; cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<SynthesisRuntime>,
    pub store: Arc<ArtifactStore>,
    pub config: EngineConfig,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        let runtime = Arc::new(SynthesisRuntime::new(config.clone()));
        let store = Arc::new(ArtifactStore::new(config.outputs_dir.clone()));
        Self {
            runtime,
            store,
            config,
        }
    }
}
