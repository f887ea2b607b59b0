//! Job execution runtime.
//!
//! Bridges the engine's blocking synthesis call onto the tokio worker pool
//! so request-handling tasks never block on engine computation. The caller
//! suspends at `run_job` and resumes when the offloaded work completes or
//! fails; there is no job id, cancellation, or progress reporting.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::{adapter, EngineHandle, EngineLocator, ProcessBackend, SynthesisBackend};
use crate::error::{Error, Result};

pub struct SynthesisRuntime {
    config: EngineConfig,
    locator: EngineLocator,
    backend: Arc<dyn SynthesisBackend>,
}

impl SynthesisRuntime {
    /// Create a runtime invoking the engine as a child process.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_backend(config, Arc::new(ProcessBackend))
    }

    /// Create a runtime with a custom backend.
    pub fn with_backend(config: EngineConfig, backend: Arc<dyn SynthesisBackend>) -> Self {
        let locator = EngineLocator::from_config(&config);
        Self {
            config,
            locator,
            backend,
        }
    }

    /// Get runtime configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Probe the engine installation without running a job.
    pub fn probe_engine(&self) -> Result<EngineHandle> {
        self.locator.locate()
    }

    /// Run one synthesis job off the calling task.
    ///
    /// Semantically identical to `engine::synthesize`, with execution moved
    /// to the blocking pool. The engine is re-resolved inside the worker on
    /// every call, so the handle never crosses threads.
    pub async fn run_job(
        &self,
        audio_path: &Path,
        image_path: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let backend = self.backend.clone();
        let locator = self.locator.clone();
        let audio_path = audio_path.to_path_buf();
        let image_path = image_path.to_path_buf();
        let output_dir = output_dir.to_path_buf();

        tokio::task::spawn_blocking(move || {
            adapter::synthesize(
                backend.as_ref(),
                &locator,
                &audio_path,
                &image_path,
                &output_dir,
            )
        })
        .await
        .map_err(|e| Error::EngineFailure(format!("synthesis task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::install_fake_engine;
    use crate::store::{ArtifactStore, AvatarRecord, AvatarState};
    use crate::upload::{persist_pair, Upload};
    use tempfile::TempDir;

    struct WritingBackend;

    impl SynthesisBackend for WritingBackend {
        fn run(&self, _: &EngineHandle, _: &Path, _: &Path, output: &Path) -> Result<()> {
            std::fs::write(output, b"video")?;
            Ok(())
        }
    }

    fn runtime_for(dir: &TempDir) -> SynthesisRuntime {
        let engine_root = dir.path().join("engine");
        install_fake_engine(&engine_root);
        let config = EngineConfig {
            uploads_dir: dir.path().join("uploads"),
            outputs_dir: dir.path().join("generated"),
            engine_dirs: vec![engine_root],
            ..EngineConfig::default()
        };
        SynthesisRuntime::with_backend(config, Arc::new(WritingBackend))
    }

    fn wav(name: &str) -> Upload {
        Upload {
            name: name.to_string(),
            content_type: "audio/wav".to_string(),
            bytes: b"RIFF".to_vec(),
        }
    }

    fn jpg(name: &str) -> Upload {
        Upload {
            name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: b"JFIF".to_vec(),
        }
    }

    #[tokio::test]
    async fn run_job_produces_output() {
        let dir = TempDir::new().unwrap();
        let runtime = runtime_for(&dir);

        let audio = dir.path().join("voice.wav");
        let image = dir.path().join("portrait.jpg");
        std::fs::write(&audio, b"RIFF").unwrap();
        std::fs::write(&image, b"JFIF").unwrap();

        let out = runtime
            .run_job(&audio, &image, &runtime.config().outputs_dir)
            .await
            .unwrap();
        assert!(out.is_file());
    }

    #[tokio::test]
    async fn adapter_errors_propagate_unchanged() {
        let dir = TempDir::new().unwrap();
        let runtime = runtime_for(&dir);
        let err = runtime
            .run_job(
                Path::new("/nonexistent/voice.wav"),
                Path::new("/nonexistent/portrait.jpg"),
                &runtime.config().outputs_dir,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    /// Full upload → job → store pipeline for N concurrent requests.
    #[tokio::test]
    async fn concurrent_jobs_yield_distinct_generated_records() {
        let dir = TempDir::new().unwrap();
        let runtime = Arc::new(runtime_for(&dir));
        let store = Arc::new(ArtifactStore::new(runtime.config().outputs_dir.clone()));

        let mut handles = Vec::new();
        for i in 0..4 {
            let runtime = runtime.clone();
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let audio = wav(&format!("voice-{i}.wav"));
                let image = jpg(&format!("portrait-{i}.jpg"));
                let uploads_dir = runtime.config().uploads_dir.clone();
                let outputs_dir = runtime.config().outputs_dir.clone();

                let (audio_path, image_path) =
                    persist_pair(&audio, &image, &uploads_dir).await.unwrap();
                let output = runtime
                    .run_job(&audio_path, &image_path, &outputs_dir)
                    .await
                    .unwrap();

                let filename = output.file_name().unwrap().to_string_lossy().into_owned();
                let record = AvatarRecord::new(filename, audio.name, image.name);
                store.add(record.clone()).await;
                record.id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        let generated = store.list(AvatarState::Generated).await;
        assert_eq!(generated.len(), 4);
        for id in &ids {
            assert!(generated.iter().any(|r| &r.id == id));
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4, "ids must be distinct");
        assert!(store.list(AvatarState::Pushed).await.is_empty());
    }
}
