//! Invocation seam over the opaque synthesis engine.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::engine::locator::EngineHandle;
use crate::error::{Error, Result};

/// Blocking entry point of the external synthesis engine.
///
/// Implementations must be callable from the worker pool; the production
/// backend is stateless, test backends simulate engine behavior.
pub trait SynthesisBackend: Send + Sync {
    /// Run one synthesis pass. Blocks until the engine finishes.
    ///
    /// All three paths are absolute. A successful return does not guarantee
    /// the output file exists; the adapter verifies that separately.
    fn run(&self, engine: &EngineHandle, audio: &Path, image: &Path, output: &Path) -> Result<()>;
}

/// Invokes the located engine's launcher as a child process.
#[derive(Debug, Default)]
pub struct ProcessBackend;

impl SynthesisBackend for ProcessBackend {
    fn run(&self, engine: &EngineHandle, audio: &Path, image: &Path, output: &Path) -> Result<()> {
        info!(
            "invoking synthesis launcher `{}` for {}",
            engine.launcher.display(),
            audio.display()
        );

        let result = Command::new(&engine.launcher)
            .current_dir(&engine.root)
            .arg("--audio")
            .arg(audio)
            .arg("--image")
            .arg(image)
            .arg("--output")
            .arg(output)
            .arg("--checkpoints")
            .arg(&engine.checkpoints)
            .arg("--cfg")
            .arg(&engine.config_file)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|error| {
                Error::EngineFailure(format!(
                    "failed to launch `{}`: {error}",
                    engine.launcher.display()
                ))
            })?;

        if !result.status.success() {
            let status = result.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(engine_exit_failure(status, stderr.trim()));
        }

        debug!("synthesis launcher finished for {}", output.display());
        Ok(())
    }
}

fn engine_exit_failure(status: i32, stderr: &str) -> Error {
    if stderr.is_empty() {
        Error::EngineFailure(format!("launcher exited with status {status}"))
    } else {
        Error::EngineFailure(format!(
            "launcher exited with status {status}; stderr: {stderr}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_failure_without_stderr_omits_suffix() {
        let err = engine_exit_failure(2, "");
        assert_eq!(
            err.to_string(),
            "engine failure: launcher exited with status 2"
        );
    }

    #[test]
    fn exit_failure_carries_trimmed_stderr() {
        let err = engine_exit_failure(1, "weights checksum mismatch");
        let text = err.to_string();
        assert!(text.contains("status 1"));
        assert!(text.contains("weights checksum mismatch"));
    }

    #[test]
    fn missing_launcher_is_engine_failure() {
        let engine = EngineHandle {
            root: std::env::temp_dir(),
            checkpoints: std::env::temp_dir(),
            config_file: std::env::temp_dir().join("model.json"),
            launcher: std::path::PathBuf::from("/nonexistent/bin/synthesize"),
        };
        let err = ProcessBackend
            .run(
                &engine,
                Path::new("/tmp/a.wav"),
                Path::new("/tmp/i.jpg"),
                Path::new("/tmp/out.mp4"),
            )
            .unwrap_err();
        assert!(
            matches!(err, Error::EngineFailure(_)),
            "expected EngineFailure, got: {err:?}"
        );
    }
}
