//! Verified synthesis invocation.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::engine::backend::SynthesisBackend;
use crate::engine::locator::EngineLocator;
use crate::error::{Error, Result};

/// Suffix appended to the audio stem to name the produced video.
const OUTPUT_SUFFIX: &str = "_avatar.mp4";

/// Run one full synthesis pass and return the absolute output path.
///
/// Blocking; callers reach this through `SynthesisRuntime::run_job`. The
/// engine is resolved once per invocation, never cached. The engine's own
/// success signal is not trusted: the derived output file must exist on
/// disk afterwards.
pub fn synthesize(
    backend: &dyn SynthesisBackend,
    locator: &EngineLocator,
    audio_path: &Path,
    image_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let audio_abs = existing_non_empty(audio_path)?;
    let image_abs = existing_non_empty(image_path)?;

    std::fs::create_dir_all(output_dir)?;
    let output_dir = std::fs::canonicalize(output_dir)?;

    let engine = locator.locate()?;

    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());
    let output_abs = output_dir.join(format!("{stem}{OUTPUT_SUFFIX}"));

    info!(
        "synthesizing {} + {} -> {}",
        audio_abs.display(),
        image_abs.display(),
        output_abs.display()
    );

    backend.run(&engine, &audio_abs, &image_abs, &output_abs)?;

    if !output_abs.is_file() {
        return Err(Error::OutputNotProduced(output_abs));
    }

    info!("synthesis produced {}", output_abs.display());
    Ok(output_abs)
}

fn existing_non_empty(path: &Path) -> Result<PathBuf> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(std::fs::canonicalize(path)?),
        _ => Err(Error::InputNotFound(path.to_path_buf())),
    }
}
