//! Upload validation and persistence.
//!
//! Inputs are validated before anything touches the disk; after writing,
//! both files are verified non-empty and any partial result is removed, so
//! a failed request never leaves stray input files behind.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};

/// One incoming file payload with its declared metadata.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Declared filename.
    pub name: String,
    /// Declared media type, e.g. `audio/wav`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    fn validate(&self, label: &str, category: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidUploadType(format!(
                "no {label} file uploaded"
            )));
        }
        let expected = format!("{category}/");
        if !self.content_type.starts_with(&expected) {
            return Err(Error::InvalidUploadType(format!(
                "invalid {label} file type: expected `{category}/*`, got `{}`",
                self.content_type
            )));
        }
        Ok(())
    }

    /// Extension from the declared name, with a category default.
    fn extension_or(&self, fallback: &str) -> String {
        Path::new(&self.name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Persist an audio/image pair under `work_dir`.
///
/// Returns the written paths. On any failure every file written by this
/// call is removed before the error is returned.
pub async fn persist_pair(
    audio: &Upload,
    image: &Upload,
    work_dir: &Path,
) -> Result<(PathBuf, PathBuf)> {
    audio.validate("audio", "audio")?;
    image.validate("media", "image")?;

    tokio::fs::create_dir_all(work_dir).await?;

    let pair_id = uuid::Uuid::new_v4();
    let audio_path = work_dir.join(format!("{pair_id}_audio{}", audio.extension_or(".wav")));
    let image_path = work_dir.join(format!("{pair_id}_media{}", image.extension_or(".jpg")));

    if let Err(err) = write_and_verify(audio, &audio_path).await {
        cleanup(&[&audio_path]).await;
        return Err(err);
    }
    if let Err(err) = write_and_verify(image, &image_path).await {
        cleanup(&[&audio_path, &image_path]).await;
        return Err(err);
    }

    info!(
        "saved uploads: {} ({} bytes), {} ({} bytes)",
        audio_path.display(),
        audio.bytes.len(),
        image_path.display(),
        image.bytes.len()
    );
    Ok((audio_path, image_path))
}

async fn write_and_verify(upload: &Upload, path: &Path) -> Result<()> {
    tokio::fs::write(path, &upload.bytes)
        .await
        .map_err(|error| Error::SaveFailed(format!("{}: {error}", path.display())))?;

    let written = tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0);
    if written == 0 {
        return Err(Error::SaveFailed(format!(
            "{}: saved file is empty",
            path.display()
        )));
    }
    Ok(())
}

/// Best-effort removal of partially written inputs.
pub async fn cleanup(paths: &[&Path]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => warn!("cleaned up temporary file {}", path.display()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => warn!("failed to clean up {}: {error}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn wav(bytes: &[u8]) -> Upload {
        Upload {
            name: "voice.wav".to_string(),
            content_type: "audio/wav".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    fn jpg(bytes: &[u8]) -> Upload {
        Upload {
            name: "portrait.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn persists_both_files_with_extensions() {
        let dir = TempDir::new().unwrap();
        let (audio_path, image_path) = persist_pair(&wav(b"RIFF"), &jpg(b"JFIF"), dir.path())
            .await
            .unwrap();

        assert!(audio_path.to_string_lossy().ends_with(".wav"));
        assert!(image_path.to_string_lossy().ends_with(".jpg"));
        assert_eq!(std::fs::read(&audio_path).unwrap(), b"RIFF");
        assert_eq!(std::fs::read(&image_path).unwrap(), b"JFIF");
    }

    #[tokio::test]
    async fn missing_extension_defaults_applied() {
        let dir = TempDir::new().unwrap();
        let audio = Upload {
            name: "voice".to_string(),
            content_type: "audio/wav".to_string(),
            bytes: b"RIFF".to_vec(),
        };
        let image = Upload {
            name: "portrait".to_string(),
            content_type: "image/png".to_string(),
            bytes: b"PNG".to_vec(),
        };
        let (audio_path, image_path) = persist_pair(&audio, &image, dir.path()).await.unwrap();
        assert!(audio_path.to_string_lossy().ends_with("_audio.wav"));
        assert!(image_path.to_string_lossy().ends_with("_media.jpg"));
    }

    #[tokio::test]
    async fn wrong_content_type_rejected_before_any_write() {
        let dir = TempDir::new().unwrap();
        let not_audio = Upload {
            name: "voice.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"hello".to_vec(),
        };
        let err = persist_pair(&not_audio, &jpg(b"JFIF"), dir.path())
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::InvalidUploadType(_)),
            "expected InvalidUploadType, got: {err:?}"
        );
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn empty_declared_name_rejected() {
        let dir = TempDir::new().unwrap();
        let unnamed = Upload {
            name: "  ".to_string(),
            content_type: "audio/wav".to_string(),
            bytes: b"RIFF".to_vec(),
        };
        let err = persist_pair(&unnamed, &jpg(b"JFIF"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUploadType(_)));
    }

    #[tokio::test]
    async fn empty_audio_fails_and_leaves_no_files() {
        let dir = TempDir::new().unwrap();
        let err = persist_pair(&wav(b""), &jpg(b"JFIF"), dir.path())
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::SaveFailed(_)),
            "expected SaveFailed, got: {err:?}"
        );
        assert!(
            dir_entries(dir.path()).is_empty(),
            "no partial uploads may survive"
        );
    }

    #[tokio::test]
    async fn empty_image_removes_already_written_audio() {
        let dir = TempDir::new().unwrap();
        let err = persist_pair(&wav(b"RIFF"), &jpg(b""), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SaveFailed(_)));
        assert!(
            dir_entries(dir.path()).is_empty(),
            "audio sibling must be cleaned up"
        );
    }
}
