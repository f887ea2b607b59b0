//! Avatar lifecycle endpoints

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use chiso_core::store::{AvatarRecord, AvatarState};
use chiso_core::upload::{self, Upload};

use crate::error::ApiError;
use crate::state::AppState;

/// A record plus the public URL its video is served from.
#[derive(Serialize)]
pub struct AvatarDto {
    #[serde(flatten)]
    record: AvatarRecord,
    url: String,
}

impl From<AvatarRecord> for AvatarDto {
    fn from(record: AvatarRecord) -> Self {
        let url = format!("/generated/{}", record.filename);
        Self { record, url }
    }
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub success: bool,
    pub avatar: AvatarDto,
}

#[derive(Serialize)]
pub struct AvatarListResponse {
    pub success: bool,
    pub avatars: Vec<AvatarDto>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Generate an avatar video from an uploaded audio clip and portrait image.
pub async fn generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, ApiError> {
    let mut audio: Option<Upload> = None;
    let mut media: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart payload: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "audio_file" => audio = Some(read_upload(field).await?),
            "media_file" => media = Some(read_upload(field).await?),
            _ => {}
        }
    }

    let audio = audio.ok_or_else(|| ApiError::bad_request("no audio file uploaded"))?;
    let media = media.ok_or_else(|| ApiError::bad_request("no media file uploaded"))?;

    info!(
        "avatar generation request: audio `{}`, media `{}`",
        audio.name, media.name
    );

    let (audio_path, image_path) =
        upload::persist_pair(&audio, &media, &state.config.uploads_dir).await?;

    let output = match state
        .runtime
        .run_job(&audio_path, &image_path, &state.config.outputs_dir)
        .await
    {
        Ok(path) => path,
        Err(err) => {
            error!("avatar generation failed: {err}");
            // The inputs are not owned by any record yet; remove them so a
            // failed request leaves nothing behind.
            upload::cleanup(&[&audio_path, &image_path]).await;
            return Err(err.into());
        }
    };

    let filename = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let record = AvatarRecord::new(filename, audio.name, media.name);
    state.store.add(record.clone()).await;
    info!("avatar generated: {}", record.id);

    Ok(Json(AvatarResponse {
        success: true,
        avatar: record.into(),
    }))
}

/// List all generated avatars.
pub async fn list_generated(State(state): State<AppState>) -> Json<AvatarListResponse> {
    let avatars = state.store.list(AvatarState::Generated).await;
    Json(AvatarListResponse {
        success: true,
        avatars: avatars.into_iter().map(AvatarDto::from).collect(),
    })
}

/// List all pushed avatars.
pub async fn list_pushed(State(state): State<AppState>) -> Json<AvatarListResponse> {
    let avatars = state.store.list(AvatarState::Pushed).await;
    Json(AvatarListResponse {
        success: true,
        avatars: avatars.into_iter().map(AvatarDto::from).collect(),
    })
}

/// Move an avatar from the generated list to the pushed list.
pub async fn push(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let record = state.store.push(&id).await?;
    Ok(Json(AvatarResponse {
        success: true,
        avatar: record.into(),
    }))
}

/// Delete an avatar from either list along with its video file.
pub async fn delete_avatar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(&id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Avatar deleted.",
    }))
}

async fn read_upload(field: Field<'_>) -> Result<Upload, ApiError> {
    let name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("failed reading multipart field: {e}")))?;
    Ok(Upload {
        name,
        content_type,
        bytes: bytes.to_vec(),
    })
}
