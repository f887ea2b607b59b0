//! Filesystem introspection endpoint

use std::collections::BTreeMap;
use std::path::Path;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct DebugFilesResponse {
    pub success: bool,
    pub directories: BTreeMap<String, DirectoryStatus>,
    pub engine: EngineStatus,
}

#[derive(Serialize)]
pub struct DirectoryStatus {
    pub exists: bool,
    pub path: String,
    pub files: Vec<String>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct EngineStatus {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// List the service's working directories and probe the engine installation.
pub async fn list_files(State(state): State<AppState>) -> Json<DebugFilesResponse> {
    let mut directories = BTreeMap::new();
    for (label, dir) in [
        ("uploads", &state.config.uploads_dir),
        ("generated", &state.config.outputs_dir),
        ("static", &state.config.static_dir),
    ] {
        directories.insert(label.to_string(), inspect_dir(dir).await);
    }

    let engine = match state.runtime.probe_engine() {
        Ok(handle) => EngineStatus {
            found: true,
            root: Some(handle.root.display().to_string()),
            message: None,
        },
        Err(err) => EngineStatus {
            found: false,
            root: None,
            message: Some(err.to_string()),
        },
    };

    Json(DebugFilesResponse {
        success: true,
        directories,
        engine,
    })
}

async fn inspect_dir(dir: &Path) -> DirectoryStatus {
    let exists = dir.exists();
    let mut files = Vec::new();
    if exists {
        if let Ok(mut entries) = tokio::fs::read_dir(dir).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                    files.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
        files.sort();
    }
    DirectoryStatus {
        exists,
        path: dir.display().to_string(),
        count: files.len(),
        files,
    }
}
