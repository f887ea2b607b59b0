use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input file not found or empty: {0}")]
    InputNotFound(PathBuf),

    #[error("invalid upload: {0}")]
    InvalidUploadType(String),

    #[error("failed to save upload: {0}")]
    SaveFailed(String),

    #[error("synthesis engine not found; tried: {0}")]
    EngineNotFound(String),

    #[error("engine assets missing at `{0}`")]
    AssetsMissing(PathBuf),

    #[error("engine failure: {0}")]
    EngineFailure(String),

    #[error("engine reported success but no output exists at `{0}`")]
    OutputNotProduced(PathBuf),

    #[error("avatar not found: {0}")]
    NotFound(String),

    #[error("failed to delete avatar file `{path}`: {reason}")]
    FileDeleteFailed { path: PathBuf, reason: String },

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
