//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<chiso_core::Error> for ApiError {
    fn from(err: chiso_core::Error) -> Self {
        use chiso_core::Error;
        match &err {
            Error::InvalidUploadType(_) | Error::InputNotFound(_) => {
                ApiError::bad_request(err.to_string())
            }
            Error::NotFound(_) => ApiError::not_found(err.to_string()),
            // Raw I/O failures may carry paths; keep the response generic.
            Error::Io(_) => ApiError::internal("an unexpected error occurred, please try again"),
            _ => ApiError::internal(err.to_string()),
        }
    }
}
