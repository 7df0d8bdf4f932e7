use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while building a card.
#[derive(Debug, Error)]
pub enum CardError {
    /// A font, template or icon the config points at is not on disk.
    #[error("missing resource: {}", .path.display())]
    ResourceMissing { path: PathBuf },

    /// The caller sent something we refuse to render.
    #[error("{0}")]
    InvalidInput(String),

    /// Drawing, decoding or encoding failed unexpectedly.
    #[error("render failed: {0}")]
    Render(String),
}

impl CardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CardError::ResourceMissing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CardError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err = CardError::InvalidInput("text must not be empty".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_resource_is_server_side() {
        let err = CardError::ResourceMissing {
            path: PathBuf::from("assets/fonts/missing.ttf"),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("missing.ttf"));
    }
}
