use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::foundation::error::BoltzError;

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub detail: String,
}

/// Failure of one `/boltzmann` request, as seen by the client.
#[derive(Debug)]
pub enum ApiError {
    /// A frame could not be rendered.
    ImageGeneration(String),
    /// The frames could not be combined into an animation.
    AnimationAssembly(String),
    /// Anything else, including a crashed worker task.
    Unexpected(String),
}

impl ApiError {
    /// Client-facing message; the prefix identifies the failure class.
    pub fn detail(&self) -> String {
        match self {
            Self::ImageGeneration(m) => format!("image generation failure: {m}"),
            Self::AnimationAssembly(m) => format!("animation assembly failure: {m}"),
            Self::Unexpected(m) => format!("unexpected failure: {m}"),
        }
    }
}

impl From<BoltzError> for ApiError {
    fn from(e: BoltzError) -> Self {
        match e {
            BoltzError::Render(m) => Self::ImageGeneration(m),
            BoltzError::Assembly(m) => Self::AnimationAssembly(m),
            other @ (BoltzError::Precondition(_) | BoltzError::Other(_)) => {
                Self::Unexpected(other.to_string())
            }
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Unexpected(format!("generation task did not complete: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.detail();
        match self {
            Self::Unexpected(_) => error!(%detail, "boltzmann_request_failed"),
            _ => warn!(%detail, "boltzmann_request_failed"),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { detail })).into_response()
    }
}
