//! HTTP boundary.
//!
//! - `GET /boltzmann`: run one simulation and return it as a looping GIF.
//!
//! Each request builds its own graph, backend and encoder on a blocking worker thread; the only
//! shared state is the immutable configuration.

mod error;

pub use error::{ApiError, ErrorBody};

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::foundation::error::BoltzResult;
use crate::pipeline::{AnimationConfig, render_gif};

/// Shared, read-only server state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Parameters used for every request.
    pub config: AnimationConfig,
}

impl AppState {
    /// Validate `config` and wrap it for the router.
    pub fn new(config: AnimationConfig) -> BoltzResult<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(Self { config }))
    }
}

/// Build the router with request tracing.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/boltzmann", get(boltzmann_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Handler for GET /boltzmann.
pub async fn boltzmann_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let config = state.config.clone();
    let anim = tokio::task::spawn_blocking(move || render_gif(&config)).await??;
    info!(
        frames = anim.frame_count,
        bytes = anim.bytes.len(),
        "boltzmann_gif_served"
    );
    Ok(([(header::CONTENT_TYPE, anim.content_type)], anim.bytes).into_response())
}
