use std::io;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::card::{self, CardRequest};
use crate::config::{CardConfig, ResponseMode};
use crate::error::CardError;
use crate::openapi::ApiDoc;
use crate::resources::ResourceCache;
use crate::util;

pub struct AppState {
    pub cfg: CardConfig,
    pub resources: ResourceCache,
}

impl AppState {
    pub fn new(cfg: CardConfig) -> Self {
        AppState { cfg, resources: ResourceCache::new() }
    }
}

/// The full application router. `main` serves it; the HTTP tests drive
/// it directly through tower.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .route("/generate", post(generate))
        .route("/cards/:name", get(serve_card))
        .route("/health", get(health))
        .route("/status", get(status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Quote text to lay out on the card.
    pub text: String,
    /// Link encoded into the QR code.
    pub url: String,
    /// Optional page title, drawn above the QR code.
    pub title: Option<String>,
    /// Background template index, first template by default.
    #[serde(default)]
    pub template: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub success: bool,
    /// Either an inline `data:` URI or a `/cards/<name>` path,
    /// depending on the configured response mode.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(
    post,
    path = "/generate",
    tag = "cardgen",
    request_body = GenerateRequest,
    responses(
        (status = 200, body = GenerateResponse),
        (status = 400, description = "Invalid text, url or template index"),
        (status = 500, description = "Render or resource failure")
    )
)]
pub async fn generate(
    State(st): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, CardError> {
    info!(
        text_chars = req.text.chars().count(),
        template = req.template,
        "card generation requested"
    );
    let started = Instant::now();
    let card_req = CardRequest {
        text: &req.text,
        url: &req.url,
        title: req.title.as_deref(),
        template: req.template,
    };
    let png = card::render_png(&st.cfg, &st.resources, &card_req)?;
    info!(
        bytes = png.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "card generated"
    );

    let image_url = match st.cfg.response_mode {
        ResponseMode::Base64 => util::png_data_uri(&png),
        ResponseMode::File => {
            let name = util::card_file_name(&png);
            save_card(&st.cfg, &name, &png).await?;
            format!("/cards/{name}")
        }
    };
    Ok(Json(GenerateResponse { success: true, image_url }))
}

async fn save_card(cfg: &CardConfig, name: &str, png: &[u8]) -> Result<(), CardError> {
    tokio::fs::create_dir_all(&cfg.cards_dir)
        .await
        .map_err(|e| CardError::Render(format!("create {} failed: {e}", cfg.cards_dir.display())))?;
    let path = cfg.cards_dir.join(name);
    tokio::fs::write(&path, png)
        .await
        .map_err(|e| CardError::Render(format!("write {} failed: {e}", path.display())))
}

#[utoipa::path(
    get,
    path = "/cards/{name}",
    tag = "cardgen",
    params(("name" = String, Path, description = "Saved card file name")),
    responses(
        (status = 200, description = "Card PNG", content_type = "image/png"),
        (status = 404, description = "Unknown, expired or already swept card")
    )
)]
pub async fn serve_card(
    State(st): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !util::is_safe_card_name(&name) {
        return Err((StatusCode::NOT_FOUND, "card not found".into()));
    }
    // the cleanup task may delete the file between response and fetch;
    // that race is an ordinary 404
    match tokio::fs::read(st.cfg.cards_dir.join(&name)).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err((StatusCode::NOT_FOUND, "card not found".into()))
        }
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

#[utoipa::path(get, path = "/health", tag = "cardgen", responses((status = 200, body = HealthResponse)))]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".into() })
}

/// Liveness probe the extension hits before posting a generate request.
#[utoipa::path(get, path = "/status", tag = "cardgen", responses((status = 200, description = "Server is up, with the template count")))]
pub async fn status(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "running",
        "templates": st.cfg.templates.len(),
    }))
}
