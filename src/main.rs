use std::{net::SocketAddr, sync::Arc};

use cardgen::api::{self, AppState};
use cardgen::cleanup;
use cardgen::config::{CardConfig, ResponseMode};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::var("CARDGEN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("CARDGEN_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8000);

    let cfg = CardConfig::from_env().expect("invalid configuration");
    let state = AppState::new(cfg);
    state
        .resources
        .check(&state.cfg)
        .expect("missing card resources; run gen_templates or point CARDGEN_ASSETS at them");

    if state.cfg.response_mode == ResponseMode::File {
        cleanup::spawn(Arc::new(state.cfg.clone()));
    }

    let app = api::router(Arc::new(state));

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("bind addr");
    info!("Starting cardgen on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
