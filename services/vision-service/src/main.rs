use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use vp_api_types::ErrorResponse;
use vp_gallery::{GalleryError, GalleryStore};
use vp_storage::{FlagStore, InMemoryFlagStore, JsonFileFlagStore};
use vp_studio::{Studio, StudioError, WalletError, WalletSession};
use vp_wallet_phantom::{MockMinter, PhantomMockAdapter};

mod config;
mod gallery;
mod generate;
mod wallet;

use config::ServiceConfig;

#[derive(Debug, Serialize)]
struct HealthResponse {
    service: &'static str,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);
pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) studio: Arc<Studio>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServiceConfig::from_env()?;
    let state = build_state(&config);
    state.studio.wallet().spawn_auto_reconnect();

    let app = app(state, config.body_limit());

    info!("vision-service listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(config: &ServiceConfig) -> AppState {
    let flags: Arc<dyn FlagStore> = match &config.flag_store_path {
        Some(path) => {
            info!("wallet flag persisted at {}", path.display());
            Arc::new(JsonFileFlagStore::new(path.clone()))
        }
        None => Arc::new(InMemoryFlagStore::default()),
    };

    let adapter = PhantomMockAdapter::new(config.connect_latency, config.disconnect_latency);
    let wallet = Arc::new(WalletSession::new(Arc::new(adapter), flags));
    let studio = Studio::new(
        Arc::new(GalleryStore::new()),
        wallet,
        Arc::new(MockMinter::new(config.mint_delay)),
        config.studio.clone(),
    );

    AppState {
        studio: Arc::new(studio),
    }
}

fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/wallet", get(wallet::wallet_status))
        .route("/wallet/connect", post(wallet::wallet_connect))
        .route("/wallet/disconnect", post(wallet::wallet_disconnect))
        .route("/generate", get(generate::generate_snapshot))
        .route("/generate/upload", post(generate::generate_upload))
        .route("/generate/next", post(generate::generate_next))
        .route("/generate/settings", put(generate::generate_settings))
        .route("/generate/start", post(generate::generate_start))
        .route("/generate/refine", post(generate::generate_refine))
        .route("/generate/start-over", post(generate::generate_start_over))
        .route("/generate/mint", post(generate::generate_mint))
        .route("/generate/share", post(generate::generate_share))
        .route("/generate/download", get(generate::generate_download))
        .route("/gallery", get(gallery::gallery_list))
        .route("/gallery/{id}", get(gallery::gallery_get))
        .route("/gallery/{id}/like", post(gallery::gallery_like))
        .route("/gallery/{id}/share", post(gallery::gallery_share))
        .route("/gallery/{id}/mint", post(gallery::gallery_mint))
        .route("/gallery/{id}/download", get(gallery::gallery_download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "vision-service",
        status: "ok",
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "vision-service",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub(crate) fn bad_request(message: &str) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, message)
}

pub(crate) fn not_found(message: &str) -> ApiError {
    error_response(StatusCode::NOT_FOUND, message)
}

pub(crate) fn conflict(message: &str) -> ApiError {
    error_response(StatusCode::CONFLICT, message)
}

pub(crate) fn internal_error(err: impl std::fmt::Display) -> ApiError {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub(crate) fn studio_error(err: StudioError) -> ApiError {
    let message = err.to_string();
    match &err {
        StudioError::Wizard(inner) if inner.is_conflict() => conflict(&message),
        StudioError::Wizard(_) | StudioError::WalletNotConnected => bad_request(&message),
        StudioError::Gallery(GalleryError::NotFound(_)) => not_found(&message),
        StudioError::Gallery(GalleryError::WalletNotConnected) => bad_request(&message),
        StudioError::Wallet(WalletError::ConnectInFlight | WalletError::DisconnectInFlight) => conflict(&message),
        StudioError::Wallet(_) | StudioError::Mint(_) => internal_error(message),
    }
}
