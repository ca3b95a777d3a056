use axum::{Json, extract::State};
use tracing::info;
use vp_api_types::{
    DownloadResponse, MintResponse, NoticeResponse, SettingsUpdateRequest, UploadRequest, UploadResponse,
    WizardSnapshot,
};
use vp_studio::{mint_notice, upload_notice};

use crate::{ApiResult, AppState, studio_error};

pub(crate) async fn generate_snapshot(State(state): State<AppState>) -> Json<WizardSnapshot> {
    Json(state.studio.snapshot().await)
}

pub(crate) async fn generate_upload(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> ApiResult<UploadResponse> {
    let (accepted, snapshot) = state.studio.upload(request.files).await.map_err(studio_error)?;
    Ok(Json(UploadResponse {
        accepted,
        message: upload_notice(accepted),
        snapshot,
    }))
}

pub(crate) async fn generate_next(State(state): State<AppState>) -> ApiResult<WizardSnapshot> {
    state.studio.next().await.map(Json).map_err(studio_error)
}

pub(crate) async fn generate_settings(
    State(state): State<AppState>,
    Json(request): Json<SettingsUpdateRequest>,
) -> ApiResult<WizardSnapshot> {
    state.studio.update_settings(request).await.map(Json).map_err(studio_error)
}

pub(crate) async fn generate_start(State(state): State<AppState>) -> ApiResult<WizardSnapshot> {
    state.studio.start_generation().await.map(Json).map_err(studio_error)
}

pub(crate) async fn generate_refine(State(state): State<AppState>) -> ApiResult<WizardSnapshot> {
    state.studio.refine().await.map(Json).map_err(studio_error)
}

pub(crate) async fn generate_start_over(State(state): State<AppState>) -> Json<WizardSnapshot> {
    info!("wizard reset requested");
    Json(state.studio.start_over().await)
}

pub(crate) async fn generate_mint(State(state): State<AppState>) -> ApiResult<MintResponse> {
    let mint_result = state.studio.mint().await.map_err(studio_error)?;
    Ok(Json(MintResponse {
        message: mint_notice(&mint_result),
        mint_result,
    }))
}

pub(crate) async fn generate_share(State(state): State<AppState>) -> ApiResult<NoticeResponse> {
    let message = state.studio.share_result().await.map_err(studio_error)?;
    Ok(Json(NoticeResponse { message }))
}

pub(crate) async fn generate_download(State(state): State<AppState>) -> ApiResult<DownloadResponse> {
    let download = state.studio.download().await.map_err(studio_error)?;
    Ok(Json(DownloadResponse {
        image_url: download.image_url,
        file_name: download.file_name,
    }))
}
