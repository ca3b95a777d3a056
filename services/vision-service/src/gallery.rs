use axum::{
    Json,
    extract::{Path, State},
};
use vp_api_types::{DownloadResponse, GalleryItem, GalleryResponse, NoticeResponse};

use crate::{ApiResult, AppState, studio_error};

pub(crate) async fn gallery_list(State(state): State<AppState>) -> Json<GalleryResponse> {
    Json(GalleryResponse {
        items: state.studio.gallery().list().await,
    })
}

pub(crate) async fn gallery_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<GalleryItem> {
    state.studio.gallery_item(&id).await.map(Json).map_err(studio_error)
}

pub(crate) async fn gallery_like(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<GalleryItem> {
    state.studio.like_item(&id).await.map(Json).map_err(studio_error)
}

pub(crate) async fn gallery_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<NoticeResponse> {
    let message = state.studio.share_item(&id).await.map_err(studio_error)?;
    Ok(Json(NoticeResponse { message }))
}

pub(crate) async fn gallery_mint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<NoticeResponse> {
    let message = state.studio.mint_item(&id).await.map_err(studio_error)?;
    Ok(Json(NoticeResponse { message }))
}

pub(crate) async fn gallery_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DownloadResponse> {
    let download = state.studio.download_item(&id).await.map_err(studio_error)?;
    Ok(Json(DownloadResponse {
        image_url: download.image_url,
        file_name: download.file_name,
    }))
}
