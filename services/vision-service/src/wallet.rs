use axum::{Json, extract::State};
use tracing::info;
use vp_api_types::{WalletConnectResponse, WalletStatusResponse};
use vp_studio::ConnectOutcome;

use crate::{ApiResult, AppState, studio_error};

pub(crate) async fn wallet_status(State(state): State<AppState>) -> Json<WalletStatusResponse> {
    Json(state.studio.wallet().status().await)
}

pub(crate) async fn wallet_connect(State(state): State<AppState>) -> ApiResult<WalletConnectResponse> {
    let wallet = state.studio.wallet();
    let message = match wallet.connect().await.map_err(|err| studio_error(err.into()))? {
        ConnectOutcome::Connected(_) => "Wallet connected successfully!",
        ConnectOutcome::AlreadyConnected(_) => "Wallet already connected",
        ConnectOutcome::AlreadyConnecting => "Wallet connection already in progress",
    };

    Ok(Json(WalletConnectResponse {
        status: wallet.status().await,
        message: message.to_owned(),
    }))
}

pub(crate) async fn wallet_disconnect(State(state): State<AppState>) -> ApiResult<WalletConnectResponse> {
    let wallet = state.studio.wallet();
    let was_connected = wallet.disconnect().await.map_err(|err| studio_error(err.into()))?;
    if !was_connected {
        info!("disconnect requested without a connected wallet");
    }

    Ok(Json(WalletConnectResponse {
        status: wallet.status().await,
        message: "Wallet disconnected".to_owned(),
    }))
}
