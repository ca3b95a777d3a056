//! Wallet button and connection lifecycle.
//!
//! The service holds the connection; the browser only remembers that a
//! connection existed (`walletConnected`) so it can reconnect on load.

use vp_api_types::{WalletConnectResponse, WalletPublicKey, WalletStatusResponse};

use crate::api;
use crate::dom::{self, Elements};
use crate::state;
use crate::toast;

pub fn button_label(status: &WalletStatusResponse) -> String {
    match (&status.public_key, status.connecting) {
        (_, true) => "Connecting...".to_string(),
        (Some(key), false) if status.connected => WalletPublicKey(key.clone()).short(),
        _ => "Connect Wallet".to_string(),
    }
}

pub fn render(els: &Elements) {
    let status = state::wallet();
    dom::set_text(&els.wallet_btn, &button_label(&status));
    dom::toggle_class(&els.wallet_btn, "connected", status.connected);
    dom::set_disabled(&els.wallet_btn, status.connecting);
}

/// Click on the wallet button: connect or disconnect depending on state.
pub async fn on_wallet_click(els: &Elements) {
    let status = state::wallet();
    if status.connecting {
        return;
    }
    if status.connected {
        disconnect(els).await;
    } else {
        connect(els).await;
    }
}

pub async fn connect(els: &Elements) {
    state::set_wallet(WalletStatusResponse {
        connected: false,
        connecting: true,
        public_key: None,
    });
    render(els);

    match api::request_as::<WalletConnectResponse>("/wallet/connect", "POST", None).await {
        Ok(response) => {
            state::remember_connection(response.status.connected);
            state::set_wallet(response.status);
            toast::success(els, &response.message);
        }
        Err(e) => {
            gloo_console::warn!(format!("wallet connect failed: {}", e));
            state::set_wallet(WalletStatusResponse::default());
            toast::error(els, "Failed to connect wallet");
        }
    }
    render(els);
}

pub async fn disconnect(els: &Elements) {
    match api::request_as::<WalletConnectResponse>("/wallet/disconnect", "POST", None).await {
        Ok(response) => {
            state::remember_connection(false);
            state::set_wallet(response.status);
            toast::info(els, &response.message);
        }
        Err(e) => {
            gloo_console::warn!(format!("wallet disconnect failed: {}", e));
            toast::error(els, "Failed to disconnect wallet");
        }
    }
    render(els);
}

/// Syncs with the service and, if the browser remembers a connection the
/// service no longer has, reconnects in the background.
pub async fn restore(els: &Elements) {
    match api::request_as::<WalletStatusResponse>("/wallet", "GET", None).await {
        Ok(status) => state::set_wallet(status),
        Err(e) => gloo_console::warn!(format!("wallet status unavailable: {}", e)),
    }
    render(els);

    let status = state::wallet();
    if !status.connected && !status.connecting && state::remembered_connection() {
        let els = els.clone();
        wasm_bindgen_futures::spawn_local(async move {
            connect(&els).await;
        });
    }
}
