//! Global application state.
//!
//! `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded). The
//! service owns the real wizard; this is the last copy the UI rendered.

use gloo_storage::{LocalStorage, Storage};
use std::cell::RefCell;
use vp_api_types::{GalleryItem, WALLET_CONNECTED_KEY, WALLET_CONNECTED_VALUE, WalletStatusResponse, WizardSnapshot};

use crate::router::Route;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub route: Route,
    pub snapshot: Option<WizardSnapshot>,
    pub wallet: WalletStatusResponse,
    pub gallery: Vec<GalleryItem>,
    pub selected_item: Option<String>,
    /// Bumped whenever a progress poll loop should stop.
    pub poll_token: u64,
}

// ── Thread-local singleton ──

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn route() -> Route {
    with(|s| s.route)
}

pub fn set_route(route: Route) {
    with_mut(|s| s.route = route);
}

pub fn snapshot() -> Option<WizardSnapshot> {
    with(|s| s.snapshot.clone())
}

pub fn set_snapshot(snapshot: WizardSnapshot) {
    with_mut(|s| s.snapshot = Some(snapshot));
}

pub fn wallet() -> WalletStatusResponse {
    with(|s| s.wallet.clone())
}

pub fn set_wallet(status: WalletStatusResponse) {
    with_mut(|s| s.wallet = status);
}

pub fn gallery() -> Vec<GalleryItem> {
    with(|s| s.gallery.clone())
}

pub fn set_gallery(items: Vec<GalleryItem>) {
    with_mut(|s| {
        if let Some(selected) = &s.selected_item {
            if !items.iter().any(|item| &item.id == selected) {
                s.selected_item = None;
            }
        }
        s.gallery = items;
    });
}

pub fn update_gallery_item(item: GalleryItem) {
    with_mut(|s| {
        if let Some(slot) = s.gallery.iter_mut().find(|existing| existing.id == item.id) {
            *slot = item;
        }
    });
}

pub fn selected_item() -> Option<GalleryItem> {
    with(|s| {
        let id = s.selected_item.as_ref()?;
        s.gallery.iter().find(|item| &item.id == id).cloned()
    })
}

pub fn set_selected_item(id: Option<String>) {
    with_mut(|s| s.selected_item = id);
}

/// Starts a new poll generation and returns its token.
pub fn next_poll_token() -> u64 {
    with_mut(|s| {
        s.poll_token += 1;
        s.poll_token
    })
}

pub fn poll_token() -> u64 {
    with(|s| s.poll_token)
}

// ── localStorage helpers ──

fn storage() -> web_sys::Storage {
    LocalStorage::raw()
}

pub fn local_get(key: &str) -> Option<String> {
    storage().get_item(key).ok()?
}

pub fn local_set(key: &str, value: &str) {
    let _ = storage().set_item(key, value);
}

pub fn local_remove(key: &str) {
    let _ = storage().remove_item(key);
}

/// Only the literal `"true"` counts as a remembered connection.
pub fn is_connected_flag(value: Option<&str>) -> bool {
    value == Some(WALLET_CONNECTED_VALUE)
}

pub fn remembered_connection() -> bool {
    is_connected_flag(local_get(WALLET_CONNECTED_KEY).as_deref())
}

pub fn remember_connection(connected: bool) {
    if connected {
        local_set(WALLET_CONNECTED_KEY, WALLET_CONNECTED_VALUE);
    } else {
        local_remove(WALLET_CONNECTED_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_literal_true_restores_connection() {
        assert!(is_connected_flag(Some("true")));
        assert!(!is_connected_flag(Some("TRUE")));
        assert!(!is_connected_flag(Some("1")));
        assert!(!is_connected_flag(None));
    }

    #[test]
    fn poll_tokens_increase() {
        let first = next_poll_token();
        let second = next_poll_token();
        assert!(second > first);
        assert_eq!(poll_token(), second);
    }
}
