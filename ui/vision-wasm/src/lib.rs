//! Vision Phantom WASM front-end
//!
//! Landing page, generation wizard and gallery rendered in Rust. All state
//! changes go through the vision-service HTTP API.

pub mod api;
pub mod dom;
pub mod events;
pub mod gallery;
pub mod router;
pub mod state;
pub mod toast;
pub mod wallet;
pub mod wizard;

use wasm_bindgen::prelude::*;

/// WASM entry point, called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    events::bind_events(&els);
    events::enter_route(&els, router::current(), false);

    // Reconnect happens in the background; the page is usable immediately.
    wallet::restore(&els).await;
    wizard::load(&els).await;
    gallery::load(&els).await;

    gloo_console::log!("vision-wasm ready");
    Ok(())
}
