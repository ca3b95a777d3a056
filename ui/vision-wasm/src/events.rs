//! Event binding.
//!
//! Wires all UI event listeners. Async handlers are spawned with
//! `wasm_bindgen_futures::spawn_local`.

use crate::dom::Elements;
use crate::gallery;
use crate::router::{self, Route};
use crate::wallet;
use crate::wizard;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Switches route and runs the per-view refresh.
pub fn enter_route(els: &Elements, route: Route, push: bool) {
    if push {
        router::navigate(els, route);
    } else {
        router::show(els, route);
    }

    match route {
        Route::Gallery => {
            gallery::on_enter(els);
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                gallery::load(&els2).await;
            });
        }
        Route::Generate => wizard::render(els),
        Route::Landing => {}
    }
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Navigation ──
    for link in &els.nav_links {
        let route = Route::from_path(&link.get_attribute("data-route").unwrap_or_default());
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
            event.prevent_default();
            enter_route(&els2, route, true);
        }) as Box<dyn FnMut(_)>);
        link.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::PopStateEvent| {
            enter_route(&els2, router::current(), false);
        }) as Box<dyn FnMut(_)>);
        web_sys::window()
            .unwrap()
            .add_event_listener_with_callback("popstate", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Wallet ──
    on_click_async!(els.wallet_btn, els, wallet::on_wallet_click);

    // ── Wizard ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let els3 = els2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                wizard::on_files_selected(&els3).await;
            });
        }) as Box<dyn FnMut(_)>);
        els.file_input
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            wizard::on_guidance_input(&els2);
        }) as Box<dyn FnMut(_)>);
        els.guidance_input
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    on_click_async!(els.next_btn, els, wizard::on_next);
    on_click_async!(els.generate_btn, els, wizard::on_generate);
    on_click_async!(els.refine_btn, els, wizard::on_refine);
    on_click_async!(els.start_over_btn, els, wizard::on_start_over);
    on_click_async!(els.mint_btn, els, wizard::on_mint);
    on_click_async!(els.download_btn, els, wizard::on_download);
    on_click_async!(els.share_btn, els, wizard::on_share);

    // ── Gallery ──
    on_click_async!(els.detail_like_btn, els, gallery::on_like);
    on_click_async!(els.detail_mint_btn, els, gallery::on_mint);
    on_click_async!(els.detail_download_btn, els, gallery::on_download);
    on_click_async!(els.detail_share_btn, els, gallery::on_share);
    {
        let els2 = els.clone();
        on_click!(els.detail_close_btn, move |_: web_sys::MouseEvent| {
            gallery::on_close_detail(&els2);
        });
    }
}
