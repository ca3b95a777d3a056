//! Client-side routes: `/`, `/generate`, `/gallery`.

use wasm_bindgen::JsValue;

use crate::dom::{self, Elements};
use crate::state;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Landing,
    Generate,
    Gallery,
}

impl Route {
    /// Unknown paths fall back to the landing page.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/generate" => Route::Generate,
            "/gallery" => Route::Gallery,
            _ => Route::Landing,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Generate => "/generate",
            Route::Gallery => "/gallery",
        }
    }
}

pub fn current() -> Route {
    let path = dom::window().location().pathname().unwrap_or_default();
    Route::from_path(&path)
}

/// Pushes a history entry and switches the visible view.
pub fn navigate(els: &Elements, route: Route) {
    if route != state::route() {
        if let Ok(history) = dom::window().history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(route.path()));
        }
    }
    show(els, route);
}

/// Switches the visible view without touching history (used for popstate).
pub fn show(els: &Elements, route: Route) {
    state::set_route(route);
    dom::show(&els.landing_view, route == Route::Landing);
    dom::show(&els.generate_view, route == Route::Generate);
    dom::show(&els.gallery_view, route == Route::Gallery);

    for link in &els.nav_links {
        let target = link.get_attribute("data-route").unwrap_or_default();
        dom::toggle_class(link, "active", Route::from_path(&target) == route);
    }
}
