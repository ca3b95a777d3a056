//! Gallery grid and detail panel.

use vp_api_types::{DownloadResponse, GalleryItem, GalleryResponse, NoticeResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::api;
use crate::dom::{self, Elements};
use crate::state;
use crate::toast;

pub const BROWSE_HINT: &str =
    "You can browse the gallery without connecting a wallet, but you'll need to connect to like or mint images.";

pub fn likes_label(item: &GalleryItem) -> String {
    match item.likes {
        1 => "1 like".to_string(),
        n => format!("{} likes", n),
    }
}

/// GET /gallery
pub async fn load(els: &Elements) {
    match api::request_as::<GalleryResponse>("/gallery", "GET", None).await {
        Ok(response) => {
            state::set_gallery(response.items);
            render(els);
        }
        Err(e) => gloo_console::warn!(format!("gallery unavailable: {}", e)),
    }
}

/// Opening the gallery without a wallet explains what is still possible.
pub fn on_enter(els: &Elements) {
    if !state::wallet().connected {
        toast::info(els, BROWSE_HINT);
    }
}

pub fn render(els: &Elements) {
    let items = state::gallery();
    els.gallery_grid.set_inner_html("");
    dom::show(&els.gallery_empty, items.is_empty());

    for item in &items {
        let card = dom::create_element("div");
        dom::add_class(&card, "gallery-card");

        let img = dom::create_element("img");
        let _ = img.set_attribute("src", &item.image_url);
        let _ = img.set_attribute("alt", &item.title);
        let _ = card.append_child(&img);

        let title = dom::create_element("h3");
        dom::set_text(&title, &item.title);
        let _ = card.append_child(&title);

        let meta = dom::create_element("span");
        dom::add_class(&meta, "gallery-meta");
        dom::set_text(&meta, &format!("{} · {}", item.created_at, likes_label(item)));
        let _ = card.append_child(&meta);

        let id = item.id.clone();
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            state::set_selected_item(Some(id.clone()));
            render_detail(&els2);
        }) as Box<dyn FnMut(_)>);
        card.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();

        let _ = els.gallery_grid.append_child(&card);
    }

    render_detail(els);
}

fn render_detail(els: &Elements) {
    let Some(item) = state::selected_item() else {
        dom::show(&els.gallery_detail, false);
        return;
    };

    els.detail_image.set_src(&item.image_url);
    dom::set_text(&els.detail_title, &item.title);
    dom::set_text(&els.detail_prompt, &item.prompt);
    dom::set_text(&els.detail_date, &item.created_at);
    dom::set_text(&els.detail_likes, &likes_label(&item));
    dom::toggle_class(&els.detail_like_btn, "liked", item.liked);
    dom::set_text(&els.detail_like_btn, if item.liked { "Unlike" } else { "Like" });
    dom::show(&els.gallery_detail, true);
}

pub fn on_close_detail(els: &Elements) {
    state::set_selected_item(None);
    render_detail(els);
}

fn selected_id() -> Option<String> {
    state::selected_item().map(|item| item.id)
}

/// POST /gallery/{id}/like
pub async fn on_like(els: &Elements) {
    let Some(id) = selected_id() else {
        return;
    };
    match api::request_as::<GalleryItem>(&format!("/gallery/{}/like", id), "POST", None).await {
        Ok(item) => {
            state::update_gallery_item(item);
            render(els);
        }
        Err(e) => toast::error(els, &e),
    }
}

/// POST /gallery/{id}/share
pub async fn on_share(els: &Elements) {
    let Some(id) = selected_id() else {
        return;
    };
    match api::request_as::<NoticeResponse>(&format!("/gallery/{}/share", id), "POST", None).await {
        Ok(notice) => toast::info(els, &notice.message),
        Err(e) => toast::error(els, &e),
    }
}

/// POST /gallery/{id}/mint
pub async fn on_mint(els: &Elements) {
    let Some(id) = selected_id() else {
        return;
    };
    match api::request_as::<NoticeResponse>(&format!("/gallery/{}/mint", id), "POST", None).await {
        Ok(notice) => toast::success(els, &notice.message),
        Err(e) => toast::error(els, &e),
    }
}

/// GET /gallery/{id}/download
pub async fn on_download(els: &Elements) {
    let Some(id) = selected_id() else {
        return;
    };
    match api::request_as::<DownloadResponse>(&format!("/gallery/{}/download", id), "GET", None).await {
        Ok(download) => {
            dom::download(&download.image_url, &download.file_name);
            toast::success(els, "Image downloaded");
        }
        Err(e) => toast::error(els, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(likes: u32) -> GalleryItem {
        GalleryItem {
            id: "a".to_string(),
            image_url: "https://example.invalid/a.svg".to_string(),
            title: "Your Generated Image".to_string(),
            prompt: "a fox".to_string(),
            created_at: "2026-01-01".to_string(),
            likes,
            liked: likes > 0,
        }
    }

    #[test]
    fn likes_are_pluralised() {
        assert_eq!(likes_label(&item(0)), "0 likes");
        assert_eq!(likes_label(&item(1)), "1 like");
        assert_eq!(likes_label(&item(3)), "3 likes");
    }
}
