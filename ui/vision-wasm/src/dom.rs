//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add a UI element, add a field
//! here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlTextAreaElement};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let nl = doc().query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

/// Shows or hides an element through the `hidden` class.
pub fn show(el: &Element, visible: bool) {
    toggle_class(el, "hidden", !visible);
}

pub fn set_disabled(el: &HtmlElement, disabled: bool) {
    if disabled {
        let _ = el.set_attribute("disabled", "");
    } else {
        let _ = el.remove_attribute("disabled");
    }
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

/// Triggers a browser download of `url` under `file_name`.
pub fn download(url: &str, file_name: &str) {
    let link: web_sys::HtmlAnchorElement = create_element("a").dyn_into().unwrap();
    link.set_href(url);
    link.set_download(file_name);
    if let Some(body) = doc().body() {
        let _ = body.append_child(&link);
        link.click();
        let _ = body.remove_child(&link);
    }
}

// ── Elements struct ──

/// All DOM element references used by the studio UI.
#[derive(Clone)]
pub struct Elements {
    // Shell
    pub nav_links: Vec<Element>,
    pub wallet_btn: HtmlElement,
    pub toast_container: Element,

    // Views
    pub landing_view: Element,
    pub generate_view: Element,
    pub gallery_view: Element,

    // Step indicator
    pub step_markers: Vec<Element>,
    pub start_over_btn: HtmlElement,

    // Upload
    pub step_upload: Element,
    pub file_input: HtmlInputElement,
    pub upload_preview: HtmlImageElement,
    pub upload_count: Element,
    pub next_btn: HtmlElement,

    // Prompt
    pub step_prompt: Element,
    pub prompt_input: HtmlTextAreaElement,
    pub negative_prompt_input: HtmlTextAreaElement,
    pub guidance_input: HtmlInputElement,
    pub guidance_value: Element,
    pub prompt_preview: HtmlImageElement,
    pub generate_btn: HtmlElement,

    // Generating
    pub step_generating: Element,
    pub progress_bar: HtmlElement,
    pub progress_percent: Element,
    pub progress_caption: Element,

    // Result
    pub step_result: Element,
    pub result_image: HtmlImageElement,
    pub mint_btn: HtmlElement,
    pub download_btn: HtmlElement,
    pub share_btn: HtmlElement,
    pub refine_btn: HtmlElement,
    pub mint_details: Element,

    // Gallery
    pub gallery_grid: Element,
    pub gallery_empty: Element,
    pub gallery_detail: Element,
    pub detail_image: HtmlImageElement,
    pub detail_title: Element,
    pub detail_prompt: Element,
    pub detail_date: Element,
    pub detail_likes: Element,
    pub detail_like_btn: HtmlElement,
    pub detail_mint_btn: HtmlElement,
    pub detail_download_btn: HtmlElement,
    pub detail_share_btn: HtmlElement,
    pub detail_close_btn: HtmlElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_textarea {
    ($id:expr) => {
        by_id_typed::<HtmlTextAreaElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing textarea #{}", $id)))?
    };
}

macro_rules! get_img {
    ($id:expr) => {
        by_id_typed::<HtmlImageElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing img #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            nav_links: query_all("[data-route]"),
            wallet_btn: get_html!("walletBtn"),
            toast_container: get_el!("toastContainer"),

            landing_view: get_el!("landingView"),
            generate_view: get_el!("generateView"),
            gallery_view: get_el!("galleryView"),

            step_markers: query_all(".step-marker"),
            start_over_btn: get_html!("startOverBtn"),

            step_upload: get_el!("stepUpload"),
            file_input: get_input!("fileInput"),
            upload_preview: get_img!("uploadPreview"),
            upload_count: get_el!("uploadCount"),
            next_btn: get_html!("nextBtn"),

            step_prompt: get_el!("stepPrompt"),
            prompt_input: get_textarea!("promptInput"),
            negative_prompt_input: get_textarea!("negativePromptInput"),
            guidance_input: get_input!("guidanceInput"),
            guidance_value: get_el!("guidanceValue"),
            prompt_preview: get_img!("promptPreview"),
            generate_btn: get_html!("generateBtn"),

            step_generating: get_el!("stepGenerating"),
            progress_bar: get_html!("progressBar"),
            progress_percent: get_el!("progressPercent"),
            progress_caption: get_el!("progressCaption"),

            step_result: get_el!("stepResult"),
            result_image: get_img!("resultImage"),
            mint_btn: get_html!("mintBtn"),
            download_btn: get_html!("downloadBtn"),
            share_btn: get_html!("shareBtn"),
            refine_btn: get_html!("refineBtn"),
            mint_details: get_el!("mintDetails"),

            gallery_grid: get_el!("galleryGrid"),
            gallery_empty: get_el!("galleryEmpty"),
            gallery_detail: get_el!("galleryDetail"),
            detail_image: get_img!("detailImage"),
            detail_title: get_el!("detailTitle"),
            detail_prompt: get_el!("detailPrompt"),
            detail_date: get_el!("detailDate"),
            detail_likes: get_el!("detailLikes"),
            detail_like_btn: get_html!("detailLikeBtn"),
            detail_mint_btn: get_html!("detailMintBtn"),
            detail_download_btn: get_html!("detailDownloadBtn"),
            detail_share_btn: get_html!("detailShareBtn"),
            detail_close_btn: get_html!("detailCloseBtn"),
        })
    }
}
