//! Generation wizard view.
//!
//! Every action is a call to the service followed by a re-render of the
//! returned snapshot. While the service is generating, a poll loop refreshes
//! the progress bar every tick.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use gloo_timers::future::TimeoutFuture;
use vp_api_types::{
    DownloadResponse, GenerationSettings, MintResponse, NoticeResponse, SettingsUpdateRequest, UploadFile,
    UploadRequest, UploadResponse, WizardSnapshot, WizardStep,
};
use vp_wizard::{MAX_UPLOAD_IMAGES, MIN_UPLOAD_IMAGES, WizardError};
use wasm_bindgen_futures::JsFuture;

use crate::api;
use crate::dom::{self, Elements};
use crate::gallery;
use crate::state;
use crate::toast;

const POLL_INTERVAL_MS: u32 = 200;

pub fn step_name(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Upload => "upload",
        WizardStep::Prompt => "prompt",
        WizardStep::Generating => "generating",
        WizardStep::Result => "result",
    }
}

fn step_index(step: WizardStep) -> usize {
    match step {
        WizardStep::Upload => 0,
        WizardStep::Prompt => 1,
        WizardStep::Generating => 2,
        WizardStep::Result => 3,
    }
}

pub fn progress_label(progress: f32) -> String {
    format!("{}%", progress.clamp(0.0, 100.0).round() as u32)
}

/// Client-side count check so oversized selections are not read into memory.
pub fn check_count(count: usize) -> Result<(), String> {
    if count < MIN_UPLOAD_IMAGES {
        return Err(WizardError::TooFewImages { count }.to_string());
    }
    if count > MAX_UPLOAD_IMAGES {
        return Err(WizardError::TooManyImages { count }.to_string());
    }
    Ok(())
}

// ── Rendering ──

pub fn render(els: &Elements) {
    let snapshot = state::snapshot().unwrap_or_else(empty_snapshot);
    let current = step_index(snapshot.step);

    dom::show(&els.step_upload, snapshot.step == WizardStep::Upload);
    dom::show(&els.step_prompt, snapshot.step == WizardStep::Prompt);
    dom::show(&els.step_generating, snapshot.step == WizardStep::Generating);
    dom::show(&els.step_result, snapshot.step == WizardStep::Result);

    for marker in &els.step_markers {
        let name = marker.get_attribute("data-step").unwrap_or_default();
        let index = [WizardStep::Upload, WizardStep::Prompt, WizardStep::Generating, WizardStep::Result]
            .into_iter()
            .find(|step| step_name(*step) == name)
            .map(step_index);
        dom::toggle_class(marker, "active", index == Some(current));
        dom::toggle_class(marker, "done", index.is_some_and(|i| i < current));
    }

    // Upload
    let preview = snapshot.image_preview.clone().unwrap_or_default();
    els.upload_preview.set_src(&preview);
    els.prompt_preview.set_src(&preview);
    dom::show(&els.upload_preview, snapshot.image_preview.is_some());
    dom::show(&els.prompt_preview, snapshot.image_preview.is_some());
    let count = snapshot.file_names.len();
    dom::set_text(
        &els.upload_count,
        &if count == 0 {
            format!("Select {}-{} images", MIN_UPLOAD_IMAGES, MAX_UPLOAD_IMAGES)
        } else {
            format!("{} images selected", count)
        },
    );
    dom::set_disabled(&els.next_btn, snapshot.image_preview.is_none());

    // Generating
    let _ = els
        .progress_bar
        .style()
        .set_property("width", &progress_label(snapshot.progress));
    dom::set_text(&els.progress_percent, &progress_label(snapshot.progress));
    dom::set_text(
        &els.progress_caption,
        snapshot.progress_caption.as_deref().unwrap_or_default(),
    );

    // Result
    els.result_image
        .set_src(snapshot.generated_image.as_deref().unwrap_or_default());
    let minted = snapshot.mint_result.is_some();
    dom::set_disabled(&els.mint_btn, snapshot.is_minting || minted);
    dom::set_text(
        &els.mint_btn,
        if snapshot.is_minting {
            "Minting..."
        } else if minted {
            "Minted"
        } else {
            "Mint as NFT"
        },
    );
    match &snapshot.mint_result {
        Some(result) => {
            dom::set_text(
                &els.mint_details,
                &format!(
                    "Mint: {}\nTransaction: {}\nMetadata: {}\nToken account: {}",
                    result.mint_address, result.tx_signature, result.metadata_pda, result.associated_token_address
                ),
            );
            dom::show(&els.mint_details, true);
        }
        None => dom::show(&els.mint_details, false),
    }
}

fn empty_snapshot() -> WizardSnapshot {
    WizardSnapshot {
        step: WizardStep::Upload,
        settings: GenerationSettings::default(),
        file_names: Vec::new(),
        image_preview: None,
        generated_image: None,
        progress: 0.0,
        progress_caption: None,
        is_generating: false,
        is_minting: false,
        mint_result: None,
    }
}

/// Copies settings into the prompt form. Only called on step changes so
/// typing is never overwritten by a render.
fn fill_settings(els: &Elements, settings: &GenerationSettings) {
    els.prompt_input.set_value(&settings.prompt);
    els.negative_prompt_input.set_value(&settings.negative_prompt);
    els.guidance_input.set_value(&settings.guidance_scale.to_string());
    dom::set_text(&els.guidance_value, &format!("{:.1}", settings.guidance_scale));
}

fn apply(els: &Elements, snapshot: WizardSnapshot) {
    state::set_snapshot(snapshot);
    render(els);
}

// ── Actions ──

/// Initial load: fetch the service's wizard and resume polling if it is mid-run.
pub async fn load(els: &Elements) {
    match api::request_as::<WizardSnapshot>("/generate", "GET", None).await {
        Ok(snapshot) => {
            fill_settings(els, &snapshot.settings);
            let generating = snapshot.step == WizardStep::Generating;
            apply(els, snapshot);
            if generating {
                start_polling(els);
            }
        }
        Err(e) => gloo_console::warn!(format!("wizard state unavailable: {}", e)),
    }
}

pub async fn on_files_selected(els: &Elements) {
    let Some(files) = els.file_input.files() else {
        return;
    };

    if let Err(message) = check_count(files.length() as usize) {
        toast::error(els, &message);
        els.file_input.set_value("");
        return;
    }

    let mut uploads = Vec::with_capacity(files.length() as usize);
    for i in 0..files.length() {
        let Some(file) = files.item(i) else {
            continue;
        };
        let buffer = match JsFuture::from(file.array_buffer()).await {
            Ok(buffer) => buffer,
            Err(e) => {
                toast::error(els, &format!("Could not read {}: {:?}", file.name(), e));
                return;
            }
        };
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        let content_type = file.type_();
        uploads.push(UploadFile {
            file_name: file.name(),
            content_type: (!content_type.is_empty()).then_some(content_type),
            data_base64: STANDARD.encode(bytes),
        });
    }

    let body = match serde_json::to_string(&UploadRequest { files: uploads }) {
        Ok(body) => body,
        Err(e) => {
            toast::error(els, &e.to_string());
            return;
        }
    };

    match api::request_as::<UploadResponse>("/generate/upload", "POST", Some(body)).await {
        Ok(response) => {
            toast::success(els, &response.message);
            apply(els, response.snapshot);
        }
        Err(e) => {
            toast::error(els, &e);
            els.file_input.set_value("");
        }
    }
}

pub async fn on_next(els: &Elements) {
    match api::request_as::<WizardSnapshot>("/generate/next", "POST", None).await {
        Ok(snapshot) => {
            fill_settings(els, &snapshot.settings);
            apply(els, snapshot);
        }
        Err(e) => toast::error(els, &e),
    }
}

pub fn on_guidance_input(els: &Elements) {
    let value = els.guidance_input.value().parse::<f32>().unwrap_or_default();
    dom::set_text(&els.guidance_value, &format!("{:.1}", value));
}

pub async fn on_generate(els: &Elements) {
    let update = SettingsUpdateRequest {
        prompt: Some(els.prompt_input.value()),
        negative_prompt: Some(els.negative_prompt_input.value()),
        guidance_scale: els.guidance_input.value().parse::<f32>().ok(),
    };
    let body = match serde_json::to_string(&update) {
        Ok(body) => body,
        Err(e) => {
            toast::error(els, &e.to_string());
            return;
        }
    };

    if let Err(e) = api::request_as::<WizardSnapshot>("/generate/settings", "PUT", Some(body)).await {
        toast::error(els, &e);
        return;
    }

    match api::request_as::<WizardSnapshot>("/generate/start", "POST", None).await {
        Ok(snapshot) => {
            apply(els, snapshot);
            start_polling(els);
        }
        Err(e) => toast::error(els, &e),
    }
}

fn start_polling(els: &Elements) {
    let token = state::next_poll_token();
    let els = els.clone();
    wasm_bindgen_futures::spawn_local(async move {
        poll_progress(&els, token).await;
    });
}

async fn poll_progress(els: &Elements, token: u64) {
    loop {
        TimeoutFuture::new(POLL_INTERVAL_MS).await;
        if state::poll_token() != token {
            return;
        }

        let snapshot = match api::request_as::<WizardSnapshot>("/generate", "GET", None).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                gloo_console::warn!(format!("progress poll failed: {}", e));
                continue;
            }
        };
        // A reset may have happened while the request was in flight.
        if state::poll_token() != token {
            return;
        }

        let step = snapshot.step;
        apply(els, snapshot);
        match step {
            WizardStep::Generating => {}
            WizardStep::Result => {
                toast::success(els, "Image generated successfully!");
                gallery::load(els).await;
                return;
            }
            _ => return,
        }
    }
}

pub async fn on_refine(els: &Elements) {
    match api::request_as::<WizardSnapshot>("/generate/refine", "POST", None).await {
        Ok(snapshot) => {
            fill_settings(els, &snapshot.settings);
            apply(els, snapshot);
        }
        Err(e) => toast::error(els, &e),
    }
}

pub async fn on_start_over(els: &Elements) {
    state::next_poll_token();
    match api::request_as::<WizardSnapshot>("/generate/start-over", "POST", None).await {
        Ok(snapshot) => {
            els.file_input.set_value("");
            fill_settings(els, &snapshot.settings);
            apply(els, snapshot);
        }
        Err(e) => toast::error(els, &e),
    }
}

pub async fn on_mint(els: &Elements) {
    if !state::wallet().connected {
        toast::error(els, "Please connect your wallet first");
        return;
    }

    if let Some(mut snapshot) = state::snapshot() {
        snapshot.is_minting = true;
        apply(els, snapshot);
    }

    match api::request_as::<MintResponse>("/generate/mint", "POST", None).await {
        Ok(response) => toast::success(els, &response.message),
        Err(e) => toast::error(els, &e),
    }

    if let Ok(snapshot) = api::request_as::<WizardSnapshot>("/generate", "GET", None).await {
        apply(els, snapshot);
    }
}

pub async fn on_download(els: &Elements) {
    match api::request_as::<DownloadResponse>("/generate/download", "GET", None).await {
        Ok(download) => {
            dom::download(&download.image_url, &download.file_name);
            toast::success(els, "Image downloaded");
        }
        Err(e) => toast::error(els, &e),
    }
}

pub async fn on_share(els: &Elements) {
    match api::request_as::<NoticeResponse>("/generate/share", "POST", None).await {
        Ok(notice) => toast::info(els, &notice.message),
        Err(e) => toast::error(els, &e),
    }
}
