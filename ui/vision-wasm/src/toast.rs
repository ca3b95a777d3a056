//! Transient notifications.

use gloo_timers::future::TimeoutFuture;

use crate::dom::{self, Elements};

const TOAST_LIFETIME_MS: u32 = 4_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast-success",
            ToastKind::Info => "toast-info",
            ToastKind::Error => "toast-error",
        }
    }
}

pub fn show(els: &Elements, kind: ToastKind, message: &str) {
    match kind {
        ToastKind::Error => gloo_console::warn!(message),
        _ => gloo_console::log!(message),
    }

    let toast = dom::create_element("div");
    dom::add_class(&toast, "toast");
    dom::add_class(&toast, kind.class());
    dom::set_text(&toast, message);
    let _ = els.toast_container.append_child(&toast);

    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(TOAST_LIFETIME_MS).await;
        toast.remove();
    });
}

pub fn success(els: &Elements, message: &str) {
    show(els, ToastKind::Success, message);
}

pub fn info(els: &Elements, message: &str) {
    show(els, ToastKind::Info, message);
}

pub fn error(els: &Elements, message: &str) {
    show(els, ToastKind::Error, message);
}
