use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use vp_studio::{PLACEHOLDER_IMAGE_URL, StudioConfig};
use vp_wallet_phantom::{DEFAULT_CONNECT_LATENCY, DEFAULT_DISCONNECT_LATENCY, DEFAULT_MINT_DELAY};
use vp_wizard::{DEFAULT_MAX_UPLOAD_BYTES, ProgressModel};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub(crate) struct ServiceConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) flag_store_path: Option<PathBuf>,
    pub(crate) connect_latency: Duration,
    pub(crate) disconnect_latency: Duration,
    pub(crate) mint_delay: Duration,
    pub(crate) studio: StudioConfig,
}

impl ServiceConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_addr = var("VISION_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .context("VISION_BIND_ADDR must be a socket address")?;

        let millis = |name: &str, default: Duration| -> Result<Duration> {
            match var(name) {
                Some(raw) => {
                    let ms = raw
                        .trim()
                        .parse::<u64>()
                        .with_context(|| format!("{name} must be a whole number of milliseconds"))?;
                    Ok(Duration::from_millis(ms))
                }
                None => Ok(default),
            }
        };

        let defaults = ProgressModel::default();
        let progress = ProgressModel {
            total: millis("VISION_GENERATION_TOTAL_MS", defaults.total)?,
            tick: millis("VISION_GENERATION_TICK_MS", defaults.tick)?,
            finalize_delay: millis("VISION_FINALIZE_DELAY_MS", defaults.finalize_delay)?,
        };
        if progress.tick.is_zero() {
            anyhow::bail!("VISION_GENERATION_TICK_MS must be greater than zero");
        }

        let max_upload_bytes = match var("VISION_MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("VISION_MAX_UPLOAD_BYTES must be a byte count")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            bind_addr,
            flag_store_path: var("VISION_FLAG_STORE_PATH").map(PathBuf::from),
            connect_latency: millis("VISION_CONNECT_LATENCY_MS", DEFAULT_CONNECT_LATENCY)?,
            disconnect_latency: millis("VISION_DISCONNECT_LATENCY_MS", DEFAULT_DISCONNECT_LATENCY)?,
            mint_delay: millis("VISION_MINT_DELAY_MS", DEFAULT_MINT_DELAY)?,
            studio: StudioConfig {
                progress,
                placeholder_image_url: var("VISION_PLACEHOLDER_IMAGE_URL")
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_owned()),
                max_upload_bytes,
            },
        })
    }

    /// Request body cap: base64 inflates uploads by a third, plus room for the JSON envelope.
    pub(crate) fn body_limit(&self) -> usize {
        (self.studio.max_upload_bytes / 3)
            .saturating_mul(4)
            .saturating_add(1024 * 1024)
    }
}
