use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};
use vp_api_types::{GalleryItem, MintResult, SettingsUpdateRequest, UploadFile, WizardSnapshot};
use vp_gallery::{GALLERY_DOWNLOAD_FILE_NAME, GENERATED_ITEM_TITLE, GalleryStore, generated_item};
use vp_wallet_client::{MintRequest, NftMinter};
use vp_wizard::{
    DEFAULT_MAX_UPLOAD_BYTES, DownloadInfo, GenerationWizard, ProgressModel, RunId, UploadedImage, WizardError,
    validate_count,
};

use crate::{StudioError, WalletSession};

pub const PLACEHOLDER_IMAGE_URL: &str = "https://profilinator.rishav.dev/skills-assets/git-scm-icon.svg";

const RESULT_SHARE_NOTICE: &str = "Sharing is simulated in this demo";

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub progress: ProgressModel,
    pub placeholder_image_url: String,
    pub max_upload_bytes: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            progress: ProgressModel::default(),
            placeholder_image_url: PLACEHOLDER_IMAGE_URL.to_owned(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

pub fn upload_notice(count: usize) -> String {
    format!("{count} images uploaded successfully!")
}

pub fn mint_notice(result: &MintResult) -> String {
    let head: String = result.mint_address.chars().take(8).collect();
    format!("NFT minted successfully! Mint Address: {head}...")
}

/// One wizard plus the services it talks to.
///
/// The wizard lock is a tokio mutex so completion can update the gallery
/// without another request observing `Result` with a stale gallery.
pub struct Studio {
    wizard: Mutex<GenerationWizard>,
    gallery: Arc<GalleryStore>,
    wallet: Arc<WalletSession>,
    minter: Arc<dyn NftMinter>,
    config: StudioConfig,
}

impl Studio {
    pub fn new(
        gallery: Arc<GalleryStore>,
        wallet: Arc<WalletSession>,
        minter: Arc<dyn NftMinter>,
        config: StudioConfig,
    ) -> Self {
        Self {
            wizard: Mutex::new(GenerationWizard::new(config.max_upload_bytes)),
            gallery,
            wallet,
            minter,
            config,
        }
    }

    pub fn gallery(&self) -> &Arc<GalleryStore> {
        &self.gallery
    }

    pub fn wallet(&self) -> &Arc<WalletSession> {
        &self.wallet
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub async fn snapshot(&self) -> WizardSnapshot {
        self.wizard.lock().await.snapshot()
    }

    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<(usize, WizardSnapshot), StudioError> {
        validate_count(files.len())?;
        let images = files
            .into_iter()
            .map(|file| UploadedImage::from_base64(&file.file_name, file.content_type, &file.data_base64))
            .collect::<Result<Vec<_>, WizardError>>()?;

        let mut wizard = self.wizard.lock().await;
        let count = wizard.select_files(images)?;
        info!("accepted {} reference images", count);
        Ok((count, wizard.snapshot()))
    }

    pub async fn next(&self) -> Result<WizardSnapshot, StudioError> {
        let mut wizard = self.wizard.lock().await;
        wizard.next()?;
        Ok(wizard.snapshot())
    }

    pub async fn update_settings(&self, update: SettingsUpdateRequest) -> Result<WizardSnapshot, StudioError> {
        let mut wizard = self.wizard.lock().await;
        wizard.update_settings(update)?;
        Ok(wizard.snapshot())
    }

    /// Moves to `Generating` and spawns the simulated progress loop.
    pub async fn start_generation(self: &Arc<Self>) -> Result<WizardSnapshot, StudioError> {
        let (run, snapshot) = {
            let mut wizard = self.wizard.lock().await;
            let run = wizard.generate()?;
            (run, wizard.snapshot())
        };

        info!("generation run {} started", run);
        tokio::spawn(Arc::clone(self).drive_generation(run));
        Ok(snapshot)
    }

    async fn drive_generation(self: Arc<Self>, run: RunId) {
        let model = self.config.progress;
        let started = Instant::now();
        let mut ticker = tokio::time::interval_at(
            started + model.tick.max(Duration::from_millis(1)),
            model.tick.max(Duration::from_millis(1)),
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let percent = model.percent_at(started.elapsed());
            match self.wizard.lock().await.record_progress(run, percent) {
                Ok(progress) if progress >= 100.0 => break,
                Ok(_) => {}
                Err(err) => {
                    info!("generation run {} stopped: {}", run, err);
                    return;
                }
            }
        }

        tokio::time::sleep(model.finalize_delay).await;

        let mut wizard = self.wizard.lock().await;
        match wizard.complete_generation(run, self.config.placeholder_image_url.as_str()) {
            Ok(completed) => {
                // Single-item history: every completed run replaces the gallery.
                self.gallery
                    .replace_with(generated_item(&completed.image_url, &completed.prompt))
                    .await;
                info!("generation run {} finished", run);
            }
            Err(err) => info!("generation run {} discarded: {}", run, err),
        }
    }

    pub async fn refine(&self) -> Result<WizardSnapshot, StudioError> {
        let mut wizard = self.wizard.lock().await;
        wizard.refine()?;
        Ok(wizard.snapshot())
    }

    pub async fn start_over(&self) -> WizardSnapshot {
        let mut wizard = self.wizard.lock().await;
        wizard.start_over();
        wizard.snapshot()
    }

    pub async fn mint(&self) -> Result<MintResult, StudioError> {
        let owner = self.wallet.public_key().await;

        let (ticket, request) = {
            let mut wizard = self.wizard.lock().await;
            let ticket = wizard.begin_mint(owner.is_some())?;
            let image_url = wizard.generated_image().map(str::to_owned);
            let (Some(owner), Some(image_url)) = (owner, image_url) else {
                wizard.abort_mint(ticket);
                return Err(StudioError::WalletNotConnected);
            };
            let request = MintRequest {
                owner,
                image_url,
                name: GENERATED_ITEM_TITLE.to_owned(),
                prompt: wizard.settings().prompt.clone(),
            };
            (ticket, request)
        };

        match self.minter.mint(request).await {
            Ok(result) => {
                let mut wizard = self.wizard.lock().await;
                let stored = wizard.finish_mint(ticket, result)?.clone();
                info!("minted {}", stored.mint_address);
                Ok(stored)
            }
            Err(err) => {
                self.wizard.lock().await.abort_mint(ticket);
                warn!("mint failed: {}", err);
                Err(StudioError::Mint(err.to_string()))
            }
        }
    }

    pub async fn download(&self) -> Result<DownloadInfo, StudioError> {
        Ok(self.wizard.lock().await.download()?)
    }

    pub async fn share_result(&self) -> Result<String, StudioError> {
        self.wizard.lock().await.download()?;
        Ok(RESULT_SHARE_NOTICE.to_owned())
    }

    pub async fn gallery_item(&self, id: &str) -> Result<GalleryItem, StudioError> {
        self.gallery
            .get(id)
            .await
            .ok_or_else(|| vp_gallery::GalleryError::NotFound(id.to_owned()).into())
    }

    pub async fn like_item(&self, id: &str) -> Result<GalleryItem, StudioError> {
        let connected = self.wallet.is_connected().await;
        Ok(self.gallery.like(id, connected).await?)
    }

    pub async fn share_item(&self, id: &str) -> Result<String, StudioError> {
        let item = self.gallery_item(id).await?;
        Ok(format!("Sharing \"{}\" (simulated in demo)", item.title))
    }

    /// Gallery-side mint only acknowledges the request.
    pub async fn mint_item(&self, id: &str) -> Result<String, StudioError> {
        if !self.wallet.is_connected().await {
            return Err(StudioError::WalletNotConnected);
        }
        let item = self.gallery_item(id).await?;
        info!("gallery mint requested for {}", item.id);
        Ok(format!("NFT minting initiated for \"{}\"", item.title))
    }

    pub async fn download_item(&self, id: &str) -> Result<DownloadInfo, StudioError> {
        let item = self.gallery_item(id).await?;
        Ok(DownloadInfo {
            image_url: item.image_url,
            file_name: GALLERY_DOWNLOAD_FILE_NAME.to_owned(),
        })
    }
}
