use std::fmt;
use vp_api_types::{
    GenerationSettings, MAX_GUIDANCE_SCALE, MIN_GUIDANCE_SCALE, MintResult, SettingsUpdateRequest, WizardSnapshot,
    WizardStep,
};

use crate::progress::ProgressStage;
use crate::upload::{DEFAULT_MAX_UPLOAD_BYTES, UploadedImage, validate_selection};
use crate::WizardError;

pub const RESULT_DOWNLOAD_FILE_NAME: &str = "vision-ai-generated-image.jpg";

/// Identifies one pass through `Generating`. Any reset retires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl RunId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintTicket {
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedGeneration {
    pub run: RunId,
    pub image_url: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadInfo {
    pub image_url: String,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct GenerationWizard {
    step: WizardStep,
    settings: GenerationSettings,
    files: Vec<UploadedImage>,
    image_preview: Option<String>,
    generated_image: Option<String>,
    progress: f32,
    is_minting: bool,
    mint_result: Option<MintResult>,
    epoch: u64,
    max_upload_bytes: usize,
}

impl Default for GenerationWizard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl GenerationWizard {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self {
            step: WizardStep::Upload,
            settings: GenerationSettings::default(),
            files: Vec::new(),
            image_preview: None,
            generated_image: None,
            progress: 0.0,
            is_minting: false,
            mint_result: None,
            epoch: 0,
            max_upload_bytes,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn files(&self) -> &[UploadedImage] {
        &self.files
    }

    pub fn image_preview(&self) -> Option<&str> {
        self.image_preview.as_deref()
    }

    pub fn generated_image(&self) -> Option<&str> {
        self.generated_image.as_deref()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_generating(&self) -> bool {
        self.step == WizardStep::Generating
    }

    pub fn is_minting(&self) -> bool {
        self.is_minting
    }

    pub fn mint_result(&self) -> Option<&MintResult> {
        self.mint_result.as_ref()
    }

    /// The run currently in `Generating`, if any.
    pub fn current_run(&self) -> Option<RunId> {
        self.is_generating().then_some(RunId(self.epoch))
    }

    fn require_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step != expected {
            return Err(WizardError::WrongStep {
                action,
                actual: self.step,
            });
        }
        Ok(())
    }

    fn retire_pending_work(&mut self) {
        self.epoch += 1;
        self.is_minting = false;
    }

    /// Replaces the file selection. A rejected selection leaves the previous one in place.
    pub fn select_files(&mut self, files: Vec<UploadedImage>) -> Result<usize, WizardError> {
        self.require_step(WizardStep::Upload, "file selection")?;
        validate_selection(&files, self.max_upload_bytes)?;

        let preview = files.first().map(UploadedImage::data_url);
        let count = files.len();
        self.files = files;
        self.image_preview = preview;
        Ok(count)
    }

    /// "Next" on the upload step.
    pub fn next(&mut self) -> Result<(), WizardError> {
        self.require_step(WizardStep::Upload, "next")?;
        if self.image_preview.is_none() {
            return Err(WizardError::NoImagesUploaded);
        }
        self.step = WizardStep::Prompt;
        Ok(())
    }

    /// Applies a batch of edits; nothing changes unless every field is valid.
    pub fn update_settings(&mut self, update: SettingsUpdateRequest) -> Result<&GenerationSettings, WizardError> {
        self.require_step(WizardStep::Prompt, "settings editing")?;
        if let Some(scale) = update.guidance_scale {
            check_guidance(scale)?;
        }

        if let Some(prompt) = update.prompt {
            self.settings.prompt = prompt;
        }
        if let Some(negative_prompt) = update.negative_prompt {
            self.settings.negative_prompt = negative_prompt;
        }
        if let Some(scale) = update.guidance_scale {
            self.settings.guidance_scale = scale;
        }
        Ok(&self.settings)
    }

    /// "Generate" on the prompt step. Returns the run the caller should drive.
    pub fn generate(&mut self) -> Result<RunId, WizardError> {
        self.require_step(WizardStep::Prompt, "generate")?;
        if self.settings.prompt.trim().is_empty() {
            return Err(WizardError::EmptyPrompt);
        }

        self.retire_pending_work();
        self.step = WizardStep::Generating;
        self.progress = 0.0;
        Ok(RunId(self.epoch))
    }

    fn require_run(&self, run: RunId) -> Result<(), WizardError> {
        if run.0 != self.epoch {
            return Err(WizardError::StaleRun(run.0));
        }
        self.require_step(WizardStep::Generating, "progress update")
    }

    /// Progress never moves backwards and never exceeds 100.
    pub fn record_progress(&mut self, run: RunId, percent: f32) -> Result<f32, WizardError> {
        self.require_run(run)?;
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
        self.progress = self.progress.max(percent);
        Ok(self.progress)
    }

    pub fn complete_generation(
        &mut self,
        run: RunId,
        image_url: impl Into<String>,
    ) -> Result<CompletedGeneration, WizardError> {
        self.require_run(run)?;
        if self.progress < 100.0 {
            return Err(WizardError::GenerationIncomplete(self.progress));
        }

        let image_url = image_url.into();
        self.generated_image = Some(image_url.clone());
        self.step = WizardStep::Result;
        Ok(CompletedGeneration {
            run,
            image_url,
            prompt: self.settings.prompt.clone(),
        })
    }

    /// Back to the prompt with the same settings.
    pub fn refine(&mut self) -> Result<(), WizardError> {
        self.require_step(WizardStep::Result, "refine")?;
        self.retire_pending_work();
        self.step = WizardStep::Prompt;
        self.progress = 0.0;
        self.generated_image = None;
        self.mint_result = None;
        Ok(())
    }

    /// Valid from every step; also retires any in-flight generation or mint.
    pub fn start_over(&mut self) {
        self.retire_pending_work();
        self.step = WizardStep::Upload;
        self.settings = GenerationSettings::default();
        self.files.clear();
        self.image_preview = None;
        self.generated_image = None;
        self.progress = 0.0;
        self.mint_result = None;
    }

    pub fn begin_mint(&mut self, wallet_connected: bool) -> Result<MintTicket, WizardError> {
        self.require_step(WizardStep::Result, "mint")?;
        if !wallet_connected {
            return Err(WizardError::WalletNotConnected);
        }
        if self.mint_result.is_some() {
            return Err(WizardError::AlreadyMinted);
        }
        if self.is_minting {
            return Err(WizardError::MintInFlight);
        }
        if self.generated_image.is_none() {
            return Err(WizardError::NoGeneratedImage);
        }

        self.is_minting = true;
        Ok(MintTicket { epoch: self.epoch })
    }

    pub fn finish_mint(&mut self, ticket: MintTicket, result: MintResult) -> Result<&MintResult, WizardError> {
        if ticket.epoch != self.epoch || self.step != WizardStep::Result {
            return Err(WizardError::StaleMint);
        }
        self.is_minting = false;
        Ok(&*self.mint_result.insert(result))
    }

    pub fn abort_mint(&mut self, ticket: MintTicket) {
        if ticket.epoch == self.epoch {
            self.is_minting = false;
        }
    }

    pub fn download(&self) -> Result<DownloadInfo, WizardError> {
        self.require_step(WizardStep::Result, "download")?;
        let image_url = self
            .generated_image
            .clone()
            .ok_or(WizardError::NoGeneratedImage)?;
        Ok(DownloadInfo {
            image_url,
            file_name: RESULT_DOWNLOAD_FILE_NAME.to_owned(),
        })
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            settings: self.settings.clone(),
            file_names: self.files.iter().map(|file| file.file_name.clone()).collect(),
            image_preview: self.image_preview.clone(),
            generated_image: self.generated_image.clone(),
            progress: self.progress,
            progress_caption: self
                .is_generating()
                .then(|| ProgressStage::from_percent(self.progress).caption().to_owned()),
            is_generating: self.is_generating(),
            is_minting: self.is_minting,
            mint_result: self.mint_result.clone(),
        }
    }
}

fn check_guidance(scale: f32) -> Result<(), WizardError> {
    if !(MIN_GUIDANCE_SCALE..=MAX_GUIDANCE_SCALE).contains(&scale) {
        return Err(WizardError::GuidanceOutOfRange(scale));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "https://example.invalid/generated.svg";

    fn images(count: usize) -> Vec<UploadedImage> {
        (0..count)
            .map(|i| UploadedImage::new(format!("img-{i}.png"), Some("image/png".to_owned()), vec![i as u8]))
            .collect()
    }

    fn mint_record() -> MintResult {
        MintResult {
            mint_address: "mint".to_owned(),
            tx_signature: "sig".to_owned(),
            metadata_pda: "pda".to_owned(),
            associated_token_address: "ata".to_owned(),
        }
    }

    fn set_prompt(wizard: &mut GenerationWizard, prompt: &str) -> Result<(), WizardError> {
        wizard
            .update_settings(SettingsUpdateRequest {
                prompt: Some(prompt.to_owned()),
                ..SettingsUpdateRequest::default()
            })
            .map(|_| ())
    }

    fn wizard_at_prompt() -> GenerationWizard {
        let mut wizard = GenerationWizard::default();
        wizard.select_files(images(5)).expect("valid selection");
        wizard.next().expect("preview present");
        wizard
    }

    fn wizard_at_result() -> GenerationWizard {
        let mut wizard = wizard_at_prompt();
        set_prompt(&mut wizard, "a neon fox").expect("prompt step");
        let run = wizard.generate().expect("prompt present");
        wizard.record_progress(run, 100.0).expect("current run");
        wizard.complete_generation(run, IMAGE).expect("complete");
        wizard
    }

    #[test]
    fn out_of_range_selection_keeps_upload_without_preview() {
        for count in [0, 1, 4, 21, 30] {
            let mut wizard = GenerationWizard::default();
            assert!(wizard.select_files(images(count)).is_err());
            assert_eq!(wizard.step(), WizardStep::Upload);
            assert!(wizard.image_preview().is_none());
            assert!(wizard.files().is_empty());
        }
    }

    #[test]
    fn rejected_selection_keeps_previous_one() {
        let mut wizard = GenerationWizard::default();
        wizard.select_files(images(6)).expect("valid");
        let preview = wizard.image_preview().map(str::to_owned);

        assert_eq!(
            wizard.select_files(images(2)),
            Err(WizardError::TooFewImages { count: 2 })
        );
        assert_eq!(wizard.files().len(), 6);
        assert_eq!(wizard.image_preview().map(str::to_owned), preview);
    }

    #[test]
    fn preview_comes_from_first_file() {
        let mut wizard = GenerationWizard::default();
        assert_eq!(wizard.select_files(images(7)), Ok(7));
        assert_eq!(wizard.image_preview(), Some("data:image/png;base64,AA=="));
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn next_requires_preview() {
        let mut wizard = GenerationWizard::default();
        assert_eq!(wizard.next(), Err(WizardError::NoImagesUploaded));
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn generate_requires_non_blank_prompt() {
        let mut wizard = wizard_at_prompt();
        set_prompt(&mut wizard, "   ").expect("prompt step");
        assert_eq!(wizard.generate(), Err(WizardError::EmptyPrompt));
        assert_eq!(wizard.step(), WizardStep::Prompt);

        set_prompt(&mut wizard, "castle at dusk").expect("prompt step");
        let run = wizard.generate().expect("prompt present");
        assert_eq!(wizard.step(), WizardStep::Generating);
        assert_eq!(wizard.current_run(), Some(run));
        assert_eq!(wizard.progress(), 0.0);
    }

    #[test]
    fn settings_update_is_all_or_nothing() {
        let mut wizard = wizard_at_prompt();
        let rejected = wizard.update_settings(SettingsUpdateRequest {
            prompt: Some("ignored".to_owned()),
            negative_prompt: None,
            guidance_scale: Some(16.0),
        });
        assert_eq!(rejected, Err(WizardError::GuidanceOutOfRange(16.0)));
        assert_eq!(wizard.settings().prompt, "");

        let settings = wizard
            .update_settings(SettingsUpdateRequest {
                prompt: Some("harbor".to_owned()),
                negative_prompt: Some("blurry".to_owned()),
                guidance_scale: Some(12.5),
            })
            .expect("valid update")
            .clone();
        assert_eq!(settings.prompt, "harbor");
        assert_eq!(settings.negative_prompt, "blurry");
        assert_eq!(settings.guidance_scale, 12.5);
    }

    #[test]
    fn settings_locked_outside_prompt_step() {
        let mut wizard = GenerationWizard::default();
        assert!(matches!(
            set_prompt(&mut wizard, "too early"),
            Err(WizardError::WrongStep { actual: WizardStep::Upload, .. })
        ));
    }

    #[test]
    fn progress_is_monotonic_and_capped() {
        let mut wizard = wizard_at_prompt();
        set_prompt(&mut wizard, "forest").expect("prompt step");
        let run = wizard.generate().expect("prompt present");

        assert_eq!(wizard.record_progress(run, 40.0), Ok(40.0));
        assert_eq!(wizard.record_progress(run, 10.0), Ok(40.0));
        assert_eq!(wizard.record_progress(run, 250.0), Ok(100.0));
        assert_eq!(wizard.record_progress(run, f32::NAN), Ok(100.0));
    }

    #[test]
    fn completion_requires_full_progress() {
        let mut wizard = wizard_at_prompt();
        set_prompt(&mut wizard, "forest").expect("prompt step");
        let run = wizard.generate().expect("prompt present");
        wizard.record_progress(run, 99.0).expect("current run");

        assert_eq!(
            wizard.complete_generation(run, IMAGE),
            Err(WizardError::GenerationIncomplete(99.0))
        );

        wizard.record_progress(run, 100.0).expect("current run");
        let done = wizard.complete_generation(run, IMAGE).expect("complete");
        assert_eq!(done.prompt, "forest");
        assert_eq!(wizard.step(), WizardStep::Result);
        assert_eq!(wizard.generated_image(), Some(IMAGE));
        assert!(!wizard.is_generating());
    }

    #[test]
    fn start_over_retires_running_generation() {
        let mut wizard = wizard_at_prompt();
        set_prompt(&mut wizard, "forest").expect("prompt step");
        let run = wizard.generate().expect("prompt present");

        wizard.start_over();
        assert_eq!(wizard.record_progress(run, 100.0), Err(WizardError::StaleRun(run.value())));
        assert_eq!(wizard.complete_generation(run, IMAGE), Err(WizardError::StaleRun(run.value())));
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn refine_clears_output_and_keeps_settings() {
        let mut wizard = wizard_at_result();
        let ticket = wizard.begin_mint(true).expect("mintable");
        wizard.finish_mint(ticket, mint_record()).expect("current");

        wizard.refine().expect("result step");
        assert_eq!(wizard.step(), WizardStep::Prompt);
        assert_eq!(wizard.progress(), 0.0);
        assert!(wizard.generated_image().is_none());
        assert!(wizard.mint_result().is_none());
        assert_eq!(wizard.settings().prompt, "a neon fox");
        assert!(wizard.image_preview().is_some());
    }

    #[test]
    fn start_over_restores_defaults() {
        let mut wizard = wizard_at_result();
        let ticket = wizard.begin_mint(true).expect("mintable");
        wizard.finish_mint(ticket, mint_record()).expect("current");

        wizard.start_over();
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert_eq!(wizard.settings(), &GenerationSettings::default());
        assert!(wizard.files().is_empty());
        assert!(wizard.image_preview().is_none());
        assert!(wizard.generated_image().is_none());
        assert!(wizard.mint_result().is_none());
        assert_eq!(wizard.progress(), 0.0);
    }

    #[test]
    fn mint_guards() {
        let mut wizard = wizard_at_prompt();
        assert!(matches!(wizard.begin_mint(true), Err(WizardError::WrongStep { .. })));

        let mut wizard = wizard_at_result();
        assert_eq!(wizard.begin_mint(false), Err(WizardError::WalletNotConnected));
        assert!(!wizard.is_minting());

        let ticket = wizard.begin_mint(true).expect("mintable");
        assert!(wizard.is_minting());
        assert_eq!(wizard.begin_mint(true), Err(WizardError::MintInFlight));

        wizard.finish_mint(ticket, mint_record()).expect("current");
        assert!(!wizard.is_minting());
        assert_eq!(wizard.begin_mint(true), Err(WizardError::AlreadyMinted));
        assert_eq!(wizard.mint_result(), Some(&mint_record()));
    }

    #[test]
    fn mint_finished_after_refine_is_dropped() {
        let mut wizard = wizard_at_result();
        let ticket = wizard.begin_mint(true).expect("mintable");
        wizard.refine().expect("result step");

        assert_eq!(wizard.finish_mint(ticket, mint_record()), Err(WizardError::StaleMint));
        assert!(wizard.mint_result().is_none());
        assert!(!wizard.is_minting());
    }

    #[test]
    fn aborted_mint_can_be_retried() {
        let mut wizard = wizard_at_result();
        let ticket = wizard.begin_mint(true).expect("mintable");
        wizard.abort_mint(ticket);
        assert!(!wizard.is_minting());
        assert!(wizard.begin_mint(true).is_ok());
    }

    #[test]
    fn download_only_on_result() {
        let wizard = wizard_at_prompt();
        assert!(wizard.download().is_err());

        let wizard = wizard_at_result();
        let info = wizard.download().expect("result step");
        assert_eq!(info.image_url, IMAGE);
        assert_eq!(info.file_name, RESULT_DOWNLOAD_FILE_NAME);
    }

    #[test]
    fn snapshot_reports_caption_only_while_generating() {
        let mut wizard = wizard_at_prompt();
        assert_eq!(wizard.snapshot().progress_caption, None);

        set_prompt(&mut wizard, "forest").expect("prompt step");
        let run = wizard.generate().expect("prompt present");
        wizard.record_progress(run, 45.0).expect("current run");
        let snapshot = wizard.snapshot();
        assert!(snapshot.is_generating);
        assert_eq!(snapshot.progress_caption.as_deref(), Some("Processing your prompt..."));
        assert_eq!(snapshot.file_names.len(), 5);
    }
}
