use thiserror::Error;
use vp_api_types::WizardStep;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WizardError {
    #[error("Please upload at least 5 images")]
    TooFewImages { count: usize },
    #[error("You can upload a maximum of 20 images")]
    TooManyImages { count: usize },
    #[error("Invalid file format: {file_name}. Allowed formats: png, jpg, jpeg, webp")]
    UnsupportedFormat { file_name: String },
    #[error("Could not read {file_name}: image data is not valid base64")]
    InvalidEncoding { file_name: String },
    #[error("Upload is too large: {total_bytes} bytes (limit {limit} bytes)")]
    UploadTooLarge { total_bytes: usize, limit: usize },
    #[error("Please upload your images first")]
    NoImagesUploaded,
    #[error("Please enter a prompt")]
    EmptyPrompt,
    #[error("Guidance scale must be between 1 and 15, got {0}")]
    GuidanceOutOfRange(f32),
    #[error("{action} is not available during the {actual:?} step")]
    WrongStep { action: &'static str, actual: WizardStep },
    #[error("Generation is still at {0:.0}%")]
    GenerationIncomplete(f32),
    #[error("Generation run {0} is no longer current")]
    StaleRun(u64),
    #[error("The image was changed before minting finished; nothing was minted")]
    StaleMint,
    #[error("No generated image available")]
    NoGeneratedImage,
    #[error("Please connect your wallet first")]
    WalletNotConnected,
    #[error("A mint is already in progress")]
    MintInFlight,
    #[error("This image has already been minted")]
    AlreadyMinted,
}

impl WizardError {
    /// True for rejections caused by the wizard's current state rather than bad input.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            WizardError::WrongStep { .. }
                | WizardError::GenerationIncomplete(_)
                | WizardError::StaleRun(_)
                | WizardError::StaleMint
                | WizardError::MintInFlight
                | WizardError::AlreadyMinted
        )
    }
}
