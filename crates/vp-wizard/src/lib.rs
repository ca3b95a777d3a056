//! Generation wizard: upload → prompt → generating → result.
//!
//! Everything here is synchronous. Timers, wallets and the gallery are driven
//! from the outside (see `vp-studio`), which keeps every transition testable
//! without a runtime.

mod error;
mod progress;
mod upload;
mod wizard;

pub use error::WizardError;
pub use progress::{ProgressModel, ProgressStage};
pub use upload::{
    ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES, MAX_UPLOAD_IMAGES, MIN_UPLOAD_IMAGES, UploadedImage,
    validate_count, validate_selection,
};
pub use wizard::{
    CompletedGeneration, DownloadInfo, GenerationWizard, MintTicket, RESULT_DOWNLOAD_FILE_NAME, RunId,
};
