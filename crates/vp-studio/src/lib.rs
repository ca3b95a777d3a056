//! Ties the wizard, gallery, wallet session and minter together and runs the
//! simulated timers on tokio.

mod error;
mod session;
mod studio;

pub use error::{StudioError, WalletError};
pub use session::{ConnectOutcome, WalletSession};
pub use studio::{PLACEHOLDER_IMAGE_URL, Studio, StudioConfig, mint_notice, upload_notice};
