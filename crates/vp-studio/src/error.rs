use thiserror::Error;
use vp_gallery::GalleryError;
use vp_wizard::WizardError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Failed to connect wallet: {0}")]
    ConnectFailed(String),
    #[error("Failed to disconnect wallet: {0}")]
    DisconnectFailed(String),
    #[error("Wallet connection is still in progress")]
    ConnectInFlight,
    #[error("Wallet disconnect is still in progress")]
    DisconnectInFlight,
}

#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Gallery(#[from] GalleryError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("Please connect your wallet first")]
    WalletNotConnected,
    #[error("Failed to mint NFT: {0}")]
    Mint(String),
}
