use anyhow::Result;
use async_trait::async_trait;
use vp_api_types::{MintResult, WalletPublicKey};

#[derive(Debug, Clone)]
pub struct ConnectResult {
    pub public_key: WalletPublicKey,
}

#[derive(Debug, Clone)]
pub struct MintRequest {
    pub owner: WalletPublicKey,
    pub image_url: String,
    pub name: String,
    pub prompt: String,
}

/// Browser-wallet style connector. Implementations decide how long a
/// round trip takes and where the key comes from.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn name(&self) -> &str;
    async fn connect(&self) -> Result<ConnectResult>;
    async fn disconnect(&self) -> Result<()>;
}

#[async_trait]
pub trait NftMinter: Send + Sync {
    async fn mint(&self, req: MintRequest) -> Result<MintResult>;
}
