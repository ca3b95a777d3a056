use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;
use vp_api_types::{MintResult, WalletPublicKey};
use vp_wallet_client::{ConnectResult, MintRequest, NftMinter, WalletAdapter};

pub const PHANTOM_MOCK: &str = "phantom-mock";

pub const MOCK_PUBLIC_KEY: &str = "8gLCj6jAM4YBis8HpZWnSL9xVFnZRbP8Sbf6VHNdEGxN";

pub const MOCK_MINT_ADDRESS: &str = "8xGg7vjSk4ZQwEyF8ZwMRhXjJqj9dT3KY5Gkt4oZqQQ4";
pub const MOCK_TX_SIGNATURE: &str =
    "5JX4q8K1b7zMXJTYBh5MwB3urTRgMQe6GrxZ7bZpohYZyk9XnAzAY3hWgA7xFJiQ5fKPy7WbsDrn1Tk6FkdsfPoW";
pub const MOCK_METADATA_PDA: &str = "A3z8Zh4MCa3zXoBN3GkjD2zZb1SLFoNNrBu1QwvStftf";
pub const MOCK_ASSOCIATED_TOKEN_ADDRESS: &str = "Fg6PaFpoGXkYsidMpWxqSWKepgXqFtTzGTTkY5rvhTzF";

pub const DEFAULT_CONNECT_LATENCY: Duration = Duration::from_millis(1500);
pub const DEFAULT_DISCONNECT_LATENCY: Duration = Duration::from_millis(500);
pub const DEFAULT_MINT_DELAY: Duration = Duration::from_millis(3000);

/// Stand-in for the Phantom browser extension.
///
/// Always succeeds after a fixed latency and hands out the same public key.
pub struct PhantomMockAdapter {
    connect_latency: Duration,
    disconnect_latency: Duration,
}

impl Default for PhantomMockAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_LATENCY, DEFAULT_DISCONNECT_LATENCY)
    }
}

impl PhantomMockAdapter {
    pub fn new(connect_latency: Duration, disconnect_latency: Duration) -> Self {
        Self {
            connect_latency,
            disconnect_latency,
        }
    }
}

#[async_trait]
impl WalletAdapter for PhantomMockAdapter {
    fn name(&self) -> &str {
        PHANTOM_MOCK
    }

    async fn connect(&self) -> Result<ConnectResult> {
        tokio::time::sleep(self.connect_latency).await;
        Ok(ConnectResult {
            public_key: WalletPublicKey(MOCK_PUBLIC_KEY.to_owned()),
        })
    }

    async fn disconnect(&self) -> Result<()> {
        tokio::time::sleep(self.disconnect_latency).await;
        Ok(())
    }
}

/// Returns the same mint record for every request after `delay`.
pub struct MockMinter {
    delay: Duration,
}

impl Default for MockMinter {
    fn default() -> Self {
        Self::new(DEFAULT_MINT_DELAY)
    }
}

impl MockMinter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

pub fn mock_mint_result() -> MintResult {
    MintResult {
        mint_address: MOCK_MINT_ADDRESS.to_owned(),
        tx_signature: MOCK_TX_SIGNATURE.to_owned(),
        metadata_pda: MOCK_METADATA_PDA.to_owned(),
        associated_token_address: MOCK_ASSOCIATED_TOKEN_ADDRESS.to_owned(),
    }
}

#[async_trait]
impl NftMinter for MockMinter {
    async fn mint(&self, req: MintRequest) -> Result<MintResult> {
        tokio::time::sleep(self.delay).await;
        let result = mock_mint_result();
        info!(
            "mock mint for owner {} ({}): {}",
            req.owner.0, req.name, result.mint_address
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn connect_waits_for_latency_then_hands_out_fixed_key() -> Result<()> {
        let adapter = PhantomMockAdapter::default();

        let started = Instant::now();
        let result = adapter.connect().await?;
        assert!(started.elapsed() >= DEFAULT_CONNECT_LATENCY);
        assert_eq!(result.public_key.0, MOCK_PUBLIC_KEY);

        let started = Instant::now();
        adapter.disconnect().await?;
        assert!(started.elapsed() >= DEFAULT_DISCONNECT_LATENCY);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn minter_returns_fixed_record_after_delay() -> Result<()> {
        let minter = MockMinter::default();
        let started = Instant::now();
        let result = minter
            .mint(MintRequest {
                owner: WalletPublicKey(MOCK_PUBLIC_KEY.to_owned()),
                image_url: "https://example.invalid/image.svg".to_owned(),
                name: "Your Generated Image".to_owned(),
                prompt: "a lighthouse".to_owned(),
            })
            .await?;

        assert!(started.elapsed() >= DEFAULT_MINT_DELAY);
        assert_eq!(result, mock_mint_result());
        Ok(())
    }
}
