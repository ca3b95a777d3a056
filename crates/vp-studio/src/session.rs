use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vp_api_types::{WALLET_CONNECTED_KEY, WALLET_CONNECTED_VALUE, WalletPublicKey, WalletStatusResponse};
use vp_storage::FlagStore;
use vp_wallet_client::WalletAdapter;

use crate::WalletError;

// One enum instead of two bools: "connecting and connected" cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Connection {
    Disconnected,
    Connecting,
    Connected(WalletPublicKey),
    Disconnecting(WalletPublicKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(WalletPublicKey),
    AlreadyConnected(WalletPublicKey),
    AlreadyConnecting,
}

pub struct WalletSession {
    adapter: Arc<dyn WalletAdapter>,
    flags: Arc<dyn FlagStore>,
    connection: RwLock<Connection>,
}

impl WalletSession {
    pub fn new(adapter: Arc<dyn WalletAdapter>, flags: Arc<dyn FlagStore>) -> Self {
        Self {
            adapter,
            flags,
            connection: RwLock::new(Connection::Disconnected),
        }
    }

    pub async fn status(&self) -> WalletStatusResponse {
        match &*self.connection.read().await {
            Connection::Disconnected => WalletStatusResponse::default(),
            Connection::Connecting => WalletStatusResponse {
                connected: false,
                connecting: true,
                public_key: None,
            },
            Connection::Connected(key) | Connection::Disconnecting(key) => WalletStatusResponse {
                connected: true,
                connecting: false,
                public_key: Some(key.0.clone()),
            },
        }
    }

    pub async fn is_connected(&self) -> bool {
        matches!(*self.connection.read().await, Connection::Connected(_))
    }

    pub async fn public_key(&self) -> Option<WalletPublicKey> {
        match &*self.connection.read().await {
            Connection::Connected(key) => Some(key.clone()),
            _ => None,
        }
    }

    pub async fn connect(&self) -> Result<ConnectOutcome, WalletError> {
        {
            let mut guard = self.connection.write().await;
            match &*guard {
                Connection::Connecting => return Ok(ConnectOutcome::AlreadyConnecting),
                Connection::Connected(key) => return Ok(ConnectOutcome::AlreadyConnected(key.clone())),
                Connection::Disconnecting(_) => return Err(WalletError::DisconnectInFlight),
                Connection::Disconnected => *guard = Connection::Connecting,
            }
        }

        match self.adapter.connect().await {
            Ok(result) => {
                *self.connection.write().await = Connection::Connected(result.public_key.clone());
                if let Err(err) = self
                    .flags
                    .set_flag(WALLET_CONNECTED_KEY, WALLET_CONNECTED_VALUE)
                    .await
                {
                    warn!("failed to persist wallet connection flag: {}", err);
                }
                info!("{} wallet connected: {}", self.adapter.name(), result.public_key.short());
                Ok(ConnectOutcome::Connected(result.public_key))
            }
            Err(err) => {
                *self.connection.write().await = Connection::Disconnected;
                warn!("{} wallet connection failed: {}", self.adapter.name(), err);
                Err(WalletError::ConnectFailed(err.to_string()))
            }
        }
    }

    /// Returns `false` when there was nothing to disconnect.
    pub async fn disconnect(&self) -> Result<bool, WalletError> {
        let key = {
            let mut guard = self.connection.write().await;
            let key = match &*guard {
                Connection::Connecting => return Err(WalletError::ConnectInFlight),
                Connection::Disconnecting(_) => return Err(WalletError::DisconnectInFlight),
                Connection::Disconnected => return Ok(false),
                Connection::Connected(key) => key.clone(),
            };
            *guard = Connection::Disconnecting(key.clone());
            key
        };

        if let Err(err) = self.adapter.disconnect().await {
            *self.connection.write().await = Connection::Connected(key);
            return Err(WalletError::DisconnectFailed(err.to_string()));
        }

        *self.connection.write().await = Connection::Disconnected;
        if let Err(err) = self.flags.remove_flag(WALLET_CONNECTED_KEY).await {
            warn!("failed to clear wallet connection flag: {}", err);
        }
        info!("{} wallet disconnected", self.adapter.name());
        Ok(true)
    }

    pub async fn should_auto_reconnect(&self) -> bool {
        match self.flags.get_flag(WALLET_CONNECTED_KEY).await {
            Ok(value) => value.as_deref() == Some(WALLET_CONNECTED_VALUE),
            Err(err) => {
                warn!("failed to read wallet connection flag: {}", err);
                false
            }
        }
    }

    /// Fire-and-forget reconnect for a previously connected wallet.
    pub fn spawn_auto_reconnect(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            if !session.should_auto_reconnect().await {
                return;
            }
            info!("restoring previous wallet connection");
            if let Err(err) = session.connect().await {
                warn!("auto-reconnect failed: {}", err);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::time::Duration;
    use vp_storage::InMemoryFlagStore;
    use vp_wallet_client::ConnectResult;
    use vp_wallet_phantom::{MOCK_PUBLIC_KEY, PhantomMockAdapter};

    struct UnreachableWallet;

    #[async_trait]
    impl WalletAdapter for UnreachableWallet {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn connect(&self) -> anyhow::Result<ConnectResult> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Err(anyhow!("extension not installed"))
        }

        async fn disconnect(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn phantom_session(flags: Arc<InMemoryFlagStore>) -> Arc<WalletSession> {
        Arc::new(WalletSession::new(Arc::new(PhantomMockAdapter::default()), flags))
    }

    fn assert_invariant(status: &WalletStatusResponse) {
        assert!(!(status.connected && status.connecting));
        assert_eq!(status.public_key.is_some(), status.connected);
    }

    #[tokio::test(start_paused = true)]
    async fn connect_passes_through_connecting() -> anyhow::Result<()> {
        let flags = Arc::new(InMemoryFlagStore::default());
        let session = phantom_session(Arc::clone(&flags));

        let pending = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.connect().await }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        let status = session.status().await;
        assert_invariant(&status);
        assert!(status.connecting);

        assert_eq!(session.connect().await, Ok(ConnectOutcome::AlreadyConnecting));
        assert_eq!(session.disconnect().await, Err(WalletError::ConnectInFlight));

        let outcome = pending.await??;
        assert_eq!(
            outcome,
            ConnectOutcome::Connected(WalletPublicKey(MOCK_PUBLIC_KEY.to_owned()))
        );

        let status = session.status().await;
        assert_invariant(&status);
        assert!(status.connected);
        assert_eq!(status.public_key.as_deref(), Some(MOCK_PUBLIC_KEY));
        assert_eq!(flags.get_flag(WALLET_CONNECTED_KEY).await?.as_deref(), Some("true"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_clears_state_and_flag() -> anyhow::Result<()> {
        let flags = Arc::new(InMemoryFlagStore::default());
        let session = phantom_session(Arc::clone(&flags));

        assert_eq!(session.disconnect().await, Ok(false));
        session.connect().await?;
        assert!(matches!(
            session.connect().await,
            Ok(ConnectOutcome::AlreadyConnected(_))
        ));

        assert_eq!(session.disconnect().await, Ok(true));
        let status = session.status().await;
        assert_invariant(&status);
        assert!(!status.connected);
        assert_eq!(flags.get_flag(WALLET_CONNECTED_KEY).await?, None);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn connect_during_disconnect_is_rejected() -> anyhow::Result<()> {
        let flags = Arc::new(InMemoryFlagStore::default());
        let session = phantom_session(Arc::clone(&flags));
        session.connect().await?;

        let pending = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.disconnect().await }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(session.connect().await, Err(WalletError::DisconnectInFlight));
        assert_eq!(session.disconnect().await, Err(WalletError::DisconnectInFlight));

        assert_eq!(pending.await?, Ok(true));
        let status = session.status().await;
        assert_invariant(&status);
        assert!(!status.connected);
        assert_eq!(flags.get_flag(WALLET_CONNECTED_KEY).await?, None);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn failed_connect_returns_to_disconnected() -> anyhow::Result<()> {
        let flags = Arc::new(InMemoryFlagStore::default());
        let session = WalletSession::new(Arc::new(UnreachableWallet), flags.clone());

        let err = session.connect().await.expect_err("adapter fails");
        assert!(matches!(err, WalletError::ConnectFailed(_)));
        assert_eq!(session.status().await, WalletStatusResponse::default());
        assert_eq!(flags.get_flag(WALLET_CONNECTED_KEY).await?, None);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn auto_reconnect_only_with_true_flag() -> anyhow::Result<()> {
        let flags = Arc::new(InMemoryFlagStore::default());
        flags.set_flag(WALLET_CONNECTED_KEY, "yes").await?;
        let session = phantom_session(Arc::clone(&flags));
        session.spawn_auto_reconnect().await?;
        assert!(!session.is_connected().await);

        flags.set_flag(WALLET_CONNECTED_KEY, "true").await?;
        let session = phantom_session(Arc::clone(&flags));
        let handle = session.spawn_auto_reconnect();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(session.status().await.connecting);

        handle.await?;
        assert!(session.is_connected().await);
        Ok(())
    }
}
