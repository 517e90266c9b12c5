//! State shared by the hooks of one deployment process.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use dephook_core::error::AppError;
use dephook_core::result::AppResult;
use dephook_core::types::Address;
use dephook_runtime::capabilities::TokenHandle;

/// Holds the token deployed by `preInit` for the later stages.
///
/// The slot starts empty; reading it before `preInit` is a precondition
/// error rather than a default value.
#[derive(Debug, Default)]
pub struct DeploymentSession {
    token: RwLock<Option<Arc<dyn TokenHandle>>>,
}

impl DeploymentSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the deployed token.
    pub async fn set_token(&self, token: Arc<dyn TokenHandle>) {
        let mut slot = self.token.write().await;
        if let Some(previous) = slot.as_ref() {
            warn!(
                previous = %previous.address(),
                replacement = %token.address(),
                "Replacing deployed token in session"
            );
        }
        *slot = Some(token);
    }

    /// Returns the deployed token.
    pub async fn token(&self) -> AppResult<Arc<dyn TokenHandle>> {
        self.token
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::precondition("Token not deployed: preInit has not run"))
    }

    /// Returns the deployed token's address.
    pub async fn token_address(&self) -> AppResult<Address> {
        Ok(self.token().await?.address())
    }

    /// Returns the deployed token's address, if any.
    pub async fn try_token_address(&self) -> Option<Address> {
        self.token.read().await.as_ref().map(|token| token.address())
    }
}
