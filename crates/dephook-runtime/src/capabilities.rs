//! Capability interfaces for the host-supplied runtime.
//!
//! Every chain side effect a hook performs goes through one of these traits.
//! Real adapters live in the host; tests use [`crate::mock`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dephook_core::result::AppResult;
use dephook_core::types::{Address, Amount, VestingSchedule};

/// Constructor arguments of a MiniMe-style token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniMeTokenParams {
    /// Address of the token factory used for clones.
    pub token_factory: Address,
    /// Parent token to fork from.
    pub parent_token: Address,
    /// Block of the parent token to snapshot.
    pub parent_snapshot_block: u64,
    /// Token name.
    pub name: String,
    /// Token decimals.
    pub decimals: u8,
    /// Token symbol.
    pub symbol: String,
    /// Whether transfers are enabled.
    pub transfers_enabled: bool,
}

impl MiniMeTokenParams {
    /// Returns the constructor arguments in deployment order.
    pub fn to_constructor_args(&self) -> Vec<serde_json::Value> {
        vec![
            serde_json::Value::from(self.token_factory),
            serde_json::Value::from(self.parent_token),
            serde_json::json!(self.parent_snapshot_block),
            serde_json::json!(self.name),
            serde_json::json!(self.decimals),
            serde_json::json!(self.symbol),
            serde_json::json!(self.transfers_enabled),
        ]
    }
}

/// Options for an app installation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstallOptions {
    /// Arguments passed to the app's `initialize`.
    pub initialize_args: Vec<serde_json::Value>,
}

impl InstallOptions {
    /// Creates options with the given initializer arguments.
    pub fn with_args(initialize_args: Vec<serde_json::Value>) -> Self {
        Self { initialize_args }
    }
}

/// Deploys contract artifacts.
#[async_trait]
pub trait TokenFactory: Send + Sync + std::fmt::Debug {
    /// Deploys a new token from `artifact` with the given constructor params.
    async fn deploy(
        &self,
        artifact: &str,
        params: &MiniMeTokenParams,
    ) -> AppResult<Arc<dyn TokenHandle>>;
}

/// A deployed token contract.
#[async_trait]
pub trait TokenHandle: Send + Sync + std::fmt::Debug {
    /// Address of the token contract.
    fn address(&self) -> Address;

    /// Mints `amount` to `owner`.
    async fn generate_tokens(&self, owner: Address, amount: Amount) -> AppResult<()>;

    /// Transfers control of the token to `controller`.
    async fn change_controller(&self, controller: Address) -> AppResult<()>;
}

/// Read access to the chain.
#[async_trait]
pub trait ChainClient: Send + Sync + std::fmt::Debug {
    /// Lists the accounts available to the host, in host order.
    async fn accounts(&self) -> AppResult<Vec<Address>>;
}

/// Installs auxiliary apps into the deployment.
#[async_trait]
pub trait AppInstaller: Send + Sync + std::fmt::Debug {
    /// Deploys and initializes `app_name`.
    async fn install(&self, app_name: &str, options: InstallOptions)
    -> AppResult<Arc<dyn AppHandle>>;
}

/// An installed app.
#[async_trait]
pub trait AppHandle: Send + Sync + std::fmt::Debug {
    /// App name as passed to the installer.
    fn name(&self) -> &str;

    /// Address of the app proxy.
    fn address(&self) -> Address;

    /// Grants `role` on this app to `grantee` (`None` lets the installer
    /// choose its default grantee).
    async fn create_permission(&self, role: &str, grantee: Option<Address>) -> AppResult<()>;
}

/// The application proxy being deployed.
#[async_trait]
pub trait ProxyHandle: Send + Sync + std::fmt::Debug {
    /// Address of the proxy.
    fn address(&self) -> Address;

    /// Issues `amount` new tokens held by the proxy.
    async fn issue(&self, amount: Amount) -> AppResult<()>;

    /// Assigns a vested grant to `receiver`.
    async fn assign_vested(&self, receiver: Address, schedule: &VestingSchedule) -> AppResult<()>;
}

/// Source of wall-clock time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Logging callback supplied by the host.
pub trait HookLog: Send + Sync + std::fmt::Debug {
    /// Emits a message through the host's reporter.
    fn log(&self, message: &str);
}
