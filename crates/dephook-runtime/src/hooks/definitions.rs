//! Hook point definitions, invocation parameters, and outputs.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use dephook_core::error::AppError;
use dephook_core::result::AppResult;
use dephook_core::types::Address;

use crate::capabilities::{AppInstaller, ChainClient, Clock, HookLog, ProxyHandle, TokenFactory};

/// Lifecycle stages at which the host calls into a hook set.
///
/// Variants are declared in host invocation order, so `Ord` follows the
/// lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookPoint {
    /// Before the DAO is deployed.
    PreDao,
    /// After the DAO is deployed.
    PostDao,
    /// After the app proxy is created, before it is initialized.
    PreInit,
    /// When the host needs the app proxy's initializer arguments.
    GetInitParams,
    /// After the app proxy is initialized.
    PostInit,
    /// After the app proxy is upgraded to a new implementation.
    PostUpdate,
}

impl HookPoint {
    /// All hook points in host invocation order.
    pub const ALL: [Self; 6] = [
        Self::PreDao,
        Self::PostDao,
        Self::PreInit,
        Self::GetInitParams,
        Self::PostInit,
        Self::PostUpdate,
    ];

    /// Returns the host-facing stage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreDao => "preDao",
            Self::PostDao => "postDao",
            Self::PreInit => "preInit",
            Self::GetInitParams => "getInitParams",
            Self::PostInit => "postInit",
            Self::PostUpdate => "postUpdate",
        }
    }

    /// Returns whether the host may fire this point more than once per run.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Self::PostUpdate)
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HookPoint {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|point| point.as_str() == s)
            .ok_or_else(|| AppError::not_found(format!("Unknown hook point '{s}'")))
    }
}

/// Per-invocation objects supplied by the host.
///
/// Which fields are present depends on the stage; each hook checks for what
/// it needs.
#[derive(Debug, Clone, Default)]
pub struct HookParams {
    /// The app proxy (present from `preInit` on).
    pub proxy: Option<Arc<dyn ProxyHandle>>,
    /// The app installer.
    pub installer: Option<Arc<dyn AppInstaller>>,
    /// The deployed DAO (present from `postDao` on).
    pub dao: Option<Address>,
    /// Host logging callback.
    pub log: Option<Arc<dyn HookLog>>,
}

impl HookParams {
    /// Creates empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the proxy.
    pub fn with_proxy(mut self, proxy: Arc<dyn ProxyHandle>) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Sets the app installer.
    pub fn with_installer(mut self, installer: Arc<dyn AppInstaller>) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Sets the DAO address.
    pub fn with_dao(mut self, dao: Address) -> Self {
        self.dao = Some(dao);
        self
    }

    /// Sets the logging callback.
    pub fn with_log(mut self, log: Arc<dyn HookLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Returns the proxy or a precondition error naming `hook`.
    pub fn require_proxy(&self, hook: HookPoint) -> AppResult<&Arc<dyn ProxyHandle>> {
        self.proxy
            .as_ref()
            .ok_or_else(|| AppError::precondition(format!("{hook}: no app proxy supplied")))
    }

    /// Returns the installer or a precondition error naming `hook`.
    pub fn require_installer(&self, hook: HookPoint) -> AppResult<&Arc<dyn AppInstaller>> {
        self.installer
            .as_ref()
            .ok_or_else(|| AppError::precondition(format!("{hook}: no app installer supplied")))
    }
}

/// Host runtime environment shared by every invocation.
#[derive(Debug, Clone)]
pub struct RuntimeEnv {
    /// Contract artifact factory.
    pub artifacts: Arc<dyn TokenFactory>,
    /// Chain client.
    pub chain: Arc<dyn ChainClient>,
    /// Wall clock.
    pub clock: Arc<dyn Clock>,
}

impl RuntimeEnv {
    /// Creates a runtime environment.
    pub fn new(
        artifacts: Arc<dyn TokenFactory>,
        chain: Arc<dyn ChainClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            artifacts,
            chain,
            clock,
        }
    }
}

/// Value a hook hands back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum HookOutput {
    /// Nothing to return.
    None,
    /// Ordered initializer arguments for the app proxy.
    InitParams(Vec<serde_json::Value>),
}

impl HookOutput {
    /// Returns the init params, if any.
    pub fn into_init_params(self) -> Option<Vec<serde_json::Value>> {
        match self {
            Self::InitParams(params) => Some(params),
            Self::None => None,
        }
    }
}
