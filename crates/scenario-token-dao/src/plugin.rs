//! Token DAO hook set.

use std::sync::Arc;

use tracing::info;

use dephook_core::config::scenario::ScenarioConfig;
use dephook_core::result::AppResult;
use dephook_runtime::hooks::definitions::HookPoint;
use dephook_runtime::hooks::registry::{HookHandler, HookRegistry};

use crate::hooks::{GetInitParamsHook, NoopHook, PostInitHook, PostUpdateHook, PreInitHook};
use crate::session::DeploymentSession;

/// The hook set: one handler per stage, all sharing one session.
#[derive(Debug, Clone)]
pub struct TokenDaoHooks {
    session: Arc<DeploymentSession>,
    config: Arc<ScenarioConfig>,
}

impl TokenDaoHooks {
    /// Creates the hook set with a fresh session.
    ///
    /// `config` is validated here as well, so a scenario built in code gets
    /// the same checks as a loaded one.
    pub fn new(config: ScenarioConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            session: Arc::new(DeploymentSession::new()),
            config: Arc::new(config),
        })
    }

    /// Returns the handlers for every stage, in lifecycle order.
    pub fn handlers(&self) -> Vec<Arc<dyn HookHandler>> {
        let session = &self.session;
        let config = &self.config;

        vec![
            Arc::new(NoopHook::new(HookPoint::PreDao)) as Arc<dyn HookHandler>,
            Arc::new(NoopHook::new(HookPoint::PostDao)),
            Arc::new(PreInitHook::new(session.clone(), config.clone())),
            Arc::new(GetInitParamsHook::new(session.clone(), config.clone())),
            Arc::new(PostInitHook::new(session.clone(), config.clone())),
            Arc::new(PostUpdateHook::new(session.clone(), config.clone())),
        ]
    }

    /// Registers every handler with `registry`.
    pub async fn register(&self, registry: &HookRegistry) -> AppResult<()> {
        let handlers = self.handlers();
        let count = handlers.len();
        registry.register_all(handlers).await?;

        info!(
            hooks = count,
            symbol = %self.config.token_symbol,
            "Token DAO hooks registered"
        );
        Ok(())
    }
}
