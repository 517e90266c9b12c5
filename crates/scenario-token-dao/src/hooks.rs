//! Hook implementations for the token DAO scenario.
//!
//! Each handler performs its chain calls strictly in sequence. Failures are
//! returned as is; when a stage fails after some of its calls went through,
//! the applied steps are logged and left in place.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use dephook_core::config::scenario::ScenarioConfig;
use dephook_core::constants::{
    CREATE_PAYMENTS_ROLE, CREATE_VOTES_ROLE, FINANCE_APP, TOKEN_ARTIFACT,
    TOKEN_PARENT_SNAPSHOT_BLOCK, TRANSFER_ROLE, VAULT_APP, VOTING_APP, ZERO_ADDRESS,
};
use dephook_core::error::AppError;
use dephook_core::result::AppResult;
use dephook_core::types::{Address, VestingSchedule};
use dephook_runtime::capabilities::{
    AppInstaller, InstallOptions, MiniMeTokenParams, ProxyHandle, TokenHandle,
};
use dephook_runtime::hooks::definitions::{HookOutput, HookParams, HookPoint, RuntimeEnv};
use dephook_runtime::hooks::registry::HookHandler;

use crate::session::DeploymentSession;

/// Lists host accounts and returns the first `count`.
async fn funded_accounts(
    env: &RuntimeEnv,
    count: usize,
    hook: HookPoint,
) -> AppResult<Vec<Address>> {
    let mut accounts = env.chain.accounts().await?;
    if accounts.len() < count {
        return Err(AppError::precondition(format!(
            "{hook}: need {count} host accounts, found {}",
            accounts.len()
        )));
    }
    accounts.truncate(count);
    Ok(accounts)
}

/// Logs the steps a failed stage had already applied.
fn report_partial(hook: HookPoint, applied: &[String], error: &AppError) {
    if !applied.is_empty() {
        warn!(
            hook = %hook,
            applied = ?applied,
            error = %error,
            "Stage failed after partial changes; nothing was rolled back"
        );
    }
}

/// Hook handler for preDao and postDao: nothing to customize.
#[derive(Debug)]
pub struct NoopHook {
    hook: HookPoint,
}

impl NoopHook {
    /// Create a no-op handler for `hook`.
    pub fn new(hook: HookPoint) -> Self {
        Self { hook }
    }
}

#[async_trait]
impl HookHandler for NoopHook {
    fn name(&self) -> &str {
        match self.hook {
            HookPoint::PreDao => "token_dao_pre_dao",
            HookPoint::PostDao => "token_dao_post_dao",
            _ => "token_dao_noop",
        }
    }

    fn hook_point(&self) -> HookPoint {
        self.hook
    }

    async fn handle(&self, _params: &HookParams, _env: &RuntimeEnv) -> AppResult<HookOutput> {
        Ok(HookOutput::None)
    }
}

/// Hook handler for preInit: deploy the token, fund accounts, hand control
/// to the proxy.
#[derive(Debug)]
pub struct PreInitHook {
    session: Arc<DeploymentSession>,
    config: Arc<ScenarioConfig>,
}

impl PreInitHook {
    /// Create a new preInit hook handler
    pub fn new(session: Arc<DeploymentSession>, config: Arc<ScenarioConfig>) -> Self {
        Self { session, config }
    }

    fn token_params(&self) -> MiniMeTokenParams {
        MiniMeTokenParams {
            token_factory: ZERO_ADDRESS,
            parent_token: ZERO_ADDRESS,
            parent_snapshot_block: TOKEN_PARENT_SNAPSHOT_BLOCK,
            name: self.config.token_name.clone(),
            decimals: self.config.token_decimals,
            symbol: self.config.token_symbol.clone(),
            transfers_enabled: self.config.token_transferable,
        }
    }

    async fn fund_and_transfer(
        &self,
        token: &Arc<dyn TokenHandle>,
        proxy: &Arc<dyn ProxyHandle>,
        env: &RuntimeEnv,
        applied: &mut Vec<String>,
    ) -> AppResult<()> {
        let accounts =
            funded_accounts(env, self.config.funded_accounts, HookPoint::PreInit).await?;

        for account in accounts {
            token
                .generate_tokens(account, self.config.mint_amount)
                .await?;
            applied.push(format!("generateTokens({account})"));
        }

        token.change_controller(proxy.address()).await?;
        applied.push(format!("changeController({})", proxy.address()));

        Ok(())
    }
}

#[async_trait]
impl HookHandler for PreInitHook {
    fn name(&self) -> &str {
        "token_dao_pre_init"
    }

    fn hook_point(&self) -> HookPoint {
        HookPoint::PreInit
    }

    async fn handle(&self, params: &HookParams, env: &RuntimeEnv) -> AppResult<HookOutput> {
        let proxy = params.require_proxy(HookPoint::PreInit)?;

        let token = env
            .artifacts
            .deploy(TOKEN_ARTIFACT, &self.token_params())
            .await?;
        info!(
            token = %token.address(),
            symbol = %self.config.token_symbol,
            "Token deployed"
        );
        self.session.set_token(token.clone()).await;

        let mut applied = vec![format!("deploy({})", token.address())];
        if let Err(e) = self.fund_and_transfer(&token, proxy, env, &mut applied).await {
            report_partial(HookPoint::PreInit, &applied, &e);
            return Err(e);
        }

        info!(
            token = %token.address(),
            controller = %proxy.address(),
            "Token funded and handed to proxy"
        );
        Ok(HookOutput::None)
    }
}

/// Hook handler for postInit: install voting, vault and finance and wire
/// their permissions.
#[derive(Debug)]
pub struct PostInitHook {
    session: Arc<DeploymentSession>,
    config: Arc<ScenarioConfig>,
}

impl PostInitHook {
    /// Create a new postInit hook handler
    pub fn new(session: Arc<DeploymentSession>, config: Arc<ScenarioConfig>) -> Self {
        Self { session, config }
    }

    async fn install_apps(
        &self,
        installer: &Arc<dyn AppInstaller>,
        token: Address,
        applied: &mut Vec<String>,
    ) -> AppResult<()> {
        let mut voting_args = vec![serde_json::Value::from(token)];
        voting_args.extend(self.config.vote.to_init_args());
        let voting = installer
            .install(VOTING_APP, InstallOptions::with_args(voting_args))
            .await?;
        applied.push(format!("install({VOTING_APP})"));

        voting.create_permission(CREATE_VOTES_ROLE, None).await?;
        applied.push(format!("{VOTING_APP}.{CREATE_VOTES_ROLE}"));

        let vault = installer
            .install(VAULT_APP, InstallOptions::default())
            .await?;
        applied.push(format!("install({VAULT_APP})"));

        let finance = installer
            .install(
                FINANCE_APP,
                InstallOptions::with_args(vec![
                    serde_json::Value::from(vault.address()),
                    serde_json::json!(self.config.finance_period),
                ]),
            )
            .await?;
        applied.push(format!("install({FINANCE_APP})"));

        vault
            .create_permission(TRANSFER_ROLE, Some(finance.address()))
            .await?;
        applied.push(format!("{VAULT_APP}.{TRANSFER_ROLE}"));

        finance
            .create_permission(CREATE_PAYMENTS_ROLE, Some(voting.address()))
            .await?;
        applied.push(format!("{FINANCE_APP}.{CREATE_PAYMENTS_ROLE}"));

        info!(
            voting = %voting.address(),
            vault = %vault.address(),
            finance = %finance.address(),
            "Apps installed and permissions granted"
        );
        Ok(())
    }
}

#[async_trait]
impl HookHandler for PostInitHook {
    fn name(&self) -> &str {
        "token_dao_post_init"
    }

    fn hook_point(&self) -> HookPoint {
        HookPoint::PostInit
    }

    async fn handle(&self, params: &HookParams, _env: &RuntimeEnv) -> AppResult<HookOutput> {
        let installer = params.require_installer(HookPoint::PostInit)?;
        let token = self.session.token_address().await?;

        let mut applied = Vec::new();
        if let Err(e) = self.install_apps(installer, token, &mut applied).await {
            report_partial(HookPoint::PostInit, &applied, &e);
            return Err(e);
        }

        Ok(HookOutput::None)
    }
}

/// Hook handler for getInitParams: the proxy's initializer arguments.
#[derive(Debug)]
pub struct GetInitParamsHook {
    session: Arc<DeploymentSession>,
    config: Arc<ScenarioConfig>,
}

impl GetInitParamsHook {
    /// Create a new getInitParams hook handler
    pub fn new(session: Arc<DeploymentSession>, config: Arc<ScenarioConfig>) -> Self {
        Self { session, config }
    }
}

#[async_trait]
impl HookHandler for GetInitParamsHook {
    fn name(&self) -> &str {
        "token_dao_get_init_params"
    }

    fn hook_point(&self) -> HookPoint {
        HookPoint::GetInitParams
    }

    async fn handle(&self, _params: &HookParams, _env: &RuntimeEnv) -> AppResult<HookOutput> {
        let token = self.session.token_address().await?;

        Ok(HookOutput::InitParams(vec![
            serde_json::Value::from(token),
            serde_json::json!(self.config.token_transferable),
            serde_json::json!(self.config.token_max_per_account),
        ]))
    }
}

/// Hook handler for postUpdate: issue tokens on the proxy and vest them to
/// the funded accounts.
#[derive(Debug)]
pub struct PostUpdateHook {
    session: Arc<DeploymentSession>,
    config: Arc<ScenarioConfig>,
}

impl PostUpdateHook {
    /// Create a new postUpdate hook handler
    pub fn new(session: Arc<DeploymentSession>, config: Arc<ScenarioConfig>) -> Self {
        Self { session, config }
    }

    async fn issue_and_vest(
        &self,
        proxy: &Arc<dyn ProxyHandle>,
        accounts: &[Address],
        schedule: &VestingSchedule,
        applied: &mut Vec<String>,
    ) -> AppResult<()> {
        proxy.issue(self.config.issue_amount).await?;
        applied.push(format!("issue({})", self.config.issue_amount));

        for account in accounts {
            proxy.assign_vested(*account, schedule).await?;
            applied.push(format!("assignVested({account})"));
        }
        Ok(())
    }
}

#[async_trait]
impl HookHandler for PostUpdateHook {
    fn name(&self) -> &str {
        "token_dao_post_update"
    }

    fn hook_point(&self) -> HookPoint {
        HookPoint::PostUpdate
    }

    async fn handle(&self, params: &HookParams, env: &RuntimeEnv) -> AppResult<HookOutput> {
        let proxy = params.require_proxy(HookPoint::PostUpdate)?;

        let schedule = VestingSchedule::anchored_at(
            env.clock.now(),
            self.config.vested_amount,
            self.config.vesting_cliff_period,
            self.config.vesting_complete_period,
            self.config.vesting_revocable,
        )?;
        let token = self.session.try_token_address().await;
        debug!(
            token = ?token,
            start = schedule.start,
            cliff = schedule.cliff,
            vested = schedule.vested,
            "Vesting schedule computed"
        );

        let accounts =
            funded_accounts(env, self.config.funded_accounts, HookPoint::PostUpdate).await?;

        let mut applied = Vec::new();
        if let Err(e) = self
            .issue_and_vest(proxy, &accounts, &schedule, &mut applied)
            .await
        {
            report_partial(HookPoint::PostUpdate, &applied, &e);
            return Err(e);
        }

        info!(
            proxy = %proxy.address(),
            vestings = accounts.len(),
            "Vestings assigned"
        );
        Ok(HookOutput::None)
    }
}
