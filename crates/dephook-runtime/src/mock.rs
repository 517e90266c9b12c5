//! In-memory recording runtime for development and testing.
//!
//! Simulates the host's artifact factory, chain client, app installer, proxy
//! and clock without a chain. Every successful call is appended to a shared,
//! ordered call log; any call can be made to fail on its n-th occurrence.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dephook_core::error::AppError;
use dephook_core::result::AppResult;
use dephook_core::types::{Address, Amount, VestingSchedule};

use crate::capabilities::{
    AppHandle, AppInstaller, ChainClient, Clock, HookLog, InstallOptions, MiniMeTokenParams,
    ProxyHandle, TokenFactory, TokenHandle,
};
use crate::hooks::definitions::RuntimeEnv;

/// Unix time the mock clock starts at (2021-01-01T00:00:00Z).
const DEFAULT_NOW: i64 = 1_609_459_200;

/// First address handed out to deployed contracts.
const CONTRACT_ADDRESS_BASE: u64 = 0xc000_0000;

/// First host account address.
const ACCOUNT_ADDRESS_BASE: u64 = 0xacc0_0000;

/// Kind of a recorded call, used for counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// Token deployment.
    Deploy,
    /// Account listing.
    Accounts,
    /// Token mint.
    GenerateTokens,
    /// Token controller change.
    ChangeController,
    /// App installation.
    Install,
    /// Permission grant.
    CreatePermission,
    /// Token issuance on the proxy.
    Issue,
    /// Vested grant on the proxy.
    AssignVested,
    /// Host log callback.
    Log,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Deploy => "deploy",
            Self::Accounts => "accounts",
            Self::GenerateTokens => "generateTokens",
            Self::ChangeController => "changeController",
            Self::Install => "install",
            Self::CreatePermission => "createPermission",
            Self::Issue => "issue",
            Self::AssignVested => "assignVested",
            Self::Log => "log",
        };
        write!(f, "{name}")
    }
}

/// A call made against the mock runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RecordedCall {
    /// A token was deployed.
    Deploy {
        /// Artifact name.
        artifact: String,
        /// Constructor params.
        params: MiniMeTokenParams,
        /// Address assigned to the token.
        address: Address,
    },
    /// Accounts were listed.
    Accounts,
    /// Tokens were minted.
    GenerateTokens {
        /// Token contract.
        token: Address,
        /// Receiver.
        owner: Address,
        /// Amount minted.
        amount: Amount,
    },
    /// Token control changed hands.
    ChangeController {
        /// Token contract.
        token: Address,
        /// New controller.
        controller: Address,
    },
    /// An app was installed.
    Install {
        /// App name.
        app: String,
        /// Address assigned to the app.
        address: Address,
        /// Initializer arguments.
        initialize_args: Vec<serde_json::Value>,
    },
    /// A permission was granted.
    CreatePermission {
        /// App the role lives on.
        app: String,
        /// Address of that app.
        app_address: Address,
        /// Role name.
        role: String,
        /// Entity receiving the role.
        grantee: Option<Address>,
    },
    /// Tokens were issued on the proxy.
    Issue {
        /// Proxy address.
        proxy: Address,
        /// Amount issued.
        amount: Amount,
    },
    /// A vested grant was assigned.
    AssignVested {
        /// Proxy address.
        proxy: Address,
        /// Receiver.
        receiver: Address,
        /// Grant schedule.
        schedule: VestingSchedule,
    },
    /// The host log callback was used.
    Log {
        /// Message logged.
        message: String,
    },
}

impl RecordedCall {
    /// Returns the kind of this call.
    pub fn kind(&self) -> CallKind {
        match self {
            Self::Deploy { .. } => CallKind::Deploy,
            Self::Accounts => CallKind::Accounts,
            Self::GenerateTokens { .. } => CallKind::GenerateTokens,
            Self::ChangeController { .. } => CallKind::ChangeController,
            Self::Install { .. } => CallKind::Install,
            Self::CreatePermission { .. } => CallKind::CreatePermission,
            Self::Issue { .. } => CallKind::Issue,
            Self::AssignVested { .. } => CallKind::AssignVested,
            Self::Log { .. } => CallKind::Log,
        }
    }
}

/// Shared mutable state behind every mock handle.
#[derive(Debug)]
struct MockState {
    /// Host accounts.
    accounts: Mutex<Vec<Address>>,
    /// Clock reading.
    now: Mutex<DateTime<Utc>>,
    /// Next contract address.
    next_address: AtomicU64,
    /// Ordered log of successful calls.
    calls: Mutex<Vec<RecordedCall>>,
    /// Attempts per kind, failed ones included.
    attempts: Mutex<HashMap<CallKind, usize>>,
    /// Kind → 1-based attempt numbers that fail.
    failures: Mutex<HashMap<CallKind, Vec<usize>>>,
}

impl MockState {
    fn allocate_address(&self) -> Address {
        Address::from_low_u64(self.next_address.fetch_add(1, Ordering::SeqCst))
    }

    /// Counts an attempt of `kind` and fails it if configured to.
    fn attempt(&self, kind: CallKind) -> AppResult<()> {
        let n = {
            let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
            let n = attempts.entry(kind).or_insert(0);
            *n += 1;
            *n
        };

        let failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        if failures.get(&kind).is_some_and(|nths| nths.contains(&n)) {
            tracing::warn!("[MockChain] Failing {} attempt #{}", kind, n);
            return Err(AppError::chain(format!("mock {kind} #{n} reverted")));
        }
        Ok(())
    }

    fn record(&self, call: RecordedCall) {
        tracing::debug!("[MockChain] {:?}", call);
        let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.push(call);
    }
}

/// Mock host runtime.
///
/// Cloning is cheap; clones share the same state.
#[derive(Debug, Clone)]
pub struct MockChain {
    state: Arc<MockState>,
    proxy: Arc<MockProxy>,
    dao: Address,
}

impl MockChain {
    /// Creates a mock runtime with two accounts and a fixed clock.
    pub fn new() -> Self {
        let state = Arc::new(MockState {
            accounts: Mutex::new(Vec::new()),
            now: Mutex::new(DateTime::from_timestamp(DEFAULT_NOW, 0).unwrap_or_default()),
            next_address: AtomicU64::new(CONTRACT_ADDRESS_BASE),
            calls: Mutex::new(Vec::new()),
            attempts: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
        });
        let proxy = Arc::new(MockProxy {
            address: state.allocate_address(),
            state: state.clone(),
        });
        let dao = state.allocate_address();

        Self { state, proxy, dao }.with_accounts(2)
    }

    /// Replaces the host accounts with `count` fresh addresses.
    pub fn with_accounts(self, count: usize) -> Self {
        let accounts = (0..count as u64)
            .map(|i| Address::from_low_u64(ACCOUNT_ADDRESS_BASE + i))
            .collect();
        *self.state.accounts.lock().unwrap_or_else(|e| e.into_inner()) = accounts;
        self
    }

    /// Sets the clock reading.
    pub fn with_now(self, now: DateTime<Utc>) -> Self {
        self.set_now(now);
        self
    }

    /// Makes the `nth` (1-based) attempt of `kind` fail with a chain error.
    pub fn fail_on(self, kind: CallKind, nth: usize) -> Self {
        self.state
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(kind)
            .or_default()
            .push(nth);
        self
    }

    /// Moves the clock.
    pub fn set_now(&self, now: DateTime<Utc>) {
        *self.state.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Returns a runtime environment backed by this mock.
    pub fn env(&self) -> RuntimeEnv {
        let shared = Arc::new(self.clone());
        RuntimeEnv::new(shared.clone(), shared.clone(), shared)
    }

    /// Returns the app proxy handle.
    pub fn proxy(&self) -> Arc<dyn ProxyHandle> {
        self.proxy.clone()
    }

    /// Returns the app proxy address.
    pub fn proxy_address(&self) -> Address {
        self.proxy.address
    }

    /// Returns the DAO address.
    pub fn dao_address(&self) -> Address {
        self.dao
    }

    /// Returns an app installer backed by this mock.
    pub fn installer(&self) -> Arc<dyn AppInstaller> {
        Arc::new(self.clone())
    }

    /// Returns a host log callback that records into the call log.
    pub fn host_log(&self) -> Arc<dyn HookLog> {
        Arc::new(self.clone())
    }

    /// Returns the host accounts.
    pub fn host_accounts(&self) -> Vec<Address> {
        self.state
            .accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns every successful call, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns the successful calls of one kind, in order.
    pub fn calls_of(&self, kind: CallKind) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.kind() == kind)
            .collect()
    }

    /// Returns the number of successful calls of one kind.
    pub fn count(&self, kind: CallKind) -> usize {
        self.calls_of(kind).len()
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenFactory for MockChain {
    async fn deploy(
        &self,
        artifact: &str,
        params: &MiniMeTokenParams,
    ) -> AppResult<Arc<dyn TokenHandle>> {
        self.state.attempt(CallKind::Deploy)?;
        let address = self.state.allocate_address();
        self.state.record(RecordedCall::Deploy {
            artifact: artifact.to_string(),
            params: params.clone(),
            address,
        });
        Ok(Arc::new(MockToken {
            address,
            state: self.state.clone(),
        }))
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn accounts(&self) -> AppResult<Vec<Address>> {
        self.state.attempt(CallKind::Accounts)?;
        self.state.record(RecordedCall::Accounts);
        Ok(self.host_accounts())
    }
}

#[async_trait]
impl AppInstaller for MockChain {
    async fn install(
        &self,
        app_name: &str,
        options: InstallOptions,
    ) -> AppResult<Arc<dyn AppHandle>> {
        self.state.attempt(CallKind::Install)?;
        let address = self.state.allocate_address();
        self.state.record(RecordedCall::Install {
            app: app_name.to_string(),
            address,
            initialize_args: options.initialize_args,
        });
        Ok(Arc::new(MockApp {
            name: app_name.to_string(),
            address,
            state: self.state.clone(),
        }))
    }
}

impl Clock for MockChain {
    fn now(&self) -> DateTime<Utc> {
        *self.state.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HookLog for MockChain {
    fn log(&self, message: &str) {
        self.state.record(RecordedCall::Log {
            message: message.to_string(),
        });
    }
}

/// Token deployed by [`MockChain`].
#[derive(Debug)]
pub struct MockToken {
    address: Address,
    state: Arc<MockState>,
}

#[async_trait]
impl TokenHandle for MockToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn generate_tokens(&self, owner: Address, amount: Amount) -> AppResult<()> {
        self.state.attempt(CallKind::GenerateTokens)?;
        self.state.record(RecordedCall::GenerateTokens {
            token: self.address,
            owner,
            amount,
        });
        Ok(())
    }

    async fn change_controller(&self, controller: Address) -> AppResult<()> {
        self.state.attempt(CallKind::ChangeController)?;
        self.state.record(RecordedCall::ChangeController {
            token: self.address,
            controller,
        });
        Ok(())
    }
}

/// App installed by [`MockChain`].
#[derive(Debug)]
pub struct MockApp {
    name: String,
    address: Address,
    state: Arc<MockState>,
}

#[async_trait]
impl AppHandle for MockApp {
    fn name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> Address {
        self.address
    }

    async fn create_permission(&self, role: &str, grantee: Option<Address>) -> AppResult<()> {
        self.state.attempt(CallKind::CreatePermission)?;
        self.state.record(RecordedCall::CreatePermission {
            app: self.name.clone(),
            app_address: self.address,
            role: role.to_string(),
            grantee,
        });
        Ok(())
    }
}

/// App proxy owned by [`MockChain`].
#[derive(Debug)]
pub struct MockProxy {
    address: Address,
    state: Arc<MockState>,
}

#[async_trait]
impl ProxyHandle for MockProxy {
    fn address(&self) -> Address {
        self.address
    }

    async fn issue(&self, amount: Amount) -> AppResult<()> {
        self.state.attempt(CallKind::Issue)?;
        self.state.record(RecordedCall::Issue {
            proxy: self.address,
            amount,
        });
        Ok(())
    }

    async fn assign_vested(&self, receiver: Address, schedule: &VestingSchedule) -> AppResult<()> {
        self.state.attempt(CallKind::AssignVested)?;
        self.state.record(RecordedCall::AssignVested {
            proxy: self.address,
            receiver,
            schedule: *schedule,
        });
        Ok(())
    }
}
