//! Lifecycle tests for the token DAO hooks against the mock runtime.

use std::sync::Arc;

use chrono::DateTime;
use serde_json::json;

use dephook_core::config::scenario::ScenarioConfig;
use dephook_core::constants::{DAY_SECONDS, ONE_TOKEN};
use dephook_core::error::ErrorKind;
use dephook_core::types::{Address, Amount};
use dephook_runtime::hooks::definitions::{HookOutput, HookParams, HookPoint};
use dephook_runtime::hooks::dispatcher::HookDispatcher;
use dephook_runtime::hooks::registry::HookRegistry;
use dephook_runtime::mock::{CallKind, MockChain, RecordedCall};
use scenario_token_dao::TokenDaoHooks;

struct Harness {
    chain: MockChain,
    dispatcher: HookDispatcher,
    params: HookParams,
}

impl Harness {
    async fn new(chain: MockChain) -> Self {
        Self::with_config(chain, ScenarioConfig::default()).await
    }

    async fn with_config(chain: MockChain, config: ScenarioConfig) -> Self {
        let registry = Arc::new(HookRegistry::new());
        TokenDaoHooks::new(config)
            .expect("valid config")
            .register(&registry)
            .await
            .expect("register hooks");

        let params = HookParams::new()
            .with_proxy(chain.proxy())
            .with_installer(chain.installer())
            .with_log(chain.host_log());

        Self {
            chain,
            dispatcher: HookDispatcher::new(registry),
            params,
        }
    }

    async fn fire(&self, hook: HookPoint) -> dephook_core::AppResult<HookOutput> {
        self.dispatcher
            .dispatch(hook, &self.params, &self.chain.env())
            .await
    }

    fn token_address(&self) -> Address {
        match self.chain.calls_of(CallKind::Deploy).first() {
            Some(RecordedCall::Deploy { address, .. }) => *address,
            other => panic!("expected a deploy call, got {other:?}"),
        }
    }

    fn installed(&self) -> Vec<(String, Address, Vec<serde_json::Value>)> {
        self.chain
            .calls_of(CallKind::Install)
            .into_iter()
            .map(|call| match call {
                RecordedCall::Install {
                    app,
                    address,
                    initialize_args,
                } => (app, address, initialize_args),
                other => panic!("unexpected call {other:?}"),
            })
            .collect()
    }

    fn position(&self, predicate: impl Fn(&RecordedCall) -> bool) -> usize {
        self.chain
            .calls()
            .iter()
            .position(predicate)
            .expect("call should be recorded")
    }
}

#[tokio::test]
async fn test_pre_init_then_init_params() {
    let h = Harness::new(MockChain::new()).await;

    h.fire(HookPoint::PreInit).await.unwrap();
    let init = h.dispatcher.init_params(&h.params, &h.chain.env()).await.unwrap();

    let token = h.token_address();
    assert_eq!(init, vec![json!(token.to_string()), json!(true), json!(0)]);

    match &h.chain.calls_of(CallKind::Deploy)[0] {
        RecordedCall::Deploy {
            artifact, params, ..
        } => {
            assert_eq!(artifact, "MiniMeToken");
            let zero = Address::ZERO.to_string();
            assert_eq!(
                params.to_constructor_args(),
                vec![
                    json!(zero),
                    json!(zero),
                    json!(0),
                    json!("Token"),
                    json!(18),
                    json!("TKN"),
                    json!(true)
                ]
            );
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn test_pre_init_mints_and_hands_over_control() {
    let h = Harness::new(MockChain::new().with_accounts(4)).await;
    h.fire(HookPoint::PreInit).await.unwrap();

    let token = h.token_address();
    let accounts = h.chain.host_accounts();
    let one = Amount::new(ONE_TOKEN);

    assert_eq!(
        h.chain.calls_of(CallKind::GenerateTokens),
        vec![
            RecordedCall::GenerateTokens {
                token,
                owner: accounts[0],
                amount: one,
            },
            RecordedCall::GenerateTokens {
                token,
                owner: accounts[1],
                amount: one,
            },
        ]
    );
    assert_eq!(one.to_string(), "1000000000000000000");

    assert_eq!(
        h.chain.calls_of(CallKind::ChangeController),
        vec![RecordedCall::ChangeController {
            token,
            controller: h.chain.proxy_address(),
        }]
    );

    let kinds: Vec<_> = h.chain.calls().iter().map(RecordedCall::kind).collect();
    assert_eq!(kinds.last(), Some(&CallKind::ChangeController));
}

#[tokio::test]
async fn test_post_init_installs_and_wires_apps() {
    let h = Harness::new(MockChain::new()).await;
    h.fire(HookPoint::PreInit).await.unwrap();
    h.dispatcher
        .init_params(&h.params, &h.chain.env())
        .await
        .unwrap();
    h.fire(HookPoint::PostInit).await.unwrap();

    let installed = h.installed();
    let names: Vec<_> = installed.iter().map(|(name, _, _)| name.as_str()).collect();
    assert_eq!(names, vec!["voting", "vault", "finance"]);

    let (_, voting, voting_args) = &installed[0];
    let (_, vault, vault_args) = &installed[1];
    let (_, finance, finance_args) = &installed[2];

    assert_eq!(
        voting_args,
        &vec![
            json!(h.token_address().to_string()),
            json!("500000000000000000"),
            json!("150000000000000000"),
            json!("86400"),
        ]
    );
    assert!(vault_args.is_empty());
    assert_eq!(
        finance_args,
        &vec![json!(vault.to_string()), json!(30 * DAY_SECONDS)]
    );

    let grant = |role: &'static str| {
        move |call: &RecordedCall| {
            matches!(call, RecordedCall::CreatePermission { role: r, .. } if r == role)
        }
    };
    let install = |app: &'static str| {
        move |call: &RecordedCall| matches!(call, RecordedCall::Install { app: a, .. } if a == app)
    };

    let votes_grant = h.position(grant("CREATE_VOTES_ROLE"));
    let transfer_grant = h.position(grant("TRANSFER_ROLE"));
    let payments_grant = h.position(grant("CREATE_PAYMENTS_ROLE"));
    let voting_installed = h.position(install("voting"));
    let vault_installed = h.position(install("vault"));
    let finance_installed = h.position(install("finance"));

    assert!(voting_installed < votes_grant);
    assert!(vault_installed < finance_installed);
    assert!(finance_installed < transfer_grant);
    assert!(transfer_grant < payments_grant);

    assert_eq!(
        h.chain.calls_of(CallKind::CreatePermission),
        vec![
            RecordedCall::CreatePermission {
                app: "voting".to_string(),
                app_address: *voting,
                role: "CREATE_VOTES_ROLE".to_string(),
                grantee: None,
            },
            RecordedCall::CreatePermission {
                app: "vault".to_string(),
                app_address: *vault,
                role: "TRANSFER_ROLE".to_string(),
                grantee: Some(*finance),
            },
            RecordedCall::CreatePermission {
                app: "finance".to_string(),
                app_address: *finance,
                role: "CREATE_PAYMENTS_ROLE".to_string(),
                grantee: Some(*voting),
            },
        ]
    );
}

#[tokio::test]
async fn test_init_params_before_pre_init_fails() {
    let h = Harness::new(MockChain::new()).await;
    let err = h
        .dispatcher
        .init_params(&h.params, &h.chain.env())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Precondition);
    assert!(h.chain.calls().is_empty());
}

#[tokio::test]
async fn test_post_init_before_pre_init_fails_without_installs() {
    let h = Harness::new(MockChain::new()).await;
    let err = h.fire(HookPoint::PostInit).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Precondition);
    assert_eq!(h.chain.count(CallKind::Install), 0);
}

#[tokio::test]
async fn test_post_update_issues_and_vests() {
    let now = DateTime::from_timestamp(1_650_000_000, 0).unwrap();
    let h = Harness::new(MockChain::new().with_now(now)).await;
    h.fire(HookPoint::PostUpdate).await.unwrap();

    let proxy = h.chain.proxy_address();
    assert_eq!(
        h.chain.calls_of(CallKind::Issue),
        vec![RecordedCall::Issue {
            proxy,
            amount: "2000000000000000000".parse().unwrap(),
        }]
    );

    let vestings = h.chain.calls_of(CallKind::AssignVested);
    assert_eq!(vestings.len(), 2);

    let accounts = h.chain.host_accounts();
    for (call, account) in vestings.iter().zip(&accounts) {
        match call {
            RecordedCall::AssignVested {
                proxy: p,
                receiver,
                schedule,
            } => {
                assert_eq!(*p, proxy);
                assert_eq!(receiver, account);
                assert_eq!(schedule.amount, Amount::new(ONE_TOKEN));
                assert_eq!(schedule.start, 1_650_000_000);
                assert_eq!(schedule.cliff, schedule.start + 90 * DAY_SECONDS);
                assert_eq!(schedule.vested, schedule.cliff + 360 * DAY_SECONDS);
                assert!(schedule.revocable);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    let issue_at = h.position(|c| c.kind() == CallKind::Issue);
    let first_vest = h.position(|c| c.kind() == CallKind::AssignVested);
    assert!(issue_at < first_vest);
}

#[tokio::test]
async fn test_post_update_recurs_across_upgrades() {
    let h = Harness::new(MockChain::new()).await;
    h.fire(HookPoint::PostUpdate).await.unwrap();

    let later = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    h.chain.set_now(later);
    h.fire(HookPoint::PostUpdate).await.unwrap();

    assert_eq!(h.chain.count(CallKind::Issue), 2);
    match h.chain.calls_of(CallKind::AssignVested).last() {
        Some(RecordedCall::AssignVested { schedule, .. }) => {
            assert_eq!(schedule.start, 1_700_000_000)
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn test_dao_stages_are_inert() {
    let h = Harness::new(MockChain::new()).await;
    let params = h.params.clone().with_dao(Address::from_low_u64(0xda0));

    for hook in [HookPoint::PreDao, HookPoint::PostDao] {
        let output = h
            .dispatcher
            .dispatch(hook, &params, &h.chain.env())
            .await
            .unwrap();
        assert_eq!(output, HookOutput::None);
    }

    assert!(h.chain.calls().is_empty());
}

#[tokio::test]
async fn test_hook_set_registers_once() {
    let registry = HookRegistry::new();
    let hooks = TokenDaoHooks::new(ScenarioConfig::default()).unwrap();
    hooks.register(&registry).await.unwrap();
    assert_eq!(registry.registered_points().await, HookPoint::ALL.to_vec());

    let err = hooks.register(&registry).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_pre_init_fires_once_per_run() {
    let h = Harness::new(MockChain::new()).await;
    h.fire(HookPoint::PreInit).await.unwrap();
    let err = h.fire(HookPoint::PreInit).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(h.chain.count(CallKind::Deploy), 1);
}

#[tokio::test]
async fn test_mint_failure_aborts_pre_init() {
    let h = Harness::new(MockChain::new().fail_on(CallKind::GenerateTokens, 2)).await;
    let err = h.fire(HookPoint::PreInit).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::ChainInteraction);
    assert_eq!(h.chain.count(CallKind::GenerateTokens), 1);
    assert_eq!(h.chain.count(CallKind::ChangeController), 0);
}

#[tokio::test]
async fn test_deploy_failure_leaves_token_unset() {
    let h = Harness::new(MockChain::new().fail_on(CallKind::Deploy, 1)).await;
    let err = h.fire(HookPoint::PreInit).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ChainInteraction);

    let err = h
        .dispatcher
        .init_params(&h.params, &h.chain.env())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Precondition);
}

#[tokio::test]
async fn test_partial_post_update_is_not_rolled_back() {
    let h = Harness::new(MockChain::new().fail_on(CallKind::AssignVested, 2)).await;
    let err = h.fire(HookPoint::PostUpdate).await.unwrap_err();

    assert!(err.is_chain_failure());
    assert_eq!(h.chain.count(CallKind::Issue), 1);
    assert_eq!(h.chain.count(CallKind::AssignVested), 1);
}

#[tokio::test]
async fn test_partial_post_init_is_not_rolled_back() {
    let h = Harness::new(MockChain::new().fail_on(CallKind::CreatePermission, 2)).await;
    h.fire(HookPoint::PreInit).await.unwrap();
    let err = h.fire(HookPoint::PostInit).await.unwrap_err();

    assert!(err.is_chain_failure());
    assert_eq!(h.chain.count(CallKind::Install), 3);
    assert_eq!(h.chain.count(CallKind::CreatePermission), 1);
}

#[tokio::test]
async fn test_missing_runtime_objects_are_preconditions() {
    let chain = MockChain::new();
    let registry = Arc::new(HookRegistry::new());
    TokenDaoHooks::new(ScenarioConfig::default())
        .unwrap()
        .register(&registry)
        .await
        .unwrap();
    let dispatcher = HookDispatcher::new(registry);
    let env = chain.env();

    let err = dispatcher
        .dispatch(HookPoint::PreInit, &HookParams::new(), &env)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Precondition);

    let err = dispatcher
        .dispatch(HookPoint::PostUpdate, &HookParams::new(), &env)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Precondition);

    assert!(chain.calls().is_empty());
}

#[tokio::test]
async fn test_too_few_accounts() {
    let h = Harness::new(MockChain::new().with_accounts(1)).await;
    let err = h.fire(HookPoint::PreInit).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Precondition);
    assert_eq!(h.chain.count(CallKind::Deploy), 1);
    assert_eq!(h.chain.count(CallKind::GenerateTokens), 0);
}

#[tokio::test]
async fn test_config_values_flow_through() {
    let config = ScenarioConfig {
        token_name: "Governance".to_string(),
        token_symbol: "GOV".to_string(),
        token_max_per_account: 10,
        funded_accounts: 3,
        issue_amount: Amount::new(3 * ONE_TOKEN),
        ..ScenarioConfig::default()
    };
    let h = Harness::with_config(MockChain::new().with_accounts(3), config).await;

    h.fire(HookPoint::PreInit).await.unwrap();
    let init = h.dispatcher.init_params(&h.params, &h.chain.env()).await.unwrap();
    assert_eq!(init[2], json!(10));
    assert_eq!(h.chain.count(CallKind::GenerateTokens), 3);

    match &h.chain.calls_of(CallKind::Deploy)[0] {
        RecordedCall::Deploy { params, .. } => {
            assert_eq!(params.name, "Governance");
            assert_eq!(params.symbol, "GOV");
        }
        other => panic!("unexpected call {other:?}"),
    }

    h.fire(HookPoint::PostUpdate).await.unwrap();
    assert_eq!(h.chain.count(CallKind::AssignVested), 3);
}
