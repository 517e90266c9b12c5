//! Compile-time constants for the token DAO deployment scenario.
//!
//! The configurable values in [`crate::config::scenario::ScenarioConfig`]
//! default to these.

use crate::types::address::Address;

/// The zero address, used as "no token factory" and "no parent token".
pub const ZERO_ADDRESS: Address = Address::ZERO;

/// Whether the deployed token allows transfers.
pub const TOKEN_TRANSFERABLE: bool = true;

/// Decimals of the deployed token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Maximum tokens per account; `0` means unlimited.
pub const TOKEN_MAX_PER_ACCOUNT: u64 = 0;

/// Artifact deployed by `preInit`.
pub const TOKEN_ARTIFACT: &str = "MiniMeToken";

/// Token name.
pub const TOKEN_NAME: &str = "Token";

/// Token symbol.
pub const TOKEN_SYMBOL: &str = "TKN";

/// Parent snapshot block of a fresh token.
pub const TOKEN_PARENT_SNAPSHOT_BLOCK: u64 = 0;

/// One whole token in base units (10^18).
pub const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Amount minted to each funded account in `preInit`.
pub const MINT_AMOUNT: u128 = ONE_TOKEN;

/// Amount issued on the proxy in `postUpdate`.
pub const ISSUE_AMOUNT: u128 = 2 * ONE_TOKEN;

/// Amount vested to each funded account in `postUpdate`.
pub const VESTED_AMOUNT: u128 = ONE_TOKEN;

/// Number of leading host accounts that receive tokens.
pub const FUNDED_ACCOUNTS: usize = 2;

/// Seconds in a day.
pub const DAY_SECONDS: u64 = 24 * 60 * 60;

/// Finance accounting period (30 days).
pub const DEFAULT_FINANCE_PERIOD: u64 = 30 * DAY_SECONDS;

/// Voting support required (50%, fixed point 10^18).
pub const VOTE_SUPPORT_REQUIRED: &str = "500000000000000000";

/// Voting minimum acceptance quorum (15%, fixed point 10^18).
pub const VOTE_MIN_ACCEPT_QUORUM: &str = "150000000000000000";

/// Vote duration in seconds (1 day).
pub const VOTE_TIME: &str = "86400";

/// Vote settings passed to the voting app, in initializer order.
pub const VOTE_SETTINGS: [&str; 3] = [VOTE_SUPPORT_REQUIRED, VOTE_MIN_ACCEPT_QUORUM, VOTE_TIME];

/// Cliff offset from the vesting start (90 days).
pub const VESTING_CLIFF_PERIOD: u64 = 90 * DAY_SECONDS;

/// Offset from the cliff to full vesting (360 days).
pub const VESTING_COMPLETE_PERIOD: u64 = 360 * DAY_SECONDS;

/// Whether assigned vestings can be revoked.
pub const VESTING_REVOCABLE: bool = true;

/// Voting app name.
pub const VOTING_APP: &str = "voting";

/// Vault app name.
pub const VAULT_APP: &str = "vault";

/// Finance app name.
pub const FINANCE_APP: &str = "finance";

/// Role allowing vote creation on the voting app.
pub const CREATE_VOTES_ROLE: &str = "CREATE_VOTES_ROLE";

/// Role allowing transfers out of the vault.
pub const TRANSFER_ROLE: &str = "TRANSFER_ROLE";

/// Role allowing payment creation on the finance app.
pub const CREATE_PAYMENTS_ROLE: &str = "CREATE_PAYMENTS_ROLE";
