//! Token DAO scenario configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FINANCE_PERIOD, FUNDED_ACCOUNTS, ISSUE_AMOUNT, MINT_AMOUNT, TOKEN_DECIMALS,
    TOKEN_MAX_PER_ACCOUNT, TOKEN_NAME, TOKEN_SYMBOL, TOKEN_TRANSFERABLE, VESTED_AMOUNT,
    VESTING_CLIFF_PERIOD, VESTING_COMPLETE_PERIOD, VESTING_REVOCABLE,
};
use crate::error::AppError;
use crate::types::amount::Amount;
use crate::types::vote::VoteSettings;

/// Values used by the token DAO hooks.
///
/// Every field defaults to its compile-time constant, so an empty section
/// reproduces the stock deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Token name passed to the token deployment.
    #[serde(default = "default_token_name")]
    pub token_name: String,
    /// Token symbol passed to the token deployment.
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,
    /// Token decimals.
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,
    /// Whether token transfers are enabled.
    #[serde(default = "default_token_transferable")]
    pub token_transferable: bool,
    /// Per-account cap returned in the proxy init params (0 = unlimited).
    #[serde(default = "default_token_max_per_account")]
    pub token_max_per_account: u64,
    /// Number of leading host accounts that receive tokens.
    #[serde(default = "default_funded_accounts")]
    pub funded_accounts: usize,
    /// Amount minted to each funded account before the proxy is initialized.
    #[serde(default = "default_mint_amount")]
    pub mint_amount: Amount,
    /// Amount issued on the proxy after an upgrade.
    #[serde(default = "default_issue_amount")]
    pub issue_amount: Amount,
    /// Amount vested to each funded account after an upgrade.
    #[serde(default = "default_vested_amount")]
    pub vested_amount: Amount,
    /// Finance accounting period in seconds.
    #[serde(default = "default_finance_period")]
    pub finance_period: u64,
    /// Voting app settings.
    #[serde(default)]
    pub vote: VoteSettings,
    /// Seconds from vesting start to cliff.
    #[serde(default = "default_vesting_cliff_period")]
    pub vesting_cliff_period: u64,
    /// Seconds from cliff to full vesting.
    #[serde(default = "default_vesting_complete_period")]
    pub vesting_complete_period: u64,
    /// Whether vestings are revocable.
    #[serde(default = "default_vesting_revocable")]
    pub vesting_revocable: bool,
}

impl ScenarioConfig {
    /// Checks that the configured values describe a deployable scenario.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.token_symbol.trim().is_empty() {
            return Err(AppError::validation("scenario.token_symbol must not be empty"));
        }
        if self.funded_accounts == 0 {
            return Err(AppError::validation(
                "scenario.funded_accounts must be at least 1",
            ));
        }

        let vested_total = u128::try_from(self.funded_accounts)
            .ok()
            .and_then(|n| self.vested_amount.base_units().checked_mul(n))
            .ok_or_else(|| AppError::validation("scenario vested total overflows"))?;
        if vested_total > self.issue_amount.base_units() {
            return Err(AppError::validation(format!(
                "scenario.issue_amount ({}) cannot cover {} vestings of {}",
                self.issue_amount, self.funded_accounts, self.vested_amount
            )));
        }

        Ok(())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            token_name: default_token_name(),
            token_symbol: default_token_symbol(),
            token_decimals: default_token_decimals(),
            token_transferable: default_token_transferable(),
            token_max_per_account: default_token_max_per_account(),
            funded_accounts: default_funded_accounts(),
            mint_amount: default_mint_amount(),
            issue_amount: default_issue_amount(),
            vested_amount: default_vested_amount(),
            finance_period: default_finance_period(),
            vote: VoteSettings::default(),
            vesting_cliff_period: default_vesting_cliff_period(),
            vesting_complete_period: default_vesting_complete_period(),
            vesting_revocable: default_vesting_revocable(),
        }
    }
}

fn default_token_name() -> String {
    TOKEN_NAME.to_string()
}

fn default_token_symbol() -> String {
    TOKEN_SYMBOL.to_string()
}

fn default_token_decimals() -> u8 {
    TOKEN_DECIMALS
}

fn default_token_transferable() -> bool {
    TOKEN_TRANSFERABLE
}

fn default_token_max_per_account() -> u64 {
    TOKEN_MAX_PER_ACCOUNT
}

fn default_funded_accounts() -> usize {
    FUNDED_ACCOUNTS
}

fn default_mint_amount() -> Amount {
    Amount::new(MINT_AMOUNT)
}

fn default_issue_amount() -> Amount {
    Amount::new(ISSUE_AMOUNT)
}

fn default_vested_amount() -> Amount {
    Amount::new(VESTED_AMOUNT)
}

fn default_finance_period() -> u64 {
    DEFAULT_FINANCE_PERIOD
}

fn default_vesting_cliff_period() -> u64 {
    VESTING_CLIFF_PERIOD
}

fn default_vesting_complete_period() -> u64 {
    VESTING_COMPLETE_PERIOD
}

fn default_vesting_revocable() -> bool {
    VESTING_REVOCABLE
}
