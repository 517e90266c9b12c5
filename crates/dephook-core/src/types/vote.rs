//! Voting app settings.

use serde::{Deserialize, Serialize};

use crate::constants::{VOTE_MIN_ACCEPT_QUORUM, VOTE_SUPPORT_REQUIRED, VOTE_TIME};

/// Settings handed opaquely to the voting app initializer.
///
/// The values are fixed-point numeric strings; nothing here interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSettings {
    /// Support required for a vote to pass.
    #[serde(default = "default_support_required")]
    pub support_required: String,
    /// Minimum acceptance quorum.
    #[serde(default = "default_min_accept_quorum")]
    pub min_accept_quorum: String,
    /// Vote duration in seconds.
    #[serde(default = "default_vote_time")]
    pub vote_time: String,
}

impl VoteSettings {
    /// Returns the settings as initializer arguments, in order.
    pub fn to_init_args(&self) -> Vec<serde_json::Value> {
        vec![
            serde_json::json!(self.support_required),
            serde_json::json!(self.min_accept_quorum),
            serde_json::json!(self.vote_time),
        ]
    }
}

impl Default for VoteSettings {
    fn default() -> Self {
        Self {
            support_required: default_support_required(),
            min_accept_quorum: default_min_accept_quorum(),
            vote_time: default_vote_time(),
        }
    }
}

fn default_support_required() -> String {
    VOTE_SUPPORT_REQUIRED.to_string()
}

fn default_min_accept_quorum() -> String {
    VOTE_MIN_ACCEPT_QUORUM.to_string()
}

fn default_vote_time() -> String {
    VOTE_TIME.to_string()
}
