//! Chain-facing value types shared by the runtime and the hook sets.

pub mod address;
pub mod amount;
pub mod vesting;
pub mod vote;

pub use address::Address;
pub use amount::Amount;
pub use vesting::VestingSchedule;
pub use vote::VoteSettings;
