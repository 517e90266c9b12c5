//! Vesting schedules anchored at wall-clock time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::amount::Amount;

/// A vested token grant.
///
/// All times are unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    /// Tokens granted.
    pub amount: Amount,
    /// Vesting start.
    pub start: u64,
    /// Nothing is transferable before this.
    pub cliff: u64,
    /// Everything is transferable from this.
    pub vested: u64,
    /// Whether the grantor may revoke before full vesting.
    pub revocable: bool,
}

impl VestingSchedule {
    /// Builds a schedule starting at `now` (floored to whole seconds).
    ///
    /// `cliff = start + cliff_period`, `vested = cliff + complete_period`.
    pub fn anchored_at(
        now: DateTime<Utc>,
        amount: Amount,
        cliff_period: u64,
        complete_period: u64,
        revocable: bool,
    ) -> Result<Self, AppError> {
        let start = u64::try_from(now.timestamp()).map_err(|_| {
            AppError::validation(format!("Vesting start {now} is before the unix epoch"))
        })?;
        let cliff = start
            .checked_add(cliff_period)
            .ok_or_else(|| AppError::validation("Vesting cliff overflows"))?;
        let vested = cliff
            .checked_add(complete_period)
            .ok_or_else(|| AppError::validation("Vesting completion overflows"))?;

        Ok(Self {
            amount,
            start,
            cliff,
            vested,
            revocable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DAY_SECONDS, VESTING_CLIFF_PERIOD, VESTING_COMPLETE_PERIOD};
    use chrono::TimeZone;

    #[test]
    fn test_anchored_offsets() {
        let now = Utc.timestamp_opt(1_600_000_000, 750_000_000).unwrap();
        let schedule = VestingSchedule::anchored_at(
            now,
            Amount::new(5),
            VESTING_CLIFF_PERIOD,
            VESTING_COMPLETE_PERIOD,
            true,
        )
        .unwrap();

        assert_eq!(schedule.start, 1_600_000_000);
        assert_eq!(schedule.cliff, schedule.start + 90 * DAY_SECONDS);
        assert_eq!(schedule.vested, schedule.cliff + 360 * DAY_SECONDS);
        assert!(schedule.revocable);
    }

    #[test]
    fn test_pre_epoch_rejected() {
        let now = Utc.timestamp_opt(-10, 0).unwrap();
        assert!(VestingSchedule::anchored_at(now, Amount::ZERO, 1, 1, false).is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        let now = Utc.timestamp_opt(10, 0).unwrap();
        assert!(VestingSchedule::anchored_at(now, Amount::ZERO, u64::MAX, 1, false).is_err());
    }
}
