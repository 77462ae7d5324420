//! Lockup accrual: how much of a deposit is actually usable at a given epoch.

use alloy_primitives::U256;

use crate::types::{Account, Epoch};

/// Computes the funds not spoken for by lockup as of `current_epoch`.
///
/// Lockup accrues linearly at `lockup_rate` per epoch since the chain last
/// recomputed it at `lockup_last_settled_at`:
///
/// ```text
/// available = funds - (lockup_current + (current_epoch - lockup_last_settled_at) * lockup_rate)
/// ```
///
/// The result is clamped at zero. A negative figure would mean the funds are
/// more than fully spoken for, which must never surface as a usable balance.
/// Epochs before `lockup_last_settled_at` are treated as zero elapsed time.
pub fn available_funds(account: &Account, current_epoch: Epoch) -> U256 {
    let elapsed = current_epoch.saturating_sub(account.lockup_last_settled_at);
    let accrued = account.lockup_rate.saturating_mul(U256::from(elapsed));
    let actual_lockup = account.lockup_current.saturating_add(accrued);
    account.funds.saturating_sub(actual_lockup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(funds: u64, lockup_current: u64, lockup_rate: u64, settled_at: Epoch) -> Account {
        Account {
            funds: U256::from(funds),
            lockup_current: U256::from(lockup_current),
            lockup_rate: U256::from(lockup_rate),
            lockup_last_settled_at: settled_at,
        }
    }

    #[test]
    fn accrues_linearly_since_last_settlement() {
        // The worked example from the withdraw bound: 100 - (20 + 10*1) = 70.
        let account = account(100, 20, 1, 0);
        assert_eq!(available_funds(&account, 10), U256::from(70u64));
    }

    #[test]
    fn zero_rate_is_constant_over_time() {
        let account = account(100, 30, 0, 5);
        assert_eq!(available_funds(&account, 5), U256::from(70u64));
        assert_eq!(available_funds(&account, 1_000_000), U256::from(70u64));
    }

    #[test]
    fn clamps_to_zero_when_overcommitted() {
        let account = account(100, 90, 10, 0);
        // At epoch 1 lockup is exactly 100; beyond that the raw figure goes
        // negative and must clamp.
        assert_eq!(available_funds(&account, 1), U256::ZERO);
        assert_eq!(available_funds(&account, 50), U256::ZERO);
    }

    #[test]
    fn never_negative_across_epoch_range() {
        let account = account(1_000, 333, 7, 100);
        for epoch in 100..400 {
            let available = available_funds(&account, epoch);
            assert!(available <= account.funds);
        }
    }

    #[test]
    fn monotonically_non_increasing_in_time() {
        let account = account(10_000, 100, 3, 50);
        let mut previous = available_funds(&account, 50);
        for epoch in 51..200 {
            let current = available_funds(&account, epoch);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn epoch_before_last_settlement_accrues_nothing() {
        let account = account(100, 20, 5, 50);
        // A historical query below the settlement epoch must not underflow the
        // elapsed-epoch term.
        assert_eq!(available_funds(&account, 10), U256::from(80u64));
        assert_eq!(available_funds(&account, 50), U256::from(80u64));
    }

    #[test]
    fn huge_rate_saturates_instead_of_overflowing() {
        let account = Account {
            funds: U256::from(1u64),
            lockup_current: U256::ZERO,
            lockup_rate: U256::MAX,
            lockup_last_settled_at: 0,
        };
        assert_eq!(available_funds(&account, u64::MAX), U256::ZERO);
    }
}
