//! Typed event extraction from transaction receipts.
//!
//! Sync operations confirm a transaction and then look for the one contract
//! event that describes the outcome. Absence is surfaced as `None` so the call
//! site decides whether that is fatal (it is, for every sync operation in this
//! crate: a confirmed write without its event means an ABI mismatch or a reorg).

use alloy_rpc_types_eth::{Log, TransactionReceipt};
use alloy_sol_types::SolEvent;

/// Finds and decodes the first occurrence of event `E` in the receipt's logs.
pub fn find_event<E: SolEvent>(receipt: &TransactionReceipt) -> Option<E> {
    let logs = receipt
        .inner
        .as_receipt()
        .map(|r| r.logs.as_slice())
        .unwrap_or_default();
    find_event_in_logs(logs)
}

/// Finds and decodes the first occurrence of event `E` in a slice of logs.
///
/// Logs emitted by other contracts or other events fail to decode and are
/// skipped rather than treated as errors.
pub fn find_event_in_logs<E: SolEvent>(logs: &[Log]) -> Option<E> {
    logs.iter()
        .find_map(|log| log.log_decode::<E>().ok())
        .map(|decoded| decoded.inner.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::IPayments;
    use alloy_primitives::{Address, U256, address};

    fn rpc_log(address: Address, data: alloy_primitives::LogData) -> Log {
        Log {
            inner: alloy_primitives::Log { address, data },
            ..Default::default()
        }
    }

    #[test]
    fn finds_matching_event() {
        let event = IPayments::DepositRecorded {
            token: address!("00000000000000000000000000000000000000aa"),
            from: address!("00000000000000000000000000000000000000bb"),
            to: address!("00000000000000000000000000000000000000cc"),
            amount: U256::from(1_000u64),
        };
        let logs = vec![rpc_log(Address::ZERO, event.encode_log_data())];

        let found = find_event_in_logs::<IPayments::DepositRecorded>(&logs).unwrap();
        assert_eq!(found.amount, U256::from(1_000u64));
        assert_eq!(found.to, event.to);
    }

    #[test]
    fn skips_non_matching_events() {
        let other = IPayments::WithdrawRecorded {
            token: Address::ZERO,
            from: Address::ZERO,
            to: Address::ZERO,
            amount: U256::from(7u64),
        };
        let wanted = IPayments::RailSettled {
            railId: U256::from(3u64),
            totalSettledAmount: U256::from(50u64),
            totalNetPayeeAmount: U256::from(48u64),
            operatorCommission: U256::from(1u64),
            networkFee: U256::from(1u64),
            settledUpTo: U256::from(1234u64),
        };
        let logs = vec![
            rpc_log(Address::ZERO, other.encode_log_data()),
            rpc_log(Address::ZERO, wanted.encode_log_data()),
        ];

        let found = find_event_in_logs::<IPayments::RailSettled>(&logs).unwrap();
        assert_eq!(found.railId, U256::from(3u64));
        assert_eq!(found.settledUpTo, U256::from(1234u64));
    }

    #[test]
    fn absent_event_is_none() {
        let logs: Vec<Log> = vec![];
        assert!(find_event_in_logs::<IPayments::RailSettled>(&logs).is_none());
    }
}
