//! Raw storage reads and revert-carrying simulation for off-chain tooling.

use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, B256, U256};

use crate::host::{CallOutcome, SafeHost};

/// Concatenates `length` consecutive slots starting at `offset`. Slot numbers wrap like EVM
/// slot arithmetic.
pub fn read_storage(offset: U256, length: usize, mut load: impl FnMut(U256) -> B256) -> Vec<u8> {
    let mut out = Vec::new();
    let mut slot = offset;
    for _ in 0..length {
        out.extend_from_slice(load(slot).as_slice());
        slot = slot.wrapping_add(U256::from(1u64));
    }
    out
}

/// `success (word) || returndata length (word) || returndata`.
pub fn encode_simulation(outcome: &CallOutcome) -> Vec<u8> {
    let mut out = Vec::with_capacity(64 + outcome.return_data.len());
    out.extend_from_slice(&U256::from(outcome.success as u8).to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(outcome.return_data.len()).to_be_bytes::<32>());
    out.extend_from_slice(&outcome.return_data);
    out
}

/// Delegate-calls `target` with `payload` and returns the encoded outcome as revert data, so
/// every effect of the simulation is discarded. Always `Err`.
pub fn simulate_and_revert<H: SafeHost>(
    host: &mut H,
    target: Address,
    payload: &[u8],
) -> Result<(), Vec<u8>> {
    let outcome = host.delegate_call_contract(target, payload, None);
    Err(encode_simulation(&outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{addr, MockSafe};

    #[test]
    fn reads_consecutive_slots() {
        let data = read_storage(U256::from(4u64), 3, |slot| B256::from(slot.to_be_bytes::<32>()));
        assert_eq!(data.len(), 96);
        assert_eq!(U256::from_be_slice(&data[..32]), U256::from(4u64));
        assert_eq!(U256::from_be_slice(&data[64..]), U256::from(6u64));
        assert!(read_storage(U256::ZERO, 0, |_| B256::ZERO).is_empty());
    }

    #[test]
    fn slot_numbers_wrap() {
        let data = read_storage(U256::MAX, 2, |slot| B256::from(slot.to_be_bytes::<32>()));
        assert_eq!(U256::from_be_slice(&data[32..]), U256::ZERO);
    }

    #[test]
    fn simulation_always_reverts_with_outcome() {
        let mut safe = MockSafe::new();
        safe.script_delegate(addr(0xd0), CallOutcome::success(vec![0xab, 0xcd]));

        let revert = simulate_and_revert(&mut safe, addr(0xd0), &[1]).unwrap_err();
        assert_eq!(revert.len(), 66);
        assert_eq!(U256::from_be_slice(&revert[..32]), U256::from(1u64));
        assert_eq!(U256::from_be_slice(&revert[32..64]), U256::from(2u64));
        assert_eq!(&revert[64..], &[0xab, 0xcd]);

        safe.script_delegate(addr(0xd1), CallOutcome::failure(vec![]));
        let revert = simulate_and_revert(&mut safe, addr(0xd1), &[]).unwrap_err();
        assert_eq!(revert, vec![0u8; 64]);
    }
}
