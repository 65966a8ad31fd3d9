//! Seams between the wallet engine and the chain it runs on.
//!
//! The engine (`owners`, `signatures`, `executor`, ...) is written against these two traits.
//! `SafeWallet` implements them with Stylus storage and host calls; tests use
//! `testing::MockSafe`.

use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, B256, U256};

use crate::events::SafeEvent;

/// Persistent wallet state.
pub trait SafeStorage {
    /// Owner list link (`Address::ZERO` = not in the list).
    fn load_owner_next(&self, owner: Address) -> Address;
    fn store_owner_next(&mut self, owner: Address, next: Address);

    fn load_owner_count(&self) -> U256;
    fn store_owner_count(&mut self, count: U256);

    /// Zero until `setup` ran.
    fn load_threshold(&self) -> U256;
    fn store_threshold(&mut self, threshold: U256);

    fn load_nonce(&self) -> U256;
    fn store_nonce(&mut self, nonce: U256);

    /// Module list link (`Address::ZERO` = not in the list).
    fn load_module_next(&self, module: Address) -> Address;
    fn store_module_next(&mut self, module: Address, next: Address);

    fn load_hash_approval(&self, owner: Address, hash: B256) -> bool;
    fn store_hash_approval(&mut self, owner: Address, hash: B256, approved: bool);
}

/// Result of a call the wallet made. Failures are data, not errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallOutcome {
    pub success: bool,
    pub return_data: Vec<u8>,
}

impl CallOutcome {
    pub fn success(return_data: Vec<u8>) -> Self {
        Self { success: true, return_data }
    }

    pub fn failure(return_data: Vec<u8>) -> Self {
        Self { success: false, return_data }
    }
}

/// Execution context and side effects supplied by the host chain.
///
/// `gas: None` forwards all remaining gas.
pub trait SafeHost {
    fn self_address(&self) -> Address;
    fn msg_sender(&self) -> Address;
    fn tx_origin(&self) -> Address;
    fn chain_id(&self) -> u64;
    fn gas_left(&self) -> u64;
    fn tx_gas_price(&self) -> U256;

    fn call_contract(&mut self, to: Address, value: U256, data: &[u8], gas: Option<u64>) -> CallOutcome;
    fn delegate_call_contract(&mut self, to: Address, data: &[u8], gas: Option<u64>) -> CallOutcome;
    fn static_call_contract(&self, to: Address, data: &[u8], gas: Option<u64>) -> CallOutcome;

    /// Deploys `init_code`; `None` when creation failed.
    fn create_contract(&mut self, value: U256, init_code: &[u8]) -> Option<Address>;

    /// Signer of `digest`, `None` for malformed or unrecoverable signatures.
    fn ecrecover(&self, digest: B256, v: u8, r: B256, s: B256) -> Option<Address>;

    fn emit_event(&mut self, event: SafeEvent);
}

/// A full wallet environment.
pub trait SafeEnv: SafeStorage + SafeHost {}

impl<T: SafeStorage + SafeHost> SafeEnv for T {}
