use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, B256, U256};

/// Semantic log entries. The on-chain host turns these into the Solidity events declared in
/// `interfaces`; the off-chain mock records them for assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SafeEvent {
    SafeSetup {
        initiator: Address,
        owners: Vec<Address>,
        threshold: U256,
        initializer: Address,
    },
    SafeReceived {
        sender: Address,
        value: U256,
    },
    AddedOwner(Address),
    RemovedOwner(Address),
    ChangedThreshold(U256),
    ApproveHash {
        hash: B256,
        owner: Address,
    },
    ExecutionSuccess {
        tx_hash: B256,
        payment: U256,
    },
    ExecutionFailure {
        tx_hash: B256,
        payment: U256,
    },
    ContractCreation(Address),
    EnabledModule(Address),
    DisabledModule(Address),
    ExecutionFromModuleSuccess(Address),
    ExecutionFromModuleFailure(Address),
}
