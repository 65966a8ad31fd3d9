//! Signed transaction execution.
//!
//! `exec_transaction` is one atomic unit: any `Err` it returns reverts every effect including
//! the nonce increment. A failing inner call is not an error; it is reported in
//! [`ExecutionResult`] and an `ExecutionFailure` event, and the submitter is still refunded.

use alloc::vec::Vec;

use safe_wallet_types::{Operation, SafeTx};
use stylus_sdk::{
    alloy_primitives::{Address, B256, U256},
    alloy_sol_types::SolInterface,
};

use crate::{
    auth::Authorized,
    constants::{ADMIN_CALL_GAS, REFUND_OVERHEAD_GAS},
    errors::{revert_data, SafeError},
    events::SafeEvent,
    host::{CallOutcome, SafeEnv},
    interfaces::ISafeAdmin::{self, ISafeAdminCalls},
    modules, owners,
    payment::handle_payment,
    signatures::check_signatures,
};

/// The side effect a transaction performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Call { to: Address, value: U256, data: Vec<u8> },
    DelegateCall { to: Address, data: Vec<u8> },
    /// Deploys `init_code`; the target address is ignored.
    Create { value: U256, init_code: Vec<u8> },
}

impl Action {
    pub fn new(operation: Operation, to: Address, value: U256, data: Vec<u8>) -> Self {
        match operation {
            Operation::Call => Action::Call { to, value, data },
            Operation::DelegateCall => Action::DelegateCall { to, data },
            Operation::Create => Action::Create { value, init_code: data },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    pub tx_hash: B256,
    pub success: bool,
    pub payment: U256,
    pub return_data: Vec<u8>,
}

/// Digest of `tx` as it would execute now, i.e. bound to the stored nonce.
pub fn transaction_hash<W: SafeEnv>(w: &W, tx: &SafeTx) -> B256 {
    tx.signing_hash(w.chain_id(), w.self_address())
}

/// Verifies and executes `tx`. `tx.nonce` is replaced by the wallet's current nonce, so a
/// transaction signed for an older nonce fails verification.
pub fn exec_transaction<W: SafeEnv>(
    w: &mut W,
    mut tx: SafeTx,
    signatures: &[u8],
) -> Result<ExecutionResult, SafeError> {
    let nonce = w.load_nonce();
    tx.nonce = nonce;
    let tx_hash = transaction_hash(w, &tx);
    check_signatures(w, tx_hash, signatures)?;
    let next_nonce = nonce.checked_add(U256::from(1u64)).ok_or(SafeError::NonceExhausted)?;
    w.store_nonce(next_nonce);

    let available = w.gas_left();
    if U256::from(available) < tx.safe_tx_gas {
        return Err(SafeError::NotEnoughGas { required: tx.safe_tx_gas, available });
    }
    // Zero forwards everything; otherwise it fits because it is below `available`.
    let gas = (tx.safe_tx_gas != U256::ZERO).then(|| tx.safe_tx_gas.saturating_to::<u64>());

    let outcome = perform(w, Action::new(tx.operation, tx.to, tx.value, tx.data), gas);
    let gas_used = available.saturating_sub(w.gas_left());

    let payment = if tx.gas_price > U256::ZERO {
        let units = U256::from(gas_used) + U256::from(REFUND_OVERHEAD_GAS);
        handle_payment(w, units, tx.gas_price, tx.gas_token, tx.refund_receiver)?
    } else {
        U256::ZERO
    };

    w.emit_event(if outcome.success {
        SafeEvent::ExecutionSuccess { tx_hash, payment }
    } else {
        SafeEvent::ExecutionFailure { tx_hash, payment }
    });

    Ok(ExecutionResult {
        tx_hash,
        success: outcome.success,
        payment,
        return_data: outcome.return_data,
    })
}

/// Performs `action` and captures its outcome. Never fails.
///
/// Calls into the wallet's own admin interface run in-process with an [`Authorized`] token;
/// anything else goes to the host. The admin methods are non-payable, and when a limit is set
/// they need at least [`ADMIN_CALL_GAS`].
pub fn perform<W: SafeEnv>(w: &mut W, action: Action, gas: Option<u64>) -> CallOutcome {
    match action {
        Action::Call { to, value, data } => {
            if to == w.self_address() {
                if let Ok(call) = ISafeAdminCalls::abi_decode(&data, true) {
                    if value != U256::ZERO || gas.is_some_and(|g| g < ADMIN_CALL_GAS) {
                        return CallOutcome::failure(Vec::new());
                    }
                    return dispatch_self_call(w, call);
                }
            }
            w.call_contract(to, value, &data, gas)
        }
        Action::DelegateCall { to, data } => w.delegate_call_contract(to, &data, gas),
        Action::Create { value, init_code } => match w.create_contract(value, &init_code) {
            Some(created) => {
                w.emit_event(SafeEvent::ContractCreation(created));
                CallOutcome::success(created.to_vec())
            }
            None => CallOutcome::failure(Vec::new()),
        },
    }
}

fn dispatch_self_call<W: SafeEnv>(w: &mut W, call: ISafeAdminCalls) -> CallOutcome {
    let auth = Authorized::self_call();
    let result: Result<(), SafeError> = match call {
        ISafeAdminCalls::addOwner(ISafeAdmin::addOwnerCall { owner, threshold }) => {
            owners::add_owner(&auth, w, owner, threshold).map_err(Into::into)
        }
        ISafeAdminCalls::removeOwner(ISafeAdmin::removeOwnerCall { prevOwner, owner, threshold }) => {
            owners::remove_owner(&auth, w, prevOwner, owner, threshold).map_err(Into::into)
        }
        ISafeAdminCalls::replaceOwner(ISafeAdmin::replaceOwnerCall { prevOwner, oldOwner, newOwner }) => {
            owners::replace_owner(&auth, w, prevOwner, oldOwner, newOwner).map_err(Into::into)
        }
        ISafeAdminCalls::changeThreshold(ISafeAdmin::changeThresholdCall { threshold }) => {
            owners::change_threshold(&auth, w, threshold).map_err(Into::into)
        }
        ISafeAdminCalls::enableModule(ISafeAdmin::enableModuleCall { module }) => {
            modules::enable_module(&auth, w, module).map_err(Into::into)
        }
        ISafeAdminCalls::disableModule(ISafeAdmin::disableModuleCall { prevModule, module }) => {
            modules::disable_module(&auth, w, prevModule, module).map_err(Into::into)
        }
    };
    match result {
        Ok(()) => CallOutcome::success(Vec::new()),
        Err(err) => CallOutcome::failure(revert_data(err)),
    }
}
