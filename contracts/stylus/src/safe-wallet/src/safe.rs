//! Stylus entrypoint for the Safe master copy.
//!
//! Proxies delegate into this contract, so all state below lives in the proxy's storage. The
//! public ABI mirrors the Solidity Safe; every state-changing path goes through the engine
//! modules, which see this contract only through `SafeStorage` and `SafeHost`.

use alloc::{string::String, vec::Vec};

use safe_wallet_types::{Operation, SafeTx};
use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, B256, U256},
    call::RawCall,
    console,
    prelude::*,
    stylus_core::{deploy::DeploymentAccess, log},
};

use crate::{
    auth::Authorized,
    constants::VERSION,
    errors::{SafeError, SafeRevert},
    events::SafeEvent,
    executor, interfaces, modules, owners,
    host::{CallOutcome, SafeHost, SafeStorage},
    setup::SafeSetupParams,
    signatures,
    storage_access::{read_storage, simulate_and_revert},
    utils::crypto,
};

sol_storage! {
    #[entrypoint]
    pub struct SafeWallet {
        /// Owner linked list (`SENTINEL` is the head).
        mapping(address => address) owners;
        uint256 owner_count;
        /// Zero until `setup`.
        uint256 threshold;
        uint256 nonce;

        /// Module linked list (`SENTINEL` is the head).
        mapping(address => address) modules;

        /// owner => hash => approved via `approveHash`.
        mapping(address => mapping(bytes32 => bool)) approved_hashes;
    }
}

#[public]
impl SafeWallet {
    #[receive]
    #[payable]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        let sender = self.vm().msg_sender();
        let value = self.vm().msg_value();
        self.emit_event(SafeEvent::SafeReceived { sender, value });
        Ok(())
    }

    /// One-time initializer, called by the proxy factory.
    #[allow(clippy::too_many_arguments)]
    pub fn setup(
        &mut self,
        owners: Vec<Address>,
        threshold: U256,
        to: Address,
        data: Bytes,
        payment_token: Address,
        payment: U256,
        payment_receiver: Address,
    ) -> Result<(), SafeRevert> {
        crate::setup::setup(
            self,
            SafeSetupParams {
                owners,
                threshold,
                initializer: to,
                initializer_data: data.to_vec(),
                payment_token,
                payment,
                payment_receiver,
            },
        )?;
        console!("setup threshold={}", threshold);
        Ok(())
    }

    /// Executes a threshold-signed transaction and refunds the submitter.
    ///
    /// Returns `false` when the inner call failed; reverts when verification or the refund
    /// failed.
    #[payable]
    #[allow(clippy::too_many_arguments)]
    pub fn exec_transaction(
        &mut self,
        to: Address,
        value: U256,
        data: Bytes,
        operation: u8,
        safe_tx_gas: U256,
        gas_price: U256,
        gas_token: Address,
        refund_receiver: Address,
        signatures: Bytes,
    ) -> Result<bool, SafeRevert> {
        let tx = build_tx(
            to,
            value,
            data,
            operation,
            safe_tx_gas,
            gas_price,
            gas_token,
            refund_receiver,
            U256::ZERO,
        )?;
        let result = executor::exec_transaction(self, tx, &signatures)?;
        console!(
            "execTransaction {} success={} payment={}",
            result.tx_hash,
            result.success,
            result.payment
        );
        Ok(result.success)
    }

    pub fn add_owner(&mut self, owner: Address, threshold: U256) -> Result<(), SafeRevert> {
        let auth = Authorized::from_caller(self)?;
        owners::add_owner(&auth, self, owner, threshold)?;
        Ok(())
    }

    pub fn remove_owner(
        &mut self,
        prev_owner: Address,
        owner: Address,
        threshold: U256,
    ) -> Result<(), SafeRevert> {
        let auth = Authorized::from_caller(self)?;
        owners::remove_owner(&auth, self, prev_owner, owner, threshold)?;
        Ok(())
    }

    pub fn replace_owner(
        &mut self,
        prev_owner: Address,
        old_owner: Address,
        new_owner: Address,
    ) -> Result<(), SafeRevert> {
        let auth = Authorized::from_caller(self)?;
        owners::replace_owner(&auth, self, prev_owner, old_owner, new_owner)?;
        Ok(())
    }

    pub fn change_threshold(&mut self, threshold: U256) -> Result<(), SafeRevert> {
        let auth = Authorized::from_caller(self)?;
        owners::change_threshold(&auth, self, threshold)?;
        Ok(())
    }

    pub fn enable_module(&mut self, module: Address) -> Result<(), SafeRevert> {
        let auth = Authorized::from_caller(self)?;
        modules::enable_module(&auth, self, module)?;
        Ok(())
    }

    pub fn disable_module(&mut self, prev_module: Address, module: Address) -> Result<(), SafeRevert> {
        let auth = Authorized::from_caller(self)?;
        modules::disable_module(&auth, self, prev_module, module)?;
        Ok(())
    }

    pub fn get_owners(&self) -> Vec<Address> {
        owners::get_owners(self)
    }

    pub fn is_owner(&self, owner: Address) -> bool {
        owners::is_owner(self, owner)
    }

    pub fn threshold(&self) -> U256 {
        self.threshold.get()
    }

    pub fn nonce(&self) -> U256 {
        self.nonce.get()
    }

    pub fn domain_separator(&self) -> FixedBytes<32> {
        safe_wallet_types::domain_separator(self.vm().chain_id(), self.vm().contract_address())
    }

    pub fn get_chain_id(&self) -> U256 {
        U256::from(self.vm().chain_id())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn get_transaction_hash(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        operation: u8,
        safe_tx_gas: U256,
        gas_price: U256,
        gas_token: Address,
        refund_receiver: Address,
        nonce: U256,
    ) -> Result<FixedBytes<32>, SafeRevert> {
        let tx = build_tx(
            to,
            value,
            data,
            operation,
            safe_tx_gas,
            gas_price,
            gas_token,
            refund_receiver,
            nonce,
        )?;
        Ok(tx.signing_hash(self.vm().chain_id(), self.vm().contract_address()))
    }

    /// Pre-image of `getTransactionHash`: `0x19 || 0x01 || domainSeparator || structHash`.
    #[allow(clippy::too_many_arguments)]
    pub fn encode_transaction_data(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        operation: u8,
        safe_tx_gas: U256,
        gas_price: U256,
        gas_token: Address,
        refund_receiver: Address,
        nonce: U256,
    ) -> Result<Bytes, SafeRevert> {
        let tx = build_tx(
            to,
            value,
            data,
            operation,
            safe_tx_gas,
            gas_price,
            gas_token,
            refund_receiver,
            nonce,
        )?;
        Ok(Bytes::from(
            tx.encode_transaction_data(self.vm().chain_id(), self.vm().contract_address()),
        ))
    }

    pub fn approve_hash(&mut self, hash_to_approve: FixedBytes<32>) -> Result<(), SafeRevert> {
        signatures::approve_hash(self, hash_to_approve)?;
        Ok(())
    }

    /// `1` if `owner` approved `hash`, else `0`.
    pub fn approved_hashes(&self, owner: Address, hash: FixedBytes<32>) -> U256 {
        U256::from(self.load_hash_approval(owner, hash) as u8)
    }

    /// Reverts unless `signatures` satisfy the current threshold for `data_hash`.
    pub fn check_signatures(&self, data_hash: FixedBytes<32>, signatures: Bytes) -> Result<(), SafeRevert> {
        signatures::check_signatures(self, data_hash, &signatures)?;
        Ok(())
    }

    pub fn exec_transaction_from_module(
        &mut self,
        to: Address,
        value: U256,
        data: Bytes,
        operation: u8,
    ) -> Result<bool, SafeRevert> {
        let (success, _) = self.exec_from_module(to, value, data, operation)?;
        Ok(success)
    }

    pub fn exec_transaction_from_module_return_data(
        &mut self,
        to: Address,
        value: U256,
        data: Bytes,
        operation: u8,
    ) -> Result<(bool, Bytes), SafeRevert> {
        self.exec_from_module(to, value, data, operation)
    }

    pub fn is_module_enabled(&self, module: Address) -> bool {
        modules::is_module_enabled(self, module)
    }

    pub fn get_modules_paginated(
        &self,
        start: Address,
        page_size: U256,
    ) -> Result<(Vec<Address>, Address), SafeRevert> {
        Ok(modules::get_modules_paginated(self, start, page_size.saturating_to())?)
    }

    /// `length` consecutive 32-byte slots starting at `offset`.
    pub fn get_storage_at(&self, offset: U256, length: U256) -> Bytes {
        let data = read_storage(offset, length.saturating_to(), |slot| {
            self.vm().storage_load_bytes32(slot)
        });
        Bytes::from(data)
    }

    /// Delegate-calls `target_contract` and reverts with
    /// `success || returndata length || returndata`.
    pub fn simulate_and_revert(
        &mut self,
        target_contract: Address,
        calldata_payload: Bytes,
    ) -> Result<(), Vec<u8>> {
        simulate_and_revert(self, target_contract, &calldata_payload)
    }

    pub fn version(&self) -> String {
        String::from(VERSION)
    }
}

impl SafeWallet {
    fn exec_from_module(
        &mut self,
        to: Address,
        value: U256,
        data: Bytes,
        operation: u8,
    ) -> Result<(bool, Bytes), SafeRevert> {
        let operation = parse_operation(operation)?;
        let outcome = modules::exec_from_module(self, to, value, data.to_vec(), operation)?;
        Ok((outcome.success, Bytes::from(outcome.return_data)))
    }
}

fn parse_operation(operation: u8) -> Result<Operation, SafeError> {
    Operation::try_from(operation).map_err(|unknown| SafeError::InvalidOperation(unknown.0))
}

#[allow(clippy::too_many_arguments)]
fn build_tx(
    to: Address,
    value: U256,
    data: Bytes,
    operation: u8,
    safe_tx_gas: U256,
    gas_price: U256,
    gas_token: Address,
    refund_receiver: Address,
    nonce: U256,
) -> Result<SafeTx, SafeError> {
    Ok(SafeTx {
        to,
        value,
        data: data.to_vec(),
        operation: parse_operation(operation)?,
        safe_tx_gas,
        gas_price,
        gas_token,
        refund_receiver,
        nonce,
    })
}

fn call_outcome(result: Result<Vec<u8>, Vec<u8>>) -> CallOutcome {
    match result {
        Ok(data) => CallOutcome::success(data),
        Err(data) => CallOutcome::failure(data),
    }
}

impl SafeStorage for SafeWallet {
    fn load_owner_next(&self, owner: Address) -> Address {
        self.owners.get(owner)
    }

    fn store_owner_next(&mut self, owner: Address, next: Address) {
        self.owners.insert(owner, next);
    }

    fn load_owner_count(&self) -> U256 {
        self.owner_count.get()
    }

    fn store_owner_count(&mut self, count: U256) {
        self.owner_count.set(count);
    }

    fn load_threshold(&self) -> U256 {
        self.threshold.get()
    }

    fn store_threshold(&mut self, threshold: U256) {
        self.threshold.set(threshold);
    }

    fn load_nonce(&self) -> U256 {
        self.nonce.get()
    }

    fn store_nonce(&mut self, nonce: U256) {
        self.nonce.set(nonce);
    }

    fn load_module_next(&self, module: Address) -> Address {
        self.modules.get(module)
    }

    fn store_module_next(&mut self, module: Address, next: Address) {
        self.modules.insert(module, next);
    }

    fn load_hash_approval(&self, owner: Address, hash: B256) -> bool {
        self.approved_hashes.getter(owner).get(hash)
    }

    fn store_hash_approval(&mut self, owner: Address, hash: B256, approved: bool) {
        self.approved_hashes.setter(owner).insert(hash, approved);
    }
}

impl SafeHost for SafeWallet {
    fn self_address(&self) -> Address {
        self.vm().contract_address()
    }

    fn msg_sender(&self) -> Address {
        self.vm().msg_sender()
    }

    fn tx_origin(&self) -> Address {
        self.vm().tx_origin()
    }

    fn chain_id(&self) -> u64 {
        self.vm().chain_id()
    }

    fn gas_left(&self) -> u64 {
        self.vm().evm_gas_left()
    }

    fn tx_gas_price(&self) -> U256 {
        self.vm().tx_gas_price()
    }

    fn call_contract(&mut self, to: Address, value: U256, data: &[u8], gas: Option<u64>) -> CallOutcome {
        let mut call = RawCall::new_with_value(value);
        if let Some(gas) = gas {
            call = call.gas(gas);
        }
        call_outcome(unsafe { call.call(to, data) })
    }

    fn delegate_call_contract(&mut self, to: Address, data: &[u8], gas: Option<u64>) -> CallOutcome {
        let mut call = RawCall::new_delegate();
        if let Some(gas) = gas {
            call = call.gas(gas);
        }
        call_outcome(unsafe { call.call(to, data) })
    }

    fn static_call_contract(&self, to: Address, data: &[u8], gas: Option<u64>) -> CallOutcome {
        let mut call = RawCall::new_static();
        if let Some(gas) = gas {
            call = call.gas(gas);
        }
        call_outcome(unsafe { call.call(to, data) })
    }

    fn create_contract(&mut self, value: U256, init_code: &[u8]) -> Option<Address> {
        unsafe { self.vm().deploy(init_code, value, None) }.ok()
    }

    fn ecrecover(&self, digest: B256, v: u8, r: B256, s: B256) -> Option<Address> {
        crypto::ecrecover(digest, v, r, s)
    }

    fn emit_event(&mut self, event: SafeEvent) {
        let vm = self.vm();
        match event {
            SafeEvent::SafeSetup { initiator, owners, threshold, initializer } => log(
                vm,
                interfaces::SafeSetup { initiator, owners, threshold, initializer },
            ),
            SafeEvent::SafeReceived { sender, value } => {
                log(vm, interfaces::SafeReceived { sender, value })
            }
            SafeEvent::AddedOwner(owner) => log(vm, interfaces::AddedOwner { owner }),
            SafeEvent::RemovedOwner(owner) => log(vm, interfaces::RemovedOwner { owner }),
            SafeEvent::ChangedThreshold(threshold) => {
                log(vm, interfaces::ChangedThreshold { threshold })
            }
            SafeEvent::ApproveHash { hash, owner } => {
                log(vm, interfaces::ApproveHash { approvedHash: hash, owner })
            }
            SafeEvent::ExecutionSuccess { tx_hash, payment } => {
                log(vm, interfaces::ExecutionSuccess { txHash: tx_hash, payment })
            }
            SafeEvent::ExecutionFailure { tx_hash, payment } => {
                log(vm, interfaces::ExecutionFailure { txHash: tx_hash, payment })
            }
            SafeEvent::ContractCreation(created) => {
                log(vm, interfaces::ContractCreation { newContract: created })
            }
            SafeEvent::EnabledModule(module) => log(vm, interfaces::EnabledModule { module }),
            SafeEvent::DisabledModule(module) => log(vm, interfaces::DisabledModule { module }),
            SafeEvent::ExecutionFromModuleSuccess(module) => {
                log(vm, interfaces::ExecutionFromModuleSuccess { module })
            }
            SafeEvent::ExecutionFromModuleFailure(module) => {
                log(vm, interfaces::ExecutionFromModuleFailure { module })
            }
        }
    }
}
