//! In-memory host for unit tests.
//!
//! Storage lives in maps, native balances and scripted ERC20 tokens are tracked per address,
//! gas is metered with fixed per-operation costs, and signatures are recovered with `k256`.
//! [`MockSafe::transact`] restores the pre-call snapshot on `Err`, which is what the chain does
//! when an entry point reverts.

use std::{
    cell::Cell,
    collections::{BTreeMap, BTreeSet},
};

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use safe_tx_signer::OwnerKey;
use stylus_sdk::{
    alloy_primitives::{keccak256, Address, B256, U256},
    alloy_sol_types::SolCall,
};

use crate::{
    constants::EIP1271_MAGIC_VALUE,
    errors::SafeError,
    events::SafeEvent,
    host::{CallOutcome, SafeHost, SafeStorage},
    interfaces::{IERC1271, IERC20},
};

pub const START_GAS: u64 = 10_000_000;
pub const CALL_GAS: u64 = 9_000;
pub const CALLDATA_BYTE_GAS: u64 = 16;
pub const CREATE_GAS: u64 = 32_000;
pub const ECRECOVER_GAS: u64 = 3_000;
pub const GWEI: u64 = 1_000_000_000;

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn key(seed: u8) -> OwnerKey {
    OwnerKey::from_bytes(&[seed; 32]).unwrap()
}

/// `n` deterministic owner keys, sorted by address.
pub fn owner_keys(n: u8) -> Vec<OwnerKey> {
    let mut keys: Vec<OwnerKey> = (1..=n).map(key).collect();
    keys.sort_by_key(|k| k.address());
    keys
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenBehavior {
    /// Moves balances and returns `true`.
    Standard,
    /// Moves balances and returns nothing.
    NoReturn,
    ReturnFalse,
    Revert,
    /// Burns all gas it is given, then fails.
    OutOfGas,
}

#[derive(Clone, Debug)]
struct MockToken {
    behavior: TokenBehavior,
    balances: BTreeMap<Address, U256>,
}

#[derive(Clone, Debug)]
pub struct MockSafe {
    pub address: Address,
    pub sender: Address,
    pub origin: Address,
    pub chain_id: u64,
    /// Host gas price.
    pub gas_price: U256,
    gas: Cell<u64>,

    owners: BTreeMap<Address, Address>,
    owner_count: U256,
    threshold: U256,
    nonce: U256,
    modules: BTreeMap<Address, Address>,
    approvals: BTreeSet<(Address, B256)>,

    balances: BTreeMap<Address, U256>,
    tokens: BTreeMap<Address, MockToken>,
    code: BTreeMap<Address, Vec<u8>>,
    delegates: BTreeMap<Address, CallOutcome>,
    contract_signatures: BTreeMap<Address, (B256, Vec<u8>)>,
    deployed: u64,

    pub events: Vec<SafeEvent>,
}

impl Default for MockSafe {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSafe {
    pub fn new() -> Self {
        Self {
            address: addr(0xaf),
            sender: addr(0xe0),
            origin: addr(0xe0),
            chain_id: 42_161,
            gas_price: U256::from(GWEI),
            gas: Cell::new(START_GAS),
            owners: BTreeMap::new(),
            owner_count: U256::ZERO,
            threshold: U256::ZERO,
            nonce: U256::ZERO,
            modules: BTreeMap::new(),
            approvals: BTreeSet::new(),
            balances: BTreeMap::new(),
            tokens: BTreeMap::new(),
            code: BTreeMap::new(),
            delegates: BTreeMap::new(),
            contract_signatures: BTreeMap::new(),
            deployed: 0,
            events: Vec::new(),
        }
    }

    /// Runs `f` as one host transaction: on `Err` every effect is rolled back.
    pub fn transact<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SafeError>,
    ) -> Result<T, SafeError> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    pub fn set_gas(&self, gas: u64) {
        self.gas.set(gas);
    }

    pub fn fund(&mut self, account: Address, amount: U256) {
        *self.balances.entry(account).or_default() += amount;
    }

    pub fn balance(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn deploy_token(&mut self, token: Address, behavior: TokenBehavior) {
        self.tokens.insert(token, MockToken { behavior, balances: BTreeMap::new() });
    }

    pub fn mint(&mut self, token: Address, account: Address, amount: U256) {
        if let Some(t) = self.tokens.get_mut(&token) {
            *t.balances.entry(account).or_default() += amount;
        }
    }

    pub fn token_balance(&self, token: Address, account: Address) -> U256 {
        self.tokens
            .get(&token)
            .and_then(|t| t.balances.get(&account).copied())
            .unwrap_or_default()
    }

    /// Fixes the outcome of delegate calls to `target`. Unscripted targets succeed silently.
    pub fn script_delegate(&mut self, target: Address, outcome: CallOutcome) {
        self.delegates.insert(target, outcome);
    }

    /// Makes `validator` an EIP-1271 contract accepting exactly `signature` for `hash`.
    pub fn accept_contract_signature(&mut self, validator: Address, hash: B256, signature: Vec<u8>) {
        self.contract_signatures.insert(validator, (hash, signature));
    }

    pub fn code_at(&self, account: Address) -> Option<&[u8]> {
        self.code.get(&account).map(Vec::as_slice)
    }

    /// Deducts `cost` within `limit`. When it does not fit, everything available is consumed.
    fn charge(&self, cost: u64, limit: Option<u64>) -> bool {
        let left = self.gas.get();
        let available = limit.map_or(left, |l| l.min(left));
        if cost > available {
            self.gas.set(left - available);
            return false;
        }
        self.gas.set(left - cost);
        true
    }

    fn transfer(&mut self, from: Address, to: Address, value: U256) -> bool {
        if value == U256::ZERO {
            return true;
        }
        let balance = self.balance(from);
        if balance < value {
            return false;
        }
        self.balances.insert(from, balance - value);
        self.fund(to, value);
        true
    }

    fn token_call(&mut self, token: Address, data: &[u8], gas: Option<u64>) -> CallOutcome {
        let Some(behavior) = self.tokens.get(&token).map(|t| t.behavior) else {
            return CallOutcome::failure(vec![]);
        };
        match behavior {
            TokenBehavior::Revert => CallOutcome::failure(vec![]),
            TokenBehavior::OutOfGas => {
                self.charge(u64::MAX, gas);
                CallOutcome::failure(vec![])
            }
            TokenBehavior::ReturnFalse => CallOutcome::success(word(0)),
            TokenBehavior::Standard | TokenBehavior::NoReturn => {
                let Ok(call) = IERC20::transferCall::abi_decode(data, true) else {
                    return CallOutcome::failure(vec![]);
                };
                let from = self.address;
                let Some(t) = self.tokens.get_mut(&token) else {
                    return CallOutcome::failure(vec![]);
                };
                let balance = t.balances.get(&from).copied().unwrap_or_default();
                if balance < call.amount {
                    return CallOutcome::failure(vec![]);
                }
                t.balances.insert(from, balance - call.amount);
                *t.balances.entry(call.to).or_default() += call.amount;
                if behavior == TokenBehavior::Standard {
                    CallOutcome::success(word(1))
                } else {
                    CallOutcome::success(vec![])
                }
            }
        }
    }
}

fn word(value: u8) -> Vec<u8> {
    let mut out = vec![0u8; 32];
    out[31] = value;
    out
}

impl SafeStorage for MockSafe {
    fn load_owner_next(&self, owner: Address) -> Address {
        self.owners.get(&owner).copied().unwrap_or_default()
    }

    fn store_owner_next(&mut self, owner: Address, next: Address) {
        self.owners.insert(owner, next);
    }

    fn load_owner_count(&self) -> U256 {
        self.owner_count
    }

    fn store_owner_count(&mut self, count: U256) {
        self.owner_count = count;
    }

    fn load_threshold(&self) -> U256 {
        self.threshold
    }

    fn store_threshold(&mut self, threshold: U256) {
        self.threshold = threshold;
    }

    fn load_nonce(&self) -> U256 {
        self.nonce
    }

    fn store_nonce(&mut self, nonce: U256) {
        self.nonce = nonce;
    }

    fn load_module_next(&self, module: Address) -> Address {
        self.modules.get(&module).copied().unwrap_or_default()
    }

    fn store_module_next(&mut self, module: Address, next: Address) {
        self.modules.insert(module, next);
    }

    fn load_hash_approval(&self, owner: Address, hash: B256) -> bool {
        self.approvals.contains(&(owner, hash))
    }

    fn store_hash_approval(&mut self, owner: Address, hash: B256, approved: bool) {
        if approved {
            self.approvals.insert((owner, hash));
        } else {
            self.approvals.remove(&(owner, hash));
        }
    }
}

impl SafeHost for MockSafe {
    fn self_address(&self) -> Address {
        self.address
    }

    fn msg_sender(&self) -> Address {
        self.sender
    }

    fn tx_origin(&self) -> Address {
        self.origin
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn gas_left(&self) -> u64 {
        self.gas.get()
    }

    fn tx_gas_price(&self) -> U256 {
        self.gas_price
    }

    fn call_contract(&mut self, to: Address, value: U256, data: &[u8], gas: Option<u64>) -> CallOutcome {
        if !self.charge(CALL_GAS + CALLDATA_BYTE_GAS * data.len() as u64, gas) {
            return CallOutcome::failure(vec![]);
        }
        if self.tokens.contains_key(&to) {
            return self.token_call(to, data, gas);
        }
        if !self.transfer(self.address, to, value) {
            return CallOutcome::failure(vec![]);
        }
        // Deployed fixtures answer every call with their own code.
        CallOutcome::success(self.code.get(&to).cloned().unwrap_or_default())
    }

    fn delegate_call_contract(&mut self, to: Address, data: &[u8], gas: Option<u64>) -> CallOutcome {
        if !self.charge(CALL_GAS + CALLDATA_BYTE_GAS * data.len() as u64, gas) {
            return CallOutcome::failure(vec![]);
        }
        self.delegates
            .get(&to)
            .cloned()
            .unwrap_or_else(|| CallOutcome::success(vec![]))
    }

    fn static_call_contract(&self, to: Address, data: &[u8], gas: Option<u64>) -> CallOutcome {
        if !self.charge(CALL_GAS + CALLDATA_BYTE_GAS * data.len() as u64, gas) {
            return CallOutcome::failure(vec![]);
        }
        let Some((hash, expected)) = self.contract_signatures.get(&to) else {
            return CallOutcome::success(vec![]);
        };
        match IERC1271::isValidSignatureCall::abi_decode(data, true) {
            Ok(call) if call.hash == *hash && call.signature.as_ref() == expected.as_slice() => {
                let mut out = vec![0u8; 32];
                out[..4].copy_from_slice(&EIP1271_MAGIC_VALUE);
                CallOutcome::success(out)
            }
            _ => CallOutcome::success(word(0)),
        }
    }

    fn create_contract(&mut self, value: U256, init_code: &[u8]) -> Option<Address> {
        if !self.charge(CREATE_GAS, None) {
            return None;
        }
        let created = self.address.create(self.deployed);
        self.deployed += 1;
        if !self.transfer(self.address, created, value) {
            return None;
        }
        self.code.insert(created, init_code.to_vec());
        Some(created)
    }

    fn ecrecover(&self, digest: B256, v: u8, r: B256, s: B256) -> Option<Address> {
        self.charge(ECRECOVER_GAS, None).then_some(())?;
        let recovery_id = RecoveryId::from_byte(v.checked_sub(27)?)?;
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(r.as_slice());
        rs[32..].copy_from_slice(s.as_slice());
        let signature = Signature::from_slice(&rs).ok()?;
        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id).ok()?;
        let point = key.to_encoded_point(false);
        Some(Address::from_slice(&keccak256(&point.as_bytes()[1..])[12..]))
    }

    fn emit_event(&mut self, event: SafeEvent) {
        self.events.push(event);
    }
}
