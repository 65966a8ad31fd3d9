//! Modules: addresses the owners trust to execute through the wallet without signatures.
//!
//! A separate trust configuration from signed execution. The list starts empty, and a module
//! is only enabled by a threshold-signed self-call.

use alloc::vec::Vec;

use safe_wallet_types::Operation;
use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{
    auth::Authorized,
    constants::SENTINEL,
    errors::{ModuleError, SafeError},
    events::SafeEvent,
    executor::{perform, Action},
    host::{CallOutcome, SafeEnv},
};

/// Initializes the empty module list. No-op if already initialized.
pub fn setup_modules<W: SafeEnv>(w: &mut W) {
    if w.load_module_next(SENTINEL) == Address::ZERO {
        w.store_module_next(SENTINEL, SENTINEL);
    }
}

pub fn enable_module<W: SafeEnv>(
    _auth: &Authorized,
    w: &mut W,
    module: Address,
) -> Result<(), ModuleError> {
    if module == Address::ZERO || module == SENTINEL {
        return Err(ModuleError::InvalidModule(module));
    }
    if w.load_module_next(module) != Address::ZERO {
        return Err(ModuleError::ModuleAlreadyEnabled(module));
    }
    setup_modules(w);
    let head = w.load_module_next(SENTINEL);
    w.store_module_next(module, head);
    w.store_module_next(SENTINEL, module);
    w.emit_event(SafeEvent::EnabledModule(module));
    Ok(())
}

pub fn disable_module<W: SafeEnv>(
    _auth: &Authorized,
    w: &mut W,
    prev_module: Address,
    module: Address,
) -> Result<(), ModuleError> {
    if module == Address::ZERO || module == SENTINEL {
        return Err(ModuleError::InvalidModule(module));
    }
    if w.load_module_next(prev_module) != module {
        return Err(ModuleError::InvalidPrevModule { prev: prev_module, module });
    }
    let next = w.load_module_next(module);
    w.store_module_next(prev_module, next);
    w.store_module_next(module, Address::ZERO);
    w.emit_event(SafeEvent::DisabledModule(module));
    Ok(())
}

pub fn is_module_enabled<W: SafeEnv>(w: &W, module: Address) -> bool {
    module != SENTINEL && w.load_module_next(module) != Address::ZERO
}

/// Executes on behalf of the calling module: no signatures, no nonce, no refund.
pub fn exec_from_module<W: SafeEnv>(
    w: &mut W,
    to: Address,
    value: U256,
    data: Vec<u8>,
    operation: Operation,
) -> Result<CallOutcome, SafeError> {
    let module = w.msg_sender();
    if !is_module_enabled(w, module) {
        return Err(ModuleError::ModuleNotEnabled(module).into());
    }
    let outcome = perform(w, Action::new(operation, to, value, data), None);
    w.emit_event(if outcome.success {
        SafeEvent::ExecutionFromModuleSuccess(module)
    } else {
        SafeEvent::ExecutionFromModuleFailure(module)
    });
    Ok(outcome)
}

/// Up to `page_size` modules following `start` (`SENTINEL` for the head), plus the cursor for
/// the next page: the last returned module, or `SENTINEL` once the list is exhausted.
pub fn get_modules_paginated<W: SafeEnv>(
    w: &W,
    start: Address,
    page_size: usize,
) -> Result<(Vec<Address>, Address), ModuleError> {
    if start != SENTINEL && !is_module_enabled(w, start) {
        return Err(ModuleError::InvalidModule(start));
    }
    if page_size == 0 {
        return Err(ModuleError::InvalidPageSize);
    }

    let mut page = Vec::new();
    let mut current = w.load_module_next(start);
    while current != Address::ZERO && current != SENTINEL && page.len() < page_size {
        page.push(current);
        current = w.load_module_next(current);
    }
    let next = match page.last() {
        Some(last) if current != Address::ZERO && current != SENTINEL => *last,
        _ => SENTINEL,
    };
    Ok((page, next))
}
