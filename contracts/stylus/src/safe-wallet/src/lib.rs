//! Safe-compatible multisig wallet for Arbitrum Stylus.
//!
//! `SafeWallet` is the deployed entrypoint. The wallet logic itself (owners, signature checks,
//! execution, refunds, modules) is written against the `host` traits so it can be exercised
//! without a chain.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

pub mod auth;
pub mod constants;
pub mod errors;
pub mod events;
pub mod executor;
pub mod host;
pub mod interfaces;
pub mod modules;
pub mod owners;
pub mod payment;
pub mod safe;
pub mod setup;
pub mod signatures;
pub mod storage_access;
pub mod utils;

#[cfg(test)]
pub mod testing;

pub use safe::SafeWallet;
