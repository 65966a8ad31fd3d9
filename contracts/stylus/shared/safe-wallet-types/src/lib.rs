//! Types shared by the Stylus Safe contract and the off-chain coordinator tooling.
//!
//! Everything that ends up inside a signed digest lives here so both sides hash the exact
//! same bytes.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod operation;
pub mod safe_tx;
pub mod signatures;

pub use operation::{Operation, UnknownOperation};
pub use safe_tx::{domain_separator, SafeTx};
pub use signatures::{eth_signed_message_hash, split_signature, SignatureParts, SIGNATURE_LEN};
