//! Packed signature layout.
//!
//! Each static entry is 65 bytes `r (32) || s (32) || v (1)`. The meaning of `r`/`s` depends
//! on `v`:
//! - `v == 0`: contract signature, `r` = owner, `s` = offset of a length-prefixed blob in the
//!   dynamic area that follows the static entries
//! - `v == 1`: pre-approved hash, `r` = owner
//! - `v > 30`: `eth_sign` signature, recovered with `v - 4`
//! - otherwise: plain ECDSA over the digest

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, B256};

pub const SIGNATURE_LEN: usize = 65;

pub const CONTRACT_SIGNATURE_V: u8 = 0;
pub const APPROVED_HASH_V: u8 = 1;
pub const ETH_SIGN_V_OFFSET: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureParts {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl SignatureParts {
    /// Address carried in `r` (contract and approved-hash entries).
    pub fn r_address(&self) -> Address {
        Address::from_slice(&self.r[12..32])
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[0..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }
}

/// Reads the static entry at `index`, `None` if it is out of bounds.
pub fn split_signature(signatures: &[u8], index: usize) -> Option<SignatureParts> {
    let start = index.checked_mul(SIGNATURE_LEN)?;
    let end = start.checked_add(SIGNATURE_LEN)?;
    if signatures.len() < end {
        return None;
    }
    let entry = &signatures[start..end];
    Some(SignatureParts {
        r: B256::from_slice(&entry[0..32]),
        s: B256::from_slice(&entry[32..64]),
        v: entry[64],
    })
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || digest)`.
pub fn eth_signed_message_hash(digest: B256) -> B256 {
    let mut buf = Vec::with_capacity(28 + 32);
    buf.extend_from_slice(b"\x19Ethereum Signed Message:\n32");
    buf.extend_from_slice(digest.as_slice());
    keccak256(buf)
}
