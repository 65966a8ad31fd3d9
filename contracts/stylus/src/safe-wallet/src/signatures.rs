//! Threshold signature verification.
//!
//! Signers must appear in strictly ascending address order. One comparison per entry then
//! rejects both reordering and duplicates without an auxiliary set.

use safe_wallet_types::{
    eth_signed_message_hash, split_signature,
    signatures::{APPROVED_HASH_V, CONTRACT_SIGNATURE_V, ETH_SIGN_V_OFFSET},
    SignatureParts, SIGNATURE_LEN,
};
use stylus_sdk::{
    alloy_primitives::{Address, Bytes, B256, U256},
    alloy_sol_types::SolCall,
};

use crate::{
    constants::EIP1271_MAGIC_VALUE,
    errors::{OwnerError, SafeError, SignatureError},
    events::SafeEvent,
    host::SafeEnv,
    interfaces::IERC1271,
    owners::is_owner,
    utils::bytes::read_length_prefixed,
};

/// Checks `signatures` against the current threshold.
pub fn check_signatures<W: SafeEnv>(w: &W, digest: B256, signatures: &[u8]) -> Result<(), SafeError> {
    let threshold = w.load_threshold();
    if threshold == U256::ZERO {
        return Err(SafeError::NotInitialized);
    }
    // Bounded by the owner count, so it always fits.
    let required: usize = threshold.saturating_to();
    check_n_signatures(w, digest, signatures, required)?;
    Ok(())
}

/// Checks that the first `required` entries are valid owner signatures over `digest`.
pub fn check_n_signatures<W: SafeEnv>(
    w: &W,
    digest: B256,
    signatures: &[u8],
    required: usize,
) -> Result<(), SignatureError> {
    let static_len = required.checked_mul(SIGNATURE_LEN).unwrap_or(usize::MAX);
    if signatures.len() < static_len {
        return Err(SignatureError::InsufficientSignatures {
            provided: signatures.len() / SIGNATURE_LEN,
            required,
        });
    }

    let mut previous = Address::ZERO;
    for index in 0..required {
        let parts = split_signature(signatures, index)
            .ok_or(SignatureError::InvalidSignature { index })?;
        let signer = recover_signer(w, digest, signatures, static_len, index, &parts)?;

        if signer == previous {
            return Err(SignatureError::DuplicateSigner { signer });
        }
        if signer < previous {
            return Err(SignatureError::InvalidSignatureOrder { signer, previous });
        }
        if !is_owner(w, signer) {
            return Err(SignatureError::NotAnOwner { signer });
        }
        previous = signer;
    }
    Ok(())
}

fn recover_signer<W: SafeEnv>(
    w: &W,
    digest: B256,
    signatures: &[u8],
    static_len: usize,
    index: usize,
    parts: &SignatureParts,
) -> Result<Address, SignatureError> {
    match parts.v {
        CONTRACT_SIGNATURE_V => {
            let owner = parts.r_address();
            check_contract_signature(w, digest, signatures, static_len, owner, parts.s)?;
            Ok(owner)
        }
        APPROVED_HASH_V => {
            let owner = parts.r_address();
            if w.msg_sender() != owner && !w.load_hash_approval(owner, digest) {
                return Err(SignatureError::HashNotApproved { owner });
            }
            Ok(owner)
        }
        v if v > 30 => w
            .ecrecover(eth_signed_message_hash(digest), v - ETH_SIGN_V_OFFSET, parts.r, parts.s)
            .ok_or(SignatureError::InvalidSignature { index }),
        v => w
            .ecrecover(digest, v, parts.r, parts.s)
            .ok_or(SignatureError::InvalidSignature { index }),
    }
}

/// EIP-1271: `s` points at a length-prefixed blob in the dynamic part, which must not overlap
/// the static entries.
fn check_contract_signature<W: SafeEnv>(
    w: &W,
    digest: B256,
    signatures: &[u8],
    static_len: usize,
    owner: Address,
    offset: B256,
) -> Result<(), SignatureError> {
    let invalid = SignatureError::InvalidContractSignature { owner };
    let offset: usize = U256::from_be_bytes(offset.0).try_into().map_err(|_| invalid)?;
    if offset < static_len {
        return Err(invalid);
    }
    let blob = read_length_prefixed(signatures, offset).ok_or(invalid)?;

    let call = IERC1271::isValidSignatureCall {
        hash: digest,
        signature: Bytes::copy_from_slice(blob),
    };
    let outcome = w.static_call_contract(owner, &call.abi_encode(), None);
    if !outcome.success
        || outcome.return_data.len() < 32
        || outcome.return_data[..4] != EIP1271_MAGIC_VALUE
    {
        return Err(invalid);
    }
    Ok(())
}

/// Records that the calling owner approves `hash`, which later satisfies a `v == 1` entry.
pub fn approve_hash<W: SafeEnv>(w: &mut W, hash: B256) -> Result<(), SafeError> {
    let owner = w.msg_sender();
    if !is_owner(w, owner) {
        return Err(OwnerError::NotAnOwner(owner).into());
    }
    w.store_hash_approval(owner, hash, true);
    w.emit_event(SafeEvent::ApproveHash { hash, owner });
    Ok(())
}
