//! `ecrecover` through the precompile at `0x01`.

use stylus_sdk::{
    alloy_primitives::{Address, B256},
    call::RawCall,
};

use crate::constants::{ECRECOVER_GAS, ECRECOVER_PRECOMPILE};

/// Recovers the signer of `digest`. The precompile returns no data for an invalid `v`, a
/// malformed `(r, s)` or an unrecoverable point; all of those map to `None`.
pub fn ecrecover(digest: B256, v: u8, r: B256, s: B256) -> Option<Address> {
    let input = ecrecover_input(digest, v, r, s);
    let out = unsafe {
        RawCall::new_static()
            .gas(ECRECOVER_GAS)
            .call(ECRECOVER_PRECOMPILE, &input)
    }
    .ok()?;
    if out.len() < 32 {
        return None;
    }
    // Address sits in the low 20 bytes of the returned word.
    let recovered = Address::from_slice(&out[12..32]);
    (recovered != Address::ZERO).then_some(recovered)
}

/// `digest || v (as a word) || r || s`.
pub fn ecrecover_input(digest: B256, v: u8, r: B256, s: B256) -> [u8; 128] {
    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    input[63] = v;
    input[64..96].copy_from_slice(r.as_slice());
    input[96..128].copy_from_slice(s.as_slice());
    input
}
