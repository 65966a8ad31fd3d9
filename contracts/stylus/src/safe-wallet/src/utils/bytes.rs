//! Bounds-checked reads over caller-supplied byte strings.

use stylus_sdk::alloy_primitives::U256;

/// 32-byte big-endian word at `offset`.
pub fn read_word(bytes: &[u8], offset: usize) -> Option<U256> {
    let end = offset.checked_add(32)?;
    bytes.get(offset..end).map(U256::from_be_slice)
}

/// Length-prefixed blob at `offset`: a 32-byte length word followed by that many bytes.
pub fn read_length_prefixed(bytes: &[u8], offset: usize) -> Option<&[u8]> {
    let len: usize = read_word(bytes, offset)?.try_into().ok()?;
    let start = offset.checked_add(32)?;
    let end = start.checked_add(len)?;
    bytes.get(start..end)
}

/// First word of a call's return data is non-zero (Solidity `true`).
pub fn is_truthy_word(data: &[u8]) -> bool {
    data.len() >= 32 && data[..32].iter().any(|b| *b != 0)
}
