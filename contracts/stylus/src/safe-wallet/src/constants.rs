use stylus_sdk::alloy_primitives::Address;

/// Head (and tail marker) of the owner and module linked lists.
pub const SENTINEL: Address = Address::with_last_byte(1);

/// Gas added to the measured inner-call cost when refunding the submitter.
///
/// Covers the work the wallet does around the inner call (signature checks, nonce write,
/// the refund transfer itself) which cannot be observed from inside the call.
pub const REFUND_OVERHEAD_GAS: u64 = 32_000;

/// Minimum gas limit for an admin call the wallet makes against itself.
pub const ADMIN_CALL_GAS: u64 = 100_000;

/// `bytes4(keccak256("isValidSignature(bytes32,bytes)"))`.
pub const EIP1271_MAGIC_VALUE: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

pub const VERSION: &str = "1.0.0+stylus";

/// `ecrecover` precompile.
pub const ECRECOVER_PRECOMPILE: Address = Address::with_last_byte(1);
pub const ECRECOVER_GAS: u64 = 50_000;
