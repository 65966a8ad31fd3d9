//! Safe transaction and its EIP-712 digest.
//!
//! The digest binds the wallet address, the chain id, every transaction field and the nonce:
//! `keccak256(0x19 || 0x01 || domainSeparator || structHash)`.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::operation::Operation;

/// `keccak256` pre-image of the domain type hash.
pub const DOMAIN_TYPE: &[u8] = b"EIP712Domain(uint256 chainId,address verifyingContract)";

/// `keccak256` pre-image of the transaction type hash.
pub const SAFE_TX_TYPE: &[u8] = b"SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)";

/// A proposed transaction, built off-chain and consumed exactly once on-chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeTx {
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub operation: Operation,
    /// Gas budget for the inner call; zero forwards everything left.
    pub safe_tx_gas: U256,
    /// Price ceiling the signers agreed to refund per gas unit. Zero disables the refund.
    pub gas_price: U256,
    /// Refund currency, `Address::ZERO` for the native currency.
    pub gas_token: Address,
    /// Refund recipient, `Address::ZERO` for the transaction origin.
    pub refund_receiver: Address,
    pub nonce: U256,
}

impl SafeTx {
    /// Plain value transfer / call with no refund.
    pub fn call(to: Address, value: U256, data: Vec<u8>) -> Self {
        Self { to, value, data, ..Default::default() }
    }

    pub fn struct_hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(32 * 10);
        buf.extend_from_slice(keccak256(SAFE_TX_TYPE).as_slice());
        buf.extend_from_slice(&address_word(self.to));
        buf.extend_from_slice(&self.value.to_be_bytes::<32>());
        buf.extend_from_slice(keccak256(&self.data).as_slice());
        let mut op_padded = [0u8; 32];
        op_padded[31] = self.operation as u8;
        buf.extend_from_slice(&op_padded);
        buf.extend_from_slice(&self.safe_tx_gas.to_be_bytes::<32>());
        buf.extend_from_slice(&self.gas_price.to_be_bytes::<32>());
        buf.extend_from_slice(&address_word(self.gas_token));
        buf.extend_from_slice(&address_word(self.refund_receiver));
        buf.extend_from_slice(&self.nonce.to_be_bytes::<32>());
        keccak256(buf)
    }

    /// The 66-byte pre-image `0x19 || 0x01 || domainSeparator || structHash`.
    pub fn encode_transaction_data(&self, chain_id: u64, safe: Address) -> Vec<u8> {
        let mut buf = Vec::with_capacity(2 + 32 + 32);
        buf.extend_from_slice(b"\x19\x01");
        buf.extend_from_slice(domain_separator(chain_id, safe).as_slice());
        buf.extend_from_slice(self.struct_hash().as_slice());
        buf
    }

    /// Digest the owners sign.
    pub fn signing_hash(&self, chain_id: u64, safe: Address) -> B256 {
        keccak256(self.encode_transaction_data(chain_id, safe))
    }
}

pub fn domain_separator(chain_id: u64, safe: Address) -> B256 {
    let mut buf = Vec::with_capacity(32 * 3);
    buf.extend_from_slice(keccak256(DOMAIN_TYPE).as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(safe));
    keccak256(buf)
}

/// Left-pads an address into a 32-byte ABI word.
pub fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(address.as_slice());
    word
}
