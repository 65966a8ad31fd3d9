use alloy_primitives::{Address, B256};
use k256::ecdsa::{Error, SigningKey};
use safe_wallet_types::{eth_signed_message_hash, signatures::ETH_SIGN_V_OFFSET, SignatureParts};
use sha3::{Digest, Keccak256};

/// A secp256k1 owner key.
#[derive(Clone)]
pub struct OwnerKey {
    key: SigningKey,
}

impl OwnerKey {
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, Error> {
        Ok(Self { key: SigningKey::from_slice(secret)? })
    }

    /// Parses a hex private key, with or without `0x`.
    pub fn from_hex(secret: &str) -> anyhow::Result<Self> {
        let raw = hex::decode(secret.trim().trim_start_matches("0x"))
            .map_err(|e| anyhow::anyhow!("invalid hex private key: {e}"))?;
        let key = SigningKey::from_slice(&raw)
            .map_err(|e| anyhow::anyhow!("invalid secp256k1 private key: {e}"))?;
        Ok(Self { key })
    }

    pub fn address(&self) -> Address {
        let point = self.key.verifying_key().to_encoded_point(false);
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }

    /// Signs `digest` directly (`v` = 27/28).
    pub fn sign_digest(&self, digest: B256) -> Result<SignatureParts, Error> {
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(digest.as_slice())?;
        let bytes = signature.to_bytes();
        Ok(SignatureParts {
            v: 27 + recovery_id.to_byte(),
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..]),
        })
    }

    /// Signs the `eth_sign` prefixed digest, as wallets do for personal messages (`v` = 31/32).
    pub fn sign_eth_message(&self, digest: B256) -> Result<SignatureParts, Error> {
        let mut parts = self.sign_digest(eth_signed_message_hash(digest))?;
        parts.v += ETH_SIGN_V_OFFSET;
        Ok(parts)
    }
}

impl core::fmt::Debug for OwnerKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OwnerKey").field("address", &self.address()).finish()
    }
}
