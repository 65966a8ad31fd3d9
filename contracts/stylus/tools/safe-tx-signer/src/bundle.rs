use alloy_primitives::{Address, B256, U256};
use k256::ecdsa::Error;
use safe_wallet_types::{
    safe_tx::address_word,
    signatures::{APPROVED_HASH_V, CONTRACT_SIGNATURE_V},
    SignatureParts, SIGNATURE_LEN,
};

use crate::signer::OwnerKey;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Entry {
    Ecdsa(SignatureParts),
    /// Satisfied by a prior `approveHash` or by the owner submitting the transaction.
    Approved,
    /// EIP-1271 signature blob verified by the owner contract.
    Contract(Vec<u8>),
}

/// Collects owner signatures and packs them in the on-chain layout.
///
/// Static part: one 65-byte `r || s || v` entry per owner, sorted by owner address.
/// Dynamic part: contract signature blobs, each a 32-byte length word followed by the bytes,
/// referenced from their entry's `s`.
#[derive(Clone, Debug, Default)]
pub struct SignatureBundle {
    entries: Vec<(Address, Entry)>,
}

impl SignatureBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign(&mut self, key: &OwnerKey, digest: B256) -> Result<(), Error> {
        let parts = key.sign_digest(digest)?;
        self.add_ecdsa(key.address(), parts);
        Ok(())
    }

    pub fn sign_eth_message(&mut self, key: &OwnerKey, digest: B256) -> Result<(), Error> {
        let parts = key.sign_eth_message(digest)?;
        self.add_ecdsa(key.address(), parts);
        Ok(())
    }

    /// Adds a signature produced elsewhere. `signer` is only used for ordering.
    pub fn add_ecdsa(&mut self, signer: Address, parts: SignatureParts) {
        self.entries.push((signer, Entry::Ecdsa(parts)));
    }

    pub fn add_approved(&mut self, owner: Address) {
        self.entries.push((owner, Entry::Approved));
    }

    pub fn add_contract(&mut self, owner: Address, signature: Vec<u8>) {
        self.entries.push((owner, Entry::Contract(signature)));
    }

    /// Signers in packing order.
    pub fn signers(&self) -> Vec<Address> {
        let mut signers: Vec<Address> = self.entries.iter().map(|(a, _)| *a).collect();
        signers.sort();
        signers
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut entries: Vec<&(Address, Entry)> = self.entries.iter().collect();
        entries.sort_by_key(|(signer, _)| *signer);

        let static_len = entries.len() * SIGNATURE_LEN;
        let mut static_part = Vec::with_capacity(static_len);
        let mut dynamic_part = Vec::new();

        for (signer, entry) in entries {
            let parts = match entry {
                Entry::Ecdsa(parts) => *parts,
                Entry::Approved => SignatureParts {
                    v: APPROVED_HASH_V,
                    r: B256::from(address_word(*signer)),
                    s: B256::ZERO,
                },
                Entry::Contract(blob) => {
                    let offset = U256::from(static_len + dynamic_part.len());
                    dynamic_part.extend_from_slice(&U256::from(blob.len()).to_be_bytes::<32>());
                    dynamic_part.extend_from_slice(blob);
                    SignatureParts {
                        v: CONTRACT_SIGNATURE_V,
                        r: B256::from(address_word(*signer)),
                        s: B256::from(offset.to_be_bytes::<32>()),
                    }
                }
            };
            static_part.extend_from_slice(&parts.to_bytes());
        }

        static_part.extend_from_slice(&dynamic_part);
        static_part
    }
}
