use alloy_primitives::{Address, Bytes, B256, U256};
use safe_wallet_types::{Operation, SafeTx};
use serde::{Deserialize, Serialize};

/// A proposed transaction as exchanged between owners (JSON, camelCase like the Solidity ABI).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub to: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
    /// 0 = call, 1 = delegatecall, 2 = create.
    #[serde(default)]
    pub operation: u8,
    #[serde(default)]
    pub safe_tx_gas: U256,
    #[serde(default)]
    pub gas_price: U256,
    #[serde(default)]
    pub gas_token: Address,
    #[serde(default)]
    pub refund_receiver: Address,
    pub nonce: U256,
}

impl TxRequest {
    pub fn to_safe_tx(&self) -> anyhow::Result<SafeTx> {
        let operation = Operation::try_from(self.operation)
            .map_err(|unknown| anyhow::anyhow!("unknown operation {}", unknown.0))?;
        Ok(SafeTx {
            to: self.to,
            value: self.value,
            data: self.data.to_vec(),
            operation,
            safe_tx_gas: self.safe_tx_gas,
            gas_price: self.gas_price,
            gas_token: self.gas_token,
            refund_receiver: self.refund_receiver,
            nonce: self.nonce,
        })
    }
}

/// Output of the signer: the transaction, its digest and the packed signatures ready for
/// `execTransaction`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTx {
    pub safe: Address,
    pub chain_id: u64,
    pub safe_tx_hash: B256,
    pub tx: TxRequest,
    pub signers: Vec<Address>,
    pub signatures: Bytes,
}
