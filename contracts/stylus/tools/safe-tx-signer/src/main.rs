use std::{fs, path::PathBuf};

use alloy_primitives::Address;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use safe_tx_signer::{OwnerKey, SignatureBundle, SignedTx, TxRequest};

/// Hash a Safe transaction and pack owner signatures for `execTransaction`.
///
/// Reads a JSON transaction (see `TxRequest`), signs its EIP-712 digest with every provided
/// owner key and prints (or writes) the signed bundle as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the transaction JSON.
    #[arg(long)]
    tx: PathBuf,

    /// Safe (proxy) address the transaction executes on.
    #[arg(long, env = "SAFE_ADDRESS")]
    safe: Address,

    /// Chain id of the network the Safe lives on.
    #[arg(long, env = "CHAIN_ID")]
    chain_id: u64,

    /// Owner private keys (hex, comma separated).
    #[arg(long, env = "SAFE_OWNER_KEYS", value_delimiter = ',')]
    keys: Vec<String>,

    /// Sign the `eth_sign` prefixed digest instead of the raw digest.
    #[arg(long)]
    eth_sign: bool,

    /// Owners that approved the hash on-chain (or will submit the transaction themselves).
    #[arg(long, value_delimiter = ',')]
    approved: Vec<Address>,

    /// Write the signed JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.tx)
        .with_context(|| format!("failed reading {}", cli.tx.display()))?;
    let request: TxRequest = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing transaction JSON in {}", cli.tx.display()))?;
    let safe_tx_hash = request.to_safe_tx()?.signing_hash(cli.chain_id, cli.safe);

    let mut bundle = SignatureBundle::new();
    for secret in &cli.keys {
        let key = OwnerKey::from_hex(secret)?;
        if cli.eth_sign {
            bundle.sign_eth_message(&key, safe_tx_hash)
        } else {
            bundle.sign(&key, safe_tx_hash)
        }
        .map_err(|e| anyhow!("signing with {} failed: {e}", key.address()))?;
    }
    for owner in &cli.approved {
        bundle.add_approved(*owner);
    }
    if bundle.is_empty() {
        return Err(anyhow!(
            "no signatures: provide --keys (or SAFE_OWNER_KEYS) and/or --approved"
        ));
    }

    let signed = SignedTx {
        safe: cli.safe,
        chain_id: cli.chain_id,
        safe_tx_hash,
        tx: request,
        signers: bundle.signers(),
        signatures: bundle.encode().into(),
    };
    let serialised = serde_json::to_string_pretty(&signed).context("failed serialising signed tx")?;

    match cli.out {
        Some(path) => {
            fs::write(&path, serialised.as_bytes())
                .with_context(|| format!("failed writing {}", path.display()))?;
            eprintln!("Signed {} with {} owner(s) -> {}", safe_tx_hash, bundle.len(), path.display());
        }
        None => println!("{serialised}"),
    }
    Ok(())
}
