use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use regex::Regex;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Raw output kept in the deployments file is capped at this many bytes.
const MAX_RECORDED_OUTPUT: usize = 16_000;

/// Deploy the Safe master copy with `cargo stylus deploy` and record it in a deployments JSON.
///
/// Proxies are created separately and delegate into the recorded address; `setup` is called on
/// the proxy, never on the master copy.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the Stylus contract crate.
    #[arg(long, default_value = "src/safe-wallet")]
    contract_dir: PathBuf,

    /// RPC URL used by `cargo stylus deploy`.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Chain id recorded alongside the deployment (owners sign over it).
    #[arg(long, env = "CHAIN_ID")]
    chain_id: Option<u64>,

    /// Path to a file containing the deployer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` to store this contract.
    #[arg(long, default_value = "safe-wallet")]
    contract_key: String,

    /// Optional network name (eg, devnet, arb-sepolia).
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Also run `cargo stylus export-abi` and write the Solidity interface here.
    #[arg(long)]
    export_abi: Option<PathBuf>,

    /// Extra args to pass through to `cargo stylus deploy` (after `--`).
    #[arg(last = true)]
    passthrough: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
struct Deployment {
    address: String,
    tx_hashes: Vec<String>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let raw_output = run_cargo_stylus(&cli, deploy_command(&cli)?, "deploy")?;
    let deployment = parse_deploy_output(&raw_output)?;

    if let Some(ref abi_path) = cli.export_abi {
        let mut cmd = Command::new("cargo");
        cmd.arg("stylus").arg("export-abi");
        let abi = run_cargo_stylus(&cli, cmd, "export-abi")?;
        fs::write(abi_path, abi.trim().as_bytes())
            .with_context(|| format!("failed writing {}", abi_path.display()))?;
    }

    write_deployments_json(&cli, &deployment, &raw_output)?;

    println!("Deployed `{}` to {}", cli.contract_key, deployment.address);
    Ok(())
}

fn deploy_command(cli: &Cli) -> Result<Command> {
    let mut cmd = Command::new("cargo");
    cmd.arg("stylus").arg("deploy");
    cmd.arg("-e").arg(&cli.rpc_url);

    if let Some(ref pk_path) = cli.private_key_path {
        cmd.arg("--private-key-path").arg(pk_path);
    } else if let Some(ref pk) = cli.private_key {
        cmd.arg("--private-key").arg(pk);
    } else {
        return Err(anyhow!(
            "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        ));
    }

    cmd.args(&cli.passthrough);
    Ok(cmd)
}

/// Runs a `cargo stylus` subcommand in the contract directory and returns stdout + stderr.
fn run_cargo_stylus(cli: &Cli, mut cmd: Command, what: &str) -> Result<String> {
    cmd.current_dir(&cli.contract_dir);
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let output = cmd
        .output()
        .with_context(|| format!("failed to run `cargo stylus {what}`"))?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(anyhow!(
            "`cargo stylus {what}` failed (exit {}):\n{stdout}\n{stderr}",
            output.status
        ));
    }
    if what == "export-abi" {
        return Ok(stdout);
    }
    Ok(format!("{stdout}\n{stderr}"))
}

/// Extracts the deployed address and confirmed transactions from `cargo stylus deploy` output:
///
/// ```text
/// Deploying program to address 0x...
/// Confirmed tx 0x...
/// ```
fn parse_deploy_output(output: &str) -> Result<Deployment> {
    let re_address = Regex::new(r"Deploying program to address (0x[a-fA-F0-9]{40})")?;
    let re_tx = Regex::new(r"Confirmed tx (0x[a-fA-F0-9]{64})")?;

    let address = re_address
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| anyhow!("could not parse deployed address from `cargo stylus deploy` output"))?;

    let tx_hashes = re_tx
        .captures_iter(output)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    Ok(Deployment { address, tx_hashes })
}

fn write_deployments_json(cli: &Cli, deployment: &Deployment, raw_output: &str) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = if cli.deployments_path.exists() {
        fs::read_to_string(&cli.deployments_path)
            .with_context(|| format!("failed reading {}", cli.deployments_path.display()))?
    } else {
        String::new()
    };

    let mut root: Value = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", cli.deployments_path.display()))?
    };
    if !root.is_object() {
        root = json!({});
    }

    root["network"] = json!(cli.network);
    root["updated_at"] = json!(now);
    if let Some(chain_id) = cli.chain_id {
        root["chain_id"] = json!(chain_id);
    }
    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }

    let mut entry = json!({
        "address": deployment.address,
        "rpc_url": cli.rpc_url,
        "deployed_at": now,
    });
    if !deployment.tx_hashes.is_empty() {
        entry["tx_hashes"] = json!(deployment.tx_hashes);
    }
    if let Some(ref abi_path) = cli.export_abi {
        entry["abi_path"] = json!(abi_path.display().to_string());
    }

    let trimmed = raw_output.trim();
    if !trimmed.is_empty() {
        entry["cargo_stylus_output"] = json!(truncate_utf8(trimmed, MAX_RECORDED_OUTPUT));
    }

    root["deployments"][&cli.contract_key] = entry;

    write_json_atomic(&cli.deployments_path, &root)
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char boundary.
fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised =
        serde_json::to_string_pretty(value).context("failed serialising deployments JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deploy_output() {
        let output = "\
stripped custom section from user wasm
Deploying program to address 0x5FbDB2315678afecb367f032d93F642f64180aa3
Confirmed tx 0x1111111111111111111111111111111111111111111111111111111111111111
Activating program at address 0x5FbDB2315678afecb367f032d93F642f64180aa3
Confirmed tx 0x2222222222222222222222222222222222222222222222222222222222222222
";
        let deployment = parse_deploy_output(output).unwrap();
        assert_eq!(deployment.address, "0x5FbDB2315678afecb367f032d93F642f64180aa3");
        assert_eq!(deployment.tx_hashes.len(), 2);
        assert!(deployment.tx_hashes[1].ends_with("2222"));
    }

    #[test]
    fn test_parse_deploy_output_without_address() {
        assert!(parse_deploy_output("error: insufficient funds").is_err());
    }

    #[test]
    fn test_truncate_utf8_keeps_char_boundaries() {
        assert_eq!(truncate_utf8("abc", 10), "abc");
        assert_eq!(truncate_utf8("héllo", 2), "h");
        assert_eq!(truncate_utf8("héllo", 3), "hé");
    }
}
