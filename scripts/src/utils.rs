//! Utilities for the deploy scripts.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{
    utils::format_ether,
    Bytes, I256, U256,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    constants::{ARTIFACT_BYTECODE_KEY, ARTIFACT_EXTENSION, ENV_FILE, SOLIDITY_EXTENSION},
    errors::ScriptError,
    types::ContractKind,
};

/// Load environment variables from `path`, or from the nearest `.env` file
/// when no path is given. Variables already set in the process environment
/// take precedence. Returns the file that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::from_filename(ENV_FILE),
    };

    match loaded {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!("could not load {}: {}", ENV_FILE, e);
            None
        }
    }
}

/// Sets up a provider that signs with the deployer's key and sends to the given RPC url
pub async fn setup_client(signer: PrivateKeySigner, rpc_url: &Url) -> Result<DynProvider, ScriptError> {
    let provider = ProviderBuilder::new()
        .wallet(signer)
        .connect_http(rpc_url.clone());
    let provider = DynProvider::new(provider);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    info!("connected to chain {} at {}", chain_id, rpc_url);

    Ok(provider)
}

/// Read the creation bytecode of `kind` from its Hardhat artifact,
/// `<artifacts_dir>/<Name>.sol/<Name>.json`
pub fn read_artifact_bytecode(artifacts_dir: &Path, kind: ContractKind) -> Result<Bytes, ScriptError> {
    let name = kind.artifact_name();
    let path = artifacts_dir
        .join(format!("{name}.{SOLIDITY_EXTENSION}"))
        .join(format!("{name}.{ARTIFACT_EXTENSION}"));

    let contents = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    parse_artifact_bytecode(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))
}

/// Extract the creation bytecode from the contents of a Hardhat artifact
pub fn parse_artifact_bytecode(contents: &str) -> Result<Bytes, String> {
    let artifact: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
    let bytecode = artifact
        .get(ARTIFACT_BYTECODE_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing `{ARTIFACT_BYTECODE_KEY}`"))?;

    let bytecode = Bytes::from_str(bytecode).map_err(|e| e.to_string())?;
    if bytecode.is_empty() {
        // Interfaces and abstract contracts compile to empty bytecode
        return Err("empty bytecode".to_string());
    }

    Ok(bytecode)
}

/// Format a wei amount in ether units, keeping the wei value alongside
pub fn format_wei(amount: U256) -> String {
    format!("{} ({} wei)", format_ether(amount), amount)
}

/// Format a signed wei amount in ether units, keeping the wei value alongside
pub fn format_signed_wei(amount: I256) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{} ({} wei)", sign, format_ether(amount.unsigned_abs()), amount)
}

/// The signed difference `before - after`, i.e. what the account spent
pub fn balance_delta(before: U256, after: U256) -> I256 {
    if before >= after {
        I256::from_raw(before - after)
    } else {
        -I256::from_raw(after - before)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, str::FromStr};

    use alloy::{signers::local::PrivateKeySigner, transports::http::reqwest::Url};
    use alloy_primitives::{I256, U256};

    use super::{
        balance_delta, format_signed_wei, parse_artifact_bytecode, read_artifact_bytecode,
        setup_client,
    };
    use crate::{errors::ScriptError, types::ContractKind};

    #[test]
    fn test_parse_bytecode() {
        let bytecode = parse_artifact_bytecode(r#"{"contractName": "Strategy", "bytecode": "0x6080604052"}"#).unwrap();
        assert_eq!(bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        assert!(parse_artifact_bytecode(r#"{"bytecode": "0x"}"#).is_err());
        assert!(parse_artifact_bytecode(r#"{"abi": []}"#).is_err());
    }

    #[test]
    fn test_read_artifact_from_hardhat_layout() {
        let dir = tempfile::tempdir().unwrap();
        let contract_dir = dir.path().join("PulseVault.sol");
        fs::create_dir_all(&contract_dir).unwrap();
        fs::write(contract_dir.join("PulseVault.json"), r#"{"bytecode": "0x6001"}"#).unwrap();

        let bytecode = read_artifact_bytecode(dir.path(), ContractKind::Vault).unwrap();
        assert_eq!(bytecode.to_vec(), vec![0x60, 0x01]);

        let missing = read_artifact_bytecode(dir.path(), ContractKind::Strategy);
        assert!(matches!(missing, Err(ScriptError::ArtifactParsing(_))));
    }

    #[test]
    fn test_balance_delta_sign() {
        assert_eq!(balance_delta(U256::from(10), U256::from(4)), I256::try_from(6i64).unwrap());
        assert_eq!(balance_delta(U256::from(4), U256::from(10)), I256::try_from(-6i64).unwrap());
    }

    #[test]
    fn test_format_signed_wei() {
        let spent = I256::try_from(1_500_000_000_000_000_000i64).unwrap();
        assert_eq!(format_signed_wei(spent), "1.500000000000000000 (1500000000000000000 wei)");
        assert_eq!(format_signed_wei(-spent), "-1.500000000000000000 (-1500000000000000000 wei)");
    }

    #[tokio::test]
    async fn test_client_setup_fails_on_unreachable_endpoint() {
        let url = Url::parse("http://127.0.0.1:1").unwrap();
        let signer = PrivateKeySigner::from_str(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let res = setup_client(signer, &url).await;

        assert!(matches!(res, Err(ScriptError::ClientInitialization(_))));
    }
}
