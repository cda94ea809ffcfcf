//! Constants used in the deploy scripts

use alloy_primitives::{address, Address};

/// The value of the network signal selecting the production network
pub const PRODUCTION_NETWORK_SIGNAL: &str = "mainnet";

/// The value of the network signal selecting the test network
pub const TEST_NETWORK_SIGNAL: &str = "testnet";

/// The file environment variables are loaded from, searched for from the
/// working directory upwards
pub const ENV_FILE: &str = ".env";

/// The name of the environment variable selecting the network
pub const NETWORK_ENV_VAR: &str = "NETWORK";

/// The name of the environment variable holding the production RPC url
pub const URL_MAIN_ENV_VAR: &str = "URL_MAIN";

/// The name of the environment variable holding the test network RPC url
pub const URL_TEST_ENV_VAR: &str = "URL_TEST";

/// The name of the environment variable holding the available private keys
pub const DEPLOYER_KEYS_ENV_VAR: &str = "DEPLOYER_KEYS";

/// The name of the environment variable overriding the deployer address
pub const DEPLOYER_ENV_VAR: &str = "DEPLOYER";

/// The name of the environment variable pointing to a registry overlay file
pub const DEPLOYMENTS_ENV_VAR: &str = "DEPLOYMENTS";

/// The name of the environment variable pointing to the build artifacts
pub const ARTIFACTS_DIR_ENV_VAR: &str = "ARTIFACTS_DIR";

/// The default location of the Hardhat contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts/contracts";

/// The extension of a Solidity source file, used in artifact paths
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of an artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The bytecode key in a Hardhat artifact
pub const ARTIFACT_BYTECODE_KEY: &str = "bytecode";

/// The label of the registry revision committed with the scripts
pub const BUILTIN_REVISION_LABEL: &str = "initial";

/// The label of the registry revision read from an overlay file
pub const OVERLAY_REVISION_LABEL: &str = "overlay";

/// The deployer used for the strategy and payout agent deployments
pub const STRATEGY_DEPLOYER: Address = address!("7B9e671B6cd10FD782Bdb982D40ffc0435C3C030");

/// The deployer used for the standalone vault deployment
pub const MOC_VAULT_DEPLOYER: Address = address!("12D16f3A335dfdB575FacE8e3ae6954a1C0e24f1");

/// The deployer used for the strategy + vault deployment
pub const FARM_DEPLOYER: Address = address!("647BB910944165D14b961985c28b06b08cA47f77");

/// The deployer used for the payout agent deployment
pub const PAYOUT_DEPLOYER: Address = STRATEGY_DEPLOYER;
