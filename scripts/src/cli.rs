//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy::transports::http::reqwest::Url;
use alloy_primitives::Address;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::{
    commands::{deploy_farm, deploy_moc_vault, deploy_payout, deploy_strategy},
    constants::{
        ARTIFACTS_DIR_ENV_VAR, DEFAULT_ARTIFACTS_DIR, DEPLOYER_ENV_VAR, DEPLOYER_KEYS_ENV_VAR,
        DEPLOYMENTS_ENV_VAR, NETWORK_ENV_VAR, URL_MAIN_ENV_VAR, URL_TEST_ENV_VAR,
    },
    errors::ScriptError,
};

/// Deploy and wire the farm contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to, `mainnet` or `testnet`.
    ///
    /// Anything other than `mainnet`, including no value at all, selects the
    /// test network.
    #[arg(long, env = NETWORK_ENV_VAR)]
    pub network: Option<String>,

    /// Production network RPC URL
    #[arg(long, env = URL_MAIN_ENV_VAR)]
    pub url_main: Option<Url>,

    /// Test network RPC URL
    #[arg(long, env = URL_TEST_ENV_VAR)]
    pub url_test: Option<Url>,

    /// Comma separated private keys of the accounts available for signing
    #[arg(long, env = DEPLOYER_KEYS_ENV_VAR, value_delimiter = ',', hide_env_values = true)]
    pub deployer_keys: Vec<String>,

    /// Address of the account to deploy from, overriding the command's default
    #[arg(long, env = DEPLOYER_ENV_VAR)]
    pub deployer: Option<Address>,

    /// JSON file with registry entries superseding the builtin addresses
    #[arg(long, env = DEPLOYMENTS_ENV_VAR)]
    pub deployments: Option<PathBuf>,

    /// Directory holding the Hardhat contract artifacts
    #[arg(long, env = ARTIFACTS_DIR_ENV_VAR, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// The contract graph to deploy
    #[command(subcommand)]
    pub command: Command,
}

/// The contract graphs that can be deployed
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the strategy
    DeployStrategy(DeployStrategyArgs),
    /// Deploy the vault, paired with the strategy
    DeployFarm(DeployFarmArgs),
    /// Deploy the payout agent
    DeployPayout(DeployPayoutArgs),
    /// Deploy the standalone vault variant
    DeployMocVault(DeployMocVaultArgs),
}

impl Command {
    /// Run the command, printing the deployment report
    pub async fn run(self, config: RunConfig) -> Result<(), ScriptError> {
        match self {
            Command::DeployStrategy(args) => deploy_strategy(args, config).await,
            Command::DeployFarm(args) => deploy_farm(args, config).await,
            Command::DeployPayout(args) => deploy_payout(args, config).await,
            Command::DeployMocVault(args) => deploy_moc_vault(args, config).await,
        }
    }
}

/// The global options every command runs with
pub struct RunConfig {
    /// The raw network signal
    pub network: Option<String>,
    /// Production network RPC URL
    pub url_main: Option<Url>,
    /// Test network RPC URL
    pub url_test: Option<Url>,
    /// The private keys available for signing
    pub deployer_keys: Vec<String>,
    /// The deployer address override
    pub deployer: Option<Address>,
    /// The registry overlay file
    pub deployments: Option<PathBuf>,
    /// The artifacts directory
    pub artifacts_dir: PathBuf,
}

impl Cli {
    /// Split the parsed arguments into the command and its configuration
    pub fn into_parts(self) -> (Command, RunConfig) {
        let config = RunConfig {
            network: self.network,
            url_main: self.url_main,
            url_test: self.url_test,
            deployer_keys: self.deployer_keys,
            deployer: self.deployer,
            deployments: self.deployments,
            artifacts_dir: self.artifacts_dir,
        };

        (self.command, config)
    }
}

/// Deploy the strategy.
///
/// The strategy is constructed with the farm asset.
#[derive(Args)]
pub struct DeployStrategyArgs {
    /// Deploy a fresh strategy instead of attaching to the registered one
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub redeploy_strategy: bool,

    /// Register the vault from the registry with the strategy
    #[arg(long)]
    pub set_vault: bool,
}

/// Deploy the vault, paired with the strategy.
///
/// The vault is constructed with the strategy address from this run, the farm
/// asset and the payout agent.
#[derive(Args)]
pub struct DeployFarmArgs {
    /// Deploy a fresh strategy instead of attaching to the registered one
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub redeploy_strategy: bool,

    /// Deploy a fresh vault instead of attaching to the registered one
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub redeploy_vault: bool,

    /// Register the vault from this run with the strategy
    #[arg(long)]
    pub set_vault: bool,
}

/// Deploy the payout agent.
///
/// The payout agent is constructed with the farm asset and the reward token.
#[derive(Args)]
pub struct DeployPayoutArgs {
    /// Deploy a fresh payout agent instead of attaching to the registered one
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub redeploy_payout: bool,
}

/// Deploy the standalone vault variant, which runs without a strategy.
///
/// The vault is constructed with the farm asset.
#[derive(Args)]
pub struct DeployMocVaultArgs {
    /// Deploy a fresh vault instead of attaching to the registered one
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub redeploy_vault: bool,
}
