//! Implementations of the various deploy scripts

use alloy_primitives::Address;
use tracing::info;

use crate::{
    cli::{DeployFarmArgs, DeployMocVaultArgs, DeployPayoutArgs, DeployStrategyArgs, RunConfig},
    constants::{FARM_DEPLOYER, MOC_VAULT_DEPLOYER, PAYOUT_DEPLOYER, STRATEGY_DEPLOYER},
    errors::ScriptError,
    identity::{parse_signers, select_deployer, DeployerCandidate},
    network::NetworkContext,
    orchestrator::{DeploymentFailure, DeploymentOrchestrator},
    registry::AddressRegistry,
    submitter::ChainSubmitter,
    types::{ContractKind, Role},
    units::{DeploymentUnit, UnitInput, WiringAction},
    utils::setup_client,
};

pub async fn deploy_strategy(
    args: DeployStrategyArgs,
    config: RunConfig,
) -> Result<(), ScriptError> {
    let units = [DeploymentUnit::new(ContractKind::Strategy, args.redeploy_strategy)];

    let mut wirings = Vec::new();
    if args.set_vault {
        wirings.push(WiringAction::set_vault(UnitInput::Registry(Role::Vault)));
    }

    run_graph(config, STRATEGY_DEPLOYER, &units, &wirings).await
}

pub async fn deploy_farm(args: DeployFarmArgs, config: RunConfig) -> Result<(), ScriptError> {
    let units = [
        DeploymentUnit::new(ContractKind::Strategy, args.redeploy_strategy),
        DeploymentUnit::new(ContractKind::Vault, args.redeploy_vault).with_args([
            UnitInput::Output(ContractKind::Strategy),
            UnitInput::Registry(Role::Asset),
            UnitInput::Registry(Role::PayoutAgent),
        ]),
    ];

    let mut wirings = Vec::new();
    if args.set_vault {
        wirings.push(WiringAction::set_vault(UnitInput::Output(ContractKind::Vault)));
    }

    run_graph(config, FARM_DEPLOYER, &units, &wirings).await
}

pub async fn deploy_payout(args: DeployPayoutArgs, config: RunConfig) -> Result<(), ScriptError> {
    let units = [DeploymentUnit::new(ContractKind::PayoutAgent, args.redeploy_payout)];
    run_graph(config, PAYOUT_DEPLOYER, &units, &[]).await
}

pub async fn deploy_moc_vault(
    args: DeployMocVaultArgs,
    config: RunConfig,
) -> Result<(), ScriptError> {
    let units = [DeploymentUnit::new(ContractKind::VaultStandalone, args.redeploy_vault)];
    run_graph(config, MOC_VAULT_DEPLOYER, &units, &[]).await
}

/// Resolve the network and deployer, run the units and wirings, and print the report
async fn run_graph(
    config: RunConfig,
    default_deployer: Address,
    units: &[DeploymentUnit],
    wirings: &[WiringAction],
) -> Result<(), ScriptError> {
    let mut registry = AddressRegistry::builtin();
    if let Some(path) = &config.deployments {
        registry.load_overlay(path)?;
    }

    let context = NetworkContext::new(
        config.network.as_deref(),
        config.url_main,
        config.url_test,
        registry,
    );

    let criterion = config.deployer.unwrap_or(default_deployer);
    let signer = select_deployer(parse_signers(&config.deployer_keys)?, criterion)?;
    let deployer = signer.candidate_address();
    info!("deploying to {} with the account {}", context.current(), deployer);

    let provider = setup_client(signer, context.endpoint()?).await?;
    let submitter = ChainSubmitter::new(provider, config.artifacts_dir);
    let orchestrator = DeploymentOrchestrator::new(&submitter, context.registry_slice());

    match orchestrator.run(deployer, units, wirings).await {
        Ok(report) => {
            println!("{report}");
            Ok(())
        }
        Err(DeploymentFailure { error, report }) => {
            eprintln!("{error}");
            println!("{report}");
            Err(error)
        }
    }
}
