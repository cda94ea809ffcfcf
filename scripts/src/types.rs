//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use serde::Deserialize;

/// The network environments the contracts are deployed to
#[derive(Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetworkProfile {
    /// The production network
    #[serde(rename = "mainnet")]
    Production,
    /// The test network
    #[serde(rename = "testnet")]
    Test,
}

impl Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkProfile::Production => write!(f, "mainnet"),
            NetworkProfile::Test => write!(f, "testnet"),
        }
    }
}

/// A logical name under which a contract address is registered
#[derive(Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// The wrapped native token
    Bnb,
    /// The PancakeSwap router
    PcsRouter,
    /// The aggregation router
    Router,
    /// The swap contract
    Swap,
    /// The yield strategy
    Strategy,
    /// The vault paired with the strategy
    Vault,
    /// The deposit asset of the farm
    #[serde(alias = "usdt")]
    Asset,
    /// The payout agent
    PayoutAgent,
    /// The token rewards are paid out in
    #[serde(alias = "vfx")]
    RewardToken,
    /// The standalone vault variant
    MocVault,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Bnb => write!(f, "bnb"),
            Role::PcsRouter => write!(f, "pcsRouter"),
            Role::Router => write!(f, "router"),
            Role::Swap => write!(f, "swap"),
            Role::Strategy => write!(f, "strategy"),
            Role::Vault => write!(f, "vault"),
            Role::Asset => write!(f, "asset"),
            Role::PayoutAgent => write!(f, "payoutAgent"),
            Role::RewardToken => write!(f, "rewardToken"),
            Role::MocVault => write!(f, "mocVault"),
        }
    }
}

/// The contracts this tool knows how to deploy
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContractKind {
    /// The yield strategy
    Strategy,
    /// The vault, which owns a strategy
    Vault,
    /// The payout agent
    PayoutAgent,
    /// The vault variant used without a strategy
    VaultStandalone,
}

impl ContractKind {
    /// The role under which an already deployed instance of this contract
    /// is registered
    pub fn registry_role(&self) -> Role {
        match self {
            ContractKind::Strategy => Role::Strategy,
            ContractKind::Vault => Role::Vault,
            ContractKind::PayoutAgent => Role::PayoutAgent,
            ContractKind::VaultStandalone => Role::MocVault,
        }
    }

    /// The name of the compiled contract, as it appears in the build artifacts
    pub fn artifact_name(&self) -> &'static str {
        match self {
            ContractKind::Strategy => "Strategy",
            ContractKind::Vault => "PulseVault",
            ContractKind::PayoutAgent => "PayoutAgent",
            ContractKind::VaultStandalone => "MocVault",
        }
    }
}

impl Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact_name())
    }
}
