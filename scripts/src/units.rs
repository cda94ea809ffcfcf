//! Declarations of the contracts to deploy and the calls that link them

use std::fmt::{self, Display};

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use itertools::Itertools;

use crate::{
    errors::ScriptError,
    solidity::IStrategy::setVaultCall,
    types::{ContractKind, Role},
};

/// Where the value of a constructor or wiring argument comes from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnitInput {
    /// The address registered for a role on the active network
    Registry(Role),
    /// The address produced by an earlier unit of the same run
    Output(ContractKind),
}

impl Display for UnitInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitInput::Registry(role) => write!(f, "{}", role),
            UnitInput::Output(kind) => write!(f, "{}@run", kind),
        }
    }
}

/// A contract to either deploy or attach to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentUnit {
    /// The contract
    pub kind: ContractKind,
    /// The constructor arguments, in ABI order
    pub constructor_args: Vec<UnitInput>,
    /// Whether to deploy a fresh instance. When unset, the unit attaches to
    /// the address registered for the contract's role.
    pub redeploy: bool,
}

impl DeploymentUnit {
    /// A unit with the contract's usual constructor arguments
    pub fn new(kind: ContractKind, redeploy: bool) -> Self {
        Self {
            kind,
            constructor_args: default_constructor_args(kind),
            redeploy,
        }
    }

    /// Replace the constructor arguments
    pub fn with_args(mut self, args: impl IntoIterator<Item = UnitInput>) -> Self {
        self.constructor_args = args.into_iter().collect();
        self
    }

    /// The role holding the address to attach to
    pub fn existing_role(&self) -> Role {
        self.kind.registry_role()
    }
}

/// The constructor arguments each contract takes, all sourced from the registry
fn default_constructor_args(kind: ContractKind) -> Vec<UnitInput> {
    use UnitInput::Registry;

    match kind {
        ContractKind::Strategy => vec![Registry(Role::Asset)],
        ContractKind::Vault => vec![
            Registry(Role::Strategy),
            Registry(Role::Asset),
            Registry(Role::PayoutAgent),
        ],
        ContractKind::PayoutAgent => vec![Registry(Role::Asset), Registry(Role::RewardToken)],
        ContractKind::VaultStandalone => vec![Registry(Role::Asset)],
    }
}

/// A post-deployment method that links two contracts
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WiringCall {
    /// `Strategy.setVault(address)`
    SetVault,
}

impl WiringCall {
    /// The Solidity name of the method
    pub fn method(&self) -> &'static str {
        match self {
            WiringCall::SetVault => "setVault",
        }
    }

    /// ABI-encode a call to the method
    pub fn calldata(&self, args: &[Address]) -> Result<Bytes, ScriptError> {
        match (self, args) {
            (WiringCall::SetVault, [vault]) => Ok(setVaultCall { vault: *vault }.abi_encode().into()),
            _ => Err(ScriptError::Config(format!(
                "`{}` called with {} arguments",
                self.method(),
                args.len()
            ))),
        }
    }
}

/// A call from one deployed instance to link it with another
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WiringAction {
    /// The instance the call is sent to
    pub target: ContractKind,
    /// The method called
    pub call: WiringCall,
    /// The arguments of the call
    pub args: Vec<UnitInput>,
}

impl WiringAction {
    /// Register `vault` as the owner of the strategy deployed or attached in this run
    pub fn set_vault(vault: UnitInput) -> Self {
        Self {
            target: ContractKind::Strategy,
            call: WiringCall::SetVault,
            args: vec![vault],
        }
    }
}

impl Display for WiringAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({})",
            self.target,
            self.call.method(),
            self.args.iter().join(", ")
        )
    }
}
