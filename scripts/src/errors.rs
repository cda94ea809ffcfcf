//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy_primitives::Address;

use crate::types::{ContractKind, NetworkProfile, Role};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Invalid or missing configuration
    Config(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error reading or parsing a compilation artifact
    ArtifactParsing(String),
    /// A required role has no address for the active network
    UnresolvedRole {
        /// The active network
        profile: NetworkProfile,
        /// The role that could not be resolved
        role: Role,
    },
    /// No available signing identity has the configured deployer address
    NoMatchingIdentity(Address),
    /// More than one available signing identity has the configured deployer address
    AmbiguousIdentity {
        /// The configured deployer address
        address: Address,
        /// The number of identities with that address
        matches: usize,
    },
    /// A constructor input names a unit that does not run earlier in the sequence
    ForwardReference {
        /// The unit whose input could not be satisfied
        unit: ContractKind,
        /// The unit it refers to
        missing: ContractKind,
    },
    /// The same contract kind appears twice in one run
    DuplicateUnit(ContractKind),
    /// The transaction submission layer failed a deploy, attach or call
    DeploymentSubmission {
        /// The unit (or wiring target) being processed when the failure occurred
        kind: ContractKind,
        /// The underlying failure
        reason: String,
    },
    /// A wiring action names an instance that is not part of the run
    DanglingWiringReference {
        /// The instance that could not be found
        target: ContractKind,
    },
    /// Error reading chain state, such as a balance or the block number
    ChainRead(String),
}

impl ScriptError {
    /// Wrap a collaborator failure raised while processing `kind`
    pub fn submission(kind: ContractKind, err: impl Display) -> Self {
        ScriptError::DeploymentSubmission {
            kind,
            reason: err.to_string(),
        }
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Config(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::UnresolvedRole { profile, role } => {
                write!(f, "no address registered for `{}` on {}", role, profile)
            }
            ScriptError::NoMatchingIdentity(address) => {
                write!(f, "no signing identity available for {}", address)
            }
            ScriptError::AmbiguousIdentity { address, matches } => {
                write!(f, "{} signing identities match {}", matches, address)
            }
            ScriptError::ForwardReference { unit, missing } => write!(
                f,
                "{} depends on {}, which is not deployed earlier in the run",
                unit, missing
            ),
            ScriptError::DuplicateUnit(kind) => write!(f, "{} appears twice in the run", kind),
            ScriptError::DeploymentSubmission { kind, reason } => {
                write!(f, "error submitting {}: {}", kind, reason)
            }
            ScriptError::DanglingWiringReference { target } => {
                write!(f, "wiring references {}, which is not part of the run", target)
            }
            ScriptError::ChainRead(s) => write!(f, "error reading chain state: {}", s),
        }
    }
}

impl Error for ScriptError {}
