//! Selection of the identity that signs the deployment transactions

use std::str::FromStr;

use alloy::signers::{local::PrivateKeySigner, Signer};
use alloy_primitives::Address;

use crate::errors::ScriptError;

/// Something that can sign on behalf of an address
pub trait DeployerCandidate {
    /// The address this candidate signs for
    fn candidate_address(&self) -> Address;
}

impl DeployerCandidate for PrivateKeySigner {
    fn candidate_address(&self) -> Address {
        Signer::address(self)
    }
}

impl DeployerCandidate for Address {
    fn candidate_address(&self) -> Address {
        *self
    }
}

/// Pick the single candidate whose address equals `criterion`
pub fn select_deployer<I: DeployerCandidate>(
    candidates: impl IntoIterator<Item = I>,
    criterion: Address,
) -> Result<I, ScriptError> {
    let mut matching: Vec<I> = candidates
        .into_iter()
        .filter(|candidate| candidate.candidate_address() == criterion)
        .collect();

    match matching.len() {
        0 => Err(ScriptError::NoMatchingIdentity(criterion)),
        1 => Ok(matching.remove(0)),
        matches => Err(ScriptError::AmbiguousIdentity {
            address: criterion,
            matches,
        }),
    }
}

/// Parse the configured private keys into signers
pub fn parse_signers(keys: &[String]) -> Result<Vec<PrivateKeySigner>, ScriptError> {
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            PrivateKeySigner::from_str(key.trim()).map_err(|e| {
                ScriptError::ClientInitialization(format!("invalid private key #{}: {}", i, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address};

    use super::{parse_signers, select_deployer, DeployerCandidate};
    use crate::errors::ScriptError;

    /// The first default Anvil / Hardhat account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    /// The address of [`DEV_KEY`]
    const DEV_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    const A: Address = address!("1111111111111111111111111111111111111111");
    const B: Address = address!("2222222222222222222222222222222222222222");

    #[test]
    fn test_exact_match() {
        assert_eq!(select_deployer([A, B], B).unwrap(), B);
    }

    #[test]
    fn test_no_match() {
        let res = select_deployer([A], B);
        assert_eq!(res, Err(ScriptError::NoMatchingIdentity(B)));

        let res = select_deployer(Vec::<Address>::new(), B);
        assert_eq!(res, Err(ScriptError::NoMatchingIdentity(B)));
    }

    #[test]
    fn test_ambiguous_match() {
        let res = select_deployer([A, B, A], A);
        assert_eq!(
            res,
            Err(ScriptError::AmbiguousIdentity {
                address: A,
                matches: 2
            })
        );
    }

    #[test]
    fn test_signer_selection() {
        let signers = parse_signers(&[DEV_KEY.to_string()]).unwrap();
        let deployer = select_deployer(signers, DEV_ADDRESS).unwrap();
        assert_eq!(deployer.candidate_address(), DEV_ADDRESS);
    }

    #[test]
    fn test_invalid_key() {
        let res = parse_signers(&["not a key".to_string()]);
        assert!(matches!(res, Err(ScriptError::ClientInitialization(_))));
    }
}
