//! The network-scoped address registry
//!
//! The registry is an append-only list of revisions. Each revision declares
//! addresses for some `(profile, role)` pairs; resolution always returns the
//! entry from the most recently declared revision. Older entries stay in the
//! registry so that the history of a role can be inspected, but they are
//! never used for resolution.

use std::{collections::BTreeMap, fs, path::Path};

use alloy_primitives::{address, Address};
use tracing::debug;

use crate::{
    constants::{BUILTIN_REVISION_LABEL, OVERLAY_REVISION_LABEL},
    errors::ScriptError,
    types::{NetworkProfile, Role},
};

/// The addresses committed for the production network
const PRODUCTION_ADDRESSES: [(Role, Address); 7] = [
    (Role::Bnb, address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c")),
    (Role::PcsRouter, address!("10ED43C718714eb63d5aA57B78B54704E256024E")),
    (Role::Router, address!("0Fa0544003C3Ad35806d22774ee64B7F6b56589b")),
    (Role::Swap, address!("2085B84912531B126f1C92cd70A71381713f0795")),
    (Role::Strategy, address!("656a0c3aC9900f74305FcC0338DCaD8A8DF4f9BF")),
    (Role::Vault, address!("7C19BB91c68405CAC0A77727eCe7abF516E5af5D")),
    (Role::Asset, address!("55d398326f99059fF775485246999027B3197955")),
];

/// The addresses committed for the test network
const TEST_ADDRESSES: [(Role, Address); 7] = [
    (Role::Bnb, address!("ae13d989daC2f0dEbFf460aC112a837C89BAa7cd")),
    (Role::PcsRouter, address!("D99D1c33F9fC3444f8101754aBC46c52416550D1")),
    (Role::Router, address!("291d6B7A0c93c8C73BAB5f0D9cDcEb905cc0F428")),
    (Role::Swap, address!("681dCD13e55C295AAD0141952bF94cF785A5179C")),
    (Role::Strategy, address!("656a0c3aC9900f74305FcC0338DCaD8A8DF4f9BF")),
    (Role::Vault, address!("02b3a54Ff83c0FeBD611D046ca4fF7716465b32d")),
    (Role::Asset, address!("d7d7F4313A6F098c200aFc4f313DC84301D55Cd1")),
];

/// A single registered address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The index of the revision that declared this entry
    pub revision: usize,
    /// The network the address lives on
    pub profile: NetworkProfile,
    /// The role the address is registered under
    pub role: Role,
    /// The registered address
    pub address: Address,
}

/// An append-only, versioned `(profile, role) -> address` table
#[derive(Clone, Debug, Default)]
pub struct AddressRegistry {
    /// The labels of the declared revisions, in declaration order
    revisions: Vec<String>,
    /// All entries ever declared, in declaration order
    entries: Vec<RegistryEntry>,
}

/// The shape of a registry overlay file
type OverlayFile = BTreeMap<NetworkProfile, BTreeMap<Role, Address>>;

impl AddressRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry holding the addresses committed with the scripts
    pub fn builtin() -> Self {
        let production = PRODUCTION_ADDRESSES
            .into_iter()
            .map(|(role, address)| (NetworkProfile::Production, role, address));
        let test = TEST_ADDRESSES
            .into_iter()
            .map(|(role, address)| (NetworkProfile::Test, role, address));

        let mut registry = Self::new();
        registry.declare_revision(BUILTIN_REVISION_LABEL, production.chain(test));
        registry
    }

    /// Append a new revision. Its entries supersede every earlier entry for
    /// the same `(profile, role)` pair.
    pub fn declare_revision<I>(&mut self, label: &str, entries: I) -> usize
    where
        I: IntoIterator<Item = (NetworkProfile, Role, Address)>,
    {
        let revision = self.revisions.len();
        self.revisions.push(label.to_string());
        self.entries
            .extend(entries.into_iter().map(|(profile, role, address)| RegistryEntry {
                revision,
                profile,
                role,
                address,
            }));

        revision
    }

    /// Read a JSON overlay of the form `{"mainnet": {"vault": "0x.."}, "testnet": {..}}`
    /// and append it as the newest revision
    pub fn load_overlay(&mut self, path: &Path) -> Result<usize, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::Config(format!("reading {}: {}", path.display(), e))
        })?;
        let revision = self.apply_overlay(&contents)?;
        debug!("loaded registry overlay from {}", path.display());

        Ok(revision)
    }

    /// Parse an overlay document and append it as the newest revision
    pub fn apply_overlay(&mut self, contents: &str) -> Result<usize, ScriptError> {
        let overlay: OverlayFile = serde_json::from_str(contents)
            .map_err(|e| ScriptError::Config(format!("parsing registry overlay: {}", e)))?;

        let entries = overlay.into_iter().flat_map(|(profile, roles)| {
            roles
                .into_iter()
                .map(move |(role, address)| (profile, role, address))
        });

        Ok(self.declare_revision(OVERLAY_REVISION_LABEL, entries))
    }

    /// Resolve the authoritative address for `role` on `profile`
    pub fn resolve(&self, profile: NetworkProfile, role: Role) -> Result<Address, ScriptError> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.profile == profile && entry.role == role)
            .map(|entry| entry.address)
            .filter(|address| !address.is_zero())
            .ok_or(ScriptError::UnresolvedRole { profile, role })
    }

    /// All entries ever declared for `role` on `profile`, oldest first
    pub fn history(
        &self,
        profile: NetworkProfile,
        role: Role,
    ) -> impl Iterator<Item = &RegistryEntry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.profile == profile && entry.role == role)
    }

    /// The label of the given revision
    pub fn revision_label(&self, revision: usize) -> Option<&str> {
        self.revisions.get(revision).map(String::as_str)
    }

    /// A view of the registry restricted to one network
    pub fn slice(&self, profile: NetworkProfile) -> RegistrySlice<'_> {
        RegistrySlice {
            registry: self,
            profile,
        }
    }
}

/// A view of an [`AddressRegistry`] restricted to a single network
#[derive(Clone, Copy, Debug)]
pub struct RegistrySlice<'a> {
    /// The underlying registry
    registry: &'a AddressRegistry,
    /// The network this slice is restricted to
    profile: NetworkProfile,
}

impl<'a> RegistrySlice<'a> {
    /// The network this slice is restricted to
    pub fn profile(&self) -> NetworkProfile {
        self.profile
    }

    /// Resolve the authoritative address for `role`
    pub fn resolve(&self, role: Role) -> Result<Address, ScriptError> {
        self.registry.resolve(self.profile, role)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address};

    use super::AddressRegistry;
    use crate::{
        errors::ScriptError,
        types::{NetworkProfile, Role},
    };

    #[test]
    fn test_builtin_resolves_per_network() {
        let registry = AddressRegistry::builtin();

        assert_eq!(
            registry.resolve(NetworkProfile::Production, Role::Vault).unwrap(),
            address!("7C19BB91c68405CAC0A77727eCe7abF516E5af5D")
        );
        assert_eq!(
            registry.resolve(NetworkProfile::Test, Role::Vault).unwrap(),
            address!("02b3a54Ff83c0FeBD611D046ca4fF7716465b32d")
        );
    }

    #[test]
    fn test_missing_role_is_unresolved() {
        let registry = AddressRegistry::builtin();

        assert_eq!(
            registry.resolve(NetworkProfile::Test, Role::PayoutAgent),
            Err(ScriptError::UnresolvedRole {
                profile: NetworkProfile::Test,
                role: Role::PayoutAgent,
            })
        );
    }

    #[test]
    fn test_latest_revision_wins() {
        let old = address!("1111111111111111111111111111111111111111");
        let new = address!("2222222222222222222222222222222222222222");

        let mut registry = AddressRegistry::new();
        registry.declare_revision("first", [(NetworkProfile::Test, Role::Vault, old)]);
        let second = registry.declare_revision("second", [(NetworkProfile::Test, Role::Vault, new)]);

        assert_eq!(registry.resolve(NetworkProfile::Test, Role::Vault).unwrap(), new);
        assert_eq!(registry.revision_label(second), Some("second"));

        // Superseded entries are kept for inspection
        let history: Vec<Address> = registry
            .history(NetworkProfile::Test, Role::Vault)
            .map(|entry| entry.address)
            .collect();
        assert_eq!(history, vec![old, new]);
    }

    #[test]
    fn test_superseding_does_not_leak_across_networks() {
        let new = address!("2222222222222222222222222222222222222222");

        let mut registry = AddressRegistry::builtin();
        registry.declare_revision("redeploy", [(NetworkProfile::Test, Role::Strategy, new)]);

        assert_eq!(registry.resolve(NetworkProfile::Test, Role::Strategy).unwrap(), new);
        assert_eq!(
            registry.resolve(NetworkProfile::Production, Role::Strategy).unwrap(),
            address!("656a0c3aC9900f74305FcC0338DCaD8A8DF4f9BF")
        );
    }

    #[test]
    fn test_zero_address_is_unresolved() {
        let mut registry = AddressRegistry::builtin();
        registry.declare_revision("retired", [(NetworkProfile::Test, Role::Vault, Address::ZERO)]);

        assert!(matches!(
            registry.resolve(NetworkProfile::Test, Role::Vault),
            Err(ScriptError::UnresolvedRole { .. })
        ));
    }

    #[test]
    fn test_overlay_accepts_aliases() {
        let mut registry = AddressRegistry::builtin();
        registry
            .apply_overlay(
                r#"{
                    "testnet": {
                        "usdt": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2",
                        "vfx": "0xddddddddddddddddddddddddddddddddddddddd4",
                        "payoutAgent": "0xccccccccccccccccccccccccccccccccccccccc3"
                    }
                }"#,
            )
            .unwrap();

        let slice = registry.slice(NetworkProfile::Test);
        assert_eq!(
            slice.resolve(Role::Asset).unwrap(),
            address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2")
        );
        assert_eq!(
            slice.resolve(Role::RewardToken).unwrap(),
            address!("ddddddddddddddddddddddddddddddddddddddd4")
        );
        assert_eq!(
            slice.resolve(Role::PayoutAgent).unwrap(),
            address!("ccccccccccccccccccccccccccccccccccccccc3")
        );

        // The production side is untouched
        assert!(registry.slice(NetworkProfile::Production).resolve(Role::PayoutAgent).is_err());
    }

    #[test]
    fn test_overlay_rejects_unknown_roles() {
        let mut registry = AddressRegistry::new();
        let res = registry.apply_overlay(r#"{"testnet": {"treasury": "0x0000000000000000000000000000000000000001"}}"#);

        assert!(matches!(res, Err(ScriptError::Config(_))));
    }
}
