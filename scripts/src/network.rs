//! Selection of the active network and its configuration

use alloy::transports::http::reqwest::Url;
use tracing::warn;

use crate::{
    constants::{PRODUCTION_NETWORK_SIGNAL, TEST_NETWORK_SIGNAL, URL_MAIN_ENV_VAR, URL_TEST_ENV_VAR},
    errors::ScriptError,
    registry::{AddressRegistry, RegistrySlice},
    types::NetworkProfile,
};

/// The active network, its RPC endpoint and its addresses
#[derive(Clone, Debug)]
pub struct NetworkContext {
    /// The network selected for this run
    profile: NetworkProfile,
    /// The production RPC url
    main_url: Option<Url>,
    /// The test network RPC url
    test_url: Option<Url>,
    /// The registry of known addresses
    registry: AddressRegistry,
}

impl NetworkContext {
    /// Build the context from the raw network signal
    pub fn new(
        signal: Option<&str>,
        main_url: Option<Url>,
        test_url: Option<Url>,
        registry: AddressRegistry,
    ) -> Self {
        Self {
            profile: profile_from_signal(signal),
            main_url,
            test_url,
            registry,
        }
    }

    /// The network selected for this run
    pub fn current(&self) -> NetworkProfile {
        self.profile
    }

    /// The RPC endpoint of the active network
    pub fn endpoint(&self) -> Result<&Url, ScriptError> {
        let (url, var) = match self.profile {
            NetworkProfile::Production => (self.main_url.as_ref(), URL_MAIN_ENV_VAR),
            NetworkProfile::Test => (self.test_url.as_ref(), URL_TEST_ENV_VAR),
        };

        url.ok_or_else(|| {
            ScriptError::Config(format!("no RPC url configured for {} (set {})", self.profile, var))
        })
    }

    /// The registry restricted to the active network
    pub fn registry_slice(&self) -> RegistrySlice<'_> {
        self.registry.slice(self.profile)
    }
}

/// Interpret the network signal.
///
/// Only `mainnet` selects the production network. An absent signal selects
/// the test network, as does any value that is not recognized.
pub fn profile_from_signal(signal: Option<&str>) -> NetworkProfile {
    let Some(signal) = signal.map(str::trim) else {
        return NetworkProfile::Test;
    };

    if signal.eq_ignore_ascii_case(PRODUCTION_NETWORK_SIGNAL) {
        NetworkProfile::Production
    } else {
        if !signal.eq_ignore_ascii_case(TEST_NETWORK_SIGNAL) {
            warn!("unrecognized network `{}`, falling back to {}", signal, NetworkProfile::Test);
        }
        NetworkProfile::Test
    }
}

#[cfg(test)]
mod tests {
    use alloy::transports::http::reqwest::Url;

    use super::{profile_from_signal, NetworkContext};
    use crate::{errors::ScriptError, registry::AddressRegistry, types::NetworkProfile};

    #[test]
    fn test_signal_parsing() {
        assert_eq!(profile_from_signal(Some("mainnet")), NetworkProfile::Production);
        assert_eq!(profile_from_signal(Some(" MAINNET ")), NetworkProfile::Production);
        assert_eq!(profile_from_signal(Some("testnet")), NetworkProfile::Test);
        assert_eq!(profile_from_signal(None), NetworkProfile::Test);
        assert_eq!(profile_from_signal(Some("")), NetworkProfile::Test);
        assert_eq!(profile_from_signal(Some("main-net")), NetworkProfile::Test);
    }

    #[test]
    fn test_endpoint_follows_profile() {
        let main = Url::parse("https://bsc-dataseed.binance.org").unwrap();
        let test = Url::parse("https://data-seed-prebsc-1-s1.binance.org:8545").unwrap();

        let ctx = NetworkContext::new(
            Some("mainnet"),
            Some(main.clone()),
            Some(test.clone()),
            AddressRegistry::builtin(),
        );
        assert_eq!(ctx.endpoint().unwrap(), &main);
        assert_eq!(ctx.registry_slice().profile(), NetworkProfile::Production);

        let ctx = NetworkContext::new(None, Some(main), Some(test.clone()), AddressRegistry::builtin());
        assert_eq!(ctx.endpoint().unwrap(), &test);
        assert_eq!(ctx.registry_slice().profile(), NetworkProfile::Test);
    }

    #[test]
    fn test_missing_endpoint() {
        let ctx = NetworkContext::new(Some("testnet"), None, None, AddressRegistry::builtin());
        assert!(matches!(ctx.endpoint(), Err(ScriptError::Config(_))));
    }
}
