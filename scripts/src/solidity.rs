//! Definitions of Solidity functions called during deployment

use alloy_sol_types::sol;

sol! {
    /// The post-deployment linking surface of the strategy
    interface IStrategy {
        function setVault(address vault) external;
    }
}
