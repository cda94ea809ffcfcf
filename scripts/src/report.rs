//! The record of a deployment run, as reported to the operator

use std::fmt::{self, Display};

use alloy_primitives::{Address, I256, U256};
use chrono::{DateTime, Local};

use crate::{
    submitter::SubmissionReceipt,
    types::{ContractKind, NetworkProfile},
    units::WiringAction,
    utils::{balance_delta, format_signed_wei, format_wei},
};

/// How an instance came to be part of the run
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InstanceOrigin {
    /// Bound to an already deployed contract
    Attached,
    /// Freshly deployed in this run
    Deployed,
}

impl Display for InstanceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceOrigin::Attached => write!(f, "attached"),
            InstanceOrigin::Deployed => write!(f, "deployed"),
        }
    }
}

/// A contract instance produced by a unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedInstance {
    /// The contract
    pub kind: ContractKind,
    /// The address of the instance
    pub address: Address,
    /// Whether the instance was attached to or deployed
    pub origin: InstanceOrigin,
    /// The deployment receipt, for deployed instances
    pub receipt: Option<SubmissionReceipt>,
}

/// A wiring call that was executed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WiringRecord {
    /// The declared action
    pub action: WiringAction,
    /// The receipt of the call
    pub receipt: SubmissionReceipt,
}

/// The outcome of a deployment run. A report attached to a failure holds
/// exactly the steps that completed before it.
#[derive(Clone, Debug)]
pub struct DeploymentReport {
    /// When the run started
    pub timestamp: DateTime<Local>,
    /// The network deployed to
    pub profile: NetworkProfile,
    /// The account that signed the transactions
    pub deployer: Address,
    /// The block number at the start of the run
    pub start_block: Option<u64>,
    /// The deployer's balance at the start of the run
    pub balance_before: Option<U256>,
    /// The deployer's balance at the end of the run
    pub balance_after: Option<U256>,
    /// The instances produced, in execution order
    pub instances: Vec<DeployedInstance>,
    /// The wiring calls executed, in execution order
    pub wirings: Vec<WiringRecord>,
}

impl DeploymentReport {
    /// An empty report for a run starting now
    pub fn new(profile: NetworkProfile, deployer: Address) -> Self {
        Self {
            timestamp: Local::now(),
            profile,
            deployer,
            start_block: None,
            balance_before: None,
            balance_after: None,
            instances: Vec::new(),
            wirings: Vec::new(),
        }
    }

    /// The instance produced for `kind`, if any
    pub fn instance(&self, kind: ContractKind) -> Option<&DeployedInstance> {
        self.instances.iter().find(|instance| instance.kind == kind)
    }

    /// The amount the deployer's balance decreased over the run
    pub fn cost(&self) -> Option<I256> {
        Some(balance_delta(self.balance_before?, self.balance_after?))
    }

    /// The sum of the fees of every receipt in the run
    pub fn receipt_fees(&self) -> U256 {
        let deploy_fees = self
            .instances
            .iter()
            .filter_map(|instance| instance.receipt.as_ref())
            .map(|receipt| receipt.fee);
        let wiring_fees = self.wirings.iter().map(|wiring| wiring.receipt.fee);

        deploy_fees.chain(wiring_fees).fold(U256::ZERO, |acc, fee| acc + fee)
    }
}

/// Write an optional balance line
fn fmt_balance(f: &mut fmt::Formatter<'_>, label: &str, balance: Option<U256>) -> fmt::Result {
    match balance {
        Some(balance) => writeln!(f, "  {:<16}{}", label, format_wei(balance)),
        None => writeln!(f, "  {:<16}unknown", label),
    }
}

impl Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deployment report")?;
        writeln!(f, "  {:<16}{}", "time:", self.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "  {:<16}{}", "network:", self.profile)?;
        writeln!(f, "  {:<16}{}", "deployer:", self.deployer)?;
        if let Some(block) = self.start_block {
            writeln!(f, "  {:<16}{}", "start block:", block)?;
        }
        fmt_balance(f, "balance before:", self.balance_before)?;
        fmt_balance(f, "balance after:", self.balance_after)?;

        writeln!(f, "  contracts:")?;
        if self.instances.is_empty() {
            writeln!(f, "    (none)")?;
        }
        for instance in &self.instances {
            write!(
                f,
                "    {:<12} {:<9} {}",
                instance.kind.to_string(),
                instance.origin.to_string(),
                instance.address
            )?;
            if let Some(receipt) = &instance.receipt {
                write!(f, "  tx {:#x}, gas {}", receipt.tx_hash, receipt.gas_used)?;
            }
            writeln!(f)?;
        }

        if !self.wirings.is_empty() {
            writeln!(f, "  wirings:")?;
            for wiring in &self.wirings {
                writeln!(f, "    {}  tx {:#x}", wiring.action, wiring.receipt.tx_hash)?;
            }
        }

        match self.cost() {
            Some(cost) => writeln!(f, "  {:<16}{}", "deployed cost:", format_signed_wei(cost))?,
            None => writeln!(f, "  {:<16}unknown", "deployed cost:")?,
        }
        write!(f, "  {:<16}{}", "receipt fees:", format_wei(self.receipt_fees()))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address, I256, U256};

    use super::{DeployedInstance, DeploymentReport, InstanceOrigin, WiringRecord};
    use crate::{
        submitter::SubmissionReceipt,
        types::{ContractKind, NetworkProfile},
        units::{UnitInput, WiringAction},
    };

    const DEPLOYER: Address = address!("647BB910944165D14b961985c28b06b08cA47f77");
    const STRATEGY: Address = address!("656a0c3aC9900f74305FcC0338DCaD8A8DF4f9BF");
    const VAULT: Address = address!("1111111111111111111111111111111111111111");

    fn sample_report() -> DeploymentReport {
        let mut report = DeploymentReport::new(NetworkProfile::Test, DEPLOYER);
        report.start_block = Some(42);
        report.balance_before = Some(U256::from(1_000_000u64));
        report.balance_after = Some(U256::from(400_000u64));
        report.instances = vec![
            DeployedInstance {
                kind: ContractKind::Strategy,
                address: STRATEGY,
                origin: InstanceOrigin::Attached,
                receipt: None,
            },
            DeployedInstance {
                kind: ContractKind::Vault,
                address: VAULT,
                origin: InstanceOrigin::Deployed,
                receipt: Some(SubmissionReceipt {
                    gas_used: 500,
                    fee: U256::from(500_000u64),
                    ..Default::default()
                }),
            },
        ];
        report.wirings = vec![WiringRecord {
            action: WiringAction::set_vault(UnitInput::Output(ContractKind::Vault)),
            receipt: SubmissionReceipt {
                gas_used: 100,
                fee: U256::from(100_000u64),
                ..Default::default()
            },
        }];

        report
    }

    #[test]
    fn test_cost_and_fees() {
        let report = sample_report();

        assert_eq!(report.cost(), Some(I256::try_from(600_000i64).unwrap()));
        assert_eq!(report.receipt_fees(), U256::from(600_000u64));
        assert_eq!(report.instance(ContractKind::Vault).unwrap().address, VAULT);
        assert!(report.instance(ContractKind::PayoutAgent).is_none());
    }

    #[test]
    fn test_cost_unknown_without_balances() {
        let mut report = sample_report();
        report.balance_after = None;

        assert_eq!(report.cost(), None);
        assert!(report.to_string().contains("deployed cost:  unknown"));
    }

    #[test]
    fn test_display_lists_contracts() {
        let rendered = sample_report().to_string();

        assert!(rendered.contains("network:        testnet"));
        assert!(rendered.contains(&format!("deployer:       {}", DEPLOYER)));
        assert!(rendered.contains(&format!("Strategy     attached  {}", STRATEGY)));
        assert!(rendered.contains(&format!("PulseVault   deployed  {}", VAULT)));
        assert!(rendered.contains("Strategy.setVault(PulseVault@run)"));
        assert!(rendered.contains("deployed cost:  0.000000000000600000 (600000 wei)"));
    }
}
