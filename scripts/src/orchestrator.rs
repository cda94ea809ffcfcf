//! Sequencing of a deployment run.
//!
//! A run happens in two phases. Planning validates the whole run against the
//! registry without touching the chain: every role a unit or wiring needs is
//! resolved, and every reference to another unit's output is checked to point
//! backwards in the sequence. Execution then processes the units strictly in
//! declared order, one submission at a time, followed by the wirings.
//!
//! Nothing is retried and nothing is rolled back. On failure the caller gets
//! the error together with the report of everything that completed.

use std::fmt::{self, Display};

use alloy_primitives::Address;
use itertools::Itertools;
use tracing::{error, info, warn};

use crate::{
    errors::ScriptError,
    registry::RegistrySlice,
    report::{DeployedInstance, DeploymentReport, InstanceOrigin, WiringRecord},
    submitter::{BoundInstance, TransactionSubmitter},
    types::{ContractKind, NetworkProfile},
    units::{DeploymentUnit, UnitInput, WiringAction},
};

/// A failed run: the error that stopped it and the report of what completed
#[derive(Debug)]
pub struct DeploymentFailure {
    /// The error that aborted the run
    pub error: ScriptError,
    /// The steps completed before the failure
    pub report: DeploymentReport,
}

impl DeploymentFailure {
    /// The unit or wiring target that was being processed when the run failed
    pub fn failed_kind(&self) -> Option<ContractKind> {
        match &self.error {
            ScriptError::DeploymentSubmission { kind, .. } => Some(*kind),
            ScriptError::ForwardReference { unit, .. } => Some(*unit),
            ScriptError::DanglingWiringReference { target } => Some(*target),
            ScriptError::DuplicateUnit(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl Display for DeploymentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deployment aborted: {}", self.error)
    }
}

impl std::error::Error for DeploymentFailure {}

/// An argument whose registry lookup has already happened
#[derive(Copy, Clone, Debug)]
enum PlannedInput {
    /// A registry address
    Address(Address),
    /// The output of an earlier unit
    Output(ContractKind),
}

/// A unit validated against the registry
struct PlannedUnit<'u> {
    /// The declared unit
    unit: &'u DeploymentUnit,
    /// The constructor arguments, for units that deploy
    args: Vec<PlannedInput>,
    /// The address to attach to, for units that do not deploy
    existing: Option<Address>,
}

/// A wiring validated against the registry and the declared units
struct PlannedWiring<'w> {
    /// The declared wiring
    action: &'w WiringAction,
    /// The call arguments
    args: Vec<PlannedInput>,
}

/// A fully validated run
struct Plan<'a> {
    /// The units, in execution order
    units: Vec<PlannedUnit<'a>>,
    /// The wirings, in execution order
    wirings: Vec<PlannedWiring<'a>>,
}

/// Executes deployment units and wirings against a [`TransactionSubmitter`]
pub struct DeploymentOrchestrator<'a, S> {
    /// The chain collaborator
    submitter: &'a S,
    /// The addresses of the active network
    registry: RegistrySlice<'a>,
}

impl<'a, S: TransactionSubmitter> DeploymentOrchestrator<'a, S> {
    /// Constructor
    pub fn new(submitter: &'a S, registry: RegistrySlice<'a>) -> Self {
        Self {
            submitter,
            registry,
        }
    }

    /// The network this orchestrator deploys to
    pub fn profile(&self) -> NetworkProfile {
        self.registry.profile()
    }

    /// Deploy or attach `units` in order, then execute `wirings` in order,
    /// signing as `deployer`
    pub async fn run(
        &self,
        deployer: Address,
        units: &[DeploymentUnit],
        wirings: &[WiringAction],
    ) -> Result<DeploymentReport, DeploymentFailure> {
        let mut report = DeploymentReport::new(self.profile(), deployer);

        let plan = match self.plan(units, wirings) {
            Ok(plan) => plan,
            Err(error) => return Err(DeploymentFailure { error, report }),
        };

        match self.execute(&plan, &mut report).await {
            Ok(()) => Ok(report),
            Err(error) => {
                error!("deployment aborted: {}", error);
                if report.balance_before.is_some() {
                    match self.submitter.get_balance(deployer).await {
                        Ok(balance) => report.balance_after = Some(balance),
                        Err(e) => warn!("could not read final balance: {}", e),
                    }
                }
                Err(DeploymentFailure { error, report })
            }
        }
    }

    // ------------
    // | Planning |
    // ------------

    /// Validate the run without issuing any call to the chain
    fn plan<'u>(
        &self,
        units: &'u [DeploymentUnit],
        wirings: &'u [WiringAction],
    ) -> Result<Plan<'u>, ScriptError> {
        let mut declared: Vec<ContractKind> = Vec::with_capacity(units.len());
        let mut planned_units = Vec::with_capacity(units.len());

        for unit in units {
            if declared.contains(&unit.kind) {
                return Err(ScriptError::DuplicateUnit(unit.kind));
            }

            let (args, existing) = if unit.redeploy {
                let args = self.plan_inputs(&unit.constructor_args, &declared, |missing| {
                    ScriptError::ForwardReference {
                        unit: unit.kind,
                        missing,
                    }
                })?;
                (args, None)
            } else {
                (Vec::new(), Some(self.registry.resolve(unit.existing_role())?))
            };

            planned_units.push(PlannedUnit {
                unit,
                args,
                existing,
            });
            declared.push(unit.kind);
        }

        let mut planned_wirings = Vec::with_capacity(wirings.len());
        for action in wirings {
            if !declared.contains(&action.target) {
                return Err(ScriptError::DanglingWiringReference {
                    target: action.target,
                });
            }

            let args = self.plan_inputs(&action.args, &declared, |target| {
                ScriptError::DanglingWiringReference { target }
            })?;
            planned_wirings.push(PlannedWiring { action, args });
        }

        Ok(Plan {
            units: planned_units,
            wirings: planned_wirings,
        })
    }

    /// Resolve registry inputs and check that output inputs refer to a unit in `available`
    fn plan_inputs(
        &self,
        inputs: &[UnitInput],
        available: &[ContractKind],
        on_missing: impl Fn(ContractKind) -> ScriptError,
    ) -> Result<Vec<PlannedInput>, ScriptError> {
        inputs
            .iter()
            .map(|input| match *input {
                UnitInput::Registry(role) => self.registry.resolve(role).map(PlannedInput::Address),
                UnitInput::Output(kind) if available.contains(&kind) => {
                    Ok(PlannedInput::Output(kind))
                }
                UnitInput::Output(kind) => Err(on_missing(kind)),
            })
            .collect()
    }

    // -------------
    // | Execution |
    // -------------

    /// Execute a validated plan, recording each completed step in `report`
    async fn execute(
        &self,
        plan: &Plan<'_>,
        report: &mut DeploymentReport,
    ) -> Result<(), ScriptError> {
        let balance = self.submitter.get_balance(report.deployer).await?;
        report.balance_before = Some(balance);
        report.start_block = Some(self.submitter.get_block_number().await?);
        info!(
            "deploying to {} as {} (balance {})",
            report.profile, report.deployer, balance
        );

        for planned in &plan.units {
            let instance = self.execute_unit(planned, report).await?;
            info!("{}: {} at {}", instance.kind, instance.origin, instance.address);
            report.instances.push(instance);
        }

        for wiring in &plan.wirings {
            let record = self.execute_wiring(wiring, report).await?;
            info!("wired {}", record.action);
            report.wirings.push(record);
        }

        report.balance_after = Some(self.submitter.get_balance(report.deployer).await?);
        Ok(())
    }

    /// Deploy or attach a single unit
    async fn execute_unit(
        &self,
        planned: &PlannedUnit<'_>,
        report: &DeploymentReport,
    ) -> Result<DeployedInstance, ScriptError> {
        let kind = planned.unit.kind;

        if planned.unit.redeploy {
            let args = resolve_inputs(&planned.args, report, |missing| {
                ScriptError::ForwardReference {
                    unit: kind,
                    missing,
                }
            })?;
            info!("deploying {} with [{}]", kind, args.iter().join(", "));

            let (address, receipt) = self
                .submitter
                .deploy(kind, &args)
                .await
                .map_err(|e| attribute(kind, e))?;

            Ok(DeployedInstance {
                kind,
                address,
                origin: InstanceOrigin::Deployed,
                receipt: Some(receipt),
            })
        } else {
            let existing = planned.existing.ok_or(ScriptError::UnresolvedRole {
                profile: report.profile,
                role: planned.unit.existing_role(),
            })?;

            let bound = self
                .submitter
                .attach(kind, existing)
                .await
                .map_err(|e| attribute(kind, e))?;

            Ok(DeployedInstance {
                kind,
                address: bound.address,
                origin: InstanceOrigin::Attached,
                receipt: None,
            })
        }
    }

    /// Execute a single wiring call against an instance produced earlier in the run
    async fn execute_wiring(
        &self,
        wiring: &PlannedWiring<'_>,
        report: &DeploymentReport,
    ) -> Result<WiringRecord, ScriptError> {
        let target = wiring.action.target;
        let instance = report
            .instance(target)
            .ok_or(ScriptError::DanglingWiringReference { target })?;
        let args = resolve_inputs(&wiring.args, report, |target| {
            ScriptError::DanglingWiringReference { target }
        })?;

        let bound = BoundInstance {
            kind: instance.kind,
            address: instance.address,
        };
        let receipt = self
            .submitter
            .call(&bound, wiring.action.call, &args)
            .await
            .map_err(|e| attribute(target, e))?;

        Ok(WiringRecord {
            action: wiring.action.clone(),
            receipt,
        })
    }
}

/// Substitute the outputs of earlier units into a list of planned inputs
fn resolve_inputs(
    inputs: &[PlannedInput],
    report: &DeploymentReport,
    on_missing: impl Fn(ContractKind) -> ScriptError,
) -> Result<Vec<Address>, ScriptError> {
    inputs
        .iter()
        .map(|input| match *input {
            PlannedInput::Address(address) => Ok(address),
            PlannedInput::Output(kind) => report
                .instance(kind)
                .map(|instance| instance.address)
                .ok_or_else(|| on_missing(kind)),
        })
        .collect()
}

/// Attribute a collaborator failure to the unit being processed
fn attribute(kind: ContractKind, err: ScriptError) -> ScriptError {
    match err {
        err @ ScriptError::DeploymentSubmission { .. } => err,
        err => ScriptError::submission(kind, err),
    }
}
