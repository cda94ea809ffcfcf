//! Scripts for deploying and wiring the farm contracts: the strategy, the
//! vault, the payout agent and the standalone vault variant.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod constants;
pub mod errors;
pub mod identity;
pub mod network;
pub mod orchestrator;
pub mod registry;
pub mod report;
mod solidity;
pub mod submitter;
pub mod types;
pub mod units;
pub mod utils;
