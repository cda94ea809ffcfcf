//! The narrow interface through which the orchestrator touches the chain,
//! and its implementation on top of an alloy provider

use std::path::PathBuf;

use alloy::{
    dyn_abi::DynSolValue,
    network::{ReceiptResponse, TransactionBuilder},
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use tracing::{debug, info};

use crate::{
    errors::ScriptError,
    types::ContractKind,
    units::WiringCall,
    utils::read_artifact_bytecode,
};

/// A contract instance bound to an address
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundInstance {
    /// The contract
    pub kind: ContractKind,
    /// The address the contract lives at
    pub address: Address,
}

/// The parts of a transaction receipt reported to the operator
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// The transaction hash
    pub tx_hash: TxHash,
    /// The gas consumed by the transaction
    pub gas_used: u64,
    /// The fee paid for the transaction, in wei
    pub fee: U256,
}

impl From<&TransactionReceipt> for SubmissionReceipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            gas_used: receipt.gas_used,
            fee: U256::from(receipt.gas_used) * U256::from(receipt.effective_gas_price),
        }
    }
}

/// The operations the orchestrator issues against the chain.
///
/// Every method is awaited to completion before the next one is issued.
/// Implementations must not retry state-changing operations.
#[allow(async_fn_in_trait)]
pub trait TransactionSubmitter {
    /// Deploy a fresh instance of `kind` with the given constructor arguments
    async fn deploy(
        &self,
        kind: ContractKind,
        constructor_args: &[Address],
    ) -> Result<(Address, SubmissionReceipt), ScriptError>;

    /// Bind to an already deployed instance of `kind`
    async fn attach(&self, kind: ContractKind, address: Address)
        -> Result<BoundInstance, ScriptError>;

    /// Send a state-changing call to a bound instance
    async fn call(
        &self,
        instance: &BoundInstance,
        call: WiringCall,
        args: &[Address],
    ) -> Result<SubmissionReceipt, ScriptError>;

    /// The native balance of `address`
    async fn get_balance(&self, address: Address) -> Result<U256, ScriptError>;

    /// The latest block number
    async fn get_block_number(&self) -> Result<u64, ScriptError>;
}

/// A [`TransactionSubmitter`] sending transactions through an alloy provider
/// that signs with the deployer's key
pub struct ChainSubmitter {
    /// The signing provider
    provider: DynProvider,
    /// The directory holding the compiled contract artifacts
    artifacts_dir: PathBuf,
}

impl ChainSubmitter {
    /// Constructor
    pub fn new(provider: DynProvider, artifacts_dir: PathBuf) -> Self {
        Self {
            provider,
            artifacts_dir,
        }
    }

    /// Send a transaction and wait for a successful receipt
    async fn send(
        &self,
        kind: ContractKind,
        tx: TransactionRequest,
    ) -> Result<TransactionReceipt, ScriptError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::submission(kind, e))?;
        debug!("sent transaction {:#x}", pending.tx_hash());

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ScriptError::submission(kind, e))?;

        if !ReceiptResponse::status(&receipt) {
            return Err(ScriptError::submission(
                kind,
                format!("transaction {:#x} reverted", receipt.transaction_hash),
            ));
        }

        Ok(receipt)
    }
}

/// The creation code of a contract: its bytecode followed by the ABI-encoded
/// constructor arguments
pub fn init_code(bytecode: &[u8], constructor_args: &[Address]) -> Bytes {
    let encoded_args = DynSolValue::Tuple(
        constructor_args
            .iter()
            .copied()
            .map(DynSolValue::Address)
            .collect(),
    )
    .abi_encode_params();

    [bytecode, encoded_args.as_slice()].concat().into()
}

impl TransactionSubmitter for ChainSubmitter {
    async fn deploy(
        &self,
        kind: ContractKind,
        constructor_args: &[Address],
    ) -> Result<(Address, SubmissionReceipt), ScriptError> {
        let bytecode = read_artifact_bytecode(&self.artifacts_dir, kind)?;
        let tx = TransactionRequest::default()
            .with_deploy_code(init_code(&bytecode, constructor_args));

        let receipt = self.send(kind, tx).await?;
        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::submission(kind, "receipt does not contain a contract address")
        })?;
        info!("deployed {} at {:#x}", kind, address);

        Ok((address, SubmissionReceipt::from(&receipt)))
    }

    async fn attach(
        &self,
        kind: ContractKind,
        address: Address,
    ) -> Result<BoundInstance, ScriptError> {
        Ok(BoundInstance { kind, address })
    }

    async fn call(
        &self,
        instance: &BoundInstance,
        call: WiringCall,
        args: &[Address],
    ) -> Result<SubmissionReceipt, ScriptError> {
        let calldata = call.calldata(args)?;
        let tx = TransactionRequest::default()
            .with_to(instance.address)
            .with_input(calldata);

        let receipt = self.send(instance.kind, tx).await?;
        Ok(SubmissionReceipt::from(&receipt))
    }

    async fn get_balance(&self, address: Address) -> Result<U256, ScriptError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ScriptError::ChainRead(e.to_string()))
    }

    async fn get_block_number(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ScriptError::ChainRead(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use alloy::{
        providers::{DynProvider, ProviderBuilder},
        transports::http::reqwest::Url,
    };
    use alloy_primitives::{address, Address};

    use super::{init_code, ChainSubmitter, TransactionSubmitter};
    use crate::errors::ScriptError;

    const STRATEGY: Address = address!("656a0c3aC9900f74305FcC0338DCaD8A8DF4f9BF");
    const ASSET: Address = address!("55d398326f99059fF775485246999027B3197955");
    const PAYOUT_AGENT: Address = address!("ccccccccccccccccccccccccccccccccccccccc3");

    /// A submitter whose endpoint refuses connections
    fn unreachable_submitter() -> ChainSubmitter {
        let url = Url::parse("http://127.0.0.1:1").unwrap();
        let provider = DynProvider::new(ProviderBuilder::new().connect_http(url));
        ChainSubmitter::new(provider, PathBuf::from("artifacts/contracts"))
    }

    #[test]
    fn test_init_code_appends_vault_constructor_args() {
        let bytecode = [0x60, 0x80, 0x60, 0x40, 0x52];
        let code = init_code(&bytecode, &[STRATEGY, ASSET, PAYOUT_AGENT]);

        assert_eq!(code.len(), bytecode.len() + 3 * 32);
        assert_eq!(&code[..bytecode.len()], &bytecode[..]);

        // Each address is left padded to a full word, in declaration order
        let words: Vec<&[u8]> = code[bytecode.len()..].chunks(32).collect();
        for (word, expected) in words.iter().zip([STRATEGY, ASSET, PAYOUT_AGENT]) {
            assert_eq!(&word[..12], &[0u8; 12][..]);
            assert_eq!(&word[12..], expected.as_slice());
        }
    }

    #[test]
    fn test_init_code_without_args() {
        let code = init_code(&[0x60, 0x01], &[]);
        assert_eq!(code.to_vec(), vec![0x60, 0x01]);
    }

    #[tokio::test]
    async fn test_failed_reads_are_chain_read_errors() {
        let submitter = unreachable_submitter();

        let block = submitter.get_block_number().await;
        assert!(matches!(block, Err(ScriptError::ChainRead(_))));

        let balance = submitter.get_balance(STRATEGY).await;
        assert!(matches!(balance, Err(ScriptError::ChainRead(_))));
    }
}
