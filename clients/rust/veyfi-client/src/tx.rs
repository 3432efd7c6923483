use crate::{
    config::TxMode,
    connection::Connection,
    error::{RpcError, TxError},
    rpc::{ChainClient, TransactionReceipt, TransactionRequest},
    status::{StatusReporter, TxStatus},
};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use log::{info, warn};
use std::time::Duration;

/// A single state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractWrite {
    pub address: Address,
    pub input: Bytes,
    pub value: Option<U256>,
    pub label: &'static str,
}

impl ContractWrite {
    pub fn new<C: SolCall>(address: Address, call: &C) -> Self {
        Self {
            address,
            input: call.abi_encode().into(),
            value: None,
            label: C::SIGNATURE,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    fn request(&self, from: Address) -> TransactionRequest {
        let request = TransactionRequest::new(self.address, self.input.clone()).with_from(from);
        match self.value {
            Some(value) => request.with_value(value),
            None => request,
        }
    }
}

#[derive(Debug)]
pub struct TxResponse {
    pub is_successful: bool,
    /// `None` for dry runs and for failures before submission.
    pub hash: Option<B256>,
    pub error: Option<TxError>,
}

impl TxResponse {
    pub fn success(hash: Option<B256>) -> Self {
        Self {
            is_successful: true,
            hash,
            error: None,
        }
    }

    pub fn failure(error: TxError) -> Self {
        Self {
            is_successful: false,
            hash: None,
            error: Some(error),
        }
    }
}

/// Runs one write through pending, then success or error, then idle.
/// Failures are captured in the response, never retried.
pub async fn handle_tx<C: ChainClient>(
    connection: &Connection<C>,
    chain_id: u64,
    write: ContractWrite,
    status: &StatusReporter,
) -> TxResponse {
    let response = handle_tx_step(connection, chain_id, write, status).await;
    status.report(TxStatus::idle());
    response
}

/// Same as [`handle_tx`] but leaves the status at success or error, for a
/// write that is followed by another one in the same action.
pub(crate) async fn handle_tx_step<C: ChainClient>(
    connection: &Connection<C>,
    chain_id: u64,
    write: ContractWrite,
    status: &StatusReporter,
) -> TxResponse {
    status.report(TxStatus::pending());

    match submit(connection, chain_id, &write).await {
        Ok(hash) => {
            status.report(TxStatus::success());
            TxResponse::success(hash)
        }
        Err(err) => {
            warn!("{} failed: {err}", write.label);
            status.report(TxStatus::error());
            TxResponse::failure(err)
        }
    }
}

async fn submit<C: ChainClient>(
    connection: &Connection<C>,
    chain_id: u64,
    write: &ContractWrite,
) -> Result<Option<B256>, TxError> {
    let client = connection.client();

    let actual = client.chain_id().await?;
    if actual != chain_id {
        return Err(TxError::WrongChain {
            expected: chain_id,
            actual,
        });
    }

    let request = write.request(connection.account());
    client.call(&request).await?;

    if connection.mode() == TxMode::DryRun {
        info!("dry run: {} on {} simulated", write.label, write.address);
        return Ok(None);
    }

    let hash = client.send_transaction(&request).await?;
    info!("{} sent: {hash}", write.label);

    let settings = connection.settings();
    let receipt = wait_for_receipt(
        client,
        hash,
        settings.receipt_poll_interval,
        settings.receipt_timeout,
    )
    .await?;

    if !receipt.is_success() {
        return Err(TxError::Reverted(hash));
    }

    info!("{} confirmed in block {:?}", write.label, receipt.block_number);
    Ok(Some(hash))
}

pub async fn wait_for_receipt<C: ChainClient>(
    client: &C,
    hash: B256,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<TransactionReceipt, TxError> {
    let poll = async {
        loop {
            if let Some(receipt) = client.transaction_receipt(hash).await? {
                return Ok::<_, RpcError>(receipt);
            }
            tokio::time::sleep(poll_interval).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| TxError::Timeout(hash))?
        .map_err(Into::into)
}
