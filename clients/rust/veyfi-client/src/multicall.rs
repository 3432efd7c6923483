//! Batched reads through Multicall3 `aggregate3`.
//!
//! Every call is sent with `allowFailure = true`, so one failing read does not
//! take the others down with it. Results come back in insertion order.

use crate::{
    abi::IMulticall3::{aggregate3Call, Call3, CallResult},
    error::RpcError,
    rpc::{ChainClient, TransactionRequest},
};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use log::debug;
use std::vec::IntoIter;

#[derive(Default, Clone)]
pub struct Multicall {
    calls: Vec<Call3>,
}

impl Multicall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<C: SolCall>(&mut self, target: Address, call: &C) -> &mut Self {
        self.calls.push(Call3 {
            target,
            allowFailure: true,
            callData: call.abi_encode().into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Fails as a whole only when the aggregate call itself cannot be made.
    pub async fn call<Cl: ChainClient>(
        self,
        client: &Cl,
        multicall: Address,
    ) -> Result<BatchResults, RpcError> {
        if self.calls.is_empty() {
            return Ok(BatchResults::default());
        }

        debug!("multicall with {} reads", self.calls.len());
        let request = TransactionRequest::call(multicall, &aggregate3Call { calls: self.calls });
        let data = client.call(&request).await?;
        let decoded = aggregate3Call::abi_decode_returns(&data, true)?;

        Ok(BatchResults {
            results: decoded
                .returnData
                .into_iter()
                .map(|CallResult { success, returnData }| {
                    if success {
                        Ok(returnData)
                    } else {
                        Err(RpcError::Reverted {
                            message: "call failed inside multicall".to_string(),
                            data: Some(returnData),
                        })
                    }
                })
                .collect::<Vec<_>>()
                .into_iter(),
        })
    }
}

/// Per-item outcome of a batch, consumed in the order the calls were added.
#[derive(Debug, Default)]
pub struct BatchResults {
    results: IntoIter<Result<Bytes, RpcError>>,
}

impl BatchResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.len() == 0
    }

    pub fn next_raw(&mut self) -> Result<Bytes, RpcError> {
        self.results
            .next()
            .unwrap_or_else(|| Err(RpcError::MissingResult("multicall item".to_string())))
    }

    /// Decodes the next item as the return of `C`.
    pub fn decode<C: SolCall>(&mut self) -> Result<C::Return, RpcError> {
        let data = self.next_raw()?;
        C::abi_decode_returns(&data, true).map_err(Into::into)
    }
}
