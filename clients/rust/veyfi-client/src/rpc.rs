use crate::error::RpcError;
use alloy_primitives::{Address, Bytes, B256, U256, U64};
use alloy_sol_types::SolCall;
use log::debug;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// JSON-RPC code geth uses for `execution reverted`.
const REVERT_CODE: i64 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(rename = "data")]
    pub input: Bytes,
}

impl TransactionRequest {
    pub fn new(to: Address, input: Bytes) -> Self {
        Self {
            to,
            input,
            ..Default::default()
        }
    }

    pub fn call<C: SolCall>(to: Address, call: &C) -> Self {
        Self::new(to, call.abi_encode().into())
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<U64>,
    /// `0x1` on success, `0x0` on revert.
    pub status: Option<U64>,
    pub gas_used: Option<U256>,
}

impl TransactionReceipt {
    pub fn is_success(&self) -> bool {
        self.status == Some(U64::from(1))
    }
}

/// The chain operations the client needs. The connected wallet signs whatever
/// `send_transaction` submits.
pub trait ChainClient: Send + Sync {
    fn chain_id(&self) -> impl Future<Output = Result<u64, RpcError>> + Send;

    fn accounts(&self) -> impl Future<Output = Result<Vec<Address>, RpcError>> + Send;

    /// `eth_call` against the latest block.
    fn call(&self, tx: &TransactionRequest) -> impl Future<Output = Result<Bytes, RpcError>> + Send;

    fn send_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> impl Future<Output = Result<B256, RpcError>> + Send;

    fn transaction_receipt(
        &self,
        hash: B256,
    ) -> impl Future<Output = Result<Option<TransactionReceipt>, RpcError>> + Send;
}

impl<C: ChainClient> ChainClient for Arc<C> {
    fn chain_id(&self) -> impl Future<Output = Result<u64, RpcError>> + Send {
        (**self).chain_id()
    }

    fn accounts(&self) -> impl Future<Output = Result<Vec<Address>, RpcError>> + Send {
        (**self).accounts()
    }

    fn call(&self, tx: &TransactionRequest) -> impl Future<Output = Result<Bytes, RpcError>> + Send {
        (**self).call(tx)
    }

    fn send_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> impl Future<Output = Result<B256, RpcError>> + Send {
        (**self).send_transaction(tx)
    }

    fn transaction_receipt(
        &self,
        hash: B256,
    ) -> impl Future<Output = Result<Option<TransactionReceipt>, RpcError>> + Send {
        (**self).transaction_receipt(hash)
    }
}

#[derive(Deserialize, Debug)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize, Debug)]
struct JsonRpcError {
    code: i64,
    message: String,
    data: Option<Value>,
}

impl From<JsonRpcError> for RpcError {
    fn from(err: JsonRpcError) -> Self {
        if err.code == REVERT_CODE || err.message.contains("revert") {
            let data = err
                .data
                .and_then(|data| data.as_str().and_then(|hex| hex.parse::<Bytes>().ok()));
            RpcError::Reverted {
                message: err.message,
                data,
            }
        } else {
            RpcError::Rpc {
                code: err.code,
                message: err.message,
            }
        }
    }
}

/// JSON-RPC 2.0 client for a wallet-backed HTTP endpoint.
pub struct HttpChainClient {
    url: String,
    client: Client,
    next_id: AtomicU64,
}

impl HttpChainClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("rpc #{id} {method}");

        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params,
            }))
            .send()
            .await?;

        let response: JsonRpcResponse = check_status_code_and_deserialize(response).await?;
        if let Some(err) = response.error {
            return Err(err.into());
        }

        match response.result {
            Some(result) => Ok(serde_json::from_value(result)?),
            None => serde_json::from_value(Value::Null)
                .map_err(|_| RpcError::MissingResult(method.to_string())),
        }
    }
}

impl ChainClient for HttpChainClient {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.to())
    }

    async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.request("eth_accounts", json!([])).await
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, RpcError> {
        self.request("eth_call", json!([tx, "latest"])).await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, RpcError> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, RpcError> {
        self.request("eth_getTransactionReceipt", json!([hash])).await
    }
}

/// Typed `eth_call`. With `from` set this simulates a write as that account.
pub async fn call_contract<Cl: ChainClient, C: SolCall>(
    client: &Cl,
    to: Address,
    call: &C,
    from: Option<Address>,
) -> Result<C::Return, RpcError> {
    let mut request = TransactionRequest::call(to, call);
    request.from = from;
    let data = client.call(&request).await?;
    C::abi_decode_returns(&data, true).map_err(Into::into)
}

async fn check_is_success(response: Response) -> Result<Response, RpcError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RpcError::Http {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        });
    }
    Ok(response)
}

async fn check_status_code_and_deserialize<T: DeserializeOwned>(
    response: Response,
) -> Result<T, RpcError> {
    check_is_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_request_with_data_field() {
        let tx = TransactionRequest::new(
            address!("90c1f9220d90d3966FbeE24045EDd73E1d588aD5"),
            Bytes::from(vec![0xab, 0xcd]),
        )
        .with_value(U256::from(16u64));

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["data"], json!("0xabcd"));
        assert_eq!(value["value"], json!("0x10"));
        assert!(value.get("from").is_none());
    }

    #[test]
    fn maps_revert_errors() {
        let err: RpcError = JsonRpcError {
            code: REVERT_CODE,
            message: "execution reverted".to_string(),
            data: Some(json!("0x08c379a0")),
        }
        .into();
        assert!(err.is_revert());

        let err: RpcError = JsonRpcError {
            code: -32000,
            message: "insufficient funds".to_string(),
            data: None,
        }
        .into();
        assert!(!err.is_revert());
    }

    #[test]
    fn parses_receipt_status() {
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": format!("0x{}", "11".repeat(32)),
            "blockNumber": "0x10",
            "status": "0x1",
            "gasUsed": "0x5208",
        }))
        .unwrap();
        assert!(receipt.is_success());
    }
}
