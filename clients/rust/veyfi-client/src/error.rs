use alloy_primitives::{Address, Bytes, B256, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC endpoint answered with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Execution reverted: {message}")]
    Reverted {
        message: String,
        data: Option<Bytes>,
    },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("No result returned for {0}")]
    MissingResult(String),

    #[error("Wallet exposes no account")]
    NoAccount,
}

impl RpcError {
    pub fn is_revert(&self) -> bool {
        matches!(self, RpcError::Reverted { .. })
    }
}

impl From<alloy_sol_types::Error> for RpcError {
    fn from(err: alloy_sol_types::Error) -> Self {
        RpcError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Decode(err.to_string())
    }
}

/// Contract violations caught before anything is sent to the chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("No connector")]
    MissingConnection,

    #[error("Invalid address for {field}: {address}")]
    InvalidAddress {
        field: &'static str,
        address: Address,
    },

    #[error("{0} is 0")]
    Zero(&'static str),
}

/// A transaction that was attempted but did not go through.
#[derive(Error, Debug)]
pub enum TxError {
    #[error("Wallet is connected to chain {actual}, expected {expected}")]
    WrongChain { expected: u64, actual: u64 },

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Transaction {0} reverted")]
    Reverted(B256),

    #[error("Timed out waiting for transaction {0}")]
    Timeout(B256),

    #[error("Tokens are not yet unlocked (penalty {0})")]
    NotUnlocked(U256),
}
