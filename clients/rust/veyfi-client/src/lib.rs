pub mod abi;
pub mod actions;
pub mod config;
pub mod connection;
pub mod error;
pub mod multicall;
pub mod rpc;
pub mod services;
pub mod status;
pub mod tx;

pub mod prelude {
    pub use crate::actions::{execute, Action, ActionRequest};
    pub use crate::config::{ClientSettings, Deployment, TxMode};
    pub use crate::connection::Connection;
    pub use crate::error::{PreconditionError, RpcError, TxError};
    pub use crate::rpc::{ChainClient, HttpChainClient, TransactionRequest};
    pub use crate::status::{StatusReporter, TxStatus};
    pub use crate::tx::TxResponse;
}
