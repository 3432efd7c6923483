use alloy_primitives::{Address, Bytes, B256, U256, U64};
use alloy_sol_types::{SolCall, SolValue};
use log::debug;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use veyfi_client::{
    abi::IMulticall3::{aggregate3Call, CallResult},
    error::RpcError,
    rpc::{ChainClient, TransactionReceipt, TransactionRequest},
};
use veyfitypecrate::constants::{MULTICALL3_ADDRESS, VEYFI_CHAIN_ID};

type Selector = [u8; 4];
type Handler = Arc<dyn Fn(&[u8], Option<Address>) -> Result<Vec<u8>, RpcError> + Send + Sync>;
type SentHook = Arc<dyn Fn(&[u8], Option<Address>) + Send + Sync>;

struct ChainState {
    chain_id: u64,
    accounts: Vec<Address>,
    handlers: HashMap<(Address, Selector), Handler>,
    /// State changes applied when a transaction is mined.
    sent_hooks: HashMap<(Address, Selector), SentHook>,
    calls: Vec<TransactionRequest>,
    sent: Vec<TransactionRequest>,
    receipt_success: bool,
    /// Receipt polls answered with `null` before a receipt shows up.
    receipt_delay: u32,
    receipt_polls: HashMap<B256, u32>,
    offline: bool,
}

/// In-memory chain. Contract behavior is installed per (address, selector);
/// calls to the Multicall3 address are fanned out to those handlers.
pub struct MockChain {
    state: Mutex<ChainState>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChainState {
                chain_id: VEYFI_CHAIN_ID,
                accounts: vec![],
                handlers: HashMap::new(),
                sent_hooks: HashMap::new(),
                calls: vec![],
                sent: vec![],
                receipt_success: true,
                receipt_delay: 0,
                receipt_polls: HashMap::new(),
                offline: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.state().chain_id = chain_id;
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state().accounts = accounts;
    }

    /// Mined transactions revert from now on.
    pub fn set_receipt_success(&self, success: bool) {
        self.state().receipt_success = success;
    }

    pub fn set_receipt_delay(&self, polls: u32) {
        self.state().receipt_delay = polls;
    }

    /// Every `eth_call` fails at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    pub fn on_raw(
        &self,
        address: Address,
        selector: Selector,
        handler: impl Fn(&[u8], Option<Address>) -> Result<Vec<u8>, RpcError> + Send + Sync + 'static,
    ) {
        self.state()
            .handlers
            .insert((address, selector), Arc::new(handler));
    }

    /// Installs a typed handler for `C` on `address`.
    pub fn on<C, V, F>(&self, address: Address, handler: F)
    where
        C: SolCall,
        V: SolValue,
        F: Fn(C, Option<Address>) -> Result<V, RpcError> + Send + Sync + 'static,
    {
        self.on_raw(address, C::SELECTOR, move |data, from| {
            let call = C::abi_decode(data, true)?;
            Ok(handler(call, from)?.abi_encode())
        });
    }

    pub fn returns<C, V>(&self, address: Address, value: V)
    where
        C: SolCall,
        V: SolValue + Clone + Send + Sync + 'static,
    {
        self.on::<C, V, _>(address, move |_, _| Ok(value.clone()));
    }

    pub fn reverts<C: SolCall>(&self, address: Address, message: &str) {
        let message = message.to_string();
        self.on_raw(address, C::SELECTOR, move |_, _| {
            Err(RpcError::Reverted {
                message: message.clone(),
                data: None,
            })
        });
    }

    /// Runs `hook` whenever a transaction calling `C` on `address` is sent.
    /// Simulations never trigger it.
    pub fn on_sent<C, F>(&self, address: Address, hook: F)
    where
        C: SolCall,
        F: Fn(C, Option<Address>) + Send + Sync + 'static,
    {
        let hook: SentHook = Arc::new(move |data, from| {
            if let Ok(call) = C::abi_decode(data, true) {
                hook(call, from);
            }
        });
        self.state()
            .sent_hooks
            .insert((address, C::SELECTOR), hook);
    }

    pub fn remove<C: SolCall>(&self, address: Address) {
        self.state().handlers.remove(&(address, C::SELECTOR));
    }

    /// Every `eth_call` seen so far, multicalls included as one entry.
    pub fn calls(&self) -> Vec<TransactionRequest> {
        self.state().calls.clone()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state().sent.clone()
    }

    /// Submitted transactions calling `C`.
    pub fn sent_calls<C: SolCall>(&self) -> Vec<(Address, C)> {
        self.sent()
            .into_iter()
            .filter(|tx| tx.input.starts_with(&C::SELECTOR))
            .filter_map(|tx| C::abi_decode(&tx.input, true).ok().map(|call| (tx.to, call)))
            .collect()
    }

    fn handler(&self, address: Address, data: &[u8]) -> Option<Handler> {
        let selector: Selector = data.get(..4)?.try_into().ok()?;
        self.state().handlers.get(&(address, selector)).cloned()
    }

    fn dispatch(&self, to: Address, data: &[u8], from: Option<Address>) -> Result<Vec<u8>, RpcError> {
        match self.handler(to, data) {
            Some(handler) => handler(data, from),
            None => Err(RpcError::Reverted {
                message: format!("no handler on {to}"),
                data: None,
            }),
        }
    }

    fn aggregate(&self, data: &[u8], from: Option<Address>) -> Result<Vec<u8>, RpcError> {
        let batch = aggregate3Call::abi_decode(data, true)?;
        let results: Vec<CallResult> = batch
            .calls
            .iter()
            .map(|call| match self.dispatch(call.target, &call.callData, from) {
                Ok(data) => CallResult {
                    success: true,
                    returnData: data.into(),
                },
                Err(_) => CallResult {
                    success: false,
                    returnData: Bytes::new(),
                },
            })
            .collect();
        Ok(aggregate3Call::abi_encode_returns(&(results,)))
    }
}

impl ChainClient for MockChain {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        Ok(self.state().chain_id)
    }

    async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        Ok(self.state().accounts.clone())
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, RpcError> {
        {
            let mut state = self.state();
            if state.offline {
                return Err(RpcError::Rpc {
                    code: -32603,
                    message: "connection refused".to_string(),
                });
            }
            state.calls.push(tx.clone());
        }

        debug!("mock eth_call to {}", tx.to);
        let data = if tx.to == MULTICALL3_ADDRESS {
            self.aggregate(&tx.input, tx.from)?
        } else {
            self.dispatch(tx.to, &tx.input, tx.from)?
        };
        Ok(data.into())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, RpcError> {
        let (hash, hook) = {
            let mut state = self.state();
            state.sent.push(tx.clone());
            let hash = B256::left_padding_from(&(state.sent.len() as u64).to_be_bytes());
            let hook = tx
                .input
                .get(..4)
                .and_then(|selector| Selector::try_from(selector).ok())
                .and_then(|selector| state.sent_hooks.get(&(tx.to, selector)).cloned());
            (hash, hook)
        };

        if let Some(hook) = hook {
            hook(&tx.input, tx.from);
        }
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, RpcError> {
        let mut state = self.state();
        let delay = state.receipt_delay;
        let polls = state.receipt_polls.entry(hash).or_default();
        *polls += 1;
        if *polls <= delay {
            return Ok(None);
        }

        Ok(Some(TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(1)),
            status: Some(U64::from(state.receipt_success as u64)),
            gas_used: Some(U256::from(21_000u64)),
        }))
    }
}
