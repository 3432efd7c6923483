use crate::{
    config::{ClientSettings, TxMode},
    error::RpcError,
    rpc::ChainClient,
};
use alloy_primitives::Address;
use log::info;

/// A wallet session: the chain client plus the account that signs.
#[derive(Debug, Clone)]
pub struct Connection<C> {
    client: C,
    account: Address,
    settings: ClientSettings,
    mode: TxMode,
}

impl<C: ChainClient> Connection<C> {
    pub fn new(client: C, account: Address) -> Self {
        Self {
            client,
            account,
            settings: ClientSettings::default(),
            mode: TxMode::default(),
        }
    }

    /// Uses the first account the wallet exposes.
    pub async fn connect(client: C) -> Result<Self, RpcError> {
        let account = client
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(RpcError::NoAccount)?;
        info!("connected as {account}");
        Ok(Self::new(client, account))
    }

    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_mode(mut self, mode: TxMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn mode(&self) -> TxMode {
        self.mode
    }
}
