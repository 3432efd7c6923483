use {
    alloy_primitives::Address,
    anyhow::Result,
    clap::Parser,
    std::sync::Arc,
    veyfi_client::prelude::*,
};

#[derive(Default, Debug, Parser)]
pub struct GlobalOptions {
    /// Simulate every transaction instead of sending it.
    #[clap(global = true, long = "dry-run", action, default_value_t = false)]
    pub dry_run: bool,

    #[clap(
        global = true,
        long = "skip-confirmation",
        short = 'y',
        action,
        default_value_t = false
    )]
    pub skip_confirmation: bool,
}

pub struct Config {
    pub deployment: Deployment,
    pub client: Arc<HttpChainClient>,
    /// Falls back to the wallet's first account when unset.
    pub account: Option<Address>,
    pub settings: ClientSettings,
    pub dry_run: bool,
}

impl Config {
    pub fn get_tx_mode(&self) -> TxMode {
        if self.dry_run {
            TxMode::DryRun
        } else {
            TxMode::Normal
        }
    }

    pub async fn connection(&self) -> Result<Connection<Arc<HttpChainClient>>> {
        let connection = match self.account {
            Some(account) => Connection::new(Arc::clone(&self.client), account),
            None => Connection::connect(Arc::clone(&self.client)).await?,
        };

        Ok(connection
            .with_settings(self.settings)
            .with_mode(self.get_tx_mode()))
    }

    /// The account reads are made for, if any can be determined.
    pub async fn read_account(&self) -> Option<Address> {
        match self.account {
            Some(account) => Some(account),
            None => self
                .client
                .accounts()
                .await
                .ok()
                .and_then(|accounts| accounts.into_iter().next()),
        }
    }
}
