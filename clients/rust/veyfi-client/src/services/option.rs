use crate::{
    abi::{IOptions, IERC20},
    config::Deployment,
    error::RpcError,
    rpc::{call_contract, ChainClient},
};
use alloy_primitives::{Address, U256};
use fixed::types::I80F48;
use log::warn;
use std::sync::Arc;
use veyfitypecrate::{
    constants::{DISCOUNT_DECIMALS, YFI_DECIMALS},
    types::NormalizedAmount,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSnapshot {
    /// Fraction of the YFI price a dYFI is worth, 18 decimals.
    pub discount: Option<NormalizedAmount>,
    pub dyfi_balance: Option<NormalizedAmount>,
}

impl OptionSnapshot {
    /// `yfi_price * discount`, zero while the discount is unknown.
    pub fn dyfi_price(&self, yfi_price: I80F48) -> I80F48 {
        self.discount
            .map(|discount| yfi_price.saturating_mul(discount.normalized()))
            .unwrap_or(I80F48::ZERO)
    }
}

pub struct OptionService<C> {
    client: Arc<C>,
    deployment: Deployment,
}

impl<C: ChainClient> OptionService<C> {
    pub fn new(client: Arc<C>, deployment: Deployment) -> Self {
        Self { client, deployment }
    }

    pub async fn refresh(&self, account: Option<Address>) -> OptionSnapshot {
        let discount = async {
            self.discount()
                .await
                .map_err(|err| warn!("failed to read dYFI discount: {err}"))
                .ok()
        };
        let balance = async {
            match account.filter(|account| !account.is_zero()) {
                Some(account) => self
                    .dyfi_balance(account)
                    .await
                    .map_err(|err| warn!("failed to read dYFI balance of {account}: {err}"))
                    .ok(),
                None => None,
            }
        };

        let (discount, dyfi_balance) = futures::join!(discount, balance);
        OptionSnapshot {
            discount,
            dyfi_balance,
        }
    }

    pub async fn discount(&self) -> Result<NormalizedAmount, RpcError> {
        let discount = call_contract(
            self.client.as_ref(),
            self.deployment.options,
            &IOptions::discountCall {},
            None,
        )
        .await?
        ._0;
        Ok(NormalizedAmount::new(discount, DISCOUNT_DECIMALS))
    }

    pub async fn dyfi_balance(&self, account: Address) -> Result<NormalizedAmount, RpcError> {
        let balance = call_contract(
            self.client.as_ref(),
            self.deployment.dyfi,
            &IERC20::balanceOfCall { account },
            None,
        )
        .await?
        ._0;
        Ok(NormalizedAmount::new(balance, YFI_DECIMALS))
    }

    /// ETH needed to redeem `amount` dYFI right now. Read fresh on every call;
    /// zero when the read fails.
    pub async fn required_eth(&self, amount: U256) -> U256 {
        let call = IOptions::eth_requiredCall { amount };
        match call_contract(self.client.as_ref(), self.deployment.options, &call, None).await {
            Ok(required) => required._0,
            Err(err) => {
                warn!("failed to quote ETH required for {amount} dYFI: {err}");
                U256::ZERO
            }
        }
    }
}
