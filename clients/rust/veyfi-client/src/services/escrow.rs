use crate::{
    abi::{IPositionHelper, IVotingEscrow, IERC20},
    config::Deployment,
    error::RpcError,
    multicall::Multicall,
    rpc::{call_contract, ChainClient},
};
use alloy_primitives::{Address, U256};
use log::warn;
use std::sync::Arc;
use veyfitypecrate::{
    time::to_milliseconds,
    types::{AllowanceKey, Allowances, EscrowPosition, VotingEscrow},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VotingEscrowSnapshot {
    pub escrow: Option<VotingEscrow>,
    pub position: Option<EscrowPosition>,
    /// YFI allowance of the escrow, keyed like every other allowance.
    pub allowances: Allowances,
}

pub struct VotingEscrowService<C> {
    client: Arc<C>,
    deployment: Deployment,
}

impl<C: ChainClient> VotingEscrowService<C> {
    pub fn new(client: Arc<C>, deployment: Deployment) -> Self {
        Self { client, deployment }
    }

    /// Account-bound parts are skipped when no account, or the zero address, is given.
    pub async fn refresh(&self, account: Option<Address>) -> VotingEscrowSnapshot {
        let account = account.filter(|account| !account.is_zero());

        let escrow = match self.escrow().await {
            Ok(escrow) => Some(escrow),
            Err(err) => {
                warn!("failed to read voting escrow: {err}");
                None
            }
        };

        let Some(account) = account else {
            return VotingEscrowSnapshot {
                escrow,
                ..Default::default()
            };
        };

        let (position, allowance) = futures::join!(self.position(account), self.allowance(account));

        let position = position
            .map_err(|err| warn!("failed to read escrow position of {account}: {err}"))
            .ok();

        let mut allowances = Allowances::new();
        match allowance {
            Ok(allowance) => {
                allowances.insert(
                    AllowanceKey::new(
                        self.deployment.chain_id,
                        self.deployment.yfi,
                        self.deployment.voting_escrow,
                        account,
                    ),
                    allowance,
                );
            }
            Err(err) => warn!("failed to read YFI allowance of {account}: {err}"),
        }

        VotingEscrowSnapshot {
            escrow,
            position,
            allowances,
        }
    }

    /// Escrow metadata, all or nothing.
    pub async fn escrow(&self) -> Result<VotingEscrow, RpcError> {
        let address = self.deployment.voting_escrow;

        let mut batch = Multicall::new();
        batch
            .add(address, &IVotingEscrow::tokenCall {})
            .add(address, &IVotingEscrow::nameCall {})
            .add(address, &IVotingEscrow::symbolCall {})
            .add(address, &IVotingEscrow::decimalsCall {})
            .add(address, &IVotingEscrow::supplyCall {})
            .add(address, &IVotingEscrow::reward_poolCall {});

        let mut results = batch
            .call(self.client.as_ref(), self.deployment.multicall)
            .await?;

        Ok(VotingEscrow {
            address,
            token: results.decode::<IVotingEscrow::tokenCall>()?._0,
            name: results.decode::<IVotingEscrow::nameCall>()?._0,
            symbol: results.decode::<IVotingEscrow::symbolCall>()?._0,
            decimals: results.decode::<IVotingEscrow::decimalsCall>()?._0,
            supply: results.decode::<IVotingEscrow::supplyCall>()?._0,
            reward_pool: results.decode::<IVotingEscrow::reward_poolCall>()?._0,
        })
    }

    pub async fn position(&self, account: Address) -> Result<EscrowPosition, RpcError> {
        let details = call_contract(
            self.client.as_ref(),
            self.deployment.position_helper,
            &IPositionHelper::getPositionDetailsCall { user: account },
            None,
        )
        .await?
        ._0;

        Ok(EscrowPosition {
            balance: details.balance,
            underlying_balance: details.depositAmount,
            unlock_time_ms: to_milliseconds(details.unlockTime.saturating_to()),
            penalty: details.penalty,
            withdrawable: details.withdrawable,
        })
    }

    async fn allowance(&self, account: Address) -> Result<U256, RpcError> {
        let call = IERC20::allowanceCall {
            owner: account,
            spender: self.deployment.voting_escrow,
        };
        Ok(call_contract(self.client.as_ref(), self.deployment.yfi, &call, None)
            .await?
            ._0)
    }
}
