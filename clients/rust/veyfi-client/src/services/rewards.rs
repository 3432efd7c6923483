use crate::{
    abi::IRewardPool,
    config::Deployment,
    rpc::{call_contract, ChainClient},
};
use alloy_primitives::{Address, U256};
use log::warn;
use std::sync::Arc;
use veyfitypecrate::{constants::YFI_DECIMALS, types::NormalizedAmount};

/// Rewards waiting in the two reward pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimableRewards {
    /// dYFI from the boost pool.
    pub boost: NormalizedAmount,
    /// YFI from the exit pool, funded by early-exit penalties.
    pub exit: NormalizedAmount,
}

pub struct RewardsService<C> {
    client: Arc<C>,
    deployment: Deployment,
}

impl<C: ChainClient> RewardsService<C> {
    pub fn new(client: Arc<C>, deployment: Deployment) -> Self {
        Self { client, deployment }
    }

    pub async fn claimable(&self, account: Address) -> ClaimableRewards {
        let (boost, exit) = futures::join!(
            self.simulate_claim(self.deployment.dyfi_reward_pool, account),
            self.simulate_claim(self.deployment.yfi_reward_pool, account)
        );

        ClaimableRewards {
            boost: NormalizedAmount::new(boost, YFI_DECIMALS),
            exit: NormalizedAmount::new(exit, YFI_DECIMALS),
        }
    }

    /// What `claim(account)` would pay out right now. A revert reads as zero.
    async fn simulate_claim(&self, pool: Address, account: Address) -> U256 {
        let call = IRewardPool::claimCall { user: account };
        match call_contract(self.client.as_ref(), pool, &call, Some(account)).await {
            Ok(claimed) => claimed._0,
            Err(err) => {
                warn!("claim simulation on {pool} failed, assuming nothing to claim: {err}");
                U256::ZERO
            }
        }
    }
}
