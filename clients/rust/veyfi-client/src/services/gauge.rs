use crate::{
    abi::IGauge, config::Deployment, error::RpcError, multicall::Multicall, rpc::ChainClient,
};
use alloy_primitives::Address;
use futures::future::join_all;
use log::warn;
use std::{collections::HashMap, sync::Arc};
use veyfitypecrate::{
    constants::YFI_DECIMALS,
    types::{Gauge, GaugePosition, NormalizedAmount},
};

pub type GaugePositions = HashMap<Address, GaugePosition>;

pub struct GaugeService<C> {
    client: Arc<C>,
    deployment: Deployment,
}

impl<C: ChainClient> GaugeService<C> {
    pub fn new(client: Arc<C>, deployment: Deployment) -> Self {
        Self { client, deployment }
    }

    /// Every configured gauge that could be read, in deployment order.
    pub async fn refresh_gauges(&self) -> Vec<Gauge> {
        let reads = self.deployment.gauges.iter().map(|address| self.gauge(*address));

        join_all(reads)
            .await
            .into_iter()
            .zip(&self.deployment.gauges)
            .filter_map(|(gauge, address)| {
                gauge
                    .map_err(|err| warn!("dropping gauge {address}: {err}"))
                    .ok()
            })
            .collect()
    }

    pub async fn gauge(&self, address: Address) -> Result<Gauge, RpcError> {
        let mut batch = Multicall::new();
        batch
            .add(address, &IGauge::assetCall {})
            .add(address, &IGauge::nameCall {})
            .add(address, &IGauge::symbolCall {})
            .add(address, &IGauge::decimalsCall {})
            .add(address, &IGauge::totalAssetsCall {})
            .add(address, &IGauge::rewardRateCall {});

        let mut results = batch
            .call(self.client.as_ref(), self.deployment.multicall)
            .await?;

        let vault_address = results.decode::<IGauge::assetCall>()?._0;
        let name = results.decode::<IGauge::nameCall>()?._0;
        let symbol = results.decode::<IGauge::symbolCall>()?._0;
        let decimals = results.decode::<IGauge::decimalsCall>()?._0;
        let total_assets = results.decode::<IGauge::totalAssetsCall>()?._0;
        let reward_rate = results.decode::<IGauge::rewardRateCall>()?._0;

        Ok(Gauge {
            address,
            vault_address,
            name,
            symbol,
            decimals,
            total_staked: NormalizedAmount::new(total_assets, decimals),
            reward_rate: NormalizedAmount::new(
                reward_rate,
                self.deployment.reward_rate_decimals(&address),
            ),
        })
    }

    /// Positions of `account` in `gauges`. Gauges whose reads fail are left out.
    pub async fn refresh_positions(&self, account: Address, gauges: &[Gauge]) -> GaugePositions {
        let reads = gauges.iter().map(|gauge| self.position(account, gauge));

        join_all(reads)
            .await
            .into_iter()
            .zip(gauges)
            .filter_map(|(position, gauge)| match position {
                Ok(position) => Some((gauge.address, position)),
                Err(err) => {
                    warn!("dropping position of {account} in {}: {err}", gauge.address);
                    None
                }
            })
            .collect()
    }

    pub async fn position(&self, account: Address, gauge: &Gauge) -> Result<GaugePosition, RpcError> {
        let address = gauge.address;

        let mut batch = Multicall::new();
        batch
            .add(address, &IGauge::balanceOfCall { account })
            .add(address, &IGauge::earnedCall { account })
            .add(address, &IGauge::nextBoostedBalanceOfCall { account });

        let mut results = batch
            .call(self.client.as_ref(), self.deployment.multicall)
            .await?;

        let balance = results.decode::<IGauge::balanceOfCall>()?._0;
        let earned = results.decode::<IGauge::earnedCall>()?._0;
        let boosted_balance = results.decode::<IGauge::nextBoostedBalanceOfCall>()?._0;

        Ok(GaugePosition::new(
            address,
            NormalizedAmount::new(balance, gauge.decimals),
            // Rewards are paid in dYFI.
            NormalizedAmount::new(earned, YFI_DECIMALS),
            boosted_balance,
        ))
    }
}

/// Gauges holding unclaimed rewards, ordered by address.
pub fn claimable_gauges(positions: &GaugePositions) -> Vec<Address> {
    let mut gauges: Vec<Address> = positions
        .values()
        .filter(|position| position.has_rewards())
        .map(|position| position.address)
        .collect();
    gauges.sort();
    gauges
}
