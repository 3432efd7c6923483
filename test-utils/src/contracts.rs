//! Ready-made contract behavior for the mock chain.

use crate::chain::MockChain;
use alloy_primitives::{Address, U256};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use veyfi_client::{
    abi::{
        IGauge, IOptions, IPositionHelper, IRewardPool, IVotingEscrow, LockedBalance,
        PositionDetails, Withdrawn, IERC20,
    },
    error::RpcError,
};

pub fn yfi(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(18u64))
}

pub struct EscrowFixture {
    pub address: Address,
    pub token: Address,
    pub reward_pool: Address,
    pub supply: U256,
}

impl EscrowFixture {
    pub fn install(&self, chain: &MockChain) {
        let address = self.address;
        chain.returns::<IVotingEscrow::tokenCall, _>(address, self.token);
        chain.returns::<IVotingEscrow::nameCall, _>(address, "Voting YFI".to_string());
        chain.returns::<IVotingEscrow::symbolCall, _>(address, "veYFI".to_string());
        chain.returns::<IVotingEscrow::decimalsCall, _>(address, U256::from(18u8));
        chain.returns::<IVotingEscrow::supplyCall, _>(address, self.supply);
        chain.returns::<IVotingEscrow::reward_poolCall, _>(address, self.reward_pool);
        chain.on::<IVotingEscrow::modify_lockCall, _, _>(address, |call, _| {
            Ok(LockedBalance {
                amount: call.amount,
                end: call.unlock_time,
            })
        });
        self.set_withdraw_penalty(chain, U256::ZERO);
    }

    /// What a simulated `withdraw()` reports.
    pub fn set_withdraw_penalty(&self, chain: &MockChain, penalty: U256) {
        chain.returns::<IVotingEscrow::withdrawCall, _>(
            self.address,
            Withdrawn {
                amount: yfi(1),
                penalty,
            },
        );
    }
}

pub fn install_position(chain: &MockChain, helper: Address, details: PositionDetails) {
    chain.on::<IPositionHelper::getPositionDetailsCall, _, _>(helper, move |_, _| {
        Ok(PositionDetails {
            balance: details.balance,
            depositAmount: details.depositAmount,
            withdrawable: details.withdrawable,
            penalty: details.penalty,
            unlockTime: details.unlockTime,
        })
    });
}

/// ERC-20 with per-owner balances and allowances. A simulated `approve`
/// always succeeds; a sent one sets the allowance.
#[derive(Debug, Clone, Default)]
pub struct TokenFixture {
    balances: Arc<Mutex<HashMap<Address, U256>>>,
    allowances: Arc<Mutex<HashMap<(Address, Address), U256>>>,
}

impl TokenFixture {
    pub fn install(&self, chain: &MockChain, address: Address) {
        let balances = Arc::clone(&self.balances);
        chain.on::<IERC20::balanceOfCall, _, _>(address, move |call, _| {
            let balances = balances.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(balances.get(&call.account).copied().unwrap_or_default())
        });

        let allowances = Arc::clone(&self.allowances);
        chain.on::<IERC20::allowanceCall, _, _>(address, move |call, _| {
            let allowances = allowances.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(allowances
                .get(&(call.owner, call.spender))
                .copied()
                .unwrap_or_default())
        });

        chain.returns::<IERC20::approveCall, _>(address, true);

        let allowances = Arc::clone(&self.allowances);
        chain.on_sent::<IERC20::approveCall, _>(address, move |call, from| {
            if let Some(owner) = from {
                allowances
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert((owner, call.spender), call.amount);
            }
        });
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_balance(&self, owner: Address, amount: U256) {
        self.balances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(owner, amount);
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, amount: U256) {
        self.allowances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((owner, spender), amount);
    }
}

/// Gauge whose `deposit` pulls from `vault_token` and reverts without
/// enough allowance.
#[derive(Debug, Clone)]
pub struct GaugeFixture {
    pub address: Address,
    pub vault: Address,
    pub vault_token: TokenFixture,
    pub name: String,
    pub decimals: u8,
    pub total_assets: U256,
    pub reward_rate: U256,
}

impl GaugeFixture {
    pub fn new(address: Address, vault: Address, name: &str) -> Self {
        Self {
            address,
            vault,
            vault_token: TokenFixture::default(),
            name: name.to_string(),
            decimals: 18,
            total_assets: yfi(1_000),
            reward_rate: U256::from(1_000_000u64),
        }
    }

    pub fn install(&self, chain: &MockChain) {
        let address = self.address;
        chain.returns::<IGauge::assetCall, _>(address, self.vault);
        chain.returns::<IGauge::nameCall, _>(address, self.name.clone());
        chain.returns::<IGauge::symbolCall, _>(address, format!("st-{}", self.name));
        chain.returns::<IGauge::decimalsCall, _>(address, U256::from(self.decimals));
        chain.returns::<IGauge::totalAssetsCall, _>(address, self.total_assets);
        chain.returns::<IGauge::rewardRateCall, _>(address, self.reward_rate);
        self.vault_token.install(chain, self.vault);
        let vault_token = self.vault_token.clone();
        chain.on::<IGauge::depositCall, _, _>(address, move |call, from| {
            let owner = from.unwrap_or_default();
            if vault_token.allowance(owner, address) < call.assets {
                return Err(RpcError::Reverted {
                    message: "execution reverted: ERC20: insufficient allowance".to_string(),
                    data: None,
                });
            }
            Ok(call.assets)
        });
        chain.on::<IGauge::withdrawCall, _, _>(address, |call, _| Ok(call.assets));
        chain.returns::<IGauge::getRewardCall, _>(address, true);
    }

    pub fn set_position(&self, chain: &MockChain, balance: U256, earned: U256, boosted: U256) {
        chain.returns::<IGauge::balanceOfCall, _>(self.address, balance);
        chain.returns::<IGauge::earnedCall, _>(self.address, earned);
        chain.returns::<IGauge::nextBoostedBalanceOfCall, _>(self.address, boosted);
    }
}

pub fn install_options(chain: &MockChain, options: Address, discount: U256, eth_per_dyfi: U256) {
    chain.returns::<IOptions::discountCall, _>(options, discount);
    chain.on::<IOptions::eth_requiredCall, _, _>(options, move |call, _| {
        Ok(call.amount * eth_per_dyfi / yfi(1))
    });
    chain.on::<IOptions::redeemCall, _, _>(options, |call, _| Ok(call.amount));
}

pub fn install_reward_pool(chain: &MockChain, pool: Address, claimable: U256) {
    chain.on::<IRewardPool::claimCall, _, _>(pool, move |_, from| match from {
        Some(_) => Ok(claimable),
        None => Err(RpcError::Reverted {
            message: "claim needs a caller".to_string(),
            data: None,
        }),
    });
}
