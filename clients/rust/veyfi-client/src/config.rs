use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use veyfitypecrate::constants::{
    GAUGE_REWARD_DECIMALS, GAUGE_V2_REWARD_DECIMALS, MULTICALL3_ADDRESS, VEYFI_ADDRESS,
    VEYFI_CHAIN_ID, VEYFI_DYFI_ADDRESS, VEYFI_DYFI_REWARD_POOL, VEYFI_OPTIONS_ADDRESS,
    VEYFI_POSITION_HELPER_ADDRESS, VEYFI_YFI_REWARD_POOL, VE_YFI_GAUGES, VE_YFI_GAUGES_V2,
    WITHDRAW_PENALTY_STATUS_RESET_MS, YFI_ADDRESS,
};

/// Every contract the client talks to. `Default` is the mainnet deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub chain_id: u64,
    pub voting_escrow: Address,
    pub yfi: Address,
    pub dyfi: Address,
    pub options: Address,
    pub position_helper: Address,
    pub yfi_reward_pool: Address,
    pub dyfi_reward_pool: Address,
    /// Not part of the default deployment, must be configured to claim all rewards at once.
    pub claim_rewards_zap: Option<Address>,
    pub multicall: Address,
    pub gauges: Vec<Address>,
    pub v2_gauges: Vec<Address>,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            chain_id: VEYFI_CHAIN_ID,
            voting_escrow: VEYFI_ADDRESS,
            yfi: YFI_ADDRESS,
            dyfi: VEYFI_DYFI_ADDRESS,
            options: VEYFI_OPTIONS_ADDRESS,
            position_helper: VEYFI_POSITION_HELPER_ADDRESS,
            yfi_reward_pool: VEYFI_YFI_REWARD_POOL,
            dyfi_reward_pool: VEYFI_DYFI_REWARD_POOL,
            claim_rewards_zap: None,
            multicall: MULTICALL3_ADDRESS,
            gauges: VE_YFI_GAUGES.to_vec(),
            v2_gauges: VE_YFI_GAUGES_V2.to_vec(),
        }
    }
}

impl Deployment {
    /// Decimals of a gauge's `rewardRate`.
    pub fn reward_rate_decimals(&self, gauge: &Address) -> u8 {
        if self.v2_gauges.contains(gauge) {
            GAUGE_V2_REWARD_DECIMALS
        } else {
            GAUGE_REWARD_DECIMALS
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TxMode {
    /// Simulate only, nothing is submitted.
    DryRun,
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    pub receipt_poll_interval: Duration,
    pub receipt_timeout: Duration,
    pub withdraw_penalty_reset: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            receipt_poll_interval: Duration::from_secs(2),
            receipt_timeout: Duration::from_secs(180),
            withdraw_penalty_reset: Duration::from_millis(WITHDRAW_PENALTY_STATUS_RESET_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(VE_YFI_GAUGES[0], GAUGE_REWARD_DECIMALS ; "v1 gauge")]
    #[test_case(VE_YFI_GAUGES_V2[0], GAUGE_V2_REWARD_DECIMALS ; "v2 gauge")]
    #[test_case(Address::ZERO, GAUGE_REWARD_DECIMALS ; "unknown gauge")]
    fn reward_rate_decimals(gauge: Address, expected: u8) {
        assert_eq!(Deployment::default().reward_rate_decimals(&gauge), expected);
    }

    #[test]
    fn default_deployment_has_no_zap() {
        let deployment = Deployment::default();
        assert_eq!(deployment.chain_id, VEYFI_CHAIN_ID);
        assert_eq!(deployment.claim_rewards_zap, None);
        assert!(deployment
            .v2_gauges
            .iter()
            .all(|gauge| deployment.gauges.contains(gauge)));
    }
}
