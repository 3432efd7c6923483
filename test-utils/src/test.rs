use crate::{chain::MockChain, contracts::*};
use alloy_primitives::{address, Address, U256};
use std::{sync::Arc, time::Duration};
use veyfi_client::{
    abi::PositionDetails,
    config::{ClientSettings, Deployment},
    connection::Connection,
};

pub const USER: Address = address!("00000000000000000000000000000000000000aa");
pub const ZAP: Address = address!("00000000000000000000000000000000000000fe");

/// A mainnet-shaped deployment on a mock chain, with one connected user.
pub struct TestFixture {
    pub chain: Arc<MockChain>,
    pub deployment: Deployment,
    pub escrow: EscrowFixture,
    pub yfi: TokenFixture,
    pub dyfi: TokenFixture,
    pub gauges: Vec<GaugeFixture>,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        init_logging();

        let chain = Arc::new(MockChain::new());
        chain.set_accounts(vec![USER]);

        let deployment = Deployment {
            claim_rewards_zap: Some(ZAP),
            ..Deployment::default()
        };

        let escrow = EscrowFixture {
            address: deployment.voting_escrow,
            token: deployment.yfi,
            reward_pool: deployment.yfi_reward_pool,
            supply: yfi(10_000),
        };
        escrow.install(&chain);

        let yfi_token = TokenFixture::default();
        yfi_token.install(&chain, deployment.yfi);
        let dyfi_token = TokenFixture::default();
        dyfi_token.install(&chain, deployment.dyfi);

        install_position(
            &chain,
            deployment.position_helper,
            PositionDetails {
                balance: U256::ZERO,
                depositAmount: U256::ZERO,
                withdrawable: U256::ZERO,
                penalty: U256::ZERO,
                unlockTime: U256::ZERO,
            },
        );

        let gauges: Vec<GaugeFixture> = deployment
            .gauges
            .iter()
            .enumerate()
            .map(|(i, gauge)| {
                let vault = Address::with_last_byte(0x10 + i as u8);
                GaugeFixture::new(*gauge, vault, &format!("Gauge {}", i + 1))
            })
            .collect();
        for gauge in &gauges {
            gauge.install(&chain);
            gauge.set_position(&chain, U256::ZERO, U256::ZERO, U256::ZERO);
        }

        // dYFI at a quarter of the YFI price, 0.01 ETH to redeem one.
        install_options(
            &chain,
            deployment.options,
            yfi(1) / U256::from(4u64),
            yfi(1) / U256::from(100u64),
        );
        install_reward_pool(&chain, deployment.dyfi_reward_pool, U256::ZERO);
        install_reward_pool(&chain, deployment.yfi_reward_pool, U256::ZERO);

        Self {
            chain,
            deployment,
            escrow,
            yfi: yfi_token,
            dyfi: dyfi_token,
            gauges,
        }
    }

    /// Connection for `USER` with fast receipt polling.
    pub fn connection(&self) -> Connection<Arc<MockChain>> {
        Connection::new(Arc::clone(&self.chain), USER).with_settings(ClientSettings {
            receipt_poll_interval: Duration::from_millis(10),
            receipt_timeout: Duration::from_secs(1),
            ..ClientSettings::default()
        })
    }

    pub fn gauge(&self, index: usize) -> &GaugeFixture {
        &self.gauges[index]
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
