use {
    crate::{
        config::Config,
        utils::{fmt_amount, send_action},
    },
    anyhow::{bail, Result},
    veyfi_client::{
        actions::ActionRequest,
        services::{claimable_gauges, GaugeService, RewardsService},
    },
};

pub async fn rewards_get(config: &Config) -> Result<()> {
    let Some(account) = config.read_account().await else {
        bail!("No account configured");
    };

    let rewards = RewardsService::new(config.client.clone(), config.deployment.clone())
        .claimable(account)
        .await;

    let gauges = GaugeService::new(config.client.clone(), config.deployment.clone());
    let positions = gauges
        .refresh_positions(account, &gauges.refresh_gauges().await)
        .await;
    let claimable = claimable_gauges(&positions);

    println!(
        r#"
Rewards of {}
    Boost rewards: {}
    Exit rewards: {}
    Gauges with rewards: {}"#,
        account,
        fmt_amount(&rewards.boost, "dYFI"),
        fmt_amount(&rewards.exit, "YFI"),
        claimable.len(),
    );

    for gauge in claimable {
        if let Some(position) = positions.get(&gauge) {
            println!("        {gauge}: {}", fmt_amount(&position.reward, "dYFI"));
        }
    }

    Ok(())
}

/// dYFI redistributed from gauge stakers without max boost.
pub async fn rewards_claim_boost(config: &Config) -> Result<()> {
    let connection = config.connection().await?;

    send_action(
        config,
        &connection,
        config.deployment.dyfi_reward_pool,
        ActionRequest::ClaimBoostRewards,
    )
    .await?;

    Ok(())
}

/// YFI collected from early-exit penalties.
pub async fn rewards_claim_exit(config: &Config) -> Result<()> {
    let connection = config.connection().await?;

    send_action(
        config,
        &connection,
        config.deployment.yfi_reward_pool,
        ActionRequest::ClaimBoostRewards,
    )
    .await?;

    Ok(())
}

/// Claims every gauge with rewards in a single zap transaction.
pub async fn rewards_claim_all(config: &Config, lock: bool, claim_ve_yfi: bool) -> Result<()> {
    let Some(zap) = config.deployment.claim_rewards_zap else {
        bail!("No claim rewards zap configured, set one with `profile update --claim-rewards-zap`");
    };
    let connection = config.connection().await?;

    let service = GaugeService::new(config.client.clone(), config.deployment.clone());
    let positions = service
        .refresh_positions(connection.account(), &service.refresh_gauges().await)
        .await;
    let gauges = claimable_gauges(&positions);

    if gauges.is_empty() && !claim_ve_yfi {
        println!("Nothing to claim");
        return Ok(());
    }

    send_action(
        config,
        &connection,
        zap,
        ActionRequest::ClaimAllRewards {
            gauges,
            lock,
            claim_ve_yfi,
        },
    )
    .await?;

    Ok(())
}
