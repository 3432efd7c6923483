use {
    crate::{
        config::Config,
        utils::{check_amount, fmt_amount, send_action, ui_to_native},
    },
    alloy_primitives::Address,
    anyhow::{bail, Result},
    veyfi_client::{
        actions::{balance_of, ActionRequest},
        services::{claimable_gauges, GaugeService},
    },
    veyfitypecrate::types::{sort_gauges, GaugeSortKey, SortOrder},
};

pub async fn gauge_list(config: &Config) -> Result<()> {
    let service = GaugeService::new(config.client.clone(), config.deployment.clone());
    let mut gauges = service.refresh_gauges().await;

    if gauges.is_empty() {
        println!("No gauges could be read");
        return Ok(());
    }

    sort_gauges(&mut gauges, GaugeSortKey::TotalStaked, SortOrder::Desc);

    println!("Found {} gauges", gauges.len());
    for gauge in gauges {
        println!(
            r#"
Gauge: {}
    Name: {} ({})
    Vault: {}
    Total Staked: {}
    Reward Rate: {} dYFI/s"#,
            gauge.address,
            gauge.name,
            gauge.symbol,
            gauge.vault_address,
            fmt_amount(&gauge.total_staked, &gauge.symbol),
            gauge.reward_rate,
        );
    }

    Ok(())
}

pub async fn gauge_positions(config: &Config) -> Result<()> {
    let Some(account) = config.read_account().await else {
        bail!("No account configured");
    };

    let service = GaugeService::new(config.client.clone(), config.deployment.clone());
    let mut gauges = service.refresh_gauges().await;
    sort_gauges(&mut gauges, GaugeSortKey::Name, SortOrder::Asc);
    let positions = service.refresh_positions(account, &gauges).await;

    let mut shown = 0;
    for gauge in &gauges {
        let Some(position) = positions.get(&gauge.address) else {
            continue;
        };
        if position.deposit.is_zero() && !position.has_rewards() {
            continue;
        }
        shown += 1;

        println!(
            r#"
Gauge: {} ({})
    Deposited: {}
    Earned: {}
    Boost: {:.2}x"#,
            gauge.name,
            gauge.address,
            fmt_amount(&position.deposit, &gauge.symbol),
            fmt_amount(&position.reward, "dYFI"),
            position.boost,
        );
    }

    if shown == 0 {
        println!("No gauge positions for {account}");
        return Ok(());
    }

    let claimable = claimable_gauges(&positions);
    println!("\n{} gauges with rewards to claim", claimable.len());

    Ok(())
}

/// Approves the gauge for its vault token when needed, then deposits.
pub async fn gauge_stake(config: &Config, gauge: Address, ui_amount: &str) -> Result<()> {
    let service = GaugeService::new(config.client.clone(), config.deployment.clone());
    let gauge = service.gauge(gauge).await?;
    let connection = config.connection().await?;

    let amount = ui_to_native(ui_amount, gauge.decimals)?;
    let balance = balance_of(&connection, gauge.vault_address).await?;
    check_amount(amount, Some(balance))?;

    println!(
        "Staking {} {} into {}",
        ui_amount, gauge.symbol, gauge.name
    );

    send_action(
        config,
        &connection,
        gauge.address,
        ActionRequest::ApproveAndStake {
            vault: gauge.vault_address,
            amount,
        },
    )
    .await?;

    Ok(())
}

pub async fn gauge_unstake(config: &Config, gauge: Address, ui_amount: &str) -> Result<()> {
    let service = GaugeService::new(config.client.clone(), config.deployment.clone());
    let gauge = service.gauge(gauge).await?;
    let connection = config.connection().await?;
    let account = connection.account();

    let amount = ui_to_native(ui_amount, gauge.decimals)?;
    let position = service.position(account, &gauge).await?;
    check_amount(amount, Some(position.deposit.raw))?;

    send_action(
        config,
        &connection,
        gauge.address,
        ActionRequest::Unstake { account, amount },
    )
    .await?;

    Ok(())
}

pub async fn gauge_claim(config: &Config, gauge: Address) -> Result<()> {
    let connection = config.connection().await?;

    send_action(config, &connection, gauge, ActionRequest::ClaimRewards).await?;

    Ok(())
}
