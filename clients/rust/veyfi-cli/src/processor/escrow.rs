use {
    crate::{
        config::Config,
        utils::{
            check_amount, check_lock_weeks, ensure_allowance, fmt_amount, send_action,
            ui_to_native,
        },
    },
    alloy_primitives::U256,
    anyhow::Result,
    fixed::types::I80F48,
    veyfi_client::{
        actions::{balance_of, withdraw_penalty, ActionRequest},
        services::VotingEscrowService,
    },
    veyfitypecrate::{
        constants::YFI_DECIMALS,
        time::{format_date_short, now_ms, to_milliseconds, unlock_time_for_weeks, weeks_until},
        types::{AllowanceKey, NormalizedAmount},
    },
};

pub async fn escrow_get(config: &Config) -> Result<()> {
    let deployment = &config.deployment;
    let account = config.read_account().await;
    let service = VotingEscrowService::new(config.client.clone(), deployment.clone());
    let snapshot = service.refresh(account).await;

    match &snapshot.escrow {
        Some(escrow) => println!(
            r#"
Voting Escrow: {}
    Name: {} ({})
    Token: {}
    Supply: {}
    Reward Pool: {}"#,
            escrow.address,
            escrow.name,
            escrow.symbol,
            escrow.token,
            fmt_amount(
                &NormalizedAmount::new(escrow.supply, escrow.decimals),
                "YFI"
            ),
            escrow.reward_pool,
        ),
        None => println!("Voting escrow could not be read"),
    }

    let Some(account) = account else {
        return Ok(());
    };

    let Some(position) = snapshot.position else {
        println!("Position of {account} could not be read");
        return Ok(());
    };

    let now = now_ms();
    let allowance = snapshot
        .allowances
        .get(&AllowanceKey::new(
            deployment.chain_id,
            deployment.yfi,
            deployment.voting_escrow,
            account,
        ))
        .copied()
        .unwrap_or_default();
    let unlock = if position.has_lock() {
        format!(
            "{} ({} weeks)",
            format_date_short(position.unlock_time_ms),
            weeks_until(now, position.unlock_time_ms)
        )
    } else {
        "-".to_string()
    };

    println!(
        r#"
Position of {}
    Locked: {}
    veYFI: {}
    Voting Power (estimated): {}
    Unlocks: {}
    Early Exit Penalty: {} ({:.2}%)
    Withdrawable: {}
    YFI Allowance: {}"#,
        account,
        fmt_amount(&NormalizedAmount::new(position.underlying_balance, YFI_DECIMALS), "YFI"),
        fmt_amount(&NormalizedAmount::new(position.balance, YFI_DECIMALS), "veYFI"),
        fmt_amount(&NormalizedAmount::new(position.voting_power(now), YFI_DECIMALS), "veYFI"),
        unlock,
        fmt_amount(&NormalizedAmount::new(position.penalty, YFI_DECIMALS), "YFI"),
        position.penalty_ratio() * I80F48::from_num(100),
        fmt_amount(&NormalizedAmount::new(position.withdrawable, YFI_DECIMALS), "YFI"),
        fmt_amount(&NormalizedAmount::new(allowance, YFI_DECIMALS), "YFI"),
    );

    Ok(())
}

pub async fn escrow_lock(config: &Config, ui_amount: &str, weeks: u64) -> Result<()> {
    check_lock_weeks(weeks)?;
    let deployment = &config.deployment;
    let connection = config.connection().await?;

    let amount = ui_to_native(ui_amount, YFI_DECIMALS)?;
    let balance = balance_of(&connection, deployment.yfi).await?;
    check_amount(amount, Some(balance))?;

    let approved =
        ensure_allowance(config, &connection, deployment.yfi, deployment.voting_escrow, amount).await?;
    if !approved {
        return Ok(());
    }

    let unlock_time = unlock_time_for_weeks(now_ms(), weeks);
    println!(
        "Locking {} until {}",
        fmt_amount(&NormalizedAmount::new(amount, YFI_DECIMALS), "YFI"),
        format_date_short(to_milliseconds(unlock_time))
    );

    send_action(
        config,
        &connection,
        deployment.voting_escrow,
        ActionRequest::Lock {
            amount,
            unlock_time: U256::from(unlock_time),
        },
    )
    .await?;

    Ok(())
}

pub async fn escrow_increase(config: &Config, ui_amount: &str) -> Result<()> {
    let deployment = &config.deployment;
    let connection = config.connection().await?;

    let amount = ui_to_native(ui_amount, YFI_DECIMALS)?;
    let balance = balance_of(&connection, deployment.yfi).await?;
    check_amount(amount, Some(balance))?;

    let approved =
        ensure_allowance(config, &connection, deployment.yfi, deployment.voting_escrow, amount).await?;
    if !approved {
        return Ok(());
    }

    send_action(
        config,
        &connection,
        deployment.voting_escrow,
        ActionRequest::IncreaseLock { amount },
    )
    .await?;

    Ok(())
}

pub async fn escrow_extend(config: &Config, weeks: u64) -> Result<()> {
    check_lock_weeks(weeks)?;
    let connection = config.connection().await?;

    let unlock_time = unlock_time_for_weeks(now_ms(), weeks);
    println!("Extending lock until {}", format_date_short(to_milliseconds(unlock_time)));

    send_action(
        config,
        &connection,
        config.deployment.voting_escrow,
        ActionRequest::ExtendLock {
            unlock_time: U256::from(unlock_time),
        },
    )
    .await?;

    Ok(())
}

/// `locked` exits early and pays the penalty, otherwise the withdrawal is refused while one applies.
pub async fn escrow_withdraw(config: &Config, locked: bool) -> Result<()> {
    let escrow = config.deployment.voting_escrow;
    let connection = config.connection().await?;

    let request = if locked {
        let penalty = withdraw_penalty(&connection, escrow).await;
        if !penalty.is_zero() {
            println!(
                "Withdrawing early, {} will be forfeited",
                fmt_amount(&NormalizedAmount::new(penalty, YFI_DECIMALS), "YFI")
            );
        }
        ActionRequest::WithdrawLocked
    } else {
        ActionRequest::WithdrawUnlocked
    };

    send_action(config, &connection, escrow, request).await?;

    Ok(())
}
