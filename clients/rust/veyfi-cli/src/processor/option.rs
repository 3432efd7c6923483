use {
    crate::{
        config::Config,
        utils::{check_amount, ensure_allowance, fmt_amount, fmt_optional, send_action, ui_to_native},
    },
    anyhow::{bail, Result},
    fixed::types::I80F48,
    veyfi_client::{
        actions::{balance_of, ActionRequest},
        services::OptionService,
    },
    veyfitypecrate::{constants::YFI_DECIMALS, types::NormalizedAmount},
};

pub async fn option_get(config: &Config) -> Result<()> {
    let account = config.read_account().await;
    let snapshot = OptionService::new(config.client.clone(), config.deployment.clone())
        .refresh(account)
        .await;

    let discount = snapshot
        .discount
        .map(|discount| format!("{:.2}%", discount.normalized() * I80F48::from_num(100)))
        .unwrap_or_else(|| "-".to_string());

    println!(
        r#"
dYFI Options: {}
    Discount: {}
    dYFI Balance: {}"#,
        config.deployment.options,
        discount,
        fmt_optional(snapshot.dyfi_balance.as_ref(), "dYFI"),
    );

    Ok(())
}

pub async fn option_quote(config: &Config, ui_amount: &str) -> Result<()> {
    let amount = ui_to_native(ui_amount, YFI_DECIMALS)?;
    let eth_required = OptionService::new(config.client.clone(), config.deployment.clone())
        .required_eth(amount)
        .await;

    println!(
        "Redeeming {} takes {}",
        fmt_amount(&NormalizedAmount::new(amount, YFI_DECIMALS), "dYFI"),
        fmt_amount(&NormalizedAmount::new(eth_required, 18), "ETH"),
    );

    Ok(())
}

/// Exercises `amount` dYFI for YFI, paying the quoted ETH.
pub async fn option_redeem(config: &Config, ui_amount: &str) -> Result<()> {
    let deployment = &config.deployment;
    let connection = config.connection().await?;
    let account = connection.account();

    let amount = ui_to_native(ui_amount, YFI_DECIMALS)?;
    let balance = balance_of(&connection, deployment.dyfi).await?;
    check_amount(amount, Some(balance))?;

    if !ensure_allowance(config, &connection, deployment.dyfi, deployment.options, amount).await? {
        return Ok(());
    }

    let eth_required = OptionService::new(config.client.clone(), deployment.clone())
        .required_eth(amount)
        .await;
    if eth_required.is_zero() {
        bail!("Could not quote the ETH required to redeem");
    }

    println!(
        "Redeeming {} for {}",
        fmt_amount(&NormalizedAmount::new(amount, YFI_DECIMALS), "dYFI"),
        fmt_amount(&NormalizedAmount::new(eth_required, 18), "ETH"),
    );

    send_action(
        config,
        &connection,
        deployment.options,
        ActionRequest::Redeem {
            account,
            amount,
            eth_required,
        },
    )
    .await?;

    Ok(())
}
