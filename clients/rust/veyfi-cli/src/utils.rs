use {
    crate::config::Config,
    alloy_primitives::{Address, B256, U256},
    anyhow::{anyhow, bail, Context, Result},
    log::info,
    std::collections::HashMap,
    veyfi_client::{
        actions::{allowance_of, execute, Action, ActionRequest},
        connection::Connection,
        error::PreconditionError,
        prelude::*,
    },
    veyfitypecrate::{
        constants::{MAX_LOCK_TIME_WEEKS, MIN_LOCK_TIME_WEEKS},
        types::{parse_units, AllowanceKey, NormalizedAmount},
        validation::{validate_address, validate_allowance, AllowanceValidation},
    },
};

/// Argument parser for addresses. Mixed-case input must be checksummed.
pub fn parse_address(value: &str) -> Result<Address, String> {
    let validation = validate_address(Some(value));
    if !validation.is_valid() {
        return Err(validation
            .error
            .unwrap_or_else(|| "Missing address".to_string()));
    }
    value.trim().parse().map_err(|err| format!("{err}"))
}

/// Parses a decimal amount typed by the user into base units.
pub fn ui_to_native(ui_amount: &str, decimals: u8) -> Result<U256> {
    parse_units(ui_amount, decimals).with_context(|| format!("Invalid amount \"{ui_amount}\""))
}

/// Rejects zero amounts and amounts above `balance`. Both are checked in base
/// units so a single wei is never rounded away.
pub fn check_amount(amount: U256, balance: Option<U256>) -> Result<()> {
    if amount.is_zero() {
        bail!("Amount is 0");
    }

    if balance.is_some_and(|balance| amount > balance) {
        bail!("Insufficient balance");
    }

    Ok(())
}

pub fn check_lock_weeks(weeks: u64) -> Result<()> {
    if !(MIN_LOCK_TIME_WEEKS..=MAX_LOCK_TIME_WEEKS).contains(&weeks) {
        bail!("Lock duration must be between {MIN_LOCK_TIME_WEEKS} and {MAX_LOCK_TIME_WEEKS} weeks");
    }
    Ok(())
}

pub fn status_printer() -> StatusReporter {
    StatusReporter::new(|status| {
        if status.pending {
            info!("transaction pending");
        } else if status.error {
            info!("transaction failed");
        }
    })
}

/// Prints the outcome of an action, failing on anything but success.
pub fn process_response(
    response: Result<TxResponse, PreconditionError>,
    tx_mode: TxMode,
) -> Result<Option<B256>> {
    let response = response?;

    if !response.is_successful {
        return Err(response
            .error
            .map(anyhow::Error::from)
            .unwrap_or_else(|| anyhow!("Transaction failed")));
    }

    match (tx_mode, response.hash) {
        (TxMode::DryRun, _) => println!("Simulation succeeded, nothing was sent"),
        (TxMode::Normal, Some(hash)) => println!("Transaction confirmed: {hash}"),
        (TxMode::Normal, None) => println!("Transaction confirmed"),
    }

    Ok(response.hash)
}

/// Runs `action`, printing the outcome.
pub async fn send_action<C: ChainClient>(
    config: &Config,
    connection: &Connection<C>,
    contract: Address,
    request: ActionRequest,
) -> Result<Option<B256>> {
    let action = Action::new(config.deployment.chain_id, contract, request);
    let status = status_printer();
    process_response(
        execute(Some(connection), &action, &status).await,
        config.get_tx_mode(),
    )
}

/// Approves `spender` for `amount` of `token` unless the current allowance covers it.
///
/// Returns `false` when the approval was only simulated: a dry run of a write
/// spending the allowance would revert, so callers stop there.
pub async fn ensure_allowance<C: ChainClient>(
    config: &Config,
    connection: &Connection<C>,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<bool> {
    let chain_id = config.deployment.chain_id;
    let owner = connection.account();

    let allowance = allowance_of(connection, token, spender).await?;
    let allowances = HashMap::from([(AllowanceKey::new(chain_id, token, spender, owner), allowance)]);

    let validation = validate_allowance(&AllowanceValidation {
        owner,
        token,
        spender,
        chain_id,
        allowances: &allowances,
        amount,
    });
    if validation.is_valid() {
        return Ok(true);
    }

    println!("Approving {spender} to spend {amount} of {token}");
    send_action(
        config,
        connection,
        token,
        ActionRequest::Approve { spender, amount },
    )
    .await?;

    if config.get_tx_mode() == TxMode::DryRun {
        println!("Skipping the follow-up simulation, it needs the approval to be mined");
        return Ok(false);
    }

    Ok(true)
}

pub fn fmt_amount(amount: &NormalizedAmount, symbol: &str) -> String {
    format!("{amount} {symbol}")
}

pub fn fmt_optional(amount: Option<&NormalizedAmount>, symbol: &str) -> String {
    amount
        .map(|amount| fmt_amount(amount, symbol))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::prelude::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use test_case::test_case;

    fn yfi(amount: u64) -> U256 {
        U256::from(amount) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn parses_addresses() {
        assert_eq!(
            parse_address("0x90c1f9220d90d3966FbeE24045EDd73E1d588aD5"),
            Ok(veyfitypecrate::constants::VEYFI_ADDRESS)
        );
        assert_eq!(
            parse_address("0x90c1f9220d90d3966fbee24045edd73e1d588ad5"),
            Ok(veyfitypecrate::constants::VEYFI_ADDRESS)
        );
        assert_eq!(
            parse_address("0x90C1f9220d90d3966FbeE24045EDd73E1d588aD5"),
            Err("Invalid Address".to_string())
        );
        assert_eq!(parse_address(""), Err("Missing address".to_string()));
    }

    #[test]
    fn parses_ui_amounts() {
        assert_eq!(ui_to_native("1.5", 18).unwrap(), yfi(3) / U256::from(2u64));
        assert!(ui_to_native("abc", 18).is_err());
    }

    #[test_case(U256::ZERO, None, Some("Amount is 0") ; "zero amount")]
    #[test_case(yfi(2), Some(yfi(1)), Some("Insufficient balance") ; "above balance")]
    #[test_case(yfi(1) + U256::from(1u8), Some(yfi(1)), Some("Insufficient balance") ; "one wei above balance")]
    #[test_case(U256::ZERO, Some(yfi(1)), Some("Amount is 0") ; "zero amount with balance")]
    #[test_case(U256::from(1u8), Some(yfi(1)), None ; "one wei")]
    #[test_case(yfi(1), Some(yfi(1)), None ; "whole balance")]
    #[test_case(yfi(5), None, None ; "no balance known")]
    fn checks_amounts(amount: U256, balance: Option<U256>, error: Option<&str>) {
        let res = check_amount(amount, balance);
        assert_eq!(res.err().map(|err| err.to_string()).as_deref(), error);
    }

    #[test_case(0, false)]
    #[test_case(1, true)]
    #[test_case(208, true)]
    #[test_case(209, false)]
    fn checks_lock_weeks(weeks: u64, ok: bool) {
        assert_eq!(check_lock_weeks(weeks).is_ok(), ok);
    }

    fn test_config(test_f: &TestFixture, dry_run: bool) -> Config {
        Config {
            deployment: test_f.deployment.clone(),
            client: Arc::new(HttpChainClient::new("http://127.0.0.1:8545")),
            account: Some(USER),
            settings: ClientSettings::default(),
            dry_run,
        }
    }

    #[tokio::test]
    async fn dry_run_approval_stops_the_follow_up() -> anyhow::Result<()> {
        let test_f = TestFixture::new();
        let config = test_config(&test_f, true);
        let connection = test_f.connection().with_mode(TxMode::DryRun);
        let deployment = &test_f.deployment;

        let proceed =
            ensure_allowance(&config, &connection, deployment.yfi, deployment.voting_escrow, yfi(2))
                .await?;

        assert!(!proceed);
        assert!(test_f.chain.sent().is_empty());
        assert_eq!(test_f.yfi.allowance(USER, deployment.voting_escrow), U256::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn covered_allowance_needs_no_approval() -> anyhow::Result<()> {
        let test_f = TestFixture::new();
        let config = test_config(&test_f, true);
        let connection = test_f.connection().with_mode(TxMode::DryRun);
        let deployment = &test_f.deployment;
        test_f
            .yfi
            .set_allowance(USER, deployment.voting_escrow, yfi(2));

        let proceed =
            ensure_allowance(&config, &connection, deployment.yfi, deployment.voting_escrow, yfi(2))
                .await?;

        assert!(proceed);
        assert_eq!(test_f.chain.calls().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn sent_approval_lets_the_follow_up_run() -> anyhow::Result<()> {
        let test_f = TestFixture::new();
        let config = test_config(&test_f, false);
        let connection = test_f.connection();
        let deployment = &test_f.deployment;

        let proceed =
            ensure_allowance(&config, &connection, deployment.dyfi, deployment.options, yfi(4))
                .await?;

        assert!(proceed);
        assert_eq!(test_f.chain.sent().len(), 1);
        assert_eq!(test_f.dyfi.allowance(USER, deployment.options), yfi(4));

        Ok(())
    }

    #[test]
    fn dry_run_without_hash_is_fine() {
        let hash = process_response(Ok(TxResponse::success(None)), TxMode::DryRun).unwrap();
        assert_eq!(hash, None);

        let err = process_response(Err(PreconditionError::Zero("Amount")), TxMode::Normal)
            .unwrap_err();
        assert_eq!(err.to_string(), "Amount is 0");
    }
}
