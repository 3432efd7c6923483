//! Contract writes. Each request is checked locally before anything touches the
//! network; a failed check is returned as `Err`, everything after that is
//! captured in the `TxResponse`.

use crate::{
    abi::{IClaimRewardsZap, IERC20, IGauge, IOptions, IRewardPool, IVotingEscrow},
    config::TxMode,
    connection::Connection,
    error::{PreconditionError, RpcError, TxError},
    rpc::{call_contract, ChainClient},
    status::{StatusReporter, TxStatus},
    tx::{handle_tx, handle_tx_step, ContractWrite, TxResponse},
};
use alloy_primitives::{Address, U256};
use log::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    /// New lock. `unlock_time` is a week-aligned timestamp in seconds.
    Lock { amount: U256, unlock_time: U256 },
    IncreaseLock { amount: U256 },
    ExtendLock { unlock_time: U256 },
    /// Refuses to submit while the escrow would charge a penalty.
    WithdrawUnlocked,
    /// Early exit, the penalty is paid.
    WithdrawLocked,
    /// `contract` is the gauge, `vault` the token staked into it.
    ApproveAndStake { vault: Address, amount: U256 },
    Stake { amount: U256 },
    Unstake { account: Address, amount: U256 },
    ClaimRewards,
    /// `claim(account)` on a reward pool, the dYFI boost pool or the YFI exit pool.
    ClaimBoostRewards,
    ClaimAllRewards {
        gauges: Vec<Address>,
        lock: bool,
        claim_ve_yfi: bool,
    },
    Redeem {
        account: Address,
        amount: U256,
        eth_required: U256,
    },
    /// ERC-20 approval, `contract` is the token.
    Approve { spender: Address, amount: U256 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub chain_id: u64,
    pub contract: Address,
    pub request: ActionRequest,
}

impl Action {
    pub fn new(chain_id: u64, contract: Address, request: ActionRequest) -> Self {
        Self {
            chain_id,
            contract,
            request,
        }
    }
}

fn assert_address(field: &'static str, address: Address) -> Result<(), PreconditionError> {
    if address.is_zero() {
        return Err(PreconditionError::InvalidAddress { field, address });
    }
    Ok(())
}

fn assert_positive(field: &'static str, value: U256) -> Result<(), PreconditionError> {
    if value.is_zero() {
        return Err(PreconditionError::Zero(field));
    }
    Ok(())
}

pub fn check_preconditions<'a, C>(
    connection: Option<&'a Connection<C>>,
    action: &Action,
) -> Result<&'a Connection<C>, PreconditionError>
where
    C: ChainClient,
{
    let connection = connection.ok_or(PreconditionError::MissingConnection)?;
    assert_address("contractAddress", action.contract)?;
    assert_address("signerAddress", connection.account())?;

    match &action.request {
        ActionRequest::Lock {
            amount,
            unlock_time,
        } => {
            assert_positive("Time", *unlock_time)?;
            assert_positive("Amount", *amount)?;
        }
        ActionRequest::IncreaseLock { amount } | ActionRequest::Stake { amount } => {
            assert_positive("Amount", *amount)?;
        }
        ActionRequest::ExtendLock { unlock_time } => {
            assert_positive("Time", *unlock_time)?;
        }
        ActionRequest::WithdrawUnlocked
        | ActionRequest::WithdrawLocked
        | ActionRequest::ClaimRewards
        | ActionRequest::ClaimBoostRewards => {}
        ActionRequest::ApproveAndStake { vault, amount } => {
            assert_address("vaultAddress", *vault)?;
            assert_positive("Amount", *amount)?;
        }
        ActionRequest::Unstake { account, amount } => {
            assert_address("accountAddress", *account)?;
            assert_positive("Amount", *amount)?;
        }
        ActionRequest::ClaimAllRewards { gauges, .. } => {
            for gauge in gauges {
                assert_address("gaugeAddress", *gauge)?;
            }
        }
        ActionRequest::Redeem {
            account,
            amount,
            eth_required,
        } => {
            assert_address("accountAddress", *account)?;
            assert_positive("Amount", *amount)?;
            assert_positive("ethRequired", *eth_required)?;
        }
        ActionRequest::Approve { spender, amount } => {
            assert_address("spenderAddress", *spender)?;
            assert_positive("Amount", *amount)?;
        }
    }

    Ok(connection)
}

/// Runs `action` for the connected account. `Err` only for failed preconditions,
/// in which case nothing was sent.
pub async fn execute<C: ChainClient>(
    connection: Option<&Connection<C>>,
    action: &Action,
    status: &StatusReporter,
) -> Result<TxResponse, PreconditionError> {
    let connection = check_preconditions(connection, action)?;
    let account = connection.account();
    let contract = action.contract;

    let write = match &action.request {
        ActionRequest::Lock {
            amount,
            unlock_time,
        } => ContractWrite::new(
            contract,
            &IVotingEscrow::modify_lockCall {
                amount: *amount,
                unlock_time: *unlock_time,
                user: account,
            },
        ),
        ActionRequest::IncreaseLock { amount } => ContractWrite::new(
            contract,
            &IVotingEscrow::modify_lockCall {
                amount: *amount,
                unlock_time: U256::ZERO,
                user: account,
            },
        ),
        ActionRequest::ExtendLock { unlock_time } => ContractWrite::new(
            contract,
            &IVotingEscrow::modify_lockCall {
                amount: U256::ZERO,
                unlock_time: *unlock_time,
                user: account,
            },
        ),
        ActionRequest::WithdrawUnlocked => {
            return Ok(withdraw_unlocked(connection, action, status).await);
        }
        ActionRequest::WithdrawLocked => {
            ContractWrite::new(contract, &IVotingEscrow::withdrawCall {})
        }
        ActionRequest::ApproveAndStake { vault, amount } => {
            return Ok(approve_and_stake(connection, action, *vault, *amount, status).await);
        }
        ActionRequest::Stake { amount } => {
            ContractWrite::new(contract, &IGauge::depositCall { assets: *amount })
        }
        ActionRequest::Unstake { account, amount } => ContractWrite::new(
            contract,
            &IGauge::withdrawCall {
                assets: *amount,
                receiver: *account,
                owner: *account,
                claim: false,
            },
        ),
        ActionRequest::ClaimRewards => ContractWrite::new(contract, &IGauge::getRewardCall {}),
        ActionRequest::ClaimBoostRewards => {
            ContractWrite::new(contract, &IRewardPool::claimCall { user: account })
        }
        ActionRequest::ClaimAllRewards {
            gauges,
            lock,
            claim_ve_yfi,
        } => ContractWrite::new(
            contract,
            &IClaimRewardsZap::claimCall {
                gauges: gauges.clone(),
                lock: *lock,
                claim_ve_yfi: *claim_ve_yfi,
            },
        ),
        ActionRequest::Redeem {
            account,
            amount,
            eth_required,
        } => ContractWrite::new(
            contract,
            &IOptions::redeemCall {
                amount: *amount,
                recipient: *account,
            },
        )
        .with_value(*eth_required),
        ActionRequest::Approve { spender, amount } => ContractWrite::new(
            contract,
            &IERC20::approveCall {
                spender: *spender,
                amount: *amount,
            },
        ),
    };

    Ok(handle_tx(connection, action.chain_id, write, status).await)
}

/// How much of `token` the connected account lets `spender` move.
pub async fn allowance_of<C: ChainClient>(
    connection: &Connection<C>,
    token: Address,
    spender: Address,
) -> Result<U256, RpcError> {
    let call = IERC20::allowanceCall {
        owner: connection.account(),
        spender,
    };
    Ok(call_contract(connection.client(), token, &call, None).await?._0)
}

pub async fn balance_of<C: ChainClient>(
    connection: &Connection<C>,
    token: Address,
) -> Result<U256, RpcError> {
    let call = IERC20::balanceOfCall {
        account: connection.account(),
    };
    Ok(call_contract(connection.client(), token, &call, None).await?._0)
}

/// Penalty a withdrawal would pay right now, from a simulated `withdraw()`.
/// A failed simulation counts as no penalty.
pub async fn withdraw_penalty<C: ChainClient>(connection: &Connection<C>, escrow: Address) -> U256 {
    let call = IVotingEscrow::withdrawCall {};
    match call_contract(connection.client(), escrow, &call, Some(connection.account())).await {
        Ok(withdrawn) => withdrawn._0.penalty,
        Err(err) => {
            warn!("withdraw simulation on {escrow} failed, assuming no penalty: {err}");
            U256::ZERO
        }
    }
}

async fn withdraw_unlocked<C: ChainClient>(
    connection: &Connection<C>,
    action: &Action,
    status: &StatusReporter,
) -> TxResponse {
    status.report(TxStatus::pending());

    let penalty = withdraw_penalty(connection, action.contract).await;
    if penalty > U256::ZERO {
        info!("refusing withdrawal, penalty of {penalty} still applies");
        status.report(TxStatus::error());
        status.reset_after(connection.settings().withdraw_penalty_reset);
        return TxResponse::failure(TxError::NotUnlocked(penalty));
    }

    handle_tx(
        connection,
        action.chain_id,
        ContractWrite::new(action.contract, &IVotingEscrow::withdrawCall {}),
        status,
    )
    .await
}

async fn approve_and_stake<C: ChainClient>(
    connection: &Connection<C>,
    action: &Action,
    vault: Address,
    amount: U256,
    status: &StatusReporter,
) -> TxResponse {
    let gauge = action.contract;

    let allowance = match allowance_of(connection, vault, gauge).await {
        Ok(allowance) => allowance,
        Err(err) => {
            warn!("could not read allowance of {gauge} on {vault}: {err}");
            return TxResponse::failure(err.into());
        }
    };

    if allowance < amount {
        let approve = ContractWrite::new(
            vault,
            &IERC20::approveCall {
                spender: gauge,
                amount,
            },
        );
        let approval = handle_tx_step(connection, action.chain_id, approve, status).await;
        if !approval.is_successful {
            status.report(TxStatus::idle());
            return approval;
        }

        // The deposit simulation would revert against the old allowance.
        if connection.mode() == TxMode::DryRun {
            info!("dry run: deposit into {gauge} not simulated, it needs the approval first");
            status.report(TxStatus::idle());
            return approval;
        }
    }

    handle_tx(
        connection,
        action.chain_id,
        ContractWrite::new(gauge, &IGauge::depositCall { assets: amount }),
        status,
    )
    .await
}
