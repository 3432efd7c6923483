use assert_matches::assert_matches;
use fixtures::prelude::*;
use pretty_assertions::assert_eq;
use veyfi_client::{
    abi::{IGauge, IVotingEscrow},
    error::RpcError,
    multicall::Multicall,
};

#[tokio::test]
async fn results_come_back_in_order() -> anyhow::Result<()> {
    let test_f = TestFixture::new();
    let escrow = test_f.deployment.voting_escrow;
    let gauge = test_f.gauge(0).address;

    let mut batch = Multicall::new();
    batch
        .add(escrow, &IVotingEscrow::supplyCall {})
        .add(gauge, &IGauge::nameCall {})
        .add(escrow, &IVotingEscrow::decimalsCall {});
    assert_eq!(batch.len(), 3);

    let mut results = batch
        .call(test_f.chain.as_ref(), test_f.deployment.multicall)
        .await?;

    assert_eq!(results.decode::<IVotingEscrow::supplyCall>()?._0, yfi(10_000));
    assert_eq!(results.decode::<IGauge::nameCall>()?._0, "Gauge 1");
    assert_eq!(results.decode::<IVotingEscrow::decimalsCall>()?._0, 18);
    assert!(results.is_empty());
    assert_matches!(
        results.decode::<IVotingEscrow::supplyCall>(),
        Err(RpcError::MissingResult(_))
    );

    Ok(())
}

#[tokio::test]
async fn one_failure_does_not_spoil_the_batch() -> anyhow::Result<()> {
    let test_f = TestFixture::new();
    let escrow = test_f.deployment.voting_escrow;
    test_f.chain.reverts::<IVotingEscrow::supplyCall>(escrow, "boom");

    let mut batch = Multicall::new();
    batch
        .add(escrow, &IVotingEscrow::supplyCall {})
        .add(escrow, &IVotingEscrow::symbolCall {});

    let mut results = batch
        .call(test_f.chain.as_ref(), test_f.deployment.multicall)
        .await?;

    assert_matches!(
        results.decode::<IVotingEscrow::supplyCall>(),
        Err(RpcError::Reverted { .. })
    );
    assert_eq!(results.decode::<IVotingEscrow::symbolCall>()?._0, "veYFI");

    Ok(())
}

#[tokio::test]
async fn transport_failure_fails_the_whole_batch() {
    let test_f = TestFixture::new();
    test_f.chain.set_offline(true);

    let mut batch = Multicall::new();
    batch.add(test_f.deployment.voting_escrow, &IVotingEscrow::supplyCall {});

    let res = batch
        .call(test_f.chain.as_ref(), test_f.deployment.multicall)
        .await;
    assert_matches!(res, Err(RpcError::Rpc { .. }));
}

#[tokio::test]
async fn empty_batch_makes_no_call() -> anyhow::Result<()> {
    let test_f = TestFixture::new();

    let results = Multicall::new()
        .call(test_f.chain.as_ref(), test_f.deployment.multicall)
        .await?;

    assert!(results.is_empty());
    assert!(test_f.chain.calls().is_empty());

    Ok(())
}
