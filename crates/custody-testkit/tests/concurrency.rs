//! Concurrent validation against one shared ledger.

use std::sync::Arc;

use custody::{CustodyError, ValidationError};
use custody_ledger::{LedgerError, TxStatus};
use custody_testkit::fixtures::{signed_create, signed_transfer, users, FederationFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_validation_agrees_with_sequential() -> anyhow::Result<()> {
    init_tracing();
    let fed = FederationFixture::default();
    let u = users(4);

    let mut candidates = Vec::new();
    for (i, owner) in u.iter().enumerate() {
        let origin = signed_create(owner, &[10], true);
        fed.commit(&origin)?;
        let amount = if i % 2 == 0 { 10 } else { 11 };
        candidates.push(signed_transfer(
            &[owner],
            &origin,
            None,
            vec![(vec![u[(i + 1) % u.len()].public_key()], amount)],
        ));
    }
    let candidates = Arc::new(candidates);

    let mut handles = Vec::new();
    for i in 0..candidates.len() {
        let validator = fed.validator();
        let candidates = Arc::clone(&candidates);
        handles.push(tokio::spawn(async move {
            validator.is_valid_transaction(&candidates[i]).await
        }));
    }

    let validator = fed.validator();
    for (i, handle) in handles.into_iter().enumerate() {
        let parallel = handle.await??;
        let sequential = validator.is_valid_transaction(&candidates[i]).await?;
        assert_eq!(parallel, sequential);
        assert_eq!(parallel, i % 2 == 0);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_conflicting_spends_admitted_once() -> anyhow::Result<()> {
    let fed = FederationFixture::default();
    let u = users(6);

    let origin = signed_create(&u[0], &[1], false);
    fed.commit(&origin)?;

    let spends: Vec<_> = u[1..]
        .iter()
        .map(|to| signed_transfer(&[&u[0]], &origin, None, vec![(vec![to.public_key()], 1)]))
        .collect();

    // Every spend validates while none is admitted.
    for spend in &spends {
        assert!(fed.validator().is_valid_transaction(spend).await?);
    }

    // Admission races; the ledger lets exactly one through.
    let mut handles = Vec::new();
    for spend in spends.clone() {
        let ledger = Arc::clone(&fed.ledger);
        handles.push(tokio::spawn(async move {
            ledger.insert_transaction(spend, TxStatus::Valid)
        }));
    }
    let mut admitted = 0;
    for handle in handles {
        match handle.await? {
            Ok(()) => admitted += 1,
            Err(LedgerError::AlreadySpent { .. }) => {}
            Err(other) => return Err(other.into()),
        }
    }
    assert_eq!(admitted, 1);

    // Afterwards exactly one spend is still valid; the rest are double spends.
    let validator = fed.validator();
    let mut valid = 0;
    for spend in &spends {
        match validator.validate_transaction(spend).await {
            Ok(_) => valid += 1,
            Err(CustodyError::Rejected(ValidationError::DoubleSpend { .. })) => {}
            Err(other) => return Err(other.into()),
        }
    }
    assert_eq!(valid, 1);
    Ok(())
}
