//! Pool bootstrap sequencing with every collaborator mocked.

mod common;

use std::sync::{Arc, Mutex};

use allo_ipfs::Pointer;
use allo_starter::{AlloError, PoolBootstrap, PoolTemplate};
use allo_web3::prelude::*;
use common::*;
use mockall::predicate::*;
use mockall::Sequence;
use serde_json::Value;
use test_log::test;

fn template() -> PoolTemplate {
    PoolTemplate::default()
}

fn profile_id() -> H256 {
    H256::from_low_u64_be(0xabc)
}

#[test(tokio::test)]
async fn end_to_end_returns_pool_id() {
    let mut seq = Sequence::new();

    let mut profiles = MockProfiles::new();
    profiles
        .expect_create_profile()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(profile_id()));

    let mut pinner = MockPinner::new();
    pinner
        .expect_pin_json()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Pointer::new("bafy123")));

    let mut deployer = MockDeployer::new();
    deployer
        .expect_deploy()
        .with(eq(Pointer::new("bafy123")), eq(profile_id()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(U256::from(42)));

    let bootstrap = PoolBootstrap::new(profiles, pinner, deployer, template());
    let pool_id = bootstrap.bootstrap(profile_args(1)).await.unwrap();

    assert_eq!(pool_id, U256::from(42));
}

#[test(tokio::test)]
async fn metadata_carries_profile_id() {
    let pinned: Arc<Mutex<Vec<Value>>> = Arc::default();

    let mut profiles = MockProfiles::new();
    profiles.expect_create_profile().returning(|_| Ok(profile_id()));

    let mut pinner = MockPinner::new();
    let seen = pinned.clone();
    pinner.expect_pin_json().returning(move |doc| {
        seen.lock().unwrap().push(doc.clone());
        Ok(Pointer::new("bafy123"))
    });

    let mut deployer = MockDeployer::new();
    deployer.expect_deploy().returning(|_, _| Ok(U256::one()));

    let bootstrap = PoolBootstrap::new(profiles, pinner, deployer, template());
    bootstrap.bootstrap(profile_args(1)).await.unwrap();

    let pinned = pinned.lock().unwrap();
    assert_eq!(pinned.len(), 1);
    let doc = &pinned[0];
    assert_eq!(doc["profileId"], serde_json::to_value(profile_id()).unwrap());
    assert_eq!(doc["name"], "Allo Starter Kit");
    assert_eq!(doc["website"], "https://allo.gitcoin.co");
    assert_eq!(doc["description"], "A starter kit for Allo");
}

#[test(tokio::test)]
async fn profile_failure_stops_the_flow() {
    let mut profiles = MockProfiles::new();
    profiles
        .expect_create_profile()
        .returning(|_| Err(AlloError::ProfileCreationFailed("no event".into())));

    let mut pinner = MockPinner::new();
    pinner.expect_pin_json().never();
    let mut deployer = MockDeployer::new();
    deployer.expect_deploy().never();

    let bootstrap = PoolBootstrap::new(profiles, pinner, deployer, template());
    let err = bootstrap.bootstrap(profile_args(1)).await.unwrap_err();

    assert!(matches!(err, AlloError::ProfileCreationFailed(_)));
}

#[test(tokio::test)]
async fn pin_failure_skips_deployment() {
    let mut profiles = MockProfiles::new();
    profiles.expect_create_profile().returning(|_| Ok(profile_id()));

    let mut pinner = MockPinner::new();
    pinner
        .expect_pin_json()
        .times(1)
        .returning(|_| Err(allo_ipfs::Error::Timeout("pin".into())));

    let mut deployer = MockDeployer::new();
    deployer.expect_deploy().never();

    let bootstrap = PoolBootstrap::new(profiles, pinner, deployer, template());
    let err = bootstrap.bootstrap(profile_args(1)).await.unwrap_err();

    assert!(matches!(err, AlloError::Pinning(_)));
    assert!(err.is_retryable());
}

#[test(tokio::test)]
async fn deployer_failure_is_wrapped_once() {
    let mut profiles = MockProfiles::new();
    profiles.expect_create_profile().returning(|_| Ok(profile_id()));
    let mut pinner = MockPinner::new();
    pinner.expect_pin_json().returning(|_| Ok(Pointer::new("bafy123")));

    let mut deployer = MockDeployer::new();
    deployer
        .expect_deploy()
        .returning(|_, _| Err(AlloError::deployment(AlloError::TransactionReverted(H256::zero()))));

    let bootstrap = PoolBootstrap::new(profiles, pinner, deployer, template());
    let err = bootstrap.bootstrap(profile_args(1)).await.unwrap_err();

    match err {
        AlloError::Deployment(inner) => assert!(matches!(*inner, AlloError::TransactionReverted(_))),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test(tokio::test)]
async fn inline_image_is_pinned_first() {
    let pinned: Arc<Mutex<Vec<Value>>> = Arc::default();

    let mut profiles = MockProfiles::new();
    profiles.expect_create_profile().returning(|_| Ok(profile_id()));

    let mut pinner = MockPinner::new();
    let seen = pinned.clone();
    pinner.expect_pin_json().times(2).returning(move |doc| {
        let mut seen = seen.lock().unwrap();
        seen.push(doc.clone());
        Ok(Pointer::new(if seen.len() == 1 { "bafyimage" } else { "bafy123" }))
    });

    let mut deployer = MockDeployer::new();
    deployer
        .expect_deploy()
        .with(eq(Pointer::new("bafy123")), eq(profile_id()))
        .returning(|_, _| Ok(U256::from(7)));

    let template = PoolTemplate {
        image: Some("data:image/png;base64,iVBORw0KGgo=".into()),
        ..PoolTemplate::default()
    };
    let bootstrap = PoolBootstrap::new(profiles, pinner, deployer, template);
    assert_eq!(bootstrap.bootstrap(profile_args(1)).await.unwrap(), U256::from(7));

    let pinned = pinned.lock().unwrap();
    assert_eq!(pinned[0]["data"], "data:image/png;base64,iVBORw0KGgo=");
    assert_eq!(pinned[1]["base64Image"], "bafyimage");
}
