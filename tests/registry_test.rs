//! Profile creation against a mocked chain.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use allo_starter::{AlloError, ProfileCreator, RegistryClient};
use allo_web3::chains::REGISTRY_ADDRESS;
use allo_web3::chains::parse_address;
use allo_web3::prelude::*;
use allo_web3::{predict_profile_id, Registry};
use common::*;
use mockall::predicate::*;
use test_log::test;

fn registry() -> Registry {
    Registry::new(parse_address(REGISTRY_ADDRESS).unwrap()).unwrap()
}

fn tx_hash() -> H256 {
    H256::repeat_byte(0x11)
}

#[test(tokio::test)]
async fn gas_failure_sends_nothing() {
    let mut chain = MockChain::new();
    chain
        .expect_gas_price()
        .times(1)
        .returning(|| Err(ChainError::Provider(Web3Error::Unreachable)));
    chain.expect_send_transaction().never();
    chain.expect_wait_for_receipt().never();

    let client = RegistryClient::new(chain, registry());
    let err = client.create_profile(profile_args(1)).await.unwrap_err();

    assert!(matches!(err, AlloError::GasPriceUnavailable(_)));
    assert!(err.is_retryable());
}

#[test(tokio::test)]
async fn zero_gas_price_is_used_as_quoted() {
    let registry = registry();
    let address = registry.address();
    let args = profile_args(3);
    let expected = predict_profile_id(args.nonce, args.owner);

    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::zero()));
    chain
        .expect_send_transaction()
        .withf(|_, gas_price| gas_price.is_zero())
        .times(1)
        .returning(|_, _| Ok(tx_hash()));
    chain
        .expect_wait_for_receipt()
        .returning(move |hash, _| Ok(receipt(hash, vec![profile_created_log(address, expected)])));

    let client = RegistryClient::new(chain, registry);
    assert_eq!(client.create_profile(args).await.unwrap(), expected);
}

#[test(tokio::test)]
async fn returns_profile_id_after_two_confirmations() {
    let registry = registry();
    let address = registry.address();
    let args = profile_args(7);
    let expected = predict_profile_id(args.nonce, args.owner);

    let mut chain = MockChain::new();
    chain.expect_gas_price().times(1).returning(|| Ok(U256::from(1_000_000_000u64)));
    chain
        .expect_send_transaction()
        .withf(move |tx, gas_price| tx.to == Some(address) && *gas_price == U256::from(1_000_000_000u64))
        .times(1)
        .returning(|_, _| Ok(tx_hash()));
    chain
        .expect_wait_for_receipt()
        .with(eq(tx_hash()), eq(2))
        .times(1)
        .returning(move |hash, _| Ok(receipt(hash, vec![profile_created_log(address, expected)])));

    let client = RegistryClient::new(chain, registry);
    let profile_id = client.create_profile(args).await.unwrap();

    assert_eq!(profile_id, expected);
}

#[test(tokio::test)]
async fn configured_confirmations_are_passed_through() {
    let registry = registry();
    let address = registry.address();

    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::one()));
    chain.expect_send_transaction().returning(|_, _| Ok(tx_hash()));
    chain
        .expect_wait_for_receipt()
        .with(always(), eq(5))
        .times(1)
        .returning(move |hash, _| Ok(receipt(hash, vec![profile_created_log(address, H256::repeat_byte(0xab))])));

    let client = RegistryClient::new(chain, registry).with_confirmations(5);
    assert_eq!(client.create_profile(profile_args(8)).await.unwrap(), H256::repeat_byte(0xab));
}

#[test(tokio::test)]
async fn missing_event_is_profile_creation_failure() {
    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::one()));
    chain.expect_send_transaction().returning(|_, _| Ok(tx_hash()));
    chain
        .expect_wait_for_receipt()
        .returning(|hash, _| Ok(receipt(hash, Vec::new())));

    let client = RegistryClient::new(chain, registry());
    let err = client.create_profile(profile_args(1)).await.unwrap_err();

    assert!(matches!(err, AlloError::ProfileCreationFailed(_)));
    assert!(!err.is_retryable());
}

#[test(tokio::test)]
async fn event_from_another_contract_is_ignored() {
    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::one()));
    chain.expect_send_transaction().returning(|_, _| Ok(tx_hash()));
    chain.expect_wait_for_receipt().returning(|hash, _| {
        Ok(receipt(
            hash,
            vec![profile_created_log(Address::repeat_byte(0x99), H256::repeat_byte(0xab))],
        ))
    });

    let client = RegistryClient::new(chain, registry());
    let err = client.create_profile(profile_args(1)).await.unwrap_err();
    assert!(matches!(err, AlloError::ProfileCreationFailed(_)));
}

#[test(tokio::test)]
async fn zero_profile_id_is_a_failure() {
    let registry = registry();
    let address = registry.address();

    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::one()));
    chain.expect_send_transaction().returning(|_, _| Ok(tx_hash()));
    chain
        .expect_wait_for_receipt()
        .returning(move |hash, _| Ok(receipt(hash, vec![profile_created_log(address, H256::zero())])));

    let client = RegistryClient::new(chain, registry);
    let err = client.create_profile(profile_args(1)).await.unwrap_err();
    assert!(matches!(err, AlloError::ProfileCreationFailed(_)));
}

#[test(tokio::test)]
async fn reverted_receipt_is_reported() {
    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::one()));
    chain.expect_send_transaction().returning(|_, _| Ok(tx_hash()));
    chain.expect_wait_for_receipt().returning(|hash, _| {
        let mut reverted = receipt(hash, Vec::new());
        reverted.status = Some(false);
        Ok(reverted)
    });

    let client = RegistryClient::new(chain, registry());
    let err = client.create_profile(profile_args(1)).await.unwrap_err();
    assert!(matches!(err, AlloError::TransactionReverted(hash) if hash == tx_hash()));
}

#[test(tokio::test)]
async fn send_rejection_skips_receipt_wait() {
    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::one()));
    chain
        .expect_send_transaction()
        .times(1)
        .returning(|_, _| Err(ChainError::Rejected("insufficient funds".into())));
    chain.expect_wait_for_receipt().never();

    let client = RegistryClient::new(chain, registry());
    let err = client.create_profile(profile_args(1)).await.unwrap_err();

    assert!(matches!(err, AlloError::TransactionSend(ChainError::Rejected(_))));
    assert!(!err.is_retryable());
}

#[test(tokio::test)]
async fn receipt_timeout_is_retryable() {
    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::one()));
    chain.expect_send_transaction().returning(|_, _| Ok(tx_hash()));
    chain
        .expect_wait_for_receipt()
        .returning(|hash, _| Err(ChainError::ReceiptTimeout(hash)));

    let client = RegistryClient::new(chain, registry());
    let err = client.create_profile(profile_args(1)).await.unwrap_err();

    assert!(matches!(err, AlloError::ReceiptWait(ChainError::ReceiptTimeout(_))));
    assert!(err.is_retryable());
}

#[test(tokio::test)]
async fn reused_nonce_is_rejected_on_second_attempt() {
    let registry = registry();
    let address = registry.address();
    let args = profile_args(42);
    let expected = predict_profile_id(args.nonce, args.owner);
    let sends = Arc::new(AtomicUsize::new(0));

    let mut chain = MockChain::new();
    chain.expect_gas_price().times(2).returning(|| Ok(U256::one()));
    let counter = sends.clone();
    chain.expect_send_transaction().times(2).returning(move |_, _| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(tx_hash())
        } else {
            Err(ChainError::Rejected("execution reverted: NONCE_NOT_AVAILABLE".into()))
        }
    });
    chain
        .expect_wait_for_receipt()
        .times(1)
        .returning(move |hash, _| Ok(receipt(hash, vec![profile_created_log(address, expected)])));

    let client = RegistryClient::new(chain, registry);
    assert_eq!(client.create_profile(args.clone()).await.unwrap(), expected);

    let err = client.create_profile(args).await.unwrap_err();
    assert!(matches!(err, AlloError::TransactionSend(_)));
    assert_eq!(sends.load(Ordering::SeqCst), 2);
}

#[test(tokio::test)]
async fn shared_chain_client_through_arc() {
    let registry = registry();
    let address = registry.address();

    let mut chain = MockChain::new();
    chain.expect_gas_price().returning(|| Ok(U256::one()));
    chain.expect_send_transaction().returning(|_, _| Ok(tx_hash()));
    chain
        .expect_wait_for_receipt()
        .returning(move |hash, _| Ok(receipt(hash, vec![profile_created_log(address, H256::repeat_byte(0x01))])));

    let client = RegistryClient::new(Arc::new(chain), registry);
    assert_eq!(client.create_profile(profile_args(9)).await.unwrap(), H256::repeat_byte(0x01));
}
