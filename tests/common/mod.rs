//! Mock collaborators and receipt builders shared by the integration tests.

#![allow(dead_code)]

use allo_ipfs::Pointer;
use allo_starter::{ProfileCreator, StrategyDeployer};
use allo_web3::contracts::{ALLO_ABI, REGISTRY_ABI};
use allo_web3::prelude::*;
use allo_web3::web3::ethabi::{self, Contract, Token};
use allo_web3::{CreateProfileArgs, Metadata, ReceiptLog};
use async_trait::async_trait;
use mockall::mock;

mock! {
    pub Chain {}

    #[async_trait]
    impl ChainClient for Chain {
        async fn gas_price(&self) -> allo_web3::error::Result<U256>;
        async fn send_transaction(&self, tx: TransactionData, gas_price: U256) -> allo_web3::error::Result<H256>;
        async fn wait_for_receipt(&self, hash: H256, confirmations: usize) -> allo_web3::error::Result<Receipt>;
    }
}

mock! {
    pub Profiles {}

    #[async_trait]
    impl ProfileCreator for Profiles {
        async fn create_profile(&self, args: CreateProfileArgs) -> allo_starter::Result<H256>;
    }
}

mock! {
    pub Pinner {}

    #[async_trait]
    impl allo_ipfs::Pinner for Pinner {
        async fn pin_json(&self, document: &serde_json::Value) -> allo_ipfs::Result<Pointer>;
    }
}

mock! {
    pub Deployer {}

    #[async_trait]
    impl StrategyDeployer for Deployer {
        async fn deploy(&self, pointer: &Pointer, profile_id: H256) -> allo_starter::Result<U256>;
    }
}

pub const OWNER: Address = Address::repeat_byte(0x1f);

pub fn profile_args(nonce: u64) -> CreateProfileArgs {
    CreateProfileArgs {
        nonce: U256::from(nonce),
        name: "Allo Workshop".into(),
        metadata: Metadata::ipfs("bafybeia4khbew3r2mkflyn7nzlvfzcb3qpfeftz5ivpzfwn77ollj47gqi"),
        members: vec![OWNER],
        owner: OWNER,
    }
}

pub fn receipt(hash: H256, logs: Vec<ReceiptLog>) -> Receipt {
    Receipt {
        transaction_hash: hash,
        block_number: 100,
        status: Some(true),
        contract_address: None,
        logs,
    }
}

pub fn profile_created_log(registry: Address, profile_id: H256) -> ReceiptLog {
    let abi = Contract::load(REGISTRY_ABI.as_bytes()).unwrap();
    let event = abi.event("ProfileCreated").unwrap();
    ReceiptLog {
        address: registry,
        topics: vec![event.signature(), profile_id],
        data: ethabi::encode(&[
            Token::Uint(U256::from(1)),
            Token::String("Allo Workshop".into()),
            Token::Tuple(vec![Token::Uint(U256::one()), Token::String("bafy".into())]),
            Token::Address(OWNER),
            Token::Address(Address::repeat_byte(0xa7)),
        ]),
    }
}

pub fn pool_created_log(allo: Address, pool_id: U256, profile_id: H256) -> ReceiptLog {
    let abi = Contract::load(ALLO_ABI.as_bytes()).unwrap();
    let event = abi.event("PoolCreated").unwrap();
    let mut pool_topic = [0u8; 32];
    pool_id.to_big_endian(&mut pool_topic);
    ReceiptLog {
        address: allo,
        topics: vec![event.signature(), H256(pool_topic), profile_id],
        data: ethabi::encode(&[
            Token::Address(Address::repeat_byte(0x55)),
            Token::Address(Address::repeat_byte(0xee)),
            Token::Uint(U256::zero()),
            Token::Tuple(vec![Token::Uint(U256::one()), Token::String("bafy123".into())]),
        ]),
    }
}
