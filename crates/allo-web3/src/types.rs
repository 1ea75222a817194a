//! Chain Types Module
//!
//! Transaction and receipt shapes shared between the chain client and the
//! contract bindings. Receipts are kept independent of the `web3` response
//! types so that collaborators can be substituted in tests.

use serde::{Deserialize, Serialize};
use web3::types::{Address, Bytes, H256, U256};

/// An unsigned call produced by a contract binding.
///
/// `to` is `None` for contract creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    /// Destination contract
    pub to: Option<Address>,
    /// ABI-encoded call data (or creation bytecode)
    pub data: Bytes,
    /// Native value attached to the call
    pub value: U256,
}

impl TransactionData {
    /// Call to an existing contract with no attached value
    pub fn call(to: Address, data: Vec<u8>) -> Self {
        Self {
            to: Some(to),
            data: Bytes(data),
            value: U256::zero(),
        }
    }

    /// Contract creation transaction
    pub fn create(bytecode: Vec<u8>) -> Self {
        Self {
            to: None,
            data: Bytes(bytecode),
            value: U256::zero(),
        }
    }
}

/// A single log entry of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    /// Emitting contract
    pub address: Address,
    /// Indexed topics, `topics[0]` being the event signature
    pub topics: Vec<H256>,
    /// Non-indexed ABI-encoded payload
    pub data: Vec<u8>,
}

/// A mined transaction receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction hash
    pub transaction_hash: H256,
    /// Block the transaction was included in
    pub block_number: u64,
    /// `Some(true)` on success, `Some(false)` when reverted, `None` for
    /// pre-Byzantium receipts
    pub status: Option<bool>,
    /// Address of the created contract, if any
    pub contract_address: Option<Address>,
    /// Emitted logs
    pub logs: Vec<ReceiptLog>,
}

impl Receipt {
    /// Whether the receipt reports a revert
    pub fn reverted(&self) -> bool {
        self.status == Some(false)
    }
}

impl From<web3::types::TransactionReceipt> for Receipt {
    fn from(receipt: web3::types::TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|n| n.as_u64()).unwrap_or_default(),
            status: receipt.status.map(|s| !s.is_zero()),
            contract_address: receipt.contract_address,
            logs: receipt
                .logs
                .into_iter()
                .map(|log| ReceiptLog {
                    address: log.address,
                    topics: log.topics,
                    data: log.data.0,
                })
                .collect(),
        }
    }
}
