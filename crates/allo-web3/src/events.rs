//! Receipt Event Decoding Module
//!
//! Finds and decodes a named event among the logs of a mined receipt.

use tracing::{debug, instrument, warn};
use web3::ethabi::{self, Contract, RawLog, Token};
use web3::types::{Address, H256, U256};

use crate::error::ContractError;
use crate::types::Receipt;

/// Decode the first `event` emitted by `emitter` in `receipt`.
///
/// Logs from other contracts or with a different signature are skipped.
/// Returns `None` when no matching log decodes cleanly.
#[instrument(level = "debug", skip(receipt, abi))]
pub fn event_values(
    receipt: &Receipt,
    abi: &Contract,
    event: &str,
    emitter: Address,
) -> Option<ethabi::Log> {
    let event = abi.event(event).ok()?;
    let signature = event.signature();

    for log in receipt
        .logs
        .iter()
        .filter(|log| log.address == emitter && log.topics.first() == Some(&signature))
    {
        let raw = RawLog {
            topics: log.topics.clone(),
            data: log.data.clone(),
        };
        match event.parse_log(raw) {
            Ok(decoded) => {
                debug!("✅ Decoded {} from {:?}", event.name, receipt.transaction_hash);
                return Some(decoded);
            }
            Err(e) => warn!("❌ Malformed {} log: {}", event.name, e),
        }
    }
    None
}

fn param<'a>(
    log: &'a ethabi::Log,
    event: &'static str,
    field: &'static str,
) -> Result<&'a Token, ContractError> {
    log.params
        .iter()
        .find(|p| p.name == field)
        .map(|p| &p.value)
        .ok_or(ContractError::MalformedEvent { event, field })
}

/// Read a `bytes32` field from a decoded event
pub fn bytes32_param(
    log: &ethabi::Log,
    event: &'static str,
    field: &'static str,
) -> Result<H256, ContractError> {
    match param(log, event, field)? {
        Token::FixedBytes(bytes) if bytes.len() == 32 => Ok(H256::from_slice(bytes)),
        _ => Err(ContractError::MalformedEvent { event, field }),
    }
}

/// Read a `uint256` field from a decoded event
pub fn uint_param(
    log: &ethabi::Log,
    event: &'static str,
    field: &'static str,
) -> Result<U256, ContractError> {
    match param(log, event, field)? {
        Token::Uint(value) => Ok(*value),
        _ => Err(ContractError::MalformedEvent { event, field }),
    }
}
