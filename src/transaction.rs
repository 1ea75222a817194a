// =============================================================================
// Allo Starter Kit - Transaction Sequencing
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   Gas quote, submit and confirm: the three blocking steps every on-chain
//   action goes through, each mapped to its own error kind.
//
// =============================================================================

use allo_web3::prelude::*;
use tracing::{error, info};

use crate::error::{AlloError, Result};

/// Confirmation depth used unless configured otherwise
pub const DEFAULT_CONFIRMATIONS: usize = 2;

/// Read the current gas price. Any failure aborts the caller before a
/// transaction is built; a zero quote is passed through unchanged.
pub async fn quote_gas<C: ChainClient>(chain: &C) -> Result<U256> {
    match chain.gas_price().await {
        Ok(price) => {
            info!("⛽ Using gas price {} wei", price);
            Ok(price)
        }
        Err(e) => {
            error!("❌ Failed to get current gas price, aborting: {}", e);
            Err(AlloError::GasPriceUnavailable(e))
        }
    }
}

/// Send `tx` and wait until it is mined `confirmations` deep and did not revert
pub async fn submit_and_confirm<C: ChainClient>(
    chain: &C,
    tx: TransactionData,
    gas_price: U256,
    confirmations: usize,
) -> Result<Receipt> {
    let hash = chain.send_transaction(tx, gas_price).await.map_err(|e| {
        error!("❌ Transaction send failed: {}", e);
        AlloError::TransactionSend(e)
    })?;

    let receipt = chain
        .wait_for_receipt(hash, confirmations)
        .await
        .map_err(|e| {
            error!("❌ Waiting for {:?} failed: {}", hash, e);
            AlloError::ReceiptWait(e)
        })?;

    if receipt.reverted() {
        error!("❌ Transaction {:?} reverted", hash);
        return Err(AlloError::TransactionReverted(hash));
    }
    Ok(receipt)
}
