//! Supported chains and the canonical Allo v2 deployments on them.

use std::str::FromStr;

use web3::types::{Address, H160};

use crate::error::ContractError;

/// Allo v2 Registry, same address on every supported chain
pub const REGISTRY_ADDRESS: &str = "0x4AAcca72145e1dF2aeC137E1f3C5E3D75DB8b5f3";

/// Allo v2 proxy, same address on every supported chain
pub const ALLO_ADDRESS: &str = "0x1133eA7Af70876e64665ecD07C0A0476d09465a1";

/// Native token sentinel used by Allo pools
pub const NATIVE_TOKEN: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// [`NATIVE_TOKEN`] as an address
pub const NATIVE_TOKEN_ADDRESS: Address = H160([0xee; 20]);

/// Static description of a chain the kit knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainInfo {
    /// EIP-155 chain id
    pub id: u64,
    /// Human-readable name
    pub name: &'static str,
    /// Whether the chain is a test network
    pub testnet: bool,
}

const CHAINS: &[ChainInfo] = &[
    ChainInfo { id: 421614, name: "arbitrum-sepolia", testnet: true },
    ChainInfo { id: 11155111, name: "sepolia", testnet: true },
    ChainInfo { id: 5, name: "goerli", testnet: true },
    ChainInfo { id: 42161, name: "arbitrum", testnet: false },
    ChainInfo { id: 10, name: "optimism", testnet: false },
    ChainInfo { id: 1, name: "mainnet", testnet: false },
];

/// Look up a chain by id
pub fn chain_info(id: u64) -> Option<&'static ChainInfo> {
    CHAINS.iter().find(|c| c.id == id)
}

/// Parse a `0x`-prefixed address
pub fn parse_address(value: &str) -> Result<Address, ContractError> {
    Address::from_str(value.trim().trim_start_matches("0x"))
        .map_err(|e| ContractError::InvalidAddress(format!("{value}: {e}")))
}
