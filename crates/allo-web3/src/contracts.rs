//! Smart Contract Bindings Module
//!
//! Call encoding and event decoding for the Allo v2 Registry, the Allo core
//! contract and the MicroGrants strategy. Encoding is done by `ethabi` from
//! the ABI fragments embedded below; nothing here talks to the network.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use web3::ethabi::{self, Contract, Token};
use web3::types::{Address, H256, U256};

use crate::chains::NATIVE_TOKEN_ADDRESS;
use crate::error::ContractError;
use crate::events::{bytes32_param, event_values, uint_param};
use crate::types::{Receipt, TransactionData};

/// Registry fragment: `createProfile` and `ProfileCreated`
pub const REGISTRY_ABI: &str = r#"[
  {
    "type": "function",
    "name": "createProfile",
    "stateMutability": "nonpayable",
    "inputs": [
      {"name": "_nonce", "type": "uint256"},
      {"name": "_name", "type": "string"},
      {"name": "_metadata", "type": "tuple", "components": [
        {"name": "protocol", "type": "uint256"},
        {"name": "pointer", "type": "string"}
      ]},
      {"name": "_owner", "type": "address"},
      {"name": "_members", "type": "address[]"}
    ],
    "outputs": [{"name": "", "type": "bytes32"}]
  },
  {
    "type": "event",
    "name": "ProfileCreated",
    "anonymous": false,
    "inputs": [
      {"name": "profileId", "type": "bytes32", "indexed": true},
      {"name": "nonce", "type": "uint256", "indexed": false},
      {"name": "name", "type": "string", "indexed": false},
      {"name": "metadata", "type": "tuple", "indexed": false, "components": [
        {"name": "protocol", "type": "uint256"},
        {"name": "pointer", "type": "string"}
      ]},
      {"name": "owner", "type": "address", "indexed": false},
      {"name": "anchor", "type": "address", "indexed": false}
    ]
  }
]"#;

/// Allo fragment: `createPoolWithCustomStrategy` and `PoolCreated`
pub const ALLO_ABI: &str = r#"[
  {
    "type": "function",
    "name": "createPoolWithCustomStrategy",
    "stateMutability": "payable",
    "inputs": [
      {"name": "_profileId", "type": "bytes32"},
      {"name": "_strategy", "type": "address"},
      {"name": "_initStrategyData", "type": "bytes"},
      {"name": "_token", "type": "address"},
      {"name": "_amount", "type": "uint256"},
      {"name": "_metadata", "type": "tuple", "components": [
        {"name": "protocol", "type": "uint256"},
        {"name": "pointer", "type": "string"}
      ]},
      {"name": "_managers", "type": "address[]"}
    ],
    "outputs": [{"name": "poolId", "type": "uint256"}]
  },
  {
    "type": "event",
    "name": "PoolCreated",
    "anonymous": false,
    "inputs": [
      {"name": "poolId", "type": "uint256", "indexed": true},
      {"name": "profileId", "type": "bytes32", "indexed": true},
      {"name": "strategy", "type": "address", "indexed": false},
      {"name": "token", "type": "address", "indexed": false},
      {"name": "amount", "type": "uint256", "indexed": false},
      {"name": "metadata", "type": "tuple", "indexed": false, "components": [
        {"name": "protocol", "type": "uint256"},
        {"name": "pointer", "type": "string"}
      ]}
    ]
  }
]"#;

/// MicroGrants strategy fragment: constructor only
pub const MICRO_GRANTS_ABI: &str = r#"[
  {
    "type": "constructor",
    "stateMutability": "nonpayable",
    "inputs": [
      {"name": "_allo", "type": "address"},
      {"name": "_name", "type": "string"}
    ]
  }
]"#;

/// On-chain metadata pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Storage protocol, 1 = IPFS
    pub protocol: U256,
    /// Content address
    pub pointer: String,
}

impl Metadata {
    /// IPFS-backed metadata
    pub fn ipfs(pointer: impl Into<String>) -> Self {
        Self {
            protocol: U256::one(),
            pointer: pointer.into(),
        }
    }

    fn token(&self) -> Token {
        Token::Tuple(vec![
            Token::Uint(self.protocol),
            Token::String(self.pointer.clone()),
        ])
    }
}

/// Arguments of `Registry.createProfile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProfileArgs {
    /// Caller-chosen nonce; `(nonce, owner)` must never repeat
    pub nonce: U256,
    /// Display name
    pub name: String,
    /// Profile metadata pointer
    pub metadata: Metadata,
    /// Member addresses
    pub members: Vec<Address>,
    /// Profile owner
    pub owner: Address,
}

fn address_array(addresses: &[Address]) -> Token {
    Token::Array(addresses.iter().copied().map(Token::Address).collect())
}

/// Allo v2 Registry binding
#[derive(Debug, Clone)]
pub struct Registry {
    address: Address,
    abi: Contract,
}

impl Registry {
    /// Bind the registry at `address`
    pub fn new(address: Address) -> Result<Self, ContractError> {
        Ok(Self {
            address,
            abi: Contract::load(REGISTRY_ABI.as_bytes())?,
        })
    }

    /// Registry address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Build the `createProfile` transaction
    #[instrument(level = "debug", skip(self))]
    pub fn create_profile(&self, args: &CreateProfileArgs) -> Result<TransactionData, ContractError> {
        let data = self.abi.function("createProfile")?.encode_input(&[
            Token::Uint(args.nonce),
            Token::String(args.name.clone()),
            args.metadata.token(),
            Token::Address(args.owner),
            address_array(&args.members),
        ])?;
        debug!("🔧 Encoded createProfile ({} bytes)", data.len());
        Ok(TransactionData::call(self.address, data))
    }

    /// Profile id from the `ProfileCreated` event in `receipt`
    pub fn profile_created(&self, receipt: &Receipt) -> Result<H256, ContractError> {
        let log = event_values(receipt, &self.abi, "ProfileCreated", self.address)
            .ok_or(ContractError::EventNotFound("ProfileCreated"))?;
        bytes32_param(&log, "ProfileCreated", "profileId")
    }
}

/// Allo v2 core contract binding
#[derive(Debug, Clone)]
pub struct Allo {
    address: Address,
    abi: Contract,
}

/// Arguments of `Allo.createPoolWithCustomStrategy`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePoolArgs {
    /// Owning profile
    pub profile_id: H256,
    /// Deployed strategy contract
    pub strategy: Address,
    /// Strategy-specific initialisation payload
    pub init_strategy_data: Vec<u8>,
    /// Pool token
    pub token: Address,
    /// Initial funding
    pub amount: U256,
    /// Pool metadata pointer
    pub metadata: Metadata,
    /// Pool managers
    pub managers: Vec<Address>,
}

impl Allo {
    /// Bind the Allo contract at `address`
    pub fn new(address: Address) -> Result<Self, ContractError> {
        Ok(Self {
            address,
            abi: Contract::load(ALLO_ABI.as_bytes())?,
        })
    }

    /// Allo address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Build the `createPoolWithCustomStrategy` transaction.
    ///
    /// Native pools carry `amount` as call value; ERC20 pools are funded by
    /// Allo through `transferFrom` and carry none.
    #[instrument(level = "debug", skip(self))]
    pub fn create_pool_with_custom_strategy(
        &self,
        args: &CreatePoolArgs,
    ) -> Result<TransactionData, ContractError> {
        let data = self
            .abi
            .function("createPoolWithCustomStrategy")?
            .encode_input(&[
                Token::FixedBytes(args.profile_id.as_bytes().to_vec()),
                Token::Address(args.strategy),
                Token::Bytes(args.init_strategy_data.clone()),
                Token::Address(args.token),
                Token::Uint(args.amount),
                args.metadata.token(),
                address_array(&args.managers),
            ])?;
        let mut tx = TransactionData::call(self.address, data);
        if args.token == NATIVE_TOKEN_ADDRESS {
            tx.value = args.amount;
        }
        Ok(tx)
    }

    /// Pool id from the `PoolCreated` event in `receipt`
    pub fn pool_created(&self, receipt: &Receipt) -> Result<U256, ContractError> {
        let log = event_values(receipt, &self.abi, "PoolCreated", self.address)
            .ok_or(ContractError::EventNotFound("PoolCreated"))?;
        uint_param(&log, "PoolCreated", "poolId")
    }
}

/// MicroGrants strategy initialisation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroGrantsInit {
    /// Require recipients to register through their profile anchor
    pub use_registry_anchor: bool,
    /// Allocation window start (unix seconds)
    pub allocation_start_time: u64,
    /// Allocation window end (unix seconds)
    pub allocation_end_time: u64,
    /// Approvals needed before a request is accepted
    pub approval_threshold: U256,
    /// Largest amount a recipient may request
    pub max_requested_amount: U256,
}

impl MicroGrantsInit {
    /// `abi.encode(InitializeParams)`
    pub fn encode(&self) -> Vec<u8> {
        ethabi::encode(&[Token::Tuple(vec![
            Token::Bool(self.use_registry_anchor),
            Token::Uint(U256::from(self.allocation_start_time)),
            Token::Uint(U256::from(self.allocation_end_time)),
            Token::Uint(self.approval_threshold),
            Token::Uint(self.max_requested_amount),
        ])])
    }
}

/// MicroGrants strategy creation
#[derive(Debug, Clone)]
pub struct MicroGrantsStrategy {
    bytecode: Vec<u8>,
    abi: Contract,
}

impl MicroGrantsStrategy {
    /// Load from a hex bytecode artifact (`0x` optional, whitespace ignored)
    pub fn from_hex(bytecode: &str) -> Result<Self, ContractError> {
        let cleaned: String = bytecode.split_whitespace().collect();
        let bytecode = hex::decode(cleaned.trim_start_matches("0x"))
            .map_err(|e| ContractError::InvalidBytecode(e.to_string()))?;
        if bytecode.is_empty() {
            return Err(ContractError::InvalidBytecode("empty artifact".into()));
        }
        Ok(Self {
            bytecode,
            abi: Contract::load(MICRO_GRANTS_ABI.as_bytes())?,
        })
    }

    /// Contract creation transaction for `constructor(allo, name)`
    pub fn deploy(&self, allo: Address, name: &str) -> Result<TransactionData, ContractError> {
        let constructor = self
            .abi
            .constructor()
            .ok_or(ContractError::InvalidBytecode("missing constructor".into()))?;
        let code = constructor.encode_input(
            self.bytecode.clone(),
            &[Token::Address(allo), Token::String(name.to_owned())],
        )?;
        Ok(TransactionData::create(code))
    }
}
