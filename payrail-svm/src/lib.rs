//! Solana chain backing for the payrail payment orchestration core.
//!
//! Implements the core's two chain seams for SPL stable tokens:
//!
//! - [`TokenReadinessChecker`] - advisory "can this wallet pay" snapshots
//!   built from associated token account existence and balance
//! - [`TokenInstructionPlanner`] - ordered instruction sets
//!   (idempotent account creation + `TransferChecked`, or a native system
//!   transfer)
//!
//! Both are written against [`RpcClientLike`], a three-method read
//! abstraction over the nonblocking Solana RPC client, so they stay
//! testable without a validator.
//!
//! # Usage
//!
//! ```ignore
//! use payrail_svm::{TokenConfig, TokenInstructionPlanner, TokenReadinessChecker};
//! use payrail::MemoryFlagStore;
//! use solana_client::nonblocking::rpc_client::RpcClient;
//! use std::sync::Arc;
//!
//! let config = TokenConfig::usdc_devnet();
//! let flags = Arc::new(MemoryFlagStore::new());
//! let rpc = Arc::new(RpcClient::new(config.rpc_endpoint.clone()));
//!
//! let readiness = TokenReadinessChecker::new(Arc::clone(&rpc), Arc::clone(&flags), config.clone());
//! let planner = TokenInstructionPlanner::new(rpc, config);
//! ```

pub mod derive;
pub mod networks;
pub mod planner;
pub mod readiness;
pub mod rpc;

pub use derive::{ATA_PROGRAM_PUBKEY, create_token_account_idempotent, derive_token_account};
pub use networks::{TokenConfig, USDC_DECIMALS, USDC_DEVNET_MINT, USDC_MAINNET_MINT};
pub use planner::TokenInstructionPlanner;
pub use readiness::TokenReadinessChecker;
pub use rpc::{RpcClientLike, TokenAmount};
