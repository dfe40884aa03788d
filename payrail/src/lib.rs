//! Payment orchestration core for passkey-authorized stable token payments.
//!
//! This crate lets a user pay a fixed amount of a stable token to a merchant
//! without holding the chain's native gas asset, authorizing with a
//! hardware-backed passkey instead of a browser-managed private key. It
//! contains the chain-agnostic core: the attempt state machine, the error
//! taxonomy, the advisory readiness model, and the trait seams for the
//! external collaborators (session SDK, instruction planner, flag store).
//!
//! Chain backings live in companion crates; `payrail-svm` provides the
//! Solana readiness checker and instruction planner.
//!
//! # Architecture
//!
//! - [`orchestrator`] - The payment attempt state machine and reactive status
//! - [`session`] - The passkey/session SDK seam and submission types
//! - [`planner`] - Payment requests, instruction sets, base-unit arithmetic
//! - [`readiness`] - Advisory wallet-readiness snapshots
//! - [`store`] - Local cache/flag store (never a source of truth)
//! - [`error`] - Error taxonomy and submission-failure classification
//!
//! # Usage
//!
//! ```ignore
//! use payrail::{OrchestratorConfig, PaymentOrchestrator, PaymentRequest};
//! use payrail::{AssetKind, MemoryFlagStore, WalletAddress};
//! use std::sync::Arc;
//!
//! let orchestrator = PaymentOrchestrator::new(
//!     sdk,
//!     planner,
//!     readiness,
//!     Arc::new(MemoryFlagStore::new()),
//!     OrchestratorConfig::new(WalletAddress::from(
//!         "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
//!     )),
//! );
//!
//! let request = PaymentRequest::new(
//!     "0.1".parse()?,
//!     AssetKind::StableToken,
//!     WalletAddress::from("merchant-address"),
//! )?;
//! let signature = orchestrator.pay(request).await?;
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod planner;
pub mod readiness;
pub mod session;
pub mod store;
pub mod timestamp;

pub use config::{DEFAULT_COMPUTE_UNIT_LIMIT, DEFAULT_RESET_WINDOW, OrchestratorConfig};
pub use error::{PayError, classify_submission_failure};
pub use orchestrator::{PaymentOrchestrator, PaymentState, PaymentStatus};
pub use planner::{
    AssetKind, InstructionPlanner, InstructionSet, NATIVE_DECIMALS, PaymentRequest,
    from_base_units, to_base_units,
};
pub use readiness::{AdviceCode, ReadinessProbe, ReadinessResult};
pub use session::{
    ConnectOptions, FeeMode, FeeToken, SessionError, SessionSdk, Signature, SubmitRequest,
    TransactionOptions, WalletAddress,
};
pub use store::{FlagStore, MemoryFlagStore};
pub use timestamp::UnixTimestamp;
