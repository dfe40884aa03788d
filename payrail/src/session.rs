//! Session SDK trait seam and submission types.
//!
//! The passkey/session SDK is an external collaborator: it turns
//! hardware-backed biometric approval into a signed, submitted transaction
//! and sponsors network fees through its paymaster. This module specifies
//! the surface the orchestrator consumes — nothing here touches key
//! material or the wire.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an on-chain account, supplied by the session SDK
/// once connected. Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Creates a wallet address from its canonical string form.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(address: &str) -> Self {
        Self(address.to_owned())
    }
}

/// Signature returned by a successful submission, retained for display
/// and explorer lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Creates a signature from its canonical string form.
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    /// Returns the signature as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who covers the network fee for a session's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeeMode {
    /// The SDK's paymaster sponsors the fee.
    Sponsored,
    /// The payer funds the fee from their own balance.
    PayerFunded,
}

/// Options for establishing a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Fee mode requested for the session.
    pub fee_mode: FeeMode,
}

/// Asset used to account for the network fee from the payer's perspective.
///
/// The underlying network still settles the fee in its native asset; this is
/// a fee-abstraction hint passed through to the SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeToken {
    /// Fee accounted in the chain's native asset.
    Native,
    /// Fee accounted against the given token mint.
    Asset(WalletAddress),
}

/// Per-submission options carried alongside the instruction set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOptions {
    /// Fee-abstraction hint: the asset the fee is accounted against.
    pub fee_token: FeeToken,
    /// Static compute budget ceiling, sized for the worst case
    /// (setup instruction + transfer instruction).
    pub compute_unit_limit: u32,
}

/// A single atomic submission: the complete instruction set plus
/// fee-abstraction parameters. Submitted together or not at all.
#[derive(Debug)]
pub struct SubmitRequest<I> {
    /// Ordered instructions, setup before transfer.
    pub instructions: Vec<I>,
    /// Fee-abstraction and compute budget parameters.
    pub transaction_options: TransactionOptions,
}

/// Error reported by the session SDK.
#[derive(Debug, Clone)]
pub struct SessionError {
    /// Underlying message from the SDK.
    pub message: String,
}

impl SessionError {
    /// Creates a new session error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SessionError {}

/// Surface exposed by the passkey/session SDK.
///
/// The reactive fields (`is_connected`, `is_connecting`, `wallet_address`)
/// mirror the SDK's own state; the orchestrator treats them as the only
/// authority on session validity.
#[async_trait]
pub trait SessionSdk: Send + Sync {
    /// Chain instruction type accepted by [`Self::sign_and_send_transaction`].
    type Instruction: Send + Sync + 'static;

    /// Establishes a session, prompting the user's passkey if needed.
    async fn connect(&self, options: ConnectOptions) -> Result<(), SessionError>;

    /// Tears the session down.
    async fn disconnect(&self) -> Result<(), SessionError>;

    /// Signs and submits a complete instruction set in a single atomic call.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] with the underlying failure message; the
    /// orchestrator classifies it, never this layer.
    async fn sign_and_send_transaction(
        &self,
        request: SubmitRequest<Self::Instruction>,
    ) -> Result<Signature, SessionError>;

    /// Whether a session is currently active.
    fn is_connected(&self) -> bool;

    /// Whether a connect call is in flight.
    fn is_connecting(&self) -> bool;

    /// The connected wallet's address, if any.
    fn wallet_address(&self) -> Option<WalletAddress>;
}

#[async_trait]
impl<T: SessionSdk + ?Sized> SessionSdk for std::sync::Arc<T> {
    type Instruction = T::Instruction;

    async fn connect(&self, options: ConnectOptions) -> Result<(), SessionError> {
        self.as_ref().connect(options).await
    }

    async fn disconnect(&self) -> Result<(), SessionError> {
        self.as_ref().disconnect().await
    }

    async fn sign_and_send_transaction(
        &self,
        request: SubmitRequest<Self::Instruction>,
    ) -> Result<Signature, SessionError> {
        self.as_ref().sign_and_send_transaction(request).await
    }

    fn is_connected(&self) -> bool {
        self.as_ref().is_connected()
    }

    fn is_connecting(&self) -> bool {
        self.as_ref().is_connecting()
    }

    fn wallet_address(&self) -> Option<WalletAddress> {
        self.as_ref().wallet_address()
    }
}
