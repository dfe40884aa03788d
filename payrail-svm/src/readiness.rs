//! Stable token readiness checks for Solana wallets.
//!
//! Splitting "does the token account exist" from "does it hold funds"
//! keeps the structural and economic failure paths distinguishable: a
//! missing account needs a funding path that creates it, an empty one
//! needs a top-up. The whole path fails soft — it produces advice, never
//! errors.

use std::sync::Arc;

use async_trait::async_trait;
use payrail::store::readiness_key;
use payrail::{FlagStore, ReadinessProbe, ReadinessResult, WalletAddress};
use rust_decimal::Decimal;

use crate::derive::{derive_token_account, parse_address};
use crate::networks::TokenConfig;
use crate::rpc::{RpcClientLike, is_account_not_found};

/// Advisory readiness checker for one stable token deployment.
///
/// The account-existence probe runs once per wallet; the result is recorded
/// in the flag store, and later checks skip straight to a fresh balance
/// fetch (cheap, idempotent). Cache entries only go away on explicit wallet
/// disconnect.
pub struct TokenReadinessChecker<R, F> {
    rpc: R,
    flags: Arc<F>,
    config: TokenConfig,
}

impl<R, F> std::fmt::Debug for TokenReadinessChecker<R, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenReadinessChecker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R, F> TokenReadinessChecker<R, F> {
    /// Creates a checker over the given RPC client and flag store.
    pub const fn new(rpc: R, flags: Arc<F>, config: TokenConfig) -> Self {
        Self { rpc, flags, config }
    }
}

impl<R, F> TokenReadinessChecker<R, F>
where
    R: RpcClientLike,
    F: FlagStore,
{
    /// Balance fetch for the advisory path: "account not found" and "RPC
    /// error" are treated identically as a zero balance.
    async fn fetch_balance_soft(
        &self,
        address: &WalletAddress,
        token_account: &solana_pubkey::Pubkey,
    ) -> Decimal {
        match self.rpc.get_token_account_balance(token_account).await {
            Ok(amount) => amount.ui_amount(),
            Err(err) => {
                tracing::debug!(%address, error = %err, "balance fetch failed, treating as zero");
                Decimal::ZERO
            }
        }
    }
}

#[async_trait]
impl<R, F> ReadinessProbe for TokenReadinessChecker<R, F>
where
    R: RpcClientLike,
    F: FlagStore,
{
    async fn check(&self, address: &WalletAddress) -> ReadinessResult {
        let owner = match parse_address(address) {
            Ok(owner) => owner,
            Err(err) => return ReadinessResult::unknown(err.to_string()),
        };
        let token_account =
            derive_token_account(&owner, &self.config.token_program, &self.config.mint);
        let key = readiness_key(address);

        if !self.flags.contains(&key) {
            match self.rpc.get_account(&token_account).await {
                Ok(_) => self.flags.insert(&key),
                Err(err) if is_account_not_found(&err) => {
                    // A balance fetch would fail for a structural reason;
                    // skip it and advise creating the account instead.
                    self.flags.insert(&key);
                    tracing::debug!(%address, "stable token account missing");
                    return ReadinessResult::needs_account();
                }
                Err(err) => {
                    tracing::warn!(%address, error = %err, "readiness probe failed");
                    return ReadinessResult::unknown(format!("readiness probe failed: {err}"));
                }
            }
        }

        let balance = self.fetch_balance_soft(address, &token_account).await;
        ReadinessResult::with_balance(balance, self.config.min_balance)
    }
}
