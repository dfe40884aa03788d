//! Readiness model: can a wallet complete a stable-token payment right now?
//!
//! Readiness is advisory, not authoritative. It drives user guidance (fund
//! the account, visit a faucet) but never gates a payment attempt — the
//! submission path is the true authority on fund sufficiency.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::session::WalletAddress;
use crate::timestamp::UnixTimestamp;

/// Guidance code attached to a readiness snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdviceCode {
    /// No action needed, or the check could not be completed.
    None,
    /// The wallet has no stable token account; it needs a funding path
    /// that creates one.
    NeedsAccount,
    /// The token account exists but holds less than the minimum threshold.
    NeedsFunds,
}

/// Snapshot of a wallet's capability to complete a stable-token payment.
///
/// Distinguishes the structural failure (no token account) from the
/// economic one (zero or low funds) because they call for different user
/// guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResult {
    /// Whether the wallet's stable token account exists.
    pub has_token_account: bool,
    /// Current token balance in UI units. Zero when unknown.
    pub balance: Decimal,
    /// Whether the balance meets the configured minimum threshold.
    pub sufficient: bool,
    /// Guidance code for the presentation layer.
    pub advice: AdviceCode,
    /// Human-readable note, set when the check could not be completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When the wallet was probed.
    pub checked_at: UnixTimestamp,
}

impl ReadinessResult {
    /// Snapshot for a wallet whose stable token account does not exist.
    #[must_use]
    pub fn needs_account() -> Self {
        Self {
            has_token_account: false,
            balance: Decimal::ZERO,
            sufficient: false,
            advice: AdviceCode::NeedsAccount,
            message: None,
            checked_at: UnixTimestamp::now(),
        }
    }

    /// Snapshot for an existing account with the given balance, classified
    /// against the minimum threshold.
    #[must_use]
    pub fn with_balance(balance: Decimal, threshold: Decimal) -> Self {
        let sufficient = balance >= threshold;
        Self {
            has_token_account: true,
            balance,
            sufficient,
            advice: if sufficient {
                AdviceCode::None
            } else {
                AdviceCode::NeedsFunds
            },
            message: None,
            checked_at: UnixTimestamp::now(),
        }
    }

    /// Downgraded snapshot for a check that could not be completed.
    ///
    /// Network faults on this advisory path are swallowed, never thrown to
    /// the caller as a hard fault.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            has_token_account: false,
            balance: Decimal::ZERO,
            sufficient: false,
            advice: AdviceCode::None,
            message: Some(message.into()),
            checked_at: UnixTimestamp::now(),
        }
    }
}

/// Advisory probe of a wallet's payment readiness.
///
/// Infallible by contract: implementations convert every failure into a
/// [`ReadinessResult::unknown`] snapshot.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Checks whether the wallet can complete a stable-token payment.
    async fn check(&self, address: &WalletAddress) -> ReadinessResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_balance_classifies_against_threshold() {
        let threshold = Decimal::new(1, 1); // 0.1
        let low = ReadinessResult::with_balance(Decimal::new(5, 2), threshold);
        assert!(!low.sufficient);
        assert_eq!(low.advice, AdviceCode::NeedsFunds);

        let enough = ReadinessResult::with_balance(Decimal::new(1, 1), threshold);
        assert!(enough.sufficient);
        assert_eq!(enough.advice, AdviceCode::None);
    }

    #[test]
    fn test_needs_account_has_zero_balance() {
        let result = ReadinessResult::needs_account();
        assert!(!result.has_token_account);
        assert_eq!(result.balance, Decimal::ZERO);
        assert_eq!(result.advice, AdviceCode::NeedsAccount);
    }

    #[test]
    fn test_unknown_is_advisory_none() {
        let result = ReadinessResult::unknown("rpc unreachable");
        assert_eq!(result.advice, AdviceCode::None);
        assert_eq!(result.message.as_deref(), Some("rpc unreachable"));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let result = ReadinessResult::needs_account();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["hasTokenAccount"], false);
        assert_eq!(json["advice"], "needsAccount");
    }
}
