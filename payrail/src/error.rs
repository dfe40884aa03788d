//! Error taxonomy for payment orchestration.
//!
//! Submission failures are classified by [`classify_submission_failure`] so
//! the presentation layer shows a fixed, actionable message for the common
//! economic failure (insufficient balance) and the underlying message
//! verbatim for everything else. Advisory readiness faults never appear
//! here; they are downgraded inside the readiness checker.

/// Fixed user-facing message for balance-related submission failures.
pub const INSUFFICIENT_FUNDS_MESSAGE: &str =
    "Insufficient funds to complete this payment. Top up your balance and try again.";

/// Guidance text for a missing sender-side token account.
///
/// The instruction builder only auto-creates the recipient's token account;
/// a missing sender account has to be resolved by funding the wallet first.
pub const SENDER_ACCOUNT_GUIDANCE: &str =
    "This wallet has no stable token account yet. Receive a small amount of the token to create one, then retry.";

/// Errors produced by the payment orchestration core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayError {
    /// The session SDK could not establish a session or produced no usable
    /// wallet address. Retryable through a fresh user-initiated attempt.
    #[error("wallet session unavailable: {0}")]
    SessionUnavailable(String),

    /// An operation requiring a connected wallet ran without one.
    #[error("wallet not connected")]
    WalletNotConnected,

    /// A stable token account is missing in a way the instruction builder
    /// does not resolve. Carries explicit guidance text, not a raw message.
    #[error("{0}")]
    AccountNotReady(String),

    /// Submission rejected for balance reasons. Always the fixed message.
    #[error("{}", INSUFFICIENT_FUNDS_MESSAGE)]
    InsufficientFunds,

    /// Catch-all for any other submission rejection (compute exhaustion,
    /// network timeout, signing declined). Underlying message verbatim.
    #[error("{0}")]
    SubmissionFailed(String),

    /// A payment request was constructed with a non-positive amount.
    #[error("payment amount must be positive")]
    NonPositiveAmount,

    /// An amount does not fit the asset's integer base-unit representation.
    #[error("amount {0} cannot be represented in base units")]
    AmountOutOfRange(String),

    /// A supplied address failed to parse for the target chain.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A chain instruction could not be assembled.
    #[error("failed to build instruction: {0}")]
    InstructionBuild(String),

    /// A payment attempt was initiated while another one was in flight.
    /// The trigger is a no-op; no SDK call is made.
    #[error("a payment attempt is already in flight")]
    AttemptInFlight,
}

/// Classifies a submission failure message into a [`PayError`].
///
/// Detection is by substring/code matching on the underlying failure:
/// balance-related rejections (including SPL Token custom program error
/// `0x1`) map to the fixed [`PayError::InsufficientFunds`] message, missing
/// account errors map to [`PayError::AccountNotReady`] with guidance text,
/// and everything else is surfaced verbatim.
#[must_use]
pub fn classify_submission_failure(message: &str) -> PayError {
    let lower = message.to_lowercase();
    if lower.contains("insufficient") || has_custom_error_0x1(&lower) {
        return PayError::InsufficientFunds;
    }
    if lower.contains("accountnotfound")
        || lower.contains("account does not exist")
        || lower.contains("invalid account data")
    {
        return PayError::AccountNotReady(SENDER_ACCOUNT_GUIDANCE.to_owned());
    }
    PayError::SubmissionFailed(message.to_owned())
}

/// Matches `custom program error: 0x1` without also matching `0x10`..`0x1f`.
fn has_custom_error_0x1(lower: &str) -> bool {
    let Some(idx) = lower.find("custom program error: 0x1") else {
        return false;
    };
    let tail = &lower[idx + "custom program error: 0x1".len()..];
    !tail.chars().next().is_some_and(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_substring_maps_to_fixed_message() {
        let err = classify_submission_failure("Transfer: insufficient funds");
        assert_eq!(err, PayError::InsufficientFunds);
        assert_eq!(err.to_string(), INSUFFICIENT_FUNDS_MESSAGE);
    }

    #[test]
    fn test_custom_program_error_0x1_is_insufficient_funds() {
        let err = classify_submission_failure(
            "Transaction simulation failed: Error processing Instruction 1: custom program error: 0x1",
        );
        assert_eq!(err, PayError::InsufficientFunds);
    }

    #[test]
    fn test_custom_program_error_0x11_is_not_insufficient_funds() {
        let raw = "Error processing Instruction 0: custom program error: 0x11";
        let err = classify_submission_failure(raw);
        assert_eq!(err, PayError::SubmissionFailed(raw.to_owned()));
    }

    #[test]
    fn test_missing_account_maps_to_guidance() {
        let err = classify_submission_failure("AccountNotFound: pubkey=abc");
        assert_eq!(
            err,
            PayError::AccountNotReady(SENDER_ACCOUNT_GUIDANCE.to_owned())
        );
    }

    #[test]
    fn test_unknown_failure_surfaced_verbatim() {
        let raw = "blockhash not found";
        let err = classify_submission_failure(raw);
        assert_eq!(err, PayError::SubmissionFailed(raw.to_owned()));
        assert_eq!(err.to_string(), raw);
    }
}
