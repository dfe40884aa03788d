//! Payment requests, instruction sets, and base-unit arithmetic.
//!
//! The instruction planner seam turns a validated [`PaymentRequest`] into
//! the ordered on-chain instruction set for one atomic submission. Chain
//! backings implement [`InstructionPlanner`]; the core only enforces the
//! structural invariants (non-empty set, setup before transfer, positive
//! amounts, truncating base-unit conversion).

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::PayError;
use crate::session::WalletAddress;

/// Decimal exponent of the chain's native asset (lamports per unit).
pub const NATIVE_DECIMALS: u8 = 9;

/// The two asset kinds this core routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    /// The chain's native asset. Accounts exist implicitly.
    Native,
    /// The configured stable token, held in derived token accounts.
    StableToken,
}

/// A validated payment intent. Constructed fresh per attempt and immutable
/// once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    amount: Decimal,
    asset: AssetKind,
    recipient: WalletAddress,
}

impl PaymentRequest {
    /// Creates a payment request.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::NonPositiveAmount`] when `amount <= 0`.
    pub fn new(
        amount: Decimal,
        asset: AssetKind,
        recipient: WalletAddress,
    ) -> Result<Self, PayError> {
        if amount <= Decimal::ZERO {
            return Err(PayError::NonPositiveAmount);
        }
        Ok(Self {
            amount,
            asset,
            recipient,
        })
    }

    /// The payment amount in UI units.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The asset being transferred.
    #[must_use]
    pub const fn asset(&self) -> AssetKind {
        self.asset
    }

    /// The merchant address receiving the payment.
    #[must_use]
    pub const fn recipient(&self) -> &WalletAddress {
        &self.recipient
    }
}

/// Ordered, non-empty sequence of opaque chain instructions.
///
/// Constructed so that any setup instruction (recipient account creation)
/// always precedes the value transfer. The set is submitted atomically,
/// never instruction by instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSet<I> {
    instructions: Vec<I>,
}

impl<I> InstructionSet<I> {
    /// A set containing only the value-transfer instruction.
    #[must_use]
    pub fn transfer_only(transfer: I) -> Self {
        Self {
            instructions: vec![transfer],
        }
    }

    /// A set with a setup instruction strictly before the transfer.
    #[must_use]
    pub fn with_setup(setup: I, transfer: I) -> Self {
        Self {
            instructions: vec![setup, transfer],
        }
    }

    /// Number of instructions in the set. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterates the instructions in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.instructions.iter()
    }

    /// Consumes the set, yielding the ordered instructions.
    #[must_use]
    pub fn into_vec(self) -> Vec<I> {
        self.instructions
    }
}

/// Converts a UI amount to the asset's integer base units, truncating
/// toward zero — the conversion never rounds up.
///
/// # Errors
///
/// Returns [`PayError::NonPositiveAmount`] for negative amounts and
/// [`PayError::AmountOutOfRange`] when the scaled value overflows `u64`.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<u64, PayError> {
    if amount.is_sign_negative() {
        return Err(PayError::NonPositiveAmount);
    }
    let factor = 10u64
        .checked_pow(u32::from(decimals))
        .ok_or_else(|| PayError::AmountOutOfRange(amount.to_string()))?;
    let scaled = amount
        .checked_mul(Decimal::from(factor))
        .ok_or_else(|| PayError::AmountOutOfRange(amount.to_string()))?;
    scaled
        .trunc()
        .to_u64()
        .ok_or_else(|| PayError::AmountOutOfRange(amount.to_string()))
}

/// Converts integer base units back to a UI amount. Exact.
#[must_use]
pub fn from_base_units(amount: u64, decimals: u8) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(amount), u32::from(decimals))
}

/// Produces the ordered instruction set for one payment attempt.
///
/// The recipient-account existence probe inside implementations is a
/// point-in-time check with an inherent race; the chain is the authority
/// and the optimistic local check is only an optimization.
#[async_trait]
pub trait InstructionPlanner: Send + Sync {
    /// Chain instruction type produced by this planner.
    type Instruction: Send + Sync + 'static;

    /// Builds the instruction set for a transfer.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::WalletNotConnected`] when `sender` is absent,
    /// and address/amount errors otherwise.
    async fn plan(
        &self,
        sender: Option<&WalletAddress>,
        recipient: &WalletAddress,
        asset: AssetKind,
        amount: Decimal,
    ) -> Result<InstructionSet<Self::Instruction>, PayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_zero_and_negative_amounts() {
        for amount in [Decimal::ZERO, Decimal::from(-3)] {
            let result = PaymentRequest::new(
                amount,
                AssetKind::StableToken,
                WalletAddress::from("merchant"),
            );
            assert_eq!(result.unwrap_err(), PayError::NonPositiveAmount);
        }
    }

    #[test]
    fn test_to_base_units_truncates_toward_zero() {
        // 0.1 with 6 decimals
        assert_eq!(to_base_units(Decimal::new(1, 1), 6).unwrap(), 100_000);
        // 1.2345678 truncates the 7th fractional digit
        assert_eq!(
            to_base_units(Decimal::new(12_345_678, 7), 6).unwrap(),
            1_234_567
        );
        // sub-unit dust truncates to zero
        assert_eq!(to_base_units(Decimal::new(1, 8), 6).unwrap(), 0);
    }

    #[test]
    fn test_round_trip_never_increases_value() {
        let amounts = [
            Decimal::new(1, 1),
            Decimal::new(12_345_678, 7),
            Decimal::new(999_999_999, 9),
            Decimal::from(5),
        ];
        for amount in amounts {
            let base = to_base_units(amount, 6).unwrap();
            assert!(from_base_units(base, 6) <= amount);
        }
    }

    #[test]
    fn test_to_base_units_rejects_negative() {
        assert_eq!(
            to_base_units(Decimal::from(-1), 6).unwrap_err(),
            PayError::NonPositiveAmount
        );
    }

    #[test]
    fn test_to_base_units_rejects_overflow() {
        let huge = Decimal::MAX;
        assert!(matches!(
            to_base_units(huge, 9).unwrap_err(),
            PayError::AmountOutOfRange(_)
        ));
    }

    #[test]
    fn test_instruction_set_orders_setup_before_transfer() {
        let set = InstructionSet::with_setup("create", "transfer");
        let ordered: Vec<_> = set.iter().copied().collect();
        assert_eq!(ordered, vec!["create", "transfer"]);

        let transfer_only = InstructionSet::transfer_only("transfer");
        assert_eq!(transfer_only.len(), 1);
        assert!(!transfer_only.is_empty());
    }
}
