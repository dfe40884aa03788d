//! Orchestrator configuration.
//!
//! All knobs are static: the compute budget ceiling is deliberately a
//! configured constant sized for the worst case (account creation plus
//! transfer) rather than derived from the instruction count.

use std::time::Duration;

use crate::planner::AssetKind;
use crate::session::{FeeMode, FeeToken, WalletAddress};

/// Default compute budget ceiling per submission.
///
/// Sized to accommodate account creation plus a checked transfer.
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 200_000;

/// Default observation window before a terminal state auto-resets to idle.
pub const DEFAULT_RESET_WINDOW: Duration = Duration::from_secs(5);

/// Static configuration for a [`PaymentOrchestrator`](crate::orchestrator::PaymentOrchestrator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Fee mode requested when establishing a session.
    pub fee_mode: FeeMode,
    /// Mint of the stable token, used as the fee-abstraction hint for
    /// stable-token payments.
    pub stable_mint: WalletAddress,
    /// Compute budget ceiling attached to every submission.
    pub compute_unit_limit: u32,
    /// How long terminal states stay observable before resetting.
    pub reset_window: Duration,
}

impl OrchestratorConfig {
    /// Creates a sponsored-fee configuration with default ceilings.
    #[must_use]
    pub const fn new(stable_mint: WalletAddress) -> Self {
        Self {
            fee_mode: FeeMode::Sponsored,
            stable_mint,
            compute_unit_limit: DEFAULT_COMPUTE_UNIT_LIMIT,
            reset_window: DEFAULT_RESET_WINDOW,
        }
    }

    /// Overrides the fee mode.
    #[must_use]
    pub const fn with_fee_mode(mut self, fee_mode: FeeMode) -> Self {
        self.fee_mode = fee_mode;
        self
    }

    /// Overrides the compute budget ceiling.
    #[must_use]
    pub const fn with_compute_unit_limit(mut self, limit: u32) -> Self {
        self.compute_unit_limit = limit;
        self
    }

    /// Overrides the terminal-state observation window.
    #[must_use]
    pub const fn with_reset_window(mut self, window: Duration) -> Self {
        self.reset_window = window;
        self
    }

    /// Fee-abstraction hint for a payment's asset: the fee is accounted
    /// against the asset being paid.
    #[must_use]
    pub fn fee_token_for(&self, asset: AssetKind) -> FeeToken {
        match asset {
            AssetKind::Native => FeeToken::Native,
            AssetKind::StableToken => FeeToken::Asset(self.stable_mint.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_token_follows_asset() {
        let config = OrchestratorConfig::new(WalletAddress::from("mint-address"));
        assert_eq!(config.fee_token_for(AssetKind::Native), FeeToken::Native);
        assert_eq!(
            config.fee_token_for(AssetKind::StableToken),
            FeeToken::Asset(WalletAddress::from("mint-address"))
        );
    }

    #[test]
    fn test_builder_overrides() {
        let config = OrchestratorConfig::new(WalletAddress::from("mint"))
            .with_fee_mode(FeeMode::PayerFunded)
            .with_compute_unit_limit(50_000)
            .with_reset_window(Duration::from_secs(2));
        assert_eq!(config.fee_mode, FeeMode::PayerFunded);
        assert_eq!(config.compute_unit_limit, 50_000);
        assert_eq!(config.reset_window, Duration::from_secs(2));
    }
}
