//! Well-known Solana network definitions and stable token deployments.
//!
//! Static configuration only: endpoints, mint addresses, and thresholds are
//! supplied up front, never discovered at runtime.

use rust_decimal::Decimal;
use solana_pubkey::{Pubkey, pubkey};

/// USDC mint on Solana mainnet.
///
/// Verify: <https://solscan.io/token/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v>
pub const USDC_MAINNET_MINT: Pubkey = pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");

/// USDC mint on Solana devnet.
///
/// Verify: <https://explorer.solana.com/address/4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU?cluster=devnet>
pub const USDC_DEVNET_MINT: Pubkey = pubkey!("4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU");

/// Decimal exponent of USDC on Solana.
pub const USDC_DECIMALS: u8 = 6;

/// Static configuration for one stable token deployment on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// RPC endpoint for the network.
    pub rpc_endpoint: String,
    /// Mint address of the stable token.
    pub mint: Pubkey,
    /// Token program owning the mint.
    pub token_program: Pubkey,
    /// Decimal exponent of the mint.
    pub decimals: u8,
    /// Minimum balance (UI units) below which readiness advises funding.
    pub min_balance: Decimal,
}

impl TokenConfig {
    /// USDC on Solana mainnet with the public RPC endpoint.
    #[must_use]
    pub fn usdc_mainnet() -> Self {
        Self {
            rpc_endpoint: "https://api.mainnet-beta.solana.com".to_owned(),
            mint: USDC_MAINNET_MINT,
            token_program: spl_token::id(),
            decimals: USDC_DECIMALS,
            // 0.1 USDC
            min_balance: Decimal::new(1, 1),
        }
    }

    /// USDC on Solana devnet with the public RPC endpoint.
    #[must_use]
    pub fn usdc_devnet() -> Self {
        Self {
            mint: USDC_DEVNET_MINT,
            rpc_endpoint: "https://api.devnet.solana.com".to_owned(),
            ..Self::usdc_mainnet()
        }
    }

    /// Overrides the RPC endpoint.
    #[must_use]
    pub fn with_rpc_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rpc_endpoint = endpoint.into();
        self
    }

    /// Overrides the minimum balance threshold.
    #[must_use]
    pub const fn with_min_balance(mut self, min_balance: Decimal) -> Self {
        self.min_balance = min_balance;
        self
    }
}
