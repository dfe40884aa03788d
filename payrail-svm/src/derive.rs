//! Associated token account derivation and creation.
//!
//! A holder's balance of an SPL token lives in an account derived
//! deterministically from the owner address, the token program, and the
//! mint. Both the readiness checker and the instruction planner use the
//! same derivation rule, so structural ("no account") and economic ("no
//! funds") failures stay distinguishable.

use payrail::{PayError, WalletAddress};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::{Pubkey, pubkey};

/// Associated Token Account program public key.
pub const ATA_PROGRAM_PUBKEY: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Derives the associated token account for an owner and mint.
#[must_use]
pub fn derive_token_account(owner: &Pubkey, token_program: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ATA_PROGRAM_PUBKEY,
    )
    .0
}

/// Builds the idempotent create instruction for the owner's associated
/// token account, funded by `funder`.
///
/// The idempotent variant succeeds when the account already exists, so the
/// planner's point-in-time existence probe losing a race with a concurrent
/// creation cannot fail the transaction.
#[must_use]
pub fn create_token_account_idempotent(
    funder: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    let token_account = derive_token_account(owner, token_program, mint);
    Instruction {
        program_id: ATA_PROGRAM_PUBKEY,
        accounts: vec![
            AccountMeta::new(*funder, true),
            AccountMeta::new(token_account, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(solana_system_interface::program::ID, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        // CreateIdempotent discriminator
        data: vec![1],
    }
}

/// Parses a core wallet address into a Solana public key.
///
/// # Errors
///
/// Returns [`PayError::InvalidAddress`] when the address is not valid
/// base58 for this chain.
pub fn parse_address(address: &WalletAddress) -> Result<Pubkey, PayError> {
    address
        .as_str()
        .parse()
        .map_err(|_| PayError::InvalidAddress(address.to_string()))
}
