//! Instruction planning for Solana payments.
//!
//! Produces the ordered instruction set for one atomic submission: an
//! optional recipient token-account creation followed by the value
//! transfer. Native transfers need no setup since system accounts exist
//! implicitly.

use async_trait::async_trait;
use payrail::{
    AssetKind, InstructionPlanner, InstructionSet, NATIVE_DECIMALS, PayError, WalletAddress,
    to_base_units,
};
use rust_decimal::Decimal;
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;

use crate::derive::{create_token_account_idempotent, derive_token_account, parse_address};
use crate::networks::TokenConfig;
use crate::rpc::{RpcClientLike, is_account_not_found};

/// Builds transfer instruction sets for one stable token deployment.
pub struct TokenInstructionPlanner<R> {
    rpc: R,
    config: TokenConfig,
}

impl<R> std::fmt::Debug for TokenInstructionPlanner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInstructionPlanner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R> TokenInstructionPlanner<R> {
    /// Creates a planner over the given RPC client.
    pub const fn new(rpc: R, config: TokenConfig) -> Self {
        Self { rpc, config }
    }
}

impl<R: RpcClientLike> TokenInstructionPlanner<R> {
    /// Point-in-time existence probe for the recipient's token account.
    ///
    /// Racing a concurrent creation is accepted: the creation instruction
    /// is idempotent, so the chain resolves the race deterministically and
    /// this probe stays an optimization, not a correctness guarantee.
    async fn recipient_account_exists(&self, token_account: &Pubkey) -> bool {
        match self.rpc.get_account(token_account).await {
            Ok(_) => true,
            Err(err) => {
                if !is_account_not_found(&err) {
                    tracing::debug!(error = %err, "recipient account probe failed, assuming missing");
                }
                false
            }
        }
    }

    async fn plan_stable_token(
        &self,
        sender: Pubkey,
        recipient: Pubkey,
        amount: Decimal,
    ) -> Result<InstructionSet<Instruction>, PayError> {
        let source = derive_token_account(&sender, &self.config.token_program, &self.config.mint);
        let destination =
            derive_token_account(&recipient, &self.config.token_program, &self.config.mint);
        let base_amount = to_base_units(amount, self.config.decimals)?;

        let transfer = spl_token::instruction::transfer_checked(
            &self.config.token_program,
            &source,
            &self.config.mint,
            &destination,
            &sender,
            &[],
            base_amount,
            self.config.decimals,
        )
        .map_err(|err| PayError::InstructionBuild(err.to_string()))?;

        if self.recipient_account_exists(&destination).await {
            Ok(InstructionSet::transfer_only(transfer))
        } else {
            let create = create_token_account_idempotent(
                &sender,
                &recipient,
                &self.config.mint,
                &self.config.token_program,
            );
            Ok(InstructionSet::with_setup(create, transfer))
        }
    }
}

#[async_trait]
impl<R: RpcClientLike> InstructionPlanner for TokenInstructionPlanner<R> {
    type Instruction = Instruction;

    async fn plan(
        &self,
        sender: Option<&WalletAddress>,
        recipient: &WalletAddress,
        asset: AssetKind,
        amount: Decimal,
    ) -> Result<InstructionSet<Instruction>, PayError> {
        let sender = sender.ok_or(PayError::WalletNotConnected)?;
        let sender_key = parse_address(sender)?;
        let recipient_key = parse_address(recipient)?;

        match asset {
            AssetKind::Native => {
                let lamports = to_base_units(amount, NATIVE_DECIMALS)?;
                Ok(InstructionSet::transfer_only(
                    solana_system_interface::instruction::transfer(
                        &sender_key,
                        &recipient_key,
                        lamports,
                    ),
                ))
            }
            AssetKind::StableToken => {
                self.plan_stable_token(sender_key, recipient_key, amount).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::ATA_PROGRAM_PUBKEY;
    use crate::rpc::TokenAmount;
    use solana_account::Account;
    use solana_client::client_error::{ClientError, ClientErrorKind, Result as ClientResult};

    const SENDER: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
    const RECIPIENT: &str = "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU";

    // TransferChecked discriminator in spl-token instruction data.
    const TRANSFER_CHECKED: u8 = 12;

    struct MockRpc {
        recipient_account: Option<Result<(), String>>,
    }

    impl MockRpc {
        fn with_recipient_account() -> Self {
            Self {
                recipient_account: Some(Ok(())),
            }
        }

        fn without_recipient_account() -> Self {
            Self {
                recipient_account: None,
            }
        }

        fn with_probe_fault(message: &str) -> Self {
            Self {
                recipient_account: Some(Err(message.to_owned())),
            }
        }
    }

    #[async_trait]
    impl RpcClientLike for MockRpc {
        async fn get_account(&self, address: &Pubkey) -> ClientResult<Account> {
            match &self.recipient_account {
                Some(Ok(())) => Ok(Account {
                    lamports: 2_039_280,
                    data: vec![0; 165],
                    owner: spl_token::id(),
                    executable: false,
                    rent_epoch: 0,
                }),
                Some(Err(message)) => {
                    Err(ClientError::from(ClientErrorKind::Custom(message.clone())))
                }
                None => Err(ClientError::from(ClientErrorKind::Custom(format!(
                    "AccountNotFound: pubkey={address}"
                )))),
            }
        }

        async fn get_token_account_balance(
            &self,
            _token_account: &Pubkey,
        ) -> ClientResult<TokenAmount> {
            Err(ClientError::from(ClientErrorKind::Custom(
                "not used".to_owned(),
            )))
        }

        async fn get_balance(&self, _address: &Pubkey) -> ClientResult<u64> {
            Ok(0)
        }
    }

    fn planner(rpc: MockRpc) -> TokenInstructionPlanner<MockRpc> {
        TokenInstructionPlanner::new(rpc, TokenConfig::usdc_devnet())
    }

    fn sender() -> WalletAddress {
        WalletAddress::from(SENDER)
    }

    async fn plan(
        planner: &TokenInstructionPlanner<MockRpc>,
        asset: AssetKind,
    ) -> InstructionSet<Instruction> {
        planner
            .plan(
                Some(&sender()),
                &WalletAddress::from(RECIPIENT),
                asset,
                Decimal::new(1, 1), // 0.1
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_existing_recipient_account_yields_transfer_only() {
        let planner = planner(MockRpc::with_recipient_account());
        let set = plan(&planner, AssetKind::StableToken).await;

        assert_eq!(set.len(), 1);
        let transfer = &set.into_vec()[0];
        assert_eq!(transfer.program_id, spl_token::id());
        assert_eq!(transfer.data[0], TRANSFER_CHECKED);
        // 0.1 USDC = 100_000 base units, little-endian after the tag.
        assert_eq!(&transfer.data[1..9], &100_000u64.to_le_bytes());
    }

    #[tokio::test]
    async fn test_missing_recipient_account_prepends_creation() {
        let planner = planner(MockRpc::without_recipient_account());
        let set = plan(&planner, AssetKind::StableToken).await;

        assert_eq!(set.len(), 2);
        let instructions = set.into_vec();
        assert_eq!(instructions[0].program_id, ATA_PROGRAM_PUBKEY);
        assert_eq!(instructions[0].data, vec![1]);
        assert_eq!(instructions[1].program_id, spl_token::id());
        assert_eq!(instructions[1].data[0], TRANSFER_CHECKED);
    }

    #[tokio::test]
    async fn test_probe_fault_assumes_missing_account() {
        let planner = planner(MockRpc::with_probe_fault("connection refused"));
        let set = plan(&planner, AssetKind::StableToken).await;
        // The creation instruction is idempotent, so over-including it on
        // a failed probe is safe.
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn test_native_transfer_is_single_instruction() {
        let planner = planner(MockRpc::with_recipient_account());
        let set = plan(&planner, AssetKind::Native).await;

        assert_eq!(set.len(), 1);
        let transfer = &set.into_vec()[0];
        assert_eq!(transfer.program_id, solana_system_interface::program::ID);
        assert_eq!(transfer.accounts[0].pubkey, SENDER.parse().unwrap());
        assert_eq!(transfer.accounts[1].pubkey, RECIPIENT.parse().unwrap());
    }

    #[tokio::test]
    async fn test_transfer_routes_between_derived_accounts() {
        let planner = planner(MockRpc::with_recipient_account());
        let config = TokenConfig::usdc_devnet();
        let set = plan(&planner, AssetKind::StableToken).await;

        let transfer = &set.into_vec()[0];
        let source = derive_token_account(
            &SENDER.parse().unwrap(),
            &config.token_program,
            &config.mint,
        );
        let destination = derive_token_account(
            &RECIPIENT.parse().unwrap(),
            &config.token_program,
            &config.mint,
        );
        assert_eq!(transfer.accounts[0].pubkey, source);
        assert_eq!(transfer.accounts[2].pubkey, destination);
    }

    #[tokio::test]
    async fn test_absent_sender_is_wallet_not_connected() {
        let planner = planner(MockRpc::with_recipient_account());
        let err = planner
            .plan(
                None,
                &WalletAddress::from(RECIPIENT),
                AssetKind::StableToken,
                Decimal::ONE,
            )
            .await
            .unwrap_err();
        assert_eq!(err, PayError::WalletNotConnected);
    }

    #[tokio::test]
    async fn test_invalid_recipient_address_is_rejected() {
        let planner = planner(MockRpc::with_recipient_account());
        let err = planner
            .plan(
                Some(&sender()),
                &WalletAddress::from("not-base58-!!"),
                AssetKind::StableToken,
                Decimal::ONE,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PayError::InvalidAddress(_)));
    }
}
