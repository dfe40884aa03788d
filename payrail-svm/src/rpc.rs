//! RPC client abstraction for Solana.
//!
//! The readiness checker and the instruction planner only need three read
//! operations, so they are written against [`RpcClientLike`] instead of the
//! concrete client. Tests substitute in-memory mocks; production uses the
//! blanket implementation for the nonblocking [`RpcClient`].

use async_trait::async_trait;
use rust_decimal::Decimal;
use solana_account::Account;
use solana_client::client_error::{ClientError, ClientErrorKind, Result as ClientResult};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_pubkey::Pubkey;

/// Integer token amount paired with its decimal exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    /// Raw amount in base units.
    pub amount: u64,
    /// Decimal exponent of the mint.
    pub decimals: u8,
}

impl TokenAmount {
    /// The amount in UI units. Exact.
    #[must_use]
    pub fn ui_amount(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.amount), u32::from(self.decimals))
    }
}

/// The read surface of a Solana RPC client consumed by this crate.
#[async_trait]
pub trait RpcClientLike: Send + Sync {
    /// Fetches an account. Fails when the account does not exist.
    async fn get_account(&self, address: &Pubkey) -> ClientResult<Account>;

    /// Fetches a token account's balance.
    async fn get_token_account_balance(&self, token_account: &Pubkey)
    -> ClientResult<TokenAmount>;

    /// Fetches an account's lamport balance.
    async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64>;
}

#[async_trait]
impl RpcClientLike for RpcClient {
    async fn get_account(&self, address: &Pubkey) -> ClientResult<Account> {
        RpcClient::get_account(self, address).await
    }

    async fn get_token_account_balance(
        &self,
        token_account: &Pubkey,
    ) -> ClientResult<TokenAmount> {
        let balance = RpcClient::get_token_account_balance(self, token_account).await?;
        let amount = balance.amount.parse::<u64>().map_err(|err| {
            ClientError::from(ClientErrorKind::Custom(format!(
                "invalid token amount for {token_account}: {err}"
            )))
        })?;
        Ok(TokenAmount {
            amount,
            decimals: balance.decimals,
        })
    }

    async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64> {
        RpcClient::get_balance(self, address).await
    }
}

#[async_trait]
impl<T: RpcClientLike + ?Sized> RpcClientLike for std::sync::Arc<T> {
    async fn get_account(&self, address: &Pubkey) -> ClientResult<Account> {
        self.as_ref().get_account(address).await
    }

    async fn get_token_account_balance(
        &self,
        token_account: &Pubkey,
    ) -> ClientResult<TokenAmount> {
        self.as_ref().get_token_account_balance(token_account).await
    }

    async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64> {
        self.as_ref().get_balance(address).await
    }
}

/// Whether an RPC error means the probed account does not exist, as opposed
/// to a transport or node fault.
///
/// The nonblocking client reports a missing account as a custom
/// `AccountNotFound: pubkey=…` error, so this is a message-level check.
#[must_use]
pub fn is_account_not_found(err: &ClientError) -> bool {
    let message = err.to_string();
    message.contains("AccountNotFound") || message.to_lowercase().contains("could not find account")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_amount_is_exact() {
        let amount = TokenAmount {
            amount: 1_234_567,
            decimals: 6,
        };
        assert_eq!(amount.ui_amount(), Decimal::new(1_234_567, 6));
    }

    #[test]
    fn test_account_not_found_detection() {
        let missing = ClientError::from(ClientErrorKind::Custom(
            "AccountNotFound: pubkey=abc".to_owned(),
        ));
        assert!(is_account_not_found(&missing));

        let transport =
            ClientError::from(ClientErrorKind::Custom("connection refused".to_owned()));
        assert!(!is_account_not_found(&transport));
    }
}
