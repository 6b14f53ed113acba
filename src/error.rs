//! Error taxonomy for the standard wallet and the legacy adapter.
//!
//! Local validation failures (`NotConnected`, `InvalidAccount`, `InvalidChain`,
//! `ConflictingChain`) are raised before the provider is touched. Provider
//! failures keep the original [`ProviderError`] as their source.

use crate::provider::ProviderError;
use crate::transaction::TransactionError;

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    /// A capability that needs an account was called with none tracked.
    #[error("not connected")]
    NotConnected,

    /// The caller's account is not the tracked account.
    #[error("invalid account")]
    InvalidAccount,

    #[error("invalid chain: {0}")]
    InvalidChain(String),

    /// Two items of one batch named different chains.
    #[error("conflicting chain: {first} and {second}")]
    ConflictingChain { first: String, second: String },

    #[error("sign transaction failed: {message}")]
    SignTransaction {
        message: String,
        #[source]
        source: ProviderError,
    },

    #[error("sign message failed: {message}")]
    SignMessage {
        message: String,
        #[source]
        source: ProviderError,
    },

    #[error("sign in failed: {0}")]
    SignIn(#[source] ProviderError),

    #[error("connection failed: {0}")]
    Connection(#[source] ProviderError),

    #[error("disconnection failed: {0}")]
    Disconnection(#[source] ProviderError),

    /// The provider has not been detected in the host environment.
    #[error("wallet not ready")]
    NotReady,

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// The provider returned a signature that is not valid base58.
    #[error("signature encoding: {0}")]
    SignatureEncoding(String),

    #[error("public key: {0}")]
    PublicKey(String),
}

impl WalletError {
    pub(crate) fn sign_transaction(source: ProviderError) -> Self {
        WalletError::SignTransaction { message: source.message.clone(), source }
    }

    pub(crate) fn sign_message(source: ProviderError) -> Self {
        WalletError::SignMessage { message: source.message.clone(), source }
    }

    /// True for failures raised locally, before any provider round trip.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WalletError::NotConnected
                | WalletError::InvalidAccount
                | WalletError::InvalidChain(_)
                | WalletError::ConflictingChain { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn wrapped_provider_error_keeps_message_and_source() {
        let err = WalletError::sign_transaction(ProviderError::new("User rejected the request."));
        assert_eq!(err.to_string(), "sign transaction failed: User rejected the request.");
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "User rejected the request.");
        assert!(!err.is_validation());
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(WalletError::NotConnected.is_validation());
        assert!(WalletError::InvalidChain("solana:nope".into()).is_validation());
        assert!(WalletError::ConflictingChain {
            first: "solana:devnet".into(),
            second: "solana:testnet".into(),
        }
        .is_validation());
        assert!(!WalletError::NotReady.is_validation());
    }
}
