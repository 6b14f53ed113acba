//! Identifier constants for the wallet protocol
//!
//! Centralized registry for feature identifiers and event names.

/// Standard (chain-agnostic) features
pub mod standard {
    pub const CONNECT: &str = "standard:connect";
    pub const DISCONNECT: &str = "standard:disconnect";
    pub const EVENTS: &str = "standard:events";

    pub const ALL: &[&str] = &[CONNECT, DISCONNECT, EVENTS];
}

/// Solana signing features
pub mod solana {
    pub const SIGN_AND_SEND_TRANSACTION: &str = "solana:signAndSendTransaction";
    pub const SIGN_TRANSACTION: &str = "solana:signTransaction";
    pub const SIGN_MESSAGE: &str = "solana:signMessage";
    pub const SIGN_IN: &str = "solana:signIn";

    /// Features an account can be used with
    pub const ACCOUNT_FEATURES: &[&str] =
        &[SIGN_AND_SEND_TRANSACTION, SIGN_TRANSACTION, SIGN_MESSAGE, SIGN_IN];
}

/// Provider-specific namespace
pub const CACTUS_NAMESPACE: &str = "cactus:";

/// Every feature version in this implementation
pub const FEATURE_VERSION: &str = "1.0.0";

/// Wallet Standard events
pub mod events {
    pub const CHANGE: &str = "change";
}

/// Provider lifecycle events
pub mod provider_events {
    pub const CONNECT: &str = "connect";
    pub const DISCONNECT: &str = "disconnect";
    pub const ACCOUNT_CHANGED: &str = "accountChanged";
}
