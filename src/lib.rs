//! Cactus Standard: a Wallet Standard adapter for the Cactus Solana provider.
//!
//! # Architecture
//!
//! ```text
//! Application / dApp
//!   │
//!   ├── WalletRegistry (discover wallets, listen for registrations)
//!   │
//!   └── StandardWallet<P>
//!         ├── accounts: empty or one Rc<Account> (change detector)
//!         ├── Features<P> (connect, disconnect, events, sign*, namespace)
//!         └── Provider P (injected wallet: keys, approval UI, RPC)
//!
//! LegacyAdapter<P> (pre-standard apps) ── initialize ──► WalletRegistry
//! ```
//!
//! # Features
//!
//! | Identifier | Entry point |
//! |------------|-------------|
//! | `standard:connect` | `features().connect.connect(input)` |
//! | `standard:disconnect` | `features().disconnect.disconnect()` |
//! | `standard:events` | `features().events.on(StandardEvent::Change, listener)` |
//! | `solana:signAndSendTransaction` | `features().sign_and_send_transaction.sign_and_send_transaction(inputs)` |
//! | `solana:signTransaction` | `features().sign_transaction.sign_transaction(inputs)` |
//! | `solana:signMessage` | `features().sign_message.sign_message(inputs)` |
//! | `solana:signIn` | `features().sign_in.sign_in(inputs)` |
//! | `cactus:` | `features().provider.provider()` |
//!
//! # Cargo features
//!
//! - `native` - stderr logging via `tracing-subscriber` (default)
//! - `wasm` - browser binding over the injected `window.cactus` object
//!
//! # Usage
//!
//! ```ignore
//! use cactus_standard::{initialize, ConnectInput, WalletRegistry};
//!
//! let registry = WalletRegistry::new();
//! let (wallet, _unregister) = initialize(provider, &registry);
//! let accounts = wallet.features().connect.connect(ConnectInput::default()).await?.accounts;
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod account;
pub mod adapter;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod provider;
pub mod registry;
pub mod standard;
pub mod transaction;

// =============================================================================
// Native-only modules
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;

// =============================================================================
// WASM-only modules (browser, wasm-bindgen)
// =============================================================================
#[cfg(feature = "wasm")]
pub mod wasm;

// =============================================================================
// Re-exports
// =============================================================================
pub use account::{evaluate, Account, Evaluation, PublicKey};
pub use adapter::{AdapterEvent, LegacyAdapter, ReadyState};
pub use config::{DisconnectPolicy, WalletConfig, WalletIcon};
pub use crate::core::{is_solana_chain, Chain};
pub use error::{WalletError, WalletResult};
pub use events::{ChangeEvent, ChangeListener, Listeners, StandardEvent, Unsubscribe};
pub use provider::{
    Commitment, ConnectOptions, Provider, ProviderError, ProviderEvent, ProviderListener, ProviderResult,
    SendOptions, SignAndSendResponse, SignInAccount, SignInInput, SignInOutput, SignMessageResponse,
};
pub use registry::{initialize, initialize_with_config, Unregister, Wallet, WalletRegistry};
pub use standard::{
    ConnectInput, ConnectOutput, Features, SignAndSendTransactionInput, SignAndSendTransactionOutput,
    SignMessageInput, SignMessageOutput, SignTransactionInput, SignTransactionOutput, StandardWallet,
};
pub use transaction::{Transaction, TransactionError, TransactionExt, TransactionVersion, VersionedMessage};

#[cfg(feature = "native")]
pub use logging::{init_logging, init_logging_with, LogFormat};

// =============================================================================
// Re-exports: WASM
// =============================================================================
#[cfg(feature = "wasm")]
pub use wasm::InjectedProvider;
