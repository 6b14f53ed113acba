//! Feature surface - the closed, versioned capability set
//!
//! | Identifier | Handle | Entry point |
//! |------------|--------|-------------|
//! | `standard:connect` | [`ConnectFeature`] | `connect(input)` |
//! | `standard:disconnect` | [`DisconnectFeature`] | `disconnect()` |
//! | `standard:events` | [`EventsFeature`] | `on(event, listener)` |
//! | `solana:signAndSendTransaction` | [`SignAndSendTransactionFeature`] | `sign_and_send_transaction(inputs)` |
//! | `solana:signTransaction` | [`SignTransactionFeature`] | `sign_transaction(inputs)` |
//! | `solana:signMessage` | [`SignMessageFeature`] | `sign_message(inputs)` |
//! | `solana:signIn` | [`SignInFeature`] | `sign_in(inputs)` |
//! | `cactus:` (configurable) | [`ProviderFeature`] | `provider()` |
//!
//! Each handle owns an `Rc` to the wallet state, so it keeps working after
//! being cloned out of the wallet and the wallet itself is dropped.

use super::state::WalletState;
use super::types::*;
use crate::core::identifiers::{solana, standard, FEATURE_VERSION};
use crate::error::WalletResult;
use crate::events::{ChangeListener, StandardEvent, Unsubscribe};
use crate::provider::{Provider, SignInInput, SignInOutput};
use crate::transaction::TransactionVersion;
use serde_json::{json, Map, Value};
use std::rc::Rc;

macro_rules! feature_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<P: Provider> {
            state: Rc<WalletState<P>>,
        }

        impl<P: Provider> Clone for $name<P> {
            fn clone(&self) -> Self {
                Self { state: Rc::clone(&self.state) }
            }
        }

        impl<P: Provider> std::fmt::Debug for $name<P> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name)).field("version", &FEATURE_VERSION).finish()
            }
        }

        impl<P: Provider> $name<P> {
            pub fn version(&self) -> &'static str {
                FEATURE_VERSION
            }
        }
    };
}

feature_handle!(
    /// `standard:connect`
    ConnectFeature
);
feature_handle!(
    /// `standard:disconnect`
    DisconnectFeature
);
feature_handle!(
    /// `standard:events`
    EventsFeature
);
feature_handle!(
    /// `solana:signAndSendTransaction`
    SignAndSendTransactionFeature
);
feature_handle!(
    /// `solana:signTransaction`
    SignTransactionFeature
);
feature_handle!(
    /// `solana:signMessage`
    SignMessageFeature
);
feature_handle!(
    /// `solana:signIn`
    SignInFeature
);
feature_handle!(
    /// Provider namespace: the raw provider for advanced consumers.
    ProviderFeature
);

impl<P: Provider + 'static> ConnectFeature<P> {
    /// Returns the tracked accounts, connecting through the provider first
    /// when none is tracked.
    pub async fn connect(&self, input: ConnectInput) -> WalletResult<ConnectOutput> {
        self.state.connect(input).await
    }
}

impl<P: Provider + 'static> DisconnectFeature<P> {
    pub async fn disconnect(&self) -> WalletResult<()> {
        self.state.disconnect().await
    }
}

impl<P: Provider + 'static> EventsFeature<P> {
    pub fn on(&self, event: StandardEvent, listener: ChangeListener) -> Unsubscribe {
        self.state.listeners.on(event, listener)
    }
}

impl<P: Provider + 'static> SignAndSendTransactionFeature<P> {
    pub fn supported_transaction_versions(&self) -> &'static [TransactionVersion] {
        &TransactionVersion::SUPPORTED
    }

    /// Each input is signed and sent in its own round trip, in order.
    pub async fn sign_and_send_transaction(
        &self,
        inputs: Vec<SignAndSendTransactionInput>,
    ) -> WalletResult<Vec<SignAndSendTransactionOutput>> {
        self.state.sign_and_send_transaction(inputs).await
    }
}

impl<P: Provider + 'static> SignTransactionFeature<P> {
    pub fn supported_transaction_versions(&self) -> &'static [TransactionVersion] {
        &TransactionVersion::SUPPORTED
    }

    /// Several inputs are signed together in one provider batch.
    pub async fn sign_transaction(&self, inputs: Vec<SignTransactionInput>) -> WalletResult<Vec<SignTransactionOutput>> {
        self.state.sign_transaction(inputs).await
    }
}

impl<P: Provider + 'static> SignMessageFeature<P> {
    pub async fn sign_message(&self, inputs: Vec<SignMessageInput>) -> WalletResult<Vec<SignMessageOutput>> {
        self.state.sign_message(inputs).await
    }
}

impl<P: Provider + 'static> SignInFeature<P> {
    pub async fn sign_in(&self, inputs: Vec<SignInInput>) -> WalletResult<Vec<SignInOutput>> {
        self.state.sign_in(inputs).await
    }
}

impl<P: Provider + 'static> ProviderFeature<P> {
    pub fn namespace(&self) -> &str {
        &self.state.config.namespace
    }

    pub fn provider(&self) -> Rc<P> {
        Rc::clone(&self.state.provider)
    }
}

/// The full capability map, built once per wallet.
pub struct Features<P: Provider> {
    pub connect: ConnectFeature<P>,
    pub disconnect: DisconnectFeature<P>,
    pub events: EventsFeature<P>,
    pub sign_and_send_transaction: SignAndSendTransactionFeature<P>,
    pub sign_transaction: SignTransactionFeature<P>,
    pub sign_message: SignMessageFeature<P>,
    pub sign_in: SignInFeature<P>,
    pub provider: ProviderFeature<P>,
}

impl<P: Provider + 'static> Features<P> {
    pub(crate) fn new(state: &Rc<WalletState<P>>) -> Self {
        Self {
            connect: ConnectFeature { state: Rc::clone(state) },
            disconnect: DisconnectFeature { state: Rc::clone(state) },
            events: EventsFeature { state: Rc::clone(state) },
            sign_and_send_transaction: SignAndSendTransactionFeature { state: Rc::clone(state) },
            sign_transaction: SignTransactionFeature { state: Rc::clone(state) },
            sign_message: SignMessageFeature { state: Rc::clone(state) },
            sign_in: SignInFeature { state: Rc::clone(state) },
            provider: ProviderFeature { state: Rc::clone(state) },
        }
    }

    /// Every feature identifier, standard ones first.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = standard::ALL.to_vec();
        names.extend_from_slice(&[
            solana::SIGN_AND_SEND_TRANSACTION,
            solana::SIGN_TRANSACTION,
            solana::SIGN_MESSAGE,
            solana::SIGN_IN,
        ]);
        names.push(self.provider.namespace());
        names
    }

    pub fn supports(&self, identifier: &str) -> bool {
        self.names().contains(&identifier)
    }

    /// Declaration of the capability map: identifier to `{version, ...}`.
    pub fn describe(&self) -> Value {
        let versions = json!(TransactionVersion::SUPPORTED);
        let mut map = Map::new();
        for name in self.names() {
            let entry = match name {
                solana::SIGN_AND_SEND_TRANSACTION | solana::SIGN_TRANSACTION => json!({
                    "version": FEATURE_VERSION,
                    "supportedTransactionVersions": versions,
                }),
                _ => json!({ "version": FEATURE_VERSION }),
            };
            map.insert(name.to_string(), entry);
        }
        Value::Object(map)
    }
}

impl<P: Provider> std::fmt::Debug for Features<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Features").field("namespace", &self.provider.state.config.namespace).finish()
    }
}
