//! Standard wallet - the protocol-facing aggregate over one provider
//!
//! # Architecture
//!
//! ```text
//! StandardWallet<P>
//!   │
//!   ├── WalletState (shared by every handle)
//!   │     ├── provider: Rc<P>
//!   │     ├── account slot (change detector)
//!   │     └── listeners ("change")
//!   │
//!   └── Features<P>
//!         ├── standard:connect / standard:disconnect / standard:events
//!         ├── solana:signAndSendTransaction / signTransaction / signMessage / signIn
//!         └── cactus: (raw provider)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let wallet = StandardWallet::new(Rc::new(provider));
//! let off = wallet.features().events.on(StandardEvent::Change, Rc::new(|e| {
//!     println!("{} account(s)", e.accounts.len());
//! }));
//! let accounts = wallet.features().connect.connect(ConnectInput::default()).await?.accounts;
//! off.call();
//! ```

mod dispatch;
mod features;
mod state;
mod types;

pub use features::*;
pub use types::*;

use crate::account::Account;
use crate::config::{WalletConfig, WalletIcon};
use crate::core::Chain;
use crate::events::ChangeEvent;
use crate::provider::Provider;
use futures::channel::mpsc;
use state::WalletState;
use std::rc::Rc;

pub struct StandardWallet<P: Provider> {
    state: Rc<WalletState<P>>,
    features: Features<P>,
}

impl<P: Provider + 'static> StandardWallet<P> {
    pub fn new(provider: Rc<P>) -> Self {
        Self::with_config(provider, WalletConfig::default())
    }

    /// Wrap `provider`, subscribing to its lifecycle events and picking up
    /// any session it already has.
    pub fn with_config(provider: Rc<P>, config: WalletConfig) -> Self {
        tracing::debug!(name = %config.name, namespace = %config.namespace, "standard wallet created");
        let state = WalletState::new(provider, config);
        let features = Features::new(&state);
        Self { state, features }
    }

    pub fn name(&self) -> &str {
        &self.state.config.name
    }

    pub fn icon(&self) -> &WalletIcon {
        &self.state.config.icon
    }

    pub fn version(&self) -> &str {
        &self.state.config.version
    }

    pub fn chains(&self) -> Vec<Chain> {
        Chain::ALL.to_vec()
    }

    /// Snapshot of the tracked accounts: empty or exactly one.
    pub fn accounts(&self) -> Vec<Rc<Account>> {
        self.state.accounts()
    }

    pub fn features(&self) -> &Features<P> {
        &self.features
    }

    pub fn provider(&self) -> Rc<P> {
        Rc::clone(&self.state.provider)
    }

    /// Stream of `change` notifications, alongside any registered listeners.
    pub fn watch(&self) -> mpsc::UnboundedReceiver<ChangeEvent> {
        self.state.listeners.watch()
    }
}

impl<P: Provider> std::fmt::Debug for StandardWallet<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardWallet")
            .field("name", &self.state.config.name)
            .field("listeners", &self.state.listeners)
            .finish()
    }
}
