//! App-side wallet registry and the `initialize` entry point
//!
//! Wallets announce themselves by registering; applications list what is
//! registered and listen for late arrivals. Everything here is
//! single-threaded and lives as long as the page does.

use crate::account::Account;
use crate::config::{WalletConfig, WalletIcon};
use crate::core::Chain;
use crate::provider::Provider;
use crate::standard::StandardWallet;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Read-only view of a registered wallet.
pub trait Wallet {
    fn name(&self) -> &str;
    fn icon(&self) -> &WalletIcon;
    fn version(&self) -> &str;
    fn chains(&self) -> Vec<Chain>;
    fn accounts(&self) -> Vec<Rc<Account>>;
    fn feature_names(&self) -> Vec<String>;
}

impl<P: Provider + 'static> Wallet for StandardWallet<P> {
    fn name(&self) -> &str {
        StandardWallet::name(self)
    }

    fn icon(&self) -> &WalletIcon {
        StandardWallet::icon(self)
    }

    fn version(&self) -> &str {
        StandardWallet::version(self)
    }

    fn chains(&self) -> Vec<Chain> {
        StandardWallet::chains(self)
    }

    fn accounts(&self) -> Vec<Rc<Account>> {
        StandardWallet::accounts(self)
    }

    fn feature_names(&self) -> Vec<String> {
        self.features().names().into_iter().map(String::from).collect()
    }
}

pub type RegisterListener = Rc<dyn Fn(&Rc<dyn Wallet>)>;

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    wallets: Vec<(u64, Rc<dyn Wallet>)>,
    listeners: Vec<(u64, RegisterListener)>,
}

#[derive(Clone, Default)]
pub struct WalletRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `wallet` and notify `on_register` listeners. The same wallet may
    /// be registered twice; each registration is removed independently.
    pub fn register(&self, wallet: Rc<dyn Wallet>) -> Unregister {
        let (id, snapshot) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.wallets.push((id, Rc::clone(&wallet)));
            let snapshot: Vec<RegisterListener> = inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (id, snapshot)
        };
        tracing::info!(name = wallet.name(), "wallet registered");
        for listener in snapshot {
            listener(&wallet);
        }
        Unregister::new(&self.inner, Target::Wallet(id))
    }

    pub fn wallets(&self) -> Vec<Rc<dyn Wallet>> {
        self.inner.borrow().wallets.iter().map(|(_, w)| Rc::clone(w)).collect()
    }

    pub fn on_register(&self, listener: RegisterListener) -> Unregister {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        Unregister::new(&self.inner, Target::Listener(id))
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for WalletRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("WalletRegistry")
            .field("wallets", &inner.wallets.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Wallet(u64),
    Listener(u64),
}

/// Removes one registration (wallet or listener). Calling it again is a no-op.
pub struct Unregister {
    inner: Weak<RefCell<RegistryInner>>,
    target: Target,
    done: Cell<bool>,
}

impl Unregister {
    fn new(inner: &Rc<RefCell<RegistryInner>>, target: Target) -> Self {
        Self { inner: Rc::downgrade(inner), target, done: Cell::new(false) }
    }

    pub fn call(&self) {
        if self.done.replace(true) {
            return;
        }
        let Some(inner) = self.inner.upgrade() else { return };
        let mut inner = inner.borrow_mut();
        match self.target {
            Target::Wallet(id) => inner.wallets.retain(|(wid, _)| *wid != id),
            Target::Listener(id) => inner.listeners.retain(|(lid, _)| *lid != id),
        }
    }
}

impl std::fmt::Debug for Unregister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unregister").field("target", &self.target).field("done", &self.done.get()).finish()
    }
}

/// Wrap `provider` in a standard wallet with the default identity and
/// register it.
pub fn initialize<P: Provider + 'static>(
    provider: Rc<P>,
    registry: &WalletRegistry,
) -> (Rc<StandardWallet<P>>, Unregister) {
    initialize_with_config(provider, WalletConfig::default(), registry)
}

pub fn initialize_with_config<P: Provider + 'static>(
    provider: Rc<P>,
    config: WalletConfig,
    registry: &WalletRegistry,
) -> (Rc<StandardWallet<P>>, Unregister) {
    let wallet = Rc::new(StandardWallet::with_config(provider, config));
    let unregister = registry.register(Rc::clone(&wallet) as Rc<dyn Wallet>);
    (wallet, unregister)
}
