//! Legacy adapter - the pre-standard, single-transaction wallet interface
//!
//! Apps that predate the registry drive the provider through this adapter.
//! It tracks whether the provider is present (`ReadyState`), registers the
//! standard wallet on first connect, and republishes every failure as an
//! [`AdapterEvent::Error`] before returning it.

use crate::account::PublicKey;
use crate::config::WalletIcon;
use crate::error::{WalletError, WalletResult};
use crate::provider::Provider;
use crate::registry::{initialize, Unregister, WalletRegistry};
use crate::transaction::{Transaction, TransactionExt, TransactionVersion};
use futures::channel::mpsc;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const WALLET_NAME: &str = "Cactus";
pub const WALLET_URL: &str = "https://www.mycactus.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Provider object found in the host.
    Installed,
    /// Host can run the provider, but it has not been found (yet).
    NotDetected,
    /// Host cannot run the provider at all.
    Unsupported,
}

impl ReadyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadyState::Installed => "Installed",
            ReadyState::NotDetected => "NotDetected",
            ReadyState::Unsupported => "Unsupported",
        }
    }
}

#[derive(Debug, Clone)]
pub enum AdapterEvent {
    Connect(PublicKey),
    Disconnect,
    Error(WalletError),
    ReadyStateChange(ReadyState),
}

/// Looks the provider up in the host; `None` while it is absent.
pub type Detector<P> = Box<dyn Fn() -> Option<Rc<P>>>;

pub struct LegacyAdapter<P: Provider> {
    registry: WalletRegistry,
    detector: Option<Detector<P>>,
    ready_state: Cell<ReadyState>,
    connecting: Cell<bool>,
    provider: RefCell<Option<Rc<P>>>,
    public_key: Cell<Option<PublicKey>>,
    registration: RefCell<Option<Unregister>>,
    watchers: RefCell<Vec<mpsc::UnboundedSender<AdapterEvent>>>,
}

impl<P: Provider + 'static> LegacyAdapter<P> {
    /// Adapter for a host that can run the provider. Call [`detect`](Self::detect)
    /// (e.g. on a polling timer) until it reports the provider installed.
    pub fn new(registry: WalletRegistry, detector: impl Fn() -> Option<Rc<P>> + 'static) -> Self {
        let adapter = Self::with_state(registry, Some(Box::new(detector)), ReadyState::NotDetected);
        adapter.detect();
        adapter
    }

    /// Adapter for a host with no window/document; never becomes ready.
    pub fn unsupported(registry: WalletRegistry) -> Self {
        Self::with_state(registry, None, ReadyState::Unsupported)
    }

    fn with_state(registry: WalletRegistry, detector: Option<Detector<P>>, ready_state: ReadyState) -> Self {
        Self {
            registry,
            detector,
            ready_state: Cell::new(ready_state),
            connecting: Cell::new(false),
            provider: RefCell::new(None),
            public_key: Cell::new(None),
            registration: RefCell::new(None),
            watchers: RefCell::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        WALLET_NAME
    }

    pub fn url(&self) -> &'static str {
        WALLET_URL
    }

    pub fn icon(&self) -> WalletIcon {
        WalletIcon::default()
    }

    pub fn supported_transaction_versions(&self) -> &'static [TransactionVersion] {
        &TransactionVersion::SUPPORTED
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state.get()
    }

    pub fn public_key(&self) -> Option<PublicKey> {
        self.public_key.get()
    }

    pub fn connected(&self) -> bool {
        self.public_key.get().is_some()
    }

    pub fn connecting(&self) -> bool {
        self.connecting.get()
    }

    /// Receive adapter events from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<AdapterEvent> {
        let (tx, rx) = mpsc::unbounded();
        self.watchers.borrow_mut().push(tx);
        rx
    }

    /// Probe the host once. Returns true when the provider is installed.
    pub fn detect(&self) -> bool {
        match self.ready_state.get() {
            ReadyState::Installed => return true,
            ReadyState::Unsupported => return false,
            ReadyState::NotDetected => {}
        }
        if self.find_provider().is_none() {
            return false;
        }
        tracing::info!(wallet = WALLET_NAME, "provider detected");
        self.ready_state.set(ReadyState::Installed);
        self.emit(AdapterEvent::ReadyStateChange(ReadyState::Installed));
        true
    }

    pub async fn connect(&self) -> WalletResult<()> {
        if self.connected() || self.connecting() {
            return Ok(());
        }
        let result = self.try_connect().await;
        self.connecting.set(false);
        result.map_err(|e| self.fail(e))
    }

    async fn try_connect(&self) -> WalletResult<()> {
        if self.ready_state.get() != ReadyState::Installed {
            return Err(WalletError::NotReady);
        }
        self.connecting.set(true);
        let provider = self.find_provider().ok_or(WalletError::NotReady)?;

        if self.registration.borrow().is_none() {
            let (_, unregister) = initialize(Rc::clone(&provider), &self.registry);
            *self.registration.borrow_mut() = Some(unregister);
        }
        *self.provider.borrow_mut() = Some(Rc::clone(&provider));

        let key = provider.connect(None).await.map_err(WalletError::Connection)?;
        tracing::info!(public_key = %key, "adapter connected");
        self.public_key.set(Some(key));
        self.emit(AdapterEvent::Connect(key));
        Ok(())
    }

    pub async fn disconnect(&self) -> WalletResult<()> {
        let provider = self.provider.borrow().clone();
        if let Some(provider) = provider {
            provider.disconnect().await.map_err(|e| self.fail(WalletError::Disconnection(e)))?;
            *self.provider.borrow_mut() = None;
            self.public_key.set(None);
        }
        tracing::info!("adapter disconnected");
        self.emit(AdapterEvent::Disconnect);
        Ok(())
    }

    pub async fn sign_transaction(&self, transaction: Transaction) -> WalletResult<Transaction> {
        let provider = self.require_provider()?;
        tracing::debug!(version = ?transaction.transaction_version(), "adapter signTransaction");
        provider
            .sign_transaction(transaction)
            .await
            .map_err(|e| self.fail(WalletError::sign_transaction(e)))
    }

    pub async fn sign_all_transactions(&self, transactions: Vec<Transaction>) -> WalletResult<Vec<Transaction>> {
        let provider = self.require_provider()?;
        tracing::debug!(count = transactions.len(), "adapter signAllTransactions");
        provider
            .sign_all_transactions(transactions)
            .await
            .map_err(|e| self.fail(WalletError::sign_transaction(e)))
    }

    /// Returns the raw signature bytes.
    pub async fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>> {
        let provider = self.require_provider()?;
        tracing::debug!(len = message.len(), "adapter signMessage");
        let response = provider
            .sign_message(message)
            .await
            .map_err(|e| self.fail(WalletError::sign_message(e)))?;
        Ok(response.signature)
    }

    fn find_provider(&self) -> Option<Rc<P>> {
        self.detector.as_ref().and_then(|detect| detect())
    }

    fn require_provider(&self) -> WalletResult<Rc<P>> {
        self.provider.borrow().clone().ok_or_else(|| self.fail(WalletError::NotConnected))
    }

    fn fail(&self, error: WalletError) -> WalletError {
        tracing::warn!(error = %error, "adapter error");
        self.emit(AdapterEvent::Error(error.clone()));
        error
    }

    fn emit(&self, event: AdapterEvent) {
        self.watchers.borrow_mut().retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }
}

impl<P: Provider> std::fmt::Debug for LegacyAdapter<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyAdapter")
            .field("ready_state", &self.ready_state.get())
            .field("connecting", &self.connecting.get())
            .field("public_key", &self.public_key.get())
            .finish()
    }
}
