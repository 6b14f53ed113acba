//! Shared wallet state and the provider event bridge
//!
//! ```text
//! provider "connect"        ──► connected()     ─┐
//! provider "disconnect"     ──► disconnected()  ─┼─► evaluate() ─► account slot
//! provider "accountChanged" ──► reconnected()   ─┘        │
//!                                                         └─► emit "change"
//! ```
//!
//! The account slot is the only mutable field. It is replaced wholesale and
//! never borrowed across an await or a listener call.

use crate::account::{evaluate, Account, Evaluation};
use crate::config::WalletConfig;
use crate::events::{ChangeEvent, Listeners, StandardEvent};
use crate::provider::{Provider, ProviderEvent, ProviderListener};
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) struct WalletState<P: Provider> {
    pub(crate) provider: Rc<P>,
    pub(crate) config: WalletConfig,
    pub(crate) listeners: Listeners,
    account: RefCell<Option<Rc<Account>>>,
    subscriptions: RefCell<Vec<(ProviderEvent, ProviderListener)>>,
}

impl<P: Provider + 'static> WalletState<P> {
    pub(crate) fn new(provider: Rc<P>, config: WalletConfig) -> Rc<Self> {
        let state = Rc::new(Self {
            provider,
            config,
            listeners: Listeners::new(),
            account: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
        });
        Self::subscribe(&state);
        // A session may predate the wallet; pick it up without waiting for an event
        state.connected();
        state
    }

    /// Register one provider listener per lifecycle event. Listeners hold a
    /// weak reference so the provider never keeps the wallet alive.
    fn subscribe(state: &Rc<Self>) {
        for event in ProviderEvent::ALL {
            let weak = Rc::downgrade(state);
            let listener: ProviderListener = Rc::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.handle(event);
                }
            });
            state.provider.on(event, Rc::clone(&listener));
            state.subscriptions.borrow_mut().push((event, listener));
        }
    }

    fn handle(&self, event: ProviderEvent) {
        tracing::debug!(event = event.as_str(), "provider event");
        match event {
            ProviderEvent::Connect => self.connected(),
            ProviderEvent::Disconnect => self.disconnected(),
            ProviderEvent::AccountChanged => self.reconnected(),
        }
    }

    pub(crate) fn account(&self) -> Option<Rc<Account>> {
        self.account.borrow().clone()
    }

    pub(crate) fn accounts(&self) -> Vec<Rc<Account>> {
        self.account().into_iter().collect()
    }

    /// Re-read the provider key and update the slot.
    pub(crate) fn connected(&self) {
        let key = self.provider.public_key();
        let evaluation = {
            let current = self.account.borrow();
            evaluate(current.as_ref(), key.as_ref())
        };
        self.apply(evaluation);
    }

    pub(crate) fn disconnected(&self) {
        let evaluation = {
            let current = self.account.borrow();
            evaluate(current.as_ref(), None)
        };
        self.apply(evaluation);
    }

    fn reconnected(&self) {
        if self.provider.public_key().is_some() {
            self.connected();
        } else {
            self.disconnected();
        }
    }

    fn apply(&self, evaluation: Evaluation) {
        let Evaluation { next, changed } = evaluation;
        if !changed {
            return;
        }
        match &next {
            Some(account) => tracing::info!(address = account.address(), "account changed"),
            None => tracing::info!("account cleared"),
        }
        *self.account.borrow_mut() = next;
        self.listeners.emit(StandardEvent::Change, &ChangeEvent { accounts: self.accounts() });
    }
}

impl<P: Provider> Drop for WalletState<P> {
    fn drop(&mut self) {
        for (event, listener) in self.subscriptions.get_mut().drain(..) {
            self.provider.off(event, &listener);
        }
    }
}
