//! Listener registry for Wallet Standard events
//!
//! Listeners are kept per event name in registration order. Registering
//! returns an [`Unsubscribe`] handle that removes exactly that registration;
//! calling it again is a no-op. Emission snapshots the listener list first,
//! so a listener may register, unregister or re-enter the wallet while an
//! event is being delivered.

use crate::account::Account;
use crate::core::identifiers::events;
use futures::channel::mpsc;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardEvent {
    Change,
}

impl StandardEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardEvent::Change => events::CHANGE,
        }
    }
}

/// Payload of a `change` notification: a snapshot of the accounts list.
#[derive(Debug, Clone, Default)]
pub struct ChangeEvent {
    pub accounts: Vec<Rc<Account>>,
}

pub type ChangeListener = Rc<dyn Fn(&ChangeEvent)>;

struct Registration {
    id: u64,
    listener: ChangeListener,
}

#[derive(Default)]
struct ListenerMap {
    next_id: u64,
    by_event: HashMap<StandardEvent, Vec<Registration>>,
    watchers: Vec<mpsc::UnboundedSender<ChangeEvent>>,
}

#[derive(Clone, Default)]
pub struct Listeners {
    map: Rc<RefCell<ListenerMap>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, event: StandardEvent, listener: ChangeListener) -> Unsubscribe {
        let mut map = self.map.borrow_mut();
        let id = map.next_id;
        map.next_id += 1;
        map.by_event.entry(event).or_default().push(Registration { id, listener });
        Unsubscribe { map: Rc::downgrade(&self.map), event, id, done: Cell::new(false) }
    }

    /// Stream of `change` payloads, fed alongside the callbacks.
    pub fn watch(&self) -> mpsc::UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = mpsc::unbounded();
        self.map.borrow_mut().watchers.push(tx);
        rx
    }

    pub fn emit(&self, event: StandardEvent, payload: &ChangeEvent) {
        let snapshot: Vec<ChangeListener> = {
            let mut map = self.map.borrow_mut();
            map.watchers.retain(|tx| tx.unbounded_send(payload.clone()).is_ok());
            map.by_event
                .get(&event)
                .map(|regs| regs.iter().map(|r| Rc::clone(&r.listener)).collect())
                .unwrap_or_default()
        };
        tracing::debug!(event = event.as_str(), listeners = snapshot.len(), "emit");
        for listener in snapshot {
            listener(payload);
        }
    }

    pub fn len(&self, event: StandardEvent) -> usize {
        self.map.borrow().by_event.get(&event).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, event: StandardEvent) -> bool {
        self.len(event) == 0
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.map.borrow();
        f.debug_struct("Listeners")
            .field("change", &map.by_event.get(&StandardEvent::Change).map_or(0, Vec::len))
            .field("watchers", &map.watchers.len())
            .finish()
    }
}

/// Removes one registration. Safe to call any number of times.
#[derive(Debug)]
pub struct Unsubscribe {
    map: Weak<RefCell<ListenerMap>>,
    event: StandardEvent,
    id: u64,
    done: Cell<bool>,
}

impl Unsubscribe {
    pub fn call(&self) {
        if self.done.replace(true) {
            return;
        }
        let Some(map) = self.map.upgrade() else { return };
        let mut map = map.borrow_mut();
        if let Some(regs) = map.by_event.get_mut(&self.event) {
            regs.retain(|r| r.id != self.id);
        }
    }
}
