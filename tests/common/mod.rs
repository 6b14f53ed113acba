//! Shared test fixtures: a scriptable in-memory provider and sample payloads.

#![allow(dead_code)]

use async_trait::async_trait;
use cactus_standard::transaction::{v0, CompiledInstruction, LegacyMessage, MessageHeader, Signature};
use cactus_standard::{
    Provider, ProviderError, ProviderEvent, ProviderListener, ProviderResult, PublicKey, SendOptions,
    SignAndSendResponse, SignInAccount, SignInInput, SignInOutput, SignMessageResponse, Transaction,
    TransactionExt, VersionedMessage,
};
use solana_hash::Hash;
use solana_pubkey::Pubkey;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub const KEY_A: [u8; 32] = [1u8; 32];
pub const KEY_B: [u8; 32] = [2u8; 32];
pub const SIGNATURE: [u8; 64] = [9u8; 64];

/// In-memory provider. Records every call by method name, emits lifecycle
/// events like the extension does, and fails any method on request.
pub struct MockProvider {
    key: Cell<Option<PublicKey>>,
    connect_key: Cell<PublicKey>,
    emit_events: Cell<bool>,
    calls: RefCell<Vec<String>>,
    listeners: RefCell<HashMap<ProviderEvent, Vec<ProviderListener>>>,
    failures: RefCell<HashMap<&'static str, ProviderError>>,
    send_signature: RefCell<String>,
    send_options: RefCell<Vec<Option<SendOptions>>>,
    sign_in_inputs: RefCell<Vec<Option<SignInInput>>>,
}

impl MockProvider {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            key: Cell::new(None),
            connect_key: Cell::new(PublicKey::new(KEY_A)),
            emit_events: Cell::new(true),
            calls: RefCell::new(Vec::new()),
            listeners: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashMap::new()),
            send_signature: RefCell::new(bs58::encode(SIGNATURE).into_string()),
            send_options: RefCell::new(Vec::new()),
            sign_in_inputs: RefCell::new(Vec::new()),
        })
    }

    /// Provider that already holds a trusted session.
    pub fn with_session(key: [u8; 32]) -> Rc<Self> {
        let provider = Self::new();
        provider.key.set(Some(PublicKey::new(key)));
        provider
    }

    /// Stop emitting lifecycle events from connect/disconnect.
    pub fn quiet(self: &Rc<Self>) -> Rc<Self> {
        self.emit_events.set(false);
        Rc::clone(self)
    }

    pub fn set_key(&self, key: Option<[u8; 32]>) {
        self.key.set(key.map(PublicKey::new));
    }

    pub fn set_send_signature(&self, signature: &str) {
        *self.send_signature.borrow_mut() = signature.to_string();
    }

    pub fn fail(&self, method: &'static str, error: ProviderError) {
        self.failures.borrow_mut().insert(method, error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn send_options(&self) -> Vec<Option<SendOptions>> {
        self.send_options.borrow().clone()
    }

    pub fn sign_in_inputs(&self) -> Vec<Option<SignInInput>> {
        self.sign_in_inputs.borrow().clone()
    }

    pub fn listener_count(&self, event: ProviderEvent) -> usize {
        self.listeners.borrow().get(&event).map_or(0, Vec::len)
    }

    /// Fire `event` to every registered listener.
    pub fn emit(&self, event: ProviderEvent) {
        let snapshot: Vec<ProviderListener> = self.listeners.borrow().get(&event).cloned().unwrap_or_default();
        for listener in snapshot {
            listener();
        }
    }

    fn record(&self, method: &'static str, detail: Option<String>) -> ProviderResult<()> {
        let entry = match detail {
            Some(detail) => format!("{method}:{detail}"),
            None => method.to_string(),
        };
        self.calls.borrow_mut().push(entry);
        match self.failures.borrow().get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Fill the fee payer's slot, as a wallet holding that key would.
fn sign(mut transaction: Transaction) -> ProviderResult<Transaction> {
    let slot = transaction
        .signatures
        .first_mut()
        .ok_or_else(|| ProviderError::new("transaction has no signer"))?;
    *slot = Signature::from(SIGNATURE);
    Ok(transaction)
}

#[async_trait(?Send)]
impl Provider for MockProvider {
    fn public_key(&self) -> Option<PublicKey> {
        self.key.get()
    }

    async fn connect(&self, options: Option<cactus_standard::ConnectOptions>) -> ProviderResult<PublicKey> {
        let trusted = options.map(|o| o.only_if_trusted).unwrap_or(false);
        self.record("connect", trusted.then(|| "trusted".to_string()))?;
        let key = self.connect_key.get();
        self.key.set(Some(key));
        if self.emit_events.get() {
            self.emit(ProviderEvent::Connect);
        }
        Ok(key)
    }

    async fn disconnect(&self) -> ProviderResult<()> {
        self.record("disconnect", None)?;
        self.key.set(None);
        if self.emit_events.get() {
            self.emit(ProviderEvent::Disconnect);
        }
        Ok(())
    }

    async fn sign_transaction(&self, transaction: Transaction) -> ProviderResult<Transaction> {
        self.record("signTransaction", None)?;
        sign(transaction)
    }

    async fn sign_all_transactions(&self, transactions: Vec<Transaction>) -> ProviderResult<Vec<Transaction>> {
        self.record("signAllTransactions", Some(transactions.len().to_string()))?;
        transactions.into_iter().map(sign).collect()
    }

    async fn sign_and_send_transaction(
        &self,
        transaction: Transaction,
        options: Option<SendOptions>,
    ) -> ProviderResult<SignAndSendResponse> {
        self.record("signAndSendTransaction", None)?;
        sign(transaction)?;
        self.send_options.borrow_mut().push(options);
        Ok(SignAndSendResponse { signature: self.send_signature.borrow().clone() })
    }

    async fn sign_message(&self, message: &[u8]) -> ProviderResult<SignMessageResponse> {
        self.record("signMessage", None)?;
        Ok(SignMessageResponse { signature: vec![9u8; message.len()] })
    }

    async fn sign_in(&self, input: Option<SignInInput>) -> ProviderResult<SignInOutput> {
        self.record("signIn", None)?;
        let statement = input.as_ref().and_then(|i| i.statement.clone()).unwrap_or_default();
        self.sign_in_inputs.borrow_mut().push(input);
        let key = self.connect_key.get();
        Ok(SignInOutput {
            account: SignInAccount { address: key.to_base58(), public_key: key.to_bytes().to_vec() },
            signed_message: statement.into_bytes(),
            signature: SIGNATURE.to_vec(),
            signature_type: Some("ed25519".into()),
        })
    }

    fn on(&self, event: ProviderEvent, listener: ProviderListener) {
        self.listeners.borrow_mut().entry(event).or_default().push(listener);
    }

    fn off(&self, event: ProviderEvent, listener: &ProviderListener) {
        if let Some(listeners) = self.listeners.borrow_mut().get_mut(&event) {
            listeners.retain(|l| !Rc::ptr_eq(l, listener));
        }
    }
}

fn transfer_header() -> MessageHeader {
    MessageHeader { num_required_signatures: 1, num_readonly_signed_accounts: 0, num_readonly_unsigned_accounts: 1 }
}

fn transfer_keys() -> Vec<Pubkey> {
    vec![Pubkey::new_from_array(KEY_A), Pubkey::new_from_array(KEY_B), Pubkey::default()]
}

fn transfer_instruction() -> CompiledInstruction {
    CompiledInstruction { program_id_index: 2, accounts: vec![0, 1], data: vec![2, 0, 0, 0, 128, 150, 152, 0, 0, 0, 0, 0] }
}

fn unsigned(message: VersionedMessage) -> Vec<u8> {
    Transaction { signatures: vec![Signature::default()], message }.encode().expect("encode transaction")
}

pub fn legacy_transaction() -> Vec<u8> {
    unsigned(VersionedMessage::Legacy(LegacyMessage {
        header: transfer_header(),
        account_keys: transfer_keys(),
        recent_blockhash: Hash::new_from_array([7u8; 32]),
        instructions: vec![transfer_instruction()],
    }))
}

pub fn v0_transaction() -> Vec<u8> {
    unsigned(VersionedMessage::V0(v0::Message {
        header: transfer_header(),
        account_keys: transfer_keys(),
        recent_blockhash: Hash::new_from_array([7u8; 32]),
        instructions: vec![transfer_instruction()],
        address_table_lookups: Vec::new(),
    }))
}

/// Signature slots as the provider fills them.
pub fn signed_slots() -> Vec<Signature> {
    vec![Signature::from(SIGNATURE)]
}

/// Change listener that counts notifications and keeps the last payload size.
pub fn change_counter() -> (Rc<Cell<usize>>, Rc<Cell<usize>>, cactus_standard::ChangeListener) {
    let count = Rc::new(Cell::new(0));
    let last_len = Rc::new(Cell::new(0));
    let (c, l) = (Rc::clone(&count), Rc::clone(&last_len));
    let listener: cactus_standard::ChangeListener = Rc::new(move |event: &cactus_standard::ChangeEvent| {
        c.set(c.get() + 1);
        l.set(event.accounts.len());
    });
    (count, last_len, listener)
}
