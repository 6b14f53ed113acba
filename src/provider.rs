//! Provider contract - the injected wallet object this crate adapts
//!
//! The provider owns key storage, approval UI and network submission. It is
//! consumed strictly through [`Provider`]: a nullable current key, async
//! connect/sign round trips, and three lifecycle events.
//!
//! All futures are `?Send`: the provider lives on a single-threaded host
//! (a browser page) and round trips are awaited cooperatively.

use crate::account::PublicKey;
use crate::core::identifiers::provider_events;
use crate::transaction::Transaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Failure reported by the provider itself (rejection, timeout, RPC error).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    /// Provider-specific error code, e.g. 4001 for a user rejection.
    pub code: Option<i64>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Lifecycle events emitted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEvent {
    Connect,
    Disconnect,
    AccountChanged,
}

impl ProviderEvent {
    pub const ALL: [ProviderEvent; 3] = [ProviderEvent::Connect, ProviderEvent::Disconnect, ProviderEvent::AccountChanged];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEvent::Connect => provider_events::CONNECT,
            ProviderEvent::Disconnect => provider_events::DISCONNECT,
            ProviderEvent::AccountChanged => provider_events::ACCOUNT_CHANGED,
        }
    }
}

/// Callback registered with the provider. Identity is the `Rc` allocation.
pub type ProviderListener = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOptions {
    /// Only connect if the site is already trusted; never prompt.
    pub only_if_trusted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

/// Submission options passed verbatim to the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preflight_commitment: Option<Commitment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_preflight: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignAndSendResponse {
    /// Base58 transaction signature.
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageResponse {
    pub signature: Vec<u8>,
}

/// Sign-in request. Every field is optional; the provider fills in what it
/// needs (domain, address, nonce, timestamps).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

/// The account that signed in, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInAccount {
    pub address: String,
    pub public_key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInOutput {
    pub account: SignInAccount,
    pub signed_message: Vec<u8>,
    pub signature: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
}

#[async_trait(?Send)]
pub trait Provider {
    /// Key of the current session, if any.
    fn public_key(&self) -> Option<PublicKey>;

    fn is_connected(&self) -> bool {
        self.public_key().is_some()
    }

    async fn connect(&self, options: Option<ConnectOptions>) -> ProviderResult<PublicKey>;

    async fn disconnect(&self) -> ProviderResult<()>;

    async fn sign_transaction(&self, transaction: Transaction) -> ProviderResult<Transaction>;

    async fn sign_all_transactions(&self, transactions: Vec<Transaction>) -> ProviderResult<Vec<Transaction>>;

    async fn sign_and_send_transaction(
        &self,
        transaction: Transaction,
        options: Option<SendOptions>,
    ) -> ProviderResult<SignAndSendResponse>;

    async fn sign_message(&self, message: &[u8]) -> ProviderResult<SignMessageResponse>;

    async fn sign_in(&self, input: Option<SignInInput>) -> ProviderResult<SignInOutput>;

    fn on(&self, event: ProviderEvent, listener: ProviderListener);

    /// Remove a listener previously passed to [`Provider::on`] (same `Rc`).
    fn off(&self, event: ProviderEvent, listener: &ProviderListener);
}
