//! Inputs and outputs of the standard features.

use crate::account::Account;
use crate::provider::SendOptions;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectInput {
    /// Only reconnect a previously trusted session; never prompt.
    pub silent: bool,
}

impl ConnectInput {
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectOutput {
    pub accounts: Vec<Rc<Account>>,
}

#[derive(Debug, Clone)]
pub struct SignTransactionInput {
    /// Must be the wallet's tracked account (same `Rc`).
    pub account: Rc<Account>,
    /// Serialized transaction, legacy or versioned.
    pub transaction: Vec<u8>,
    pub chain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignTransactionOutput {
    pub signed_transaction: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SignAndSendTransactionInput {
    pub account: Rc<Account>,
    pub transaction: Vec<u8>,
    pub chain: String,
    pub options: Option<SendOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignAndSendTransactionOutput {
    /// Raw signature bytes (decoded from the provider's base58 text).
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SignMessageInput {
    pub account: Rc<Account>,
    pub message: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignMessageOutput {
    /// The exact bytes that were signed, echoed back.
    pub signed_message: Vec<u8>,
    pub signature: Vec<u8>,
}
