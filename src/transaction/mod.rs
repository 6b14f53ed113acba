//! Transaction payloads in their two wire encodings
//!
//! Payloads are Solana [`VersionedTransaction`]s: a legacy message or a v0
//! message behind the `0x80` version prefix. Wire bytes go through `bincode`
//! with fixed-width integers, the layout the Solana SDK types serialize to.
//! [`TransactionExt::decode`] accepts either family and the decoded value
//! re-encodes to the family it came from.

mod error;

pub use error::TransactionError;

pub use solana_message::compiled_instruction::CompiledInstruction;
pub use solana_message::{v0, Message as LegacyMessage, MessageHeader, VersionedMessage};
pub use solana_signature::Signature;
pub use solana_transaction::versioned::VersionedTransaction;

use bincode::Options;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A decoded transaction of either encoding family.
pub type Transaction = VersionedTransaction;

/// Encoding family of a transaction payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionVersion {
    Legacy,
    V0,
}

impl TransactionVersion {
    /// Versions accepted by the signing features.
    pub const SUPPORTED: [TransactionVersion; 2] = [TransactionVersion::Legacy, TransactionVersion::V0];
}

impl From<&VersionedMessage> for TransactionVersion {
    fn from(message: &VersionedMessage) -> Self {
        match message {
            VersionedMessage::Legacy(_) => TransactionVersion::Legacy,
            VersionedMessage::V0(_) => TransactionVersion::V0,
        }
    }
}

impl Serialize for TransactionVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TransactionVersion::Legacy => serializer.serialize_str("legacy"),
            TransactionVersion::V0 => serializer.serialize_u8(0),
        }
    }
}

impl<'de> Deserialize<'de> for TransactionVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Number(u8),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Name(name) if name == "legacy" => Ok(TransactionVersion::Legacy),
            Raw::Number(0) => Ok(TransactionVersion::V0),
            Raw::Name(other) => Err(serde::de::Error::custom(format!("unknown transaction version: {other}"))),
            Raw::Number(other) => Err(serde::de::Error::custom(format!("unsupported transaction version: {other}"))),
        }
    }
}

fn wire() -> impl Options {
    bincode::options().with_fixint_encoding().reject_trailing_bytes()
}

/// Wire-format helpers for [`VersionedTransaction`].
pub trait TransactionExt: Sized {
    /// Decode a signed or unsigned payload. Signatures are not verified.
    fn decode(bytes: &[u8]) -> Result<Self, TransactionError>;

    fn encode(&self) -> Result<Vec<u8>, TransactionError>;

    fn transaction_version(&self) -> TransactionVersion;
}

impl TransactionExt for VersionedTransaction {
    fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        wire().deserialize(bytes).map_err(|e| TransactionError::Decode(e.to_string()))
    }

    fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        wire().serialize(self).map_err(|e| TransactionError::Encode(e.to_string()))
    }

    fn transaction_version(&self) -> TransactionVersion {
        TransactionVersion::from(&self.message)
    }
}
