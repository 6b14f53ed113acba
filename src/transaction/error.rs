/// Errors raised while decoding or encoding a transaction payload.
///
/// Carries the `bincode` message as text so the error stays `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// Bytes are not a legacy or v0 transaction, or have data left over.
    #[error("invalid transaction: {0}")]
    Decode(String),

    #[error("transaction encoding failed: {0}")]
    Encode(String),
}
