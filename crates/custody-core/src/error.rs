//! Error types for the custody core.

use thiserror::Error;

use crate::crypto::PublicKey;
use crate::transaction::TransactionLink;
use crate::types::TxId;

/// Errors raised while constructing or signing records locally.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("no keypair supplied for owner {0}")]
    KeypairMismatch(PublicKey),

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Reasons a transaction, block or vote is not admissible.
///
/// Every variant is a recoverable rejection. Ledger outages are reported
/// separately by the ledger crate and never surface as one of these.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("`operation`: `{operation}` must be either {allowed}")]
    UnsupportedOperation { operation: String, allowed: String },

    #[error("amount error: {0}")]
    AmountError(String),

    #[error("asset id mismatch: declared {declared:?}, inputs resolve to {resolved}")]
    AssetIdMismatch {
        declared: Option<TxId>,
        resolved: TxId,
    },

    #[error("input `{0}` doesn't exist")]
    TransactionDoesNotExist(TxId),

    #[error("input `{0}` does not exist in a valid block")]
    TransactionNotInValidBlock(TxId),

    #[error("input `{input}` was already spent by `{spent_by}`")]
    DoubleSpend {
        input: TransactionLink,
        spent_by: TxId,
    },

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid hash: claimed {claimed}, computed {computed}")]
    InvalidHash { claimed: String, computed: String },

    #[error("operation error: {0}")]
    OperationError(String),

    #[error("schema violation: {0}")]
    Schema(String),
}

impl ValidationError {
    /// Short machine-friendly name of the rejection kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MalformedTransaction(_) => "MalformedTransaction",
            ValidationError::UnsupportedOperation { .. } => "UnsupportedOperation",
            ValidationError::AmountError(_) => "AmountError",
            ValidationError::AssetIdMismatch { .. } => "AssetIdMismatch",
            ValidationError::TransactionDoesNotExist(_) => "TransactionDoesNotExist",
            ValidationError::TransactionNotInValidBlock(_) => "TransactionNotInValidBlock",
            ValidationError::DoubleSpend { .. } => "DoubleSpend",
            ValidationError::InvalidSignature(_) => "InvalidSignature",
            ValidationError::InvalidHash { .. } => "InvalidHash",
            ValidationError::OperationError(_) => "OperationError",
            ValidationError::Schema(_) => "Schema",
        }
    }
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                ValidationError::InvalidSignature(e.to_string())
            }
            CoreError::KeypairMismatch(_) => ValidationError::InvalidSignature(e.to_string()),
            CoreError::Malformed(msg) => ValidationError::MalformedTransaction(msg),
            CoreError::EncodingError(msg) | CoreError::DecodingError(msg) => {
                ValidationError::Schema(msg)
            }
        }
    }
}
