//! Error types for the validators.

use custody_core::ValidationError;
use custody_ledger::LedgerError;
use thiserror::Error;

/// Errors returned by validation calls.
///
/// A [`CustodyError::Rejected`] is a verdict on the record. A
/// [`CustodyError::Ledger`] means no verdict could be reached; the same call
/// may succeed once the ledger recovers.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// The record is not admissible.
    #[error("rejected: {0}")]
    Rejected(#[from] ValidationError),

    /// The ledger could not answer a query.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl CustodyError {
    /// The rejection reason, if this is a verdict.
    pub fn rejection(&self) -> Option<&ValidationError> {
        match self {
            CustodyError::Rejected(e) => Some(e),
            CustodyError::Ledger(_) => None,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, CustodyError::Rejected(_))
    }
}

/// Result type for validation calls.
pub type Result<T> = std::result::Result<T, CustodyError>;
