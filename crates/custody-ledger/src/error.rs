//! Error types for the ledger.

use custody_core::{BlockId, PublicKey, TransactionLink, TxId};
use thiserror::Error;

/// Faults raised by a ledger.
///
/// These describe the store, never the record being validated. Callers
/// must not read one of these as "transaction invalid".
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The backing store cannot be reached.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// A writer panicked while holding the ledger lock.
    #[error("ledger lock poisoned")]
    Poisoned,

    /// This node has voted more than once on the same block.
    #[error("block {block_id} has {count} votes from public key {voter}")]
    MultipleVotes {
        block_id: BlockId,
        count: usize,
        voter: PublicKey,
    },

    /// This node's stored vote does not verify.
    #[error("block {block_id} already has an incorrectly signed vote from public key {voter}")]
    ImproperVote { block_id: BlockId, voter: PublicKey },

    /// Another valid transaction already spends this output.
    #[error("output {input} already spent by {spent_by}")]
    AlreadySpent {
        input: TransactionLink,
        spent_by: TxId,
    },
}

impl LedgerError {
    /// Whether retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Unavailable(_))
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
