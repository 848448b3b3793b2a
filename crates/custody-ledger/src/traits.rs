//! Ledger trait: the read interface the validators depend on.
//!
//! This trait keeps the validators storage-agnostic. The in-memory
//! implementation is the reference; persistent backends implement the
//! same contract.

use async_trait::async_trait;
use custody_core::{Asset, AssetId, BlockId, PublicKey, Transaction, TxId};

use crate::error::Result;

/// Where a stored transaction stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxStatus {
    /// In a block the federation decided is valid.
    Valid,
    /// In a block still being voted on.
    Undecided,
    /// Waiting to be put in a block.
    Backlog,
}

impl TxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TxStatus::Valid => "valid",
            TxStatus::Undecided => "undecided",
            TxStatus::Backlog => "backlog",
        }
    }
}

/// The Ledger trait: async queries over admitted ledger state.
///
/// All lookups are async so backends may do blocking I/O on a worker
/// thread. Membership is configuration and answers synchronously.
///
/// # Design Notes
///
/// - **Sole authority on spends**: `get_spent` only reports spends by
///   transactions stored as [`TxStatus::Valid`].
/// - **Snapshot reads**: one validation call may issue many lookups; the
///   implementation decides how consistent they are with each other.
#[async_trait]
pub trait Ledger: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Transaction Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a transaction and its status.
    async fn get_transaction_with_status(
        &self,
        txid: &TxId,
    ) -> Result<Option<(Transaction, TxStatus)>>;

    /// Get a transaction regardless of status.
    async fn get_transaction(&self, txid: &TxId) -> Result<Option<Transaction>> {
        Ok(self
            .get_transaction_with_status(txid)
            .await?
            .map(|(tx, _)| tx))
    }

    /// Get the valid transaction that spends output `cid` of `txid`.
    async fn get_spent(&self, txid: &TxId, cid: u32) -> Result<Option<Transaction>>;

    /// Get the asset created by transaction `asset_id`.
    async fn get_asset_by_id(&self, asset_id: &AssetId) -> Result<Option<Asset>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Votes
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether this node already cast a properly signed vote on `block_id`.
    ///
    /// Errors when more than one vote or an improperly signed vote is
    /// stored for this node.
    async fn has_previous_vote(&self, block_id: &BlockId, voters: &[PublicKey]) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Federation
    // ─────────────────────────────────────────────────────────────────────────

    /// This node's public key.
    fn me(&self) -> PublicKey;

    /// Every other federation node.
    fn nodes_except_me(&self) -> Vec<PublicKey>;

    /// The full federation: `nodes_except_me` plus `me`.
    fn federation(&self) -> Vec<PublicKey> {
        let mut nodes = self.nodes_except_me();
        nodes.push(self.me());
        nodes
    }

    /// Whether `key` belongs to a federation node.
    fn is_federation_member(&self, key: &PublicKey) -> bool {
        *key == self.me() || self.nodes_except_me().contains(key)
    }
}
