//! In-memory implementation of the Ledger trait.
//!
//! This is primarily for testing. It answers the same queries a persistent
//! backend would, keeping everything in memory with no persistence.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use custody_core::{
    verify_vote, Asset, AssetId, BlockId, PublicKey, SignedVote, Transaction, TransactionLink,
    TxId,
};

use crate::error::{LedgerError, Result};
use crate::traits::{Ledger, TxStatus};

/// In-memory ledger.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock.
pub struct MemoryLedger {
    me: PublicKey,
    nodes_except_me: Vec<PublicKey>,
    available: AtomicBool,
    inner: RwLock<MemoryLedgerInner>,
}

#[derive(Default)]
struct MemoryLedgerInner {
    /// Transactions indexed by id.
    transactions: HashMap<TxId, StoredTransaction>,

    /// Spent outputs: link -> id of the valid transaction spending it.
    spent: HashMap<TransactionLink, TxId>,

    /// Signed votes per block, in arrival order.
    votes: HashMap<BlockId, Vec<SignedVote>>,
}

struct StoredTransaction {
    tx: Transaction,
    status: TxStatus,
}

impl MemoryLedger {
    /// Create an empty ledger for node `me` in a federation with `nodes_except_me`.
    pub fn new(me: PublicKey, nodes_except_me: Vec<PublicKey>) -> Self {
        Self {
            me,
            nodes_except_me,
            available: AtomicBool::new(true),
            inner: RwLock::new(MemoryLedgerInner::default()),
        }
    }

    /// Simulate the backing store going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Store a transaction with a status.
    ///
    /// Storing as [`TxStatus::Valid`] registers the transaction as the
    /// spender of each of its inputs under a single write lock. An input
    /// already spent by a different transaction, or listed twice by this
    /// one, is rejected and nothing is stored. Re-storing the same
    /// transaction is idempotent; re-storing it with any other status
    /// releases the outputs it spent.
    pub fn insert_transaction(&self, tx: Transaction, status: TxStatus) -> Result<()> {
        self.check_available()?;
        let mut inner = self.write()?;
        let links: Vec<TransactionLink> =
            tx.fulfillments.iter().filter_map(|f| f.tx_input).collect();

        if status == TxStatus::Valid {
            let mut seen = HashSet::with_capacity(links.len());
            for link in &links {
                if !seen.insert(*link) {
                    return Err(LedgerError::AlreadySpent {
                        input: *link,
                        spent_by: tx.id,
                    });
                }
                if let Some(&spent_by) = inner.spent.get(link) {
                    if spent_by != tx.id {
                        return Err(LedgerError::AlreadySpent {
                            input: *link,
                            spent_by,
                        });
                    }
                }
            }
            for link in links {
                inner.spent.insert(link, tx.id);
            }
        } else {
            for link in &links {
                if inner.spent.get(link) == Some(&tx.id) {
                    inner.spent.remove(link);
                }
            }
        }

        tracing::debug!(tx_id = %tx.id, status = status.as_str(), "stored transaction");
        inner
            .transactions
            .insert(tx.id, StoredTransaction { tx, status });
        Ok(())
    }

    /// Store a signed vote.
    pub fn record_vote(&self, vote: SignedVote) -> Result<()> {
        self.check_available()?;
        let mut inner = self.write()?;
        inner
            .votes
            .entry(vote.vote.voting_for_block)
            .or_default()
            .push(vote);
        Ok(())
    }

    /// Number of stored transactions.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.transactions.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(LedgerError::Unavailable("memory ledger switched off".into()))
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryLedgerInner>> {
        self.inner.read().map_err(|_| LedgerError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryLedgerInner>> {
        self.inner.write().map_err(|_| LedgerError::Poisoned)
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_transaction_with_status(
        &self,
        txid: &TxId,
    ) -> Result<Option<(Transaction, TxStatus)>> {
        self.check_available()?;
        let inner = self.read()?;
        Ok(inner
            .transactions
            .get(txid)
            .map(|stored| (stored.tx.clone(), stored.status)))
    }

    async fn get_spent(&self, txid: &TxId, cid: u32) -> Result<Option<Transaction>> {
        self.check_available()?;
        let inner = self.read()?;
        let link = TransactionLink::new(*txid, cid);

        Ok(inner
            .spent
            .get(&link)
            .and_then(|spender| inner.transactions.get(spender))
            .filter(|stored| stored.status == TxStatus::Valid)
            .map(|stored| stored.tx.clone()))
    }

    async fn get_asset_by_id(&self, asset_id: &AssetId) -> Result<Option<Asset>> {
        self.check_available()?;
        let inner = self.read()?;

        Ok(inner
            .transactions
            .get(asset_id)
            .filter(|stored| stored.status == TxStatus::Valid && stored.tx.is_creation())
            .map(|stored| stored.tx.asset.clone()))
    }

    async fn has_previous_vote(&self, block_id: &BlockId, voters: &[PublicKey]) -> Result<bool> {
        self.check_available()?;
        let inner = self.read()?;

        let mine: Vec<&SignedVote> = inner
            .votes
            .get(block_id)
            .map(|votes| votes.iter().filter(|v| v.node_pubkey == self.me).collect())
            .unwrap_or_default();

        match mine.as_slice() {
            [] => Ok(false),
            [vote] => {
                if verify_vote(voters, vote) {
                    Ok(true)
                } else {
                    Err(LedgerError::ImproperVote {
                        block_id: *block_id,
                        voter: self.me,
                    })
                }
            }
            many => Err(LedgerError::MultipleVotes {
                block_id: *block_id,
                count: many.len(),
                voter: self.me,
            }),
        }
    }

    fn me(&self) -> PublicKey {
        self.me
    }

    fn nodes_except_me(&self) -> Vec<PublicKey> {
        self.nodes_except_me.clone()
    }
}
