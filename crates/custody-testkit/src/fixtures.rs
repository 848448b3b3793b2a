//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a small federation around an
//! in-memory ledger, deterministic users, and builders for signed
//! transactions and blocks.

use std::sync::Arc;

use custody::{Validator, ValidatorConfig};
use custody_core::{
    Asset, AssetId, Block, Keypair, PublicKey, SignedVote, Transaction, Vote,
};
use custody_ledger::{LedgerError, MemoryLedger, TxStatus};

/// A federation of nodes sharing one in-memory ledger.
///
/// `me` is the node doing the validating; `peers` are the other members.
pub struct FederationFixture {
    pub me: Keypair,
    pub peers: Vec<Keypair>,
    pub ledger: Arc<MemoryLedger>,
}

impl FederationFixture {
    /// Create a federation of `1 + peer_count` nodes with deterministic keys.
    pub fn new(peer_count: usize) -> Self {
        Self::with_seed(0xf0, peer_count)
    }

    /// Create with keys derived from `tag`. Distinct tags give distinct
    /// federations.
    pub fn with_seed(tag: u8, peer_count: usize) -> Self {
        let me = seeded_keypair(tag, 0);
        let peers: Vec<Keypair> = (1..=peer_count)
            .map(|i| seeded_keypair(tag, i as u8))
            .collect();
        let ledger = MemoryLedger::new(
            me.public_key(),
            peers.iter().map(|p| p.public_key()).collect(),
        );
        Self {
            me,
            peers,
            ledger: Arc::new(ledger),
        }
    }

    /// A validator over this federation's ledger with the default config.
    pub fn validator(&self) -> Validator<MemoryLedger> {
        self.validator_with(ValidatorConfig::default())
    }

    pub fn validator_with(&self, config: ValidatorConfig) -> Validator<MemoryLedger> {
        Validator::from_shared(Arc::clone(&self.ledger), config)
    }

    /// Every node's public key, `me` first.
    pub fn voters(&self) -> Vec<PublicKey> {
        std::iter::once(&self.me)
            .chain(self.peers.iter())
            .map(|kp| kp.public_key())
            .collect()
    }

    /// Record a transaction as part of a valid block.
    pub fn commit(&self, tx: &Transaction) -> Result<(), LedgerError> {
        self.ledger.insert_transaction(tx.clone(), TxStatus::Valid)
    }

    /// Record a transaction with an explicit status.
    pub fn store(&self, tx: &Transaction, status: TxStatus) -> Result<(), LedgerError> {
        self.ledger.insert_transaction(tx.clone(), status)
    }

    /// A block of `transactions` signed by `producer`, voted on by the
    /// whole federation.
    pub fn block(&self, producer: &Keypair, transactions: Vec<Transaction>) -> Block {
        signed_block(producer, transactions, self.voters())
    }

    /// Cast and record this node's vote on `block`.
    pub fn vote(&self, block: &Block, is_block_valid: bool) -> Result<SignedVote, LedgerError> {
        let reason = (!is_block_valid).then(|| "rejected by fixture".to_string());
        let vote = Vote::new(block.id(), block.id(), is_block_valid, reason).sign(&self.me);
        self.ledger.record_vote(vote.clone())?;
        Ok(vote)
    }
}

impl Default for FederationFixture {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Deterministic users for multi-party tests.
pub fn users(count: usize) -> Vec<Keypair> {
    (0..count).map(|i| seeded_keypair(0x0a, i as u8)).collect()
}

fn seeded_keypair(tag: u8, index: u8) -> Keypair {
    let mut seed = [0u8; 32];
    seed[0] = tag;
    seed[1] = index;
    Keypair::from_seed(&seed)
}

/// A signed CREATE giving `owner` one output per entry in `amounts`.
pub fn signed_create(owner: &Keypair, amounts: &[u64], divisible: bool) -> Transaction {
    let asset = if divisible {
        Asset::divisible(None)
    } else {
        Asset::new(None)
    };
    let recipients = amounts
        .iter()
        .map(|&amount| (vec![owner.public_key()], amount))
        .collect();

    Transaction::create(&[owner.public_key()], recipients, asset, None)
        .and_then(|tx| tx.sign(&[owner]))
        .expect("fixture CREATE is well formed")
}

/// A signed TRANSFER of the selected outputs of `input`.
///
/// `signers` must hold every key owning the selected outputs.
pub fn signed_transfer(
    signers: &[&Keypair],
    input: &Transaction,
    indices: Option<&[u32]>,
    recipients: Vec<(Vec<PublicKey>, u64)>,
) -> Transaction {
    Transaction::transfer(
        input.to_inputs(indices),
        recipients,
        asset_of(input),
        None,
    )
    .and_then(|tx| tx.sign(signers))
    .expect("fixture TRANSFER is well formed")
}

/// The asset a transaction carries.
pub fn asset_of(tx: &Transaction) -> AssetId {
    if tx.is_creation() {
        tx.id
    } else {
        tx.asset.data_id.expect("transfers carry an asset link")
    }
}

/// A block signed by `producer`.
pub fn signed_block(producer: &Keypair, transactions: Vec<Transaction>, voters: Vec<PublicKey>) -> Block {
    Block::new(transactions, producer.public_key(), voters)
        .expect("fixture block is not empty")
        .sign(producer)
        .expect("producer signs its own block")
}
