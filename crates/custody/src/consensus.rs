//! Consensus rules: the pluggable set of admission predicates.
//!
//! A federation can swap in stricter rules (extra checks before or after
//! the base ones) without touching the validator facade.

use async_trait::async_trait;
use custody_core::{Block, PublicKey, SignedVote, Transaction};
use custody_ledger::Ledger;

use crate::error::Result;
use crate::validator::ValidatorConfig;

/// The predicates a node applies before admitting or voting.
#[async_trait]
pub trait ConsensusRules: Send + Sync {
    /// Decide whether `tx` is admissible.
    async fn validate_transaction<'a, L>(
        &self,
        ledger: &L,
        tx: &'a Transaction,
        config: &ValidatorConfig,
    ) -> Result<&'a Transaction>
    where
        L: Ledger + ?Sized;

    /// Decide whether `block` is admissible.
    async fn validate_block<'a, L>(
        &self,
        ledger: &L,
        block: &'a Block,
        config: &ValidatorConfig,
    ) -> Result<&'a Block>
    where
        L: Ledger + ?Sized;

    /// Check a vote's signer, signature and structure.
    fn verify_vote(&self, voters: &[PublicKey], signed_vote: &SignedVote) -> bool;
}

/// The base rules: the free validators, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseConsensusRules;

#[async_trait]
impl ConsensusRules for BaseConsensusRules {
    async fn validate_transaction<'a, L>(
        &self,
        ledger: &L,
        tx: &'a Transaction,
        _config: &ValidatorConfig,
    ) -> Result<&'a Transaction>
    where
        L: Ledger + ?Sized,
    {
        crate::transaction::validate_transaction(tx, ledger).await
    }

    async fn validate_block<'a, L>(
        &self,
        ledger: &L,
        block: &'a Block,
        config: &ValidatorConfig,
    ) -> Result<&'a Block>
    where
        L: Ledger + ?Sized,
    {
        crate::block::validate_block_with(block, ledger, self, config).await
    }

    fn verify_vote(&self, voters: &[PublicKey], signed_vote: &SignedVote) -> bool {
        custody_core::verify_vote(voters, signed_vote)
    }
}
