//! The Validator: a ledger handle plus consensus rules and configuration.
//!
//! Cheap to clone. Clones share the ledger, so many workers can validate
//! concurrently against the same snapshot.

use std::sync::Arc;

use custody_core::{Block, PublicKey, SignedVote, Transaction};
use custody_ledger::Ledger;

use crate::consensus::{BaseConsensusRules, ConsensusRules};
use crate::error::{CustodyError, Result};

/// Configuration for the Validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Skip block validation entirely when this node already voted on the
    /// block.
    pub short_circuit_previous_votes: bool,
    /// Recompute each member transaction's id during block validation.
    pub verify_transaction_ids: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            short_circuit_previous_votes: true,
            verify_transaction_ids: true,
        }
    }
}

/// The main Validator struct.
///
/// Provides:
/// - Transaction validation
/// - Block validation
/// - Vote verification
pub struct Validator<L: Ledger, R: ConsensusRules = BaseConsensusRules> {
    /// The ledger queried for context.
    ledger: Arc<L>,
    /// Admission predicates.
    rules: R,
    /// Configuration.
    config: ValidatorConfig,
}

impl<L: Ledger> Validator<L> {
    /// Create a validator with the base rules.
    pub fn new(ledger: L, config: ValidatorConfig) -> Self {
        Self::from_shared(Arc::new(ledger), config)
    }

    /// Create a validator over a ledger that is shared with other owners.
    pub fn from_shared(ledger: Arc<L>, config: ValidatorConfig) -> Self {
        Self::with_rules(ledger, BaseConsensusRules, config)
    }
}

impl<L: Ledger, R: ConsensusRules> Validator<L, R> {
    /// Create a validator with custom rules.
    pub fn with_rules(ledger: Arc<L>, rules: R, config: ValidatorConfig) -> Self {
        Self {
            ledger,
            rules,
            config,
        }
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// This node's public key, as the ledger knows it.
    pub fn public_key(&self) -> PublicKey {
        self.ledger.me()
    }

    /// Validate a transaction.
    pub async fn validate_transaction<'a>(&self, tx: &'a Transaction) -> Result<&'a Transaction> {
        self.rules
            .validate_transaction(self.ledger.as_ref(), tx, &self.config)
            .await
    }

    /// Whether a transaction is admissible.
    ///
    /// Rejections become `Ok(false)`. Ledger faults are still errors: an
    /// unreachable ledger is not a verdict.
    pub async fn is_valid_transaction(&self, tx: &Transaction) -> Result<bool> {
        match self.validate_transaction(tx).await {
            Ok(_) => Ok(true),
            Err(CustodyError::Rejected(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Validate a block.
    pub async fn validate_block<'a>(&self, block: &'a Block) -> Result<&'a Block> {
        self.rules
            .validate_block(self.ledger.as_ref(), block, &self.config)
            .await
    }

    /// Verify a vote against a voter set.
    pub fn verify_vote(&self, voters: &[PublicKey], signed_vote: &SignedVote) -> bool {
        self.rules.verify_vote(voters, signed_vote)
    }
}

impl<L: Ledger, R: ConsensusRules + Clone> Clone for Validator<L, R> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            rules: self.rules.clone(),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_core::{Asset, Keypair};
    use custody_ledger::{MemoryLedger, TxStatus};

    fn keypair(seed: u8) -> Keypair {
        Keypair::from_seed(&[seed; 32])
    }

    fn create(owner: &Keypair, amount: u64) -> Transaction {
        Transaction::create(
            &[owner.public_key()],
            vec![(vec![owner.public_key()], amount)],
            Asset::default(),
            None,
        )
        .unwrap()
        .sign(&[owner])
        .unwrap()
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_default_config() {
        let config = ValidatorConfig::default();
        assert!(config.short_circuit_previous_votes);
        assert!(config.verify_transaction_ids);
    }

    #[tokio::test]
    async fn test_is_valid_transaction() {
        init_tracing();
        let node = keypair(1);
        let validator = Validator::new(
            MemoryLedger::new(node.public_key(), vec![]),
            ValidatorConfig::default(),
        );

        assert!(validator.is_valid_transaction(&create(&keypair(2), 1)).await.unwrap());
        assert!(!validator.is_valid_transaction(&create(&keypair(2), 2)).await.unwrap());
        assert_eq!(validator.public_key(), node.public_key());
    }

    #[tokio::test]
    async fn test_is_valid_transaction_surfaces_ledger_faults() {
        let alice = keypair(2);
        let ledger = Arc::new(MemoryLedger::new(keypair(1).public_key(), vec![]));
        let validator = Validator::from_shared(Arc::clone(&ledger), ValidatorConfig::default());

        let origin = create(&alice, 1);
        ledger.insert_transaction(origin.clone(), TxStatus::Valid).unwrap();
        let spend = Transaction::transfer(
            origin.to_inputs(None),
            vec![(vec![alice.public_key()], 1)],
            origin.id,
            None,
        )
        .unwrap()
        .sign(&[&alice])
        .unwrap();

        ledger.set_available(false);
        assert!(validator.is_valid_transaction(&spend).await.is_err());
        ledger.set_available(true);
        assert!(validator.is_valid_transaction(&spend).await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_ledger() {
        let node = keypair(1);
        let validator = Validator::new(
            MemoryLedger::new(node.public_key(), vec![]),
            ValidatorConfig::default(),
        );
        let clone = validator.clone();

        let origin = create(&keypair(2), 1);
        validator
            .ledger()
            .insert_transaction(origin.clone(), TxStatus::Valid)
            .unwrap();
        assert_eq!(clone.ledger().len().unwrap(), 1);
    }

    #[test]
    fn test_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator<MemoryLedger>>();
    }
}
