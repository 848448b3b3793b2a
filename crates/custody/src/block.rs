//! Block validation: authority, signature, then every member transaction.

use custody_core::{Block, ValidationError};
use custody_ledger::Ledger;

use crate::consensus::{BaseConsensusRules, ConsensusRules};
use crate::error::{CustodyError, Result};
use crate::validator::ValidatorConfig;

/// Validate a block with the base rules and the default [`ValidatorConfig`].
pub async fn validate_block<'a, L>(block: &'a Block, ledger: &L) -> Result<&'a Block>
where
    L: Ledger + ?Sized,
{
    validate_block_with(block, ledger, &BaseConsensusRules, &ValidatorConfig::default()).await
}

/// Validate a block against the ledger.
///
/// This performs:
/// - Previous vote short-circuit (if enabled)
/// - Producer must be a federation node
/// - Producer signature over the body
/// - Member transaction ids (if enabled)
/// - Every member transaction, in block order, through `rules`
///
/// The first failing member aborts the block with that member's error.
pub async fn validate_block_with<'a, L, R>(
    block: &'a Block,
    ledger: &L,
    rules: &R,
    config: &ValidatorConfig,
) -> Result<&'a Block>
where
    L: Ledger + ?Sized,
    R: ConsensusRules,
{
    match check_block(block, ledger, rules, config).await {
        Ok(()) => {
            tracing::debug!(
                block_id = %block.id(),
                transactions = block.transactions().len(),
                "block valid"
            );
            Ok(block)
        }
        Err(CustodyError::Rejected(e)) => {
            tracing::warn!(block_id = %block.id(), kind = e.kind(), error = %e, "block rejected");
            Err(e.into())
        }
        Err(e) => {
            tracing::warn!(block_id = %block.id(), error = %e, "block not validated");
            Err(e)
        }
    }
}

async fn check_block<L, R>(
    block: &Block,
    ledger: &L,
    rules: &R,
    config: &ValidatorConfig,
) -> Result<()>
where
    L: Ledger + ?Sized,
    R: ConsensusRules,
{
    // 1. A node that already voted on this block does not look at it again.
    // Authority and signature are skipped too.
    if config.short_circuit_previous_votes
        && ledger.has_previous_vote(&block.id(), block.voters()).await?
    {
        tracing::debug!(block_id = %block.id(), "already voted, skipping validation");
        return Ok(());
    }

    // 2. Authority
    if !ledger.is_federation_member(block.node_pubkey()) {
        return Err(ValidationError::OperationError(format!(
            "only federation nodes can create blocks, got {}",
            block.node_pubkey()
        ))
        .into());
    }

    // 3. Signature
    if !block.is_signature_valid() {
        return Err(ValidationError::InvalidSignature("invalid block signature".into()).into());
    }

    // 4. Members
    for tx in block.transactions() {
        if config.verify_transaction_ids {
            tx.check_id()?;
        }
        rules.validate_transaction(ledger, tx, config).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_core::{Asset, Keypair, PublicKey, Transaction, Vote};
    use custody_ledger::{LedgerError, MemoryLedger, TxStatus};

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

    fn signed_block(node: &Keypair, txs: Vec<Transaction>, voters: Vec<PublicKey>) -> Block {
        Block::new(txs, node.public_key(), voters)
            .unwrap()
            .sign(node)
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_block() {
        let me = keypair(1);
        let ledger = MemoryLedger::new(me.public_key(), vec![]);
        let block = signed_block(&me, vec![create(&keypair(5), 1)], vec![me.public_key()]);

        assert!(validate_block(&block, &ledger).await.is_ok());
    }

    #[tokio::test]
    async fn test_block_from_other_member_is_valid() {
        let (me, peer) = (keypair(1), keypair(2));
        let ledger = MemoryLedger::new(me.public_key(), vec![peer.public_key()]);
        let block = signed_block(&peer, vec![create(&keypair(5), 1)], vec![me.public_key()]);

        assert!(validate_block(&block, &ledger).await.is_ok());
    }

    #[tokio::test]
    async fn test_unauthorized_producer_rejected_before_transactions() {
        let (me, outsider) = (keypair(1), keypair(9));
        let ledger = MemoryLedger::new(me.public_key(), vec![]);
        // The member transaction is itself invalid; authority must fail first.
        let block = signed_block(&outsider, vec![create(&keypair(5), 2)], vec![me.public_key()]);

        let err = validate_block(&block, &ledger).await.unwrap_err();
        assert!(matches!(
            err,
            CustodyError::Rejected(ValidationError::OperationError(_))
        ));
    }

    #[tokio::test]
    async fn test_unsigned_block_rejected() {
        let me = keypair(1);
        let ledger = MemoryLedger::new(me.public_key(), vec![]);
        let block = Block::new(vec![create(&keypair(5), 1)], me.public_key(), vec![]).unwrap();

        let err = validate_block(&block, &ledger).await.unwrap_err();
        assert!(matches!(
            err,
            CustodyError::Rejected(ValidationError::InvalidSignature(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_member_fails_block() {
        let me = keypair(1);
        let ledger = MemoryLedger::new(me.public_key(), vec![]);
        let good = create(&keypair(5), 1);
        let bad = create(&keypair(6), 2);
        let block = signed_block(&me, vec![good, bad], vec![me.public_key()]);

        let err = validate_block(&block, &ledger).await.unwrap_err();
        assert!(matches!(
            err,
            CustodyError::Rejected(ValidationError::AmountError(_))
        ));
    }

    #[tokio::test]
    async fn test_previous_vote_short_circuits() {
        let me = keypair(1);
        let ledger = MemoryLedger::new(me.public_key(), vec![]);
        let block = signed_block(&me, vec![create(&keypair(5), 2)], vec![me.public_key()]);

        let vote = Vote::new(block.id(), block.id(), false, Some("bad amount".into())).sign(&me);
        ledger.record_vote(vote).unwrap();

        // Already voted: the invalid member is never looked at.
        assert!(validate_block(&block, &ledger).await.is_ok());

        let strict = ValidatorConfig {
            short_circuit_previous_votes: false,
            ..ValidatorConfig::default()
        };
        assert!(validate_block_with(&block, &ledger, &BaseConsensusRules, &strict)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_member_id_check() {
        let me = keypair(1);
        let ledger = MemoryLedger::new(me.public_key(), vec![]);
        let mut tx = create(&keypair(5), 1);
        tx.metadata = Some(serde_json::json!({"note": "edited after signing"}));
        let block = signed_block(&me, vec![tx], vec![me.public_key()]);

        let err = validate_block(&block, &ledger).await.unwrap_err();
        assert!(matches!(
            err,
            CustodyError::Rejected(ValidationError::InvalidHash { .. })
        ));
    }

    #[tokio::test]
    async fn test_ledger_fault_propagates() {
        let me = keypair(1);
        let ledger = MemoryLedger::new(me.public_key(), vec![]);
        let block = signed_block(&me, vec![create(&keypair(5), 1)], vec![me.public_key()]);
        ledger.set_available(false);

        let err = validate_block(&block, &ledger).await.unwrap_err();
        assert!(matches!(err, CustodyError::Ledger(LedgerError::Unavailable(_))));

        ledger.set_available(true);
        ledger.insert_transaction(create(&keypair(7), 1), TxStatus::Valid).unwrap();
        assert!(validate_block(&block, &ledger).await.is_ok());
    }
}
