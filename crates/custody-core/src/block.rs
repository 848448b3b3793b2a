//! Blocks: signed, content-addressed containers of transactions.
//!
//! A federation node collects candidate transactions into a [`BlockBody`],
//! signs it once, and broadcasts the [`BlockEnvelope`]. The id and the
//! signature cover the same canonical body bytes; neither is part of what
//! it covers.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::canonical::block_body_bytes;
use crate::crypto::{Keypair, PublicKey, Signature};
use crate::error::{CoreError, ValidationError};
use crate::transaction::Transaction;
use crate::types::BlockId;

/// Current wall clock time in Unix milliseconds.
///
/// Block timestamps are advisory and never used for ordering.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The signed and hashed part of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockBody {
    /// Creation time, Unix milliseconds.
    pub timestamp: u64,
    /// Member transactions, in block order.
    pub transactions: Vec<Transaction>,
    /// The producing federation node.
    pub node_pubkey: PublicKey,
    /// Nodes expected to vote on this block.
    pub voters: Vec<PublicKey>,
}

impl BlockBody {
    /// Content id of this body.
    pub fn compute_id(&self) -> BlockId {
        BlockId::of(&block_body_bytes(self))
    }
}

/// JSON wire form of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEnvelope {
    pub id: BlockId,
    pub block: BlockBody,
    #[serde(default)]
    pub signature: Option<Signature>,
}

/// A block. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    body: BlockBody,
    id: BlockId,
    signature: Option<Signature>,
}

impl Block {
    /// Build an unsigned block stamped with the current time.
    ///
    /// An empty transaction list is an [`ValidationError::OperationError`]:
    /// such a block can never be produced.
    pub fn new(
        transactions: Vec<Transaction>,
        node_pubkey: PublicKey,
        voters: Vec<PublicKey>,
    ) -> Result<Self, ValidationError> {
        if transactions.is_empty() {
            return Err(ValidationError::OperationError(
                "empty block creation is not allowed".into(),
            ));
        }
        let body = BlockBody {
            timestamp: now_millis(),
            transactions,
            node_pubkey,
            voters,
        };
        Ok(Self::from_body(body, None))
    }

    fn from_body(body: BlockBody, signature: Option<Signature>) -> Self {
        let id = body.compute_id();
        Self {
            body,
            id,
            signature,
        }
    }

    /// Replace the timestamp. Drops any existing signature.
    pub fn with_timestamp(self, timestamp: u64) -> Self {
        let body = BlockBody {
            timestamp,
            ..self.body
        };
        Self::from_body(body, None)
    }

    /// Sign the body as its producer.
    ///
    /// Only the key named in `node_pubkey` may sign.
    pub fn sign(mut self, keypair: &Keypair) -> Result<Self, CoreError> {
        if keypair.public_key() != self.body.node_pubkey {
            return Err(CoreError::KeypairMismatch(self.body.node_pubkey));
        }
        self.signature = Some(keypair.sign(&self.signing_bytes()));
        Ok(self)
    }

    /// Canonical body bytes: what the id hashes and the producer signs.
    pub fn signing_bytes(&self) -> Vec<u8> {
        block_body_bytes(&self.body)
    }

    /// Whether the stored signature verifies against `node_pubkey`.
    ///
    /// Unsigned blocks and malformed signatures yield `false`.
    pub fn is_signature_valid(&self) -> bool {
        match &self.signature {
            Some(signature) => self
                .body
                .node_pubkey
                .is_valid_signature(&self.signing_bytes(), signature),
            None => false,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn body(&self) -> &BlockBody {
        &self.body
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.body.transactions
    }

    pub fn node_pubkey(&self) -> &PublicKey {
        &self.body.node_pubkey
    }

    pub fn voters(&self) -> &[PublicKey] {
        &self.body.voters
    }

    pub fn timestamp(&self) -> u64 {
        self.body.timestamp
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Produce the `{id, block, signature}` envelope.
    pub fn to_wire(&self) -> BlockEnvelope {
        BlockEnvelope {
            id: self.id,
            block: self.body.clone(),
            signature: self.signature,
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(&self.to_wire()).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Rebuild a block from its envelope, checking it is self-consistent.
    ///
    /// Member transaction ids and the block id must match their content;
    /// a present signature must verify. Federation membership is left to
    /// the block validator.
    pub fn from_wire(envelope: BlockEnvelope) -> Result<Self, ValidationError> {
        let BlockEnvelope {
            id,
            block: body,
            signature,
        } = envelope;

        if body.transactions.is_empty() {
            return Err(ValidationError::OperationError(
                "empty block creation is not allowed".into(),
            ));
        }
        for tx in &body.transactions {
            tx.check_id()?;
        }

        let block = Self::from_body(body, signature);
        if block.id != id {
            return Err(ValidationError::InvalidHash {
                claimed: id.to_hex(),
                computed: block.id.to_hex(),
            });
        }
        if block.signature.is_some() && !block.is_signature_valid() {
            return Err(ValidationError::InvalidSignature(
                "invalid block signature".into(),
            ));
        }
        Ok(block)
    }

    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let envelope: BlockEnvelope =
            serde_json::from_str(json).map_err(|e| ValidationError::Schema(e.to_string()))?;
        Self::from_wire(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;

    fn node() -> Keypair {
        Keypair::from_seed(&[0x11; 32])
    }

    fn create_tx(seed: u8) -> Transaction {
        let owner = Keypair::from_seed(&[seed; 32]);
        Transaction::create(
            &[owner.public_key()],
            vec![(vec![owner.public_key()], 1)],
            Asset::default(),
            None,
        )
        .unwrap()
        .sign(&[&owner])
        .unwrap()
    }

    fn signed_block() -> Block {
        let node = node();
        Block::new(vec![create_tx(1), create_tx(2)], node.public_key(), vec![node.public_key()])
            .unwrap()
            .with_timestamp(1_700_000_000_000)
            .sign(&node)
            .unwrap()
    }

    #[test]
    fn test_empty_block_is_construction_error() {
        let result = Block::new(vec![], node().public_key(), vec![]);
        assert!(matches!(result, Err(ValidationError::OperationError(_))));
    }

    #[test]
    fn test_sign_and_verify() {
        let block = signed_block();
        assert!(block.is_signature_valid());
    }

    #[test]
    fn test_unsigned_block_signature_invalid() {
        let block = Block::new(vec![create_tx(1)], node().public_key(), vec![]).unwrap();
        assert!(!block.is_signature_valid());
    }

    #[test]
    fn test_signing_does_not_change_id() {
        let unsigned = Block::new(vec![create_tx(1)], node().public_key(), vec![])
            .unwrap()
            .with_timestamp(42);
        let id = unsigned.id();
        let signed = unsigned.sign(&node()).unwrap();
        assert_eq!(signed.id(), id);
    }

    #[test]
    fn test_only_producer_can_sign() {
        let block = Block::new(vec![create_tx(1)], node().public_key(), vec![]).unwrap();
        let other = Keypair::from_seed(&[0x22; 32]);
        assert!(matches!(block.sign(&other), Err(CoreError::KeypairMismatch(_))));
    }

    #[test]
    fn test_timestamp_changes_id_and_clears_signature() {
        let block = signed_block();
        let moved = block.clone().with_timestamp(block.timestamp() + 1);
        assert_ne!(moved.id(), block.id());
        assert!(moved.signature().is_none());
    }

    #[test]
    fn test_wire_roundtrip() {
        let block = signed_block();
        let json = block.to_json().unwrap();
        let decoded = Block::from_json(&json).unwrap();
        assert_eq!(decoded.id(), block.id());
        assert_eq!(decoded, block);
        assert!(decoded.is_signature_valid());
    }

    #[test]
    fn test_from_wire_rejects_wrong_id() {
        let mut envelope = signed_block().to_wire();
        envelope.id = BlockId::from_bytes([0u8; 32]);
        assert!(matches!(
            Block::from_wire(envelope),
            Err(ValidationError::InvalidHash { .. })
        ));
    }

    #[test]
    fn test_from_wire_rejects_forged_signature() {
        let mut envelope = signed_block().to_wire();
        envelope.signature = Some(Signature::from_bytes([0x5a; 64]));
        assert!(matches!(
            Block::from_wire(envelope),
            Err(ValidationError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_from_wire_rejects_empty_body() {
        let mut envelope = signed_block().to_wire();
        envelope.block.transactions.clear();
        assert!(matches!(
            Block::from_wire(envelope),
            Err(ValidationError::OperationError(_))
        ));
    }

    #[test]
    fn test_from_wire_rejects_tampered_member() {
        let mut envelope = signed_block().to_wire();
        envelope.block.transactions[0].conditions[0].amount = 2;
        assert!(matches!(
            Block::from_wire(envelope),
            Err(ValidationError::InvalidHash { .. })
        ));
    }

    #[test]
    fn test_envelope_field_names() {
        let value = serde_json::to_value(signed_block().to_wire()).unwrap();
        assert!(value["id"].is_string());
        assert!(value["signature"].is_string());
        for key in ["timestamp", "transactions", "node_pubkey", "voters"] {
            assert!(value["block"].get(key).is_some(), "missing block.{}", key);
        }
    }
}
