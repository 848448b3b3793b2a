//! Votes cast by federation nodes on blocks.
//!
//! Vote aggregation and fork choice live outside this crate. Here a vote is
//! only a signed statement that can be checked against a voter set.

use serde::{Deserialize, Serialize};

use crate::block::now_millis;
use crate::canonical::vote_bytes;
use crate::crypto::{Keypair, PublicKey, Signature};
use crate::types::BlockId;

/// A node's verdict on one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voting_for_block: BlockId,
    /// The block this node considers the parent.
    pub previous_block: BlockId,
    pub is_block_valid: bool,
    /// Why the block was rejected. Only present on negative votes.
    #[serde(default)]
    pub invalid_reason: Option<String>,
    /// Unix milliseconds.
    pub timestamp: u64,
}

impl Vote {
    /// A vote stamped with the current time.
    pub fn new(
        voting_for_block: BlockId,
        previous_block: BlockId,
        is_block_valid: bool,
        invalid_reason: Option<String>,
    ) -> Self {
        Self {
            voting_for_block,
            previous_block,
            is_block_valid,
            invalid_reason,
            timestamp: now_millis(),
        }
    }

    /// Canonical bytes the voter signs.
    pub fn signing_bytes(&self) -> Vec<u8> {
        vote_bytes(self)
    }

    /// Sign the vote.
    pub fn sign(self, keypair: &Keypair) -> SignedVote {
        let signature = keypair.sign(&self.signing_bytes());
        SignedVote {
            node_pubkey: keypair.public_key(),
            signature,
            vote: self,
        }
    }

    /// Structural soundness: a positive vote carries no reason and a
    /// present reason is never blank.
    pub fn check_structure(&self) -> Result<(), String> {
        match (&self.invalid_reason, self.is_block_valid) {
            (Some(_), true) => Err("a valid vote cannot carry an `invalid_reason`".into()),
            (Some(reason), false) if reason.trim().is_empty() => {
                Err("`invalid_reason` cannot be empty".into())
            }
            _ => Ok(()),
        }
    }
}

/// A vote with its signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVote {
    pub node_pubkey: PublicKey,
    pub signature: Signature,
    pub vote: Vote,
}

impl SignedVote {
    /// Whether the signature verifies against `node_pubkey`.
    pub fn is_signature_valid(&self) -> bool {
        self.node_pubkey
            .is_valid_signature(&self.vote.signing_bytes(), &self.signature)
    }
}

/// Check a signed vote against the expected voter set.
///
/// The signer must be listed in `voters`, the signature must verify and
/// the vote must be structurally sound. Failures are logged and yield
/// `false`.
pub fn verify_vote(voters: &[PublicKey], signed_vote: &SignedVote) -> bool {
    if !voters.contains(&signed_vote.node_pubkey) || !signed_vote.is_signature_valid() {
        tracing::warn!(
            voter = %signed_vote.node_pubkey,
            block = %signed_vote.vote.voting_for_block,
            voters = voters.len(),
            "vote failed signature verification"
        );
        return false;
    }
    if let Err(reason) = signed_vote.vote.check_structure() {
        tracing::warn!(
            voter = %signed_vote.node_pubkey,
            block = %signed_vote.vote.voting_for_block,
            %reason,
            "vote failed structure check"
        );
        return false;
    }
    true
}
