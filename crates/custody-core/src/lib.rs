//! # Custody Core
//!
//! Pure records for the custody ledger: transactions, assets, blocks and
//! votes, with their canonical encoding and signatures.
//!
//! This crate contains no I/O, no storage, no networking. Anything that
//! needs to consult the ledger lives in the `custody` crate.
//!
//! ## Key Types
//!
//! - [`Transaction`] - CREATE, GENESIS or TRANSFER of an asset
//! - [`Asset`] - Identity and divisibility of what is being moved
//! - [`Block`] - Signed container of transactions
//! - [`SignedVote`] - A federation node's verdict on a block
//!
//! ## Canonicalization
//!
//! Ids and signatures are computed over deterministic CBOR. See the
//! [`canonical`] module.

pub mod asset;
pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod transaction;
pub mod types;
pub mod vote;

pub use asset::{get_asset_id, Asset};
pub use block::{now_millis, Block, BlockBody, BlockEnvelope};
pub use crypto::{Keypair, PublicKey, Signature};
pub use error::{CoreError, ValidationError};
pub use transaction::{
    Condition, Fulfillment, FulfillmentProof, Operation, Transaction, TransactionLink,
};
pub use types::{AssetId, BlockId, ConditionHash, TxId};
pub use vote::{verify_vote, SignedVote, Vote};
