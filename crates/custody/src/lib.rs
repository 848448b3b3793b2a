//! # Custody
//!
//! Admission control for a federated custody ledger: decides whether a
//! proposed transaction or block may enter the chain.
//!
//! ## Overview
//!
//! - **Transactions**: CREATE/GENESIS bring an asset into existence,
//!   TRANSFER moves amounts of it between owners
//! - **Blocks**: Signed containers of transactions, produced by federation
//!   nodes
//! - **Votes**: Signed verdicts nodes cast on blocks
//!
//! Validation reads from a [`Ledger`](custody_ledger::Ledger) and never
//! writes to it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use custody::{Validator, ValidatorConfig};
//! use custody::core::{Asset, Keypair, Transaction};
//! use custody::ledger::MemoryLedger;
//!
//! async fn example() {
//!     let node = Keypair::generate();
//!     let ledger = MemoryLedger::new(node.public_key(), vec![]);
//!     let validator = Validator::new(ledger, ValidatorConfig::default());
//!
//!     let alice = Keypair::generate();
//!     let tx = Transaction::create(
//!         &[alice.public_key()],
//!         vec![(vec![alice.public_key()], 1)],
//!         Asset::default(),
//!         None,
//!     )
//!     .unwrap()
//!     .sign(&[&alice])
//!     .unwrap();
//!
//!     validator.validate_transaction(&tx).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `custody::core` - Records and primitives (Transaction, Block, Vote, ...)
//! - `custody::ledger` - Ledger trait and the in-memory ledger

pub mod block;
pub mod consensus;
pub mod error;
pub mod transaction;
pub mod validator;

// Re-export component crates
pub use custody_core as core;
pub use custody_ledger as ledger;

// Re-export main types for convenience
pub use block::{validate_block, validate_block_with};
pub use consensus::{BaseConsensusRules, ConsensusRules};
pub use error::{CustodyError, Result};
pub use transaction::validate_transaction;
pub use validator::{Validator, ValidatorConfig};

// Re-export commonly used core types
pub use custody_core::{
    verify_vote, Asset, AssetId, Block, BlockId, Keypair, Operation, PublicKey, SignedVote,
    Transaction, TxId, ValidationError, Vote,
};
