//! # Custody Ledger
//!
//! The query interface the custody validators consult, plus an in-memory
//! implementation for tests and embedders.
//!
//! ## Overview
//!
//! Validators never keep their own state. Everything they need to know
//! about earlier transactions, spent outputs, assets and votes comes from a
//! [`Ledger`]. Persistent backends live outside this workspace and only need
//! to implement the trait.
//!
//! ## Key Types
//!
//! - [`Ledger`] - The async trait validators query
//! - [`MemoryLedger`] - `RwLock`-backed ledger for tests
//! - [`TxStatus`] - Where a stored transaction stands
//! - [`LedgerError`] - Store faults, distinct from validation rejections
//!
//! ## Usage
//!
//! ```rust,no_run
//! use custody_core::Keypair;
//! use custody_ledger::{Ledger, MemoryLedger, TxStatus};
//!
//! async fn example() {
//!     let node = Keypair::generate();
//!     let ledger = MemoryLedger::new(node.public_key(), vec![]);
//!
//!     // ledger.insert_transaction(tx, TxStatus::Valid).unwrap();
//!     assert!(ledger.is_federation_member(&node.public_key()));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Atomic spend registration**: a transaction becomes the spender of its
//!   inputs at the moment it is stored as `Valid`, under one write lock.
//! - **Read-only validation**: nothing in the trait mutates state.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use traits::{Ledger, TxStatus};
