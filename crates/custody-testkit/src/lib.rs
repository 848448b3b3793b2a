//! # Custody Testkit
//!
//! Testing utilities for the custody validators.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Verdict vectors**: Named transactions with the verdict every validator must reach
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A federation around an in-memory ledger, plus record builders
//!
//! ## Verdict Vectors
//!
//! ```rust,no_run
//! use custody_testkit::vectors::verify_all_vectors;
//!
//! async fn check() {
//!     for (name, passed, details) in verify_all_vectors().await {
//!         println!("{}: {} ({})", name, passed, details);
//!     }
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use custody_testkit::generators::{create_from_params, CreateParams};
//!
//! proptest! {
//!     #[test]
//!     fn tx_id_is_deterministic(params: CreateParams) {
//!         let t1 = create_from_params(&params);
//!         let t2 = create_from_params(&params);
//!         prop_assert_eq!(t1.id, t2.id);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use custody_testkit::fixtures::{signed_create, users, FederationFixture};
//!
//! let fed = FederationFixture::new(2);
//! let u = users(1);
//! let tx = signed_create(&u[0], &[1], false);
//! fed.commit(&tx).unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{signed_block, signed_create, signed_transfer, users, FederationFixture};
pub use generators::{create_from_params, CreateParams};
pub use vectors::{all_vectors, run_vector, verify_all_vectors, Expected, VerdictVector};
