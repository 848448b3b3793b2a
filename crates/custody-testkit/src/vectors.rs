//! Verdict vectors: named transactions with the verdict every validator
//! must reach.
//!
//! Each vector sets up a fresh federation, builds one transaction and
//! states whether it is admitted or which rejection it earns. They pin the
//! rejection taxonomy so that alternative ledgers or rule sets can be
//! checked against the same cases.

use std::fmt;

use custody::CustodyError;
use custody_core::{
    Asset, Condition, Fulfillment, Operation, Transaction, TransactionLink, TxId,
};
use custody_ledger::TxStatus;

use crate::fixtures::{signed_create, signed_transfer, users, FederationFixture};

/// The verdict a vector expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Valid,
    /// Rejected with this [`custody_core::ValidationError::kind`].
    Rejected(&'static str),
}

/// A verdict vector.
#[derive(Clone)]
pub struct VerdictVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Expected verdict.
    pub expected: Expected,
    /// Prepares the ledger and returns the transaction under test.
    pub setup: fn(&FederationFixture) -> Transaction,
}

impl fmt::Debug for VerdictVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerdictVector")
            .field("name", &self.name)
            .field("expected", &self.expected)
            .finish()
    }
}

/// Get all verdict vectors.
pub fn all_vectors() -> Vec<VerdictVector> {
    vec![
        VerdictVector {
            name: "CREATE one unit of an indivisible asset",
            expected: Expected::Valid,
            setup: |_| signed_create(&users(1)[0], &[1], false),
        },
        VerdictVector {
            name: "CREATE two units of an indivisible asset",
            expected: Expected::Rejected("AmountError"),
            setup: |_| signed_create(&users(1)[0], &[2], false),
        },
        VerdictVector {
            name: "CREATE divisible asset split over outputs",
            expected: Expected::Valid,
            setup: |_| signed_create(&users(1)[0], &[3, 7, 1], true),
        },
        VerdictVector {
            name: "CREATE referencing an input",
            expected: Expected::Rejected("MalformedTransaction"),
            setup: |_| {
                let u = users(1);
                let alice = &u[0];
                let mut tx = signed_create(alice, &[1], false);
                tx.fulfillments[0].tx_input =
                    Some(TransactionLink::new(TxId::from_bytes([0x01; 32]), 0));
                tx.id = tx.compute_id();
                tx.sign(&[alice]).expect("owner signs")
            },
        },
        VerdictVector {
            name: "CREATE without fulfillment proofs",
            expected: Expected::Rejected("InvalidSignature"),
            setup: |_| {
                let u = users(1);
                let alice = &u[0];
                let mut tx = signed_create(alice, &[1], false);
                tx.fulfillments[0].fulfillment = Default::default();
                tx
            },
        },
        VerdictVector {
            name: "TRANSFER whole output",
            expected: Expected::Valid,
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[1], false));
                signed_transfer(&[&u[0]], &origin, None, vec![(vec![u[1].public_key()], 1)])
            },
        },
        VerdictVector {
            name: "TRANSFER minting extra units",
            expected: Expected::Rejected("AmountError"),
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[5], true));
                signed_transfer(&[&u[0]], &origin, None, vec![(vec![u[1].public_key()], 6)])
            },
        },
        VerdictVector {
            name: "TRANSFER burning units",
            expected: Expected::Rejected("AmountError"),
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[5], true));
                signed_transfer(&[&u[0]], &origin, None, vec![(vec![u[1].public_key()], 4)])
            },
        },
        VerdictVector {
            name: "TRANSFER of an unknown input",
            expected: Expected::Rejected("TransactionDoesNotExist"),
            setup: |_| {
                let u = users(2);
                let origin = signed_create(&u[0], &[1], false);
                signed_transfer(&[&u[0]], &origin, None, vec![(vec![u[1].public_key()], 1)])
            },
        },
        VerdictVector {
            name: "TRANSFER of an undecided input",
            expected: Expected::Rejected("TransactionNotInValidBlock"),
            setup: |fed| {
                let u = users(2);
                let origin = signed_create(&u[0], &[1], false);
                fed.store(&origin, TxStatus::Undecided).expect("ledger accepts");
                signed_transfer(&[&u[0]], &origin, None, vec![(vec![u[1].public_key()], 1)])
            },
        },
        VerdictVector {
            name: "TRANSFER of an already spent output",
            expected: Expected::Rejected("DoubleSpend"),
            setup: |fed| {
                let u = users(3);
                let origin = committed(fed, signed_create(&u[0], &[1], false));
                let first =
                    signed_transfer(&[&u[0]], &origin, None, vec![(vec![u[1].public_key()], 1)]);
                committed(fed, first);
                signed_transfer(&[&u[0]], &origin, None, vec![(vec![u[2].public_key()], 1)])
            },
        },
        VerdictVector {
            name: "TRANSFER re-validated after being recorded",
            expected: Expected::Valid,
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[1], false));
                let spend =
                    signed_transfer(&[&u[0]], &origin, None, vec![(vec![u[1].public_key()], 1)]);
                committed(fed, spend)
            },
        },
        VerdictVector {
            name: "TRANSFER declaring another asset",
            expected: Expected::Rejected("AssetIdMismatch"),
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[1], false));
                Transaction::transfer(
                    origin.to_inputs(None),
                    vec![(vec![u[1].public_key()], 1)],
                    TxId::from_bytes([0x02; 32]),
                    None,
                )
                .and_then(|tx| tx.sign(&[&u[0]]))
                .expect("transfer is well formed")
            },
        },
        VerdictVector {
            name: "TRANSFER signed by a non-owner",
            expected: Expected::Rejected("InvalidSignature"),
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[1], false));
                let mut inputs = origin.to_inputs(None);
                inputs[0].owners_before = vec![u[1].public_key()];
                Transaction::transfer(inputs, vec![(vec![u[1].public_key()], 1)], origin.id, None)
                    .and_then(|tx| tx.sign(&[&u[1]]))
                    .expect("transfer is well formed")
            },
        },
        VerdictVector {
            name: "TRANSFER of a second CREATE output only",
            expected: Expected::Valid,
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[2, 3], true));
                signed_transfer(&[&u[0]], &origin, Some(&[1u32][..]), vec![(vec![u[1].public_key()], 3)])
            },
        },
        VerdictVector {
            name: "CREATE with a zero amount output",
            expected: Expected::Rejected("AmountError"),
            setup: |_| {
                let u = users(1);
                let owner = u[0].public_key();
                Transaction::new(
                    Operation::Create,
                    Asset::divisible(None),
                    vec![Fulfillment::new(vec![owner], None)],
                    vec![Condition::new(vec![owner], 5), Condition::new(vec![owner], 0)],
                    None,
                )
                .sign(&[&u[0]])
                .expect("owner signs")
            },
        },
        VerdictVector {
            name: "TRANSFER with a zero amount output",
            expected: Expected::Rejected("AmountError"),
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[5], true));
                Transaction::new(
                    Operation::Transfer,
                    Asset::link(origin.id),
                    origin.to_inputs(None),
                    vec![
                        Condition::new(vec![u[1].public_key()], 5),
                        Condition::new(vec![u[1].public_key()], 0),
                    ],
                    None,
                )
                .sign(&[&u[0]])
                .expect("owner signs")
            },
        },
        VerdictVector {
            name: "TRANSFER listing one output twice",
            expected: Expected::Rejected("DoubleSpend"),
            setup: |fed| {
                let u = users(2);
                let origin = committed(fed, signed_create(&u[0], &[5], true));
                let mut inputs = origin.to_inputs(None);
                inputs.push(inputs[0].clone());
                Transaction::transfer(inputs, vec![(vec![u[1].public_key()], 10)], origin.id, None)
                    .and_then(|tx| tx.sign(&[&u[0]]))
                    .expect("transfer is well formed")
            },
        },
    ]
}

fn committed(fed: &FederationFixture, tx: Transaction) -> Transaction {
    fed.commit(&tx).expect("ledger accepts");
    tx
}

/// Run one vector against a fresh federation.
///
/// Returns a description of the mismatch on failure.
pub async fn run_vector(vector: &VerdictVector) -> Result<(), String> {
    let fed = FederationFixture::default();
    let tx = (vector.setup)(&fed);
    let outcome = fed.validator().validate_transaction(&tx).await;

    match (vector.expected, outcome) {
        (Expected::Valid, Ok(_)) => Ok(()),
        (Expected::Rejected(kind), Err(CustodyError::Rejected(e))) if e.kind() == kind => Ok(()),
        (expected, Ok(_)) => Err(format!("expected {:?}, got Valid", expected)),
        (expected, Err(e)) => Err(format!("expected {:?}, got {}", expected, e)),
    }
}

/// Run all vectors and return results.
///
/// Returns (name, passed, details) for each vector.
pub async fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();
    for vector in all_vectors() {
        let (passed, details) = match run_vector(&vector).await {
            Ok(()) => (true, format!("{:?}", vector.expected)),
            Err(mismatch) => (false, mismatch),
        };
        results.push((vector.name.to_string(), passed, details));
    }
    results
}
