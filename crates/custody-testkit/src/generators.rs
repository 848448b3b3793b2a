//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::json;

use custody_core::{Asset, BlockId, Keypair, PublicKey, Transaction, TxId};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a random TxId.
pub fn tx_id() -> impl Strategy<Value = TxId> {
    any::<[u8; 32]>().prop_map(TxId::from_bytes)
}

/// Generate a random BlockId.
pub fn block_id() -> impl Strategy<Value = BlockId> {
    any::<[u8; 32]>().prop_map(BlockId::from_bytes)
}

/// Generate a valid output amount.
pub fn amount() -> impl Strategy<Value = u64> {
    1u64..=1_000_000u64
}

/// Generate a split of some total into 1..=max_outputs positive amounts.
pub fn amounts(max_outputs: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(amount(), 1..=max_outputs)
}

/// Generate optional application data for an asset or metadata.
pub fn json_payload() -> impl Strategy<Value = Option<serde_json::Value>> {
    prop_oneof![
        Just(None),
        "[a-z]{1,12}".prop_map(|s| Some(json!({ "serial": s }))),
        (any::<u32>(), any::<bool>()).prop_map(|(n, b)| Some(json!({ "n": n, "flag": b }))),
    ]
}

/// Parameters for generating a CREATE.
#[derive(Debug, Clone)]
pub struct CreateParams {
    pub owner: Keypair,
    pub amounts: Vec<u64>,
    pub divisible: bool,
    pub data: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}

impl Arbitrary for CreateParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(), // seed
            amounts(4),
            any::<bool>(),
            json_payload(),
            json_payload(),
        )
            .prop_map(|(seed, amounts, divisible, data, metadata)| CreateParams {
                owner: Keypair::from_seed(&seed),
                amounts,
                divisible,
                data,
                metadata,
            })
            .boxed()
    }
}

/// Generate a signed CREATE from parameters.
pub fn create_from_params(params: &CreateParams) -> Transaction {
    let asset = if params.divisible {
        Asset::divisible(params.data.clone())
    } else {
        Asset::new(params.data.clone())
    };
    let recipients = params
        .amounts
        .iter()
        .map(|&amount| (vec![params.owner.public_key()], amount))
        .collect();

    Transaction::create(
        &[params.owner.public_key()],
        recipients,
        asset,
        params.metadata.clone(),
    )
    .and_then(|tx| tx.sign(&[&params.owner]))
    .expect("generated CREATE is well formed")
}
