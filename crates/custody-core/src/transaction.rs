//! Transaction: the unit of custody change.
//!
//! A transaction either creates an asset (CREATE / GENESIS) or moves amounts
//! of an existing asset between owners (TRANSFER). Each output (condition)
//! names the keys that must sign to spend it; each input (fulfillment)
//! references an earlier output and carries the owners' signatures.
//!
//! Transactions are immutable once signed. The id is derived from the
//! content and never assigned.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::asset::Asset;
use crate::canonical::transaction_signing_bytes;
use crate::crypto::{Keypair, PublicKey, Signature};
use crate::error::{CoreError, ValidationError};
use crate::types::{AssetId, ConditionHash, TxId};

/// Domain separator for requirement digests.
const CONDITION_DOMAIN: &[u8] = b"custody-condition-v0:";

/// The closed set of transaction operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Creates a new asset.
    Create,
    /// Creates an asset at chain bootstrap. Validated like CREATE.
    Genesis,
    /// Moves existing amounts between owners.
    Transfer,
}

impl Operation {
    /// Every recognised operation.
    pub const ALLOWED: [Operation; 3] = [Operation::Create, Operation::Genesis, Operation::Transfer];

    /// Wire name of the operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Genesis => "GENESIS",
            Operation::Transfer => "TRANSFER",
        }
    }

    /// Parse a wire name, rejecting anything outside the closed set.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::ALLOWED
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedOperation {
                operation: s.to_string(),
                allowed: Self::allowed_list(),
            })
    }

    /// Comma separated list of the allowed wire names.
    pub fn allowed_list() -> String {
        Self::ALLOWED
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// CREATE and GENESIS both bring an asset into existence.
    pub fn is_creation(self) -> bool {
        matches!(self, Operation::Create | Operation::Genesis)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Reference to one output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionLink {
    /// The transaction holding the output.
    pub txid: TxId,
    /// Index of the output within that transaction's conditions.
    pub cid: u32,
}

impl TransactionLink {
    pub fn new(txid: TxId, cid: u32) -> Self {
        Self { txid, cid }
    }
}

impl fmt::Display for TransactionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.cid)
    }
}

/// A spendable output: an amount and the keys that control it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Units of the asset held by this output.
    pub amount: u64,
    /// The owners who must all sign to spend the output.
    pub public_keys: Vec<PublicKey>,
    /// Requirement digest committing to `public_keys`.
    pub condition: ConditionHash,
}

impl Condition {
    /// An output owned jointly by `public_keys`.
    pub fn new(public_keys: Vec<PublicKey>, amount: u64) -> Self {
        let condition = Self::requirement_for(&public_keys);
        Self {
            amount,
            public_keys,
            condition,
        }
    }

    /// Derive the requirement digest for an ordered list of owners.
    ///
    /// All listed owners must sign (an n-of-n threshold).
    pub fn requirement_for(owners: &[PublicKey]) -> ConditionHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(CONDITION_DOMAIN);
        hasher.update(&(owners.len() as u32).to_be_bytes());
        for owner in owners {
            hasher.update(owner.as_bytes());
        }
        ConditionHash::from_bytes(*hasher.finalize().as_bytes())
    }
}

/// Proof bytes attached to a fulfillment: one Ed25519 signature per owner.
///
/// Empty until the transaction is signed. Travels as a hex string, or
/// `null` when unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FulfillmentProof(pub Bytes);

impl FulfillmentProof {
    /// Length of each signature in the proof.
    pub const SIGNATURE_LEN: usize = 64;

    /// An unsigned proof.
    pub fn empty() -> Self {
        Self(Bytes::new())
    }

    /// Concatenate signatures into proof bytes.
    pub fn from_signatures(signatures: &[Signature]) -> Self {
        let mut buf = Vec::with_capacity(signatures.len() * Self::SIGNATURE_LEN);
        for sig in signatures {
            buf.extend_from_slice(sig.as_bytes());
        }
        Self(buf.into())
    }

    /// Whether the proof carries no signatures.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw proof bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Split the proof into signatures.
    ///
    /// Returns `None` for bytes that are not a whole number of signatures.
    pub fn signatures(&self) -> Option<Vec<Signature>> {
        if self.0.is_empty() || self.0.len() % Self::SIGNATURE_LEN != 0 {
            return None;
        }
        self.0
            .chunks_exact(Self::SIGNATURE_LEN)
            .map(|chunk| chunk.try_into().ok().map(Signature::from_bytes))
            .collect()
    }
}

impl Serialize for FulfillmentProof {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.serialize_str(&hex::encode(&self.0))
        }
    }
}

impl<'de> Deserialize<'de> for FulfillmentProof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::empty()),
            Some(s) => hex::decode(s)
                .map(|b| Self(b.into()))
                .map_err(serde::de::Error::custom),
        }
    }
}

/// An input: a claim on an earlier output, with the owners' proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fulfillment {
    /// Signature proof. Empty until signed.
    #[serde(default)]
    pub fulfillment: FulfillmentProof,
    /// The consumed output. Absent on creations.
    #[serde(default)]
    pub tx_input: Option<TransactionLink>,
    /// Keys that currently own the consumed output, in condition order.
    pub owners_before: Vec<PublicKey>,
}

impl Fulfillment {
    /// An unsigned fulfillment.
    pub fn new(owners_before: Vec<PublicKey>, tx_input: Option<TransactionLink>) -> Self {
        Self {
            fulfillment: FulfillmentProof::empty(),
            tx_input,
            owners_before,
        }
    }

    /// Check this fulfillment against a requirement digest.
    ///
    /// The owners must hash to `requirement` and each must have signed
    /// `message`. Never panics on malformed proof bytes.
    pub fn satisfies(&self, message: &[u8], requirement: &ConditionHash) -> bool {
        if self.owners_before.is_empty() {
            return false;
        }
        if Condition::requirement_for(&self.owners_before) != *requirement {
            return false;
        }
        let Some(signatures) = self.fulfillment.signatures() else {
            return false;
        };
        if signatures.len() != self.owners_before.len() {
            return false;
        }
        self.owners_before
            .iter()
            .zip(signatures.iter())
            .all(|(owner, sig)| owner.is_valid_signature(message, sig))
    }
}

/// A complete transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Content id (see [`TxId`]).
    pub id: TxId,
    pub operation: Operation,
    pub asset: Asset,
    pub conditions: Vec<Condition>,
    pub fulfillments: Vec<Fulfillment>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl Transaction {
    /// Assemble a transaction and derive its id.
    pub fn new(
        operation: Operation,
        asset: Asset,
        fulfillments: Vec<Fulfillment>,
        conditions: Vec<Condition>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        let mut tx = Self {
            id: TxId::from_bytes([0u8; 32]),
            operation,
            asset,
            conditions,
            fulfillments,
            metadata,
        };
        tx.id = tx.compute_id();
        tx
    }

    /// Build an unsigned CREATE.
    ///
    /// `owners_before` jointly sign the single fulfillment; each recipient
    /// entry becomes one output.
    pub fn create(
        owners_before: &[PublicKey],
        recipients: Vec<(Vec<PublicKey>, u64)>,
        asset: Asset,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, CoreError> {
        if owners_before.is_empty() {
            return Err(CoreError::Malformed("`owners_before` cannot be empty".into()));
        }
        let conditions = recipients_to_conditions(recipients)?;
        let fulfillment = Fulfillment::new(owners_before.to_vec(), None);

        Ok(Self::new(
            Operation::Create,
            asset,
            vec![fulfillment],
            conditions,
            metadata,
        ))
    }

    /// Build an unsigned TRANSFER of `inputs` to `recipients`.
    pub fn transfer(
        inputs: Vec<Fulfillment>,
        recipients: Vec<(Vec<PublicKey>, u64)>,
        asset_id: AssetId,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, CoreError> {
        if inputs.is_empty() {
            return Err(CoreError::Malformed("`inputs` cannot be empty".into()));
        }
        if inputs.iter().any(|f| f.tx_input.is_none()) {
            return Err(CoreError::Malformed("every transfer input needs a `tx_input`".into()));
        }
        let conditions = recipients_to_conditions(recipients)?;

        Ok(Self::new(
            Operation::Transfer,
            Asset::link(asset_id),
            inputs,
            conditions,
            metadata,
        ))
    }

    /// Unsigned fulfillments spending this transaction's outputs.
    ///
    /// `None` selects every output.
    pub fn to_inputs(&self, indices: Option<&[u32]>) -> Vec<Fulfillment> {
        let all: Vec<u32> = (0..self.conditions.len() as u32).collect();
        let indices = indices.unwrap_or(&all[..]);

        indices
            .iter()
            .filter_map(|&cid| {
                self.conditions.get(cid as usize).map(|condition| {
                    Fulfillment::new(
                        condition.public_keys.clone(),
                        Some(TransactionLink::new(self.id, cid)),
                    )
                })
            })
            .collect()
    }

    /// The bytes the id covers and every owner signs.
    pub fn signing_bytes(&self) -> Vec<u8> {
        transaction_signing_bytes(self)
    }

    /// Recompute the content id from the current fields.
    pub fn compute_id(&self) -> TxId {
        TxId::of(&self.signing_bytes())
    }

    /// Whether this transaction creates an asset.
    pub fn is_creation(&self) -> bool {
        self.operation.is_creation()
    }

    /// Sign every fulfillment with the matching keypairs.
    ///
    /// Each owner in every fulfillment must have a keypair in `keypairs`.
    pub fn sign(mut self, keypairs: &[&Keypair]) -> Result<Self, CoreError> {
        let by_key: HashMap<PublicKey, &Keypair> =
            keypairs.iter().map(|kp| (kp.public_key(), *kp)).collect();
        let message = self.signing_bytes();

        for fulfillment in &mut self.fulfillments {
            let signatures = fulfillment
                .owners_before
                .iter()
                .map(|owner| {
                    by_key
                        .get(owner)
                        .map(|kp| kp.sign(&message))
                        .ok_or(CoreError::KeypairMismatch(*owner))
                })
                .collect::<Result<Vec<_>, _>>()?;
            fulfillment.fulfillment = FulfillmentProof::from_signatures(&signatures);
        }

        Ok(self)
    }

    /// Check every fulfillment's proof.
    ///
    /// Creations are checked against the requirement their own owners
    /// define. Transfers pair fulfillment `i` with `input_conditions[i]`;
    /// a length mismatch is never valid.
    pub fn fulfillments_valid(&self, input_conditions: &[Condition]) -> bool {
        let message = self.signing_bytes();

        if self.is_creation() {
            return self.fulfillments.iter().all(|f| {
                let requirement = Condition::requirement_for(&f.owners_before);
                f.satisfies(&message, &requirement)
            });
        }

        if input_conditions.len() != self.fulfillments.len() {
            return false;
        }
        self.fulfillments
            .iter()
            .zip(input_conditions)
            .all(|(f, condition)| f.satisfies(&message, &condition.condition))
    }

    /// Sum of all output amounts, or `None` on overflow.
    pub fn output_amount(&self) -> Option<u64> {
        self.conditions
            .iter()
            .try_fold(0u64, |acc, c| acc.checked_add(c.amount))
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Parse the JSON wire form.
    ///
    /// Checks the operation is recognised, the record is structurally
    /// sound, and the claimed id matches the content.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ValidationError::Schema(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse an already-decoded JSON wire value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        match value.get("operation").and_then(|op| op.as_str()) {
            Some(op) => {
                Operation::parse(op)?;
            }
            None => return Err(ValidationError::Schema("missing `operation`".into())),
        }

        let tx: Transaction =
            serde_json::from_value(value).map_err(|e| ValidationError::Schema(e.to_string()))?;
        tx.check_structure()?;
        tx.check_id()?;
        Ok(tx)
    }

    /// Recompute the id and compare it with the claimed one.
    pub fn check_id(&self) -> Result<(), ValidationError> {
        let computed = self.compute_id();
        if computed != self.id {
            return Err(ValidationError::InvalidHash {
                claimed: self.id.to_hex(),
                computed: computed.to_hex(),
            });
        }
        Ok(())
    }

    /// Structural checks that precede semantic validation.
    fn check_structure(&self) -> Result<(), ValidationError> {
        if self.conditions.iter().any(|c| c.public_keys.is_empty()) {
            return Err(ValidationError::Schema("condition without `public_keys`".into()));
        }
        if self.conditions.iter().any(|c| c.amount < 1) {
            return Err(ValidationError::Schema("condition `amount` must be at least 1".into()));
        }
        if self.fulfillments.iter().any(|f| f.owners_before.is_empty()) {
            return Err(ValidationError::Schema("fulfillment without `owners_before`".into()));
        }
        Ok(())
    }
}

fn recipients_to_conditions(
    recipients: Vec<(Vec<PublicKey>, u64)>,
) -> Result<Vec<Condition>, CoreError> {
    if recipients.is_empty() {
        return Err(CoreError::Malformed("`recipients` cannot be empty".into()));
    }
    recipients
        .into_iter()
        .map(|(owners, amount)| {
            if owners.is_empty() {
                return Err(CoreError::Malformed("each recipient needs an owner".into()));
            }
            if amount < 1 {
                return Err(CoreError::Malformed("`amount` needs to be greater than zero".into()));
            }
            Ok(Condition::new(owners, amount))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alice() -> Keypair {
        Keypair::from_seed(&[0x0a; 32])
    }

    fn bob() -> Keypair {
        Keypair::from_seed(&[0x0b; 32])
    }

    fn signed_create(owner: &Keypair) -> Transaction {
        Transaction::create(
            &[owner.public_key()],
            vec![(vec![owner.public_key()], 1)],
            Asset::new(Some(json!({"serial": "A-1"}))),
            None,
        )
        .unwrap()
        .sign(&[owner])
        .unwrap()
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!(Operation::parse("CREATE").unwrap(), Operation::Create);
        assert_eq!(Operation::parse("GENESIS").unwrap(), Operation::Genesis);
        assert_eq!(Operation::parse("TRANSFER").unwrap(), Operation::Transfer);

        match Operation::parse("BURN") {
            Err(ValidationError::UnsupportedOperation { operation, allowed }) => {
                assert_eq!(operation, "BURN");
                assert_eq!(allowed, "CREATE, GENESIS, TRANSFER");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_signing_does_not_change_id() {
        let owner = alice();
        let unsigned = Transaction::create(
            &[owner.public_key()],
            vec![(vec![owner.public_key()], 1)],
            Asset::default(),
            None,
        )
        .unwrap();
        let id = unsigned.id;
        let signed = unsigned.sign(&[&owner]).unwrap();
        assert_eq!(signed.id, id);
        assert_eq!(signed.compute_id(), id);
    }

    #[test]
    fn test_create_fulfillment_valid() {
        let owner = alice();
        let tx = signed_create(&owner);
        assert!(tx.fulfillments_valid(&[]));
    }

    #[test]
    fn test_unsigned_create_is_invalid() {
        let owner = alice();
        let tx = Transaction::create(
            &[owner.public_key()],
            vec![(vec![owner.public_key()], 1)],
            Asset::default(),
            None,
        )
        .unwrap();
        assert!(!tx.fulfillments_valid(&[]));
    }

    #[test]
    fn test_sign_without_key_fails() {
        let owner = alice();
        let tx = Transaction::create(
            &[owner.public_key()],
            vec![(vec![owner.public_key()], 1)],
            Asset::default(),
            None,
        )
        .unwrap();
        let result = tx.sign(&[&bob()]);
        assert!(matches!(result, Err(CoreError::KeypairMismatch(pk)) if pk == owner.public_key()));
    }

    #[test]
    fn test_joint_ownership_needs_every_signature() {
        let (a, b) = (alice(), bob());
        let create = Transaction::create(
            &[a.public_key()],
            vec![(vec![a.public_key(), b.public_key()], 1)],
            Asset::default(),
            None,
        )
        .unwrap()
        .sign(&[&a])
        .unwrap();

        let transfer = Transaction::transfer(
            create.to_inputs(None),
            vec![(vec![b.public_key()], 1)],
            create.id,
            None,
        )
        .unwrap();

        assert!(transfer.clone().sign(&[&a]).is_err());
        let signed = transfer.sign(&[&a, &b]).unwrap();
        assert!(signed.fulfillments_valid(&create.conditions));
    }

    #[test]
    fn test_transfer_wrong_owner_fails_requirement() {
        let (a, b) = (alice(), bob());
        let create = signed_create(&a);

        // Bob claims Alice's output with his own key.
        let mut inputs = create.to_inputs(None);
        inputs[0].owners_before = vec![b.public_key()];
        let transfer =
            Transaction::transfer(inputs, vec![(vec![b.public_key()], 1)], create.id, None)
                .unwrap()
                .sign(&[&b])
                .unwrap();

        assert!(!transfer.fulfillments_valid(&create.conditions));
    }

    #[test]
    fn test_transfer_condition_count_mismatch() {
        let a = alice();
        let create = signed_create(&a);
        let transfer = Transaction::transfer(
            create.to_inputs(None),
            vec![(vec![a.public_key()], 1)],
            create.id,
            None,
        )
        .unwrap()
        .sign(&[&a])
        .unwrap();

        assert!(!transfer.fulfillments_valid(&[]));
        let doubled = vec![create.conditions[0].clone(), create.conditions[0].clone()];
        assert!(!transfer.fulfillments_valid(&doubled));
    }

    #[test]
    fn test_truncated_proof_is_invalid_not_panic() {
        let a = alice();
        let mut tx = signed_create(&a);
        let bytes = tx.fulfillments[0].fulfillment.0.slice(0..63);
        tx.fulfillments[0].fulfillment = FulfillmentProof(bytes);
        assert!(!tx.fulfillments_valid(&[]));
    }

    #[test]
    fn test_to_inputs_selects_indices() {
        let a = alice();
        let tx = Transaction::create(
            &[a.public_key()],
            vec![(vec![a.public_key()], 2), (vec![bob().public_key()], 3)],
            Asset::divisible(None),
            None,
        )
        .unwrap();

        let all = tx.to_inputs(None);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].tx_input, Some(TransactionLink::new(tx.id, 1)));
        assert_eq!(all[1].owners_before, vec![bob().public_key()]);

        let picked = tx.to_inputs(Some(&[1, 9][..]));
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_create_rejects_empty_parties() {
        let a = alice();
        assert!(Transaction::create(&[], vec![(vec![a.public_key()], 1)], Asset::default(), None).is_err());
        assert!(Transaction::create(&[a.public_key()], vec![], Asset::default(), None).is_err());
        assert!(Transaction::create(&[a.public_key()], vec![(vec![], 1)], Asset::default(), None).is_err());
    }

    #[test]
    fn test_zero_amount_recipient_rejected() {
        let a = alice();
        let result = Transaction::create(
            &[a.public_key()],
            vec![(vec![a.public_key()], 1), (vec![a.public_key()], 0)],
            Asset::default(),
            None,
        );
        assert!(matches!(result, Err(CoreError::Malformed(_))));
    }

    #[test]
    fn test_from_json_rejects_zero_amount() {
        let tx = signed_create(&alice());
        let mut value = serde_json::to_value(&tx).unwrap();
        value["conditions"][0]["amount"] = json!(0);
        assert!(matches!(
            Transaction::from_value(value),
            Err(ValidationError::Schema(_))
        ));
    }

    #[test]
    fn test_transfer_rejects_inputs_without_links() {
        let a = alice();
        let input = Fulfillment::new(vec![a.public_key()], None);
        let result = Transaction::transfer(
            vec![input],
            vec![(vec![a.public_key()], 1)],
            TxId::from_bytes([1; 32]),
            None,
        );
        assert!(matches!(result, Err(CoreError::Malformed(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_id() {
        let tx = signed_create(&alice());
        let json = tx.to_json().unwrap();
        let decoded = Transaction::from_json(&json).unwrap();
        assert_eq!(decoded, tx);
        assert!(decoded.fulfillments_valid(&[]));
    }

    #[test]
    fn test_from_json_detects_wrong_id() {
        let tx = signed_create(&alice());
        let mut value = serde_json::to_value(&tx).unwrap();
        value["id"] = json!("aa".repeat(32));
        assert!(matches!(
            Transaction::from_value(value),
            Err(ValidationError::InvalidHash { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_unknown_operation() {
        let tx = signed_create(&alice());
        let mut value = serde_json::to_value(&tx).unwrap();
        value["operation"] = json!("MINT");
        assert!(matches!(
            Transaction::from_value(value),
            Err(ValidationError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_wire_field_names() {
        let tx = signed_create(&alice());
        let value = serde_json::to_value(&tx).unwrap();
        for key in ["id", "operation", "asset", "conditions", "fulfillments", "metadata"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        let condition = &value["conditions"][0];
        for key in ["amount", "public_keys", "condition"] {
            assert!(condition.get(key).is_some(), "missing condition.{}", key);
        }
        let fulfillment = &value["fulfillments"][0];
        assert!(fulfillment["tx_input"].is_null());
        assert!(fulfillment["fulfillment"].is_string());
        assert!(fulfillment["owners_before"].is_array());
    }
}
