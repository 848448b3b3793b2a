//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//!
//! Records are encoded as maps keyed by their wire field names, so the
//! canonical form mirrors the JSON wire form field for field. The same
//! logical record produces identical bytes (and thus identical ids) on
//! every platform.

use ciborium::value::Value;

use crate::asset::Asset;
use crate::block::BlockBody;
use crate::transaction::{Condition, Fulfillment, Transaction, TransactionLink};
use crate::vote::Vote;

/// Field names shared by the canonical and wire forms.
mod keys {
    pub const ID: &str = "id";
    pub const OPERATION: &str = "operation";
    pub const ASSET: &str = "asset";
    pub const CONDITIONS: &str = "conditions";
    pub const FULFILLMENTS: &str = "fulfillments";
    pub const METADATA: &str = "metadata";

    pub const DATA_ID: &str = "data_id";
    pub const DIVISIBLE: &str = "divisible";
    pub const DATA: &str = "data";

    pub const AMOUNT: &str = "amount";
    pub const PUBLIC_KEYS: &str = "public_keys";
    pub const CONDITION: &str = "condition";

    pub const FULFILLMENT: &str = "fulfillment";
    pub const TX_INPUT: &str = "tx_input";
    pub const OWNERS_BEFORE: &str = "owners_before";
    pub const TXID: &str = "txid";
    pub const CID: &str = "cid";

    pub const TIMESTAMP: &str = "timestamp";
    pub const TRANSACTIONS: &str = "transactions";
    pub const NODE_PUBKEY: &str = "node_pubkey";
    pub const VOTERS: &str = "voters";

    pub const VOTING_FOR_BLOCK: &str = "voting_for_block";
    pub const PREVIOUS_BLOCK: &str = "previous_block";
    pub const IS_BLOCK_VALID: &str = "is_block_valid";
    pub const INVALID_REASON: &str = "invalid_reason";
}

/// The bytes a transaction's id is computed over and its owners sign.
///
/// The `id` field is omitted and every fulfillment proof is blanked, so the
/// bytes are identical before and after signing.
pub fn transaction_signing_bytes(tx: &Transaction) -> Vec<u8> {
    encode_cbor_value_canonical(&transaction_to_cbor_value(tx, false))
}

/// The full canonical form of a transaction, including id and proofs.
pub fn transaction_bytes(tx: &Transaction) -> Vec<u8> {
    encode_cbor_value_canonical(&transaction_to_cbor_value(tx, true))
}

/// The bytes a block's id is computed over and its producer signs.
pub fn block_body_bytes(body: &BlockBody) -> Vec<u8> {
    encode_cbor_value_canonical(&block_body_to_cbor_value(body))
}

/// The bytes a voting node signs.
pub fn vote_bytes(vote: &Vote) -> Vec<u8> {
    encode_cbor_value_canonical(&vote_to_cbor_value(vote))
}

fn entry(key: &str, value: Value) -> (Value, Value) {
    (Value::Text(key.to_string()), value)
}

fn bytes_value(bytes: &[u8]) -> Value {
    Value::Bytes(bytes.to_vec())
}

fn transaction_to_cbor_value(tx: &Transaction, include_proofs: bool) -> Value {
    let mut entries = Vec::with_capacity(6);

    if include_proofs {
        entries.push(entry(keys::ID, bytes_value(tx.id.as_bytes())));
    }
    entries.push(entry(
        keys::OPERATION,
        Value::Text(tx.operation.as_str().to_string()),
    ));
    entries.push(entry(keys::ASSET, asset_to_cbor_value(&tx.asset)));
    entries.push(entry(
        keys::CONDITIONS,
        Value::Array(tx.conditions.iter().map(condition_to_cbor_value).collect()),
    ));
    entries.push(entry(
        keys::FULFILLMENTS,
        Value::Array(
            tx.fulfillments
                .iter()
                .map(|f| fulfillment_to_cbor_value(f, include_proofs))
                .collect(),
        ),
    ));
    entries.push(entry(keys::METADATA, optional_json(&tx.metadata)));

    Value::Map(entries)
}

fn asset_to_cbor_value(asset: &Asset) -> Value {
    let data_id = match &asset.data_id {
        Some(id) => bytes_value(id.as_bytes()),
        None => Value::Null,
    };
    Value::Map(vec![
        entry(keys::DATA_ID, data_id),
        entry(keys::DIVISIBLE, Value::Bool(asset.divisible)),
        entry(keys::DATA, optional_json(&asset.data)),
    ])
}

fn condition_to_cbor_value(condition: &Condition) -> Value {
    Value::Map(vec![
        entry(keys::AMOUNT, Value::Integer(condition.amount.into())),
        entry(
            keys::PUBLIC_KEYS,
            Value::Array(
                condition
                    .public_keys
                    .iter()
                    .map(|pk| bytes_value(pk.as_bytes()))
                    .collect(),
            ),
        ),
        entry(keys::CONDITION, bytes_value(condition.condition.as_bytes())),
    ])
}

fn fulfillment_to_cbor_value(fulfillment: &Fulfillment, include_proof: bool) -> Value {
    let proof = if include_proof && !fulfillment.fulfillment.is_empty() {
        bytes_value(fulfillment.fulfillment.as_bytes())
    } else {
        Value::Null
    };
    let tx_input = match &fulfillment.tx_input {
        Some(link) => link_to_cbor_value(link),
        None => Value::Null,
    };
    Value::Map(vec![
        entry(keys::FULFILLMENT, proof),
        entry(keys::TX_INPUT, tx_input),
        entry(
            keys::OWNERS_BEFORE,
            Value::Array(
                fulfillment
                    .owners_before
                    .iter()
                    .map(|pk| bytes_value(pk.as_bytes()))
                    .collect(),
            ),
        ),
    ])
}

fn link_to_cbor_value(link: &TransactionLink) -> Value {
    Value::Map(vec![
        entry(keys::TXID, bytes_value(link.txid.as_bytes())),
        entry(keys::CID, Value::Integer(link.cid.into())),
    ])
}

fn block_body_to_cbor_value(body: &BlockBody) -> Value {
    Value::Map(vec![
        entry(keys::TIMESTAMP, Value::Integer(body.timestamp.into())),
        entry(
            keys::TRANSACTIONS,
            Value::Array(
                body.transactions
                    .iter()
                    .map(|tx| transaction_to_cbor_value(tx, true))
                    .collect(),
            ),
        ),
        entry(keys::NODE_PUBKEY, bytes_value(body.node_pubkey.as_bytes())),
        entry(
            keys::VOTERS,
            Value::Array(body.voters.iter().map(|pk| bytes_value(pk.as_bytes())).collect()),
        ),
    ])
}

fn vote_to_cbor_value(vote: &Vote) -> Value {
    let reason = match &vote.invalid_reason {
        Some(r) => Value::Text(r.clone()),
        None => Value::Null,
    };
    Value::Map(vec![
        entry(keys::VOTING_FOR_BLOCK, bytes_value(vote.voting_for_block.as_bytes())),
        entry(keys::PREVIOUS_BLOCK, bytes_value(vote.previous_block.as_bytes())),
        entry(keys::IS_BLOCK_VALID, Value::Bool(vote.is_block_valid)),
        entry(keys::INVALID_REASON, reason),
        entry(keys::TIMESTAMP, Value::Integer(vote.timestamp.into())),
    ])
}

fn optional_json(value: &Option<serde_json::Value>) -> Value {
    match value {
        Some(v) => json_to_cbor_value(v),
        None => Value::Null,
    }
}

/// Convert an application JSON payload (asset data, metadata) to CBOR.
///
/// Object keys are re-sorted by the map encoder, so key order in the
/// incoming JSON does not affect the canonical bytes.
pub fn json_to_cbor_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::Integer(u.into())
            } else if let Some(i) = n.as_i64() {
                Value::Integer(i.into())
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Array(arr) => Value::Array(arr.iter().map(json_to_cbor_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (Value::Text(k.clone()), json_to_cbor_value(v)))
                .collect(),
        ),
    }
}

/// Encode a CBOR Value to canonical bytes.
///
/// This function ensures:
/// - Map keys are sorted by encoded byte comparison
/// - Integers use smallest encoding
/// - Definite lengths only
pub fn encode_cbor_value_canonical(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr),
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(f) => {
            // Always 64-bit; JSON payloads never need shorter forms.
            buf.push(0xfb);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        Value::Tag(tag, inner) => {
            encode_uint(buf, 6, *tag);
            encode_value_to(buf, inner);
        }
        // Never built by this module.
        _ => buf.push(0xf7),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item);
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);

    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}
