//! Strong type definitions for content identifiers.
//!
//! Every record in the ledger is content-addressed: its identifier is the
//! Blake3 hash of its canonical bytes. Identifiers are newtypes so that a
//! block id can never be passed where a transaction id is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// Create from raw bytes.
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Compute the identifier of some canonical bytes.
            pub fn of(canonical: &[u8]) -> Self {
                Self(*blake3::hash(canonical).as_bytes())
            }

            /// Get the raw bytes.
            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Convert to hex string.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse from hex string.
            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let bytes = hex::decode(s)?;
                if bytes.len() != 32 {
                    return Err(hex::FromHexError::InvalidStringLength);
                }
                let mut arr = [0u8; 32];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), &self.to_hex()[..16])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", &self.to_hex()[..16])
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

content_id!(
    /// A transaction identifier: Blake3 over the transaction's signing bytes.
    ///
    /// Fulfillment proofs are blanked before hashing, so signing a
    /// transaction never changes its id.
    TxId
);

content_id!(
    /// A block identifier: Blake3 over the canonical block body.
    BlockId
);

content_id!(
    /// Digest of an output's spending requirement.
    ///
    /// Commits to the ordered set of keys that must all sign to spend the
    /// output. See [`crate::transaction::Condition::requirement_for`].
    ConditionHash
);

/// An asset is identified by the id of the transaction that created it.
pub type AssetId = TxId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_id_hex_roundtrip() {
        let id = TxId::from_bytes([0x42; 32]);
        let recovered = TxId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_tx_id_display() {
        let id = TxId::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", id), "abababababababab");
    }

    #[test]
    fn test_block_id_debug() {
        let id = BlockId::from_bytes([0xcd; 32]);
        assert!(format!("{:?}", id).starts_with("BlockId("));
    }

    #[test]
    fn test_from_hex_rejects_short_input() {
        assert!(TxId::from_hex("abcd").is_err());
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let id = TxId::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: TxId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
