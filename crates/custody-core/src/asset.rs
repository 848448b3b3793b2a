//! Asset lineage: identity and divisibility of ledger assets.
//!
//! An asset is born in a CREATE (or GENESIS) transaction and is identified
//! by that transaction's id forever after. TRANSFERs carry only a link to
//! the asset (`data_id`); the asset's own record never changes.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::transaction::Transaction;
use crate::types::AssetId;

/// An asset record, or a link to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Id of the creating transaction. `None` on the creation itself.
    #[serde(default)]
    pub data_id: Option<AssetId>,

    /// Whether the asset may be split across several outputs.
    #[serde(default)]
    pub divisible: bool,

    /// Application data attached at creation.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Asset {
    /// A new, indivisible asset for a CREATE transaction.
    pub fn new(data: Option<serde_json::Value>) -> Self {
        Self {
            data_id: None,
            divisible: false,
            data,
        }
    }

    /// A new divisible asset for a CREATE transaction.
    pub fn divisible(data: Option<serde_json::Value>) -> Self {
        Self {
            data_id: None,
            divisible: true,
            data,
        }
    }

    /// A link to an existing asset, carried by TRANSFER transactions.
    pub fn link(asset_id: AssetId) -> Self {
        Self {
            data_id: Some(asset_id),
            divisible: false,
            data: None,
        }
    }

    /// Check that `amount` is consistent with the asset's divisibility.
    ///
    /// Indivisible assets always move as a single unit. Divisible assets
    /// accept any positive amount; conservation across inputs and outputs
    /// is the transaction validator's job.
    pub fn validate_asset(&self, amount: u64) -> Result<(), ValidationError> {
        if amount < 1 {
            return Err(ValidationError::AmountError(
                "`amount` needs to be greater than zero".into(),
            ));
        }
        if !self.divisible && amount != 1 {
            return Err(ValidationError::AmountError(format!(
                "non divisible assets always have amount equal to one, got {}",
                amount
            )));
        }
        Ok(())
    }
}

impl Default for Asset {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Resolve the asset a set of input transactions carries.
///
/// A creation input contributes its own id; any other input contributes the
/// asset link it carries. Inputs resolving to different assets are an
/// [`ValidationError::AssetIdMismatch`]; comparing the result with the
/// spending transaction's declared asset is left to the caller.
pub fn get_asset_id<'a, I>(transactions: I) -> Result<AssetId, ValidationError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut resolved: Option<AssetId> = None;

    for tx in transactions {
        let asset_id = if tx.operation.is_creation() {
            tx.id
        } else {
            tx.asset.data_id.ok_or_else(|| {
                ValidationError::MalformedTransaction(format!(
                    "transfer `{}` carries no asset link",
                    tx.id
                ))
            })?
        };

        match resolved {
            None => resolved = Some(asset_id),
            Some(first) if first != asset_id => {
                return Err(ValidationError::AssetIdMismatch {
                    declared: Some(first),
                    resolved: asset_id,
                });
            }
            Some(_) => {}
        }
    }

    resolved.ok_or_else(|| {
        ValidationError::MalformedTransaction("no input transactions to resolve an asset from".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    #[test]
    fn test_indivisible_accepts_exactly_one() {
        let asset = Asset::new(None);
        assert!(asset.validate_asset(1).is_ok());
        assert!(matches!(
            asset.validate_asset(2),
            Err(ValidationError::AmountError(_))
        ));
    }

    #[test]
    fn test_zero_amount_rejected_either_way() {
        assert!(Asset::new(None).validate_asset(0).is_err());
        assert!(Asset::divisible(None).validate_asset(0).is_err());
    }

    #[test]
    fn test_divisible_accepts_any_positive_amount() {
        let asset = Asset::divisible(None);
        for amount in [1, 2, 7, u64::MAX] {
            assert!(asset.validate_asset(amount).is_ok());
        }
    }

    #[test]
    fn test_get_asset_id_from_create_and_transfer() {
        let owner = Keypair::from_seed(&[0x01; 32]).public_key();
        let create = Transaction::create(&[owner], vec![(vec![owner], 1)], Asset::new(None), None)
            .unwrap();

        let inputs = create.to_inputs(None);
        let transfer =
            Transaction::transfer(inputs, vec![(vec![owner], 1)], create.id, None).unwrap();

        assert_eq!(get_asset_id([&create]).unwrap(), create.id);
        assert_eq!(get_asset_id([&transfer]).unwrap(), create.id);
        assert_eq!(get_asset_id([&create, &transfer]).unwrap(), create.id);
    }

    #[test]
    fn test_get_asset_id_mixed_assets_rejected() {
        let owner = Keypair::from_seed(&[0x02; 32]).public_key();
        let a = Transaction::create(&[owner], vec![(vec![owner], 1)], Asset::new(None), None)
            .unwrap();
        let b = Transaction::create(
            &[owner],
            vec![(vec![owner], 1)],
            Asset::new(Some(serde_json::json!({"serial": 2}))),
            None,
        )
        .unwrap();

        assert!(matches!(
            get_asset_id([&a, &b]),
            Err(ValidationError::AssetIdMismatch { .. })
        ));
    }

    #[test]
    fn test_get_asset_id_empty_is_malformed() {
        let none: Vec<&Transaction> = Vec::new();
        assert!(matches!(
            get_asset_id(none),
            Err(ValidationError::MalformedTransaction(_))
        ));
    }
}
