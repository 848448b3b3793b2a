//! Transaction validation: operation rules, lineage, spends and signatures.

use std::collections::HashSet;

use custody_core::{
    get_asset_id, Condition, Transaction, TransactionLink, ValidationError,
};
use custody_ledger::{Ledger, TxStatus};

use crate::error::{CustodyError, Result};

/// Validate a transaction against the ledger.
///
/// Returns the transaction unchanged when it is admissible. The first
/// violation found is returned; nothing is written to the ledger.
///
/// This performs, in order:
/// - Non-empty fulfillments
/// - Operation rules (no inputs on creations, inputs on transfers)
/// - Every output holds at least one unit
/// - For transfers: repeated inputs, input existence and status, double
///   spends, asset lineage, divisibility and amount conservation
/// - Fulfillment proofs against their paired conditions
pub async fn validate_transaction<'a, L>(tx: &'a Transaction, ledger: &L) -> Result<&'a Transaction>
where
    L: Ledger + ?Sized,
{
    match check_transaction(tx, ledger).await {
        Ok(()) => {
            tracing::debug!(tx_id = %tx.id, operation = %tx.operation, "transaction valid");
            Ok(tx)
        }
        Err(CustodyError::Rejected(e)) => {
            tracing::warn!(tx_id = %tx.id, kind = e.kind(), error = %e, "transaction rejected");
            Err(e.into())
        }
        Err(e) => {
            tracing::warn!(tx_id = %tx.id, error = %e, "transaction not validated");
            Err(e)
        }
    }
}

async fn check_transaction<L>(tx: &Transaction, ledger: &L) -> Result<()>
where
    L: Ledger + ?Sized,
{
    // 1. At least one fulfillment
    if tx.fulfillments.is_empty() {
        return Err(malformed("transaction contains no fulfillments"));
    }

    // 2. Operation rules. Unknown operations never get this far: they are
    // rejected when the wire form is parsed.
    let input_conditions = if tx.is_creation() {
        check_creation(tx)?;
        Vec::new()
    } else {
        check_transfer(tx, ledger).await?
    };

    // 3. Proofs. Transfer fulfillment `i` pairs with `input_conditions[i]`.
    if !tx.fulfillments_valid(&input_conditions) {
        return Err(ValidationError::InvalidSignature(format!(
            "fulfillments of `{}` do not satisfy their conditions",
            tx.id
        ))
        .into());
    }

    Ok(())
}

fn check_creation(tx: &Transaction) -> Result<()> {
    if tx.fulfillments.iter().any(|f| f.tx_input.is_some()) {
        return Err(malformed(format!("a {} operation has no inputs", tx.operation)));
    }

    let amount = output_amount(tx)?;
    tx.asset.validate_asset(amount)?;
    Ok(())
}

/// Sum of the transaction's outputs. Every output holds at least one unit.
fn output_amount(tx: &Transaction) -> Result<u64> {
    let mut total = 0u64;
    for condition in &tx.conditions {
        if condition.amount < 1 {
            return Err(amount_error("`amount` needs to be greater than zero"));
        }
        total = total
            .checked_add(condition.amount)
            .ok_or_else(|| amount_error("output amounts overflow"))?;
    }
    Ok(total)
}

async fn check_transfer<L>(tx: &Transaction, ledger: &L) -> Result<Vec<Condition>>
where
    L: Ledger + ?Sized,
{
    let links = tx
        .fulfillments
        .iter()
        .map(|f| f.tx_input)
        .collect::<Option<Vec<TransactionLink>>>()
        .ok_or_else(|| malformed("only CREATE and GENESIS transactions can have null inputs"))?;

    // An output listed twice would be counted twice. The ledger only knows
    // about other spenders, so repeats are caught here.
    let mut seen = HashSet::with_capacity(links.len());
    for link in &links {
        if !seen.insert(*link) {
            return Err(ValidationError::DoubleSpend {
                input: *link,
                spent_by: tx.id,
            }
            .into());
        }
    }

    let mut input_conditions = Vec::with_capacity(links.len());
    let mut input_txs = Vec::with_capacity(links.len());
    let mut input_amount = 0u64;

    for link in links {
        tracing::trace!(tx_id = %tx.id, input = %link, "checking input");

        let (input_tx, status) = ledger
            .get_transaction_with_status(&link.txid)
            .await?
            .ok_or(ValidationError::TransactionDoesNotExist(link.txid))?;

        if status != TxStatus::Valid {
            return Err(ValidationError::TransactionNotInValidBlock(link.txid).into());
        }

        if let Some(spent) = ledger.get_spent(&link.txid, link.cid).await? {
            // Being our own recorded spender is fine: re-validation must be
            // idempotent.
            if spent.id != tx.id {
                return Err(ValidationError::DoubleSpend {
                    input: link,
                    spent_by: spent.id,
                }
                .into());
            }
        }

        let condition = input_tx
            .conditions
            .get(link.cid as usize)
            .cloned()
            .ok_or_else(|| malformed(format!("input `{}` references a missing output", link)))?;

        if condition.amount < 1 {
            return Err(amount_error("`amount` needs to be greater than zero"));
        }
        input_amount = input_amount
            .checked_add(condition.amount)
            .ok_or_else(|| amount_error("input amounts overflow"))?;

        input_conditions.push(condition);
        input_txs.push(input_tx);
    }

    // Lineage: every input carries the asset this transfer declares.
    let asset_id = get_asset_id(&input_txs)?;
    if tx.asset.data_id != Some(asset_id) {
        return Err(ValidationError::AssetIdMismatch {
            declared: tx.asset.data_id,
            resolved: asset_id,
        }
        .into());
    }

    let asset = ledger
        .get_asset_by_id(&asset_id)
        .await?
        .ok_or(ValidationError::TransactionDoesNotExist(asset_id))?;
    asset.validate_asset(input_amount)?;

    let output_total = output_amount(tx)?;
    if output_total != input_amount {
        return Err(amount_error(format!(
            "the amount used in the inputs `{}` needs to be same as the amount used in the outputs `{}`",
            input_amount, output_total
        )));
    }

    Ok(input_conditions)
}

fn malformed(msg: impl Into<String>) -> CustodyError {
    ValidationError::MalformedTransaction(msg.into()).into()
}

fn amount_error(msg: impl Into<String>) -> CustodyError {
    ValidationError::AmountError(msg.into()).into()
}
