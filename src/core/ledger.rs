//! Sales ledger business logic.
//!
//! A ledger record is one [`crate::entities::sale::Model`] row holding the
//! cumulative quantity for a (product, day, operator) triple. Both
//! operations here are read-modify-write on that single row, wrapped in a
//! database transaction so that two rapid taps on the same button cannot
//! lose an update. Rows never store a zero quantity: decrementing from 1
//! deletes the row, and "no row" is the canonical empty state.

use crate::{
    entities::{Product, Sale, sale},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*};

/// Result of recording a +1 sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleOutcome {
    /// Cumulative quantity for the triple after the increment
    pub quantity: i32,
    /// True if this increment created the record (first sale of the day)
    pub created: bool,
    /// Product name, for confirmation messages
    pub product_name: String,
}

/// Result of retracting a -1 sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetractOutcome {
    /// Cumulative quantity remaining after the decrement (0 when deleted)
    pub remaining: i32,
    /// True if the decrement reached zero and the record was deleted
    pub deleted: bool,
    /// Product name, for confirmation messages
    pub product_name: String,
}

/// Records one sale of `product_id` by `operator_id` on `today`.
///
/// Increments the existing ledger record for the triple, or creates one with
/// quantity 1, snapshotting the product and operator names. The product only
/// has to exist - inactive products still sell, so operators can close out
/// items that were just removed from the menus.
///
/// # Errors
/// Returns `ProductNotFound` if `product_id` resolves to no product, or a
/// database error if the store fails.
pub async fn record_sale(
    db: &DatabaseConnection,
    product_id: i64,
    operator_id: i64,
    operator_name: Option<&str>,
    today: NaiveDate,
) -> Result<SaleOutcome> {
    // Single transaction around the read-modify-write
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let existing = find_record(&txn, product_id, today, operator_id).await?;
    let now = chrono::Utc::now().naive_utc();

    let outcome = if let Some(record) = existing {
        let quantity = record.quantity + 1;
        let mut record: sale::ActiveModel = record.into();
        record.quantity = Set(quantity);
        record.date = Set(now);
        record.update(&txn).await?;

        SaleOutcome {
            quantity,
            created: false,
            product_name: product.name,
        }
    } else {
        let record = sale::ActiveModel {
            product_id: Set(product_id),
            product_name: Set(product.name.clone()),
            quantity: Set(1),
            date: Set(now),
            date_only: Set(today),
            user_id: Set(operator_id),
            username: Set(operator_name.map(ToString::to_string)),
            ..Default::default()
        };
        record.insert(&txn).await?;

        SaleOutcome {
            quantity: 1,
            created: true,
            product_name: product.name,
        }
    };

    txn.commit().await?;
    Ok(outcome)
}

/// Retracts one sale of `product_id` by `operator_id` on `today`.
///
/// Decrements the ledger record for the triple; when the quantity reaches
/// zero the record is deleted instead of being stored as 0.
///
/// # Errors
/// Returns `ProductNotFound` if `product_id` resolves to no product, and
/// `NothingToRetract` if no ledger record exists for the triple. The latter
/// is idempotent: retracting on empty never creates or modifies anything.
pub async fn retract_sale(
    db: &DatabaseConnection,
    product_id: i64,
    operator_id: i64,
    today: NaiveDate,
) -> Result<RetractOutcome> {
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let record = find_record(&txn, product_id, today, operator_id).await?;

    // Rows are never stored with quantity 0, so the <= 1 check below covers
    // deletion; a missing row is the only "empty" case.
    let Some(record) = record.filter(|r| r.quantity > 0) else {
        return Err(Error::NothingToRetract {
            product_name: product.name,
        });
    };

    let outcome = if record.quantity <= 1 {
        Sale::delete_by_id(record.id).exec(&txn).await?;
        RetractOutcome {
            remaining: 0,
            deleted: true,
            product_name: product.name,
        }
    } else {
        let remaining = record.quantity - 1;
        let mut record: sale::ActiveModel = record.into();
        record.quantity = Set(remaining);
        record.date = Set(chrono::Utc::now().naive_utc());
        record.update(&txn).await?;

        RetractOutcome {
            remaining,
            deleted: false,
            product_name: product.name,
        }
    };

    txn.commit().await?;
    Ok(outcome)
}

/// Looks up the unique ledger record for a (product, day, operator) triple.
async fn find_record<C>(
    db: &C,
    product_id: i64,
    day: NaiveDate,
    operator_id: i64,
) -> Result<Option<sale::Model>>
where
    C: ConnectionTrait,
{
    Sale::find()
        .filter(sale::Column::ProductId.eq(product_id))
        .filter(sale::Column::DateOnly.eq(day))
        .filter(sale::Column::UserId.eq(operator_id))
        .one(db)
        .await
        .map_err(Into::into)
}
