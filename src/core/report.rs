//! Aggregation engine - daily and weekly rollups over ledger records.
//!
//! All functions are framework-agnostic and return structured data that the
//! dispatch layer formats into messages. Ordering is deterministic: within a
//! day, groups sort descending by total quantity with ties broken by product
//! id; days are emitted most-recent first; days with no records are omitted
//! entirely.

use crate::{
    entities::{Sale, sale},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::prelude::*;
use std::collections::BTreeMap;

/// Aggregated total for one product within one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTotal {
    /// The product being totalled
    pub product_id: i64,
    /// Display label (first-seen name snapshot for the group)
    pub product_name: String,
    /// Sum of quantities across all operators
    pub total_quantity: i64,
}

/// One day's rollup within the weekly history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayReport {
    /// The calendar day this rollup covers
    pub day: NaiveDate,
    /// Per-product totals, sorted descending by quantity
    pub lines: Vec<ProductTotal>,
    /// Sum of all group totals for the day
    pub day_total: i64,
}

/// Computes the rollup for a single day across all operators.
///
/// Returns an empty vec when the day has no sales; the caller renders a
/// "no sales" message rather than treating that as an error.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn daily_summary(db: &DatabaseConnection, day: NaiveDate) -> Result<Vec<ProductTotal>> {
    let records = Sale::find()
        .filter(sale::Column::DateOnly.eq(day))
        .all(db)
        .await?;

    Ok(group_by_product(&records))
}

/// Computes per-day rollups for all days with `date_only >= start_day`.
///
/// Days are returned most-recent first; a day appears only if it has at
/// least one ledger record.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn weekly_history(
    db: &DatabaseConnection,
    start_day: NaiveDate,
) -> Result<Vec<DayReport>> {
    let records = Sale::find()
        .filter(sale::Column::DateOnly.gte(start_day))
        .all(db)
        .await?;

    let mut by_day: BTreeMap<NaiveDate, Vec<sale::Model>> = BTreeMap::new();
    for record in records {
        by_day.entry(record.date_only).or_default().push(record);
    }

    // BTreeMap iterates in ascending day order; the view wants newest first
    Ok(by_day
        .into_iter()
        .rev()
        .map(|(day, records)| {
            let lines = group_by_product(&records);
            let day_total = summary_total(&lines);
            DayReport {
                day,
                lines,
                day_total,
            }
        })
        .collect())
}

/// Sums the group totals of a rollup (the "total items sold" figure).
#[must_use]
pub fn summary_total(lines: &[ProductTotal]) -> i64 {
    lines.iter().map(|line| line.total_quantity).sum()
}

/// Groups ledger records by product, summing quantities.
///
/// The group label is the first-seen product name; sales snapshot the name
/// at creation and products are never renamed, so all rows of a group agree
/// in practice. Sort order: total descending, ties ascending by product id.
fn group_by_product(records: &[sale::Model]) -> Vec<ProductTotal> {
    let mut groups: BTreeMap<i64, ProductTotal> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.product_id)
            .and_modify(|group| group.total_quantity += i64::from(record.quantity))
            .or_insert_with(|| ProductTotal {
                product_id: record.product_id,
                product_name: record.product_name.clone(),
                total_quantity: i64::from(record.quantity),
            });
    }

    let mut lines: Vec<ProductTotal> = groups.into_values().collect();
    lines.sort_by(|a, b| {
        b.total_quantity
            .cmp(&a.total_quantity)
            .then(a.product_id.cmp(&b.product_id))
    });
    lines
}
