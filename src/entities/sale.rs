//! Sale entity - A ledger record of cumulative quantity sold for one
//! product, on one calendar day, by one operator.
//!
//! At most one row exists per (`product_id`, `date_only`, `user_id`) triple,
//! and a row present in the table always has `quantity >= 1`: a decrement
//! that would reach zero deletes the row instead.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The product this record counts sales for
    pub product_id: i64,
    /// Product name snapshot captured at creation time
    pub product_name: String,
    /// Cumulative quantity for the triple; never stored as 0
    pub quantity: i32,
    /// Timestamp of the last modification to this record
    pub date: DateTime,
    /// Calendar day key used for grouping daily sales
    pub date_only: Date,
    /// Operator id (opaque platform identity)
    pub user_id: i64,
    /// Operator display-name snapshot
    pub username: Option<String>,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale record belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
