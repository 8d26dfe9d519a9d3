//! Product entity - Represents a sellable item registered by an operator.
//!
//! Products are created through the conversational add-product flow and are
//! only ever soft-deleted: the `active` flag hides them from menus while
//! their historical sales remain valid.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product; unique case-insensitively across active and
    /// inactive products
    pub name: String,
    /// Optional free-form description shown in the product list
    pub description: Option<String>,
    /// Unit price; 0.0 means "no price set" and is hidden in listings
    pub price: f64,
    /// Soft delete flag - inactive products are excluded from all menus
    /// but keep their sales history
    pub active: bool,
    /// When the product was created; immutable once set
    pub created_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A product has many sale records
    #[sea_orm(has_many = "super::sale::Entity")]
    Sale,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
