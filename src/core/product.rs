//! Product registry business logic.
//!
//! Products are created through the conversational add-product flow and are
//! only ever soft-deleted. Name uniqueness is case-insensitive and spans
//! active *and* inactive products, so a deactivated "Bread" still blocks a
//! new "bread". All functions are async and return Result types for proper
//! error handling throughout the system.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set,
    prelude::*,
    sea_query::{Expr, Func},
};

/// Retrieves all active products, ordered alphabetically by name.
///
/// This is the listing used by the product list, the sell menu, and the
/// delete menu; inactive products never appear in any of them.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::Active.eq(true))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by its unique ID, active or not.
///
/// Ledger operations deliberately use this unfiltered lookup: a sale on a
/// just-deactivated product is still accepted, so operators can close out
/// the day for items removed from the menus.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a product whose name matches `name` case-insensitively.
///
/// Includes inactive products, since soft-deleted names stay reserved.
/// Used by the add-product flow for its duplicate check.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_product_by_name_ci(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(
            Expr::expr(Func::lower(Expr::col(product::Column::Name)))
                .eq(name.trim().to_lowercase()),
        )
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new active product with the given name.
///
/// The name is trimmed; description and price start unset (price 0.0 is
/// rendered as "no price"). The case-insensitive duplicate check runs again
/// here right before insert, so callers that already checked still cannot
/// slip a duplicate through.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - A product with the same name (case-insensitively) already exists
/// - The database insert operation fails
pub async fn create_product(db: &DatabaseConnection, name: &str) -> Result<product::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if find_product_by_name_ci(db, name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("A product named '{name}' already exists"),
        });
    }

    let product = product::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(0.0),
        active: Set(true),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Soft deletes a product by marking it inactive, preserving its sales
/// history and past aggregates.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist or is already inactive
/// - The database update operation fails
pub async fn deactivate_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<product::Model> {
    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    if !*product.active.as_ref() {
        return Err(Error::ProductNotFound { id: product_id });
    }

    product.active = Set(false);
    product.update(db).await.map_err(Into::into)
}
