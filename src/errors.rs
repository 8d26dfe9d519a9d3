//! Unified error types for the whole crate.
//!
//! Every fallible operation returns [`Result`]. Store failures and transport
//! failures are distinct variants so the dispatcher can log them with the
//! right context while surfacing a short generic notice to the operator.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced product id does not resolve to any product.
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The id that failed to resolve
        id: i64,
    },

    /// A retraction was requested but no ledger record exists for the
    /// (product, day, operator) triple. Non-fatal: surfaced to the operator
    /// as a "nothing to remove" notice, never logged as an error.
    #[error("No sale to retract for '{product_name}'")]
    NothingToRetract {
        /// Name of the product the operator tried to retract from
        product_name: String,
    },

    /// Input rejected before persistence (e.g. empty product name).
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// Configuration error during bootstrap.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// Entity store failure (connection, query, transaction).
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Chat transport failure (send/edit/answer call failed).
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable reason
        message: String,
    },

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<teloxide::RequestError> for Error {
    fn from(value: teloxide::RequestError) -> Self {
        Error::Transport {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
