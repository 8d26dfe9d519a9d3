//! Core business logic - framework-agnostic ledger, aggregation, product,
//! and session operations.
//!
//! Nothing in this module knows about the chat transport: functions take a
//! database connection and plain values, and return structured data that the
//! dispatch layer renders into messages.

/// Sales ledger - per-(product, day, operator) quantity records
pub mod ledger;
/// Product registry - creation, listing, soft deletion
pub mod product;
/// Aggregation engine - daily and weekly rollups
pub mod report;
/// Transient per-operator conversation state
pub mod session;
