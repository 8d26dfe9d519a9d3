//! Transient per-operator conversation state.
//!
//! The only tracked state is "this operator was prompted for a product name
//! and the next non-command message they send is that name". The store is an
//! in-process map injected into the dispatcher; it is not persisted across
//! restarts, and entries have no expiry - a stale entry survives until it is
//! consumed or refreshed by the add-product command again.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Conversation state for one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorState {
    /// The operator was prompted for a new product's name
    AwaitingProductName,
}

/// In-process session store keyed by operator id.
#[derive(Debug, Default)]
pub struct SessionStore {
    states: Mutex<HashMap<i64, OperatorState>>,
}

impl SessionStore {
    /// Creates an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts the operator into the awaiting-product-name state, replacing
    /// any previous state.
    pub fn begin_add_product(&self, operator_id: i64) {
        self.lock().insert(operator_id, OperatorState::AwaitingProductName);
    }

    /// Removes and returns the operator's state, if any. Consuming on read
    /// keeps the state single-shot: one prompt, one answer.
    pub fn take(&self, operator_id: i64) -> Option<OperatorState> {
        self.lock().remove(&operator_id)
    }

    /// Whether the operator currently has a pending state.
    #[must_use]
    pub fn is_awaiting(&self, operator_id: i64) -> bool {
        self.lock().contains_key(&operator_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, OperatorState>> {
        // A poisoned map of transient prompts is still usable
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
