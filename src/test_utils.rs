//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! plus a recording [`Transport`] mock for dispatcher tests.

use crate::{
    dispatch::{Keyboard, Transport},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::sync::{Mutex, PoisonError};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a `YYYY-MM-DD` literal into a day key.
///
/// # Panics
/// Panics on malformed input; tests only pass literals.
#[must_use]
pub fn day(s: &str) -> NaiveDate {
    s.parse().expect("valid test date literal")
}

/// One outbound transport call captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundCall {
    /// `send_message` was invoked
    Send {
        /// Target chat
        chat_id: i64,
        /// Message text
        text: String,
        /// Attached keyboard, if any
        keyboard: Option<Keyboard>,
    },
    /// `edit_message` was invoked
    Edit {
        /// Target chat
        chat_id: i64,
        /// Edited message
        message_id: i32,
        /// Replacement text
        text: String,
        /// Replacement keyboard, if any
        keyboard: Option<Keyboard>,
    },
    /// `answer_callback` was invoked
    Ack {
        /// Callback being acknowledged
        callback_id: String,
        /// Toast/alert text, if any
        notice: Option<String>,
        /// Whether a blocking alert was requested
        alert: bool,
    },
}

/// A [`Transport`] that records every call and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<OutboundCall>>,
}

impl RecordingTransport {
    /// Returns all calls recorded so far and clears the log, so each test
    /// step can assert on just its own traffic.
    pub fn take_calls(&self) -> Vec<OutboundCall> {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *calls)
    }

    fn record(&self, call: OutboundCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()> {
        self.record(OutboundCall::Send {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()> {
        self.record(OutboundCall::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        notice: Option<&str>,
        alert: bool,
    ) -> Result<()> {
        self.record(OutboundCall::Ack {
            callback_id: callback_id.to_string(),
            notice: notice.map(ToString::to_string),
            alert,
        });
        Ok(())
    }
}
