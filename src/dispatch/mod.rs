//! Conversation state machine - maps inbound events to ledger, registry,
//! and aggregation operations, and to outbound messages.
//!
//! One [`Dispatcher`] serves every delivery mode: transport entry points
//! translate platform updates into [`Inbound`] values and call
//! [`Dispatcher::handle_event`], which never returns an error - every
//! per-event failure is logged and surfaced to the operator as a short
//! generic notice, so one bad event cannot take down the loop or leak into
//! another operator's conversation.

/// Inbound event, command, and callback payload shapes
pub mod event;
/// Message templates and keyboard builders
pub mod render;

pub use event::{CallbackAction, Command, Inbound};

use crate::{
    core::{
        ledger, product,
        report::{self, ProductTotal},
        session::{OperatorState, SessionStore},
    },
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info, warn};

/// One inline-keyboard button: a label plus the callback it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button
    pub label: String,
    /// Callback payload sent back when pressed
    pub action: CallbackAction,
}

impl Button {
    /// Creates a button.
    pub fn new(label: impl Into<String>, action: CallbackAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// A transport-agnostic inline keyboard: rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    /// Button rows, rendered top to bottom
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Creates a keyboard from rows of buttons.
    #[must_use]
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }
}

/// Outbound side of the chat platform, as seen by the dispatcher.
///
/// Implemented by the Telegram adapter in production and by a recording
/// mock in tests. All calls are fallible; the dispatcher treats failures
/// per its catch-and-notify policy.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends a new message into a chat.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()>;

    /// Edits an existing message in place.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()>;

    /// Acknowledges a button press, optionally with a toast (`alert` false)
    /// or a blocking alert dialog (`alert` true).
    async fn answer_callback(
        &self,
        callback_id: &str,
        notice: Option<&str>,
        alert: bool,
    ) -> Result<()>;
}

/// The conversation state machine.
pub struct Dispatcher<T: Transport> {
    db: DatabaseConnection,
    sessions: SessionStore,
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    /// Creates a dispatcher over a store, a session store, and a transport.
    pub const fn new(db: DatabaseConnection, sessions: SessionStore, transport: T) -> Self {
        Self {
            db,
            sessions,
            transport,
        }
    }

    /// Handles one inbound event to completion.
    ///
    /// Never fails: errors are logged with context and turned into a short
    /// generic notice for the operator (a reply for messages, an ack for
    /// callbacks). Failure to deliver even the notice is only logged.
    pub async fn handle_event(&self, event: Inbound) {
        let outcome = match &event {
            Inbound::Message {
                operator_id,
                chat_id,
                text,
                ..
            } => self.handle_message(*operator_id, *chat_id, text).await,
            Inbound::Callback {
                operator_id,
                chat_id,
                message_id,
                callback_id,
                operator_name,
                payload,
            } => {
                self.handle_callback(
                    *operator_id,
                    *chat_id,
                    *message_id,
                    callback_id,
                    operator_name.as_deref(),
                    payload,
                )
                .await
            }
        };

        if let Err(err) = outcome {
            error!(error = %err, "event handling failed");
            let notice = match &event {
                Inbound::Message { chat_id, .. } => {
                    self.transport
                        .send_message(*chat_id, render::FAILURE_TEXT, None)
                        .await
                }
                Inbound::Callback { callback_id, .. } => {
                    self.transport
                        .answer_callback(callback_id, Some(render::FAILURE_TEXT), false)
                        .await
                }
            };
            if let Err(err) = notice {
                warn!(error = %err, "could not deliver failure notice");
            }
        }
    }

    async fn handle_message(&self, operator_id: i64, chat_id: i64, text: &str) -> Result<()> {
        if let Some(command) = Command::parse(text) {
            return self.handle_command(command, operator_id, chat_id).await;
        }

        if text.trim().starts_with('/') {
            // Unknown command: ignored, like unregistered platform commands
            debug!(operator_id, "ignoring unrecognized command");
            return Ok(());
        }

        self.handle_free_text(operator_id, chat_id, text).await
    }

    /// Stateless command dispatch; runs in any conversational state without
    /// touching it (except `/add`, which arms the add-product flow).
    async fn handle_command(&self, command: Command, operator_id: i64, chat_id: i64) -> Result<()> {
        debug!(operator_id, ?command, "dispatching command");
        match command {
            Command::Start => {
                self.transport
                    .send_message(chat_id, render::WELCOME_TEXT, None)
                    .await
            }
            Command::Help => {
                self.transport
                    .send_message(chat_id, render::HELP_TEXT, None)
                    .await
            }
            Command::AddProduct => {
                // Re-issuing /add refreshes the pending state and re-prompts
                self.sessions.begin_add_product(operator_id);
                self.transport
                    .send_message(chat_id, render::ADD_PRODUCT_PROMPT, None)
                    .await
            }
            Command::ListProducts => {
                let products = product::list_active_products(&self.db).await?;
                let text = if products.is_empty() {
                    render::NO_PRODUCTS_TEXT.to_string()
                } else {
                    render::product_list_text(&products)
                };
                self.transport.send_message(chat_id, &text, None).await
            }
            Command::SellMenu => {
                let products = product::list_active_products(&self.db).await?;
                if products.is_empty() {
                    return self
                        .transport
                        .send_message(chat_id, render::NO_PRODUCTS_TO_SELL_TEXT, None)
                        .await;
                }
                self.transport
                    .send_message(
                        chat_id,
                        render::SELL_MENU_TEXT,
                        Some(render::sell_menu_keyboard(&products)),
                    )
                    .await
            }
            Command::DailySummary => {
                let today = today();
                let lines = report::daily_summary(&self.db, today).await?;
                let keyboard = (!lines.is_empty()).then(render::summary_keyboard);
                self.transport
                    .send_message(chat_id, &render::summary_text(today, &lines), keyboard)
                    .await
            }
            Command::WeeklyHistory => self.send_history(chat_id).await,
            Command::DeleteMenu => {
                let products = product::list_active_products(&self.db).await?;
                if products.is_empty() {
                    return self
                        .transport
                        .send_message(chat_id, render::NO_PRODUCTS_TO_DELETE_TEXT, None)
                        .await;
                }
                self.transport
                    .send_message(
                        chat_id,
                        render::DELETE_MENU_TEXT,
                        Some(render::delete_menu_keyboard(&products)),
                    )
                    .await
            }
        }
    }

    /// Non-command text: consumed by the add-product flow if this operator
    /// was prompted for a name, silently ignored otherwise.
    async fn handle_free_text(&self, operator_id: i64, chat_id: i64, text: &str) -> Result<()> {
        let Some(state) = self.sessions.take(operator_id) else {
            return Ok(());
        };

        match state {
            OperatorState::AwaitingProductName => {
                let name = text.trim();
                if name.is_empty() {
                    // Rejected before persistence; re-arm and re-prompt
                    self.sessions.begin_add_product(operator_id);
                    return self
                        .transport
                        .send_message(chat_id, render::ADD_PRODUCT_PROMPT, None)
                        .await;
                }

                if product::find_product_by_name_ci(&self.db, name)
                    .await?
                    .is_some()
                {
                    return self
                        .transport
                        .send_message(chat_id, render::PRODUCT_EXISTS_TEXT, None)
                        .await;
                }

                match product::create_product(&self.db, name).await {
                    Ok(created) => {
                        info!(operator_id, product_id = created.id, "product created");
                        self.transport
                            .send_message(chat_id, &render::product_added_text(&created.name), None)
                            .await
                    }
                    // Duplicate slipped in between check and insert
                    Err(Error::Validation { .. }) => {
                        self.transport
                            .send_message(chat_id, render::PRODUCT_EXISTS_TEXT, None)
                            .await
                    }
                    Err(err) => Err(err),
                }
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    async fn handle_callback(
        &self,
        operator_id: i64,
        chat_id: i64,
        message_id: i32,
        callback_id: &str,
        operator_name: Option<&str>,
        payload: &str,
    ) -> Result<()> {
        let Some(action) = CallbackAction::parse(payload) else {
            debug!(operator_id, payload, "ignoring unrecognized callback");
            return self.transport.answer_callback(callback_id, None, false).await;
        };
        debug!(operator_id, ?action, "dispatching callback");

        match action {
            CallbackAction::Sell(product_id) => {
                match ledger::record_sale(&self.db, product_id, operator_id, operator_name, today())
                    .await
                {
                    Ok(outcome) => {
                        self.transport
                            .answer_callback(
                                callback_id,
                                Some(&render::sale_recorded_notice(&outcome)),
                                false,
                            )
                            .await?;
                        self.transport
                            .edit_message(
                                chat_id,
                                message_id,
                                &render::sale_recorded_text(&outcome),
                                None,
                            )
                            .await
                    }
                    Err(Error::ProductNotFound { .. }) => {
                        self.transport
                            .answer_callback(
                                callback_id,
                                Some(render::PRODUCT_NOT_FOUND_NOTICE),
                                false,
                            )
                            .await
                    }
                    Err(err) => Err(err),
                }
            }
            CallbackAction::Remove(product_id) => {
                match ledger::retract_sale(&self.db, product_id, operator_id, today()).await {
                    Ok(outcome) => {
                        self.transport
                            .answer_callback(
                                callback_id,
                                Some(&render::sale_retracted_notice(&outcome)),
                                false,
                            )
                            .await?;
                        self.transport
                            .edit_message(
                                chat_id,
                                message_id,
                                &render::sale_retracted_text(&outcome),
                                None,
                            )
                            .await
                    }
                    // Nothing to retract: non-blocking alert, message untouched
                    Err(Error::NothingToRetract { product_name }) => {
                        self.transport
                            .answer_callback(
                                callback_id,
                                Some(&render::nothing_to_retract_notice(&product_name)),
                                true,
                            )
                            .await
                    }
                    Err(Error::ProductNotFound { .. }) => {
                        self.transport
                            .answer_callback(
                                callback_id,
                                Some(render::PRODUCT_NOT_FOUND_NOTICE),
                                false,
                            )
                            .await
                    }
                    Err(err) => Err(err),
                }
            }
            CallbackAction::RefreshSummary => {
                let today = today();
                let lines: Vec<ProductTotal> = report::daily_summary(&self.db, today).await?;
                self.transport
                    .edit_message(
                        chat_id,
                        message_id,
                        &render::summary_text(today, &lines),
                        Some(render::summary_keyboard()),
                    )
                    .await?;
                self.transport
                    .answer_callback(callback_id, Some("✅ Updated!"), false)
                    .await
            }
            CallbackAction::ShowHistory => {
                self.transport
                    .answer_callback(callback_id, None, false)
                    .await?;
                self.send_history(chat_id).await
            }
            CallbackAction::Delete(product_id) => {
                let Some(found) = product::find_product_by_id(&self.db, product_id).await? else {
                    return self
                        .transport
                        .answer_callback(callback_id, Some(render::PRODUCT_NOT_FOUND_NOTICE), false)
                        .await;
                };
                self.transport
                    .edit_message(
                        chat_id,
                        message_id,
                        &render::confirm_delete_text(&found.name),
                        Some(render::confirm_delete_keyboard(found.id)),
                    )
                    .await?;
                self.transport.answer_callback(callback_id, None, false).await
            }
            CallbackAction::ConfirmDelete(product_id) => {
                match product::deactivate_product(&self.db, product_id).await {
                    Ok(deleted) => {
                        info!(operator_id, product_id, "product soft-deleted");
                        self.transport
                            .edit_message(
                                chat_id,
                                message_id,
                                &render::product_deleted_text(&deleted.name),
                                None,
                            )
                            .await?;
                        self.transport
                            .answer_callback(callback_id, Some("✅ Deleted!"), false)
                            .await
                    }
                    // Product vanished between confirmation and tap: no-op
                    Err(Error::ProductNotFound { .. }) => {
                        self.transport.answer_callback(callback_id, None, false).await
                    }
                    Err(err) => Err(err),
                }
            }
            CallbackAction::Cancel => {
                self.transport
                    .edit_message(chat_id, message_id, render::CANCELLED_TEXT, None)
                    .await?;
                self.transport
                    .answer_callback(callback_id, Some(render::CANCELLED_NOTICE), false)
                    .await
            }
        }
    }

    /// Sends the weekly history as a new message. Shared by the `/history`
    /// command and the summary's history button.
    async fn send_history(&self, chat_id: i64) -> Result<()> {
        let start = history_start(today());
        let reports = report::weekly_history(&self.db, start).await?;
        let text = if reports.is_empty() {
            render::NO_HISTORY_TEXT.to_string()
        } else {
            render::history_text(&reports)
        };
        self.transport.send_message(chat_id, &text, None).await
    }
}

/// The operator's current calendar day (server-local day boundary).
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// First day included in the 7-day history window.
fn history_start(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(7)).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{ledger::record_sale, product::create_product},
        entities::Sale,
        test_utils::{OutboundCall, RecordingTransport, setup_test_db},
    };
    use sea_orm::EntityTrait;

    const OPERATOR: i64 = 7;
    const CHAT: i64 = 99;
    const MESSAGE: i32 = 555;

    async fn dispatcher() -> Result<Dispatcher<RecordingTransport>> {
        let db = setup_test_db().await?;
        Ok(Dispatcher::new(
            db,
            SessionStore::new(),
            RecordingTransport::default(),
        ))
    }

    fn message(text: &str) -> Inbound {
        Inbound::Message {
            operator_id: OPERATOR,
            chat_id: CHAT,
            operator_name: Some("alice".to_string()),
            text: text.to_string(),
        }
    }

    fn callback(payload: &str) -> Inbound {
        Inbound::Callback {
            operator_id: OPERATOR,
            chat_id: CHAT,
            message_id: MESSAGE,
            callback_id: "cb-1".to_string(),
            operator_name: Some("alice".to_string()),
            payload: payload.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_product_flow() -> Result<()> {
        let d = dispatcher().await?;

        d.handle_event(message("/add")).await;
        d.handle_event(message("Bread")).await;

        let calls = d.transport.take_calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[0],
            OutboundCall::Send { chat_id: CHAT, text, .. } if text == render::ADD_PRODUCT_PROMPT
        ));
        assert!(matches!(
            &calls[1],
            OutboundCall::Send { text, .. } if text.contains("Product added")
        ));

        // State consumed: the same text again is now ignored free text
        d.handle_event(message("Bread again")).await;
        assert!(d.transport.take_calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_add_product_duplicate_case_insensitive() -> Result<()> {
        let d = dispatcher().await?;
        create_product(&d.db, "Bread").await?;

        d.handle_event(message("/add")).await;
        d.handle_event(message("bread")).await;

        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[1],
            OutboundCall::Send { text, .. } if text == render::PRODUCT_EXISTS_TEXT
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_free_text_while_idle_is_ignored() -> Result<()> {
        let d = dispatcher().await?;

        d.handle_event(message("hello there")).await;
        d.handle_event(message("/frobnicate")).await;

        assert!(d.transport.take_calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_commands_do_not_consume_pending_state() -> Result<()> {
        let d = dispatcher().await?;

        d.handle_event(message("/add")).await;
        d.handle_event(message("/help")).await;
        d.handle_event(message("Bread")).await;

        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[2],
            OutboundCall::Send { text, .. } if text.contains("Product added")
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_sell_menu_lists_active_products() -> Result<()> {
        let d = dispatcher().await?;

        d.handle_event(message("/sell")).await;
        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[0],
            OutboundCall::Send { text, .. } if text == render::NO_PRODUCTS_TO_SELL_TEXT
        ));

        let bread = create_product(&d.db, "Bread").await?;
        d.handle_event(message("/sell")).await;
        let calls = d.transport.take_calls();
        let OutboundCall::Send { keyboard: Some(keyboard), .. } = &calls[0] else {
            panic!("expected sell menu with keyboard, got {:?}", calls[0]);
        };
        assert_eq!(keyboard.rows.len(), 1);
        assert_eq!(keyboard.rows[0][0].action, CallbackAction::Sell(bread.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_sell_callback_records_and_edits() -> Result<()> {
        let d = dispatcher().await?;
        let bread = create_product(&d.db, "Bread").await?;

        d.handle_event(callback(&CallbackAction::Sell(bread.id).encode()))
            .await;

        let calls = d.transport.take_calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[0],
            OutboundCall::Ack { notice: Some(n), alert: false, .. } if n == "✅ +1 Bread"
        ));
        assert!(matches!(
            &calls[1],
            OutboundCall::Edit { message_id: MESSAGE, text, .. } if text.contains("Sale recorded")
        ));

        let rows = Sale::find().all(&d.db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 1);
        assert_eq!(rows[0].username.as_deref(), Some("alice"));

        Ok(())
    }

    #[tokio::test]
    async fn test_sell_callback_unknown_product() -> Result<()> {
        let d = dispatcher().await?;

        d.handle_event(callback("sell:999")).await;

        let calls = d.transport.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            OutboundCall::Ack { notice: Some(n), .. } if n == render::PRODUCT_NOT_FOUND_NOTICE
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_callback_on_empty_alerts_without_edit() -> Result<()> {
        let d = dispatcher().await?;
        let bread = create_product(&d.db, "Bread").await?;

        d.handle_event(callback(&CallbackAction::Remove(bread.id).encode()))
            .await;

        let calls = d.transport.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            OutboundCall::Ack { notice: Some(n), alert: true, .. }
                if n == &render::nothing_to_retract_notice("Bread")
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_callback_decrements_and_deletes() -> Result<()> {
        let d = dispatcher().await?;
        let bread = create_product(&d.db, "Bread").await?;
        record_sale(&d.db, bread.id, OPERATOR, None, today()).await?;
        record_sale(&d.db, bread.id, OPERATOR, None, today()).await?;

        d.handle_event(callback(&CallbackAction::Remove(bread.id).encode()))
            .await;
        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[1],
            OutboundCall::Edit { text, .. } if text.contains("Current total: 1")
        ));

        d.handle_event(callback(&CallbackAction::Remove(bread.id).encode()))
            .await;
        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[1],
            OutboundCall::Edit { text, .. } if text.contains("Sale removed")
        ));
        assert!(Sale::find().all(&d.db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_summary_edits_in_place() -> Result<()> {
        let d = dispatcher().await?;
        let bread = create_product(&d.db, "Bread").await?;
        record_sale(&d.db, bread.id, OPERATOR, None, today()).await?;

        d.handle_event(callback("refresh-summary")).await;

        let calls = d.transport.take_calls();
        assert_eq!(calls.len(), 2);
        let OutboundCall::Edit { text, keyboard, .. } = &calls[0] else {
            panic!("expected edit, got {:?}", calls[0]);
        };
        assert!(text.contains("*Bread*: 1 pcs"));
        assert!(keyboard.is_some());
        assert!(matches!(
            &calls[1],
            OutboundCall::Ack { notice: Some(n), .. } if n == "✅ Updated!"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_show_history_callback_sends_new_message() -> Result<()> {
        let d = dispatcher().await?;
        let bread = create_product(&d.db, "Bread").await?;
        record_sale(&d.db, bread.id, OPERATOR, None, today()).await?;

        d.handle_event(callback("show-history")).await;

        let calls = d.transport.take_calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], OutboundCall::Ack { notice: None, .. }));
        assert!(matches!(
            &calls[1],
            OutboundCall::Send { text, .. } if text.contains("Sales history")
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_flow_confirms_then_deactivates() -> Result<()> {
        let d = dispatcher().await?;
        let bread = create_product(&d.db, "Bread").await?;

        d.handle_event(callback(&CallbackAction::Delete(bread.id).encode()))
            .await;
        let calls = d.transport.take_calls();
        let OutboundCall::Edit { text, keyboard: Some(keyboard), .. } = &calls[0] else {
            panic!("expected confirmation edit, got {:?}", calls[0]);
        };
        assert!(text.contains("Confirm deletion"));
        assert_eq!(
            keyboard.rows[0][0].action,
            CallbackAction::ConfirmDelete(bread.id)
        );

        d.handle_event(callback(&CallbackAction::ConfirmDelete(bread.id).encode()))
            .await;
        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[0],
            OutboundCall::Edit { text, .. } if text.contains("Product deleted")
        ));

        // Gone from the menus afterwards
        d.handle_event(message("/products")).await;
        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[0],
            OutboundCall::Send { text, .. } if text == render::NO_PRODUCTS_TEXT
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_delete_on_vanished_product_is_silent() -> Result<()> {
        let d = dispatcher().await?;

        d.handle_event(callback("confirm-delete:999")).await;

        let calls = d.transport.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            OutboundCall::Ack { notice: None, alert: false, .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_callback_edits_to_cancelled() -> Result<()> {
        let d = dispatcher().await?;

        d.handle_event(callback("cancel")).await;

        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[0],
            OutboundCall::Edit { text, keyboard: None, .. } if text == render::CANCELLED_TEXT
        ));
        assert!(matches!(
            &calls[1],
            OutboundCall::Ack { notice: Some(n), .. } if n == render::CANCELLED_NOTICE
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_callback_is_acked_and_ignored() -> Result<()> {
        let d = dispatcher().await?;

        d.handle_event(callback("explode:1")).await;

        let calls = d.transport.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], OutboundCall::Ack { notice: None, .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_generic_notice_and_loop_survives() -> Result<()> {
        // A connection with no tables makes every store call fail
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        let d = Dispatcher::new(db, SessionStore::new(), RecordingTransport::default());

        d.handle_event(message("/products")).await;
        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[0],
            OutboundCall::Send { text, .. } if text == render::FAILURE_TEXT
        ));

        // The dispatcher is still alive and handling events
        d.handle_event(callback("sell:1")).await;
        let calls = d.transport.take_calls();
        assert!(matches!(
            &calls[0],
            OutboundCall::Ack { notice: Some(n), .. } if n == render::FAILURE_TEXT
        ));

        Ok(())
    }

    #[test]
    fn test_history_start_is_seven_days_back() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(
            history_start(today),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
    }
}
