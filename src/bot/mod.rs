//! Telegram adapter - the thin transport layer around the dispatcher.
//!
//! This module owns every teloxide type in the crate: it translates platform
//! updates into [`Inbound`] events, hands them to the [`Dispatcher`], and
//! implements the outbound [`Transport`] trait over a [`Bot`]. The polling
//! loop here is one delivery mode; a webhook listener would feed the same
//! dispatcher with the same events.

use crate::{
    config::settings::Settings,
    core::session::SessionStore,
    dispatch::{Dispatcher, Inbound, Keyboard, Transport},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use teloxide::{
    payloads::{AnswerCallbackQuerySetters, EditMessageTextSetters, SendMessageSetters},
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode},
};
use tracing::info;

/// [`Transport`] implementation over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Wraps a bot handle.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait::async_trait]
impl Transport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()> {
        let request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Markdown);
        match keyboard {
            Some(keyboard) => request.reply_markup(to_markup(keyboard)).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()> {
        let request = self
            .bot
            .edit_message_text(ChatId(chat_id), teloxide::types::MessageId(message_id), text)
            .parse_mode(ParseMode::Markdown);
        match keyboard {
            Some(keyboard) => request.reply_markup(to_markup(keyboard)).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        notice: Option<&str>,
        alert: bool,
    ) -> Result<()> {
        let mut request = self.bot.answer_callback_query(callback_id.to_string());
        if let Some(notice) = notice {
            request = request.text(notice);
        }
        if alert {
            request = request.show_alert(true);
        }
        request.await?;
        Ok(())
    }
}

/// Renders a transport-agnostic keyboard as Telegram inline buttons.
fn to_markup(keyboard: Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.into_iter().map(|row| {
        row.into_iter()
            .map(|button| InlineKeyboardButton::callback(button.label, button.action.encode()))
            .collect::<Vec<_>>()
    }))
}

/// Starts the bot with long polling and blocks until shutdown.
///
/// # Errors
/// Returns an error if the bot cannot be constructed; delivery errors during
/// operation are handled per event by the dispatcher.
pub async fn run_bot(settings: &Settings, db: DatabaseConnection) -> Result<()> {
    let bot = Bot::new(&settings.bot_token);
    let dispatcher = Arc::new(Dispatcher::new(
        db,
        SessionStore::new(),
        TelegramTransport::new(bot.clone()),
    ));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    info!("Starting Telegram polling loop");
    teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn on_message(
    msg: Message,
    dispatcher: Arc<Dispatcher<TelegramTransport>>,
) -> ResponseResult<()> {
    let (Some(user), Some(text)) = (msg.from(), msg.text()) else {
        // Joins, stickers, channel posts - nothing for us
        return Ok(());
    };

    let operator_name = user
        .username
        .clone()
        .unwrap_or_else(|| user.first_name.clone());

    dispatcher
        .handle_event(Inbound::Message {
            operator_id: i64::try_from(user.id.0).unwrap_or_default(),
            chat_id: msg.chat.id.0,
            operator_name: Some(operator_name),
            text: text.to_string(),
        })
        .await;

    Ok(())
}

async fn on_callback(
    query: CallbackQuery,
    dispatcher: Arc<Dispatcher<TelegramTransport>>,
) -> ResponseResult<()> {
    let (Some(payload), Some(message)) = (query.data.clone(), query.message.as_ref()) else {
        return Ok(());
    };

    let operator_name = query
        .from
        .username
        .clone()
        .unwrap_or_else(|| query.from.first_name.clone());

    dispatcher
        .handle_event(Inbound::Callback {
            operator_id: i64::try_from(query.from.id.0).unwrap_or_default(),
            chat_id: message.chat.id.0,
            message_id: message.id.0,
            callback_id: query.id.clone(),
            operator_name: Some(operator_name),
            payload,
        })
        .await;

    Ok(())
}
