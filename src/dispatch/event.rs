//! Inbound event shapes and the wire formats for commands and callbacks.
//!
//! The transport adapter translates platform updates into [`Inbound`] values;
//! nothing here depends on the chat platform. Callback payloads are the
//! `kind:id` strings embedded in inline-keyboard buttons, so parse/encode
//! must stay in sync with each other (round-tripping is tested below).

/// An event received from the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A plain chat message (command text or free text)
    Message {
        /// Operator who sent the message
        operator_id: i64,
        /// Chat to respond into
        chat_id: i64,
        /// Operator display name, when the platform provides one
        operator_name: Option<String>,
        /// Raw message text
        text: String,
    },
    /// An inline-keyboard button press
    Callback {
        /// Operator who pressed the button
        operator_id: i64,
        /// Chat containing the message the button belongs to
        chat_id: i64,
        /// Message the button belongs to (for in-place edits)
        message_id: i32,
        /// Platform token used to acknowledge the press
        callback_id: String,
        /// Operator display name, when the platform provides one
        operator_name: Option<String>,
        /// Raw callback payload
        payload: String,
    },
}

/// A chat command, dispatched by literal command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` - welcome message
    Start,
    /// `/help` - command guide
    Help,
    /// `/add` - begin the add-product flow
    AddProduct,
    /// `/products` - list active products
    ListProducts,
    /// `/sell` - open the +1/-1 sell menu
    SellMenu,
    /// `/summary` - today's rollup
    DailySummary,
    /// `/history` - last 7 days of rollups
    WeeklyHistory,
    /// `/delete` - open the delete menu
    DeleteMenu,
}

impl Command {
    /// Parses a command from message text. Returns `None` for free text and
    /// for unrecognized commands (which the dispatcher ignores, like the
    /// platform does for unregistered commands).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.trim().split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        // Group chats address commands as /name@BotName
        let name = name.split('@').next().unwrap_or(name);

        match name {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "add" => Some(Self::AddProduct),
            "products" => Some(Self::ListProducts),
            "sell" => Some(Self::SellMenu),
            "summary" => Some(Self::DailySummary),
            "history" => Some(Self::WeeklyHistory),
            "delete" => Some(Self::DeleteMenu),
            _ => None,
        }
    }
}

/// A structured callback payload, dispatched by payload key plus an
/// embedded product id where applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// `sell:<id>` - record one sale (+1)
    Sell(i64),
    /// `remove:<id>` - retract one sale (-1)
    Remove(i64),
    /// `delete:<id>` - ask for delete confirmation
    Delete(i64),
    /// `confirm-delete:<id>` - soft-delete the product
    ConfirmDelete(i64),
    /// `refresh-summary` - re-render today's rollup in place
    RefreshSummary,
    /// `show-history` - send the weekly history
    ShowHistory,
    /// `cancel` - abandon the current menu
    Cancel,
}

impl CallbackAction {
    /// Encodes the action as a callback payload string.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Sell(id) => format!("sell:{id}"),
            Self::Remove(id) => format!("remove:{id}"),
            Self::Delete(id) => format!("delete:{id}"),
            Self::ConfirmDelete(id) => format!("confirm-delete:{id}"),
            Self::RefreshSummary => "refresh-summary".to_string(),
            Self::ShowHistory => "show-history".to_string(),
            Self::Cancel => "cancel".to_string(),
        }
    }

    /// Parses a callback payload string. Returns `None` for unknown keys or
    /// malformed ids; the dispatcher acknowledges and ignores those.
    #[must_use]
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "refresh-summary" => return Some(Self::RefreshSummary),
            "show-history" => return Some(Self::ShowHistory),
            "cancel" => return Some(Self::Cancel),
            _ => {}
        }

        let (kind, id) = payload.split_once(':')?;
        let id: i64 = id.parse().ok()?;
        match kind {
            "sell" => Some(Self::Sell(id)),
            "remove" => Some(Self::Remove(id)),
            "delete" => Some(Self::Delete(id)),
            "confirm-delete" => Some(Self::ConfirmDelete(id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/sell"), Some(Command::SellMenu));
        assert_eq!(Command::parse("  /summary  "), Some(Command::DailySummary));
        assert_eq!(Command::parse("/add@TallyBot"), Some(Command::AddProduct));
        assert_eq!(Command::parse("/history extra words"), Some(Command::WeeklyHistory));
    }

    #[test]
    fn test_command_parse_rejects_free_text_and_unknown() {
        assert_eq!(Command::parse("Bread"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("/frobnicate"), None);
        assert_eq!(Command::parse("sell"), None);
    }

    #[test]
    fn test_callback_round_trip() {
        let actions = [
            CallbackAction::Sell(7),
            CallbackAction::Remove(7),
            CallbackAction::Delete(12),
            CallbackAction::ConfirmDelete(12),
            CallbackAction::RefreshSummary,
            CallbackAction::ShowHistory,
            CallbackAction::Cancel,
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.encode()), Some(action));
        }
    }

    #[test]
    fn test_callback_parse_rejects_malformed() {
        assert_eq!(CallbackAction::parse("sell:"), None);
        assert_eq!(CallbackAction::parse("sell:abc"), None);
        assert_eq!(CallbackAction::parse("explode:1"), None);
        assert_eq!(CallbackAction::parse("refresh-summary:1"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }
}
