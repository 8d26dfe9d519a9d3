//! Environment-based application settings.
//!
//! All runtime configuration comes from environment variables (optionally via
//! a `.env` file loaded in `main`). There is no config file: the bot only
//! needs a transport token, and the database URL is resolved separately by
//! [`crate::config::database`].

use crate::errors::{Error, Result};

/// Environment variable holding the Telegram bot API token.
pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Application settings resolved at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Telegram bot API token
    pub bot_token: String,
}

impl Settings {
    /// Loads settings from the environment.
    ///
    /// # Errors
    /// Returns a `Config` error if the bot token is missing or blank.
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var(BOT_TOKEN_VAR).map_err(|_| Error::Config {
            message: format!("{BOT_TOKEN_VAR} is not set"),
        })?;

        if bot_token.trim().is_empty() {
            return Err(Error::Config {
                message: format!("{BOT_TOKEN_VAR} is empty"),
            });
        }

        Ok(Self { bot_token })
    }
}
