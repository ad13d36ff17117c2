//! Environment-driven configuration.
//!
//! Everything comes from the environment (optionally seeded from a `.env`
//! file by the binary); the integrations are optional blocks - an unset
//! spreadsheet or SMTP section simply disables that sink.

use crate::error::{BotError, Result};

/// Spreadsheet mirror settings.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_token: String,
}

/// SMTP notification settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Manager address that receives new-order notifications.
    pub notify_to: String,
}

/// Full configuration for one bot process.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub intake_bot_token: Option<String>,
    pub admin_bot_token: Option<String>,
    /// Chat ids allowed to use the admin bot; empty allows everyone.
    pub admin_chat_ids: Vec<i64>,
    /// Path to a JSON product catalog; the demo catalog is used otherwise.
    pub catalog_path: Option<String>,
    pub sheets: Option<SheetsConfig>,
    pub smtp: Option<SmtpConfig>,
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Parses a comma-separated chat id allow-list.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| BotError::Config(format!("ADMIN_CHAT_IDS entry {part:?} is not a chat id")))
        })
        .collect()
}

impl Config {
    /// Reads configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| BotError::MissingEnv("DATABASE_URL"))?;

        let admin_chat_ids = match optional("ADMIN_CHAT_IDS") {
            Some(raw) => parse_admin_ids(&raw)?,
            None => Vec::new(),
        };

        let sheets = match (optional("SHEETS_SPREADSHEET_ID"), optional("SHEETS_API_TOKEN")) {
            (Some(spreadsheet_id), Some(api_token)) => {
                Some(SheetsConfig { spreadsheet_id, api_token })
            }
            _ => None,
        };

        let smtp = match optional("SMTP_HOST") {
            Some(host) => {
                let port = match optional("SMTP_PORT") {
                    Some(raw) => raw
                        .parse::<u16>()
                        .map_err(|_| BotError::Config(format!("SMTP_PORT {raw:?} is not a port")))?,
                    None => 587,
                };
                Some(SmtpConfig {
                    host,
                    port,
                    user: std::env::var("SMTP_USER").map_err(|_| BotError::MissingEnv("SMTP_USER"))?,
                    password: std::env::var("SMTP_PASSWORD")
                        .map_err(|_| BotError::MissingEnv("SMTP_PASSWORD"))?,
                    notify_to: std::env::var("ORDER_NOTIFICATION_EMAIL")
                        .map_err(|_| BotError::MissingEnv("ORDER_NOTIFICATION_EMAIL"))?,
                })
            }
            None => None,
        };

        Ok(Self {
            database_url,
            intake_bot_token: optional("TELEGRAM_INTAKE_BOT_TOKEN"),
            admin_bot_token: optional("TELEGRAM_ADMIN_BOT_TOKEN"),
            admin_chat_ids,
            catalog_path: optional("CATALOG_PATH"),
            sheets,
            smtp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids() {
        assert_eq!(parse_admin_ids("123, 456,789").unwrap(), vec![123, 456, 789]);
        assert_eq!(parse_admin_ids("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_admin_ids(" , ").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_parse_admin_ids_rejects_garbage() {
        assert!(parse_admin_ids("123,abc").is_err());
    }
}
