//! Bot commands and operator argument parsing.

use chrono::NaiveDate;
use intake_core::CoreError;
use teloxide::utils::command::BotCommands;

/// Commands of the admin bot.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum AdminCommand {
    #[command(description = "Start the bot and get help")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "List recent orders: /orders [limit]")]
    Orders(String),

    #[command(description = "Show one order: /order <id>")]
    Order(String),

    #[command(description = "Change order status: /set_status <id> <status> [YYYY-MM-DD]")]
    SetStatus(String),

    #[command(description = "Sales and delivery metrics: /stats [days]")]
    Stats(String),
}

/// Commands of the intake bot; everything else is treated as an order.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum IntakeCommand {
    #[command(description = "Start the bot and get help")]
    Start,

    #[command(description = "Show help message")]
    Help,
}

/// Parsed `/set_status` arguments.
#[derive(Debug, PartialEq)]
pub struct SetStatusArgs {
    pub order_id: i64,
    pub status: String,
    pub expected_delivery_date: Option<NaiveDate>,
}

/// Parses `/set_status <id> <status> [YYYY-MM-DD]`.
pub fn parse_set_status_args(args: &str) -> Result<SetStatusArgs, CoreError> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(CoreError::Validation(
            "usage: /set_status <id> <status> [YYYY-MM-DD]".to_string(),
        ));
    }

    let order_id = parts[0]
        .parse::<i64>()
        .map_err(|_| CoreError::Validation("order id must be a number".to_string()))?;

    let expected_delivery_date = match parts.get(2) {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CoreError::Validation("date must be YYYY-MM-DD (e.g. 2025-11-18)".to_string())
            })?,
        ),
        None => None,
    };

    Ok(SetStatusArgs {
        order_id,
        status: parts[1].to_string(),
        expected_delivery_date,
    })
}

/// Parses `/order <id>`.
pub fn parse_order_id(args: &str) -> Result<i64, CoreError> {
    let arg = args.trim();
    if arg.is_empty() {
        return Err(CoreError::Validation("usage: /order <id>".to_string()));
    }
    arg.parse::<i64>()
        .map_err(|_| CoreError::Validation("order id must be a number".to_string()))
}

/// Parses an optional positive count argument, falling back to `default`
/// on anything unusable (matching the tolerant `/orders` and `/stats`
/// behavior operators expect).
pub fn parse_count(args: &str, default: i64) -> i64 {
    match args.trim().parse::<i64>() {
        Ok(n) if n > 0 => n,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_status_minimal() {
        let parsed = parse_set_status_args("123 shipped").unwrap();
        assert_eq!(
            parsed,
            SetStatusArgs {
                order_id: 123,
                status: "shipped".to_string(),
                expected_delivery_date: None,
            }
        );
    }

    #[test]
    fn test_set_status_with_date() {
        let parsed = parse_set_status_args("123 shipped 2025-11-20").unwrap();
        assert_eq!(
            parsed.expected_delivery_date,
            NaiveDate::from_ymd_opt(2025, 11, 20)
        );
    }

    #[test]
    fn test_set_status_rejects_bad_id_and_date() {
        assert!(matches!(
            parse_set_status_args("abc shipped"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            parse_set_status_args("123 shipped 20-11-2025"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            parse_set_status_args("123"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_set_status_passes_unknown_labels_through() {
        // Unknown labels are a lifecycle decision, not an input error.
        let parsed = parse_set_status_args("5 on_hold").unwrap();
        assert_eq!(parsed.status, "on_hold");
    }

    #[test]
    fn test_parse_order_id() {
        assert_eq!(parse_order_id(" 42 ").unwrap(), 42);
        assert!(parse_order_id("").is_err());
        assert!(parse_order_id("x").is_err());
    }

    #[test]
    fn test_parse_count_falls_back() {
        assert_eq!(parse_count("5", 10), 5);
        assert_eq!(parse_count("", 10), 10);
        assert_eq!(parse_count("junk", 10), 10);
        assert_eq!(parse_count("-3", 10), 10);
    }
}
