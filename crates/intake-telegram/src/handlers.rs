//! Command and message handlers for both bots.
//!
//! Every core error is recovered here and turned into a chat reply; the
//! notifier sinks run best-effort after the mutation has committed and can
//! never undo it.

use std::sync::Arc;

use chrono::{NaiveTime, TimeZone, Utc};
use intake_core::{build_order, CoreError};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use crate::commands::{
    parse_count, parse_order_id, parse_set_status_args, AdminCommand, IntakeCommand,
};
use crate::context::AppContext;
use crate::format::{format_intake_reply, format_order_full, format_order_short, format_stats};

const DEFAULT_ORDERS_LIMIT: i64 = 10;
const DEFAULT_STATS_DAYS: i64 = 30;

// ==========================
//  Admin bot
// ==========================

/// Dispatches admin commands, rejecting chats outside the allow-list.
pub async fn handle_admin_command(
    bot: Bot,
    msg: Message,
    cmd: AdminCommand,
    ctx: Arc<AppContext>,
) -> ResponseResult<()> {
    if !ctx.is_admin(msg.chat.id.0) {
        bot.send_message(msg.chat.id, "You are not allowed to use this bot.")
            .await?;
        warn!(chat_id = %msg.chat.id, "Rejected non-admin chat");
        return Ok(());
    }

    match cmd {
        AdminCommand::Start | AdminCommand::Help => handle_admin_help(bot, msg).await,
        AdminCommand::Orders(args) => handle_orders(bot, msg, ctx, args).await,
        AdminCommand::Order(args) => handle_order(bot, msg, ctx, args).await,
        AdminCommand::SetStatus(args) => handle_set_status(bot, msg, ctx, args).await,
        AdminCommand::Stats(args) => handle_stats(bot, msg, ctx, args).await,
    }
}

async fn handle_admin_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    let text = format!(
        "Order admin bot\n\n{}\n\nKnown statuses: {}",
        AdminCommand::descriptions(),
        intake_models::OrderStatus::KNOWN_LABELS.join(", ")
    );
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Handles `/orders [limit]`.
async fn handle_orders(
    bot: Bot,
    msg: Message,
    ctx: Arc<AppContext>,
    args: String,
) -> ResponseResult<()> {
    let limit = parse_count(&args, DEFAULT_ORDERS_LIMIT) as usize;

    match ctx.service.list_recent(limit).await {
        Ok(orders) if orders.is_empty() => {
            bot.send_message(msg.chat.id, "No orders yet.").await?;
        }
        Ok(orders) => {
            let mut lines = vec!["Recent orders:".to_string()];
            lines.extend(orders.iter().map(format_order_short));
            bot.send_message(msg.chat.id, lines.join("\n")).await?;
        }
        Err(e) => {
            error!(error = %e, "Failed to list orders");
            bot.send_message(msg.chat.id, format!("Error: {e}")).await?;
        }
    }
    Ok(())
}

/// Handles `/order <id>`.
async fn handle_order(
    bot: Bot,
    msg: Message,
    ctx: Arc<AppContext>,
    args: String,
) -> ResponseResult<()> {
    let order_id = match parse_order_id(&args) {
        Ok(id) => id,
        Err(e) => {
            bot.send_message(msg.chat.id, e.to_string()).await?;
            return Ok(());
        }
    };

    match ctx.service.get_order(order_id).await {
        Ok(order) => {
            bot.send_message(msg.chat.id, format_order_full(&order)).await?;
        }
        Err(CoreError::NotFound(_)) => {
            bot.send_message(msg.chat.id, format!("Order #{order_id} not found."))
                .await?;
        }
        Err(e) => {
            error!(order_id, error = %e, "Failed to fetch order");
            bot.send_message(msg.chat.id, format!("Error: {e}")).await?;
        }
    }
    Ok(())
}

/// Handles `/set_status <id> <status> [YYYY-MM-DD]`.
async fn handle_set_status(
    bot: Bot,
    msg: Message,
    ctx: Arc<AppContext>,
    args: String,
) -> ResponseResult<()> {
    let parsed = match parse_set_status_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            bot.send_message(msg.chat.id, e.to_string()).await?;
            return Ok(());
        }
    };

    let expected = parsed
        .expected_delivery_date
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));

    let comment = match msg.from.as_ref().and_then(|user| user.username.as_deref()) {
        Some(username) => format!("Changed via admin bot by @{username}"),
        None => "Changed via admin bot".to_string(),
    };

    match ctx
        .service
        .set_status(parsed.order_id, &parsed.status, expected, Some(comment))
        .await
    {
        Ok(order) => {
            // The mutation is committed; sinks run best-effort after it.
            ctx.notifiers.notify_updated(&order).await;
            bot.send_message(
                msg.chat.id,
                format!("Order #{} status set to '{}'.", order.id, order.status),
            )
            .await?;
        }
        Err(CoreError::NotFound(_)) => {
            bot.send_message(msg.chat.id, format!("Order #{} not found.", parsed.order_id))
                .await?;
        }
        Err(e) => {
            error!(order_id = parsed.order_id, error = %e, "Status change failed");
            bot.send_message(msg.chat.id, format!("Could not update the order: {e}"))
                .await?;
        }
    }
    Ok(())
}

/// Handles `/stats [days]`.
async fn handle_stats(
    bot: Bot,
    msg: Message,
    ctx: Arc<AppContext>,
    args: String,
) -> ResponseResult<()> {
    let days = parse_count(&args, DEFAULT_STATS_DAYS);

    let sales = ctx.service.sales_metrics(days).await;
    let delivery = ctx.service.delivery_metrics(days).await;

    match (sales, delivery) {
        (Ok(sales), Ok(delivery)) => {
            bot.send_message(msg.chat.id, format_stats(days, &sales, &delivery))
                .await?;
        }
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to compute metrics");
            bot.send_message(msg.chat.id, format!("Error: {e}")).await?;
        }
    }
    Ok(())
}

// ==========================
//  Intake bot
// ==========================

/// Dispatches intake commands.
pub async fn handle_intake_command(
    bot: Bot,
    msg: Message,
    cmd: IntakeCommand,
) -> ResponseResult<()> {
    match cmd {
        IntakeCommand::Start | IntakeCommand::Help => {
            let text = "Hi! Write what you want to order, in free form. For example:\n\n\
                \"I'd like iPhone 15 - 2 pcs and AirPods Pro - 1 pc. \
                Deliver to Lenina 15, apt 44. Email: ivanov@mail.ru, phone +79161234567\"";
            bot.send_message(msg.chat.id, text).await?;
            Ok(())
        }
    }
}

/// Handles a free-text order message: parse, build, persist, notify, reply.
pub async fn handle_intake_message(
    bot: Bot,
    msg: Message,
    ctx: Arc<AppContext>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "I can only read text. Please send your order as text.")
            .await?;
        return Ok(());
    };

    let text = text.trim();
    if text.is_empty() {
        bot.send_message(msg.chat.id, "The message is empty. Please write what you want to order.")
            .await?;
        return Ok(());
    }

    let Some(parser) = ctx.parser.as_ref() else {
        error!("Intake bot started without a parser");
        bot.send_message(msg.chat.id, "Order intake is not available right now.")
            .await?;
        return Ok(());
    };

    bot.send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing)
        .await?;

    // A parse failure is a hard stop: no order is created.
    let parsed = match parser.parse(text).await {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(chat_id = %msg.chat.id, error = %e, "Order text could not be parsed");
            bot.send_message(
                msg.chat.id,
                "Could not process the order. Please check the items, address, \
                 email and phone, and try again.",
            )
            .await?;
            return Ok(());
        }
    };

    let draft = build_order(text, &parsed, &ctx.catalog);

    let order = match ctx.service.create_order(&draft).await {
        Ok(order) => order,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Order creation failed");
            bot.send_message(
                msg.chat.id,
                "Something went wrong while saving the order. Please try again \
                 or contact a manager.",
            )
            .await?;
            return Ok(());
        }
    };

    info!(chat_id = %msg.chat.id, order_id = order.id, "Order accepted from chat");

    // Mirror and email run after the commit and never affect the reply.
    ctx.notifiers.notify_created(&order).await;

    bot.send_message(msg.chat.id, format_intake_reply(&order, &draft))
        .await?;
    Ok(())
}
