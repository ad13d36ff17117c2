//! Dispatcher wiring for both bots.

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use tracing::info;

use crate::commands::{AdminCommand, IntakeCommand};
use crate::context::AppContext;
use crate::handlers::{handle_admin_command, handle_intake_command, handle_intake_message};

/// Runs the admin bot until shutdown.
pub async fn run_admin_bot(bot: Bot, ctx: Arc<AppContext>) {
    info!("Starting admin bot in polling mode...");

    let handler = dptree::entry().branch(
        Update::filter_message()
            .filter_command::<AdminCommand>()
            .endpoint(move |bot: Bot, msg: Message, cmd: AdminCommand, ctx: Arc<AppContext>| {
                async move { handle_admin_command(bot, msg, cmd, ctx).await }
            }),
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

/// Runs the intake bot until shutdown.
pub async fn run_intake_bot(bot: Bot, ctx: Arc<AppContext>) {
    info!("Starting intake bot in polling mode...");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<IntakeCommand>()
                .endpoint(move |bot: Bot, msg: Message, cmd: IntakeCommand| {
                    async move { handle_intake_command(bot, msg, cmd).await }
                }),
        )
        .branch(Update::filter_message().endpoint(
            move |bot: Bot, msg: Message, ctx: Arc<AppContext>| {
                async move { handle_intake_message(bot, msg, ctx).await }
            },
        ));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
