//! Intake pipeline Telegram bots binary.
//!
//! Start the intake bot with:
//! ```bash
//! DATABASE_URL=postgres://... TELEGRAM_INTAKE_BOT_TOKEN=xxx \
//!     cargo run -p intake-telegram -- intake
//! ```
//! and the admin bot with `-- admin`.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use intake_core::{Catalog, OrderService};
use intake_notify::{EmailNotifier, NotifierSet, SheetsNotifier};
use intake_parser::{OpenRouterParser, OrderParser};
use intake_store::PgOrderStore;
use intake_telegram::bot::{run_admin_bot, run_intake_bot};
use intake_telegram::{AppContext, BotError, Config};
use teloxide::Bot;
use tracing_subscriber::EnvFilter;

/// Which bot a process runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Role {
    /// Customer-facing bot that turns free text into orders.
    Intake,
    /// Operator bot: list orders, change statuses, query metrics.
    Admin,
}

/// Telegram bots for the order intake pipeline
#[derive(Parser, Debug)]
#[command(name = "intake-telegram")]
#[command(about = "Telegram bots for the order intake pipeline")]
struct Args {
    /// Which bot to run
    #[arg(value_enum)]
    role: Role,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_notifiers(config: &Config) -> Result<NotifierSet, BotError> {
    let mut notifiers = NotifierSet::new();

    if let Some(sheets) = &config.sheets {
        notifiers.push(Box::new(SheetsNotifier::new(
            sheets.spreadsheet_id.clone(),
            sheets.api_token.clone(),
        )));
    }

    if let Some(smtp) = &config.smtp {
        notifiers.push(Box::new(EmailNotifier::new(
            &smtp.host,
            smtp.port,
            &smtp.user,
            &smtp.password,
            &smtp.notify_to,
        )?));
    }

    if notifiers.is_empty() {
        tracing::warn!("No notifier sinks configured; orders will only live in the database");
    }

    Ok(notifiers)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let _ = dotenvy::dotenv();

    let filter = match args.verbose {
        0 => "intake_telegram=info,intake_core=info,teloxide=warn",
        1 => "intake_telegram=debug,intake_core=debug,teloxide=info",
        2 => "intake_telegram=trace,intake_core=trace,teloxide=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store = PgOrderStore::connect(&config.database_url).await?;
    store.init_schema().await?;
    let service = OrderService::new(store);

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)?,
        None => {
            tracing::warn!("CATALOG_PATH not set; using the built-in demo catalog");
            Catalog::demo()
        }
    };
    tracing::info!(products = catalog.len(), "Catalog loaded");

    // Only the intake role talks to the AI parser.
    let parser: Option<Box<dyn OrderParser>> = match args.role {
        Role::Intake => Some(Box::new(OpenRouterParser::from_env()?)),
        Role::Admin => None,
    };

    let notifiers = build_notifiers(&config)?;

    let ctx = Arc::new(AppContext::new(
        service,
        parser,
        notifiers,
        catalog,
        config.admin_chat_ids.clone(),
    ));

    match args.role {
        Role::Intake => {
            let token = config
                .intake_bot_token
                .clone()
                .ok_or(BotError::MissingEnv("TELEGRAM_INTAKE_BOT_TOKEN"))?;
            run_intake_bot(Bot::new(token), ctx).await;
        }
        Role::Admin => {
            let token = config
                .admin_bot_token
                .clone()
                .ok_or(BotError::MissingEnv("TELEGRAM_ADMIN_BOT_TOKEN"))?;
            run_admin_bot(Bot::new(token), ctx).await;
        }
    }

    Ok(())
}
