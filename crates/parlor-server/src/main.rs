use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing_subscriber::EnvFilter;

use parlor::{ChatController, ConversationService};
use parlor_integration_telegram::{run_polling, TelegramConfig, TelegramMessenger};

mod adapters;
mod config;
mod health;

use adapters::{LlamaCppGateway, PgUserRepository};
use config::AppConfig;

/// Type aliases for application services with concrete adapter implementations
pub type AppConversationService = ConversationService<PgUserRepository, LlamaCppGateway>;
pub type AppChatController = ChatController<AppConversationService, TelegramMessenger>;

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment is authoritative
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.telegram_debug);

    tracing::info!("Parlor relay initializing...");

    let connect_options = PgConnectOptions::from_str(&config.database_url)
        .context("Invalid DATABASE_URL")?
        .database(&config.database_name);
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(database = %config.database_name, "Database ready");

    let repo = Arc::new(PgUserRepository::new(pool));
    let gateway = Arc::new(
        LlamaCppGateway::new(&config.llama_base_url, config.llama_timeout)
            .context("Failed to build model HTTP client")?,
    );
    let conversation: Arc<AppConversationService> = Arc::new(ConversationService::new(
        repo,
        gateway,
        config.chat_history_limit,
    ));

    tracing::info!(
        base_url = %config.llama_base_url,
        timeout_secs = config.llama_timeout.as_secs(),
        history_limit = config.chat_history_limit,
        "Model gateway configured"
    );

    let telegram = TelegramConfig::new(&config.telegram_bot_token).with_debug(config.telegram_debug);
    let bot = telegram.bot();
    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let controller: Arc<AppChatController> = Arc::new(ChatController::new(conversation, messenger));

    if let Some(addr) = config.health_addr {
        tokio::spawn(async move {
            if let Err(e) = health::serve(addr).await {
                tracing::error!(addr = %addr, error = %e, "Health endpoint stopped");
            }
        });
    }

    tracing::info!("Parlor relay ready");
    run_polling(bot, telegram, controller).await;

    Ok(())
}
