//! services/api/src/bin/api.rs

use academy_core::domain::Platform;
use academy_core::ports::SocialPublisher;
use api_lib::{
    adapters::{db::PgStore, social::{StubPublisher, TelegramPublisher}},
    config::Config,
    error::ApiError,
    web::{router, state::AppState},
};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderName, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgStore::new(db_pool));
    info!("Running database migrations...");
    store.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Social Publishers ---
    let mut publishers: Vec<Arc<dyn SocialPublisher>> = Vec::new();
    match &config.telegram {
        Some(telegram) => {
            info!("Telegram publishing enabled for chat {}", telegram.chat_id);
            publishers.push(Arc::new(TelegramPublisher::new(
                reqwest::Client::new(),
                telegram.clone(),
            )));
        }
        None => info!("Telegram publishing disabled (TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set)"),
    }
    for platform in [Platform::Facebook, Platform::Instagram, Platform::LinkedIn, Platform::X] {
        publishers.push(Arc::new(StubPublisher::new(platform)));
    }

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState { store, publishers });

    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS_ORIGIN '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-user-name"),
        ]);

    // --- 5. Create the Web Router ---
    let app = router(app_state).layer(cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
