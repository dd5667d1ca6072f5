//! Evergreen Orders - storefront ordering service.

use anyhow::Result;
use evergreen_orders::{notify::Notifier, router, AppState};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&std::env::var("DATABASE_URL")?)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let notifier = Notifier::new(std::env::var("NOTIFY_URL").ok());
    if std::env::var("NOTIFY_URL").is_err() {
        tracing::warn!("NOTIFY_URL not set; order notifications are disabled");
    }

    let app = router(AppState { db, notifier });
    let port = std::env::var("PORT").unwrap_or_else(|_| "8083".to_string());
    tracing::info!("evergreen-orders listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
