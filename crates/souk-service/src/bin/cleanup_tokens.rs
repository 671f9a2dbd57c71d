//! # Expired Token Sweep
//!
//! Deletes password reset tokens past their validity window.
//!
//! Redemption already deletes stale tokens lazily; this job exists for the
//! tokens nobody ever clicks, so the table doesn't accumulate dead rows.
//!
//! ## Usage
//! ```bash
//! # Run once (schedule via cron or a systemd timer)
//! cargo run -p souk-service --bin cleanup-tokens
//!
//! # Configuration via environment
//! SOUK_DB_PATH=./data/souk.db SOUK_RESET_TOKEN_TTL_SECS=3600 cleanup-tokens
//! ```

use chrono::{Duration, Utc};
use tracing::info;

use souk_db::{Database, DbConfig};
use souk_service::ServiceConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServiceConfig::load()?;

    info!(
        db = %config.database_path,
        ttl_secs = config.reset_token_ttl_secs,
        "Starting expired token sweep"
    );

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let cutoff = Utc::now() - Duration::seconds(config.reset_token_ttl_secs);
    let swept = db.reset_tokens().delete_created_before(cutoff).await?;
    let remaining = db.reset_tokens().count().await?;

    info!(swept, remaining, "Sweep complete");

    db.close().await;
    Ok(())
}
