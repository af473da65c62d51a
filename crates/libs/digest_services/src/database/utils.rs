use app_state::constants;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

/// Get a connection pool to the host database.
/// # Errors
///
/// * `PgPool::connect` can return an error if the database connection fails.
pub async fn get_db_pool(database_url: &str) -> color_eyre::Result<Pool<Postgres>> {
    let db_constants = &constants().database;
    info!("Connecting to database.");
    let pool = PgPoolOptions::new()
        .max_connections(db_constants.max_connections)
        .min_connections(db_constants.min_connection)
        .max_lifetime(Duration::from_secs(db_constants.max_lifetime))
        .idle_timeout(Duration::from_secs(db_constants.idle_timeout))
        .acquire_timeout(Duration::from_secs(db_constants.acquire_timeout))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;
    Ok(pool)
}
