//! Postgres pool and schema bootstrap.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;

const MAX_CONNECTIONS: u32 = 10;

/// Statements run by [`ensure_schema`], in order. Each is idempotent.
const SCHEMA: &[&str] = &[
    r#"CREATE EXTENSION IF NOT EXISTS "pgcrypto""#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(255) NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        customer_id UUID NOT NULL,
        amount BIGINT NOT NULL CHECK (amount >= 0),
        status VARCHAR(255) NOT NULL,
        date DATE NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS invoices_date_idx ON invoices (date DESC)",
];

/// Open a connection pool.
#[instrument(skip(database_url), err)]
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;
    tracing::info!(max_connections = MAX_CONNECTIONS, "connected to postgres");
    Ok(pool)
}

/// Create the `users` and `invoices` tables when they do not exist yet.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
