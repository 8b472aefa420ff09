//! User lookup for the credentials provider.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use invoicedesk_auth::{PasswordError, UserDirectory, UserRecord, hash_password};
use invoicedesk_core::UserId;

/// Users keyed by email, for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with a freshly hashed password.
    pub fn with_user(self, name: &str, email: &str, password: &str) -> Result<Self, PasswordError> {
        self.add(UserRecord {
            id: UserId::new(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        });
        Ok(self)
    }

    pub fn add(&self, user: UserRecord) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(user.email.clone(), user);
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow::anyhow!("user map lock poisoned"))?;
        Ok(map.get(email).cloned())
    }
}

#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: Arc<PgPool>,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Insert `user` unless the email is already taken. Returns whether a row was written.
    #[instrument(skip(self, user), fields(email = %user.email), err)]
    pub async fn insert_if_absent(&self, user: &UserRecord) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: uuid::Uuid = row.try_get("id")?;
        Ok(Some(UserRecord {
            id: UserId::from_uuid(id),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password")?,
        }))
    }
}
