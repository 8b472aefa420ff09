//! Store wiring shared by every handler.

use std::sync::Arc;

use anyhow::Context;

use invoicedesk_auth::{
    CredentialsProvider, ProviderRegistry, SessionStore, UserDirectory, UserRecord, hash_password,
};
use invoicedesk_core::UserId;
use invoicedesk_infra::{
    AppConfig, DevUser, InMemoryInvoiceStore, InMemoryRouteCache, InMemorySessionStore,
    InMemoryUserDirectory, InvoiceStore, PostgresInvoiceStore, PostgresUserDirectory, RouteCache,
    db,
};

const DEV_USER_NAME: &str = "User";

#[derive(Clone)]
pub struct AppServices {
    pub invoices: Arc<dyn InvoiceStore>,
    pub cache: Arc<dyn RouteCache>,
    pub auth: ProviderRegistry,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl AppServices {
    /// Wire the credentials provider against `users` and the given stores.
    pub fn new(
        invoices: Arc<dyn InvoiceStore>,
        cache: Arc<dyn RouteCache>,
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        session_ttl: chrono::Duration,
    ) -> Self {
        let auth = ProviderRegistry::new(sessions, session_ttl)
            .with_provider(Arc::new(CredentialsProvider::new(users)));
        Self {
            invoices,
            cache,
            auth,
            secure_cookies: true,
        }
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Everything in process memory.
    pub fn in_memory(users: Arc<dyn UserDirectory>, session_ttl: chrono::Duration) -> Self {
        Self::new(
            Arc::new(InMemoryInvoiceStore::new()),
            Arc::new(InMemoryRouteCache::new()),
            users,
            Arc::new(InMemorySessionStore::new()),
            session_ttl,
        )
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        self.auth.sessions()
    }
}

/// Build the stores selected by `config`: Postgres when `DATABASE_URL` is set,
/// in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if !config.secure_cookies {
        tracing::warn!("COOKIE_SECURE=false; session cookies are sent over plain http");
    }
    let services = match &config.database_url {
        Some(url) => build_persistent_services(url, config).await?,
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            let users = InMemoryUserDirectory::new();
            if let Some(dev) = &config.dev_user {
                users.add(dev_user_record(dev)?);
                tracing::info!(email = %dev.email, "seeded dev user");
            }
            AppServices::in_memory(Arc::new(users), config.session_ttl)
        }
    };
    Ok(services.with_secure_cookies(config.secure_cookies))
}

async fn build_persistent_services(url: &str, config: &AppConfig) -> anyhow::Result<AppServices> {
    let pool = db::connect(url)
        .await
        .context("failed to connect to postgres")?;
    db::ensure_schema(&pool)
        .await
        .context("failed to create schema")?;

    let users = PostgresUserDirectory::new(pool.clone());
    if let Some(dev) = &config.dev_user {
        let inserted = users
            .insert_if_absent(&dev_user_record(dev)?)
            .await
            .context("failed to seed dev user")?;
        tracing::info!(email = %dev.email, inserted, "seeded dev user");
    }

    Ok(AppServices::new(
        Arc::new(PostgresInvoiceStore::new(pool)),
        Arc::new(InMemoryRouteCache::new()),
        Arc::new(users),
        Arc::new(InMemorySessionStore::new()),
        config.session_ttl,
    ))
}

fn dev_user_record(dev: &DevUser) -> anyhow::Result<UserRecord> {
    Ok(UserRecord {
        id: UserId::new(),
        name: DEV_USER_NAME.to_string(),
        email: dev.email.clone(),
        password_hash: hash_password(&dev.password).context("failed to hash dev user password")?,
    })
}
