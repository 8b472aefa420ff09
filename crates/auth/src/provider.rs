//! Sign-in providers and the registry that dispatches to them.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, Utc};

use invoicedesk_core::{FormData, UserId};

use crate::error::AuthError;
use crate::session::{Session, SessionStore};

/// A user whose submission a provider has verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Verifies a raw sign-in submission.
///
/// Rejections are reported as [`AuthError`]; any other error type is treated
/// by callers as an infrastructure fault.
#[async_trait]
pub trait SignInProvider: Send + Sync {
    /// Registry key (e.g. `"credentials"`).
    fn id(&self) -> &'static str;

    async fn authorize(&self, form: &FormData) -> anyhow::Result<AuthorizedUser>;
}

/// Providers by key, plus the session store that successful sign-ins write to.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn SignInProvider>>,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
}

impl ProviderRegistry {
    pub fn new(sessions: Arc<dyn SessionStore>, session_ttl: Duration) -> Self {
        Self {
            providers: HashMap::new(),
            sessions,
            session_ttl,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn SignInProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Verify `form` with the provider registered under `provider` and open a session.
    ///
    /// Errors from the provider are passed through untouched. A session-store
    /// failure is not an authentication error.
    #[tracing::instrument(skip(self, form))]
    pub async fn sign_in(&self, provider: &str, form: &FormData) -> anyhow::Result<Session> {
        let p = self.providers.get(provider).ok_or_else(|| {
            AuthError::Configuration(format!("no sign-in provider registered as '{provider}'"))
        })?;

        let user = p.authorize(form).await?;

        let session = Session::issue(&user, self.session_ttl, Utc::now());
        self.sessions
            .insert(session.clone())
            .await
            .context("failed to persist session")?;

        tracing::info!(user_id = %user.id, "signed in");
        Ok(session)
    }
}
