//! Sessions issued after a successful sign-in.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use invoicedesk_core::UserId;

use crate::provider::AuthorizedUser;

/// Opaque bearer token naming a session (the cookie value).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Random, unguessable token.
    pub fn generate() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    pub fn from_string(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(user: &AuthorizedUser, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            token: SessionToken::generate(),
            user_id: user.id,
            email: user.email.clone(),
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(String),
}

/// Session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), SessionError>;

    /// Look up a live session. Expired sessions are reported as absent.
    async fn get(&self, token: &SessionToken, now: DateTime<Utc>)
    -> Result<Option<Session>, SessionError>;

    async fn remove(&self, token: &SessionToken) -> Result<(), SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthorizedUser {
        AuthorizedUser {
            id: UserId::new(),
            name: "User".to_string(),
            email: "user@nextmail.com".to_string(),
        }
    }

    #[test]
    fn issued_session_expires_after_ttl() {
        let now = Utc::now();
        let session = Session::issue(&user(), Duration::minutes(10), now);
        assert!(!session.is_expired(now));
        assert!(!session.is_expired(now + Duration::minutes(9)));
        assert!(session.is_expired(now + Duration::minutes(10)));
    }

    #[test]
    fn tokens_are_unique() {
        let now = Utc::now();
        let a = Session::issue(&user(), Duration::minutes(1), now);
        let b = Session::issue(&user(), Duration::minutes(1), now);
        assert_ne!(a.token, b.token);
        assert_eq!(a.token.as_str().len(), 64);
    }
}
