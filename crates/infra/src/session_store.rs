use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use invoicedesk_auth::{Session, SessionError, SessionStore, SessionToken};

/// Process-local sessions. Expired entries are pruned on every insert and when
/// their token is looked up.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<SessionToken, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> SessionError {
    SessionError::Storage("session map lock poisoned".to_string())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionError> {
        let now = Utc::now();
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let before = map.len();
        map.retain(|_, held| !held.is_expired(now));
        let pruned = before - map.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned expired sessions");
        }
        map.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, SessionError> {
        {
            let map = self.inner.read().map_err(|_| poisoned())?;
            match map.get(token) {
                None => return Ok(None),
                Some(session) if !session.is_expired(now) => return Ok(Some(session.clone())),
                Some(_) => {}
            }
        }

        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(token);
        Ok(None)
    }

    async fn remove(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(token);
        Ok(())
    }
}
