//! Email + password sign-in.

use std::sync::Arc;

use async_trait::async_trait;

use invoicedesk_core::{FormData, UserId};

use crate::error::AuthError;
use crate::password::verify_password;
use crate::provider::{AuthorizedUser, SignInProvider};

const MIN_PASSWORD_LEN: usize = 6;

/// Stored user, as read by the credentials provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Read access to stored users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;
}

/// A well-formed sign-in submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Extract `email` and `password`.
    ///
    /// Returns `None` when the email has no `@` or the password is shorter than
    /// six characters.
    pub fn from_form(form: &FormData) -> Option<Self> {
        let email = form.get("email")?.trim();
        let password = form.get("password")?;

        let well_formed_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !well_formed_email || password.chars().count() < MIN_PASSWORD_LEN {
            return None;
        }

        Some(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Provider registered under `"credentials"`.
pub struct CredentialsProvider {
    users: Arc<dyn UserDirectory>,
}

impl CredentialsProvider {
    pub const ID: &'static str = "credentials";

    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl SignInProvider for CredentialsProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    async fn authorize(&self, form: &FormData) -> anyhow::Result<AuthorizedUser> {
        let Some(credentials) = Credentials::from_form(form) else {
            tracing::debug!("malformed credentials submission");
            return Err(AuthError::CredentialsSignin.into());
        };

        let user = match self.users.find_by_email(&credentials.email).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "user lookup failed");
                return Err(AuthError::CallbackRoute("failed to fetch user".to_string()).into());
            }
        };

        match user {
            Some(user) if verify_password(&credentials.password, &user.password_hash) => {
                Ok(AuthorizedUser {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                })
            }
            _ => Err(AuthError::CredentialsSignin.into()),
        }
    }
}
