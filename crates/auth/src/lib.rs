//! `invoicedesk-auth`: sign-in boundary for the dashboard.
//!
//! Providers verify a raw form submission; the registry turns a verified user
//! into a session. Failures that belong to the authentication domain are
//! raised as [`AuthError`] so callers can tell them apart from infrastructure
//! faults. Storage lives behind the [`UserDirectory`] and [`SessionStore`]
//! traits; this crate has no database or HTTP code.

pub mod credentials;
pub mod error;
pub mod password;
pub mod provider;
pub mod session;

pub use credentials::{Credentials, CredentialsProvider, UserDirectory, UserRecord};
pub use error::{AuthError, AuthErrorKind, auth_error_kind};
pub use password::{
    HASH_COST, PasswordError, hash_password, hash_password_with_cost, verify_password,
};
pub use provider::{AuthorizedUser, ProviderRegistry, SignInProvider};
pub use session::{Session, SessionError, SessionStore, SessionToken};
