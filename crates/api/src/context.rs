use invoicedesk_auth::Session;
use invoicedesk_core::UserId;

/// Signed-in user for a dashboard request.
///
/// Inserted by the session middleware; present on every `/dashboard` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: UserId,
    email: String,
}

impl SessionContext {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl From<Session> for SessionContext {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            email: session.email,
        }
    }
}
