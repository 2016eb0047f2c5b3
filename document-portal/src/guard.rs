use crate::error::PortalError;
use crate::models::AuthUser;
use crate::session::{SessionState, SessionStore};

/// Outcome of checking a protected view against the session.
#[derive(Debug, Clone)]
pub enum GuardDecision {
    /// The session has not finished booting yet.
    Loading,
    RedirectToLogin,
    Allow(AuthUser),
}

pub async fn guard(session: &SessionStore) -> GuardDecision {
    match session.state().await {
        SessionState::Booting => GuardDecision::Loading,
        SessionState::Anonymous => GuardDecision::RedirectToLogin,
        SessionState::Authenticated(auth) => GuardDecision::Allow(auth),
    }
}

/// Authenticated user for a protected view, or `NotAuthenticated`.
pub async fn require_user(session: &SessionStore) -> Result<AuthUser, PortalError> {
    match guard(session).await {
        GuardDecision::Allow(auth) => Ok(auth),
        GuardDecision::Loading | GuardDecision::RedirectToLogin => {
            Err(PortalError::NotAuthenticated)
        }
    }
}
