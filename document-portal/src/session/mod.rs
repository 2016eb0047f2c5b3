//! Session / authorization state machine.
//!
//! `Booting` resolves to `Authenticated` or `Anonymous` once [`SessionStore::boot`]
//! has probed any stored token. Login moves an anonymous session to
//! authenticated; logout or any observed 401 moves it back.

pub mod store;

use crate::api::ApiClient;
use crate::error::PortalError;
use crate::models::{AuthUser, User};
use portal_core::error::ApiError;
use secrecy::Secret;
use std::sync::Arc;
use store::TokenStore;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub enum SessionState {
    Booting,
    Anonymous,
    Authenticated(AuthUser),
}

impl SessionState {
    pub fn is_booting(&self) -> bool {
        matches!(self, SessionState::Booting)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(auth) => Some(&auth.user),
            _ => None,
        }
    }
}

/// Owned session handle, shared with views through an `Arc`.
pub struct SessionStore {
    api: Arc<ApiClient>,
    tokens: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(api: Arc<ApiClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            state: RwLock::new(SessionState::Booting),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<AuthUser> {
        match &*self.state.read().await {
            SessionState::Authenticated(auth) => Some(auth.clone()),
            _ => None,
        }
    }

    /// Resolve the booting state from whatever token was stored last time.
    pub async fn boot(&self) -> SessionState {
        let stored = match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                None
            }
        };

        let Some(token) = stored else {
            *self.state.write().await = SessionState::Anonymous;
            return SessionState::Anonymous;
        };

        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(email = %user.email, "Restored session from stored token");
                let next = SessionState::Authenticated(AuthUser { token, user });
                *self.state.write().await = next.clone();
                next
            }
            Err(e) => {
                tracing::info!(error = %e, "Stored token rejected, clearing session");
                self.clear().await;
                SessionState::Anonymous
            }
        }
    }

    /// Log in and take token and user straight from the login response.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, PortalError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(PortalError::Invalid(
                "Email and password are required.".to_string(),
            ));
        }

        let response = self.api.login(email.trim(), password).await?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .map(Secret::new)
            .ok_or_else(|| ApiError::Decode("Token not found in login response".to_string()))?;

        self.tokens.save(&token).await?;

        let auth = AuthUser {
            token,
            user: response.user.unwrap_or_default(),
        };
        *self.state.write().await = SessionState::Authenticated(auth.clone());

        tracing::info!(email = %auth.user.email, "User logged in successfully");
        Ok(auth)
    }

    /// Notify the backend if possible, then always drop local state.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "Failed to revoke token during logout");
        } else {
            tracing::info!("Token revoked successfully");
        }
        self.clear().await;
    }

    /// Pass a request result through, clearing the session on a 401.
    pub async fn observe<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if matches!(&result, Err(e) if e.is_unauthorized()) {
            tracing::info!("Backend rejected the token, clearing session");
            self.clear().await;
        }
        result
    }

    async fn clear(&self) {
        if let Err(e) = self.tokens.clear().await {
            tracing::warn!(error = %e, "Failed to remove stored token");
        }
        *self.state.write().await = SessionState::Anonymous;
    }
}
