use portal_core::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    /// Rejected client-side before any request was sent.
    #[error("{0}")]
    Invalid(String),

    /// The current role may not perform this action.
    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Token storage error: {0}")]
    TokenStore(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl PortalError {
    /// Message to show the user, with `fallback` for opaque backend failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PortalError::Invalid(msg) => msg.clone(),
            PortalError::Forbidden(msg) => msg.to_string(),
            PortalError::NotAuthenticated => {
                "You are not logged in. Run `document-portal login` first.".to_string()
            }
            PortalError::Api(e) => e.user_message(fallback),
            PortalError::TokenStore(_) | PortalError::Config(_) => self.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PortalError::Api(e) if e.is_unauthorized())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortalError::Api(e) if e.is_not_found())
    }
}
