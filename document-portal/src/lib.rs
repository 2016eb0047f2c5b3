pub mod api;
pub mod cli;
pub mod config;
pub mod documents;
pub mod download;
pub mod error;
pub mod forms;
pub mod guard;
pub mod models;
pub mod permissions;
pub mod session;

use api::ApiClient;
use config::Settings;
use documents::{DocumentActions, ListController};
use portal_core::error::ApiError;
use session::store::TokenStore;
use session::SessionStore;
use std::sync::Arc;

/// Shared client state handed to every view.
#[derive(Clone)]
pub struct PortalContext {
    pub settings: Settings,
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
}

impl PortalContext {
    pub fn new(settings: Settings, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::new(&settings.api, tokens.clone())?);
        let session = Arc::new(SessionStore::new(api.clone(), tokens));
        Ok(Self {
            settings,
            api,
            session,
        })
    }

    pub fn list_controller(&self) -> ListController {
        ListController::new(
            self.api.clone(),
            self.session.clone(),
            self.settings.listing.per_page,
        )
    }

    pub fn actions(&self) -> DocumentActions {
        DocumentActions::new(self.api.clone(), self.session.clone())
    }
}
