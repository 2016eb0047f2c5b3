#![allow(dead_code)]

use document_portal::config::{ApiSettings, LogSettings, Settings, SessionSettings, ListingSettings};
use document_portal::session::store::{MemoryTokenStore, TokenStore};
use document_portal::PortalContext;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API: &str = "/api/v1";
pub const TEST_TOKEN: &str = "test-token-123";

pub struct TestApp {
    pub server: MockServer,
    pub tokens: Arc<MemoryTokenStore>,
    pub ctx: PortalContext,
}

impl TestApp {
    /// Client wired to a fresh mock backend with no stored token.
    pub async fn spawn() -> Self {
        Self::with_tokens(MemoryTokenStore::new()).await
    }

    /// Client whose token store already holds `TEST_TOKEN`.
    pub async fn spawn_with_token() -> Self {
        Self::with_tokens(MemoryTokenStore::with_token(TEST_TOKEN)).await
    }

    async fn with_tokens(tokens: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let settings = Settings {
            api: ApiSettings {
                base_url: server.uri(),
                timeout_secs: 5,
            },
            session: SessionSettings::default(),
            listing: ListingSettings { per_page: 20 },
            log: LogSettings::default(),
        };

        let tokens = Arc::new(tokens);
        let store: Arc<dyn TokenStore> = tokens.clone();
        let ctx = PortalContext::new(settings, store).expect("Failed to build context");

        Self { server, tokens, ctx }
    }

    pub fn endpoint(suffix: &str) -> String {
        format!("{}{}", API, suffix)
    }

    pub async fn stored_token(&self) -> Option<String> {
        use secrecy::ExposeSecret;
        self.tokens
            .load()
            .await
            .expect("Failed to read token store")
            .map(|t| t.expose_secret().clone())
    }

    /// Mount `GET /user` answering with the given role and boot the session.
    pub async fn login_as(&self, role: &str) {
        Mock::given(method("GET"))
            .and(path(Self::endpoint("/user")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(role)))
            .mount(&self.server)
            .await;
        let state = self.ctx.session.boot().await;
        assert!(state.is_authenticated(), "boot should restore the session");
    }
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": 1,
        "name": "Test User",
        "email": "test@example.com",
        "role": role,
    })
}

pub fn document_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Quarterly numbers",
        "category": {"id": 1, "title": "Reports"},
        "department": {"id": 2, "name": "Finance"},
        "access_level": "department",
        "file_name": format!("{}.pdf", title.to_lowercase().replace(' ', "_")),
    })
}

/// Laravel-style paginated body.
pub fn page_json(rows: Vec<Value>, current_page: u32, last_page: u32, total: u64) -> Value {
    json!({
        "data": rows,
        "current_page": current_page,
        "last_page": last_page,
        "per_page": 20,
        "total": total,
    })
}
