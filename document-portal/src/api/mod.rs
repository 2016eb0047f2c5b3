//! HTTP client adapter for the portal REST backend.
//!
//! Every request reads the current token from the token store and attaches it
//! as a bearer credential, the same way a browser client would read it from
//! local storage on each call.

use crate::config::ApiSettings;
use crate::documents::filters::ListQuery;
use crate::download::DownloadBody;
use crate::forms::{DocumentFields, UploadForm};
use crate::models::{self, Category, Department, Document, DocumentPage, User};
use crate::session::store::TokenStore;
use portal_core::error::ApiError;
use portal_core::observability::{extract_request_id, TracedClientExt, TracedRequest};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Body of a successful `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

pub struct ApiClient {
    client: Client,
    api_root: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_root: settings.api_root(),
            tokens,
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    async fn authorize(&self, request: TracedRequest) -> TracedRequest {
        match self.tokens.load().await {
            Ok(Some(token)) => request.bearer_auth(token.expose_secret()),
            Ok(None) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token, sending request anonymously");
                request
            }
        }
    }

    /// Send with the bearer token attached; non-success statuses become errors.
    async fn send(&self, request: TracedRequest, what: &str) -> Result<reqwest::Response, ApiError> {
        let response = self.authorize(request).await.send().await.map_err(|e| {
            tracing::error!(request = %what, error = %e, "HTTP request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let request_id = extract_request_id(response.headers()).unwrap_or_default();
        let error = ApiError::from_response(response).await;
        tracing::warn!(
            request = %what,
            status = %status,
            request_id = %request_id,
            error = %error,
            "Backend rejected request"
        );
        Err(error)
    }

    async fn send_value(&self, request: TracedRequest, what: &str) -> Result<Value, ApiError> {
        let response = self.send(request, what).await?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(format!("{}: {}", what, e)))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: TracedRequest, what: &str) -> Result<T, ApiError> {
        let value = self.send_value(request, what).await?;
        decode(value, what)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self
            .client
            .traced_post(&self.url("/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }));
        self.send_json(request, "login").await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = self.client.traced_post(&self.url("/logout"));
        self.send(request, "logout").await.map(|_| ())
    }

    /// Profile of the token holder; tolerates a `data` envelope.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let request = self.client.traced_get(&self.url("/user"));
        let value = self.send_value(request, "current user").await?;
        decode(models::unwrap_data(value), "current user")
    }

    pub async fn list_documents(&self, query: &ListQuery) -> Result<DocumentPage, ApiError> {
        let request = self
            .client
            .traced_get(&self.url("/documents"))
            .query(&query.to_params());
        let value = self.send_value(request, "list documents").await?;
        Ok(DocumentPage::from_value(value))
    }

    pub async fn get_document(&self, id: &str) -> Result<Document, ApiError> {
        let request = self.client.traced_get(&self.url(&format!("/documents/{}", id)));
        let value = self.send_value(request, "get document").await?;
        decode(models::unwrap_data(value), "get document")
    }

    /// Multipart create. The response body is returned when it parses as a
    /// document; some backends answer with only a message.
    pub async fn create_document(&self, form: &UploadForm) -> Result<Option<Document>, ApiError> {
        let multipart = build_multipart(form)?;
        let request = self
            .client
            .traced_post(&self.url("/documents"))
            .multipart(multipart);
        let value = self.send_value(request, "create document").await?;
        Ok(serde_json::from_value(models::unwrap_data(value)).ok())
    }

    pub async fn update_document(&self, id: &str, fields: &DocumentFields) -> Result<Option<Document>, ApiError> {
        let request = self
            .client
            .traced_patch(&self.url(&format!("/documents/{}", id)))
            .json(&fields.to_patch_payload());
        let value = self.send_value(request, "update document").await?;
        Ok(serde_json::from_value(models::unwrap_data(value)).ok())
    }

    pub async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        let request = self.client.traced_delete(&self.url(&format!("/documents/{}", id)));
        self.send(request, "delete document").await.map(|_| ())
    }

    pub async fn download_document(&self, id: &str) -> Result<DownloadBody, ApiError> {
        let request = self
            .client
            .traced_get(&self.url(&format!("/documents/{}/download", id)));
        let response = self.send(request, "download document").await?;

        let header_text = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };
        let content_disposition = header_text(header::CONTENT_DISPOSITION);
        let content_type = header_text(header::CONTENT_TYPE);

        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(document_id = %id, error = %e, "Failed to read document bytes");
            ApiError::Network(e)
        })?;

        Ok(DownloadBody {
            content_disposition,
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let request = self.client.traced_get(&self.url("/categories"));
        let value = self.send_value(request, "categories").await?;
        decode(models::unwrap_data(value), "categories")
    }

    pub async fn departments(&self) -> Result<Vec<Department>, ApiError> {
        let request = self.client.traced_get(&self.url("/departments"));
        let value = self.send_value(request, "departments").await?;
        decode(models::unwrap_data(value), "departments")
    }
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{}: {}", what, e)))
}

fn build_multipart(form: &UploadForm) -> Result<Form, ApiError> {
    let fields = &form.fields;
    let category = fields.category_id.clone().unwrap_or_default();
    let department = fields.department_id.clone().unwrap_or_default();

    let mut multipart = Form::new()
        .text("title", fields.title.clone())
        .text("description", fields.description.clone())
        .text("category_id", category.clone())
        .text("document_category_id", category)
        .text("department_id", department.clone())
        .text("document_department_id", department)
        .text(
            "access_level",
            fields.access_level.unwrap_or_default().to_string(),
        );

    if let Some(file) = &form.file {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(file.content_type())?;
        multipart = multipart.part("file", part);
    }

    Ok(multipart)
}
