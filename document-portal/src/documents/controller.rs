//! Documents list state: draft vs applied filters, page cursor, last page.

use super::filters::{DocumentFilters, ListQuery};
use super::{load_reference_data, page_after_delete, ReferenceData, DELETE_FORBIDDEN};
use crate::api::ApiClient;
use crate::error::PortalError;
use crate::guard::require_user;
use crate::models::{Document, PageMeta};
use crate::permissions::{ensure, Permissions};
use crate::session::SessionStore;
use portal_core::error::ApiError;
use std::sync::Arc;

pub const LOAD_FAILED: &str = "Failed to load documents.";

/// Owns the list view's query state and issues one fetch per intent.
///
/// Responses overwrite state unconditionally; nothing is cancelled, so the
/// last response to arrive wins.
pub struct ListController {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    per_page: u32,
    draft: DocumentFilters,
    applied: DocumentFilters,
    page: u32,
    documents: Vec<Document>,
    rows_on_page: usize,
    meta: PageMeta,
    reference: ReferenceData,
    error: Option<String>,
}

impl ListController {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>, per_page: u32) -> Self {
        Self {
            api,
            session,
            per_page: per_page.max(1),
            draft: DocumentFilters::default(),
            applied: DocumentFilters::default(),
            page: 1,
            documents: Vec::new(),
            rows_on_page: 0,
            meta: PageMeta::default(),
            reference: ReferenceData::default(),
            error: None,
        }
    }

    pub fn draft(&self) -> &DocumentFilters {
        &self.draft
    }

    pub fn applied(&self) -> &DocumentFilters {
        &self.applied
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the draft. No request is made.
    pub fn set_draft(&mut self, filters: DocumentFilters) {
        self.draft = filters;
    }

    pub fn draft_mut(&mut self) -> &mut DocumentFilters {
        &mut self.draft
    }

    /// Initial load: reference lists first, then the current page.
    pub async fn open(&mut self) -> Result<(), ApiError> {
        self.load_reference_data().await;
        self.refresh().await
    }

    pub async fn load_reference_data(&mut self) {
        self.reference = load_reference_data(&self.api, &self.session).await;
    }

    /// Restore a previously applied query, e.g. from a saved link, and fetch
    /// the requested page of it.
    pub async fn open_at(&mut self, filters: DocumentFilters, page: u32) -> Result<(), ApiError> {
        self.draft = filters.clone();
        self.applied = filters;
        self.fetch(page.max(1)).await
    }

    /// Commit the draft and fetch its first page.
    pub async fn apply(&mut self) -> Result<(), ApiError> {
        self.applied = self.draft.clone();
        self.fetch(1).await
    }

    /// Reset both filter sets to defaults and fetch the first page.
    pub async fn clear(&mut self) -> Result<(), ApiError> {
        self.draft = DocumentFilters::default();
        self.applied = DocumentFilters::default();
        self.fetch(1).await
    }

    /// Fetch another page of the applied filters; the draft is ignored.
    pub async fn go_to_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.fetch(page.max(1)).await
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.fetch(self.page).await
    }

    /// Delete a row of the current page and reload, stepping back a page if
    /// it was the only row.
    pub async fn delete(&mut self, id: &str) -> Result<(), PortalError> {
        let auth = require_user(&self.session).await?;
        ensure(Permissions::for_user(&auth.user).can_delete, DELETE_FORBIDDEN)?;

        let rows_on_page = self.rows_on_page;
        self.session
            .observe(self.api.delete_document(id).await)
            .await?;
        tracing::info!(document_id = %id, "Document deleted");

        let target = page_after_delete(self.page, rows_on_page);
        self.fetch(target).await?;
        Ok(())
    }

    async fn fetch(&mut self, page: u32) -> Result<(), ApiError> {
        let query = ListQuery {
            filters: self.applied.clone(),
            page,
            per_page: self.per_page,
        };
        self.page = page;
        self.error = None;

        tracing::debug!(page, per_page = self.per_page, "Loading documents");
        let result = self
            .session
            .observe(self.api.list_documents(&query).await)
            .await;

        match result {
            Ok(fetched) => {
                self.documents = fetched.documents;
                self.rows_on_page = fetched.row_count;
                self.meta = fetched.meta;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message(LOAD_FAILED));
                self.documents.clear();
                self.rows_on_page = 0;
                self.meta = PageMeta::default();
                Err(e)
            }
        }
    }
}
