//! Single-document operations: details, upload, edit, delete, download.

use super::{load_reference_data, ReferenceData, DELETE_FORBIDDEN, EDIT_FORBIDDEN, UPLOAD_FORBIDDEN};
use crate::api::ApiClient;
use crate::download::DownloadedFile;
use crate::error::PortalError;
use crate::forms::{DocumentFields, UploadForm};
use crate::guard::require_user;
use crate::models::{AuthUser, Category, Department, Document};
use crate::permissions::{ensure, Permissions};
use crate::session::SessionStore;
use std::sync::Arc;

/// Everything the edit form needs, loaded in one go.
#[derive(Debug, Clone)]
pub struct EditContext {
    pub document: Document,
    pub fields: DocumentFields,
    pub reference: ReferenceData,
}

#[derive(Clone)]
pub struct DocumentActions {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
}

impl DocumentActions {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    async fn permissions(&self) -> Result<(AuthUser, Permissions), PortalError> {
        let auth = require_user(&self.session).await?;
        let permissions = Permissions::for_user(&auth.user);
        Ok((auth, permissions))
    }

    /// Document details; `None` when the backend reports it missing.
    pub async fn show(&self, id: &str) -> Result<Option<Document>, PortalError> {
        require_user(&self.session).await?;
        match self.session.observe(self.api.get_document(id).await).await {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate locally, then create. Nothing is sent if validation fails.
    pub async fn upload(&self, form: &UploadForm) -> Result<Option<Document>, PortalError> {
        let (auth, permissions) = self.permissions().await?;
        ensure(permissions.can_upload, UPLOAD_FORBIDDEN)?;
        form.check()?;

        let created = self
            .session
            .observe(self.api.create_document(form).await)
            .await?;

        tracing::info!(
            email = %auth.user.email,
            title = %form.fields.title,
            "Document uploaded successfully"
        );
        Ok(created)
    }

    /// Load a document with the reference lists for editing.
    pub async fn edit_form(&self, id: &str) -> Result<EditContext, PortalError> {
        let (_, permissions) = self.permissions().await?;
        ensure(permissions.can_edit, EDIT_FORBIDDEN)?;

        let (document, categories, departments) = tokio::join!(
            self.api.get_document(id),
            self.api.categories(),
            self.api.departments(),
        );
        let document = self.session.observe(document).await?;
        let categories = self.session.observe(categories).await?;
        let departments = self.session.observe(departments).await?;

        Ok(EditContext {
            fields: DocumentFields::from_document(&document),
            document,
            reference: ReferenceData {
                categories,
                departments,
            },
        })
    }

    pub async fn update(
        &self,
        id: &str,
        fields: &DocumentFields,
    ) -> Result<Option<Document>, PortalError> {
        let (_, permissions) = self.permissions().await?;
        ensure(permissions.can_edit, EDIT_FORBIDDEN)?;
        fields.check()?;

        let updated = self
            .session
            .observe(self.api.update_document(id, fields).await)
            .await?;
        tracing::info!(document_id = %id, "Document updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), PortalError> {
        let (_, permissions) = self.permissions().await?;
        ensure(permissions.can_delete, DELETE_FORBIDDEN)?;

        self.session
            .observe(self.api.delete_document(id).await)
            .await?;
        tracing::info!(document_id = %id, "Document deleted");
        Ok(())
    }

    /// Download the file body. When the response does not name the file,
    /// `known` (or a fetch of the document) supplies the stored file name.
    pub async fn download(
        &self,
        id: &str,
        known: Option<&Document>,
    ) -> Result<DownloadedFile, PortalError> {
        require_user(&self.session).await?;
        let body = self
            .session
            .observe(self.api.download_document(id).await)
            .await?;

        let fetched = match known {
            None if !body.has_filename() => self
                .session
                .observe(self.api.get_document(id).await)
                .await
                .map_err(|e| tracing::debug!(document_id = %id, error = %e, "No stored file name"))
                .ok(),
            _ => None,
        };

        let file = body.into_file(known.or(fetched.as_ref()), id);
        tracing::info!(
            document_id = %id,
            filename = %file.filename,
            size = file.bytes.len(),
            "Document download completed"
        );
        Ok(file)
    }

    pub async fn reference_data(&self) -> Result<ReferenceData, PortalError> {
        require_user(&self.session).await?;
        Ok(load_reference_data(&self.api, &self.session).await)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, PortalError> {
        require_user(&self.session).await?;
        Ok(self.session.observe(self.api.categories().await).await?)
    }

    pub async fn departments(&self) -> Result<Vec<Department>, PortalError> {
        require_user(&self.session).await?;
        Ok(self.session.observe(self.api.departments().await).await?)
    }
}
