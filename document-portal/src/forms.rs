//! Upload and edit form models with client-side validation.
//!
//! Validation runs before any request is made; the first failing rule wins,
//! in the order the fields appear on the form.

use crate::error::PortalError;
use crate::models::{AccessLevel, Document};
use portal_core::error::GENERIC_ERROR_MESSAGE;
use serde_json::json;
use std::borrow::Cow;
use std::path::Path;
use validator::{Validate, ValidationError, ValidationErrors};

pub const ALLOWED_EXTENSIONS: [&str; 6] = ["pdf", "docx", "xlsx", "jpg", "jpeg", "png"];

/// 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const FIELD_ORDER: [&str; 4] = ["title", "category_id", "department_id", "access_level"];

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("Title is required."));
        return Err(error);
    }
    Ok(())
}

fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|list| list.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

/// Metadata fields shared by the upload and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct DocumentFields {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub description: String,
    #[validate(
        required(message = "Category is required."),
        length(min = 1, message = "Category is required.")
    )]
    pub category_id: Option<String>,
    #[validate(
        required(message = "Department is required."),
        length(min = 1, message = "Department is required.")
    )]
    pub department_id: Option<String>,
    #[validate(required(message = "Access level is required."))]
    pub access_level: Option<AccessLevel>,
}

impl DocumentFields {
    /// Prefill from a fetched document, tolerating both id shapes.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            description: doc.description.clone().unwrap_or_default(),
            category_id: doc.category_ref_id(),
            department_id: doc.department_ref_id(),
            access_level: Some(doc.access_level_or_default()),
        }
    }

    pub fn check(&self) -> Result<(), PortalError> {
        self.validate()
            .map_err(|errors| PortalError::Invalid(first_message(&errors)))
    }

    /// JSON body for `PATCH /documents/:id`, with both alias pairs.
    pub fn to_patch_payload(&self) -> serde_json::Value {
        let category = self.category_id.clone().unwrap_or_default();
        let department = self.department_id.clone().unwrap_or_default();
        json!({
            "title": self.title,
            "description": self.description,
            "access_level": self.access_level.unwrap_or_default(),
            "category_id": category,
            "document_category_id": category,
            "department_id": department,
            "document_department_id": department,
        })
    }
}

/// A file picked for upload, fully read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }

    /// Lowercased text after the last dot (the whole name if there is none).
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn content_type(&self) -> &'static str {
        match self.extension().as_str() {
            "pdf" => "application/pdf",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            _ => "application/octet-stream",
        }
    }

    fn check(&self) -> Result<(), PortalError> {
        if !ALLOWED_EXTENSIONS.contains(&self.extension().as_str()) {
            return Err(PortalError::Invalid(format!(
                "Invalid file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        if self.size() > MAX_UPLOAD_BYTES {
            return Err(PortalError::Invalid("File too large. Max 10MB.".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadForm {
    pub fields: DocumentFields,
    pub file: Option<FileUpload>,
}

impl UploadForm {
    pub fn check(&self) -> Result<(), PortalError> {
        self.fields.check()?;
        match &self.file {
            Some(file) => file.check(),
            None => Err(PortalError::Invalid("File is required.".to_string())),
        }
    }
}
