pub mod actions;
pub mod controller;
pub mod filters;

pub use actions::{DocumentActions, EditContext};
pub use controller::ListController;
pub use filters::{DocumentFilters, ListQuery, SortOrder};

use crate::api::ApiClient;
use crate::models::{Category, Department};
use crate::session::SessionStore;

pub const UPLOAD_FORBIDDEN: &str = "You do not have permission to upload documents.";
pub const EDIT_FORBIDDEN: &str = "You do not have permission to edit documents.";
pub const DELETE_FORBIDDEN: &str = "You do not have permission to delete documents.";

/// Categories and departments used to populate filter and form choices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub categories: Vec<Category>,
    pub departments: Vec<Department>,
}

impl ReferenceData {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    /// Category id for user input that is either an id or a label.
    pub fn resolve_category(&self, input: &str) -> Option<String> {
        let input = input.trim();
        self.category(input)
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|c| c.label().eq_ignore_ascii_case(input))
            })
            .map(|c| c.id.clone())
    }

    /// Department id for user input that is either an id or a name.
    pub fn resolve_department(&self, input: &str) -> Option<String> {
        let input = input.trim();
        self.department(input)
            .or_else(|| {
                self.departments
                    .iter()
                    .find(|d| d.name.eq_ignore_ascii_case(input))
            })
            .map(|d| d.id.clone())
    }
}

/// Fetch both lists concurrently. A failed list is logged and left empty.
pub async fn load_reference_data(api: &ApiClient, session: &SessionStore) -> ReferenceData {
    let (categories, departments) = tokio::join!(api.categories(), api.departments());

    let categories = session.observe(categories).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories");
        Vec::new()
    });
    let departments = session.observe(departments).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load departments");
        Vec::new()
    });

    ReferenceData {
        categories,
        departments,
    }
}

/// Page to show after deleting a row: step back when the deleted row was the
/// last one on a page past the first.
pub fn page_after_delete(current_page: u32, rows_on_page: usize) -> u32 {
    if rows_on_page <= 1 && current_page > 1 {
        current_page - 1
    } else {
        current_page.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_after_delete() {
        assert_eq!(page_after_delete(3, 1), 2);
        assert_eq!(page_after_delete(3, 5), 3);
        assert_eq!(page_after_delete(1, 1), 1);
        assert_eq!(page_after_delete(2, 0), 1);
        assert_eq!(page_after_delete(0, 3), 1);
    }

    #[test]
    fn test_reference_lookup() {
        let data = ReferenceData {
            categories: vec![Category {
                id: "1".into(),
                title: Some("HR".into()),
                name: None,
            }],
            departments: vec![Department {
                id: "2".into(),
                name: "Finance".into(),
            }],
        };
        assert_eq!(data.category("1").map(|c| c.label()), Some("HR"));
        assert_eq!(data.department("2").map(|d| d.name.as_str()), Some("Finance"));
        assert!(data.category("9").is_none());
        assert_eq!(data.resolve_category("hr").as_deref(), Some("1"));
        assert_eq!(data.resolve_department(" 2 ").as_deref(), Some("2"));
        assert_eq!(data.resolve_department("FINANCE").as_deref(), Some("2"));
        assert_eq!(data.resolve_department("Legal"), None);
    }
}
