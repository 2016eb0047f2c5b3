//! Plain-text renderings of the portal screens.

use crate::documents::ListController;
use crate::models::{Category, Department, Document, PageMeta, User, MISSING_LABEL};
use crate::permissions::{role_of, Permissions};
use std::fmt::Write;

pub const EMPTY_LIST: &str = "No documents found. Try different keywords or clear filters.";

fn or_missing(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(MISSING_LABEL)
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn render_login(user: &User) -> String {
    format!("Logged in as {} <{}>", user.display_name(), user.email)
}

/// Dashboard: who is logged in and which actions are offered.
pub fn render_profile(user: &User) -> String {
    let role = role_of(user);
    let permissions = Permissions::for_user(user);
    let yes_no = |allowed: bool| if allowed { "yes" } else { "no" };

    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", user.initials(), user.display_name());
    let _ = writeln!(out, "Email:  {}", or_missing(Some(&user.email)));
    let _ = writeln!(out, "Role:   {}", or_missing(Some(&role)));
    let _ = writeln!(out, "Upload: {}", yes_no(permissions.can_upload));
    let _ = writeln!(out, "Edit:   {}", yes_no(permissions.can_edit));
    let _ = write!(out, "Delete: {}", yes_no(permissions.can_delete));
    out
}

pub fn render_page_meta(meta: &PageMeta) -> String {
    format!(
        "Page {} of {} ({} documents)",
        meta.current_page,
        meta.last_page.max(meta.current_page),
        meta.total
    )
}

pub fn render_table(documents: &[Document]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<36} {:<18} {:<18} {:<10}",
        "ID", "TITLE", "CATEGORY", "DEPARTMENT", "ACCESS"
    );
    for doc in documents {
        let _ = writeln!(
            out,
            "{:<8} {:<36} {:<18} {:<18} {:<10}",
            truncate(&doc.id, 8),
            truncate(&doc.title, 36),
            truncate(doc.category_label(), 18),
            truncate(doc.department_label(), 18),
            doc.access_level_or_default().as_str()
        );
    }
    out.trim_end().to_string()
}

/// The documents screen: error or empty state, rows, paging hints.
pub fn render_list(list: &ListController, permissions: Permissions) -> String {
    if let Some(error) = list.error() {
        return error.to_string();
    }
    if list.documents().is_empty() {
        return EMPTY_LIST.to_string();
    }

    let meta = list.meta();
    let mut out = render_table(list.documents());
    let _ = write!(out, "\n\n{}", render_page_meta(meta));
    if meta.has_previous() {
        let _ = write!(out, "\nPrevious: --page {}", meta.current_page - 1);
    }
    if meta.has_next() {
        let _ = write!(out, "\nNext: --page {}", meta.current_page + 1);
    }
    if permissions.can_upload {
        let _ = write!(out, "\nUpload with `document-portal upload`.");
    }
    out
}

pub fn render_details(doc: &Document, permissions: Permissions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", doc.title);
    let _ = writeln!(out, "ID:          {}", doc.id);
    let _ = writeln!(out, "Description: {}", or_missing(doc.description.as_deref()));
    let _ = writeln!(out, "Category:    {}", doc.category_label());
    let _ = writeln!(out, "Department:  {}", doc.department_label());
    let _ = writeln!(out, "Access:      {}", doc.access_level_or_default());
    let _ = writeln!(out, "File:        {}", or_missing(doc.file_name.as_deref()));
    if let Some(size) = doc.file_size {
        let _ = writeln!(out, "Size:        {}", human_size(size));
    }
    let _ = writeln!(out, "Created:     {}", or_missing(doc.created_at.as_deref()));
    let _ = write!(out, "Updated:     {}", or_missing(doc.updated_at.as_deref()));

    let mut actions = vec!["download"];
    if permissions.can_edit {
        actions.push("edit");
    }
    if permissions.can_delete {
        actions.push("delete");
    }
    let _ = write!(out, "\nActions:     {}", actions.join(", "));
    out
}

pub fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories.".to_string();
    }
    categories
        .iter()
        .map(|c| format!("{:<8} {}", c.id, or_missing(Some(c.label()))))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_departments(departments: &[Department]) -> String {
    if departments.is_empty() {
        return "No departments.".to_string();
    }
    departments
        .iter()
        .map(|d| format!("{:<8} {}", d.id, or_missing(Some(&d.name))))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessLevel, CategoryRef, RoleEntry};

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(10 * 1024 * 1024), "10.0 MB");
    }

    #[test]
    fn test_truncate_keeps_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long document title", 6), "a lon…");
    }

    #[test]
    fn test_profile_shows_role_and_affordances() {
        let user = User {
            name: "Siti Rahma".into(),
            email: "siti@example.com".into(),
            role: Some(RoleEntry::Name("Manager".into())),
            ..Default::default()
        };
        let text = render_profile(&user);
        assert!(text.starts_with("[SR] Siti Rahma"));
        assert!(text.contains("Role:   Manager"));
        assert!(text.contains("Delete: yes"));

        let text = render_profile(&User {
            email: "staff@example.com".into(),
            ..Default::default()
        });
        assert!(text.contains(&format!("Role:   {}", MISSING_LABEL)));
        assert!(text.contains("Upload: no"));
    }

    #[test]
    fn test_details_lists_only_permitted_actions() {
        let doc = Document {
            id: "4".into(),
            title: "Handbook".into(),
            category: Some(CategoryRef {
                id: Some("1".into()),
                title: Some("HR".into()),
                name: None,
            }),
            access_level: Some(AccessLevel::Private),
            file_size: Some(2048),
            ..Default::default()
        };

        let text = render_details(&doc, Permissions::default());
        assert!(text.contains("Category:    HR"));
        assert!(text.contains(&format!("Department:  {}", MISSING_LABEL)));
        assert!(text.contains("Access:      private"));
        assert!(text.contains("Size:        2.0 KB"));
        assert!(text.ends_with("Actions:     download"));

        let text = render_details(&doc, Permissions::for_role("admin"));
        assert!(text.ends_with("Actions:     download, edit, delete"));
    }

    #[test]
    fn test_page_meta_line() {
        let meta = PageMeta {
            total: 45,
            current_page: 2,
            last_page: 3,
            per_page: 20,
        };
        assert_eq!(render_page_meta(&meta), "Page 2 of 3 (45 documents)");
    }

    #[test]
    fn test_reference_lists() {
        assert_eq!(render_categories(&[]), "No categories.");
        let text = render_departments(&[Department {
            id: "3".into(),
            name: "Finance".into(),
        }]);
        assert_eq!(text, "3        Finance");
    }
}
