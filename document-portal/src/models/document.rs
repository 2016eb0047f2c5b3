use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Placeholder shown when a reference label is missing.
pub const MISSING_LABEL: &str = "—";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Public,
    Department,
    Private,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Department => "department",
            AccessLevel::Private => "private",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(AccessLevel::Public),
            "department" => Ok(AccessLevel::Department),
            "private" => Ok(AccessLevel::Private),
            _ => Err(format!(
                "Invalid access level: {} (expected public, department or private)",
                s
            )),
        }
    }
}

/// Blank or unknown levels are treated as unset rather than rejecting the row.
fn de_opt_access_level<'de, D>(deserializer: D) -> Result<Option<AccessLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CategoryRef {
    #[serde(default, deserialize_with = "super::de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DepartmentRef {
    #[serde(default, deserialize_with = "super::de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Document {
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "super::de_string_or_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "super::de_opt_id")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "super::de_opt_id")]
    pub department_id: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
    #[serde(default)]
    pub category_title: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_access_level")]
    pub access_level: Option<AccessLevel>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "super::de_opt_u64")]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn first_present<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

impl Document {
    pub fn category_label(&self) -> &str {
        let nested = self.category.as_ref();
        first_present([
            nested.and_then(|c| c.title.as_deref()),
            nested.and_then(|c| c.name.as_deref()),
            self.category_title.as_deref(),
        ])
        .unwrap_or(MISSING_LABEL)
    }

    pub fn department_label(&self) -> &str {
        first_present([
            self.department.as_ref().and_then(|d| d.name.as_deref()),
            self.department_name.as_deref(),
        ])
        .unwrap_or(MISSING_LABEL)
    }

    /// Category id from the flat field, else the nested object.
    pub fn category_ref_id(&self) -> Option<String> {
        self.category_id
            .clone()
            .or_else(|| self.category.as_ref().and_then(|c| c.id.clone()))
    }

    /// Department id from the flat field, else the nested object.
    pub fn department_ref_id(&self) -> Option<String> {
        self.department_id
            .clone()
            .or_else(|| self.department.as_ref().and_then(|d| d.id.clone()))
    }

    pub fn access_level_or_default(&self) -> AccessLevel {
        self.access_level.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_prefer_nested_objects() {
        let doc: Document = serde_json::from_str(
            r#"{"id": 12, "title": "Handbook", "category": {"id": 2, "title": "HR"}, "category_title": "Old",
                "department": {"id": 5, "name": "Finance"}, "access_level": "department"}"#,
        )
        .unwrap();

        assert_eq!(doc.id, "12");
        assert_eq!(doc.category_label(), "HR");
        assert_eq!(doc.department_label(), "Finance");
        assert_eq!(doc.category_ref_id().as_deref(), Some("2"));
        assert_eq!(doc.department_ref_id().as_deref(), Some("5"));
        assert_eq!(doc.access_level, Some(AccessLevel::Department));
    }

    #[test]
    fn test_labels_fall_back_to_flat_fields_then_placeholder() {
        let doc: Document = serde_json::from_str(
            r#"{"id": "a1", "title": "Memo", "category": {"name": "Policy"}, "department_name": "IT"}"#,
        )
        .unwrap();
        assert_eq!(doc.category_label(), "Policy");
        assert_eq!(doc.department_label(), "IT");

        let bare: Document = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(bare.category_label(), MISSING_LABEL);
        assert_eq!(bare.department_label(), MISSING_LABEL);
        assert_eq!(bare.access_level_or_default(), AccessLevel::Public);
    }

    #[test]
    fn test_flat_ids_win_over_nested() {
        let doc: Document = serde_json::from_str(
            r#"{"id": 1, "category_id": 9, "category": {"id": 2}, "department_id": "4"}"#,
        )
        .unwrap();
        assert_eq!(doc.category_ref_id().as_deref(), Some("9"));
        assert_eq!(doc.department_ref_id().as_deref(), Some("4"));
    }

    #[test]
    fn test_null_and_loose_fields_still_decode() {
        let doc: Document = serde_json::from_str(
            r#"{"id": 8, "title": null, "access_level": "", "file_size": "1.5e3", "description": null}"#,
        )
        .unwrap();
        assert_eq!(doc.title, "");
        assert_eq!(doc.access_level, None);
        assert_eq!(doc.access_level_or_default(), AccessLevel::Public);
        assert_eq!(doc.file_size, Some(1500));

        let doc: Document =
            serde_json::from_str(r#"{"id": 9, "access_level": "Secret", "file_size": 12.5}"#).unwrap();
        assert_eq!(doc.access_level, None);
        assert_eq!(doc.file_size, Some(13));
    }

    #[test]
    fn test_access_level_parsing() {
        assert_eq!("Private".parse::<AccessLevel>(), Ok(AccessLevel::Private));
        assert!("secret".parse::<AccessLevel>().is_err());
        assert_eq!(AccessLevel::Department.to_string(), "department");
    }
}
