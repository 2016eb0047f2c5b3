use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::TitleAsc => "title_asc",
            SortOrder::TitleDesc => "title_desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "title_asc" => Ok(SortOrder::TitleAsc),
            "title_desc" => Ok(SortOrder::TitleDesc),
            _ => Err(format!(
                "Invalid sort: {} (expected newest, oldest, title_asc or title_desc)",
                s
            )),
        }
    }
}

/// One complete set of list filters.
///
/// The list view keeps two of these: the draft bound to the inputs and the
/// applied set used for fetching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFilters {
    pub search: String,
    pub category_id: Option<String>,
    pub department_id: Option<String>,
    pub sort: SortOrder,
}

impl DocumentFilters {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category_id: Option<String>) -> Self {
        self.category_id = non_empty(category_id);
        self
    }

    pub fn with_department(mut self, department_id: Option<String>) -> Self {
        self.department_id = non_empty(department_id);
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A fully resolved `GET /documents` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: DocumentFilters,
    pub page: u32,
    pub per_page: u32,
}

impl ListQuery {
    /// Query string pairs, repeating each filter under every name the
    /// backend has been seen to read.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("per_page", self.per_page.to_string()),
            ("sort", self.filters.sort.to_string()),
        ];

        let search = self.filters.search.trim();
        if !search.is_empty() {
            for key in ["search", "q", "keyword"] {
                params.push((key, search.to_string()));
            }
        }

        if let Some(category) = self.filters.category_id.as_deref().filter(|c| !c.is_empty()) {
            for key in ["category_id", "document_category_id", "category"] {
                params.push((key, category.to_string()));
            }
        }

        if let Some(department) = self
            .filters
            .department_id
            .as_deref()
            .filter(|d| !d.is_empty())
        {
            for key in ["department_id", "document_department_id", "department"] {
                params.push((key, department.to_string()));
            }
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_default_query_has_only_paging_and_sort() {
        let query = ListQuery {
            filters: DocumentFilters::default(),
            page: 1,
            per_page: 20,
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("page", "1".to_string()),
                ("per_page", "20".to_string()),
                ("sort", "newest".to_string()),
            ]
        );
    }

    #[test]
    fn test_filters_are_sent_under_every_alias() {
        let query = ListQuery {
            filters: DocumentFilters::default()
                .with_search("  handbook ")
                .with_category(Some("3".into()))
                .with_department(Some("7".into()))
                .with_sort(SortOrder::TitleAsc),
            page: 2,
            per_page: 10,
        };
        let params = query.to_params();

        assert_eq!(
            keys(&params),
            vec![
                "page",
                "per_page",
                "sort",
                "search",
                "q",
                "keyword",
                "category_id",
                "document_category_id",
                "category",
                "department_id",
                "document_department_id",
                "department",
            ]
        );
        assert!(params
            .iter()
            .filter(|(k, _)| ["search", "q", "keyword"].contains(k))
            .all(|(_, v)| v == "handbook"));
        assert_eq!(params[2].1, "title_asc");
    }

    #[test]
    fn test_blank_selections_are_dropped() {
        let filters = DocumentFilters::default()
            .with_category(Some(String::new()))
            .with_department(Some("  ".into()))
            .with_search("   ");
        assert_eq!(filters.category_id, None);
        assert_eq!(filters.department_id, None);

        let query = ListQuery {
            filters,
            page: 0,
            per_page: 20,
        };
        assert_eq!(keys(&query.to_params()), vec!["page", "per_page", "sort"]);
        assert_eq!(query.to_params()[0].1, "1");
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("TITLE_DESC".parse::<SortOrder>(), Ok(SortOrder::TitleDesc));
        assert!("random".parse::<SortOrder>().is_err());
    }
}
