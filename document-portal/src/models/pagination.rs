use super::Document;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Pagination metadata, replaced wholesale on every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            total: 0,
            current_page: DEFAULT_PAGE,
            last_page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageMeta {
    fn from_fields(source: Option<&Map<String, Value>>, row_count: usize) -> Self {
        let field = |key: &str| source.and_then(|map| map.get(key)).and_then(super::u64_from_value);

        Self {
            total: field("total").unwrap_or(row_count as u64),
            current_page: field("current_page")
                .map(clamp_page)
                .unwrap_or(DEFAULT_PAGE),
            last_page: field("last_page").map(clamp_page).unwrap_or(DEFAULT_PAGE),
            per_page: field("per_page")
                .filter(|n| *n > 0)
                .map(|n| n.min(u32::MAX as u64) as u32)
                .unwrap_or(DEFAULT_PER_PAGE),
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

fn clamp_page(n: u64) -> u32 {
    n.clamp(1, u32::MAX as u64) as u32
}

/// One page of documents as returned by `GET /documents`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub meta: PageMeta,
    /// Rows the backend sent, including any that failed to decode.
    pub row_count: usize,
}

impl DocumentPage {
    /// Accept a bare list, a `{data: [...]}` envelope (with optional `meta`
    /// or top-level paginator fields), or a nested paginator under `data`.
    pub fn from_value(value: Value) -> Self {
        let (rows, meta_source) = match value {
            Value::Array(rows) => (rows, None),
            Value::Object(mut outer) => match outer.remove("data") {
                Some(Value::Array(rows)) => {
                    let meta = match outer.remove("meta") {
                        Some(Value::Object(meta)) => meta,
                        _ => outer,
                    };
                    (rows, Some(meta))
                }
                Some(Value::Object(mut paginator)) => match paginator.remove("data") {
                    Some(Value::Array(rows)) => (rows, Some(paginator)),
                    _ => (Vec::new(), Some(paginator)),
                },
                _ => (Vec::new(), Some(outer)),
            },
            _ => (Vec::new(), None),
        };

        let row_count = rows.len();
        let documents = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Document>(row) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed document row");
                    None
                }
            })
            .collect();

        Self {
            documents,
            meta: PageMeta::from_fields(meta_source.as_ref(), row_count),
            row_count,
        }
    }
}
