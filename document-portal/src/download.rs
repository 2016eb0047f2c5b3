use crate::models::Document;
use percent_encoding::percent_decode_str;
use portal_core::error::ApiError;

/// A downloaded document body with the name it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Raw download response before a filename has been settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadBody {
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .map(|v| v.strip_suffix('"').unwrap_or(v))
        .unwrap_or(value)
}

/// Filename carried by a `Content-Disposition` header.
///
/// `filename*=UTF-8''...` wins over `filename=` when both are present.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = unquote(value);
                let encoded = encoded
                    .split_once("''")
                    .map(|(_, rest)| rest)
                    .unwrap_or(encoded);
                extended = percent_decode_str(encoded)
                    .decode_utf8()
                    .ok()
                    .map(|s| s.into_owned());
            }
            "filename" => plain = Some(unquote(value).to_string()),
            _ => {}
        }
    }

    extended.or(plain).filter(|name| !name.trim().is_empty())
}

/// Header name, else the known document's file name, else `document_<id>`.
pub fn resolve_filename(disposition: Option<&str>, known: Option<&Document>, id: &str) -> String {
    disposition
        .and_then(filename_from_disposition)
        .or_else(|| {
            known
                .and_then(|doc| doc.file_name.clone())
                .filter(|n| !n.is_empty())
        })
        .unwrap_or_else(|| format!("document_{}", id))
}

/// Error text for a failed download: the body's `message`, else the status.
pub fn download_error_message(error: &ApiError) -> String {
    let message = error
        .envelope()
        .and_then(|envelope| envelope.message.clone())
        .filter(|m| !m.trim().is_empty());

    match (message, error.status()) {
        (Some(message), _) => message,
        (None, Some(status)) => format!("Download failed ({}).", status.as_u16()),
        (None, None) => "Download failed.".to_string(),
    }
}

impl DownloadBody {
    /// Whether the response already names the file.
    pub fn has_filename(&self) -> bool {
        self.content_disposition
            .as_deref()
            .and_then(filename_from_disposition)
            .is_some()
    }

    pub fn into_file(self, known: Option<&Document>, id: &str) -> DownloadedFile {
        DownloadedFile {
            filename: resolve_filename(self.content_disposition.as_deref(), known, id),
            content_type: self.content_type,
            bytes: self.bytes,
        }
    }
}
