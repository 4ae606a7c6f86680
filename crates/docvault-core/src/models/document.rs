use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::wire::{ddmmyyyy, string_or_number};
use crate::utils::format::{is_image, is_pdf};

/// Default page size for document searches
pub const DEFAULT_PAGE_LENGTH: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub tag_name: String,
}

impl TagRef {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Self::new).collect()
    }
}

/// Tag suggestion returned by `/documentTags`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTag {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentTagsRequest<'a> {
    pub term: &'a str,
}

/// The `data` part of an upload, sent as a JSON string next to the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub major_head: String,
    pub minor_head: String,
    #[serde(with = "ddmmyyyy")]
    pub document_date: NaiveDate,
    pub document_remarks: String,
    pub tags: Vec<TagRef>,
    pub user_id: Option<String>,
}

/// A local file ready to be sent as the multipart `file` part
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for_name(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// MIME type from a file name's extension
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub file: UploadFile,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchValue {
    pub value: String,
}

/// Body of `/searchDocumentEntry`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub major_head: String,
    pub minor_head: String,
    #[serde(with = "ddmmyyyy")]
    pub from_date: NaiveDate,
    #[serde(with = "ddmmyyyy")]
    pub to_date: NaiveDate,
    pub tags: Vec<TagRef>,
    pub uploaded_by: String,
    pub start: u32,
    pub length: u32,
    #[serde(rename = "filterId")]
    pub filter_id: String,
    pub search: SearchValue,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            major_head: String::new(),
            minor_head: String::new(),
            from_date: today,
            to_date: today,
            tags: Vec::new(),
            uploaded_by: String::new(),
            start: 0,
            length: DEFAULT_PAGE_LENGTH,
            filter_id: String::new(),
            search: SearchValue::default(),
        }
    }
}

/// One row of a search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub document_id: i64,
    pub document_date: String,
    #[serde(default)]
    pub document_remarks: String,
    pub file_url: String,
    pub major_head: String,
    pub minor_head: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub upload_time: Option<String>,
    #[serde(default)]
    pub row_num: Option<i64>,
    #[serde(default)]
    pub total_count: Option<i64>,
}

impl DocumentItem {
    pub fn heads_display(&self) -> String {
        format!("{} - {}", self.major_head, self.minor_head)
    }

    pub fn preview_kind(&self) -> PreviewKind {
        PreviewKind::for_url(&self.file_url)
    }
}

/// How a document can be shown in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Pdf,
    Unsupported,
}

impl PreviewKind {
    pub fn for_url(url: &str) -> Self {
        if is_image(url) {
            PreviewKind::Image
        } else if is_pdf(url) {
            PreviewKind::Pdf
        } else {
            PreviewKind::Unsupported
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PreviewKind::Image => "image",
            PreviewKind::Pdf => "PDF",
            PreviewKind::Unsupported => "Only image and PDF files can be previewed.",
        }
    }
}
