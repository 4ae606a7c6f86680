//! Data models for the document service.
//!
//! This module contains the request and response bodies exchanged with
//! the backend:
//!
//! - `ApiResponse`: the `{status, message, data}` envelope
//! - `OtpVerification`: token and identity returned by OTP validation
//! - `DocumentMetadata`, `UploadFile`, `DocumentUpload`: upload parts
//! - `SearchCriteria`, `DocumentItem`, `DocumentTag`: search and tag lookup
//! - `MajorHead`: the two-level category picker values

pub mod auth;
pub mod document;
pub mod head;
pub mod response;
pub mod wire;

pub use auth::{GenerateOtpRequest, OtpVerification, ValidateOtpRequest};
pub use document::{
    mime_for_name, DocumentItem, DocumentMetadata, DocumentTag, DocumentTagsRequest,
    DocumentUpload, PreviewKind, SearchCriteria, SearchValue, TagRef, UploadFile,
    DEFAULT_PAGE_LENGTH,
};
pub use head::MajorHead;
pub use response::ApiResponse;
