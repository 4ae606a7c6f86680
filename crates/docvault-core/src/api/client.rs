//! API client for the document service REST backend.
//!
//! Every operation is a single POST. The client holds no session state:
//! authenticated calls take the token as an argument and send it in a
//! `token` header. Any valid JSON reply is returned as-is, without
//! inspecting the envelope's `status`.

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    multipart::{Form, Part},
    Client,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{
    ApiResponse, DocumentItem, DocumentTag, DocumentTagsRequest, DocumentUpload,
    GenerateOtpRequest, OtpVerification, SearchCriteria, ValidateOtpRequest,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Header carrying the session token on authenticated requests
pub const TOKEN_HEADER: &str = "token";

const GENERATE_OTP_PATH: &str = "/generateOTP";
const VALIDATE_OTP_PATH: &str = "/validateOTP";
const SAVE_DOCUMENT_PATH: &str = "/saveDocumentEntry";
const DOCUMENT_TAGS_PATH: &str = "/documentTags";
const SEARCH_DOCUMENTS_PATH: &str = "/searchDocumentEntry";

/// API client for the document service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client for the given base URL.
    /// No timeout is set; a hung request only blocks its caller.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client that shares an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token_headers(token: &str) -> Result<HeaderMap, ApiError> {
        let value = HeaderValue::from_str(token)
            .map_err(|_| ApiError::InvalidHeader("token contains invalid characters".to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(TOKEN_HEADER), value);
        Ok(headers)
    }

    /// Status check first, then text, then JSON. A non-success status
    /// never reaches the JSON parser, and only invalid JSON is a format error.
    async fn read_response<T>(response: reqwest::Response) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let text = response.text().await?;
        let value: Value = serde_json::from_str(&text).map_err(|e| ApiError::format(e, &text))?;
        Ok(ApiResponse::from_value(value))
    }

    async fn post_json<T, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.headers(Self::token_headers(token)?);
        }

        let response = request.send().await?;
        debug!(path = path, status = %response.status(), "POST completed");
        Self::read_response(response).await
    }

    // ===== Authentication =====

    /// Ask the backend to send an OTP to a mobile number
    pub async fn generate_otp(&self, mobile_number: &str) -> Result<ApiResponse, ApiError> {
        self.post_json(GENERATE_OTP_PATH, &GenerateOtpRequest { mobile_number }, None)
            .await
    }

    /// Exchange a mobile number and OTP for a session token
    pub async fn validate_otp(
        &self,
        mobile_number: &str,
        otp: &str,
    ) -> Result<ApiResponse<OtpVerification>, ApiError> {
        self.post_json(
            VALIDATE_OTP_PATH,
            &ValidateOtpRequest { mobile_number, otp },
            None,
        )
        .await
    }

    // ===== Documents =====

    /// Upload a file with its metadata as a multipart form
    pub async fn upload_document(
        &self,
        upload: &DocumentUpload,
        token: &str,
    ) -> Result<ApiResponse, ApiError> {
        let metadata = &upload.metadata;
        if upload.file.file_name.trim().is_empty() {
            return Err(ApiError::Validation("Please select a file".to_string()));
        }
        if metadata.major_head.trim().is_empty() || metadata.minor_head.trim().is_empty() {
            return Err(ApiError::Validation(
                "Please select both major and minor head".to_string(),
            ));
        }

        let data = serde_json::to_string(metadata).map_err(|e| ApiError::format(e, ""))?;
        let file_part = Part::bytes(upload.file.bytes.clone())
            .file_name(upload.file.file_name.clone())
            .mime_str(&upload.file.mime_type)
            .map_err(|_| {
                ApiError::Validation(format!("Invalid MIME type: {}", upload.file.mime_type))
            })?;
        let form = Form::new().part("file", file_part).text("data", data);

        let response = self
            .client
            .post(self.url(SAVE_DOCUMENT_PATH))
            .headers(Self::token_headers(token)?)
            .multipart(form)
            .send()
            .await?;
        debug!(
            path = SAVE_DOCUMENT_PATH,
            status = %response.status(),
            bytes = upload.file.bytes.len(),
            "Upload completed"
        );
        Self::read_response(response).await
    }

    /// Look up tag suggestions matching a search term
    pub async fn get_document_tags(
        &self,
        term: &str,
        token: &str,
    ) -> Result<ApiResponse<Vec<DocumentTag>>, ApiError> {
        self.post_json(DOCUMENT_TAGS_PATH, &DocumentTagsRequest { term }, Some(token))
            .await
    }

    /// Search uploaded documents
    pub async fn search_documents(
        &self,
        criteria: &SearchCriteria,
        token: &str,
    ) -> Result<ApiResponse<Vec<DocumentItem>>, ApiError> {
        self.post_json(SEARCH_DOCUMENTS_PATH, criteria, Some(token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("https://docs.example/api/").unwrap();
        assert_eq!(client.base_url(), "https://docs.example/api");
        assert_eq!(client.url(GENERATE_OTP_PATH), "https://docs.example/api/generateOTP");
    }

    #[test]
    fn test_token_headers() {
        let headers = ApiClient::token_headers("abc.def").unwrap();
        assert_eq!(headers.get(TOKEN_HEADER).unwrap(), "abc.def");
        assert!(matches!(
            ApiClient::token_headers("bad\ntoken"),
            Err(ApiError::InvalidHeader(_))
        ));
    }
}
