//! Integration tests for the API client using wiremock.
//!
//! These tests mock the backend to verify request shapes, the token
//! header, and the transport/format error split.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use docvault_core::auth::MemoryTokenStore;
use docvault_core::models::{
    ApiResponse, DocumentMetadata, DocumentUpload, SearchCriteria, TagRef, UploadFile,
};
use docvault_core::{ApiClient, ApiError, RequestSequence, SessionManager};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri()).expect("client builds")
}

mod otp_tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_otp_single_post_returns_payload_verbatim() {
        let mock_server = MockServer::start().await;
        let body = r#"{"status": "success", "message": "OTP sent", "data": {"expires_in": 120}, "trace": "t-1"}"#;

        Mock::given(method("POST"))
            .and(path("/generateOTP"))
            .and(body_json(json!({"mobile_number": "9876543210"})))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let response = client.generate_otp("9876543210").await.unwrap();

        let expected: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(response.raw(), &expected);
        assert_eq!(response.raw()["status"], json!("success"));
        assert!(response.is_success());
        assert_eq!(response.extra.get("trace"), Some(&json!("t-1")));

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("token").is_none());
    }

    #[tokio::test]
    async fn test_generate_otp_failure_status_in_body_is_not_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generateOTP"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": false, "message": "Number not registered"})),
            )
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server).generate_otp("0000000000").await.unwrap();
        assert!(!response.is_success());
        assert_eq!(response.message.as_deref(), Some("Number not registered"));
    }

    #[tokio::test]
    async fn test_validate_otp_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/validateOTP"))
            .and(body_json(json!({"mobile_number": "9876543210", "otp": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "data": {"token": "abc", "user_name": "Bob", "user_id": 1}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .validate_otp("9876543210", "123456")
            .await
            .unwrap();
        assert!(response.is_success());

        let verification = response.data().unwrap().expect("data present");
        assert_eq!(verification.token, "abc");
        assert_eq!(verification.user_name.as_deref(), Some("Bob"));
        assert_eq!(verification.user_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_validate_otp_non_2xx_is_transport_error_before_parsing() {
        let mock_server = MockServer::start().await;

        // Body is not JSON: a parse attempt would produce a Format error
        Mock::given(method("POST"))
            .and(path("/validateOTP"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .validate_otp("9876543210", "123456")
            .await
            .unwrap_err();

        match err {
            ApiError::Transport { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validate_otp_invalid_json_is_format_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/validateOTP"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .validate_otp("9876543210", "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Format { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_array_message_is_returned_not_format_error() {
        let mock_server = MockServer::start().await;
        let payload = json!({"status": false, "message": ["mobile_number is required"]});

        Mock::given(method("POST"))
            .and(path("/generateOTP"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server).generate_otp("").await.unwrap();
        assert!(!response.is_success());
        assert!(response.message.is_none());
        assert_eq!(response.message_or("Failed to send OTP"), "Failed to send OTP");
        assert_eq!(response.raw(), &payload);
    }

    #[tokio::test]
    async fn test_non_object_body_is_returned_not_format_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/documentTags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .get_document_tags("x", "abc")
            .await
            .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.raw(), &json!([]));
        assert!(response.data().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is not served by anything in tests
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.generate_otp("9876543210").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    }
}

mod document_tests {
    use super::*;

    fn sample_upload() -> DocumentUpload {
        DocumentUpload {
            file: UploadFile::new("scan.png", b"fake-png-bytes".to_vec()),
            metadata: DocumentMetadata {
                major_head: "Professional".to_string(),
                minor_head: "HR".to_string(),
                document_date: date(2024, 3, 5),
                document_remarks: "offer letter".to_string(),
                tags: TagRef::from_names(["hiring"]),
                user_id: Some("1".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_with_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/saveDocumentEntry"))
            .and(header("token", "abc"))
            .and(body_string_contains("name=\"file\"; filename=\"scan.png\""))
            .and(body_string_contains("name=\"data\""))
            .and(body_string_contains(r#""document_date":"05-03-2024""#))
            .and(body_string_contains(r#""tags":[{"tag_name":"hiring"}]"#))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": true, "message": "Saved"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .upload_document(&sample_upload(), "abc")
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.message_or("x"), "Saved");
    }

    #[tokio::test]
    async fn test_upload_requires_heads_before_sending() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut upload = sample_upload();
        upload.metadata.minor_head.clear();

        let err = client_for(&mock_server)
            .upload_document(&upload, "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_document_tags_sends_term_and_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/documentTags"))
            .and(header("token", "abc"))
            .and(body_json(json!({"term": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "data": [{"id": "invoice"}, {"id": 7, "label": "seven"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .get_document_tags("", "abc")
            .await
            .unwrap();
        let ids: Vec<String> = response
            .data()
            .unwrap()
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["invoice", "7"]);
    }

    #[tokio::test]
    async fn test_search_documents_body_and_results() {
        let mock_server = MockServer::start().await;

        let criteria = SearchCriteria {
            major_head: "Personal".to_string(),
            minor_head: "John".to_string(),
            from_date: date(2024, 1, 1),
            to_date: date(2024, 3, 5),
            tags: TagRef::from_names(["rent"]),
            ..SearchCriteria::default()
        };

        Mock::given(method("POST"))
            .and(path("/searchDocumentEntry"))
            .and(header("token", "abc"))
            .and(body_json(json!({
                "major_head": "Personal",
                "minor_head": "John",
                "from_date": "01-01-2024",
                "to_date": "05-03-2024",
                "tags": [{"tag_name": "rent"}],
                "uploaded_by": "",
                "start": 0,
                "length": 10,
                "filterId": "",
                "search": {"value": ""}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "data": [{
                    "document_id": 5,
                    "document_date": "02-02-2024",
                    "document_remarks": "lease",
                    "file_url": "https://files.example/lease.pdf",
                    "major_head": "Personal",
                    "minor_head": "John",
                    "file_name": "lease.pdf",
                    "uploaded_by": "Bob"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .search_documents(&criteria, "abc")
            .await
            .unwrap();
        let items = response.data().unwrap().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].document_id, 5);
        assert_eq!(items[0].uploaded_by.as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn test_download_document_writes_file() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/files/lease.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 test".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/files/lease.pdf?sig=1", mock_server.uri());
        let saved = client_for(&mock_server)
            .download_document(&url, None, dir.path())
            .await
            .unwrap();

        assert_eq!(saved, dir.path().join("lease.pdf"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.4 test");

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("token").is_none());
    }

    #[tokio::test]
    async fn test_download_document_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/files/missing.pdf", mock_server.uri());
        let err = client_for(&mock_server)
            .download_document(&url, Some("missing.pdf"), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport { .. }));
        assert!(!dir.path().join("missing.pdf").exists());
    }
}

mod session_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_otp_login_then_authenticated_search() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/validateOTP"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "data": {"token": "tok-1", "user_name": "Bob", "user_id": "u1"}
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/searchDocumentEntry"))
            .and(header("token", "tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true, "data": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let mut session = SessionManager::new(MemoryTokenStore::new());
        session.restore();
        assert!(session.require_token().is_err());

        let verification = client
            .validate_otp("9876543210", "123456")
            .await
            .unwrap()
            .data()
            .unwrap()
            .unwrap();
        let _ = session.login(verification.token, verification.user_name, verification.user_id);

        let token = session.require_token().unwrap();
        let response = client
            .search_documents(&SearchCriteria::default(), token)
            .await
            .unwrap();
        assert!(response.data().unwrap().unwrap().is_empty());
        assert_eq!(session.user().id.as_deref(), Some("u1"));
    }
}

mod ordering_tests {
    use super::*;

    async fn mount_tag_responses(server: &MockServer) {
        // The first (older) request answers slowly, the second quickly
        Mock::given(method("POST"))
            .and(path("/documentTags"))
            .and(body_json(json!({"term": "in"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": true, "data": [{"id": "stale"}]}))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/documentTags"))
            .and(body_json(json!({"term": "inv"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": true, "data": [{"id": "fresh"}]})),
            )
            .mount(server)
            .await;
    }

    fn first_id(response: ApiResponse<Vec<docvault_core::models::DocumentTag>>) -> String {
        response.data().unwrap().unwrap().remove(0).id
    }

    /// Responses applied in completion order: the slower, older request
    /// overwrites the newer one. This is the expected default behavior.
    #[tokio::test]
    async fn test_overlapping_tag_lookups_last_response_wins() {
        let mock_server = MockServer::start().await;
        mount_tag_responses(&mock_server).await;

        let client = client_for(&mock_server);
        let shown = Arc::new(Mutex::new(String::new()));

        let older = {
            let (client, shown) = (client.clone(), shown.clone());
            async move {
                let response = client.get_document_tags("in", "abc").await.unwrap();
                *shown.lock().unwrap() = first_id(response);
            }
        };
        let newer = {
            let (client, shown) = (client.clone(), shown.clone());
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                let response = client.get_document_tags("inv", "abc").await.unwrap();
                *shown.lock().unwrap() = first_id(response);
            }
        };
        tokio::join!(older, newer);

        assert_eq!(*shown.lock().unwrap(), "stale");
    }

    /// With a request sequence, the older response is discarded.
    #[tokio::test]
    async fn test_overlapping_tag_lookups_with_sequence() {
        let mock_server = MockServer::start().await;
        mount_tag_responses(&mock_server).await;

        let client = client_for(&mock_server);
        let sequence = Arc::new(RequestSequence::new());
        let shown = Arc::new(Mutex::new(String::new()));

        let older = {
            let (client, shown, sequence) = (client.clone(), shown.clone(), sequence.clone());
            async move {
                let ticket = sequence.issue();
                let response = client.get_document_tags("in", "abc").await.unwrap();
                if sequence.is_current(ticket) {
                    *shown.lock().unwrap() = first_id(response);
                }
            }
        };
        let newer = {
            let (client, shown, sequence) = (client.clone(), shown.clone(), sequence.clone());
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                let ticket = sequence.issue();
                let response = client.get_document_tags("inv", "abc").await.unwrap();
                if sequence.is_current(ticket) {
                    *shown.lock().unwrap() = first_id(response);
                }
            }
        };
        tokio::join!(older, newer);

        assert_eq!(*shown.lock().unwrap(), "fresh");
    }
}
