//! Read-only Firestore REST client.

mod auth;
mod client;
mod error;
mod types;

pub use auth::{Credentials, DEFAULT_METADATA_TOKEN_URL};
pub use client::{FirestoreClient, DEFAULT_BASE_URL, DEFAULT_DATABASE};
pub use error::FirestoreError;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BATCH_GET_PATH: &str = "/v1/projects/demo/databases/(default)/documents:batchGet";
    const DOC_NAME: &str = "projects/demo/databases/(default)/documents/Admins/+233244123456";

    fn create_test_client(mock_server: &MockServer, credentials: Credentials) -> FirestoreClient {
        FirestoreClient::new(
            mock_server.uri(),
            "demo",
            DEFAULT_DATABASE,
            credentials,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn static_token() -> Credentials {
        Credentials::Static(SecretString::new("test-token".to_string()))
    }

    fn missing_response() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "missing": DOC_NAME, "readTime": "2024-03-01T10:00:00Z" }
        ]))
    }

    #[tokio::test]
    async fn test_document_found() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!([{
            "found": {
                "name": DOC_NAME,
                "createTime": "2024-03-01T10:00:00.123456Z",
                "updateTime": "2024-03-02T10:00:00Z"
            },
            "readTime": "2024-03-03T10:00:00Z"
        }]);

        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({
                "documents": [DOC_NAME],
                "mask": { "fieldPaths": ["__name__"] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server, static_token());
        assert!(client.document_exists("Admins", "+233244123456").await.unwrap());
    }

    #[tokio::test]
    async fn test_document_missing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .respond_with(missing_response())
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server, static_token());
        assert!(!client.document_exists("Admins", "+233244123456").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_database_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {
                    "code": 404,
                    "message": "The database (default) does not exist for project demo",
                    "status": "NOT_FOUND"
                }
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server, static_token());
        match client.document_exists("Admins", "+233244123456").await {
            Err(FirestoreError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("does not exist"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_result_for_other_document_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "missing": "projects/demo/databases/(default)/documents/Admins/233244123456" }
            ])))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server, static_token());
        let result = client.document_exists("Admins", "+233244123456").await;
        assert!(matches!(result, Err(FirestoreError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {
                    "code": 403,
                    "message": "Missing or insufficient permissions.",
                    "status": "PERMISSION_DENIED"
                }
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server, static_token());
        let result = client.document_exists("Admins", "+233244123456").await;
        match result {
            Err(FirestoreError::PermissionDenied(message)) => {
                assert_eq!(message, "Missing or insufficient permissions.");
            }
            other => panic!("expected PermissionDenied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_without_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server, static_token());
        let result = client.document_exists("Admins", "+233244123456").await;
        assert!(matches!(
            result,
            Err(FirestoreError::Api { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_emulator_sends_owner_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .and(header("Authorization", "Bearer owner"))
            .respond_with(missing_response())
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server, Credentials::Emulator);
        assert!(!client.document_exists("Admins", "+233244123456").await.unwrap());
    }

    #[tokio::test]
    async fn test_metadata_token_is_cached() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/token"))
            .and(header("Metadata-Flavor", "Google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "metadata-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .and(header("Authorization", "Bearer metadata-token"))
            .respond_with(missing_response())
            .expect(2)
            .mount(&mock_server)
            .await;

        let credentials = Credentials::Metadata {
            url: format!("{}/token", mock_server.uri()),
        };
        let client = create_test_client(&mock_server, credentials);

        assert!(!client.document_exists("Admins", "+233244123456").await.unwrap());
        assert!(!client.document_exists("Admins", "+233244123456").await.unwrap());
    }

    #[tokio::test]
    async fn test_metadata_token_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let credentials = Credentials::Metadata {
            url: format!("{}/token", mock_server.uri()),
        };
        let client = create_test_client(&mock_server, credentials);

        let result = client.document_exists("Admins", "+233244123456").await;
        assert!(matches!(result, Err(FirestoreError::Token(_))));
    }

    #[test]
    fn test_document_without_fields() {
        let json = r#"{"name": "projects/demo/databases/(default)/documents/Admins/+233200000000"}"#;

        let document: Document = serde_json::from_str(json).unwrap();
        assert_eq!(document.id(), "+233200000000");
        assert!(document.fields.is_empty());
        assert!(document.create_time.is_none());
    }

    #[test]
    fn test_batch_get_request_serialization() {
        let request = BatchGetRequest {
            documents: vec![DOC_NAME.to_string()],
            mask: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(DOC_NAME));
        assert!(!json.contains("mask"));
    }
}
