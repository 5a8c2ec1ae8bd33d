//! HTTP-level tests for the notebook client against a wiremock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use metrodoc::api::{ApiError, NotebookApi, NotebookClient};

fn client(server: &MockServer) -> NotebookClient {
    NotebookClient::new(&server.uri(), Duration::from_secs(5))
}

#[tokio::test]
async fn test_list_notebooks_parses_stringified_sizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notebooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1756400000000i64,
                "title": "Curriculum",
                "date": "Aug 29, 2026",
                "sources": [
                    {"name": "syllabus.pdf", "size": "2560", "type": "application/pdf"},
                    {"name": "notes.txt", "size": 100}
                ]
            }
        ])))
        .mount(&server)
        .await;

    let notebooks = client(&server).list_notebooks().await.unwrap();
    assert_eq!(notebooks.len(), 1);
    assert_eq!(notebooks[0].sources[0].size, 2560);
    assert_eq!(notebooks[0].sources[1].size, 100);
}

#[tokio::test]
async fn test_get_notebook_404_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notebooks/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Notebook not found"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).get_notebook(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.user_message().contains("Notebook not found"));
}

#[tokio::test]
async fn test_server_error_prefers_json_detail() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notebooks/1/sources/a.pdf"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "disk on fire"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).delete_source(1, "a.pdf").await.unwrap_err();
    match err {
        ApiError::Server { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "disk on fire");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_falls_back_to_plain_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notebooks/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("something broke"))
        .mount(&server)
        .await;

    let err = client(&server).delete_notebook(1).await.unwrap_err();
    match err {
        ApiError::Server { detail, .. } => assert_eq!(detail, "something broke"),
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_posts_multipart_to_sources_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notebooks/7/sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .upload_source(7, "plan.pdf", b"pdf bytes".to_vec())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_source_name_percent_encoded_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notebooks/7/sources/course%20plan.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete_source(7, "course plan.pdf")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rename_puts_new_name_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/notebooks/7/sources/a.pdf"))
        .and(body_json(json!({"newName": "plan.pdf"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .rename_source(7, "a.pdf", "plan.pdf")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_notebook_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notebooks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1756400000001i64,
            "title": "New Notebook",
            "date": "Aug 29, 2026",
            "sources": []
        })))
        .mount(&server)
        .await;

    let notebook = metrodoc::core::workflow::new_notebook("New Notebook");
    let created = client(&server).create_notebook(&notebook).await.unwrap();
    assert_eq!(created.title, "New Notebook");
    assert!(created.sources.is_empty());
}

#[tokio::test]
async fn test_network_error_surfaces_as_network_variant() {
    // Point at a closed port.
    let client = NotebookClient::new("http://127.0.0.1:1", Duration::from_secs(1));
    let err = client.list_notebooks().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
