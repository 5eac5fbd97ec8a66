//! End-to-end webhook tests against mocked Notion and Gemini endpoints.

mod common;

use axum::http::StatusCode;
use common::{gemini_reply, page_payload, paragraphs, TestHarness, TEST_MODEL};
use server_core::kernel::{BasePropertyStore, MemoryPropertyStore, NOTION_TOKEN};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn generate_path() -> String {
    format!("/v1beta/models/{TEST_MODEL}:generateContent")
}

#[tokio::test]
async fn test_comment_is_generated_and_posted() {
    let harness = TestHarness::new().await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .and(header("authorization", "Bearer secret_test"))
        .and(header("notion-version", "2022-06-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paragraphs(&["Hello"])))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(query_param("key", "gemini_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("いいね!")))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/comments"))
        .and(header("authorization", "Bearer secret_test"))
        .and(body_json(serde_json::json!({
            "parent": {"page_id": "p1"},
            "rich_text": [{"type": "text", "text": {"content": "いいね!"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"object": "comment"})))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let (status, body) = harness.post_webhook(page_payload("p1", "T")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["comment"], "いいね!");
    assert!(body["message"].as_str().unwrap().contains("投稿されました"));

    // Prompt carries title and body
    let requests = harness.upstream.received_requests().await.unwrap();
    let generate = requests
        .iter()
        .find(|r| r.url.path() == generate_path())
        .expect("generateContent was called");
    let sent: serde_json::Value = serde_json::from_slice(&generate.body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("タイトル: T"));
    assert!(prompt.contains("本文:\nHello"));
}

#[tokio::test]
async fn test_comment_rejection_reports_status_code() {
    let harness = TestHarness::new().await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paragraphs(&["Hello"])))
        .mount(&harness.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("いいね!")))
        .mount(&harness.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/comments"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "object": "error", "status": 400, "code": "validation_error"
        })))
        .mount(&harness.upstream)
        .await;

    let (status, body) = harness.post_webhook(page_payload("p1", "T")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body.get("comment").is_none());
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("ステータスコード: 400"), "message: {message}");
    assert!(message.contains("validation_error"));
}

#[tokio::test]
async fn test_missing_page_id_makes_no_upstream_calls() {
    let harness = TestHarness::new().await;

    let (status, body) = harness
        .post_webhook(serde_json::json!({"data": {"properties": {}}}).to_string())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("ページID"));
    assert!(harness.upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_title_skips_generation() {
    let harness = TestHarness::new().await;

    let payload = serde_json::json!({
        "data": {"id": "p1", "properties": {"Tags": {"type": "multi_select", "multi_select": []}}}
    });
    let (_, body) = harness.post_webhook(payload.to_string()).await;

    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("タイトルまたは本文"));

    let requests = harness.upstream.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != generate_path()));
    assert!(requests.iter().all(|r| r.url.path() != "/v1/comments"));
}

#[tokio::test]
async fn test_content_fetch_error_reads_as_missing_body() {
    let harness = TestHarness::new().await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .respond_with(ResponseTemplate::new(404).set_body_string("object_not_found"))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let (_, body) = harness.post_webhook(page_payload("p1", "T")).await;

    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "タイトルまたは本文が見つかりません");
}

#[tokio::test]
async fn test_gemini_without_candidates_is_generation_failure() {
    let harness = TestHarness::new().await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paragraphs(&["Hello"])))
        .mount(&harness.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})))
        .mount(&harness.upstream)
        .await;

    let (_, body) = harness.post_webhook(page_payload("p1", "T")).await;

    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "コメント生成に失敗しました: Geminiからのレスポンスが不正です"
    );
}

#[tokio::test]
async fn test_missing_gemini_key_is_reported() {
    let harness =
        TestHarness::with_properties(MemoryPropertyStore::with_entries([(NOTION_TOKEN, "secret_test")]))
            .await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paragraphs(&["Hello"])))
        .mount(&harness.upstream)
        .await;

    let (_, body) = harness.post_webhook(page_payload("p1", "T")).await;

    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "GEMINI_API_KEY が設定されていません");
    let requests = harness.upstream.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != generate_path()));
}

#[tokio::test]
async fn test_malformed_json_still_gets_envelope() {
    let harness = TestHarness::new().await;

    let (status, body) = harness.post_webhook("{\"data\":").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_errors_are_recorded_in_debug_log_when_enabled() {
    let harness = TestHarness::new().await;
    harness
        .properties
        .set("LOGGING_ENABLED", "true")
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&harness.upstream)
        .await;

    harness.post_webhook(page_payload("p1", "T")).await;

    let keys = harness.properties.keys_with_prefix("log_").await.unwrap();
    let mut values = Vec::new();
    for key in keys {
        values.push(harness.properties.get(&key).await.unwrap().unwrap_or_default());
    }
    assert!(values.iter().any(|v| v.starts_with("本文抽出エラー:") && v.contains("pageId: p1")));
}

#[tokio::test]
async fn test_health() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let harness = TestHarness::new().await;
    let response = harness
        .app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
