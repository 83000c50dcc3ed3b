//! HTTP surface of the functions, backed by the in-memory store.

use objstore_fn::config::FunctionConfig;
use objstore_fn::server::{router, AppState};
use objstore_fn::storage::InMemoryStorage;
use objstore_fn::OciClientFactory;

async fn spawn(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn function_config() -> FunctionConfig {
    FunctionConfig {
        namespace: "ns".to_string(),
        ..FunctionConfig::default()
    }
}

#[tokio::test]
async fn put_get_list_over_http() {
    let store = InMemoryStorage::new();
    store.create_bucket("ns", "demo").await;
    let base = spawn(AppState::new(&function_config(), &store)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/put", base))
        .json(&serde_json::json!({ "bucketName": "demo", "name": "hello.txt", "content": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let text = resp.text().await.unwrap();
    assert!(text.starts_with("Successfully submitted Put request for object hello.txt in bucket demo."));
    assert!(!text.trim_end().ends_with("OPC request ID is"));

    let resp = client
        .post(format!("{}/get", base))
        .json(&serde_json::json!({ "bucketName": "demo", "name": "hello.txt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "hi");

    let resp = client
        .post(format!("{}/list", base))
        .body("demo")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let names: Vec<String> = resp.json().await.unwrap();
    assert_eq!(names, vec!["hello.txt"]);

    let resp = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let health: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["handlers"]["put"], true);
}

#[tokio::test]
async fn errors_keep_legacy_bodies() {
    let store = InMemoryStorage::new();
    store.create_bucket("ns", "demo").await;
    let base = spawn(AppState::new(&function_config(), &store)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/get", base))
        .json(&serde_json::json!({ "bucketName": "demo", "name": "missing.txt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert!(resp.text().await.unwrap().starts_with("Error fetching object "));

    let resp = client
        .post(format!("{}/list", base))
        .json(&serde_json::json!({ "bucketName": "absent" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let names: Vec<String> = resp.json().await.unwrap();
    assert!(names.is_empty());

    let resp = client
        .post(format!("{}/put", base))
        .json(&serde_json::json!({ "bucketName": "demo", "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{}/put", base))
        .json(&serde_json::json!({ "bucketName": "demo", "name": "no-content.txt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(resp.text().await.unwrap().starts_with("Error storing object in bucket "));
}

#[tokio::test]
async fn uninitialized_handlers_answer_failed() {
    // No credentials at all: every handler stays uninitialized.
    let base = spawn(AppState::new(&function_config(), &OciClientFactory)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/get", base))
        .json(&serde_json::json!({ "bucketName": "b", "name": "o" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    assert_eq!(resp.text().await.unwrap(), "FAILED");

    let resp = client
        .post(format!("{}/list", base))
        .body("b")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let names: Vec<String> = resp.json().await.unwrap();
    assert!(names.is_empty());

    let resp = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(resp.status(), 503);
    let health: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(health["status"], "degraded");
}
