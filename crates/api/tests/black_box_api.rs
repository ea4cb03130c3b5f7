use std::sync::Arc;

use chrono::{TimeZone, Utc};
use labregister_items::{ItemDraft, ItemStore};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    store: Arc<ItemStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let store = Arc::new(ItemStore::new());
        let app = labregister_api::app::build_app(store.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_item(
    client: &reqwest::Client,
    srv: &TestServer,
    body: serde_json::Value,
) -> serde_json::Value {
    let res = client.post(srv.url("/items")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_returns_created_with_location_and_item() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/items"))
        .json(&json!({
            "name": "Item 1",
            "attributes": {"year": "2019", "color": "black", "size": "S"}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(reqwest::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body: serde_json::Value = res.json().await.unwrap();

    let id = body["id"].as_str().unwrap();
    assert_eq!(location, format!("/items/{id}"));
    assert_eq!(body["name"], "Item 1");
    assert_eq!(body["versionNumber"], 1);
    assert_eq!(body["attributes"]["year"], "2019");
    assert_eq!(body["attributes"]["color"], "black");
    assert_eq!(body["attributes"]["size"], "S");
    assert_eq!(body["creationDate"], body["lastUpdateDate"]);

    let res = client.get(srv.url(&location)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["id"], body["id"]);
}

#[tokio::test]
async fn create_rejects_blank_name_and_blank_keys() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for body in [
        json!({"name": ""}),
        json!({}),
        json!({"name": "Item", "attributes": {" ": "v"}}),
    ] {
        let res = client.post(srv.url("/items")).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: serde_json::Value = res.json().await.unwrap();
        assert_eq!(err["error"], "validation_error");
    }

    assert!(srv.store.is_empty());
}

#[tokio::test]
async fn list_is_newest_first() {
    let srv = TestServer::spawn().await;
    for (n, secs) in [(1, 100), (2, 200), (3, 300)] {
        let at = Utc.timestamp_opt(1_600_000_000 + secs, 0).unwrap();
        srv.store
            .create_at(ItemDraft::new(format!("Item {n}")), at)
            .unwrap();
    }

    let res = reqwest::get(srv.url("/items")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Item 3", "Item 2", "Item 1"]);
}

#[tokio::test]
async fn update_creates_version_and_history_is_newest_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_item(&client, &srv, json!({"name": "Item 1", "attributes": {"a": "1"}})).await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .put(srv.url(&format!("/items/{id}")))
        .json(&json!({"id": id, "name": "Renamed", "attributes": {"a": "1"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["versionNumber"], 2);
    assert_eq!(updated["name"], "Renamed");

    let res = client
        .get(srv.url(&format!("/items/{id}/versions")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let versions: serde_json::Value = res.json().await.unwrap();
    let versions = versions.as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["versionNumber"], 2);
    assert_eq!(versions[0]["name"], "Renamed");
    assert_eq!(versions[1]["versionNumber"], 1);
    assert_eq!(versions[1]["name"], "Item 1");
    assert!(versions[0].get("versionDate").is_some());
}

#[tokio::test]
async fn identical_update_keeps_version() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_item(&client, &srv, json!({"name": "Item 1", "attributes": {"a": "1"}})).await;
    let id = created["id"].as_str().unwrap();

    for _ in 0..2 {
        let res = client
            .put(srv.url(&format!("/items/{id}")))
            .json(&json!({"id": id, "name": "Item 1", "attributes": {"a": "1"}}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["versionNumber"], 1);
        assert_eq!(body["lastUpdateDate"], created["lastUpdateDate"]);
    }

    let res = client
        .get(srv.url(&format!("/items/{id}/versions")))
        .send()
        .await
        .unwrap();
    let versions: serde_json::Value = res.json().await.unwrap();
    assert_eq!(versions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_errors_map_to_status_codes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let a = create_item(&client, &srv, json!({"name": "a"})).await;
    let b = create_item(&client, &srv, json!({"name": "b"})).await;
    let a_id = a["id"].as_str().unwrap();

    // Unknown id.
    let res = client
        .put(srv.url("/items/nonexistent-id"))
        .json(&json!({"id": "nonexistent-id", "name": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "not_found");

    // Path/body id mismatch.
    let res = client
        .put(srv.url(&format!("/items/{a_id}")))
        .json(&json!({"id": b["id"], "name": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Blank name.
    let res = client
        .put(srv.url(&format!("/items/{a_id}")))
        .json(&json!({"id": a_id, "name": "  "}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_item_reads_are_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/items/missing", "/items/missing/versions"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path: {path}");
    }
}
