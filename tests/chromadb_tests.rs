//! ChromaDB REST store tests with a mocked server.

#![cfg(feature = "chromadb")]

use ragbot::VectorStore;
use ragbot::db::ChromaDBStore;
use ragbot::types::AppError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION_ID: &str = "2f2b9a52-5e1f-4c39-9f7c-0c1e7e4c6a11";

async fn mount_collection(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/collections/rag_collection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": COLLECTION_ID,
            "name": "rag_collection",
            "metadata": null
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_query_maps_distances_to_scores() {
    let server = MockServer::start().await;
    mount_collection(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/api/v1/collections/{}/query", COLLECTION_ID)))
        .and(body_partial_json(json!({
            "query_embeddings": [[1.0, 0.0]],
            "n_results": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": [["fr", "de"]],
            "documents": [["Paris is the capital of France.", "Berlin is the capital of Germany."]],
            "metadatas": [[{ "source": "capitals.txt" }, null]],
            "distances": [[0.0, 1.0]],
            "embeddings": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = ChromaDBStore::connect(&server.uri(), "rag_collection")
        .await
        .unwrap();
    let results = store.search("rag_collection", &[1.0, 0.0], 3).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].document.id, "fr");
    assert_eq!(results[0].document.content, "Paris is the capital of France.");
    assert_eq!(results[0].document.metadata["source"], "capitals.txt");
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert!((results[1].score - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn test_missing_collection_fails_to_connect() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/collections/rag_collection"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Collection rag_collection does not exist."
        })))
        .mount(&server)
        .await;

    let result = ChromaDBStore::connect(&server.uri(), "rag_collection").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_count_uses_collection_id() {
    let server = MockServer::start().await;
    mount_collection(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/collections/{}/count", COLLECTION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(42)))
        .mount(&server)
        .await;

    let store = ChromaDBStore::connect(&server.uri(), "rag_collection")
        .await
        .unwrap();

    assert_eq!(store.count("rag_collection").await.unwrap(), 42);
    assert!(matches!(
        store.count("other").await,
        Err(AppError::NotFound(_))
    ));
}
