//! Integration tests for the storefront HTTP client

use serde_json::json;
use std::time::Duration;
use storefront_core::ApiConfig;
use storefront_http::client::{ApiClient, error::ClientError};
use storefront_http::types::{ConfirmRequest, LoginRequest};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_client_builder() {
    let client = ApiClient::builder()
        .base_url("http://localhost:8000/api/")
        .timeout(Duration::from_secs(5))
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000/api");
    assert_eq!(client.auth_path("/token/"), "/auth/token/");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = ApiClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_client_from_config() {
    let config = ApiConfig {
        base_url: "https://shop.example.com/api".to_string(),
        auth_prefix: "/users/".to_string(),
        ..ApiConfig::default()
    };
    let client = ApiClient::from_config(&config).unwrap();
    assert_eq!(client.base_url(), "https://shop.example.com/api");
    assert_eq!(client.auth_path("/token/refresh/"), "/users/token/refresh/");
}

#[tokio::test]
async fn test_login_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"phone": "+10000000000", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "A1",
            "refresh": "R1",
            "first_name": "Ann"
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let pair = client
        .obtain_token(&LoginRequest {
            phone: "+10000000000".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(pair.access, "A1");
    assert_eq!(pair.refresh, "R1");
    assert_eq!(pair.first_name.as_deref(), Some("Ann"));
}

#[tokio::test]
async fn test_confirm_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/confirm/"))
        .and(body_json(json!({"phone": "+10000000000", "code": "1234"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": {"token": {"access": "A1", "refresh": "R1", "first_name": "Ann"}}
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let response = client
        .confirm_code(&ConfirmRequest {
            phone: "+10000000000".to_string(),
            code: "1234".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.status, json!(true));
    assert_eq!(response.into_token().unwrap().refresh, "R1");
}

#[tokio::test]
async fn test_refresh_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let response = client.refresh_access("R1").await.unwrap();
    assert_eq!(response.access, "A2");
}

#[tokio::test]
async fn test_bearer_token_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let request = client.request_with_token(reqwest::Method::GET, "/cart/", Some("A1"));
    let response: serde_json::Value = client.execute(request).await.unwrap();
    assert_eq!(response["items"], json!([]));
}

#[tokio::test]
async fn test_empty_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/cart-item/7/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let request = client.request(reqwest::Method::DELETE, "/cart-item/7/");
    let result: Result<(), ClientError> = client.execute(request).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("No active account"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products/999/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();

    let result = client
        .obtain_token(&LoginRequest {
            phone: "+10000000000".to_string(),
            password: "wrong".to_string(),
        })
        .await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(ref m)) if m == "No active account"));

    let result = client.product(999).await;
    assert!(matches!(result, Err(ClientError::NotFound(_))));

    let result = client.products().await;
    assert!(matches!(
        result,
        Err(ClientError::ServerError { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "A2"})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let result = client.refresh_access("R1").await;
    assert!(matches!(result, Err(ClientError::Serialization(_))));
}
