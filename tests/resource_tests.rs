//! Integration tests for lazily loaded resources.
//!
//! These tests run against a wiremock server and verify the load-once
//! caching contract, failure handling, relation lookup, and the write
//! operations.

use serde_json::json;
use userservice_api::hal::{EmptyApiData, LoadState};
use userservice_api::resources::{UserApiData, UserResource};
use userservice_api::{
    ApiConfig, ApiData, BasicCredentials, DataType, HttpClient, HttpError, Link, Resource,
    ResourceError, ServiceUrl,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_client(server: &MockServer) -> HttpClient {
    let config = ApiConfig::builder()
        .base_url(ServiceUrl::new(format!("{}/api", server.uri())).unwrap())
        .build()
        .unwrap();
    HttpClient::new(&config).unwrap()
}

fn root_link(server: &MockServer) -> Link {
    Link::new("self", format!("{}/api", server.uri())).unwrap()
}

fn root_body(server: &MockServer) -> serde_json::Value {
    json!({
        "_links": {
            "self": {"href": format!("{}/api", server.uri())},
            "users": {"href": format!("{}/api/users{{?page,size,sort,projection}}", server.uri()), "templated": true}
        }
    })
}

fn user_body(server: &MockServer) -> serde_json::Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "enabled": true,
        "registrationDate": "2016-03-01",
        "_links": {
            "self": {"href": format!("{}/api/users/1{{?projection}}", server.uri()), "templated": true}
        }
    })
}

// ============================================================================
// Loading and caching
// ============================================================================

#[tokio::test]
async fn test_repeated_reads_issue_a_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(root_body(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut root: Resource<EmptyApiData> = Resource::new(root_link(&server));
    assert_eq!(root.state(), LoadState::Unloaded);

    let first = root.read(&client).await.unwrap().links().len();
    let second = root.read(&client).await.unwrap().links().len();
    assert_eq!(first, second);
    assert!(root.link_for(&client, "users").await.is_ok());
    assert!(root.is_loaded());
}

#[tokio::test]
async fn test_load_sends_hal_accept_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(header("Accept", "application/hal+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(root_body(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut root: Resource<EmptyApiData> = Resource::new(root_link(&server));
    root.read(&client).await.unwrap();
}

#[tokio::test]
async fn test_load_sends_verbose_accept_header_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(header("Accept", "application/x-spring-data-verbose+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": [
                {"rel": "self", "href": format!("{}/api", server.uri())},
                {"rel": "users", "href": format!("{}/api/users", server.uri())}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ApiConfig::builder()
        .base_url(ServiceUrl::new(format!("{}/api", server.uri())).unwrap())
        .media_type(DataType::SpringDataVerboseJson)
        .build()
        .unwrap();
    let client = HttpClient::new(&config).unwrap();

    let mut root: Resource<EmptyApiData> = Resource::new(root_link(&server));
    let users = root.link_for(&client, "users").await.unwrap();
    assert_eq!(users.href(), format!("{}/api/users", server.uri()));
}

#[tokio::test]
async fn test_load_sends_basic_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(header("Authorization", "Basic YWxpY2U6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(root_body(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let config = ApiConfig::builder()
        .base_url(ServiceUrl::new(format!("{}/api", server.uri())).unwrap())
        .credentials(BasicCredentials::new("alice", "secret").unwrap())
        .build()
        .unwrap();
    let client = HttpClient::new(&config).unwrap();

    let mut root: Resource<EmptyApiData> = Resource::new(root_link(&server));
    root.read(&client).await.unwrap();
}

#[tokio::test]
async fn test_load_expands_templated_self_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let link = Link::new("user", format!("{}/api/users/1{{?projection}}", server.uri())).unwrap();
    let mut user = UserResource::new(link);

    let data = user.read(&client).await.unwrap();
    assert_eq!(data.username.as_deref(), Some("alice"));
    assert_eq!(data.enabled, Some(true));
}

#[tokio::test]
async fn test_response_exposes_status_and_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(root_body(&server))
                .insert_header("X-Request-Id", "req-abc"),
        )
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut root: Resource<EmptyApiData> = Resource::new(root_link(&server));

    let response = root.response(&client).await.unwrap();
    assert_eq!(response.status(), Some(200));
    assert_eq!(response.request_id(), Some("req-abc"));
    assert!(response.link("users").is_some());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_failed_load_is_not_cached_and_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(root_body(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut root: Resource<EmptyApiData> = Resource::new(root_link(&server));

    let error = root.read(&client).await.unwrap_err();
    assert_eq!(error.status(), Some(503));
    match root.state() {
        LoadState::Failed(failure) => assert_eq!(failure.status(), Some(503)),
        other => panic!("expected failed state, got {other:?}"),
    }

    assert!(root.read(&client).await.is_ok());
    assert!(root.is_loaded());
    assert!(matches!(root.state(), LoadState::Loaded(response) if response.status() == Some(200)));
}

#[tokio::test]
async fn test_error_response_message_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "timestamp": "2016-03-01T12:00:00.000+0000",
            "status": 404,
            "error": "Not Found",
            "message": "No user with id 9",
            "path": "/api/users/9"
        })))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let link = Link::new("user", format!("{}/api/users/9", server.uri())).unwrap();
    let mut user = UserResource::new(link);

    let error = user.read(&client).await.unwrap_err();
    match error {
        ResourceError::Http(HttpError::Response(response)) => {
            assert_eq!(response.code, 404);
            assert!(response.message.contains("No user with id 9"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_deserialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut root: Resource<EmptyApiData> = Resource::new(root_link(&server));

    let error = root.read(&client).await.unwrap_err();
    assert!(matches!(
        error,
        ResourceError::Deserialization { resource: "Links", .. }
    ));
    assert!(!root.is_loaded());
}

#[tokio::test]
async fn test_missing_relation_names_relation_and_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(root_body(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut root: Resource<EmptyApiData> = Resource::new(root_link(&server));

    let error = root.link_for(&client, "groups").await.unwrap_err();
    assert!(matches!(error, ResourceError::MalformedResponse { .. }));
    let message = error.to_string();
    assert!(message.contains("groups"));
    assert!(message.contains(&format!("{}/api", server.uri())));

    assert!(!root.has_link(&client, "groups").await.unwrap());
    assert!(root.has_link(&client, "users").await.unwrap());
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_create_posts_entity_and_returns_created_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_body(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let link = Link::new("users", format!("{}/api/users{{?page,size,sort}}", server.uri())).unwrap();
    let users: Resource<UserApiData> = Resource::new(link);

    let mut new_user = UserApiData::with_username("alice");
    new_user.password = Some("secret".to_string());

    let created = users.create(&client, &new_user).await.unwrap().unwrap();
    assert_eq!(created.email.as_deref(), Some("alice@example.com"));
    assert!(created.self_link().is_some());
    assert!(!users.is_loaded());
}

#[tokio::test]
async fn test_create_without_response_body_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let users: Resource<UserApiData> =
        Resource::new(Link::new("users", format!("{}/api/users", server.uri())).unwrap());

    let created = users
        .create(&client, &UserApiData::with_username("bob"))
        .await
        .unwrap();
    assert!(created.is_none());
}

#[tokio::test]
async fn test_update_and_delete_target_entity_self_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(&server)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/users/1"))
        .and(body_json(json!({
            "username": "alice",
            "email": "alice@example.org",
            "enabled": true,
            "registrationDate": "2016-03-01"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut user = UserResource::new(
        Link::new("user", format!("{}/api/users/1{{?projection}}", server.uri())).unwrap(),
    );

    let mut data = user.read(&client).await.unwrap().clone();
    data.email = Some("alice@example.org".to_string());

    user.update(&client, &data).await.unwrap();
    user.delete(&client, &data).await.unwrap();

    // The cached representation is untouched by writes
    let cached = user.read(&client).await.unwrap();
    assert_eq!(cached.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn test_update_without_entity_self_link_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let user = UserResource::new(Link::new("user", format!("{}/api/users/1", server.uri())).unwrap());

    let error = user
        .update(&client, &UserApiData::with_username("alice"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ResourceError::MalformedResponse { ref rel, .. } if rel == "self"
    ));
}
