//! End-to-end tests against a server bound to an ephemeral port.

use std::sync::Arc;

use roster_lib::RosterClient;
use roster_lib::auth::MemoryTokenStore;
use roster_lib::auth::SessionContext;
use roster_lib::auth::SessionState;
use roster_lib::auth::TokenStore;
use roster_lib::error::AuthError;
use roster_lib::error::Error;
use roster_lib::filter::FilterState;
use roster_lib::model::RowId;
use roster_server::InMemoryRepository;
use roster_server::Server;
use roster_server::ServerConfig;
use roster_server::ServerHandle;

async fn start() -> ServerHandle {
    let config = ServerConfig::default().with_bind("127.0.0.1:0".parse().unwrap());
    Server::bind(&config, Arc::new(InMemoryRepository::sample()))
        .await
        .unwrap()
        .spawn()
        .unwrap()
}

fn client(server: &ServerHandle) -> (Arc<MemoryTokenStore>, RosterClient) {
    let store = Arc::new(MemoryTokenStore::new());
    let session = Arc::new(SessionContext::new(store.clone()));
    let client = RosterClient::builder()
        .url(server.base_url())
        .session(session)
        .no_cache()
        .build()
        .unwrap();
    (store, client)
}

fn ids(rows: &[roster_lib::model::Row]) -> Vec<RowId> {
    rows.iter().map(|r| r.id.clone()).collect()
}

#[tokio::test]
async fn test_login_then_filter_by_department() {
    let server = start().await;
    let (store, client) = client(&server);

    let login = client.login("test", "test123").await.unwrap();
    assert!(login.success);
    assert!(!login.access_token.is_empty());
    assert_eq!(
        store.load().await.unwrap().map(|t| t.access_token),
        Some(login.access_token)
    );

    let filters = FilterState::new().with("department", "개발팀");
    let listing = client.table_data(&filters).await.unwrap().into_inner();
    assert_eq!(listing.total, 3);
    assert_eq!(
        ids(&listing.data),
        vec![RowId::from(1), RowId::from(4), RowId::from(7)]
    );

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_age_filter_means_at_least() {
    let server = start().await;
    let (_store, client) = client(&server);
    client.login("test", "test123").await.unwrap();

    let filters = FilterState::new().with("age", "30");
    let listing = client.table_data(&filters).await.unwrap().into_inner();
    assert!(!listing.data.is_empty());
    for row in &listing.data {
        assert!(row.value("age").as_f64().unwrap() >= 30.0);
    }
    assert_eq!(
        ids(&listing.data),
        vec![
            RowId::from(1),
            RowId::from(3),
            RowId::from(5),
            RowId::from(7),
            RowId::from(8)
        ]
    );

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_no_filters_returns_every_row() {
    let server = start().await;
    let (_store, client) = client(&server);
    client.login("test", "test123").await.unwrap();

    let listing = client.table_data(&FilterState::new()).await.unwrap().into_inner();
    assert_eq!(listing.total, 8);
    assert_eq!(listing.data.len(), 8);

    let columns = client.column_info().await.unwrap().into_inner();
    assert_eq!(columns.len(), 9);
    assert_eq!(columns[0].key, "name");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let server = start().await;
    let (store, client) = client(&server);

    let err = client.login("test", "nope").await.unwrap_err();
    match err {
        Error::Auth(AuthError::InvalidCredentials { message }) => {
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(store.load().await.unwrap().is_none());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let server = start().await;
    let http = reqwest::Client::new();

    let response = http
        .get(format!("{}/tasks/table-data", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["message"], roster_server::MISSING_TOKEN);

    let response = http
        .get(format!("{}/tasks/column-info", server.base_url()))
        .header("Authorization", "Bearer not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], roster_server::INVALID_TOKEN);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rejected_token_revokes_the_session() {
    let server = start().await;
    let (store, client) = client(&server);

    store
        .save(&roster_lib::auth::AccessToken::new("forged"))
        .await
        .unwrap();
    assert!(client.session().restore().await.unwrap());

    let err = client.table_data(&FilterState::new()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(store.load().await.unwrap().is_none());
    assert!(matches!(
        client.session().state().await,
        SessionState::Revoked(_)
    ));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_login_sets_token_cookie() {
    let server = start().await;
    let response = reqwest::Client::new()
        .post(format!("{}/auth/login", server.base_url()))
        .json(&serde_json::json!({ "username": "test", "password": "test123" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("Max-Age=3600"));
    assert!(cookie.contains("SameSite=Strict"));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let server = start().await;
    let http = reqwest::Client::new();

    let response = http
        .get(format!("{}/nope", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = http
        .get(format!("{}/auth/login", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);

    server.shutdown().await.unwrap();
}
