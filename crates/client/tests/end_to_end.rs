//! Full-flow tests: a real API server on an ephemeral port, driven through
//! the HTTP client, the session store, and the route guard.

use std::net::SocketAddr;
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;

use evendiona_api::auth::credentials::AdminCredentials;
use evendiona_api::auth::jwt::{issue_token, issue_token_at, JwtConfig, TOKEN_VALIDITY_SECS};
use evendiona_api::config::ServerConfig;
use evendiona_api::router::build_app_router;
use evendiona_api::state::AppState;
use evendiona_client::api::ApiClient;
use evendiona_client::config::ClientConfig;
use evendiona_client::error::ClientError;
use evendiona_client::guard::{GuardState, RedirectReason, RouteGuard};
use evendiona_client::session::{SessionKind, SessionRecord, SessionStore};
use evendiona_client::storage::{FileStorage, MemoryStorage};
use evendiona_core::roles::Role;

const SECRET: &str = "end-to-end-secret-long-enough";

fn server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig::new(SECRET).unwrap(),
        admin: AdminCredentials::new("admin", "correct-pw").unwrap(),
    }
}

/// Start the API on an ephemeral port and return its address.
async fn spawn_server() -> SocketAddr {
    let app = build_app_router(AppState::new(server_config())).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(format!("http://{addr}"))
}

fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(&config_for(addr)).unwrap()
}

fn admin_store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryStorage::new()), SessionKind::Admin)
}

#[tokio::test]
async fn wrong_password_is_rejected_and_nothing_is_stored() {
    let client = client_for(spawn_server().await);
    let store = admin_store();

    let result = client.admin_sign_in(&store, "admin", "wrong").await;

    assert_matches!(result, Err(ClientError::Unauthenticated(_)));
    assert_eq!(store.current(), None);
}

#[tokio::test]
async fn empty_password_is_a_validation_error() {
    let client = client_for(spawn_server().await);

    let result = client.admin_login("admin", "").await;
    assert_matches!(result, Err(ClientError::Validation(_)));
}

#[tokio::test]
async fn sign_in_then_guard_authorizes_admin() {
    let config = config_for(spawn_server().await);
    let client = ApiClient::new(&config).unwrap();
    let store = admin_store();

    let record = client
        .admin_sign_in(&store, "admin", "correct-pw")
        .await
        .expect("correct credentials should sign in");
    assert_eq!(record.role, Role::Admin);
    assert_eq!(store.current(), Some(record));

    let guard = RouteGuard::from_config(Arc::new(client), Role::Admin, &config);
    let mut mount = guard.mount(&store);

    match mount.settled().await {
        GuardState::Authorized(identity) => {
            assert_eq!(identity.username, "admin");
            assert_eq!(identity.role, Role::Admin);
        }
        other => panic!("expected Authorized, got {other:?}"),
    }
}

#[tokio::test]
async fn me_reports_admin_role_for_issued_token() {
    let client = client_for(spawn_server().await);

    let token = client.admin_login("admin", "correct-pw").await.unwrap();
    let identity = client.me(&token).await.unwrap();

    assert_eq!(identity.role, Role::Admin);
}

#[tokio::test]
async fn expired_token_makes_guard_redirect() {
    let client = client_for(spawn_server().await);
    let store = admin_store();

    let issued_at = Utc::now().timestamp() - 3 * TOKEN_VALIDITY_SECS;
    let stale = issue_token_at("admin", Role::Admin, issued_at, &JwtConfig::new(SECRET).unwrap())
        .unwrap();
    store.login(SessionRecord::admin("admin", stale)).unwrap();

    let guard = RouteGuard::new(Arc::new(client), Role::Admin);
    let mut mount = guard.mount(&store);

    assert_matches!(
        mount.settled().await,
        GuardState::Redirect(RedirectReason::Rejected(_))
    );
    // The store does not prune the stale record on its own.
    assert!(store.current().is_some());
}

#[tokio::test]
async fn user_role_token_cannot_open_admin_views() {
    let client = client_for(spawn_server().await);
    let store = admin_store();

    let token = issue_token("shopper@example.com", Role::User, &JwtConfig::new(SECRET).unwrap())
        .unwrap();
    store
        .login(SessionRecord {
            token,
            identity: "shopper@example.com".into(),
            role: Role::User,
        })
        .unwrap();

    let guard = RouteGuard::new(Arc::new(client), Role::Admin);
    assert_eq!(
        guard.check(&store).await,
        GuardState::Redirect(RedirectReason::WrongRole(Role::User))
    );
}

#[tokio::test]
async fn unreachable_server_redirects() {
    // Bind then drop a listener so the port is (almost certainly) closed.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(addr);
    let store = admin_store();
    store.login(SessionRecord::admin("admin", "tok-1")).unwrap();

    let guard = RouteGuard::new(Arc::new(client), Role::Admin);
    assert_matches!(
        guard.check(&store).await,
        GuardState::Redirect(RedirectReason::Unreachable(_))
    );
}

#[tokio::test]
async fn logout_then_guard_redirects_without_calling_server() {
    let client = client_for(spawn_server().await);
    let store = admin_store();
    client
        .admin_sign_in(&store, "admin", "correct-pw")
        .await
        .unwrap();

    store.logout().unwrap();

    let guard = RouteGuard::new(Arc::new(client), Role::Admin);
    let mount = guard.mount(&store);
    assert_eq!(mount.state(), GuardState::Redirect(RedirectReason::NoSession));
}

#[tokio::test]
async fn file_backed_session_survives_restart() {
    let config = config_for(spawn_server().await);
    let client = Arc::new(ApiClient::new(&config).unwrap());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = SessionStore::new(Arc::new(FileStorage::new(&path)), SessionKind::Admin);
    client
        .admin_sign_in(&first, "admin", "correct-pw")
        .await
        .unwrap();
    drop(first);

    let reopened = SessionStore::new(Arc::new(FileStorage::new(&path)), SessionKind::Admin);
    let guard = RouteGuard::from_config(client, Role::Admin, &config);
    assert_matches!(guard.check(&reopened).await, GuardState::Authorized(_));

    reopened.logout().unwrap();
    let after_logout = SessionStore::new(Arc::new(FileStorage::new(&path)), SessionKind::Admin);
    assert_eq!(after_logout.current(), None);
}
