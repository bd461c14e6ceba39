//! Coverage of the authorization pipeline around protected endpoints: token
//! attachment, the public allow-list, forced sign-out on 401/403, the
//! navigation guards and reload survival of the stored session.

use anyhow::{anyhow, Result};
use carmeet_admin::api::error::ApiError;
use carmeet_admin::api::types::User;
use carmeet_admin::api::{approvals, events, users, ApiClient};
use carmeet_admin::session::guards::{
    require_auth, require_guest, GuardDecision, DASHBOARD_ROUTE, LOGIN_ROUTE,
};
use carmeet_admin::session::{FileBackend, MemoryBackend, SessionState, SessionStore};
use secrecy::SecretString;
use serde_json::json;
use std::net::TcpListener;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Matches requests that carry no Authorization header at all.
struct NoAuthorizationHeader;

impl Match for NoAuthorizationHeader {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

fn sample_user() -> User {
    User {
        id: 1,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "a@b.com".to_string(),
        phone: None,
        profile_photo: None,
        is_active: Some(true),
        role: None,
        created_at: None,
        updated_at: None,
    }
}

fn guest_client(server: &MockServer) -> Result<(Arc<SessionState>, ApiClient)> {
    let session = Arc::new(SessionState::new(SessionStore::new(Arc::new(
        MemoryBackend::new(),
    ))));
    let client = ApiClient::new(&server.uri(), Arc::clone(&session))?;
    Ok((session, client))
}

fn signed_in_client(server: &MockServer, token: &str) -> Result<(Arc<SessionState>, ApiClient)> {
    let (session, client) = guest_client(server)?;
    session.establish(&SecretString::from(token.to_string()), &sample_user())?;
    Ok((session, client))
}

fn users_page_body() -> serde_json::Value {
    json!({
        "success": true,
        "message": "ok",
        "data": {
            "users": [{
                "id": 1,
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "a@b.com",
                "isActive": true
            }],
            "pagination": {"page": 1, "limit": 10, "total": 1, "pages": 1}
        }
    })
}

#[tokio::test]
async fn protected_requests_carry_the_bearer_token() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_page_body()))
        .mount(&server)
        .await;

    let (_, client) = signed_in_client(&server, "tok-1")?;
    let page = users::list(&client, &users::UserFilters::default()).await?;

    assert_eq!(page.users.len(), 1);
    assert_eq!(page.pagination.total, 1);
    Ok(())
}

#[tokio::test]
async fn allow_listed_requests_never_carry_the_token() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    // The mock only matches when the Authorization header is absent, even
    // though a valid token sits in storage.
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(NoAuthorizationHeader)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (_, client) = signed_in_client(&server, "tok-1")?;
    let mut flow = carmeet_admin::api::auth::AuthFlow::new(Arc::new(client));
    flow.login("a@b.com", &SecretString::from("secret".to_string()))
        .await?;
    Ok(())
}

#[tokio::test]
async fn requests_without_a_token_go_out_unmodified() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(NoAuthorizationHeader)
        .respond_with(ResponseTemplate::new(200).set_body_json(users_page_body()))
        .mount(&server)
        .await;

    let (_, client) = guest_client(&server)?;
    let page = users::list(&client, &users::UserFilters::default()).await?;
    assert_eq!(page.users.len(), 1);
    Ok(())
}

#[tokio::test]
async fn forbidden_response_clears_the_session_and_points_at_login() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "message": "forbidden"
        })))
        .mount(&server)
        .await;

    let (session, client) = signed_in_client(&server, "tok-1")?;
    let result = users::list(&client, &users::UserFilters::default()).await;

    match result {
        Err(ApiError::SessionExpired { status: 403 }) => {}
        other => return Err(anyhow!("unexpected outcome: {other:?}")),
    }
    assert!(session.store().token().is_none());
    assert!(session.store().user().is_none());
    assert!(!session.is_authenticated());
    assert_eq!(session.take_redirect(), Some(LOGIN_ROUTE));
    assert_eq!(
        require_auth(&session),
        GuardDecision::Redirect(LOGIN_ROUTE)
    );
    Ok(())
}

#[tokio::test]
async fn unauthorized_response_behaves_like_forbidden() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/events/10/participants/5/status"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false
        })))
        .mount(&server)
        .await;

    let (session, client) = signed_in_client(&server, "tok-1")?;
    let result = approvals::approve(&client, 10, 5).await;

    match result {
        Err(ApiError::SessionExpired { status: 401 }) => {}
        other => return Err(anyhow!("unexpected outcome: {other:?}")),
    }
    assert!(!session.is_authenticated());
    assert_eq!(session.take_redirect(), Some(LOGIN_ROUTE));
    Ok(())
}

#[test]
fn guards_gate_navigation_by_session_state() -> Result<()> {
    let session = SessionState::new(SessionStore::new(Arc::new(MemoryBackend::new())));

    // Scenario A: fresh session.
    assert_eq!(require_guest(&session), GuardDecision::Allow);
    assert_eq!(require_auth(&session), GuardDecision::Redirect(LOGIN_ROUTE));

    session.establish(&SecretString::from("tok-1".to_string()), &sample_user())?;
    assert_eq!(require_auth(&session), GuardDecision::Allow);
    assert_eq!(
        require_guest(&session),
        GuardDecision::Redirect(DASHBOARD_ROUTE)
    );
    Ok(())
}

#[test]
fn sessions_survive_a_restart_through_the_file_backend() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");

    let first = SessionState::new(SessionStore::new(Arc::new(FileBackend::open(&path))));
    first.establish(&SecretString::from("tok-1".to_string()), &sample_user())?;

    let second = SessionState::new(SessionStore::new(Arc::new(FileBackend::open(&path))));
    assert!(second.is_authenticated());
    assert_eq!(second.current_user().map(|user| user.id), Some(1));

    second.clear()?;
    let third = SessionState::new(SessionStore::new(Arc::new(FileBackend::open(&path))));
    assert!(!third.is_authenticated());
    Ok(())
}

/// Matches multipart bodies that contain the given form field name.
struct MultipartField(&'static str);

impl Match for MultipartField {
    fn matches(&self, request: &Request) -> bool {
        let multipart = request
            .headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));
        let marker = format!("name=\"{}\"", self.0);
        multipart && String::from_utf8_lossy(&request.body).contains(&marker)
    }
}

#[tokio::test]
async fn event_create_posts_a_multipart_form() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .and(header("authorization", "Bearer tok-1"))
        .and(MultipartField("name"))
        .and(MultipartField("image"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "id": 10,
                "name": "Sunset Meet",
                "description": "Monthly meet",
                "date": "2026-09-01T18:00:00Z",
                "location": "Pier 7",
                "status": "ACTIVE"
            }
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let photo = dir.path().join("flyer.jpg");
    std::fs::write(&photo, b"not a real jpeg")?;

    let (_, client) = signed_in_client(&server, "tok-1")?;
    let draft = events::EventDraft {
        name: Some("Sunset Meet".to_string()),
        description: Some("Monthly meet".to_string()),
        date: Some("2026-09-01T18:00:00Z".to_string()),
        location: Some("Pier 7".to_string()),
        max_participants: Some(80),
        status: None,
        photo: Some(photo),
    };
    let event = events::create(&client, &draft).await?;

    assert_eq!(event.id, 10);
    assert_eq!(event.name, "Sunset Meet");
    Ok(())
}
