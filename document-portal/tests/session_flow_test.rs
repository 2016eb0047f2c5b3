mod common;

use common::{user_json, TestApp, TEST_TOKEN};
use document_portal::guard::{guard, GuardDecision};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn login_takes_user_from_response_without_profile_call() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path(TestApp::endpoint("/login")))
        .and(body_json(json!({"email": "admin@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": TEST_TOKEN,
            "user": user_json("admin"),
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path(TestApp::endpoint("/user")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("admin")))
        .expect(0)
        .mount(&app.server)
        .await;

    let auth = app
        .ctx
        .session
        .login(" admin@example.com ", "secret")
        .await
        .expect("login should succeed");

    assert_eq!(auth.user.email, "test@example.com");
    assert!(app.ctx.session.state().await.is_authenticated());
    assert_eq!(app.stored_token().await.as_deref(), Some(TEST_TOKEN));
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path(TestApp::endpoint("/login")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let err = app.ctx.session.login("", "secret").await.unwrap_err();
    assert_eq!(err.user_message("Login failed."), "Email and password are required.");
    let err = app.ctx.session.login("a@b.c", "").await.unwrap_err();
    assert_eq!(err.user_message("Login failed."), "Email and password are required.");
}

#[tokio::test]
async fn login_without_token_in_response_fails() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path(TestApp::endpoint("/login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user_json("admin")})))
        .mount(&app.server)
        .await;

    let err = app.ctx.session.login("a@b.c", "pw").await.unwrap_err();
    assert!(err.to_string().contains("Token not found in login response"));
    assert!(!app.ctx.session.state().await.is_authenticated());
    assert_eq!(app.stored_token().await, None);
}

#[tokio::test]
async fn rejected_credentials_surface_backend_message() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path(TestApp::endpoint("/login")))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "These credentials do not match our records."})),
        )
        .mount(&app.server)
        .await;

    let err = app.ctx.session.login("a@b.c", "wrong").await.unwrap_err();
    assert_eq!(
        err.user_message("Login failed."),
        "These credentials do not match our records."
    );
}

#[tokio::test]
async fn boot_without_token_is_anonymous_and_sends_nothing() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path(TestApp::endpoint("/user")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("admin")))
        .expect(0)
        .mount(&app.server)
        .await;

    assert!(matches!(guard(&app.ctx.session).await, GuardDecision::Loading));
    let state = app.ctx.session.boot().await;
    assert!(!state.is_authenticated());
    assert!(matches!(
        guard(&app.ctx.session).await,
        GuardDecision::RedirectToLogin
    ));
}

#[tokio::test]
async fn boot_restores_session_with_bearer_token() {
    let app = TestApp::spawn_with_token().await;
    Mock::given(method("GET"))
        .and(path(TestApp::endpoint("/user")))
        .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": user_json("manager")})))
        .expect(1)
        .mount(&app.server)
        .await;

    app.ctx.session.boot().await;
    match guard(&app.ctx.session).await {
        GuardDecision::Allow(auth) => assert_eq!(auth.user.name, "Test User"),
        other => panic!("expected an authenticated session, got {:?}", other),
    }
}

#[tokio::test]
async fn login_accepts_user_with_null_name() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path(TestApp::endpoint("/login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": TEST_TOKEN,
            "user": {"id": 1, "name": null, "email": "a@b.c", "role": "admin"},
        })))
        .mount(&app.server)
        .await;

    let auth = app
        .ctx
        .session
        .login("a@b.c", "pw")
        .await
        .expect("null name should not fail login");

    assert_eq!(auth.user.name, "");
    assert_eq!(auth.user.display_name(), "a");
    assert!(app.ctx.session.state().await.is_authenticated());
    assert_eq!(app.stored_token().await.as_deref(), Some(TEST_TOKEN));
}

#[tokio::test]
async fn boot_keeps_session_for_user_with_null_name() {
    let app = TestApp::spawn_with_token().await;
    Mock::given(method("GET"))
        .and(path(TestApp::endpoint("/user")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": null, "email": null, "role": "admin",
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let state = app.ctx.session.boot().await;
    assert!(state.is_authenticated());
    assert_eq!(app.stored_token().await.as_deref(), Some(TEST_TOKEN));
    match guard(&app.ctx.session).await {
        GuardDecision::Allow(auth) => assert_eq!(auth.user.display_name(), "User"),
        other => panic!("expected an authenticated session, got {:?}", other),
    }
}

#[tokio::test]
async fn boot_with_rejected_token_clears_store() {
    let app = TestApp::spawn_with_token().await;
    Mock::given(method("GET"))
        .and(path(TestApp::endpoint("/user")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .mount(&app.server)
        .await;

    let state = app.ctx.session.boot().await;
    assert!(!state.is_authenticated());
    assert_eq!(app.stored_token().await, None);
}

#[tokio::test]
async fn any_unauthorized_response_ends_the_session() {
    let app = TestApp::spawn_with_token().await;
    app.login_as("employee").await;
    Mock::given(method("GET"))
        .and(path(TestApp::endpoint("/categories")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;

    let result = app.ctx.actions().categories().await;
    assert!(result.unwrap_err().is_unauthorized());
    assert!(!app.ctx.session.state().await.is_authenticated());
    assert_eq!(app.stored_token().await, None);
}

#[tokio::test]
async fn logout_clears_locally_even_when_backend_fails() {
    let app = TestApp::spawn_with_token().await;
    app.login_as("admin").await;
    Mock::given(method("POST"))
        .and(path(TestApp::endpoint("/logout")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.server)
        .await;

    app.ctx.session.logout().await;

    assert!(!app.ctx.session.state().await.is_authenticated());
    assert_eq!(app.stored_token().await, None);
}

#[tokio::test]
async fn requests_carry_a_request_id() {
    let app = TestApp::spawn_with_token().await;
    Mock::given(method("GET"))
        .and(path(TestApp::endpoint("/user")))
        .and(wiremock::matchers::header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("admin")))
        .expect(1)
        .mount(&app.server)
        .await;

    assert!(app.ctx.session.boot().await.is_authenticated());
}
