mod common;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::ServiceResponse;
use actix_web::{test, web, App};
use common::{test_settings, test_state, RecordingMailer};
use hotel_admin_server::auth::handlers::SESSION_COOKIE;
use hotel_admin_server::configure_routes;
use serde_json::{json, Value};
use std::sync::Arc;

macro_rules! init_app {
    ($mailer:expr) => {{
        let settings = test_settings();
        let state = test_state(settings.clone(), $mailer);
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(move |cfg| configure_routes(cfg, &settings)),
        )
        .await
    }};
}

fn session_cookie(resp: &ServiceResponse) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

#[actix_web::test]
async fn test_register_login_me_logout() {
    let app = init_app!(Arc::new(RecordingMailer::default()));

    let resp = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "A", "email": "a@x.com", "password": "p1" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 201);
    assert!(session_cookie(&resp).is_none(), "registration must not log in");
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());

    let resp = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "p1" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let cookie = session_cookie(&resp).expect("login sets the session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::hours(24)));
    assert!(!cookie.value().is_empty());

    let resp = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new(SESSION_COOKIE, cookie.value().to_string()))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "A");
    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let resp = test::TestRequest::post()
        .uri("/api/auth/logout")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let cleared = session_cookie(&resp).expect("logout clears the cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.max_age(), Some(actix_web::cookie::time::Duration::ZERO));

    let resp = test::TestRequest::get()
        .uri("/api/auth/me")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_logout_is_idempotent() {
    let app = init_app!(Arc::new(RecordingMailer::default()));

    for _ in 0..2 {
        let resp = test::TestRequest::post()
            .uri("/api/auth/logout")
            .send_request(&app)
            .await;
        assert_eq!(resp.status(), 200);
    }
}

#[actix_web::test]
async fn test_duplicate_registration() {
    let app = init_app!(Arc::new(RecordingMailer::default()));

    for expected in [201, 400] {
        let resp = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": "A", "email": "a@x.com", "password": "p1" }))
            .send_request(&app)
            .await;
        assert_eq!(resp.status(), expected);
    }

    let resp = test::TestRequest::get()
        .uri("/api/auth/users/count")
        .send_request(&app)
        .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 1);
}

#[actix_web::test]
async fn test_invalid_login() {
    let app = init_app!(Arc::new(RecordingMailer::default()));

    let resp = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "nonexistent@example.com", "password": "wrongpassword" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 400);

    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "A", "email": "a@x.com", "password": "p1" }))
        .send_request(&app)
        .await;

    let resp = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "wrong" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
    assert!(session_cookie(&resp).is_none());
}

#[actix_web::test]
async fn test_me_with_forged_cookie() {
    let app = init_app!(Arc::new(RecordingMailer::default()));

    let resp = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new(SESSION_COOKIE, "eyJhbGciOiJIUzI1NiJ9.e30.bad"))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let app = init_app!(Arc::new(RecordingMailer::default()));

    let resp = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "a@x.com" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_list_users() {
    let app = init_app!(Arc::new(RecordingMailer::default()));

    for (name, email) in [("A", "a@x.com"), ("B", "b@x.com")] {
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": name, "email": email, "password": "secret" }))
            .send_request(&app)
            .await;
    }

    let resp = test::TestRequest::get()
        .uri("/api/auth/users")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["users"][0], json!({ "name": "A", "email": "a@x.com" }));
    assert_eq!(body["users"][1], json!({ "name": "B", "email": "b@x.com" }));
}

#[actix_web::test]
async fn test_forgot_and_reset_password() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = init_app!(mailer.clone());

    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "A", "email": "a@x.com", "password": "old" }))
        .send_request(&app)
        .await;

    let resp = test::TestRequest::post()
        .uri("/api/auth/forgot-password")
        .set_json(json!({ "email": "nobody@x.com" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 400);
    assert!(mailer.sent.lock().unwrap().is_empty());

    let resp = test::TestRequest::post()
        .uri("/api/auth/forgot-password")
        .set_json(json!({ "email": "a@x.com" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    {
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert!(sent[0].html.contains("http://localhost:3000/reset-password?token="));
    }
    let token = mailer.last_reset_token().expect("reset link carries a token");

    let resp = test::TestRequest::post()
        .uri("/api/auth/reset-password")
        .set_json(json!({ "token": "not-a-token", "password": "new" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 400);

    let resp = test::TestRequest::post()
        .uri("/api/auth/reset-password")
        .set_json(json!({ "token": token, "password": "new" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);

    let resp = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "old" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);

    let resp = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "new" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_mail_relay_failure_is_generic_server_error() {
    let app = init_app!(Arc::new(RecordingMailer::failing()));

    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "A", "email": "a@x.com", "password": "p1" }))
        .send_request(&app)
        .await;

    let resp = test::TestRequest::post()
        .uri("/api/auth/forgot-password")
        .set_json(json!({ "email": "a@x.com" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Server error");
}
