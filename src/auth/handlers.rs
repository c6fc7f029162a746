use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{AppState, Result};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    let max_age = time::Duration::seconds(state.auth_service.session_ttl().num_seconds());
    Cookie::build(SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.is_production())
        .max_age(max_age)
        .finish()
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Received registration request for email: {}", req.email);
    state.auth_service.register(&req.name, &req.email, &req.password).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Admin created successfully" })))
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Login attempt: {}", req.email);
    match state.auth_service.login(&req.email, &req.password).await {
        Ok(token) => {
            info!("Login successful for email: {}", req.email);
            Ok(HttpResponse::Ok()
                .cookie(session_cookie(&state, token))
                .json(json!({ "message": "Login successful" })))
        }
        Err(e) => {
            warn!("Login failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let token = req.cookie(SESSION_COOKIE);
    let profile = state
        .auth_service
        .me(token.as_ref().map(|c| c.value()))
        .await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Always succeeds, with or without a session.
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut cookie = session_cookie(&state, String::new());
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "message": "Logged out successfully" }))
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse> {
    let list = state.auth_service.list_admins().await?;
    Ok(HttpResponse::Ok().json(list))
}

pub async fn count_users(state: web::Data<AppState>) -> Result<HttpResponse> {
    let count = state.auth_service.count_admins().await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

pub async fn forgot_password(
    req: web::Json<ForgotPasswordRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.auth_service.forgot_password(&req.email).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Email sent" })))
}

pub async fn reset_password(
    req: web::Json<ResetPasswordRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state.auth_service.reset_password(&req.token, &req.password).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password reset successfully" })))
}
