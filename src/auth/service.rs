use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::credentials::CredentialStore;
use crate::auth::reset::ResetTokens;
use crate::auth::token::TokenIssuer;
use crate::db::{AdminProfile, AdminSummary};
use crate::error::AuthError;
use crate::mail::Mailer;
use crate::Result;

#[derive(Debug, Serialize)]
pub struct AdminList {
    pub count: usize,
    pub users: Vec<AdminSummary>,
}

pub struct AuthService {
    credentials: CredentialStore,
    sessions: TokenIssuer,
    session_ttl: Duration,
    resets: ResetTokens,
    mailer: Arc<dyn Mailer>,
}

impl AuthService {
    pub fn new(
        credentials: CredentialStore,
        sessions: TokenIssuer,
        session_ttl: Duration,
        resets: ResetTokens,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            credentials,
            sessions,
            session_ttl,
            resets,
            mailer,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AdminProfile> {
        let admin = self.credentials.create(name, email, password).await?;
        info!("Admin registered: {} ({})", admin.email, admin.id);
        Ok(admin.profile())
    }

    /// Returns a session token for the handler to place in the cookie.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let admin = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UnknownEmail)?;

        if !self.credentials.verify_password(&admin, password).await {
            warn!("Incorrect password for {}", email);
            return Err(AuthError::BadCredentials.into());
        }

        self.sessions.issue(admin.id, self.session_ttl)
    }

    /// `token` is the raw cookie value, if the request carried one.
    pub async fn me(&self, token: Option<&str>) -> Result<AdminProfile> {
        let token = token.ok_or(AuthError::Unauthenticated)?;
        let admin_id = self.sessions.verify(token)?;

        let admin = self
            .credentials
            .find_by_id(admin_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        Ok(admin.profile())
    }

    pub async fn list_admins(&self) -> Result<AdminList> {
        let users = self.credentials.list_all().await?;
        Ok(AdminList {
            count: users.len(),
            users,
        })
    }

    pub async fn count_admins(&self) -> Result<i64> {
        self.credentials.count().await
    }

    /// Succeeds once the relay accepted the message; delivery itself is not
    /// confirmed.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let admin = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UnknownEmail)?;

        let token = self.resets.issue(admin.id)?;
        self.mailer.send_mail(self.resets.mail(&admin.email, &token)).await?;

        info!("Password reset mail sent to {}", admin.email);
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let admin_id = self.resets.verify(token)?;

        let mut admin = self
            .credentials
            .find_by_id(admin_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        self.credentials.set_password(&mut admin, new_password).await?;

        info!("Password reset for {}", admin.email);
        Ok(())
    }
}
