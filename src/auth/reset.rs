use chrono::Duration;
use url::Url;
use uuid::Uuid;

use crate::auth::token::TokenIssuer;
use crate::error::{AppError, AuthError};
use crate::mail::OutgoingMail;
use crate::Result;

pub const RESET_SUBJECT: &str = "Password reset";

/// Short-lived password reset tokens and the mail that carries them.
///
/// Tokens share the session signing key. Nothing records that a token was
/// used, so one stays good for any number of resets until it expires.
#[derive(Clone)]
pub struct ResetTokens {
    issuer: TokenIssuer,
    ttl: Duration,
    reset_url: Url,
}

impl ResetTokens {
    pub fn new(issuer: TokenIssuer, ttl: Duration, reset_url: &str) -> Result<Self> {
        let reset_url = Url::parse(reset_url)
            .map_err(|e| AppError::ConfigError(format!("invalid mail.reset_url {:?}: {}", reset_url, e)))?;

        Ok(Self { issuer, ttl, reset_url })
    }

    pub fn issue(&self, admin_id: Uuid) -> Result<String> {
        self.issuer.issue(admin_id, self.ttl)
    }

    pub fn verify(&self, token: &str) -> std::result::Result<Uuid, AuthError> {
        self.issuer
            .verify(token)
            .map_err(|_| AuthError::InvalidOrExpiredToken)
    }

    pub fn link(&self, token: &str) -> Url {
        let mut link = self.reset_url.clone();
        link.query_pairs_mut().append_pair("token", token);
        link
    }

    pub fn mail(&self, to: &str, token: &str) -> OutgoingMail {
        let link = self.link(token);
        OutgoingMail {
            to: to.to_string(),
            subject: RESET_SUBJECT.to_string(),
            html: format!(
                "<p>Click the link below to reset your password:</p><a href=\"{link}\">{link}</a>",
                link = link
            ),
        }
    }
}
