#![allow(dead_code)]

use async_trait::async_trait;
use hotel_admin_server::error::MailError;
use hotel_admin_server::mail::{Mailer, OutgoingMail};
use hotel_admin_server::{AppState, InMemoryStore, PasswordHasher, Settings};
use std::sync::{Arc, Mutex};

/// Keeps every message instead of relaying it; optionally fails every send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail: true }
    }

    /// Token from the reset link in the most recent message.
    pub fn last_reset_token(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let html = &sent.last()?.html;
        let start = html.find("token=")? + "token=".len();
        let rest = &html[start..];
        Some(rest[..rest.find('"')?].to_string())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_mail(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Relay("connection refused".into()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub fn test_settings() -> Settings {
    Settings::new_for_test().expect("Failed to load test config")
}

pub fn test_state(settings: Settings, mailer: Arc<RecordingMailer>) -> AppState {
    let store = Arc::new(InMemoryStore::new());
    AppState::from_parts(settings, store.clone(), store, mailer, PasswordHasher::with_cost(4))
        .expect("Failed to build app state")
}
