//! Outgoing mail.
//!
//! The rest of the crate only sees [`Mailer`]. [`SmtpMailer`] relays through
//! an SMTP server with lettre; [`LogMailer`] writes the message to the log and
//! is used when no SMTP host is configured.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::MailConfig;
use crate::error::MailError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError::Relay(e.to_string()))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_mail(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(mail.to.parse().map_err(|_| MailError::InvalidAddress(mail.to.clone()))?)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Relay(e.to_string()))?;

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_mail(&self, mail: OutgoingMail) -> Result<(), MailError> {
        info!(to = %mail.to, subject = %mail.subject, "SMTP not configured, mail not sent");
        debug!(to = %mail.to, "Unsent mail body: {}", mail.html);
        Ok(())
    }
}

/// SMTP when a host is configured, otherwise log-only.
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if config.smtp_host.trim().is_empty() {
        Ok(Arc::new(LogMailer))
    } else {
        Ok(Arc::new(SmtpMailer::new(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_mail() {
        let mail = OutgoingMail {
            to: "a@x.com".into(),
            subject: "Password reset".into(),
            html: "<p>hi</p>".into(),
        };
        assert!(LogMailer.send_mail(mail).await.is_ok());
    }

    #[tokio::test]
    async fn test_log_mailer_keeps_body_out_of_info_logs() {
        use tracing::instrument::WithSubscriber;

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mail = OutgoingMail {
            to: "a@x.com".into(),
            subject: "Password reset".into(),
            html: r#"<a href="http://localhost:3000/reset-password?token=live-reset-token">Reset</a>"#.into(),
        };
        LogMailer.send_mail(mail).with_subscriber(subscriber).await.unwrap();

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("a@x.com"));
        assert!(logged.contains("Password reset"));
        assert!(!logged.contains("live-reset-token"));
    }

    #[tokio::test]
    async fn test_smtp_mailer_rejects_bad_recipient() {
        let mut config = Settings::new_for_test().unwrap().mail;
        config.smtp_host = "localhost".into();
        let mailer = SmtpMailer::new(&config).unwrap();

        let err = mailer
            .send_mail(OutgoingMail {
                to: "not an address".into(),
                subject: "s".into(),
                html: "h".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(_)));
    }
}
