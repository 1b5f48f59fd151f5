//! Email Delivery
//!
//! Implementations of the [`EmailSender`] port: SMTP via lettre for
//! production, console logging for development.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::magic_link::EmailSender;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// SMTP configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// From header, e.g. "Psychic Homily <no-reply@psychichomily.com>"
    pub from: String,
}

/// SMTP mailer (lettre, STARTTLS)
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> AuthResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AuthError::EmailDelivery(format!("Bad SMTP host: {e}")))?
            .credentials(SmtpCredentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

impl EmailSender for SmtpMailer {
    async fn send_magic_link(
        &self,
        to: &Email,
        link: &str,
        expires_in_minutes: i64,
    ) -> AuthResult<()> {
        let body = format!(
            "Click the link below to sign in to Psychic Homily.\n\n\
             {link}\n\n\
             The link expires in {expires_in_minutes} minutes and can be used once.\n\
             If you didn't request it, you can ignore this email.\n"
        );

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| AuthError::EmailDelivery(format!("Bad From address: {e}")))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|e| AuthError::EmailDelivery(format!("Bad To address: {e}")))?)
            .subject("Sign in to Psychic Homily")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AuthError::EmailDelivery(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthError::EmailDelivery(e.to_string()))?;

        tracing::info!("Magic link email sent");
        Ok(())
    }
}

/// Console mailer for development: logs the link instead of sending
#[derive(Clone, Debug, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub const fn new() -> Self {
        Self
    }
}

impl EmailSender for ConsoleMailer {
    async fn send_magic_link(
        &self,
        to: &Email,
        link: &str,
        expires_in_minutes: i64,
    ) -> AuthResult<()> {
        tracing::info!(
            to = %to,
            link = %link,
            expires_in_minutes = expires_in_minutes,
            "Magic link email (development mode, not sent)"
        );
        Ok(())
    }
}

/// Runtime-selected mailer
///
/// Keeps the handler state concrete: async trait methods are not object
/// safe, so the choice between transports is an enum, not a dyn.
#[derive(Clone)]
pub enum Mailer {
    Console(ConsoleMailer),
    Smtp(SmtpMailer),
}

impl Mailer {
    pub fn console() -> Self {
        Mailer::Console(ConsoleMailer::new())
    }

    pub fn smtp(config: &SmtpConfig) -> AuthResult<Self> {
        Ok(Mailer::Smtp(SmtpMailer::new(config)?))
    }
}

impl EmailSender for Mailer {
    async fn send_magic_link(
        &self,
        to: &Email,
        link: &str,
        expires_in_minutes: i64,
    ) -> AuthResult<()> {
        match self {
            Mailer::Console(m) => m.send_magic_link(to, link, expires_in_minutes).await,
            Mailer::Smtp(m) => m.send_magic_link(to, link, expires_in_minutes).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_mailer_always_succeeds() {
        let mailer = ConsoleMailer::new();
        let email = Email::new("fan@example.com").unwrap();
        let result = mailer
            .send_magic_link(&email, "https://ph.test/login/verify?token=abc", 15)
            .await;
        assert!(result.is_ok());
    }
}
