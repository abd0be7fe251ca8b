//! Outbound mail gateway for account recovery.

use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::config::Config;
use crate::errors::AppError;

pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<String>,
}

impl Mailer {
    pub fn new(config: &Config) -> Self {
        let from = config
            .smtp_from
            .clone()
            .or_else(|| config.smtp_username.clone());

        let transport = config.smtp_host.as_ref().and_then(|host| {
            let builder = match (&config.smtp_username, &config.smtp_password) {
                (Some(username), Some(password)) => {
                    match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host) {
                        Ok(builder) => builder
                            .credentials(Credentials::new(username.clone(), password.clone())),
                        Err(e) => {
                            tracing::warn!("Invalid SMTP relay configuration: {}", e);
                            return None;
                        }
                    }
                }
                // Credential-less relays (local dev) speak plain SMTP
                _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
            };
            Some(builder.port(config.smtp_port).build())
        });

        Self { transport, from }
    }

    /// Send the replacement password to the account owner. Callers persist
    /// the new password only after this returns Ok, so a dead relay leaves
    /// the old password valid.
    pub async fn send_password_reset(&self, to: &str, new_password: &str) -> Result<(), AppError> {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            return Err(AppError::Upstream(
                "Mail relay is not configured".to_string(),
            ));
        };

        // Surface relay problems before claiming the password changed
        if !transport.test_connection().await? {
            return Err(AppError::Upstream(
                "Mail relay refused the connection".to_string(),
            ));
        }

        let message = Message::builder()
            .from(from.parse::<Mailbox>()?)
            .to(to.parse::<Mailbox>()?)
            .subject("Your Reef Life password was reset")
            .body(format!(
                "Your Reef Life password has been reset.\n\nNew password: {}\n",
                new_password
            ))?;

        transport.send(message).await?;
        Ok(())
    }
}
