//! Outgoing mail.
//!
//! The transport is picked once from [`EmailConfig::provider`]: the SendGrid
//! v3 HTTP API, an SMTP relay, or the log (nothing leaves the process).

use std::time::Duration;

use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde_json::json;
use tracing::{info, instrument, warn};

use solvex_config::{EmailConfig, MailProvider};
use solvex_core::AppError;

use crate::utils::verification::format_code;

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client(timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build mail HTTP client, falling back to defaults without a timeout");
            reqwest::Client::new()
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mailer {
    config: EmailConfig,
    http: reqwest::Client,
}

impl Mailer {
    pub fn new(config: &EmailConfig) -> Self {
        let http = http_client(HTTP_TIMEOUT);

        Self {
            config: config.clone(),
            http,
        }
    }

    pub fn provider(&self) -> MailProvider {
        self.config.provider
    }

    #[instrument(skip(self, code))]
    pub async fn send_verification(&self, to_email: &str, code: u32) -> Result<(), AppError> {
        let code = format_code(code);
        let text_body = format!("Your verification code is: {}", code);
        let html_body = format!("<p>Your verification code is: <b>{}</b></p>", code);

        self.send_email(to_email, "Verify your account", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, content))]
    pub async fn send_notification(
        &self,
        to_email: &str,
        subject: &str,
        content: &str,
    ) -> Result<(), AppError> {
        let html_body = format!("<p>{}</p>", escape_html(content));

        self.send_email(to_email, subject, content, &html_body).await
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        match self.config.provider {
            MailProvider::SendGrid => {
                self.send_via_sendgrid(to_email, subject, text_body, html_body)
                    .await
            }
            MailProvider::Smtp => {
                self.send_via_smtp(to_email, subject, text_body, html_body)
                    .await
            }
            MailProvider::Log => {
                info!(to = %to_email, subject = %subject, body = %text_body, "Email (log only)");
                Ok(())
            }
        }
    }

    async fn send_via_sendgrid(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": to_email }] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name,
            },
            "subject": subject,
            "content": [
                { "type": "text/plain", "value": text_body },
                { "type": "text/html", "value": html_body },
            ],
        });

        let response = self
            .http
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::internal_error(format!("sendgrid error: {}", e)))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::internal_error(format!(
                "sendgrid error: {} - {}",
                status.as_u16(),
                body
            )));
        }

        Ok(())
    }

    async fn send_via_smtp(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.sender_name, self.config.sender_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() && self.config.smtp_password.is_empty()
        {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("smtp error: {}", e)))?;

        Ok(())
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
