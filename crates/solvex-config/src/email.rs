//! Mail delivery configuration.
//!
//! `MAIL_SERVICE` picks the transport once at startup:
//!
//! | Value | Transport |
//! |-------|-----------|
//! | `sendgrid` | SendGrid v3 HTTP API, needs `SENDGRID_API_KEY` |
//! | `smtp` or `local` | SMTP relay via `SMTP_HOST`/`SMTP_PORT` |
//! | `log` | nothing is sent, messages are written to the log |
//!
//! When `MAIL_SERVICE` is unset, SendGrid is used if an API key is present
//! and `log` otherwise.

use std::env;

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MailProvider {
    SendGrid,
    Smtp,
    Log,
}

#[derive(Clone)]
pub struct EmailConfig {
    pub provider: MailProvider,
    pub sender_email: String,
    pub sender_name: String,
    pub sendgrid_api_key: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("provider", &self.provider)
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish_non_exhaustive()
    }
}

impl EmailConfig {
    /// A configuration that never leaves the process. Used by tests.
    pub fn log_only() -> Self {
        Self {
            provider: MailProvider::Log,
            sender_email: "noreply@solvex.local".to_string(),
            sender_name: "Solve-The-X".to_string(),
            sendgrid_api_key: String::new(),
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sendgrid_api_key = lookup("SENDGRID_API_KEY").unwrap_or_default();

        let provider = match lookup("MAIL_SERVICE").map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "sendgrid" => MailProvider::SendGrid,
            Some(v) if v == "smtp" || v == "local" => MailProvider::Smtp,
            Some(v) if v == "log" => MailProvider::Log,
            Some(v) if v.is_empty() => default_provider(&sendgrid_api_key),
            None => default_provider(&sendgrid_api_key),
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "MAIL_SERVICE",
                    value: other,
                });
            }
        };

        if provider == MailProvider::SendGrid && sendgrid_api_key.is_empty() {
            return Err(ConfigError::MissingVar("SENDGRID_API_KEY"));
        }

        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "SMTP_PORT",
                value: raw,
            })?,
            None => 587,
        };

        Ok(Self {
            provider,
            sender_email: lookup("SENDER_EMAIL")
                .unwrap_or_else(|| "noreply@solvex.local".to_string()),
            sender_name: lookup("SENDER_NAME").unwrap_or_else(|| "Solve-The-X".to_string()),
            sendgrid_api_key,
            smtp_host: lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            smtp_port,
            smtp_username: lookup("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: lookup("SMTP_PASSWORD").unwrap_or_default(),
        })
    }
}

fn default_provider(sendgrid_api_key: &str) -> MailProvider {
    if sendgrid_api_key.is_empty() {
        MailProvider::Log
    } else {
        MailProvider::SendGrid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_to_log_without_key() {
        let config = EmailConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.provider, MailProvider::Log);
        assert_eq!(config.sender_name, "Solve-The-X");
    }

    #[test]
    fn test_defaults_to_sendgrid_with_key() {
        let config = EmailConfig::from_vars(vars(&[("SENDGRID_API_KEY", "SG.key")])).unwrap();
        assert_eq!(config.provider, MailProvider::SendGrid);
    }

    #[test]
    fn test_local_means_smtp() {
        let config = EmailConfig::from_vars(vars(&[
            ("MAIL_SERVICE", "local"),
            ("SMTP_HOST", "mail.internal"),
            ("SMTP_PORT", "2525"),
        ]))
        .unwrap();
        assert_eq!(config.provider, MailProvider::Smtp);
        assert_eq!(config.smtp_host, "mail.internal");
        assert_eq!(config.smtp_port, 2525);
    }

    #[test]
    fn test_sendgrid_requires_key() {
        let result = EmailConfig::from_vars(vars(&[("MAIL_SERVICE", "sendgrid")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingVar("SENDGRID_API_KEY")
        );
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result = EmailConfig::from_vars(vars(&[("MAIL_SERVICE", "pigeon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "MAIL_SERVICE",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result =
            EmailConfig::from_vars(vars(&[("MAIL_SERVICE", "smtp"), ("SMTP_PORT", "abc")]));
        assert!(result.is_err());
    }
}
