use anyhow::{Context, Result};

use crate::errors::AppError;
use crate::mailer::SmtpAccount;

/// Number of salesperson addresses the quote allow-list must contain.
pub const SALES_LIST_SIZE: usize = 5;

/// Application configuration loaded from environment variables once at startup
/// and carried in `AppState`. Handlers never read the process environment.
///
/// The two endpoints use separate SMTP accounts, so each has its own section.
/// Mail settings are allowed to be absent at startup (a deployment may serve
/// only one of the two forms); completeness is enforced per request via
/// `ensure_complete`, which fails with a `Configuration` error naming the
/// missing variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub quote: QuoteConfig,
    pub resume: ResumeConfig,
}

/// Settings for the quote endpoint (`EMAIL_*` plus the address lists).
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    /// Fixed salesperson allow-list (`VENDEDORES_EMAILS`, comma-separated).
    pub sales_emails: Vec<String>,
    /// Managers copied on every internal notice (`GERENTE_EMAIL`).
    pub manager_emails: Vec<String>,
    /// Internal distribution bcc'd on every internal notice (`TI_EMAIL`).
    pub internal_bcc: Vec<String>,
}

/// Settings for the résumé endpoint (`CURRICULO_*`).
#[derive(Debug, Clone)]
pub struct ResumeConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_secure: Option<bool>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    /// HR mailbox that receives every submission (`CURRICULO_TO`).
    pub to: Option<String>,
    /// Widens the attachment policy to DOC/DOCX (`CURRICULO_ACCEPT_WORD`).
    pub accept_word: bool,
}

/// Validated view of `QuoteConfig` with all required fields present.
#[derive(Debug, Clone)]
pub struct QuoteMailSettings {
    pub account: SmtpAccount,
    pub sales_emails: Vec<String>,
    pub manager_emails: Vec<String>,
    pub internal_bcc: Vec<String>,
}

/// Validated view of `ResumeConfig` with all required fields present.
#[derive(Debug, Clone)]
pub struct ResumeMailSettings {
    pub account: SmtpAccount,
    pub to: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            quote: QuoteConfig {
                smtp_host: optional_env("EMAIL_HOST"),
                smtp_port: optional_port("EMAIL_PORT")?,
                smtp_user: optional_env("EMAIL_USER"),
                smtp_pass: optional_env("EMAIL_PASS"),
                sales_emails: parse_email_list(optional_env("VENDEDORES_EMAILS")),
                manager_emails: parse_email_list(optional_env("GERENTE_EMAIL")),
                internal_bcc: parse_email_list(optional_env("TI_EMAIL")),
            },
            resume: ResumeConfig {
                smtp_host: optional_env("CURRICULO_HOST"),
                smtp_port: optional_port("CURRICULO_PORT")?,
                smtp_secure: optional_env("CURRICULO_SECURE")
                    .map(|v| v.eq_ignore_ascii_case("true")),
                smtp_user: optional_env("CURRICULO_USER"),
                smtp_pass: optional_env("CURRICULO_PASS"),
                to: optional_env("CURRICULO_TO"),
                accept_word: optional_env("CURRICULO_ACCEPT_WORD")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
            },
        })
    }
}

impl QuoteConfig {
    /// Checks the quote mail settings before any side effect. The allow-list
    /// must contain exactly `SALES_LIST_SIZE` addresses; a wrong count is a
    /// provisioning mistake, not a client error.
    pub fn ensure_complete(&self) -> Result<QuoteMailSettings, AppError> {
        let mut missing = Vec::new();
        if self.smtp_host.is_none() {
            missing.push("EMAIL_HOST");
        }
        if self.smtp_port.is_none() {
            missing.push("EMAIL_PORT");
        }
        if self.smtp_user.is_none() {
            missing.push("EMAIL_USER");
        }
        if self.smtp_pass.is_none() {
            missing.push("EMAIL_PASS");
        }
        if !missing.is_empty() {
            return Err(AppError::Configuration(format!(
                "Configuração de e-mail incompleta: faltando {}",
                missing.join(", ")
            )));
        }

        if self.sales_emails.len() != SALES_LIST_SIZE {
            return Err(AppError::Configuration(format!(
                "VENDEDORES_EMAILS deve ter exatamente {} e-mails. Hoje tem: {}",
                SALES_LIST_SIZE,
                self.sales_emails.len()
            )));
        }

        Ok(QuoteMailSettings {
            account: SmtpAccount {
                host: self.smtp_host.clone().unwrap_or_default(),
                port: self.smtp_port.unwrap_or_default(),
                // The quote mailbox always speaks implicit TLS.
                secure: true,
                user: self.smtp_user.clone().unwrap_or_default(),
                pass: self.smtp_pass.clone().unwrap_or_default(),
            },
            sales_emails: self.sales_emails.clone(),
            manager_emails: self.manager_emails.clone(),
            internal_bcc: self.internal_bcc.clone(),
        })
    }
}

impl ResumeConfig {
    /// Checks the six résumé mail settings before any side effect.
    pub fn ensure_complete(&self) -> Result<ResumeMailSettings, AppError> {
        let mut missing = Vec::new();
        if self.smtp_host.is_none() {
            missing.push("CURRICULO_HOST");
        }
        if self.smtp_port.is_none() {
            missing.push("CURRICULO_PORT");
        }
        if self.smtp_secure.is_none() {
            missing.push("CURRICULO_SECURE");
        }
        if self.smtp_user.is_none() {
            missing.push("CURRICULO_USER");
        }
        if self.smtp_pass.is_none() {
            missing.push("CURRICULO_PASS");
        }
        if self.to.is_none() {
            missing.push("CURRICULO_TO");
        }
        if !missing.is_empty() {
            return Err(AppError::Configuration(format!(
                "Configuração de e-mail incompleta: faltando {}",
                missing.join(", ")
            )));
        }

        Ok(ResumeMailSettings {
            account: SmtpAccount {
                host: self.smtp_host.clone().unwrap_or_default(),
                port: self.smtp_port.unwrap_or_default(),
                secure: self.smtp_secure.unwrap_or_default(),
                user: self.smtp_user.clone().unwrap_or_default(),
                pass: self.smtp_pass.clone().unwrap_or_default(),
            },
            to: self.to.clone().unwrap_or_default(),
        })
    }
}

/// Reads an environment variable, treating blank values as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_port(key: &str) -> Result<Option<u16>> {
    optional_env(key)
        .map(|v| {
            v.parse::<u16>()
                .with_context(|| format!("{key} must be a valid port number"))
        })
        .transpose()
}

/// Splits a comma-separated address list, trimming and lower-casing entries.
fn parse_email_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// A fully provisioned config for handler tests. No environment access.
    pub fn test_config() -> Config {
        Config {
            port: 8080,
            rust_log: "debug".to_string(),
            quote: QuoteConfig {
                smtp_host: Some("smtp.example.com".to_string()),
                smtp_port: Some(465),
                smtp_user: Some("cotacao@example.com".to_string()),
                smtp_pass: Some("secret".to_string()),
                sales_emails: test_sales_list(),
                manager_emails: vec!["gerente@example.com".to_string()],
                internal_bcc: vec!["ti@example.com".to_string()],
            },
            resume: ResumeConfig {
                smtp_host: Some("smtp.example.com".to_string()),
                smtp_port: Some(587),
                smtp_secure: Some(false),
                smtp_user: Some("curriculo@example.com".to_string()),
                smtp_pass: Some("secret".to_string()),
                to: Some("rh@example.com".to_string()),
                accept_word: false,
            },
        }
    }

    pub fn test_sales_list() -> Vec<String> {
        (1..=SALES_LIST_SIZE)
            .map(|i| format!("vendedor{i}@example.com"))
            .collect()
    }
}
