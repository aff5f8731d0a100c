/// Outbound mail — the single point of exit for every email this service sends.
///
/// ARCHITECTURAL RULE: handlers never touch SMTP directly. They build an
/// `OutboundEmail`, pick the `SmtpAccount` of their endpoint, and hand both to
/// the `Mailer` carried in `AppState` as `Arc<dyn Mailer>`, so tests can swap
/// in a recording mock.
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod smtp;

pub use smtp::SmtpMailer;

/// Credentials for one SMTP mailbox. The quote and résumé endpoints use
/// separate accounts, so the account travels with each send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpAccount {
    pub host: String,
    pub port: u16,
    /// `true` = implicit TLS (wrapper), `false` = STARTTLS.
    pub secure: bool,
    pub user: String,
    pub pass: String,
}

/// A fully composed email, transport-agnostic.
#[derive(Debug, Clone, Default)]
pub struct OutboundEmail {
    /// Sender, either `mailbox@host` or `Display Name <mailbox@host>`.
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachment: Option<EmailAttachment>,
}

/// A binary attachment kept with its client-declared name and content type.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not assemble message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("invalid attachment content type: {0}")]
    ContentType(String),

    #[error("smtp transport error: {0}")]
    Transport(String),
}

/// The outbound mail seam. One method, no retries: a failed send surfaces to
/// the handler, which reports a generic delivery error to the client.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, account: &SmtpAccount, mail: OutboundEmail) -> Result<(), MailError>;
}
