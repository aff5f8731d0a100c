//! SMTP implementation of the `Mailer` seam, backed by lettre's async
//! transport. The transport is rebuilt per send because the account differs
//! per endpoint; lettre only opens the connection when the message goes out.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{MailError, Mailer, OutboundEmail, SmtpAccount};

pub struct SmtpMailer;

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, account: &SmtpAccount, mail: OutboundEmail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        let transport = build_transport(account)?;

        debug!(host = %account.host, port = account.port, "dispatching email");
        transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

fn build_transport(
    account: &SmtpAccount,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
    let builder = if account.secure {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&account.host)
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&account.host)
    }
    .map_err(|e| MailError::Transport(e.to_string()))?;

    Ok(builder
        .port(account.port)
        .credentials(Credentials::new(
            account.user.clone(),
            account.pass.clone(),
        ))
        .build())
}

fn build_message(mail: OutboundEmail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mail.from.parse::<Mailbox>()?)
        .subject(mail.subject);

    for to in &mail.to {
        builder = builder.to(to.parse::<Mailbox>()?);
    }
    for cc in &mail.cc {
        builder = builder.cc(cc.parse::<Mailbox>()?);
    }
    for bcc in &mail.bcc {
        builder = builder.bcc(bcc.parse::<Mailbox>()?);
    }
    if let Some(reply_to) = &mail.reply_to {
        builder = builder.reply_to(reply_to.parse::<Mailbox>()?);
    }

    let text = mail.text;
    let html = mail.html;

    let body_part = match (&text, &html) {
        (Some(text), Some(html)) => BodyPart::Alternative(text.clone(), html.clone()),
        (None, Some(html)) => BodyPart::Single(SinglePart::html(html.clone())),
        _ => BodyPart::Single(SinglePart::plain(text.unwrap_or_default())),
    };

    let message = match mail.attachment {
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|_| MailError::ContentType(attachment.content_type.clone()))?;
            let file_part =
                Attachment::new(attachment.filename).body(attachment.data.to_vec(), content_type);

            let mixed = match body_part {
                BodyPart::Alternative(text, html) => MultiPart::mixed()
                    .multipart(MultiPart::alternative_plain_html(text, html)),
                BodyPart::Single(part) => MultiPart::mixed().singlepart(part),
            };
            builder.multipart(mixed.singlepart(file_part))?
        }
        None => match body_part {
            BodyPart::Alternative(text, html) => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))?
            }
            BodyPart::Single(part) => builder.singlepart(part)?,
        },
    };

    Ok(message)
}

enum BodyPart {
    Alternative(String, String),
    Single(SinglePart),
}
