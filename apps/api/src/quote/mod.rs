//! Quote submission endpoint (`POST /api/cotacao`).
//!
//! Single linear pipeline: parse → validate fields → validate configuration →
//! resolve recipients → compose → send two emails → respond with the protocol
//! token. All validation happens before any side effect.

pub mod compose;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::QuoteMailSettings;
use crate::errors::AppError;
use crate::mailer::OutboundEmail;
use crate::state::AppState;
use crate::validate::{is_valid_email, require_non_blank};

/// Display name on both outgoing messages.
const SENDER_NAME: &str = "Happening Logística";

/// A quote request as the site form posts it. Field names match the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub empresa: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub origem: String,
    #[serde(default)]
    pub destino: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub peso: String,
    #[serde(default)]
    pub observacoes: Option<String>,
    /// One salesperson, validated against the allow-list.
    #[serde(default, rename = "vendedorEmail")]
    pub vendedor_email: Option<String>,
    /// When set, the notice goes to the full allow-list instead.
    #[serde(default, rename = "enviarTodos")]
    pub enviar_todos: bool,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub protocolo: String,
}

/// POST /api/cotacao
///
/// The `Json` rejection is captured so a malformed body still gets the
/// structured `{"success": false, ...}` error shape, not axum's plain text.
pub async fn handle_quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, AppError> {
    let Json(req) = payload.map_err(|e| {
        warn!("malformed quote payload: {e}");
        AppError::Validation("Corpo da requisição inválido".into())
    })?;
    let protocolo = process_quote(&state, req).await?;
    Ok(Json(QuoteResponse {
        success: true,
        protocolo,
    }))
}

async fn process_quote(state: &AppState, req: QuoteRequest) -> Result<String, AppError> {
    require_non_blank(&[
        ("nome", &req.nome),
        ("empresa", &req.empresa),
        ("telefone", &req.telefone),
        ("email", &req.email),
        ("origem", &req.origem),
        ("destino", &req.destino),
        ("tipo", &req.tipo),
        ("peso", &req.peso),
    ])?;

    let customer_email = req.email.trim().to_lowercase();
    if !is_valid_email(&customer_email) {
        return Err(AppError::Validation("E-mail do cliente inválido".into()));
    }

    let settings = state.config.quote.ensure_complete()?;
    let recipients = resolve_recipients(&req, &settings.sales_emails)?;

    let protocolo = compose::protocol_token();
    info!(
        %protocolo,
        to = %recipients.join(", "),
        cc = %settings.manager_emails.join(", "),
        "quote accepted, dispatching notification"
    );

    let notice = internal_notice(&req, &customer_email, &protocolo, &recipients, &settings);
    let confirmation = customer_confirmation(&req, &customer_email, &protocolo, &settings);

    // Sequential, no rollback: if the confirmation fails the notice has
    // already reached the sales team. Reported as total failure (the original
    // site's behavior), with the partial delivery logged for operators.
    state.mailer.send(&settings.account, notice).await?;
    if let Err(e) = state.mailer.send(&settings.account, confirmation).await {
        warn!(
            %protocolo,
            "customer confirmation failed after the internal notice was delivered"
        );
        return Err(AppError::Delivery(e));
    }

    Ok(protocolo)
}

/// Resolves the internal notice's recipients. A chosen address is re-checked
/// against the allow-list so client input cannot route mail anywhere else.
fn resolve_recipients(req: &QuoteRequest, allow_list: &[String]) -> Result<Vec<String>, AppError> {
    if req.enviar_todos {
        return Ok(allow_list.to_vec());
    }

    let chosen = req
        .vendedor_email
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if chosen.is_empty() {
        return Err(AppError::Validation(
            "Selecione um vendedor ou marque 'enviar para todos'.".into(),
        ));
    }
    if !allow_list.contains(&chosen) {
        return Err(AppError::Validation(format!(
            "Vendedor inválido (não permitido): {chosen}"
        )));
    }
    Ok(vec![chosen])
}

fn internal_notice(
    req: &QuoteRequest,
    customer_email: &str,
    protocolo: &str,
    recipients: &[String],
    settings: &QuoteMailSettings,
) -> OutboundEmail {
    OutboundEmail {
        from: format!("{SENDER_NAME} <{}>", settings.account.user),
        to: recipients.to_vec(),
        cc: settings.manager_emails.clone(),
        bcc: settings.internal_bcc.clone(),
        // A salesperson hitting "reply" writes to the customer directly.
        reply_to: Some(customer_email.to_string()),
        subject: format!("Nova Cotação Recebida - {protocolo}"),
        text: None,
        html: Some(compose::internal_notice_html(req, customer_email, protocolo)),
        attachment: None,
    }
}

fn customer_confirmation(
    req: &QuoteRequest,
    customer_email: &str,
    protocolo: &str,
    settings: &QuoteMailSettings,
) -> OutboundEmail {
    OutboundEmail {
        from: format!("{SENDER_NAME} <{}>", settings.account.user),
        to: vec![customer_email.to_string()],
        cc: Vec::new(),
        bcc: Vec::new(),
        // A customer replying to the confirmation reaches the quote mailbox.
        reply_to: Some(settings.account.user.clone()),
        subject: format!("Recebemos sua solicitação de cotação - {protocolo}"),
        text: None,
        html: Some(compose::customer_confirmation_html(req, protocolo)),
        attachment: None,
    }
}
