//! Email bodies and the correlation token for quote submissions.

use chrono::Utc;
use uuid::Uuid;

use crate::html::escape;
use crate::quote::QuoteRequest;

/// Display-only reference string shown to the customer and stamped on both
/// emails of one submission. Uniqueness is probabilistic, not guaranteed.
pub fn protocol_token() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("COT-{millis}-{}", &suffix[..4])
}

fn observacoes(req: &QuoteRequest) -> String {
    let obs = req.observacoes.as_deref().unwrap_or_default().trim();
    if obs.is_empty() {
        "—".to_string()
    } else {
        obs.to_string()
    }
}

/// Notice sent to the sales team (managers on cc, internal list on bcc).
pub fn internal_notice_html(req: &QuoteRequest, customer_email: &str, protocolo: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; font-size: 14px; color:#111;">
  <h2 style="margin:0 0 8px;">Nova Cotação Recebida</h2>
  <p style="margin:0 0 12px; color:#666;">Protocolo: <b>{protocolo}</b></p>

  <table cellpadding="6" cellspacing="0" style="border-collapse: collapse;">
    <tr><td><b>Nome:</b></td><td>{nome}</td></tr>
    <tr><td><b>Empresa:</b></td><td>{empresa}</td></tr>
    <tr><td><b>Telefone:</b></td><td>{telefone}</td></tr>
    <tr><td><b>E-mail:</b></td><td><a href="mailto:{email}">{email}</a></td></tr>
    <tr><td><b>Origem:</b></td><td>{origem}</td></tr>
    <tr><td><b>Destino:</b></td><td>{destino}</td></tr>
    <tr><td><b>Tipo:</b></td><td>{tipo}</td></tr>
    <tr><td><b>Peso:</b></td><td>{peso}</td></tr>
    <tr>
      <td><b>Observações:</b></td>
      <td style="white-space: pre-line;">{obs}</td>
    </tr>
  </table>

  <p style="margin:16px 0 0; color:#666; font-size:12px;">
    Enviado automaticamente pelo site Happening.
  </p>
</div>"#,
        protocolo = escape(protocolo),
        nome = escape(&req.nome),
        empresa = escape(&req.empresa),
        telefone = escape(&req.telefone),
        email = escape(customer_email),
        origem = escape(&req.origem),
        destino = escape(&req.destino),
        tipo = escape(&req.tipo),
        peso = escape(&req.peso),
        obs = escape(&observacoes(req)),
    )
}

/// Confirmation sent back to the customer.
pub fn customer_confirmation_html(req: &QuoteRequest, protocolo: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; font-size: 14px; color:#111;">
  <h2 style="margin:0 0 8px;">Recebemos sua solicitação de cotação</h2>
  <p style="margin:0 0 12px; color:#444;">
    Olá <b>{nome}</b>, sua solicitação foi recebida com sucesso.
    Em breve um de nossos vendedores entrará em contato.
  </p>

  <p style="margin:0 0 10px; color:#666;">
    Protocolo: <b>{protocolo}</b>
  </p>

  <div style="padding:12px; border:1px solid #eee; border-radius:8px; background:#fafafa;">
    <p style="margin:0 0 6px;"><b>Origem:</b> {origem}</p>
    <p style="margin:0 0 6px;"><b>Destino:</b> {destino}</p>
    <p style="margin:0 0 6px;"><b>Tipo:</b> {tipo}</p>
    <p style="margin:0 0 6px;"><b>Peso:</b> {peso}</p>
    <p style="margin:0;"><b>Observações:</b> <span style="white-space: pre-line;">{obs}</span></p>
  </div>

  <p style="margin:16px 0 0; color:#666; font-size:12px;">
    Esta é uma mensagem automática do site Happening.
  </p>
</div>"#,
        nome = escape(&req.nome),
        protocolo = escape(protocolo),
        origem = escape(&req.origem),
        destino = escape(&req.destino),
        tipo = escape(&req.tipo),
        peso = escape(&req.peso),
        obs = escape(&observacoes(req)),
    )
}
