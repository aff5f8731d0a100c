//! Résumé submission endpoint (`POST /api/curriculo`).
//!
//! Multipart pipeline: rate-limit check → configuration check → parse →
//! honeypot → validate fields → validate attachment → compose → send one
//! email with the file attached.
//!
//! The endpoint answers with `{"ok": ...}` bodies (the shape its form
//! expects), so errors pass through the `ResumeError` wrapper instead of
//! `AppError`'s own response.

pub mod compose;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::ResumeMailSettings;
use crate::errors::AppError;
use crate::mailer::{EmailAttachment, OutboundEmail};
use crate::rate_limit::client_ip;
use crate::state::AppState;
use crate::validate::{is_valid_email, require_non_blank};

/// Upload ceiling, checked against the bytes actually read.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const CONTENT_TYPE_PDF: &str = "application/pdf";
const CONTENT_TYPE_DOC: &str = "application/msword";
const CONTENT_TYPE_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A résumé submission parsed from the multipart form. Unknown fields are
/// ignored; every text value is trimmed.
#[derive(Debug, Clone, Default)]
pub struct ResumeForm {
    pub nome: String,
    pub telefone: String,
    pub email: String,
    pub unidade: String,
    pub cargo: String,
    pub mensagem: String,
    /// "1" marks a disability-inclusion (PCD) submission.
    pub pcd: String,
    pub pcd_tipo: String,
    pub pcd_adaptacao: String,
    pub vaga_id: String,
    pub vaga_titulo: String,
    pub vaga_local: String,
    /// Honeypot. Humans never see this field; bots fill it.
    pub website: String,
    pub arquivo: Option<UploadedFile>,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// File acceptance rules as data. The default policy is strict (PDF with a
/// `.pdf` name); `CURRICULO_ACCEPT_WORD` widens it to DOC/DOCX.
#[derive(Debug, Clone)]
pub struct AttachmentPolicy {
    accepted_types: Vec<&'static str>,
    require_pdf_extension: bool,
    max_bytes: usize,
}

impl AttachmentPolicy {
    pub fn from_config(accept_word: bool) -> Self {
        if accept_word {
            Self {
                accepted_types: vec![CONTENT_TYPE_PDF, CONTENT_TYPE_DOC, CONTENT_TYPE_DOCX],
                require_pdf_extension: false,
                max_bytes: MAX_UPLOAD_BYTES,
            }
        } else {
            Self {
                accepted_types: vec![CONTENT_TYPE_PDF],
                require_pdf_extension: true,
                max_bytes: MAX_UPLOAD_BYTES,
            }
        }
    }

    pub fn validate(&self, file: &UploadedFile) -> Result<(), AppError> {
        if file.data.len() > self.max_bytes {
            return Err(AppError::Validation(
                "Arquivo excede o limite de 5MB.".into(),
            ));
        }
        if !self.accepted_types.contains(&file.content_type.as_str()) {
            let formats = if self.accepted_types.len() == 1 {
                "Envie um arquivo PDF."
            } else {
                "Envie PDF, DOC ou DOCX."
            };
            return Err(AppError::Validation(format!("Formato inválido. {formats}")));
        }
        if self.require_pdf_extension && !file.filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::Validation(
                "O arquivo deve ter a extensão .pdf".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub ok: bool,
}

/// `AppError` rendered in this endpoint's `{"ok": false, ...}` shape.
#[derive(Debug)]
pub struct ResumeError(pub AppError);

impl From<AppError> for ResumeError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ResumeError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        let body = Json(json!({
            "ok": false,
            "error": message
        }));
        (status, body).into_response()
    }
}

/// POST /api/curriculo
///
/// The `Multipart` rejection is captured so a non-multipart POST still gets
/// the structured `{"ok": false, ...}` error shape, not axum's plain text.
pub async fn handle_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeResponse>, ResumeError> {
    let ip = client_ip(&headers);
    if !state.rate_limiter.check(&ip) {
        info!(%ip, "resume submission rate-limited");
        return Err(AppError::RateLimited.into());
    }

    let multipart = multipart.map_err(|e| {
        tracing::warn!("non-multipart resume request: {e}");
        AppError::Validation("Requisição multipart inválida".into())
    })?;

    let settings = state.config.resume.ensure_complete()?;
    let form = parse_multipart(multipart).await?;

    if honeypot_tripped(&form) {
        // Bots get a silent success; nothing is sent.
        debug!(%ip, "honeypot field filled, dropping submission");
        return Ok(Json(ResumeResponse { ok: true }));
    }

    process_resume(&state, &settings, &ip, form).await?;
    Ok(Json(ResumeResponse { ok: true }))
}

fn honeypot_tripped(form: &ResumeForm) -> bool {
    !form.website.trim().is_empty()
}

async fn parse_multipart(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            // Both file-field names are in use across the site's forms.
            "arquivo" | "curriculo" => {
                let filename = field.file_name().unwrap_or("curriculo").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                form.arquivo = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            "nome" => form.nome = text_value(field).await?,
            "telefone" => form.telefone = text_value(field).await?,
            "email" => form.email = text_value(field).await?,
            "unidade" => form.unidade = text_value(field).await?,
            "cargo" => form.cargo = text_value(field).await?,
            "mensagem" => form.mensagem = text_value(field).await?,
            "pcd" => form.pcd = text_value(field).await?,
            "pcd_tipo" => form.pcd_tipo = text_value(field).await?,
            "pcd_adaptacao" => form.pcd_adaptacao = text_value(field).await?,
            "vaga_id" => form.vaga_id = text_value(field).await?,
            "vaga_titulo" => form.vaga_titulo = text_value(field).await?,
            "vaga_local" => form.vaga_local = text_value(field).await?,
            "website" => form.website = text_value(field).await?,
            _ => {}
        }
    }

    Ok(form)
}

async fn text_value(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    Ok(field.text().await?.trim().to_string())
}

async fn process_resume(
    state: &AppState,
    settings: &ResumeMailSettings,
    ip: &str,
    form: ResumeForm,
) -> Result<(), AppError> {
    require_non_blank(&[
        ("nome", &form.nome),
        ("telefone", &form.telefone),
        ("email", &form.email),
    ])?;

    let applicant_email = form.email.trim().to_lowercase();
    if !is_valid_email(&applicant_email) {
        return Err(AppError::Validation("E-mail inválido".into()));
    }

    let file = form
        .arquivo
        .as_ref()
        .ok_or_else(|| AppError::Validation("Currículo não encontrado.".into()))?;
    let policy = AttachmentPolicy::from_config(state.config.resume.accept_word);
    policy.validate(file)?;

    let kind = compose::submission_kind(&form);
    info!(
        %ip,
        kind = ?kind,
        file = %file.filename,
        "resume submission accepted, dispatching"
    );

    let mail = OutboundEmail {
        from: settings.account.user.clone(),
        to: vec![settings.to.clone()],
        cc: Vec::new(),
        bcc: Vec::new(),
        reply_to: Some(applicant_email),
        subject: compose::subject(&form, kind),
        text: Some(compose::text_body(&form, ip)),
        html: Some(compose::html_body(&form, ip)),
        attachment: Some(EmailAttachment {
            filename: file.filename.clone(),
            content_type: file.content_type.clone(),
            data: file.data.clone(),
        }),
    };

    state.mailer.send(&settings.account, mail).await?;
    Ok(())
}
