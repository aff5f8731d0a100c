//! Subject lines and email bodies for résumé submissions.

use crate::html::escape;
use crate::resume::ResumeForm;

/// What kind of submission this is; drives the subject line. Job metadata
/// takes precedence: an application to a posted opening keeps its job subject
/// even when the PCD flag is set (the PCD section still renders in the body).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    JobApplication,
    DisabilityProgram,
    TalentPool,
}

pub fn submission_kind(form: &ResumeForm) -> SubmissionKind {
    if !form.vaga_id.is_empty() || !form.vaga_titulo.is_empty() {
        SubmissionKind::JobApplication
    } else if form.pcd == "1" {
        SubmissionKind::DisabilityProgram
    } else {
        SubmissionKind::TalentPool
    }
}

pub fn subject(form: &ResumeForm, kind: SubmissionKind) -> String {
    match kind {
        SubmissionKind::JobApplication => {
            let title = if form.vaga_titulo.is_empty() {
                format!("Vaga {}", form.vaga_id)
            } else {
                form.vaga_titulo.clone()
            };
            format!("Candidatura — {title} — {}", form.nome)
        }
        SubmissionKind::DisabilityProgram => {
            format!("Currículo (Programa PCD) — {}", form.nome)
        }
        SubmissionKind::TalentPool => {
            let mut subject = format!("Currículo — {}", form.nome);
            if !form.cargo.is_empty() {
                subject.push_str(&format!(" ({})", form.cargo));
            }
            if !form.unidade.is_empty() {
                subject.push_str(&format!(" — {}", form.unidade));
            }
            subject
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "(não informada)"
    } else {
        value
    }
}

fn size_mb(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Plain-text part, mirroring the form field by field.
pub fn text_body(form: &ResumeForm, ip: &str) -> String {
    let mut body = String::from("Novo currículo recebido pelo site:\n\n");

    if !form.vaga_id.is_empty() || !form.vaga_titulo.is_empty() {
        body.push_str(&format!(
            "Vaga: {} ({})\nLocal: {}\n\n",
            or_dash(&form.vaga_titulo),
            or_dash(&form.vaga_id),
            or_dash(&form.vaga_local),
        ));
    }

    body.push_str(&format!(
        "Unidade desejada: {}\nCargo pretendido: {}\n\nNome: {}\nE-mail: {}\nTelefone: {}\n\nMensagem:\n{}\n",
        or_dash(&form.unidade),
        or_dash(&form.cargo),
        form.nome,
        form.email,
        form.telefone,
        or_dash(&form.mensagem),
    ));

    if form.pcd == "1" {
        body.push_str(&format!(
            "\nPCD: sim\nTipo: {}\nAdaptações necessárias: {}\n",
            or_dash(&form.pcd_tipo),
            or_dash(&form.pcd_adaptacao),
        ));
    }

    if let Some(file) = &form.arquivo {
        body.push_str(&format!(
            "\nIP: {ip}\nArquivo: {} ({}, {:.2}MB)\n",
            file.filename,
            file.content_type,
            size_mb(file.data.len()),
        ));
    }

    body
}

/// HTML alternative. Optional sections (job metadata, PCD notes) only render
/// when present; every user value is escaped.
pub fn html_body(form: &ResumeForm, ip: &str) -> String {
    let mut rows = String::new();
    let mut row = |label: &str, value: &str| {
        rows.push_str(&format!(
            "    <tr><td><b>{label}:</b></td><td>{}</td></tr>\n",
            escape(value)
        ));
    };

    if !form.vaga_titulo.is_empty() || !form.vaga_id.is_empty() {
        row("Vaga", or_dash(&form.vaga_titulo));
        row("Código da vaga", or_dash(&form.vaga_id));
        row("Local da vaga", or_dash(&form.vaga_local));
    }
    row("Unidade desejada", or_dash(&form.unidade));
    row("Cargo pretendido", or_dash(&form.cargo));
    row("Nome", &form.nome);
    row("E-mail", &form.email);
    row("Telefone", &form.telefone);
    row("Mensagem", or_dash(&form.mensagem));
    if form.pcd == "1" {
        row("PCD", "sim");
        row("Tipo de deficiência", or_dash(&form.pcd_tipo));
        row("Adaptações necessárias", or_dash(&form.pcd_adaptacao));
    }

    let footer = match &form.arquivo {
        Some(file) => format!(
            "IP: {} · Arquivo: {} ({}, {:.2}MB)",
            escape(ip),
            escape(&file.filename),
            escape(&file.content_type),
            size_mb(file.data.len()),
        ),
        None => format!("IP: {}", escape(ip)),
    };

    format!(
        r#"<div style="font-family: Arial, sans-serif; font-size: 14px; color:#111;">
  <h2 style="margin:0 0 8px;">Novo currículo recebido pelo site</h2>

  <table cellpadding="6" cellspacing="0" style="border-collapse: collapse;">
{rows}  </table>

  <p style="margin:16px 0 0; color:#666; font-size:12px;">
    {footer}
  </p>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    use crate::resume::UploadedFile;

    fn form() -> ResumeForm {
        ResumeForm {
            nome: "Ana".to_string(),
            telefone: "16999990000".to_string(),
            email: "ana@acme.com".to_string(),
            unidade: "Ribeirão Preto".to_string(),
            cargo: "Motorista".to_string(),
            mensagem: "Tenho 5 anos de experiência.".to_string(),
            arquivo: Some(UploadedFile {
                filename: "cv.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                data: Bytes::from_static(b"%PDF-1.4"),
            }),
            ..ResumeForm::default()
        }
    }

    #[test]
    fn test_kind_talent_pool_by_default() {
        assert_eq!(submission_kind(&form()), SubmissionKind::TalentPool);
    }

    #[test]
    fn test_kind_job_application_when_vaga_present() {
        let mut f = form();
        f.vaga_id = "vaga-01".to_string();
        assert_eq!(submission_kind(&f), SubmissionKind::JobApplication);
    }

    #[test]
    fn test_kind_job_application_wins_over_pcd_flag() {
        let mut f = form();
        f.vaga_titulo = "Operador de Empilhadeira".to_string();
        f.pcd = "1".to_string();
        assert_eq!(submission_kind(&f), SubmissionKind::JobApplication);
    }

    #[test]
    fn test_kind_disability_program_when_flagged() {
        let mut f = form();
        f.pcd = "1".to_string();
        assert_eq!(submission_kind(&f), SubmissionKind::DisabilityProgram);
    }

    #[test]
    fn test_subject_for_job_application() {
        let mut f = form();
        f.vaga_titulo = "Operador de Empilhadeira".to_string();
        let s = subject(&f, submission_kind(&f));
        assert_eq!(s, "Candidatura — Operador de Empilhadeira — Ana");
    }

    #[test]
    fn test_subject_for_talent_pool_includes_cargo_and_unidade() {
        let f = form();
        let s = subject(&f, submission_kind(&f));
        assert_eq!(s, "Currículo — Ana (Motorista) — Ribeirão Preto");
    }

    #[test]
    fn test_subject_for_talent_pool_without_optionals() {
        let mut f = form();
        f.cargo = String::new();
        f.unidade = String::new();
        let s = subject(&f, submission_kind(&f));
        assert_eq!(s, "Currículo — Ana");
    }

    #[test]
    fn test_subject_for_pcd_program() {
        let mut f = form();
        f.pcd = "1".to_string();
        let s = subject(&f, submission_kind(&f));
        assert_eq!(s, "Currículo (Programa PCD) — Ana");
    }

    #[test]
    fn test_text_body_lists_fields_and_file_metadata() {
        let body = text_body(&form(), "203.0.113.9");
        assert!(body.contains("Nome: Ana"));
        assert!(body.contains("Telefone: 16999990000"));
        assert!(body.contains("IP: 203.0.113.9"));
        assert!(body.contains("cv.pdf"));
        assert!(body.contains("application/pdf"));
    }

    #[test]
    fn test_html_body_omits_optional_sections_when_absent() {
        let html = html_body(&form(), "local");
        assert!(!html.contains("Vaga"));
        assert!(!html.contains("PCD"));
    }

    #[test]
    fn test_html_body_renders_job_and_pcd_sections_when_present() {
        let mut f = form();
        f.vaga_id = "vaga-01".to_string();
        f.vaga_titulo = "Operador".to_string();
        f.vaga_local = "Sertãozinho".to_string();
        f.pcd = "1".to_string();
        f.pcd_tipo = "Auditiva".to_string();
        f.pcd_adaptacao = "Intérprete de Libras".to_string();

        let html = html_body(&f, "local");
        assert!(html.contains("Operador"));
        assert!(html.contains("Sertãozinho"));
        assert!(html.contains("Auditiva"));
        assert!(html.contains("Intérprete de Libras"));
    }

    #[test]
    fn test_html_body_escapes_user_markup() {
        let mut f = form();
        f.nome = "<b>Ana</b>".to_string();
        let html = html_body(&f, "local");
        assert!(html.contains("&lt;b&gt;Ana&lt;/b&gt;"));
        assert!(!html.contains("<b>Ana</b>"));
    }

    #[test]
    fn test_blank_mensagem_renders_placeholder() {
        let mut f = form();
        f.mensagem = String::new();
        let text = text_body(&f, "local");
        assert!(text.contains("(não informada)"));
    }
}
