//! Field validation shared by both submission endpoints.
//!
//! Required-field lists are data, not per-handler code: each handler passes
//! its `(field name, value)` pairs to `require_non_blank` and gets back the
//! first violation, named after the form field.

use crate::errors::AppError;

/// Fails on the first field whose value is blank after trimming.
pub fn require_non_blank(fields: &[(&str, &str)]) -> Result<(), AppError> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Campo obrigatório ausente: {name}"
            )));
        }
    }
    Ok(())
}

/// Basic `local@domain.tld` syntax check: no whitespace, exactly one `@`,
/// and a dot inside the domain with characters on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.find('.') {
        Some(0) => false,
        Some(_) => !domain.ends_with('.'),
        None => false,
    }
}
