use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::mailer::MailError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Client-facing messages are in Portuguese (the language of the site forms);
/// transport internals and secret values are logged, never returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Muitas tentativas. Aguarde alguns minutos e tente novamente.")]
    RateLimited,

    #[error("{0}")]
    Configuration(String),

    #[error("Erro ao enviar e-mail")]
    Delivery(#[from] MailError),

    #[error("Requisição multipart inválida")]
    Multipart(#[from] MultipartError),
}

impl AppError {
    /// Maps the error to an HTTP status and the message the client is allowed
    /// to see. Both response shapes (`success`/`ok`) go through here.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            AppError::Configuration(msg) => {
                tracing::error!("deployment misconfigured: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Delivery(e) => {
                tracing::error!("mail delivery failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Multipart(e) => {
                tracing::warn!("malformed multipart request: {e}");
                // A body-limit trip surfaces here mid-stream; report it as the
                // upload ceiling the client can act on, not a generic parse error.
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    (
                        StatusCode::BAD_REQUEST,
                        "Arquivo excede o limite de 5MB.".to_string(),
                    )
                } else {
                    (StatusCode::BAD_REQUEST, self.to_string())
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400_with_message() {
        let (status, msg) = AppError::Validation("Campo obrigatório ausente: nome".to_string())
            .status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "Campo obrigatório ausente: nome");
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let (status, _) = AppError::RateLimited.status_and_message();
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_configuration_maps_to_500() {
        let (status, msg) =
            AppError::Configuration("Configuração de e-mail incompleta: faltando EMAIL_HOST".into())
                .status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(msg.contains("EMAIL_HOST"));
    }

    #[test]
    fn test_delivery_message_hides_transport_detail() {
        let err = AppError::Delivery(MailError::Transport("auth failed for user x".into()));
        let (status, msg) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Erro ao enviar e-mail");
        assert!(!msg.contains("auth failed"));
    }
}
