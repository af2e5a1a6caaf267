use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Erreurs de l'application, converties en enveloppe JSON
/// `{"status": "error", "message": ...}` par `ResponseError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid data provided")]
    FieldErrors(#[from] ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Transaction PIN not set")]
    PinRequired,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Insufficient {field} balance")]
    InsufficientFunds { field: &'static str },

    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("OTP has expired")]
    OtpExpired,

    #[error("{0}")]
    Token(String),

    #[error("Password hashing failed: {0}")]
    Password(String),

    #[error("Failed to send email: {0}")]
    Mail(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    /// Code machine optionnel renvoyé au frontend
    fn code(&self) -> Option<&'static str> {
        match self {
            AppError::PinRequired => Some("PIN_REQUIRED"),
            AppError::InsufficientFunds { .. } => Some("INSUFFICIENT_FUNDS"),
            AppError::InvalidTransition { .. } => Some("INVALID_TRANSITION"),
            AppError::OtpExpired => Some("OTP_EXPIRED"),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::FieldErrors(_)
            | AppError::InsufficientFunds { .. }
            | AppError::InvalidTransition { .. }
            | AppError::OtpExpired => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::PinRequired => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Password(_) | AppError::Mail(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Ne pas exposer les détails internes au client
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut body = json!({
            "status": "error",
            "message": message,
        });
        if let Some(code) = self.code() {
            body["code"] = json!(code);
        }
        if let AppError::FieldErrors(errors) = self {
            body["errors"] = json!(errors);
        }

        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::PinRequired.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::InsufficientFunds { field: "available" }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("Invalid credentials".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Database(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AppError::InsufficientFunds { field: "available" }.to_string(),
            "Insufficient available balance"
        );
        assert_eq!(AppError::OtpExpired.to_string(), "OTP has expired");
        assert_eq!(AppError::PinRequired.code(), Some("PIN_REQUIRED"));
    }
}
